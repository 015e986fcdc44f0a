use crate::templates::{Template, TEMPLATES};
use crate::RenderContext;
use crudgen_core::{ErrorCode, GeneratorError, Result};
use indexmap::IndexMap;

/// One rendered artifact. The path is relative to the generation output
/// root; resolution against the root happens in the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub template_id: &'static str,
    pub path: String,
    pub content: String,
}

/// The ids of the fixed template set, in render order.
pub fn template_ids() -> Vec<&'static str> {
    TEMPLATES.iter().map(|template| template.id).collect()
}

/// Renders the full template set against `ctx`.
///
/// Pure and idempotent: no I/O, and the same context always produces
/// byte-identical output.
pub fn render(ctx: &RenderContext) -> Result<Vec<RenderedFile>> {
    // The context builder cannot produce a context without a primary key,
    // but the templates hard-depend on it, so re-check before rendering.
    match ctx.var("primary_key") {
        Some(pk) if !pk.is_empty() => {}
        _ => {
            return Err(GeneratorError::with_message(
                ErrorCode::MissingContextKey,
                "render context is missing `primary_key`",
            ))
        }
    }

    TEMPLATES
        .iter()
        .map(|template| render_template(template, ctx))
        .collect()
}

/// Renders a single template by id.
pub fn render_one(id: &str, ctx: &RenderContext) -> Result<RenderedFile> {
    let Some(template) = TEMPLATES.iter().find(|template| template.id == id) else {
        return Err(GeneratorError::with_message(
            ErrorCode::UnknownTemplate,
            format!("unknown template id `{id}`"),
        ));
    };
    render_template(template, ctx)
}

fn render_template(template: &Template, ctx: &RenderContext) -> Result<RenderedFile> {
    Ok(RenderedFile {
        template_id: template.id,
        path: interpolate(template.id, template.path, ctx.vars())?,
        content: interpolate(template.id, template.body, ctx.vars())?,
    })
}

/// Substitutes every `{{name}}` in `text` from `vars`. A placeholder with
/// no matching variable is an error, never silently left in place.
fn interpolate(template_id: &str, text: &str, vars: &IndexMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            return Err(GeneratorError::with_message(
                ErrorCode::UnresolvedPlaceholder,
                format!("template `{template_id}` has an unterminated placeholder"),
            ));
        };

        let name = after[..end].trim();
        let Some(value) = vars.get(name) else {
            return Err(GeneratorError::with_message(
                ErrorCode::UnresolvedPlaceholder,
                format!("template `{template_id}` references unknown placeholder `{name}`"),
            ));
        };

        out.push_str(value);
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_context;
    use crudgen_sql::parse;
    use pretty_assertions::assert_eq;

    fn ctx() -> RenderContext {
        let table = parse(
            "CREATE TABLE roles (
                role_id INT PRIMARY KEY AUTO_INCREMENT,
                name VARCHAR(50) NOT NULL COMMENT '角色名称',
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .unwrap();
        build_context(&table, "role").unwrap()
    }

    #[test]
    fn renders_the_full_set_in_order() {
        let files = render(&ctx()).unwrap();
        let ids: Vec<&str> = files.iter().map(|f| f.template_id).collect();
        assert_eq!(
            ids,
            vec!["routes-fragment", "controller", "service", "model", "list-view"]
        );

        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "routes/role.fragment",
                "controllers/role_controller.rs",
                "services/role_service.rs",
                "models/roles.rs",
                "views/role_list.rs",
            ]
        );
    }

    #[test]
    fn no_placeholder_survives_rendering() {
        for file in render(&ctx()).unwrap() {
            assert!(
                !file.content.contains("{{"),
                "{} still contains a placeholder",
                file.template_id
            );
        }
    }

    #[test]
    fn model_reflects_the_schema() {
        let model = render_one("model", &ctx()).unwrap();
        assert!(model.content.contains("pub struct Roles {"));
        assert!(model.content.contains("    pub role_id: i32,"));
        assert!(model.content.contains("    pub name: String,"));
        assert!(model.content.contains("    pub created_at: Option<String>,"));
        assert!(model.content.contains("pub const PRIMARY_KEY: &str = \"role_id\";"));
        assert!(model
            .content
            .contains("pub const COLUMNS: &str = \"role_id, name, created_at\";"));
    }

    #[test]
    fn list_view_uses_comments_as_labels() {
        let view = render_one("list-view", &ctx()).unwrap();
        assert!(view.content.contains("(\"name\", \"角色名称\"),"));
        assert!(view.content.contains("(\"created_at\", \"Created at\"),"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let ctx = ctx();
        let first = render(&ctx).unwrap();
        let second = render(&ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_template_id() {
        let err = render_one("mailer", &ctx()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownTemplate);
        assert_eq!(err.code().as_str(), "GEN-TPL-001");
    }

    #[test]
    fn unresolved_placeholder() {
        let vars = ctx().vars().clone();
        let err = interpolate("controller", "hello {{missing_var}}", &vars).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnresolvedPlaceholder);
        assert!(err.message().contains("missing_var"));

        let err = interpolate("controller", "hello {{broken", &vars).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnresolvedPlaceholder);
    }

    #[test]
    fn missing_primary_key_is_caught_defensively() {
        let mut ctx = ctx();
        ctx.vars_mut().shift_remove("primary_key");
        let err = render(&ctx).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingContextKey);
    }

    #[test]
    fn template_ids_are_stable() {
        assert_eq!(
            template_ids(),
            vec!["routes-fragment", "controller", "service", "model", "list-view"]
        );
    }
}
