//! The fixed, versioned template set.
//!
//! One template per generated artifact, matching the host application's
//! layered layout: a routes fragment, a controller, a service, a model, and
//! a list-view scaffold. Placeholders use `{{name}}` and resolve against the
//! render context's variable map.

pub(crate) struct Template {
    pub(crate) id: &'static str,
    /// Relative output path, itself interpolated.
    pub(crate) path: &'static str,
    pub(crate) body: &'static str,
}

pub(crate) const TEMPLATES: &[Template] = &[
    Template {
        id: "routes-fragment",
        path: "routes/{{module_snake}}.fragment",
        body: r#"// Route fragment for the {{module_pascal}} module.
// Insert into the application router setup.
scope("/{{module_kebab}}", |r| {
    r.get("/", {{module_snake}}_controller::index);
    r.get("/:{{primary_key}}", {{module_snake}}_controller::show);
    r.post("/", {{module_snake}}_controller::create);
    r.put("/:{{primary_key}}", {{module_snake}}_controller::update);
    r.delete("/:{{primary_key}}", {{module_snake}}_controller::destroy);
});
"#,
    },
    Template {
        id: "controller",
        path: "controllers/{{module_snake}}_controller.rs",
        body: r#"//! Generated controller for the {{module_pascal}} module.

use crate::services::{{module_snake}}_service;

pub fn index(req: Request) -> Response {
    let page = req.query_u64("page").unwrap_or(1);
    {{module_snake}}_service::list(page).into_response()
}

pub fn show(req: Request) -> Response {
    let {{primary_key}} = req.param("{{primary_key}}");
    {{module_snake}}_service::find({{primary_key}}).into_response()
}

pub fn create(req: Request) -> Response {
    {{module_snake}}_service::create(req.body()).into_response()
}

pub fn update(req: Request) -> Response {
    let {{primary_key}} = req.param("{{primary_key}}");
    {{module_snake}}_service::update({{primary_key}}, req.body()).into_response()
}

pub fn destroy(req: Request) -> Response {
    let {{primary_key}} = req.param("{{primary_key}}");
    {{module_snake}}_service::remove({{primary_key}}).into_response()
}
"#,
    },
    Template {
        id: "service",
        path: "services/{{module_snake}}_service.rs",
        body: r#"//! Generated service for the {{module_pascal}} module.

use crate::models::{{table_snake}}::{{table_pascal}};

fn validation_rules() -> Rules {
    let mut rules = Rules::new();
{{validation_rules}}
    rules
}

pub fn list(page: u64) -> Page<{{table_pascal}}> {
    repository::<{{table_pascal}}>().page(page)
}

pub fn find({{primary_key}}: Id) -> Option<{{table_pascal}}> {
    repository::<{{table_pascal}}>().find_by("{{primary_key}}", {{primary_key}})
}

pub fn create(input: Input) -> Result<{{table_pascal}}> {
    validation_rules().check(&input)?;
    repository::<{{table_pascal}}>().insert(input)
}

pub fn update({{primary_key}}: Id, input: Input) -> Result<{{table_pascal}}> {
    validation_rules().check(&input)?;
    repository::<{{table_pascal}}>().update_by("{{primary_key}}", {{primary_key}}, input)
}

pub fn remove({{primary_key}}: Id) -> Result<()> {
    repository::<{{table_pascal}}>().delete_by("{{primary_key}}", {{primary_key}})
}
"#,
    },
    Template {
        id: "model",
        path: "models/{{table_snake}}.rs",
        body: r#"//! Generated model for table `{{table_snake}}`.

pub const TABLE: &str = "{{table_snake}}";
pub const PRIMARY_KEY: &str = "{{primary_key}}";
pub const COLUMNS: &str = "{{column_list}}";

#[derive(Debug, Clone)]
pub struct {{table_pascal}} {
{{struct_fields}}
}
"#,
    },
    Template {
        id: "list-view",
        path: "views/{{module_snake}}_list.rs",
        body: r#"//! Generated list-view scaffold for the {{module_pascal}} module.

/// Column name to display label, in column order.
pub const LABELS: &[(&str, &str)] = &[
{{field_labels}}
];

/// Editable field to form-input hint.
pub const INPUTS: &[(&str, &str)] = &[
{{form_inputs}}
];
"#,
    },
];
