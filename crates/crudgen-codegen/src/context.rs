use crudgen_core::{
    ColumnType, ErrorCode, GeneratorError, Name, Result, TableDefinition,
};
use indexmap::IndexMap;

/// Render-ready data derived from a table definition and a module name.
///
/// Building a context is pure and deterministic: identical inputs always
/// yield a byte-identical variable map, which is what makes preview output
/// equal commit output.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub module: Name,
    pub table: Name,
    pub fields: Vec<FieldContext>,
    vars: IndexMap<String, String>,
}

/// Per-field render metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContext {
    pub name: String,
    /// Display label: the column comment when present, otherwise the
    /// humanized field name.
    pub label: String,
    pub input_hint: &'static str,
    pub is_primary: bool,
    pub is_nullable: bool,
}

impl RenderContext {
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub(crate) fn vars(&self) -> &IndexMap<String, String> {
        &self.vars
    }

    #[cfg(test)]
    pub(crate) fn vars_mut(&mut self) -> &mut IndexMap<String, String> {
        &mut self.vars
    }
}

/// Derives the render context for `table` under the given module name.
pub fn build_context(table: &TableDefinition, module_name: &str) -> Result<RenderContext> {
    validate_module_name(module_name)?;

    let module = Name::new(module_name);
    let table_name = table.name.clone();

    let fields: Vec<FieldContext> = table
        .fields
        .values()
        .map(|field| FieldContext {
            name: field.name.clone(),
            label: field
                .comment
                .clone()
                .unwrap_or_else(|| Name::new(&field.name).humanized()),
            input_hint: field.ty.input_hint(),
            is_primary: field.primary,
            is_nullable: field.nullable,
        })
        .collect();

    let mut vars = IndexMap::new();
    insert_name_vars(&mut vars, "module", &module);
    insert_name_vars(&mut vars, "table", &table_name);
    vars.insert("primary_key".to_string(), table.primary_key.clone());
    vars.insert("struct_fields".to_string(), struct_fields(table));
    vars.insert("column_list".to_string(), column_list(table));
    vars.insert("field_labels".to_string(), field_labels(&fields));
    vars.insert("form_inputs".to_string(), form_inputs(&fields));
    vars.insert("validation_rules".to_string(), validation_rules(table));

    Ok(RenderContext {
        module,
        table: table_name,
        fields,
        vars,
    })
}

/// Output paths derive from the module name, so a name that would not form
/// a sane path component is rejected up front.
fn validate_module_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_alphabetic()
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GeneratorError::with_message(
            ErrorCode::InvalidModuleName,
            format!("invalid module name `{name}`"),
        ))
    }
}

fn insert_name_vars(vars: &mut IndexMap<String, String>, prefix: &str, name: &Name) {
    vars.insert(format!("{prefix}_snake"), name.snake_case());
    vars.insert(format!("{prefix}_camel"), name.camel_case());
    vars.insert(format!("{prefix}_pascal"), name.upper_camel_case());
    vars.insert(format!("{prefix}_kebab"), name.kebab_case());
}

/// The Rust type a column maps to in the generated model struct.
fn rust_type(ty: ColumnType, nullable: bool) -> String {
    let base = match ty {
        ColumnType::Int => "i32",
        ColumnType::BigInt => "i64",
        ColumnType::String | ColumnType::Text => "String",
        ColumnType::DateTime | ColumnType::Date => "String",
        ColumnType::Decimal | ColumnType::Float => "f64",
        ColumnType::Boolean => "bool",
    };

    if nullable {
        format!("Option<{base}>")
    } else {
        base.to_string()
    }
}

fn struct_fields(table: &TableDefinition) -> String {
    table
        .fields
        .values()
        .map(|field| {
            format!(
                "    pub {}: {},",
                field.name,
                rust_type(field.ty, field.nullable)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn column_list(table: &TableDefinition) -> String {
    table
        .fields
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_labels(fields: &[FieldContext]) -> String {
    fields
        .iter()
        .map(|field| format!("    (\"{}\", \"{}\"),", field.name, field.label))
        .collect::<Vec<_>>()
        .join("\n")
}

fn form_inputs(fields: &[FieldContext]) -> String {
    fields
        .iter()
        .filter(|field| !field.is_primary)
        .map(|field| format!("    (\"{}\", \"{}\"),", field.name, field.input_hint))
        .collect::<Vec<_>>()
        .join("\n")
}

fn validation_rules(table: &TableDefinition) -> String {
    let mut rules = Vec::new();

    for field in table.fields.values() {
        if field.primary {
            continue;
        }
        if !field.nullable && field.default.is_none() {
            rules.push(format!("    rules.require(\"{}\");", field.name));
        }
        if let Some(length) = field.length {
            rules.push(format!(
                "    rules.max_length(\"{}\", {length});",
                field.name
            ));
        }
    }

    for (label, columns) in table.unique_groups() {
        let quoted: Vec<String> = columns.iter().map(|c| format!("\"{c}\"")).collect();
        rules.push(format!(
            "    rules.unique_together(\"{label}\", &[{}]);",
            quoted.join(", ")
        ));
    }

    rules.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudgen_sql::parse;
    use pretty_assertions::assert_eq;

    fn member_roles() -> TableDefinition {
        parse(
            "CREATE TABLE member_roles (
                id INT PRIMARY KEY AUTO_INCREMENT,
                member_id INT NOT NULL,
                role_id INT NOT NULL COMMENT '角色',
                note VARCHAR(100),
                UNIQUE KEY uk_member_role (member_id, role_id)
            )",
        )
        .unwrap()
    }

    #[test]
    fn name_variants() {
        let ctx = build_context(&member_roles(), "memberRole").unwrap();
        assert_eq!(ctx.var("module_snake"), Some("member_role"));
        assert_eq!(ctx.var("module_camel"), Some("memberRole"));
        assert_eq!(ctx.var("module_pascal"), Some("MemberRole"));
        assert_eq!(ctx.var("module_kebab"), Some("member-role"));
        assert_eq!(ctx.var("table_pascal"), Some("MemberRoles"));
        assert_eq!(ctx.var("primary_key"), Some("id"));
    }

    #[test]
    fn field_metadata() {
        let ctx = build_context(&member_roles(), "memberRole").unwrap();

        let id = &ctx.fields[0];
        assert!(id.is_primary);
        assert_eq!(id.label, "Id");

        let role_id = &ctx.fields[2];
        assert_eq!(role_id.label, "角色");
        assert_eq!(role_id.input_hint, "number");

        let note = &ctx.fields[3];
        assert!(note.is_nullable);
        assert_eq!(note.input_hint, "text");
    }

    #[test]
    fn validation_rules_cover_unique_groups() {
        let ctx = build_context(&member_roles(), "memberRole").unwrap();
        let rules = ctx.var("validation_rules").unwrap();

        assert!(rules.contains("rules.require(\"member_id\");"));
        assert!(rules.contains("rules.max_length(\"note\", 100);"));
        assert!(rules
            .contains("rules.unique_together(\"uk_member_role\", &[\"member_id\", \"role_id\"]);"));
    }

    #[test]
    fn deterministic_output() {
        let table = member_roles();
        let a = build_context(&table, "memberRole").unwrap();
        let b = build_context(&table, "memberRole").unwrap();
        assert_eq!(a.vars(), b.vars());
    }

    #[test]
    fn bad_module_names_are_rejected() {
        let table = member_roles();
        for bad in ["", "1module", "mod/ule", "../escape", "mod ule"] {
            let err = build_context(&table, bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidModuleName, "{bad:?}");
        }
    }
}
