use super::ColumnType;
use std::fmt;

/// A single column of a parsed table, in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// The column name, unique within the table.
    pub name: String,

    /// Canonical column type.
    pub ty: ColumnType,

    /// Declared length, required for `string` columns.
    pub length: Option<u32>,

    /// True unless the column carries NOT NULL or is the primary key.
    pub nullable: bool,

    /// True if the column is the primary key.
    pub primary: bool,

    /// Only valid together with `primary` and an integer type.
    pub auto_increment: bool,

    /// Declared DEFAULT clause, if any.
    pub default: Option<DefaultValue>,

    /// Declared ON UPDATE keyword, if any.
    pub on_update: Option<String>,

    /// Inline COMMENT, used as the display label when present.
    pub comment: Option<String>,

    /// Label of the composite-unique constraint this column belongs to.
    pub unique_group: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            length: None,
            nullable: true,
            primary: false,
            auto_increment: false,
            default: None,
            on_update: None,
            comment: None,
            unique_group: None,
        }
    }
}

/// A coerced DEFAULT clause value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Unquoted numeric literal, kept verbatim.
    Number(String),
    /// Quoted string literal, unescaped.
    Text(String),
    /// Bare keyword such as `CURRENT_TIMESTAMP`, uppercased.
    Keyword(String),
    /// Explicit `DEFAULT NULL`.
    Null,
}

impl DefaultValue {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, DefaultValue::Keyword(k) if k == keyword)
    }
}

// Display renders the value the way it would appear in DDL, which is also
// how the templates embed it in generated code.
impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Number(n) => f.write_str(n),
            DefaultValue::Text(s) => write!(f, "'{s}'"),
            DefaultValue::Keyword(k) => f.write_str(k),
            DefaultValue::Null => f.write_str("NULL"),
        }
    }
}
