use std::fmt;

/// Canonical column types. Vendor synonyms normalize onto these during
/// parsing; anything that does not map here is rejected, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    BigInt,
    String,
    Text,
    DateTime,
    Date,
    Decimal,
    Float,
    Boolean,
}

impl ColumnType {
    /// Maps a raw SQL type name (case-insensitive) to its canonical type.
    pub fn from_sql(raw: &str) -> Option<ColumnType> {
        let normalized = raw.to_ascii_uppercase();
        Some(match normalized.as_str() {
            "INT" | "INTEGER" | "TINYINT" | "SMALLINT" | "MEDIUMINT" => ColumnType::Int,
            "BIGINT" => ColumnType::BigInt,
            "VARCHAR" | "CHAR" => ColumnType::String,
            "TEXT" | "TINYTEXT" | "MEDIUMTEXT" | "LONGTEXT" => ColumnType::Text,
            "DATETIME" | "TIMESTAMP" => ColumnType::DateTime,
            "DATE" => ColumnType::Date,
            "DECIMAL" | "NUMERIC" => ColumnType::Decimal,
            "FLOAT" | "DOUBLE" | "REAL" => ColumnType::Float,
            "BOOL" | "BOOLEAN" | "BIT" => ColumnType::Boolean,
            _ => return None,
        })
    }

    pub const fn is_integer(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::BigInt)
    }

    /// Form-input hint used when rendering list/edit views.
    pub const fn input_hint(self) -> &'static str {
        match self {
            ColumnType::Int | ColumnType::BigInt => "number",
            ColumnType::String => "text",
            ColumnType::Text => "textarea",
            ColumnType::DateTime => "datetime",
            ColumnType::Date => "date",
            ColumnType::Decimal | ColumnType::Float => "decimal",
            ColumnType::Boolean => "checkbox",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Int => "int",
            ColumnType::BigInt => "bigint",
            ColumnType::String => "string",
            ColumnType::Text => "text",
            ColumnType::DateTime => "datetime",
            ColumnType::Date => "date",
            ColumnType::Decimal => "decimal",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
        };
        f.write_str(s)
    }
}
