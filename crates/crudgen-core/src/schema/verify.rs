use super::{ColumnType, FieldDefinition, Name};
use crate::{ErrorCode, GeneratorError, Result};
use indexmap::IndexMap;

/// Validates a parsed field set and returns the primary key name.
///
/// Runs after normalization, before a [`super::TableDefinition`] is handed
/// to callers. Violations share the SQL error namespace with the parser
/// since this is still validating parsed DDL.
pub(super) fn verify(name: &Name, fields: &IndexMap<String, FieldDefinition>) -> Result<String> {
    Verify { name, fields }.verify()
}

struct Verify<'a> {
    name: &'a Name,
    fields: &'a IndexMap<String, FieldDefinition>,
}

impl Verify<'_> {
    fn verify(&self) -> Result<String> {
        let primary_key = self.verify_exactly_one_primary_key()?;
        self.verify_string_lengths()?;
        self.verify_auto_increment(&primary_key)?;
        Ok(primary_key)
    }

    fn verify_exactly_one_primary_key(&self) -> Result<String> {
        let mut primaries = self.fields.values().filter(|field| field.primary);

        let Some(first) = primaries.next() else {
            return Err(GeneratorError::with_message(
                ErrorCode::NoPrimaryKey,
                format!(
                    "table `{}` declares no primary key",
                    self.name.snake_case()
                ),
            ));
        };

        if let Some(second) = primaries.next() {
            return Err(GeneratorError::with_message(
                ErrorCode::MultiplePrimaryKeys,
                format!(
                    "table `{}` declares more than one primary key (`{}`, `{}`)",
                    self.name.snake_case(),
                    first.name,
                    second.name
                ),
            ));
        }

        Ok(first.name.clone())
    }

    fn verify_string_lengths(&self) -> Result<()> {
        for field in self.fields.values() {
            if field.ty == ColumnType::String && field.length.is_none() {
                return Err(GeneratorError::with_message(
                    ErrorCode::MissingStringLength,
                    format!("string column `{}` requires a length", field.name),
                ));
            }
        }
        Ok(())
    }

    fn verify_auto_increment(&self, primary_key: &str) -> Result<()> {
        for field in self.fields.values() {
            if !field.auto_increment {
                continue;
            }
            if field.name != primary_key || !field.ty.is_integer() {
                return Err(GeneratorError::with_message(
                    ErrorCode::InvalidAutoIncrement,
                    format!(
                        "AUTO_INCREMENT on `{}` requires an integer primary key",
                        field.name
                    ),
                ));
            }
        }
        Ok(())
    }
}
