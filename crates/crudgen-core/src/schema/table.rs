use super::{FieldDefinition, Name};
use crate::{ErrorCode, GeneratorError, Result};
use indexmap::IndexMap;

/// The canonical, immutable model of one parsed `CREATE TABLE` statement.
///
/// Field order is declaration order and is significant: generated struct
/// and column ordering follows it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    /// The table name.
    pub name: Name,

    /// Name of the field marked as primary key. Exactly one exists.
    pub primary_key: String,

    /// Ordered column map, keyed by column name.
    pub fields: IndexMap<String, FieldDefinition>,
}

impl TableDefinition {
    /// Builds a table from parsed fields, running the full validation pass.
    /// This is the only constructor; a value that exists has been verified.
    pub fn from_fields(
        name: Name,
        fields: IndexMap<String, FieldDefinition>,
    ) -> Result<TableDefinition> {
        let primary_key = super::verify::verify(&name, &fields)?;

        Ok(TableDefinition {
            name,
            primary_key,
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn primary_field(&self) -> &FieldDefinition {
        &self.fields[&self.primary_key]
    }

    /// Composite-unique constraints: label to member field names, both in
    /// declaration order.
    pub fn unique_groups(&self) -> IndexMap<String, Vec<String>> {
        let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();

        for field in self.fields.values() {
            if let Some(label) = &field.unique_group {
                groups
                    .entry(label.clone())
                    .or_default()
                    .push(field.name.clone());
            }
        }

        groups
    }
}

/// Accumulates fields during parsing, rejecting duplicates on insert.
#[derive(Debug, Default)]
pub struct FieldSet {
    fields: IndexMap<String, FieldDefinition>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldDefinition) -> Result<()> {
        let name = field.name.clone();
        if self.fields.insert(name.clone(), field).is_some() {
            return Err(GeneratorError::with_message(
                ErrorCode::DuplicateColumn,
                format!("duplicate column name `{name}`"),
            ));
        }
        Ok(())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldDefinition> {
        self.fields.get_mut(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, FieldDefinition> {
        self.fields
    }
}
