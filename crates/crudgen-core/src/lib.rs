mod error;
pub use error::{ErrorCode, GeneratorError, LogData};

pub mod schema;
pub use schema::{ColumnType, DefaultValue, FieldDefinition, FieldSet, Name, TableDefinition};

/// A Result type alias that uses crudgen's [`GeneratorError`] type.
pub type Result<T> = core::result::Result<T, GeneratorError>;
