mod field;
pub use field::{DefaultValue, FieldDefinition};

mod name;
pub use name::Name;

mod table;
pub use table::{FieldSet, TableDefinition};

mod ty;
pub use ty::ColumnType;

mod verify;
