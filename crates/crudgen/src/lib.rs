//! SQL-schema-driven CRUD module generator.
//!
//! Feed [`Generator::preview_sql`] or [`Generator::generate`] a
//! `CREATE TABLE` statement and a module name; the pipeline parses the DDL
//! into a [`TableDefinition`], derives a render context, renders the fixed
//! template set, and (for `generate`) commits the files all-or-nothing.

mod fs;
pub use fs::{Filesystem, MemoryFilesystem, StdFilesystem};

mod generator;
pub use generator::{
    FileAction, GenerateOptions, GeneratedFile, Generator, Preview, Report,
};

mod paths;

pub use crudgen_codegen::{build_context, render, RenderContext, RenderedFile};
pub use crudgen_core::{
    ColumnType, DefaultValue, ErrorCode, FieldDefinition, GeneratorError, LogData, Name, Result,
    TableDefinition,
};
pub use crudgen_sql::parse;
