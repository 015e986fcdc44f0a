use serde::Serialize;
use std::backtrace::Backtrace;

/// Every failure the generator can report, partitioned by subsystem prefix.
///
/// `SQL` covers parsing and schema validation, `TPL` template rendering,
/// `PATH` output-path resolution, `FILE` filesystem conflicts, and `SYS`
/// anything unclassified. The wire form is the `GEN-<prefix>-<nnn>` string
/// returned by [`ErrorCode::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // SQL: input / parse / validation defects
    EmptySql,
    NoCreateTable,
    DuplicateColumn,
    NoPrimaryKey,
    MultiplePrimaryKeys,
    UnsupportedColumnType,
    MalformedSql,
    UnknownKeyColumn,
    MissingStringLength,
    InvalidAutoIncrement,

    // TPL: template registry / render defects
    UnknownTemplate,
    UnresolvedPlaceholder,
    MissingContextKey,

    // PATH: output location resolution
    InvalidModuleName,
    PathOutsideRoot,

    // FILE: filesystem conflicts / IO
    TargetExists,
    WriteFailed,
    PathLocked,
    ReadFailed,

    // SYS: everything else
    Internal,
}

impl ErrorCode {
    /// All codes, in taxonomy order. The bijection tests iterate this.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::EmptySql,
        ErrorCode::NoCreateTable,
        ErrorCode::DuplicateColumn,
        ErrorCode::NoPrimaryKey,
        ErrorCode::MultiplePrimaryKeys,
        ErrorCode::UnsupportedColumnType,
        ErrorCode::MalformedSql,
        ErrorCode::UnknownKeyColumn,
        ErrorCode::MissingStringLength,
        ErrorCode::InvalidAutoIncrement,
        ErrorCode::UnknownTemplate,
        ErrorCode::UnresolvedPlaceholder,
        ErrorCode::MissingContextKey,
        ErrorCode::InvalidModuleName,
        ErrorCode::PathOutsideRoot,
        ErrorCode::TargetExists,
        ErrorCode::WriteFailed,
        ErrorCode::PathLocked,
        ErrorCode::ReadFailed,
        ErrorCode::Internal,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptySql => "GEN-SQL-001",
            ErrorCode::NoCreateTable => "GEN-SQL-002",
            ErrorCode::DuplicateColumn => "GEN-SQL-003",
            ErrorCode::NoPrimaryKey => "GEN-SQL-004",
            ErrorCode::MultiplePrimaryKeys => "GEN-SQL-005",
            ErrorCode::UnsupportedColumnType => "GEN-SQL-006",
            ErrorCode::MalformedSql => "GEN-SQL-007",
            ErrorCode::UnknownKeyColumn => "GEN-SQL-008",
            ErrorCode::MissingStringLength => "GEN-SQL-009",
            ErrorCode::InvalidAutoIncrement => "GEN-SQL-010",
            ErrorCode::UnknownTemplate => "GEN-TPL-001",
            ErrorCode::UnresolvedPlaceholder => "GEN-TPL-002",
            ErrorCode::MissingContextKey => "GEN-TPL-003",
            ErrorCode::InvalidModuleName => "GEN-PATH-001",
            ErrorCode::PathOutsideRoot => "GEN-PATH-002",
            ErrorCode::TargetExists => "GEN-FILE-001",
            ErrorCode::WriteFailed => "GEN-FILE-002",
            ErrorCode::PathLocked => "GEN-FILE-003",
            ErrorCode::ReadFailed => "GEN-FILE-004",
            ErrorCode::Internal => "GEN-SYS-001",
        }
    }

    pub const fn default_message(self) -> &'static str {
        match self {
            ErrorCode::EmptySql => "SQL input is empty",
            ErrorCode::NoCreateTable => "no CREATE TABLE statement found",
            ErrorCode::DuplicateColumn => "duplicate column name",
            ErrorCode::NoPrimaryKey => "no primary key declared",
            ErrorCode::MultiplePrimaryKeys => "more than one primary key declared",
            ErrorCode::UnsupportedColumnType => "unsupported column type",
            ErrorCode::MalformedSql => "malformed SQL statement",
            ErrorCode::UnknownKeyColumn => "key clause references unknown column",
            ErrorCode::MissingStringLength => "string column requires a length",
            ErrorCode::InvalidAutoIncrement => "AUTO_INCREMENT requires an integer primary key",
            ErrorCode::UnknownTemplate => "unknown template id",
            ErrorCode::UnresolvedPlaceholder => "unresolved template placeholder",
            ErrorCode::MissingContextKey => "render context is missing a required key",
            ErrorCode::InvalidModuleName => "invalid module name",
            ErrorCode::PathOutsideRoot => "target path escapes the output root",
            ErrorCode::TargetExists => "target file already exists",
            ErrorCode::WriteFailed => "failed to write target file",
            ErrorCode::PathLocked => "target path is locked by a concurrent generation",
            ErrorCode::ReadFailed => "failed to read target file",
            ErrorCode::Internal => "internal generator error",
        }
    }
}

impl core::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced anywhere in the generation pipeline.
///
/// Immutable once constructed. The only behavior it carries beyond the
/// standard error traits is [`GeneratorError::to_log_data`], a flat
/// projection suitable for structured logging.
#[derive(Debug)]
pub struct GeneratorError {
    code: ErrorCode,
    message: String,
    track: Option<String>,
    stack: Backtrace,
}

impl GeneratorError {
    /// Creates an error carrying the taxonomy's default message for `code`.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
            track: None,
            stack: Backtrace::capture(),
        }
    }

    /// Creates an error with a contextualized message overriding the default.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            track: None,
            stack: Backtrace::capture(),
        }
    }

    /// Attaches a correlation id for cross-referencing user-facing failures
    /// with server-side logs.
    #[must_use]
    pub fn with_track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn stack(&self) -> &Backtrace {
        &self.stack
    }

    /// Flat, loggable projection of this error. Exactly the fields shown
    /// here, nothing more.
    pub fn to_log_data(&self) -> LogData {
        LogData {
            name: "GeneratorError",
            code: self.code.as_str(),
            message: self.message.clone(),
            track: self.track.clone(),
            stack: self.stack.to_string(),
        }
    }
}

/// The projection returned by [`GeneratorError::to_log_data`]. An omitted
/// track serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogData {
    pub name: &'static str,
    pub code: &'static str,
    pub message: String,
    pub track: Option<String>,
    pub stack: String,
}

impl core::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for GeneratorError {}

// Write-side bridge for `?` on `std::fs` calls. Read failures carry a
// different code and are constructed at the call site.
impl From<std::io::Error> for GeneratorError {
    fn from(err: std::io::Error) -> Self {
        Self::with_message(ErrorCode::WriteFailed, err.to_string())
    }
}

impl From<anyhow::Error> for GeneratorError {
    fn from(err: anyhow::Error) -> Self {
        Self::with_message(ErrorCode::Internal, err.to_string())
    }
}
