//! Error types for descriptor resolution

use thiserror::Error;

/// Result type alias for resolution operations
pub type TransformResult<T> = Result<T, TransformError>;

/// How the caller is expected to react to a [`TransformError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Emit a comment into the generated output and continue with the next field or message
    Recoverable,
    /// Produce no output for the whole file
    SkipFile,
    /// Abort the batch
    Fatal,
}

/// Error type for descriptor resolution
#[derive(Error, Debug)]
pub enum TransformError {
    /// An option block carries an extension value that cannot be decoded
    #[error("cannot decode {kind} options of {element}: {source}")]
    MalformedOptions {
        kind: &'static str,
        element: String,
        #[source]
        source: prost::DecodeError,
    },

    /// A field references a message type that no file in the batch declares
    #[error("field {message}.{field} references message type {type_name} which is not in the descriptor batch")]
    UnknownMessageType {
        message: String,
        field: String,
        type_name: String,
    },

    /// A message targets a structure the native models do not declare
    #[error("message {message} targets structure {structure} which is not declared in the native models")]
    UnknownStructure { message: String, structure: String },

    /// The dependency graph loops back on itself
    #[error("import cycle: {}", .chain.join(" -> "))]
    ImportCycle { chain: Vec<String> },

    /// The native models source could not be read or parsed
    #[error("failed to load native models from {path}: {reason}")]
    Models { path: String, reason: String },

    /// The message has no target structure; `oneofs` lists its oneof declarations
    #[error("message {message} has no rust_struct option")]
    NotEligible { message: String, oneofs: Vec<String> },

    /// The file has no models path and produces no output
    #[error("file {file} was skipped: no rust_models_file_path option")]
    FileSkipped { file: String },

    /// The field has no scalar, message or union mapping
    #[error("field {field}: {reason}")]
    UnsupportedField { field: String, reason: String },

    /// The target structure lacks the field the wire field maps to
    #[error("field {field}: structure {structure} has no field {native}")]
    MissingNativeField {
        field: String,
        structure: String,
        native: String,
    },

    /// Only one direction of a custom transformer pair was annotated
    #[error("field {field}: custom transformer needs both to_native and to_wire")]
    IncompleteCustomTransformer { field: String },
}

impl TransformError {
    /// Classify the error for the caller
    pub fn class(&self) -> ErrorClass {
        match self {
            TransformError::UnsupportedField { .. }
            | TransformError::MissingNativeField { .. }
            | TransformError::IncompleteCustomTransformer { .. }
            | TransformError::NotEligible { .. } => ErrorClass::Recoverable,
            TransformError::FileSkipped { .. } => ErrorClass::SkipFile,
            TransformError::MalformedOptions { .. }
            | TransformError::UnknownMessageType { .. }
            | TransformError::UnknownStructure { .. }
            | TransformError::ImportCycle { .. }
            | TransformError::Models { .. } => ErrorClass::Fatal,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.class() == ErrorClass::Recoverable
    }

    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Fatal
    }

    pub(crate) fn unsupported(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TransformError::UnsupportedField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn models(path: impl Into<String>, reason: impl ToString) -> Self {
        TransformError::Models {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
