use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingField,
    InvalidField,
    UnsupportedAsset,
    UnresolvedAsset,
    AlreadyBroadcast,
    BroadcastInFlight,
    StagedNotFound,
    DaemonRejected,
    NodeRpcError,
    UnexpectedResponse,
    StorageError,
    SerializationError,
    ConfigError,
    Message,
}

/// Coarse classification used by callers deciding whether a failure ever reached the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local pre-flight failure; no RPC call was made.
    Validation,
    /// The daemon returned `{error}` or the transport failed.
    Daemon,
    /// The key-value store could not be read or written.
    Persistence,
    Internal,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("unsupported asset: {details}")]
    UnsupportedAsset { details: String },

    #[error("could not recognise the {side} side of the offer; enter the currency and amount manually")]
    UnresolvedAsset { side: String },

    #[error("staged definition {define_txid} was already broadcast as {txid}")]
    AlreadyBroadcast { define_txid: String, txid: String },

    #[error("staged definition {0} is already being broadcast")]
    BroadcastInFlight(String),

    #[error("no staged definition with txid {0}")]
    StagedNotFound(String),

    #[error("daemon rejected {command}: {message}")]
    DaemonRejected { command: String, message: String },

    #[error("node RPC error: {0}")]
    NodeRpcError(String),

    #[error("unexpected {command} response: {details}")]
    UnexpectedResponse { command: String, details: String },

    #[error("storage error during {operation}: {details}")]
    StorageError { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, DeskError>;

impl DeskError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DeskError::MissingField { .. } => ErrorCode::MissingField,
            DeskError::InvalidField { .. } => ErrorCode::InvalidField,
            DeskError::UnsupportedAsset { .. } => ErrorCode::UnsupportedAsset,
            DeskError::UnresolvedAsset { .. } => ErrorCode::UnresolvedAsset,
            DeskError::AlreadyBroadcast { .. } => ErrorCode::AlreadyBroadcast,
            DeskError::BroadcastInFlight(_) => ErrorCode::BroadcastInFlight,
            DeskError::StagedNotFound(_) => ErrorCode::StagedNotFound,
            DeskError::DaemonRejected { .. } => ErrorCode::DaemonRejected,
            DeskError::NodeRpcError(_) => ErrorCode::NodeRpcError,
            DeskError::UnexpectedResponse { .. } => ErrorCode::UnexpectedResponse,
            DeskError::StorageError { .. } => ErrorCode::StorageError,
            DeskError::SerializationError { .. } => ErrorCode::SerializationError,
            DeskError::ConfigError(_) => ErrorCode::ConfigError,
            DeskError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code() {
            ErrorCode::MissingField
            | ErrorCode::InvalidField
            | ErrorCode::UnsupportedAsset
            | ErrorCode::UnresolvedAsset
            | ErrorCode::AlreadyBroadcast
            | ErrorCode::BroadcastInFlight
            | ErrorCode::StagedNotFound => ErrorKind::Validation,
            ErrorCode::DaemonRejected | ErrorCode::NodeRpcError | ErrorCode::UnexpectedResponse => ErrorKind::Daemon,
            ErrorCode::StorageError => ErrorKind::Persistence,
            ErrorCode::SerializationError | ErrorCode::ConfigError | ErrorCode::Message => ErrorKind::Internal,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), kind: self.kind(), message: self.to_string() }
    }

    /// Operator-facing text. A returned `{error}` object and a transport failure read the same way.
    pub fn user_message(&self) -> String {
        match self {
            DeskError::DaemonRejected { message, .. } => message.clone(),
            DeskError::NodeRpcError(message) => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        DeskError::MissingField { field: field.into() }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DeskError::InvalidField { field: field.into(), reason: reason.into() }
    }

    pub fn daemon_rejected(command: impl Into<String>, message: impl Into<String>) -> Self {
        DeskError::DaemonRejected { command: command.into(), message: message.into() }
    }

    pub fn unexpected_response(command: impl Into<String>, details: impl Into<String>) -> Self {
        DeskError::UnexpectedResponse { command: command.into(), details: details.into() }
    }
}

#[macro_export]
macro_rules! storage_err {
    ($op:expr, $err:expr) => {
        $crate::foundation::DeskError::StorageError { operation: $op.into(), details: $err.to_string() }
    };
}

#[macro_export]
macro_rules! serde_err {
    ($fmt:expr, $err:expr) => {
        $crate::foundation::DeskError::SerializationError { format: $fmt.into(), details: $err.to_string() }
    };
}

impl From<io::Error> for DeskError {
    fn from(err: io::Error) -> Self {
        DeskError::StorageError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<rocksdb::Error> for DeskError {
    fn from(err: rocksdb::Error) -> Self {
        DeskError::StorageError { operation: "rocksdb".to_string(), details: err.to_string() }
    }
}

impl From<reqwest::Error> for DeskError {
    fn from(err: reqwest::Error) -> Self {
        DeskError::NodeRpcError(err.to_string())
    }
}

impl From<figment::Error> for DeskError {
    fn from(err: figment::Error) -> Self {
        DeskError::ConfigError(format!("config extraction failed: {err}"))
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `DeskError` variants at the call site to preserve context.
