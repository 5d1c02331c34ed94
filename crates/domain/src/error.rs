/// Shared error type used across all TableTalk crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    #[error("unknown response type '{0}'")]
    UnknownResponseType(String),

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("operation '{operation}' does not declare an argument '{key}'")]
    InvalidArgumentKey { operation: String, key: String },

    #[error(
        "argument '{key}' of operation '{operation}': expected {expected}, got {actual}"
    )]
    ArgumentTypeMismatch {
        operation: String,
        key: String,
        expected: String,
        actual: String,
    },

    #[error("model gateway gave up after {attempts} attempts: {last_error}")]
    GatewayExhausted { attempts: u32, last_error: String },

    #[error("operation '{operation}' is missing required arguments: {}", missing.join(", "))]
    IncompleteArguments {
        operation: String,
        missing: Vec<String>,
    },

    #[error("{message}")]
    Handler { operation: String, message: String },

    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error reports a violation of the model response
    /// contract (as opposed to a transport or execution failure).
    ///
    /// Contract violations earn a corrective note on the next gateway
    /// attempt; transport failures are retried with the same prompt.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::MalformedOutput(_)
                | Error::UnknownResponseType(_)
                | Error::UnknownOperation(_)
                | Error::InvalidArgumentKey { .. }
                | Error::ArgumentTypeMismatch { .. }
        )
    }

    /// Convenience constructor for handler failures.
    pub fn handler(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Handler {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
