use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlacerError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Parse error in {file} at line {line}: {message}")]
    ParseError {
        file: String,
        line: usize,
        message: String,
    },

    #[error("Reference error: place {id} referenced by {file} is not in the roster")]
    ReferenceError { id: i64, file: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),
}

/// 錯誤分類，對應到 CLI 的退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Parse,
    Reference,
    InvalidArgument,
    Io,
}

impl PlacerError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn parse(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ParseError { .. } => ErrorCategory::Parse,
            Self::ReferenceError { .. } => ErrorCategory::Reference,
            Self::InvalidArgument { .. } | Self::ConfigError { .. } => {
                ErrorCategory::InvalidArgument
            }
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => ErrorCategory::Io,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::InvalidArgument => 1,
            ErrorCategory::NotFound => 2,
            ErrorCategory::Parse => 3,
            ErrorCategory::Reference => 4,
            ErrorCategory::Io => 5,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { message } => format!("Nothing to read: {}", message),
            Self::ParseError { file, line, .. } => {
                format!("{} has a malformed line ({})", file, line)
            }
            Self::ReferenceError { id, file } => {
                format!("{} mentions place {}, which is not in the roster", file, id)
            }
            Self::InvalidArgument { message } => message.clone(),
            Self::ConfigError { field, message } => format!("{}: {}", field, message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::NotFound => "Check that the directory holds a roster file and placement records",
            ErrorCategory::Parse => "Fix the reported line; roster lines are `id score description`, extra lines are `id delta`",
            ErrorCategory::Reference => "Add the place to the roster or remove the stale record",
            ErrorCategory::InvalidArgument => "Check the command line and placer.toml",
            ErrorCategory::Io => "Check file permissions and free disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, PlacerError>;
