/// Everything that can go wrong between a user action and a rendered region.
///
/// None of these are fatal: the controller logs them and turns them into a
/// transient notification.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// The request never produced a response (offline, CORS, aborted).
    Network(String),
    /// The server answered with a non-2xx status, optionally carrying `{error}`.
    Http { status: u16, message: Option<String> },
    /// The body was not the JSON we expected.
    Parse(String),
    /// Client-side form checks rejected the input before any request was made.
    Validation(String),
}

impl AppError {
    /// Text shown to the user: the server's own error string or the
    /// validation message when there is one, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Http { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            AppError::Validation(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network Error: {}", msg),
            AppError::Http { status, message: Some(msg) } => {
                write!(f, "HTTP Error {}: {}", status, msg)
            }
            AppError::Http { status, message: None } => write!(f, "HTTP Error {}", status),
            AppError::Parse(msg) => write!(f, "Parse Error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

pub type ApiResult<T> = Result<T, AppError>;
