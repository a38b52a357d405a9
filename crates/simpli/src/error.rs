//! Error types

use simpli_dom::DomError;
use simpli_html::HtmlError;

pub type Result<T> = std::result::Result<T, SimpliError>;

/// Library error
#[derive(Debug, thiserror::Error)]
pub enum SimpliError {
    /// Malformed type descriptor (a programming error, never a value mismatch)
    #[error("Invalid type descriptor, {0}")]
    InvalidDescriptor(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Invalid selector, {0}")]
    InvalidSelector(String),

    #[error("Invalid DOM object, {0}")]
    InvalidDomObject(String),

    #[error("{method}() is not supported on a collection")]
    UnsupportedOnCollection { method: String },

    #[error("{method}() is not supported on a single element")]
    UnsupportedOnElement { method: String },

    #[error("Event listening is not supported")]
    EventListeningUnsupported,

    #[error("{class} has no method {method}()")]
    UnknownMethod { method: String, class: String },

    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl SimpliError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        SimpliError::InvalidArgument(message.into())
    }

    pub(crate) fn unsupported_on_collection(method: &str) -> Self {
        SimpliError::UnsupportedOnCollection {
            method: method.to_string(),
        }
    }
}
