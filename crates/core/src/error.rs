//! Error types shared across crates

use thiserror::Error;

/// Retrieval handler errors
///
/// Handlers are looked up by name, so an unknown name is reported here
/// rather than at dispatch time.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandlerError {
    #[error("Handler not found: {0}")]
    NotFound(String),

    #[error("Handler '{handler}' failed: {message}")]
    Execution { handler: String, message: String },
}

impl HandlerError {
    pub fn execution(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            handler: handler.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_display() {
        let err = HandlerError::execution("loan_details", "datastore offline");
        assert_eq!(err.to_string(), "Handler 'loan_details' failed: datastore offline");
        assert_eq!(
            HandlerError::NotFound("get_weather".to_string()).to_string(),
            "Handler not found: get_weather"
        );
    }
}
