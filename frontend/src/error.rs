use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },
    #[error("could not read response: {0}")]
    Decode(String),
    #[error("request rejected: {0:?}")]
    Rejected(Option<String>),
    #[error("no active session")]
    MissingSession,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text shown in a banner. Backend messages win over the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ApiError::Rejected(Some(message)) if !message.trim().is_empty() => message.clone(),
            ApiError::MissingSession => "Please sign in again.".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_preferred() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Email already taken".to_string()),
        };
        assert_eq!(err.user_message("Registration failed"), "Email already taken");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn fallback_for_blank_or_network() {
        let blank = ApiError::Status {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message("Login failed"), "Login failed");
        assert_eq!(
            ApiError::Network("offline".into()).user_message("Login failed"),
            "Login failed"
        );
        assert_eq!(ApiError::Decode("eof".into()).status(), None);
        assert_eq!(
            ApiError::Rejected(None).user_message("Login failed"),
            "Login failed"
        );
    }

    #[test]
    fn rejection_carries_backend_text() {
        let err = ApiError::Rejected(Some("Invalid credentials".into()));
        assert_eq!(err.user_message("Login failed"), "Invalid credentials");
        assert_eq!(
            ApiError::MissingSession.user_message("x"),
            "Please sign in again."
        );
    }
}
