//! Uniform response envelope.

use serde::Serialize;

/// Envelope wrapping every API response.
///
/// Callers must test `success`; the message is for humans and never a
/// reliable signal of the outcome.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }
}

impl ApiResponse<()> {
    /// Failed envelope with no data.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::ok(42, "done")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 42);

        let err = serde_json::to_value(ApiResponse::error("nope")).unwrap();
        assert_eq!(err["success"], false);
        assert!(err["data"].is_null());
        assert_eq!(err["message"], "nope");
    }
}
