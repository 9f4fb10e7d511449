use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard JSON response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Individual violations when a request fails validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a success response wrapping the given data.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    /// Creates an error response with the given message.
    pub fn err(error_msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error_msg.into()),
            errors: None,
        }
    }

    /// Creates an error response carrying every violation found.
    pub fn invalid(error_msg: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error_msg.into()),
            errors: Some(errors),
        }
    }
}

/// Response for the `/headpat` health check endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct HeadpatResponse {
    pub message: &'static str,
}
