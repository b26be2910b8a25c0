use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use vitals_guide_domain::device::DeviceError;
use vitals_guide_domain::entities::{HistoryEntry, VitalsError};
use vitals_guide_domain::services::VitalsServiceError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a not found error response
    pub fn not_found(resource: &str) -> Self {
        Self {
            error: "not_found".to_string(),
            message: format!("The requested {} could not be found", resource),
            details: None,
        }
    }

    /// Create a validation error response
    pub fn validation_error(message: &str, details: Option<serde_json::Value>) -> Self {
        Self {
            error: "validation_error".to_string(),
            message: message.to_string(),
            details,
        }
    }

    /// Create a bad request error response
    pub fn bad_request(message: &str) -> Self {
        Self {
            error: "bad_request".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create a conflict error response
    pub fn conflict(message: &str) -> Self {
        Self {
            error: "conflict".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an unprocessable entity response for requests that need more data
    pub fn insufficient_data(message: &str) -> Self {
        Self {
            error: "insufficient_data".to_string(),
            message: message.to_string(),
            details: None,
        }
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            details: None,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "bad_request" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "insufficient_data" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<VitalsServiceError> for ErrorResponse {
    fn from(err: VitalsServiceError) -> Self {
        match err {
            VitalsServiceError::ValidationError(msg) => {
                warn!("Rejected vitals request: {}", msg);
                Self::validation_error(&msg, None)
            }
            VitalsServiceError::NotFound(_) => Self::not_found("vitals snapshot"),
            VitalsServiceError::InsufficientData(msg) => Self::insufficient_data(&msg),
            VitalsServiceError::RepositoryError(msg) => {
                error!("Vitals service failure: {}", msg);
                Self::internal_error()
            }
        }
    }
}

impl From<VitalsError> for ErrorResponse {
    fn from(err: VitalsError) -> Self {
        Self::validation_error(&err.to_string(), None)
    }
}

impl From<DeviceError> for ErrorResponse {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NotConnected => Self::not_found("connected device"),
            DeviceError::UnknownDevice(id) => Self::not_found(&format!("device {}", id)),
            DeviceError::AlreadyConnected(_) => Self::conflict(&err.to_string()),
        }
    }
}

/// Flatten validator errors into one message, field by field
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();
    fields.sort();
    fields.join("; ")
}

/// Run validator derive checks on a request body
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ErrorResponse> {
    request.validate().map_err(|errors| {
        let message = validation_message(&errors);
        warn!("Invalid request body: {}", message);
        ErrorResponse::validation_error(&message, None)
    })
}

/// Paginated response
#[derive(Debug, Serialize, ToSchema)]
#[aliases(HistoryPage = PaginatedResponse<HistoryEntry>)]
pub struct PaginatedResponse<T> {
    /// Total count of items available
    pub total_count: usize,

    /// Current offset
    pub offset: usize,

    /// Current limit
    pub limit: usize,

    /// URL for the next page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// URL for the previous page (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,

    /// Actual data items
    pub data: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(range(min = 1, max = 10, message = "Count must be between 1 and 10"))]
        count: u32,
    }

    #[test]
    fn test_validation_message_names_the_field() {
        let err = validate_request(&Sample { count: 11 }).unwrap_err();
        assert_eq!(err.error, "validation_error");
        assert_eq!(err.message, "count: Count must be between 1 and 10");
        assert!(validate_request(&Sample { count: 5 }).is_ok());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorResponse::not_found("x").into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorResponse::conflict("x").into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorResponse::insufficient_data("x").into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ErrorResponse::internal_error().into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_service_errors_map_to_responses() {
        let response: ErrorResponse = VitalsServiceError::InsufficientData("empty".to_string()).into();
        assert_eq!(response.error, "insufficient_data");

        let response: ErrorResponse = DeviceError::AlreadyConnected("dev".to_string()).into();
        assert_eq!(response.error, "conflict");

        let response: ErrorResponse = DeviceError::UnknownDevice("dev".to_string()).into();
        assert_eq!(response.error, "not_found");
    }
}
