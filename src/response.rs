use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::PipelineError;

/// Structured result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub ok: bool,
    pub status: u16,
    pub body: Value,
}

/// Failure body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&PipelineError> for ErrorBody {
    fn from(err: &PipelineError) -> Self {
        let category = err.category();
        Self {
            error: ErrorDetail {
                code: category.code().to_string(),
                message: category.message().to_string(),
                detail: Some(err.to_string()),
            },
        }
    }
}

impl InvocationResponse {
    pub fn success(body: Value) -> Self {
        Self {
            ok: true,
            status: 200,
            body,
        }
    }

    pub fn failure(err: &PipelineError) -> Self {
        let category = err.category();
        warn!(code = category.code(), error = %err, "invocation_failed");
        let body = serde_json::to_value(ErrorBody::from(err)).unwrap_or(Value::Null);
        Self {
            ok: false,
            status: category.status(),
            body,
        }
    }

    /// Serialize a successful report, or describe the failure.
    pub fn from_result<T: Serialize>(result: Result<T, PipelineError>) -> Self {
        match result {
            Ok(report) => match serde_json::to_value(report) {
                Ok(body) => Self::success(body),
                Err(err) => Self {
                    ok: false,
                    status: 500,
                    body: serde_json::json!({
                        "error": {
                            "code": crate::ErrorCategory::TransformError.code(),
                            "message": crate::ErrorCategory::TransformError.message(),
                            "detail": err.to_string(),
                        }
                    }),
                },
            },
            Err(err) => Self::failure(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use publish::VisualError;
    use serde_json::json;

    #[test]
    fn success_wraps_the_report() {
        let response = InvocationResponse::from_result::<Value>(Ok(json!({"count": 2})));
        assert!(response.ok);
        assert_eq!(response.status, 200);
        assert_eq!(response.body["count"], 2);
    }

    #[test]
    fn missing_file_param_is_a_bad_request() {
        let err = PipelineError::from(VisualError::MissingFileParam);
        let response = InvocationResponse::failure(&err);

        assert!(!response.ok);
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"]["code"], "INVALID_REQUEST");
        assert_eq!(response.body["error"]["message"], "Missing ?file= param");
    }

    #[test]
    fn failure_body_round_trips_through_error_body() {
        let err = PipelineError::from(VisualError::NotFound {
            prefix: "charts/nope".into(),
        });
        let response = InvocationResponse::from_result::<()>(Err(err));
        assert_eq!(response.status, 404);

        let body: ErrorBody = serde_json::from_value(response.body).unwrap();
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.detail.unwrap().contains("charts/nope"));
    }
}
