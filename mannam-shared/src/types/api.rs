use serde::{Deserialize, Serialize};

/// Success envelope every handler returns: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error envelope, produced by the `AppError` response mapping.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

/// `GET /health` body. The service is either up and answering or it is not;
/// liveness of the database and the broker is the orchestrator's concern.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: "healthy",
            service: service.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_wraps_data() {
        let json = serde_json::to_value(ApiResponse::ok(serde_json::json!({ "n": 1 }))).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["n"], 1);
    }

    #[test]
    fn error_envelope_carries_code_and_optional_details() {
        let plain = serde_json::to_value(ApiErrorResponse::new("E0003", "not found")).unwrap();
        assert_eq!(plain["success"], false);
        assert_eq!(plain["error"]["code"], "E0003");
        assert!(plain["error"].get("details").is_none());

        let detailed = serde_json::to_value(
            ApiErrorResponse::new("E3001", "answer more questions")
                .with_details(serde_json::json!({ "answered": 2 })),
        )
        .unwrap();
        assert_eq!(detailed["error"]["details"]["answered"], 2);
    }

    #[test]
    fn health_reports_service_and_version() {
        let json = serde_json::to_value(HealthResponse::healthy("mannam-api", "0.1.0")).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "mannam-api");
        assert_eq!(json["version"], "0.1.0");
    }
}
