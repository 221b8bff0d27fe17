use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Body returned to Martian Pay for every delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub code: i32,
    pub msg: String,
}

impl WebhookResponse {
    pub fn success() -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
        }
    }

    /// `code` mirrors the HTTP status.
    pub fn error(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code: i32::from(status.as_u16()),
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let body = serde_json::to_value(WebhookResponse::success()).unwrap();
        assert_eq!(body, serde_json::json!({"code": 0, "msg": "success"}));
    }

    #[test]
    fn error_code_mirrors_status() {
        let r = WebhookResponse::error(StatusCode::UNAUTHORIZED, "webhook is not signed");
        assert_eq!(r.code, 401);
    }
}
