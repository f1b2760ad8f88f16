use serde::Serialize;
use serde_json::Value;
use shared::{AppError, ErrorResponse};
use std::collections::HashMap;
use tracing::error;

/// API Gateway プロキシレスポンス構造体
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

fn cors_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        "Content-Type,Authorization".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string(),
    );
    headers
}

/// 成功レスポンスを作成
pub fn create_success_response(status_code: u16, body: Value) -> ApiGatewayProxyResponse {
    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    ApiGatewayProxyResponse {
        status_code,
        headers,
        body: body.to_string(),
    }
}

/// ボディなしのレスポンスを作成（204 など）
pub fn create_empty_response(status_code: u16) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code,
        headers: cors_headers(),
        body: String::new(),
    }
}

/// エラーレスポンスを作成
pub fn create_error_response(
    err: &AppError,
    request_id: &str,
    include_details: bool,
) -> ApiGatewayProxyResponse {
    err.log(request_id);

    let body = ErrorResponse::from_app_error(err, request_id.to_string(), include_details)
        .to_json()
        .unwrap_or_else(|e| {
            error!("エラーレスポンスのシリアライズ失敗: {}", e);
            r#"{"code":"INTERNAL_ERROR","message":"内部エラーが発生しました"}"#.to_string()
        });

    let mut headers = cors_headers();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    ApiGatewayProxyResponse {
        status_code: err.http_status_code(),
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::TodoError;
    use serde_json::json;

    #[test]
    fn test_create_success_response() {
        let response = create_success_response(201, json!({"message": "成功"}));

        assert_eq!(response.status_code, 201);
        assert_eq!(
            response.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(
            response.headers.get("Access-Control-Allow-Origin"),
            Some(&"*".to_string())
        );
        assert!(response.body.contains("成功"));
    }

    #[test]
    fn test_create_empty_response() {
        let response = create_empty_response(204);

        assert_eq!(response.status_code, 204);
        assert!(response.body.is_empty());
        assert!(!response.headers.contains_key("Content-Type"));
        assert!(response
            .headers
            .contains_key("Access-Control-Allow-Methods"));
    }

    #[test]
    fn test_create_error_response() {
        let err = AppError::from(TodoError::Forbidden {
            item_id: "t1".to_string(),
            owner_id: "u2".to_string(),
        });
        let response = create_error_response(&err, "req-1", false);

        assert_eq!(response.status_code, 403);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["code"], err.metadata().code);
        assert_eq!(body["request_id"], "req-1");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_error_details_only_when_requested() {
        let err = AppError::Internal("boom".to_string());
        let response = create_error_response(&err, "req-2", true);

        assert_eq!(response.status_code, 500);
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert!(body["details"].as_str().unwrap().contains("boom"));
    }
}
