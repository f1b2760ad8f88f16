use domain::TodoError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// アプリケーション全体で使用される包括的なエラー型
#[derive(Debug, Clone, Error)]
pub enum AppError {
    // ドメインエラー
    #[error("Todo error: {0}")]
    Todo(#[from] TodoError),

    // 入力エラー
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // 認証エラー（トークン検証は Authorizer 側で実施済み）
    #[error("Authentication failed: {0}")]
    Authentication(String),

    // ルーティング
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    // システムエラー
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// エラーの分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCategory {
    /// クライアントエラー（4xx相当）
    Client,
    /// サーバーエラー（5xx相当）
    Server,
}

/// エラーの重要度
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// エラーメタデータ
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
}

impl ErrorMetadata {
    fn new(code: &'static str, category: ErrorCategory, severity: ErrorSeverity) -> Self {
        Self {
            code,
            category,
            severity,
        }
    }
}

impl AppError {
    /// エラーメタデータを取得
    pub fn metadata(&self) -> ErrorMetadata {
        use ErrorCategory::*;
        use ErrorSeverity::*;

        match self {
            AppError::Todo(TodoError::NotFound(_)) => ErrorMetadata::new("NOT_FOUND", Client, Info),
            AppError::Todo(TodoError::Forbidden { .. }) => {
                ErrorMetadata::new("FORBIDDEN", Client, Warning)
            }
            AppError::Todo(TodoError::Validation(_)) | AppError::Validation(_) => {
                ErrorMetadata::new("VALIDATION_ERROR", Client, Info)
            }
            AppError::Todo(TodoError::DynamoDb(_)) => {
                ErrorMetadata::new("DYNAMODB_ERROR", Server, Error)
            }
            AppError::Todo(TodoError::S3(_)) => ErrorMetadata::new("S3_ERROR", Server, Error),
            AppError::Deserialization(_) => {
                ErrorMetadata::new("INVALID_REQUEST_BODY", Client, Info)
            }
            AppError::Authentication(_) => {
                ErrorMetadata::new("AUTHENTICATION_ERROR", Client, Warning)
            }
            AppError::RouteNotFound(_) => ErrorMetadata::new("ROUTE_NOT_FOUND", Client, Info),
            AppError::Serialization(_) => {
                ErrorMetadata::new("SERIALIZATION_ERROR", Server, Error)
            }
            AppError::Configuration(_) => {
                ErrorMetadata::new("CONFIGURATION_ERROR", Server, Critical)
            }
            AppError::Internal(_) => ErrorMetadata::new("INTERNAL_ERROR", Server, Critical),
        }
    }

    /// HTTPステータスコードを取得
    pub fn http_status_code(&self) -> u16 {
        match self.metadata().category {
            ErrorCategory::Client => match self {
                AppError::Todo(TodoError::NotFound(_)) | AppError::RouteNotFound(_) => 404,
                AppError::Todo(TodoError::Forbidden { .. }) => 403,
                AppError::Authentication(_) => 401,
                _ => 400,
            },
            ErrorCategory::Server => 500,
        }
    }

    /// ユーザー向けメッセージを取得
    pub fn user_message(&self) -> String {
        match self {
            AppError::Todo(TodoError::NotFound(_)) => "ToDoが見つかりません".to_string(),
            AppError::Todo(TodoError::Forbidden { .. }) => {
                "このToDoを操作する権限がありません".to_string()
            }
            AppError::Todo(TodoError::Validation(msg)) | AppError::Validation(msg) => {
                format!("入力データが無効です: {msg}")
            }
            AppError::Deserialization(_) => "リクエストボディを解析できません".to_string(),
            AppError::Authentication(_) => "認証に失敗しました".to_string(),
            AppError::RouteNotFound(_) => "リソースが見つかりません".to_string(),
            _ => "予期しないエラーが発生しました".to_string(),
        }
    }

    /// 重要度に応じたレベルでエラーを記録
    pub fn log(&self, request_id: &str) {
        let metadata = self.metadata();
        match metadata.severity {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                tracing::error!(error = %self, code = metadata.code, request_id, "Request failed");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %self, code = metadata.code, request_id, "Request rejected");
            }
            ErrorSeverity::Info => {
                tracing::info!(error = %self, code = metadata.code, request_id, "Request rejected");
            }
        }
    }
}

/// 標準化されたエラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// エラーコード
    pub code: String,
    /// ユーザー向けメッセージ
    pub message: String,
    /// 詳細情報（開発環境のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub request_id: String,
    pub timestamp: String,
}

impl ErrorResponse {
    /// AppErrorからErrorResponseを作成
    pub fn from_app_error(error: &AppError, request_id: String, include_details: bool) -> Self {
        Self {
            code: error.metadata().code.to_string(),
            message: error.user_message(),
            details: include_details.then(|| error.to_string()),
            request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string(self).map_err(|e| AppError::Serialization(e.to_string()))
    }
}
