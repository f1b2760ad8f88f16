use crate::errors::AppError;
use std::env;

/// 署名付き URL のデフォルト有効期限（秒）
pub const DEFAULT_SIGNED_URL_EXPIRATION_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub todos_table: String,
    pub todos_created_at_index: String,
    pub attachment_bucket: String,
    pub signed_url_expiration_secs: u64,
    pub environment: String,
    pub aws_region: String,
    /// DynamoDB Local などのエンドポイント上書き
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を構築する
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let signed_url_expiration_secs = match lookup("SIGNED_URL_EXPIRATION") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Configuration(format!("SIGNED_URL_EXPIRATION が不正です '{raw}': {e}"))
            })?,
            None => DEFAULT_SIGNED_URL_EXPIRATION_SECS,
        };

        if signed_url_expiration_secs == 0 {
            return Err(AppError::Configuration(
                "SIGNED_URL_EXPIRATION は 1 以上を指定してください".to_string(),
            ));
        }

        Ok(Config {
            todos_table: lookup("TODOS_TABLE").unwrap_or_else(|| "todos-dev".to_string()),
            todos_created_at_index: lookup("TODOS_CREATED_AT_INDEX")
                .unwrap_or_else(|| "CreatedAtIndex".to_string()),
            attachment_bucket: lookup("ATTACHMENT_S3_BUCKET")
                .unwrap_or_else(|| "todo-attachments-dev".to_string()),
            signed_url_expiration_secs,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "dev"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.todos_table, "todos-dev");
        assert_eq!(config.todos_created_at_index, "CreatedAtIndex");
        assert_eq!(config.signed_url_expiration_secs, 300);
        assert_eq!(config.aws_region, "us-east-1");
        assert!(config.dynamodb_endpoint.is_none());
        assert!(config.is_development());
    }

    #[test]
    fn test_values_from_environment() {
        let config = Config::from_lookup(lookup_from(&[
            ("TODOS_TABLE", "Todos-prod"),
            ("TODOS_CREATED_AT_INDEX", "OwnerCreatedAt"),
            ("ATTACHMENT_S3_BUCKET", "attachments-prod"),
            ("SIGNED_URL_EXPIRATION", "600"),
            ("ENVIRONMENT", "prod"),
            ("AWS_REGION", "ap-northeast-1"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
        ]))
        .unwrap();

        assert_eq!(config.todos_table, "Todos-prod");
        assert_eq!(config.todos_created_at_index, "OwnerCreatedAt");
        assert_eq!(config.attachment_bucket, "attachments-prod");
        assert_eq!(config.signed_url_expiration_secs, 600);
        assert_eq!(config.aws_region, "ap-northeast-1");
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert!(!config.is_development());
    }

    #[test]
    fn test_invalid_expiration_is_configuration_error() {
        let result = Config::from_lookup(lookup_from(&[("SIGNED_URL_EXPIRATION", "soon")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));

        let result = Config::from_lookup(lookup_from(&[("SIGNED_URL_EXPIRATION", "0")]));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
