use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use domain::{AttachmentStorage, TodoError, TodoId};
use shared::telemetry::trace_store_operation;
use shared::Config;
use std::time::Duration;
use tracing::info;

/// S3 の署名付き PUT URL を発行する添付ファイルストレージ
#[derive(Clone)]
pub struct S3AttachmentStorage {
    client: Client,
    bucket: String,
    url_expiration: Duration,
}

impl S3AttachmentStorage {
    pub fn new(sdk_config: &SdkConfig, config: &Config) -> Self {
        Self::from_client(
            Client::new(sdk_config),
            &config.attachment_bucket,
            Duration::from_secs(config.signed_url_expiration_secs),
        )
    }

    pub fn from_client(client: Client, bucket: impl Into<String>, url_expiration: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            url_expiration,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// 添付 ID からオブジェクトキーを導出する
    pub fn object_key(attachment_id: &str) -> String {
        attachment_id.to_string()
    }
}

#[async_trait]
impl AttachmentStorage for S3AttachmentStorage {
    async fn generate_upload_url(
        &self,
        attachment_id: &str,
        item_id: &TodoId,
    ) -> Result<String, TodoError> {
        let key = Self::object_key(attachment_id);

        let presigning_config = PresigningConfig::expires_in(self.url_expiration)
            .map_err(|e| TodoError::S3(format!("不正な署名付きURL設定: {e}")))?;

        let presigned = trace_store_operation(&self.bucket, "PresignPutObject", async {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(&key)
                .presigned(presigning_config)
                .await
                .map_err(|e| {
                    TodoError::S3(format!("PutObject presign failed: {}", DisplayErrorContext(&e)))
                })
        })
        .await?;

        info!(
            "アップロードURL発行: item_id={}, key={}, expires_in_secs={}",
            item_id,
            key,
            self.url_expiration.as_secs()
        );

        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    fn offline_storage(expiration_secs: u64) -> S3AttachmentStorage {
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new(
                "AKIDEXAMPLE",
                "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
                None,
                None,
                "test",
            ))
            .build();

        S3AttachmentStorage::from_client(
            Client::from_conf(s3_config),
            "todo-attachments-test",
            Duration::from_secs(expiration_secs),
        )
    }

    #[tokio::test]
    async fn test_generate_upload_url_is_presigned_put() {
        let storage = offline_storage(300);
        let item_id = TodoId::new();

        let url = storage
            .generate_upload_url("attachment-123", &item_id)
            .await
            .unwrap();

        assert!(url.starts_with("https://"));
        assert!(url.contains("todo-attachments-test"));
        assert!(url.contains("attachment-123"));
        assert!(url.contains("X-Amz-Expires=300"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_expiration_comes_from_configuration() {
        let storage = offline_storage(60);
        let url = storage
            .generate_upload_url("attachment-456", &TodoId::new())
            .await
            .unwrap();

        assert!(url.contains("X-Amz-Expires=60"));
    }

    #[test]
    fn test_object_key_is_attachment_id() {
        assert_eq!(S3AttachmentStorage::object_key("abc"), "abc");
    }
}
