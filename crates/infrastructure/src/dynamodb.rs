use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::Client;
use shared::Config;

/// 設定から AWS SDK 共通設定を読み込む
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await
}

/// テーブル名とインデックス名を保持する DynamoDB クライアント
#[derive(Clone)]
pub struct DynamoDbClient {
    client: Client,
    table_name: String,
    created_at_index: String,
}

impl DynamoDbClient {
    pub fn new(sdk_config: &SdkConfig, config: &Config) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint) = &config.dynamodb_endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self::from_client(
            Client::from_conf(builder.build()),
            &config.todos_table,
            &config.todos_created_at_index,
        )
    }

    pub fn from_client(
        client: Client,
        table_name: impl Into<String>,
        created_at_index: impl Into<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            created_at_index: created_at_index.into(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn created_at_index(&self) -> &str {
        &self.created_at_index
    }
}
