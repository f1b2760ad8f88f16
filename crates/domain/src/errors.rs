use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Todo {item_id} does not belong to user {owner_id}")]
    Forbidden { item_id: String, owner_id: String },

    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    #[error("S3 error: {0}")]
    S3(String),
}

impl TodoError {
    /// ストア（DynamoDB / S3）由来のエラーかどうか
    pub fn is_store_failure(&self) -> bool {
        matches!(self, TodoError::DynamoDb(_) | TodoError::S3(_))
    }
}
