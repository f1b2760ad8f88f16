use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use domain::{TodoError, TodoId};
use std::error::Error;
use std::fmt::Debug;

/// SDK エラーを分類せずに TodoError::DynamoDb へ変換
pub fn map_dynamodb_error<E, R>(err: SdkError<E, R>, operation: &str) -> TodoError
where
    E: Error + Send + Sync + 'static,
    R: Debug + Send + Sync + 'static,
{
    TodoError::DynamoDb(format!("{operation} failed: {}", DisplayErrorContext(&err)))
}

/// UpdateItem の条件チェック失敗は対象が削除済みであることを示す
pub fn map_update_item_error<R>(err: SdkError<UpdateItemError, R>, item_id: &TodoId) -> TodoError
where
    R: Debug + Send + Sync + 'static,
{
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => {
            TodoError::NotFound(item_id.to_string())
        }
        err => TodoError::DynamoDb(format!("UpdateItem failed: {}", DisplayErrorContext(&err))),
    }
}

/// DeleteItem の条件チェック失敗は所有者の不一致を示す
pub fn map_delete_item_error<R>(
    err: SdkError<DeleteItemError, R>,
    owner_id: &str,
    item_id: &TodoId,
) -> TodoError
where
    R: Debug + Send + Sync + 'static,
{
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => TodoError::Forbidden {
            item_id: item_id.to_string(),
            owner_id: owner_id.to_string(),
        },
        err => TodoError::DynamoDb(format!("DeleteItem failed: {}", DisplayErrorContext(&err))),
    }
}
