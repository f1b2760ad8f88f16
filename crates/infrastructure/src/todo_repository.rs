use crate::error::{map_delete_item_error, map_dynamodb_error, map_update_item_error};
use crate::models::{attributes::*, item_to_todo, todo_to_item};
use crate::DynamoDbClient;
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use domain::{format_timestamp, TodoError, TodoId, TodoItem, TodoRepository, TodoUpdate};
use shared::telemetry::trace_store_operation;
use tracing::{debug, info};

/// DynamoDB 上の ToDo テーブルに対するリポジトリ
///
/// 主キー `itemId`、セカンダリインデックス `(ownerId, createdAt)` を前提とする。
#[derive(Clone)]
pub struct DynamoDbTodoRepository {
    db: DynamoDbClient,
}

impl DynamoDbTodoRepository {
    pub fn new(db: DynamoDbClient) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoRepository for DynamoDbTodoRepository {
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<TodoItem>, TodoError> {
        info!("ToDo一覧を取得中: owner_id={}", owner_id);

        let output = trace_store_operation(self.db.table_name(), "Query", async {
            self.db
                .client()
                .query()
                .table_name(self.db.table_name())
                .index_name(self.db.created_at_index())
                .key_condition_expression("#ownerId = :ownerId")
                .expression_attribute_names("#ownerId", OWNER_ID)
                .expression_attribute_values(":ownerId", AttributeValue::S(owner_id.to_string()))
                .send()
                .await
                .map_err(|e| map_dynamodb_error(e, "Query"))
        })
        .await?;

        let todos = output
            .items()
            .iter()
            .map(item_to_todo)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("ToDo一覧取得完了: {} 件", todos.len());
        Ok(todos)
    }

    async fn get_by_id(&self, item_id: &TodoId) -> Result<Option<TodoItem>, TodoError> {
        let output = trace_store_operation(self.db.table_name(), "GetItem", async {
            self.db
                .client()
                .get_item()
                .table_name(self.db.table_name())
                .key(ITEM_ID, AttributeValue::S(item_id.to_string()))
                .send()
                .await
                .map_err(|e| map_dynamodb_error(e, "GetItem"))
        })
        .await?;

        output.item().map(item_to_todo).transpose()
    }

    async fn put(&self, item: TodoItem) -> Result<TodoItem, TodoError> {
        trace_store_operation(self.db.table_name(), "PutItem", async {
            self.db
                .client()
                .put_item()
                .table_name(self.db.table_name())
                .set_item(Some(todo_to_item(&item)))
                .send()
                .await
                .map_err(|e| map_dynamodb_error(e, "PutItem"))
        })
        .await?;

        debug!("ToDo保存完了: item_id={}", item.item_id);
        Ok(item)
    }

    async fn update(&self, item_id: &TodoId, update: &TodoUpdate) -> Result<(), TodoError> {
        if update.is_empty() {
            debug!("更新対象のフィールドがありません: item_id={}", item_id);
            return Ok(());
        }

        // 削除済みアイテムを部分的に再作成しないよう存在を条件にする
        let mut request = self
            .db
            .client()
            .update_item()
            .table_name(self.db.table_name())
            .key(ITEM_ID, AttributeValue::S(item_id.to_string()))
            .condition_expression("attribute_exists(#itemId)")
            .expression_attribute_names("#itemId", ITEM_ID);

        let mut assignments = Vec::new();

        if let Some(name) = &update.name {
            assignments.push("#name = :name");
            request = request
                .expression_attribute_names("#name", NAME)
                .expression_attribute_values(":name", AttributeValue::S(name.clone()));
        }

        if let Some(due_date) = &update.due_date {
            assignments.push("#dueDate = :dueDate");
            request = request
                .expression_attribute_names("#dueDate", DUE_DATE)
                .expression_attribute_values(
                    ":dueDate",
                    AttributeValue::S(format_timestamp(due_date)),
                );
        }

        if let Some(done) = update.done {
            assignments.push("#done = :done");
            request = request
                .expression_attribute_names("#done", DONE)
                .expression_attribute_values(":done", AttributeValue::Bool(done));
        }

        let request = request.update_expression(format!("SET {}", assignments.join(", ")));

        trace_store_operation(self.db.table_name(), "UpdateItem", async {
            request
                .send()
                .await
                .map_err(|e| map_update_item_error(e, item_id))
        })
        .await?;

        debug!("ToDo更新完了: item_id={}", item_id);
        Ok(())
    }

    async fn delete(&self, owner_id: &str, item_id: &TodoId) -> Result<(), TodoError> {
        trace_store_operation(self.db.table_name(), "DeleteItem", async {
            self.db
                .client()
                .delete_item()
                .table_name(self.db.table_name())
                .key(ITEM_ID, AttributeValue::S(item_id.to_string()))
                .condition_expression("attribute_not_exists(#itemId) OR #ownerId = :ownerId")
                .expression_attribute_names("#itemId", ITEM_ID)
                .expression_attribute_names("#ownerId", OWNER_ID)
                .expression_attribute_values(":ownerId", AttributeValue::S(owner_id.to_string()))
                .send()
                .await
                .map_err(|e| map_delete_item_error(e, owner_id, item_id))
        })
        .await?;

        debug!("ToDo削除完了: item_id={}", item_id);
        Ok(())
    }
}
