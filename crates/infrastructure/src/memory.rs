//! テスト用のインメモリ ToDo リポジトリ
//!
//! インデックス順の取得、冪等な削除、存在条件付きの更新は DynamoDB 実装に合わせている。

use async_trait::async_trait;
use domain::{TodoError, TodoId, TodoItem, TodoRepository, TodoUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    items: Arc<RwLock<HashMap<TodoId, TodoItem>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<TodoItem>, TodoError> {
        let items = self.items.read().await;
        let mut todos: Vec<TodoItem> = items
            .values()
            .filter(|todo| todo.is_owned_by(owner_id))
            .cloned()
            .collect();

        // (ownerId, createdAt) インデックスと同じ昇順
        todos.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        Ok(todos)
    }

    async fn get_by_id(&self, item_id: &TodoId) -> Result<Option<TodoItem>, TodoError> {
        Ok(self.items.read().await.get(item_id).cloned())
    }

    async fn put(&self, item: TodoItem) -> Result<TodoItem, TodoError> {
        self.items
            .write()
            .await
            .insert(item.item_id.clone(), item.clone());
        Ok(item)
    }

    async fn update(&self, item_id: &TodoId, update: &TodoUpdate) -> Result<(), TodoError> {
        let mut items = self.items.write().await;
        match items.get_mut(item_id) {
            Some(todo) => {
                todo.apply(update);
                Ok(())
            }
            None => Err(TodoError::NotFound(item_id.to_string())),
        }
    }

    async fn delete(&self, owner_id: &str, item_id: &TodoId) -> Result<(), TodoError> {
        let mut items = self.items.write().await;
        match items.get(item_id) {
            None => Ok(()),
            Some(todo) if todo.is_owned_by(owner_id) => {
                items.remove(item_id);
                Ok(())
            }
            Some(_) => Err(TodoError::Forbidden {
                item_id: item_id.to_string(),
                owner_id: owner_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_query_by_owner_filters_and_orders_by_created_at() {
        let repo = InMemoryTodoRepository::new();

        let mut later = TodoItem::new("user-1", "later");
        let mut earlier = TodoItem::new("user-1", "earlier");
        earlier.created_at = later.created_at - Duration::seconds(10);
        later.created_at += Duration::seconds(10);
        let other = TodoItem::new("user-2", "someone else");

        repo.put(later).await.unwrap();
        repo.put(earlier).await.unwrap();
        repo.put(other).await.unwrap();

        let todos = repo.query_by_owner("user-1").await.unwrap();
        let names: Vec<_> = todos.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["earlier", "later"]);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_item() {
        let repo = InMemoryTodoRepository::new();
        let mut todo = repo.put(TodoItem::new("user-1", "v1")).await.unwrap();
        todo.name = "v2".to_string();
        repo.put(todo.clone()).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = repo.get_by_id(&todo.item_id).await.unwrap().unwrap();
        assert_eq!(stored.name, "v2");
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let repo = InMemoryTodoRepository::new();
        let result = repo
            .update(
                &TodoId::new(),
                &TodoUpdate {
                    done: Some(true),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(TodoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.put(TodoItem::new("user-1", "task")).await.unwrap();

        repo.delete("user-1", &todo.item_id).await.unwrap();
        repo.delete("user-1", &todo.item_id).await.unwrap();

        assert!(repo.get_by_id(&todo.item_id).await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_with_wrong_owner_keeps_item() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.put(TodoItem::new("user-1", "task")).await.unwrap();

        let result = repo.delete("user-2", &todo.item_id).await;

        assert!(matches!(result, Err(TodoError::Forbidden { .. })));
        assert!(repo.get_by_id(&todo.item_id).await.unwrap().is_some());
    }
}
