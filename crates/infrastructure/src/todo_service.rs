use domain::{AttachmentStorage, TodoError, TodoId, TodoItem, TodoRepository, TodoUpdate};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// ToDo のユースケースを提供するサービス
///
/// 所有者チェックを行い、リポジトリと添付ファイルストレージを組み合わせる。
/// 依存はすべてコンストラクタで注入する。
#[derive(Clone)]
pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    attachments: Arc<dyn AttachmentStorage>,
}

impl TodoService {
    pub fn new(
        repository: Arc<dyn TodoRepository>,
        attachments: Arc<dyn AttachmentStorage>,
    ) -> Self {
        Self {
            repository,
            attachments,
        }
    }

    /// 所有者の ToDo を作成日時順にすべて取得
    #[instrument(skip(self))]
    pub async fn list_todos(&self, owner_id: &str) -> Result<Vec<TodoItem>, TodoError> {
        self.repository.query_by_owner(owner_id).await
    }

    /// ID で ToDo を取得（所有者チェックなし）
    pub async fn get_todo(&self, item_id: &TodoId) -> Result<Option<TodoItem>, TodoError> {
        self.repository.get_by_id(item_id).await
    }

    /// ToDo を作成する。期限は作成時刻で初期化される
    #[instrument(skip(self))]
    pub async fn create_todo(&self, owner_id: &str, name: &str) -> Result<TodoItem, TodoError> {
        let todo = TodoItem::new(owner_id, name);
        let created = self.repository.put(todo).await?;

        info!("ToDo作成完了: item_id={}", created.item_id);
        Ok(created)
    }

    /// 所有者のみが name / dueDate / done を更新できる
    #[instrument(skip(self, update))]
    pub async fn update_todo(
        &self,
        item_id: &TodoId,
        owner_id: &str,
        update: &TodoUpdate,
    ) -> Result<(), TodoError> {
        self.find_owned_todo(item_id, owner_id).await?;
        self.repository.update(item_id, update).await?;

        info!("ToDo更新完了: item_id={}", item_id);
        Ok(())
    }

    /// ToDo を削除する
    ///
    /// 所有者チェックは呼び出し側の責務。チェック付きの削除は
    /// [`TodoService::delete_owned_todo`] を使う。
    pub async fn delete_todo(&self, todo: &TodoItem) -> Result<(), TodoError> {
        self.repository
            .delete(&todo.owner_id, &todo.item_id)
            .await?;

        info!("ToDo削除完了: item_id={}", todo.item_id);
        Ok(())
    }

    /// 存在と所有者を確認してから削除する
    #[instrument(skip(self))]
    pub async fn delete_owned_todo(
        &self,
        item_id: &TodoId,
        owner_id: &str,
    ) -> Result<(), TodoError> {
        let todo = self.find_owned_todo(item_id, owner_id).await?;
        self.delete_todo(&todo).await
    }

    /// 添付ファイルのアップロード用 URL を発行する
    ///
    /// 発行した URL は ToDo の attachmentUrl には保存しない。
    #[instrument(skip(self))]
    pub async fn get_upload_url(&self, item_id: &TodoId, owner_id: &str) -> Result<String, TodoError> {
        self.find_owned_todo(item_id, owner_id).await?;

        let attachment_id = uuid::Uuid::new_v4().to_string();
        self.attachments
            .generate_upload_url(&attachment_id, item_id)
            .await
    }

    async fn find_owned_todo(&self, item_id: &TodoId, owner_id: &str) -> Result<TodoItem, TodoError> {
        let todo = self
            .repository
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| TodoError::NotFound(item_id.to_string()))?;

        if !todo.is_owned_by(owner_id) {
            warn!(
                "他ユーザーのToDoへのアクセスを拒否: item_id={}, owner_id={}",
                item_id, owner_id
            );
            return Err(TodoError::Forbidden {
                item_id: item_id.to_string(),
                owner_id: owner_id.to_string(),
            });
        }

        Ok(todo)
    }
}
