use crate::errors::TodoError;
use crate::todo::{TodoId, TodoItem, TodoUpdate};
use async_trait::async_trait;

/// ToDo テーブルへのアクセス
///
/// テーブルの主キーは itemId、セカンダリインデックスは (ownerId, createdAt)。
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// 所有者の ToDo を作成日時の昇順で取得する（ページングなし）
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<TodoItem>, TodoError>;

    /// 主キーで取得する。存在しない場合は None
    async fn get_by_id(&self, item_id: &TodoId) -> Result<Option<TodoItem>, TodoError>;

    /// 無条件で保存（上書き）し、保存したアイテムを返す
    async fn put(&self, item: TodoItem) -> Result<TodoItem, TodoError>;

    /// 指定されたフィールドのみを更新する
    async fn update(&self, item_id: &TodoId, update: &TodoUpdate) -> Result<(), TodoError>;

    /// 削除する。存在しないキーの削除はエラーにしない
    async fn delete(&self, owner_id: &str, item_id: &TodoId) -> Result<(), TodoError>;
}

/// 添付ファイル用オブジェクトストレージ
#[async_trait]
pub trait AttachmentStorage: Send + Sync {
    /// 有効期限付きのアップロード用署名付き URL を生成する
    async fn generate_upload_url(
        &self,
        attachment_id: &str,
        item_id: &TodoId,
    ) -> Result<String, TodoError>;
}
