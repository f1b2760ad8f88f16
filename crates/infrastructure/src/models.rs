use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use domain::{format_timestamp, parse_timestamp, TodoError, TodoId, TodoItem};
use std::collections::HashMap;

/// ToDo テーブルの属性名
pub mod attributes {
    pub const OWNER_ID: &str = "ownerId";
    pub const ITEM_ID: &str = "itemId";
    pub const CREATED_AT: &str = "createdAt";
    pub const NAME: &str = "name";
    pub const DUE_DATE: &str = "dueDate";
    pub const DONE: &str = "done";
    pub const ATTACHMENT_URL: &str = "attachmentUrl";
}

use attributes::*;

pub type AttributeMap = HashMap<String, AttributeValue>;

/// TodoItem を DynamoDB AttributeValue マップに変換
/// attachmentUrl が None の場合は属性自体を書き込まない
pub fn todo_to_item(todo: &TodoItem) -> AttributeMap {
    let mut map = HashMap::new();

    map.insert(OWNER_ID.to_string(), AttributeValue::S(todo.owner_id.clone()));
    map.insert(
        ITEM_ID.to_string(),
        AttributeValue::S(todo.item_id.as_str().to_string()),
    );
    map.insert(
        CREATED_AT.to_string(),
        AttributeValue::S(format_timestamp(&todo.created_at)),
    );
    map.insert(NAME.to_string(), AttributeValue::S(todo.name.clone()));
    map.insert(
        DUE_DATE.to_string(),
        AttributeValue::S(format_timestamp(&todo.due_date)),
    );
    map.insert(DONE.to_string(), AttributeValue::Bool(todo.done));

    if let Some(url) = &todo.attachment_url {
        map.insert(ATTACHMENT_URL.to_string(), AttributeValue::S(url.clone()));
    }

    map
}

/// DynamoDB AttributeValue マップから TodoItem を復元
pub fn item_to_todo(item: &AttributeMap) -> Result<TodoItem, TodoError> {
    let item_id = TodoId::from_string(get_string(item, ITEM_ID)?)
        .map_err(|e| TodoError::DynamoDb(format!("不正な itemId: {e}")))?;

    // attachmentUrl は欠落または NULL を許容する
    let attachment_url = match item.get(ATTACHMENT_URL) {
        Some(AttributeValue::S(url)) => Some(url.clone()),
        Some(AttributeValue::Null(_)) | None => None,
        Some(other) => {
            return Err(TodoError::DynamoDb(format!(
                "attachmentUrl の型が不正です: {other:?}"
            )))
        }
    };

    Ok(TodoItem {
        owner_id: get_string(item, OWNER_ID)?,
        item_id,
        created_at: get_timestamp(item, CREATED_AT)?,
        name: get_string(item, NAME)?,
        due_date: get_timestamp(item, DUE_DATE)?,
        done: item
            .get(DONE)
            .and_then(|v| v.as_bool().ok())
            .copied()
            .ok_or_else(|| missing(DONE))?,
        attachment_url,
    })
}

fn get_string(item: &AttributeMap, key: &str) -> Result<String, TodoError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| missing(key))
}

fn get_timestamp(item: &AttributeMap, key: &str) -> Result<DateTime<Utc>, TodoError> {
    let raw = get_string(item, key)?;
    parse_timestamp(&raw).map_err(|e| TodoError::DynamoDb(format!("{key} を解析できません: {e}")))
}

fn missing(key: &str) -> TodoError {
    TodoError::DynamoDb(format!("Missing or invalid attribute: {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_to_item_contains_all_attributes() {
        let todo = TodoItem::new("user-1", "Buy milk");
        let item = todo_to_item(&todo);

        assert_eq!(item.get(OWNER_ID).unwrap().as_s().unwrap(), "user-1");
        assert_eq!(
            item.get(ITEM_ID).unwrap().as_s().unwrap(),
            todo.item_id.as_str()
        );
        assert_eq!(item.get(NAME).unwrap().as_s().unwrap(), "Buy milk");
        assert!(!item.get(DONE).unwrap().as_bool().unwrap());
        assert!(item.get(CREATED_AT).unwrap().as_s().unwrap().ends_with('Z'));
        assert!(!item.contains_key(ATTACHMENT_URL));
    }

    #[test]
    fn test_item_to_todo_restores_stored_item() {
        let mut todo = TodoItem::new("user-1", "Buy milk");
        todo.done = true;
        todo.attachment_url = Some("https://bucket.s3.amazonaws.com/abc".to_string());

        let restored = item_to_todo(&todo_to_item(&todo)).unwrap();

        assert_eq!(restored.item_id, todo.item_id);
        assert_eq!(restored.owner_id, todo.owner_id);
        assert_eq!(restored.attachment_url, todo.attachment_url);
        assert!(restored.done);
        // ストア上はミリ秒精度
        assert_eq!(
            format_timestamp(&restored.created_at),
            format_timestamp(&todo.created_at)
        );
    }

    #[test]
    fn test_item_to_todo_accepts_null_attachment_url() {
        let todo = TodoItem::new("user-1", "Buy milk");
        let mut item = todo_to_item(&todo);
        item.insert(ATTACHMENT_URL.to_string(), AttributeValue::Null(true));

        assert!(item_to_todo(&item).unwrap().attachment_url.is_none());
    }

    #[test]
    fn test_item_to_todo_missing_attribute() {
        let todo = TodoItem::new("user-1", "Buy milk");
        let mut item = todo_to_item(&todo);
        item.remove(DONE);

        match item_to_todo(&item) {
            Err(TodoError::DynamoDb(msg)) => assert!(msg.contains(DONE)),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_item_to_todo_invalid_timestamp() {
        let todo = TodoItem::new("user-1", "Buy milk");
        let mut item = todo_to_item(&todo);
        item.insert(
            DUE_DATE.to_string(),
            AttributeValue::S("tomorrow".to_string()),
        );

        assert!(matches!(item_to_todo(&item), Err(TodoError::DynamoDb(_))));
    }
}
