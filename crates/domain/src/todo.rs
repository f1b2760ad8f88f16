use crate::errors::TodoError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ToDo の一意な識別子（ULID）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// 外部から受け取った ID を検証して TodoId を作成
    /// 既存データには UUID 形式の ID もあるため、空文字のみを拒否する
    pub fn from_string(id: String) -> Result<Self, TodoError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(TodoError::Validation("TodoId が空です".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ユーザーごとの ToDo アイテム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub owner_id: String,
    pub item_id: TodoId,
    #[serde(with = "timestamp_serde")]
    pub created_at: DateTime<Utc>,
    pub name: String,
    #[serde(with = "timestamp_serde")]
    pub due_date: DateTime<Utc>,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

impl TodoItem {
    /// 新しい ToDo を作成する
    /// 期限は作成時刻で初期化され、変更は update で行う
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>) -> Self {
        // ストアの表現に合わせてミリ秒に切り捨てる
        let now = Utc::now().trunc_subsecs(3);
        Self {
            owner_id: owner_id.into(),
            item_id: TodoId::new(),
            created_at: now,
            name: name.into(),
            due_date: now,
            done: false,
            attachment_url: None,
        }
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// 部分更新を適用する（name / dueDate / done 以外は変更しない）
    pub fn apply(&mut self, update: &TodoUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(done) = update.done {
            self.done = done;
        }
    }
}

/// ToDo の部分更新内容
/// None のフィールドは保存済みの値をそのまま残す
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done: Option<bool>,
}

impl TodoUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.due_date.is_none() && self.done.is_none()
    }
}

/// ストアと API で共通のタイムスタンプ表現（ミリ秒精度、Z 表記）
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TodoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TodoError::Validation(format!("無効なタイムスタンプ '{value}': {e}")))
}

/// TodoItem の日時フィールドを format_timestamp の形式で (de)serialize する
mod timestamp_serde {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
