use domain::{parse_timestamp, TodoId, TodoUpdate};
use serde::Deserialize;
use shared::AppError;
use std::collections::HashMap;

/// 名前の最大文字数
const MAX_NAME_LENGTH: usize = 200;

/// API Gateway プロキシリクエスト構造体
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayProxyRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub request_context: RequestContext,
}

/// リクエストコンテキスト構造体
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub authorizer: Option<Authorizer>,
}

/// 認証情報構造体（Lambda Authorizer からのコンテキスト）
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorizer {
    #[serde(default)]
    pub principal_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// ToDo作成リクエスト
#[derive(Debug, Deserialize)]
struct CreateTodoRequest {
    name: String,
}

/// ToDo更新リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTodoRequest {
    name: Option<String>,
    due_date: Option<String>,
    done: Option<bool>,
}

impl UpdateTodoRequest {
    fn into_update(self) -> Result<TodoUpdate, AppError> {
        let update = TodoUpdate {
            name: self.name.as_deref().map(validate_name).transpose()?,
            due_date: self
                .due_date
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            done: self.done,
        };

        if update.is_empty() {
            return Err(AppError::Validation(
                "name, dueDate, done のいずれかが必要です".to_string(),
            ));
        }

        Ok(update)
    }
}

/// コマンドの種類を表す列挙型
#[derive(Debug)]
pub enum Command {
    Preflight,
    ListTodos,
    CreateTodo { name: String },
    UpdateTodo { item_id: TodoId, update: TodoUpdate },
    DeleteTodo { item_id: TodoId },
    GenerateUploadUrl { item_id: TodoId },
}

/// リクエストからコマンドをパース
pub fn parse_command(request: &ApiGatewayProxyRequest) -> Result<Command, AppError> {
    let method = request.http_method.to_ascii_uppercase();
    let path = request.path.trim_matches('/');
    let segments: Vec<&str> = path.split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        ("OPTIONS", _) => Ok(Command::Preflight),
        ("GET", ["todos"]) => Ok(Command::ListTodos),
        ("POST", ["todos"]) => {
            let create_req: CreateTodoRequest = parse_body(request)?;
            Ok(Command::CreateTodo {
                name: validate_name(&create_req.name)?,
            })
        }
        ("PUT" | "PATCH", ["todos", item_id]) => {
            let update_req: UpdateTodoRequest = parse_body(request)?;
            Ok(Command::UpdateTodo {
                item_id: parse_item_id(item_id)?,
                update: update_req.into_update()?,
            })
        }
        ("DELETE", ["todos", item_id]) => Ok(Command::DeleteTodo {
            item_id: parse_item_id(item_id)?,
        }),
        ("POST", ["todos", item_id, "attachment"]) => Ok(Command::GenerateUploadUrl {
            item_id: parse_item_id(item_id)?,
        }),
        _ => Err(AppError::RouteNotFound(format!(
            "{} {}",
            request.http_method, request.path
        ))),
    }
}

/// Lambda Authorizer から呼び出し元のユーザーIDを抽出
pub fn extract_owner_id(request: &ApiGatewayProxyRequest) -> Result<String, AppError> {
    let authorizer = request
        .request_context
        .authorizer
        .as_ref()
        .ok_or_else(|| AppError::Authentication("認証情報が見つかりません".to_string()))?;

    authorizer
        .principal_id
        .as_deref()
        .or(authorizer.user_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::Authentication("ユーザーIDが見つかりません".to_string()))
}

fn parse_body<T: serde::de::DeserializeOwned>(
    request: &ApiGatewayProxyRequest,
) -> Result<T, AppError> {
    let body = request
        .body
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .ok_or_else(|| AppError::Validation("リクエストボディが必要です".to_string()))?;

    serde_json::from_str(body)
        .map_err(|e| AppError::Deserialization(format!("リクエストボディのパースエラー: {e}")))
}

fn parse_item_id(raw: &str) -> Result<TodoId, AppError> {
    Ok(TodoId::from_string(raw.to_string())?)
}

fn validate_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("名前は必須です".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(AppError::Validation(format!(
            "名前は{MAX_NAME_LENGTH}文字以内で入力してください"
        )));
    }
    Ok(name.to_string())
}
