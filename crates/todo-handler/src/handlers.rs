use crate::commands::{extract_owner_id, parse_command, ApiGatewayProxyRequest, Command};
use crate::responses::{
    create_empty_response, create_error_response, create_success_response,
    ApiGatewayProxyResponse,
};
use infrastructure::TodoService;
use serde_json::json;
use shared::AppError;
use tracing::info;

/// リクエストを処理する
///
/// エラーはすべてステータスコード付きのレスポンスに変換する。
pub async fn handle_request(
    request: &ApiGatewayProxyRequest,
    service: &TodoService,
    request_id: &str,
    include_details: bool,
) -> ApiGatewayProxyResponse {
    info!(
        "TodoHandler開始: method={}, path={}",
        request.http_method, request.path
    );

    let response = match route(request, service).await {
        Ok(response) => response,
        Err(e) => create_error_response(&e, request_id, include_details),
    };

    info!("TodoHandler完了: status={}", response.status_code);
    response
}

async fn route(
    request: &ApiGatewayProxyRequest,
    service: &TodoService,
) -> Result<ApiGatewayProxyResponse, AppError> {
    let command = parse_command(request)?;
    if let Command::Preflight = command {
        return Ok(create_empty_response(204));
    }

    // Lambda Authorizer からユーザー情報を抽出
    let owner_id = extract_owner_id(request)?;
    execute_command(command, &owner_id, service).await
}

/// コマンドを実行する
async fn execute_command(
    command: Command,
    owner_id: &str,
    service: &TodoService,
) -> Result<ApiGatewayProxyResponse, AppError> {
    match command {
        Command::Preflight => Ok(create_empty_response(204)),
        Command::ListTodos => {
            let items = service.list_todos(owner_id).await?;
            info!("ToDo一覧取得: count={}", items.len());
            Ok(create_success_response(200, json!({ "items": items })))
        }
        Command::CreateTodo { name } => {
            let item = service.create_todo(owner_id, &name).await?;
            Ok(create_success_response(201, json!({ "item": item })))
        }
        Command::UpdateTodo { item_id, update } => {
            service.update_todo(&item_id, owner_id, &update).await?;
            Ok(create_empty_response(204))
        }
        Command::DeleteTodo { item_id } => {
            service.delete_owned_todo(&item_id, owner_id).await?;
            Ok(create_empty_response(204))
        }
        Command::GenerateUploadUrl { item_id } => {
            let upload_url = service.get_upload_url(&item_id, owner_id).await?;
            Ok(create_success_response(
                201,
                json!({ "uploadUrl": upload_url }),
            ))
        }
    }
}
