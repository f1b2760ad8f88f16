mod commands;
mod handlers;
mod responses;

use commands::ApiGatewayProxyRequest;
use handlers::handle_request;
use infrastructure::{
    load_sdk_config, DynamoDbClient, DynamoDbTodoRepository, S3AttachmentStorage, TodoService,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use responses::ApiGatewayProxyResponse;
use shared::{
    telemetry::{create_lambda_span, LambdaTraceContext},
    tracing::init_tracing,
    Config,
};
use std::sync::Arc;
use tracing::{error, info, Instrument};

/// ToDo API ハンドラーのメイン関数
async fn function_handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
    service: &TodoService,
    include_details: bool,
) -> Result<ApiGatewayProxyResponse, Error> {
    let (payload, context) = event.into_parts();
    let trace_context = LambdaTraceContext::from_lambda_context(&context);
    let span = create_lambda_span("todo-handler", &trace_context);

    let request_id = payload
        .request_context
        .request_id
        .clone()
        .unwrap_or_else(|| trace_context.request_id.clone());

    let response = handle_request(&payload, service, &request_id, include_details)
        .instrument(span)
        .await;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    if let Err(e) = init_tracing() {
        eprintln!("トレーシング初期化エラー: {e}");
    }

    let config = Config::from_env().map_err(|e| {
        error!("設定読み込みエラー: {}", e);
        e
    })?;

    // クライアントはコールドスタート時に一度だけ初期化する
    let sdk_config = load_sdk_config(&config).await;
    let repository = DynamoDbTodoRepository::new(DynamoDbClient::new(&sdk_config, &config));
    let attachments = S3AttachmentStorage::new(&sdk_config, &config);
    let service = TodoService::new(Arc::new(repository), Arc::new(attachments));
    let include_details = config.is_development();

    info!(
        table = %config.todos_table,
        index = %config.todos_created_at_index,
        bucket = %config.attachment_bucket,
        environment = %config.environment,
        "todo-handler 初期化完了"
    );

    let service = &service;
    run(service_fn(
        move |event: LambdaEvent<ApiGatewayProxyRequest>| async move {
            function_handler(event, service, include_details).await
        },
    ))
    .await
}
