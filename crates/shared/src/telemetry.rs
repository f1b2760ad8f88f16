use lambda_runtime::Context;
use std::fmt::Display;
use std::future::Future;
use std::time::Instant;
use tracing::{error, info};

/// Lambda 関数のトレーシング情報
#[derive(Debug)]
pub struct LambdaTraceContext {
    pub function_name: String,
    pub function_version: String,
    pub request_id: String,
    pub trace_id: Option<String>,
}

impl LambdaTraceContext {
    /// Lambda Context からトレーシング情報を抽出
    pub fn from_lambda_context(context: &Context) -> Self {
        Self {
            function_name: context.env_config.function_name.clone(),
            function_version: context.env_config.version.clone(),
            request_id: context.request_id.clone(),
            trace_id: context
                .xray_trace_id
                .clone()
                .or_else(|| std::env::var("_X_AMZN_TRACE_ID").ok()),
        }
    }
}

/// Lambda 関数用のスパンを作成
pub fn create_lambda_span(handler_name: &str, trace_context: &LambdaTraceContext) -> tracing::Span {
    tracing::info_span!(
        "lambda_handler",
        handler = handler_name,
        function_name = %trace_context.function_name,
        function_version = %trace_context.function_version,
        request_id = %trace_context.request_id,
        trace_id = %trace_context.trace_id.as_deref().unwrap_or("none")
    )
}

/// ストア操作（DynamoDB / S3）の所要時間と結果を記録する
pub async fn trace_store_operation<T, E, Fut>(
    resource: &str,
    operation_name: &str,
    operation: Fut,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let start_time = Instant::now();
    let result = operation.await;
    let duration_ms = start_time.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => {
            info!(
                resource,
                operation = operation_name,
                duration_ms,
                "Store operation completed"
            );
        }
        Err(e) => {
            error!(
                resource,
                operation = operation_name,
                duration_ms,
                error = %e,
                "Store operation failed"
            );
        }
    }

    result
}
