use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use table_exporter::{DynamoExporter, ExportTrigger, Response, Settings};

async fn function_handler(
    trigger: &ExportTrigger<DynamoExporter>,
    event: LambdaEvent<Value>,
) -> Result<Response, Error> {
    let settings = Settings::from_env();

    Ok(trigger
        .handle(&settings, &event.context.invoked_function_arn)
        .await?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let trigger = ExportTrigger::new(DynamoExporter::new().await);
    let trigger = &trigger;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(trigger, event).await
    }))
    .await
}
