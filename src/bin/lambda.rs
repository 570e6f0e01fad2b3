// Lambda entry point: the event payload is the task batch, the response is the record.

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use taskforge_hitl::Dispatcher;
use taskforge_hitl::core::AppConfig;
use tracing::{error, info};

async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e.to_string())
    })?;
    info!("Received batch (request_id={})", event.context.request_id);

    let dispatcher = Dispatcher::new(config);
    let outcome = dispatcher.dispatch_value(event.payload);
    info!("Dispatch finished with status {}", outcome.status());
    Ok(dispatcher.to_record(&outcome))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    taskforge_hitl::setup_logging();
    run(service_fn(handler)).await
}
