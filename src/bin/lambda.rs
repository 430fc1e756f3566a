use lambda_runtime::service_fn;
use menu_import::config::{Config, build_client};
use menu_import::lambda::handle_event;
use menu_import::{init_tracing, install_crypto_provider};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    install_crypto_provider();
    init_tracing();

    let config = Config::from_env()?;
    let client = build_client(&config)?;

    lambda_runtime::run(service_fn(move |event| {
        let client = client.clone();
        async move { handle_event(&client, event).await }
    }))
    .await
}
