//! Server time WebSocket client
//!
//! Connects to the configured endpoint, asks for the server time once,
//! logs every reply, and closes the connection on Ctrl+C.
//!
//! Usage: `ws_client [endpoint]`

use anyhow::Result;
use servertime_ws::bin_common::{
    config_path_from_env, parse_args, BinaryRunner, RunConfig, ShutdownManager,
};
use servertime_ws::config::AppConfig;
use servertime_ws::logging::init_tracing;
use servertime_ws::socket_client::{ClientConfig, ServerTimeHandler, SocketClient, TracingSink};

struct ClientApp {
    run_config: RunConfig,
    client_config: ClientConfig,
}

impl BinaryRunner for ClientApp {
    async fn run(&mut self) -> Result<()> {
        let shutdown = ShutdownManager::new();
        shutdown.spawn_signal_handler();

        let handler =
            ServerTimeHandler::new(TracingSink).with_greeting(self.client_config.greeting.clone());
        let mut client = SocketClient::connect(self.client_config.clone(), handler);
        shutdown.spawn_teardown_hook(client.close_handle());

        client.wait().await?;
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = AppConfig::load(config_path_from_env())?;
    if let Some(endpoint) = parse_args().into_iter().next() {
        config.client.endpoint = endpoint;
        config.validate()?;
    }

    init_tracing(&config.log_level);
    config.log();

    let mut app = ClientApp {
        run_config: RunConfig::new("ws_client").with_target(config.client.endpoint.clone()),
        client_config: config.client,
    };
    app.execute().await
}
