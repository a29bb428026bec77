//! Server time WebSocket server
//!
//! Answers every JSON request on the configured path with
//! `{"server_time": "..."}` until Ctrl+C.

use anyhow::Result;
use servertime_ws::bin_common::{config_path_from_env, BinaryRunner, RunConfig, ShutdownManager};
use servertime_ws::config::AppConfig;
use servertime_ws::logging::init_tracing;
use servertime_ws::server::TimeServer;

struct ServerApp {
    run_config: RunConfig,
    config: AppConfig,
}

impl BinaryRunner for ServerApp {
    async fn run(&mut self) -> Result<()> {
        let shutdown = ShutdownManager::new();
        shutdown.spawn_signal_handler();

        let server = TimeServer::bind(self.config.bind_addr()?, self.config.server.path.clone()).await?;
        server.run(shutdown.wait()).await
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(config_path_from_env())?;

    init_tracing(&config.log_level);
    config.log();

    let mut app = ServerApp {
        run_config: RunConfig::new("time_server")
            .with_target(format!("{}{}", config.server.bind, config.server.path)),
        config,
    };
    app.execute().await
}
