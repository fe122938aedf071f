use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use menu_agent_rs::api::ChatServer;
use menu_agent_rs::logging::{init_logging, LogFormat};
use menu_agent_rs::{ChatService, ServerConfig};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    init_logging(&config.log_level, LogFormat::parse(&config.log_format));

    // Model clients block, so they are built before the async runtime starts.
    let service = match ChatService::from_config(&config) {
        Ok(service) => service,
        Err(err) => {
            error!(error = %err, "failed to initialize chat service");
            return ExitCode::FAILURE;
        }
    };
    let server = ChatServer::new(&config, service);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(error = %err, "failed to start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "menu-agent starting");
    match runtime.block_on(server.start()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "server error");
            ExitCode::FAILURE
        }
    }
}
