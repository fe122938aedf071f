use clap::Parser;

use crate::models::CLIConfig;

#[derive(Debug, Parser)]
#[command(name = "menu-agent-cli", about = "Interactive client for the menu-agent chat endpoint")]
struct Args {
    /// Server base URL.
    #[arg(long = "base", env = "MENU_AGENT_URL", default_value = "http://localhost:4000")]
    base_url: String,

    /// HTTP timeout for a single request, in seconds.
    #[arg(long = "timeout", env = "MENU_AGENT_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,
}

pub fn parse_config() -> CLIConfig {
    Args::parse().into()
}

impl From<Args> for CLIConfig {
    fn from(args: Args) -> Self {
        Self {
            base_url: args.base_url,
            timeout_secs: args.timeout_secs,
        }
    }
}
