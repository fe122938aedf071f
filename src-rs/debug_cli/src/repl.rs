use std::io;

use crate::client::HTTPClient;
use crate::models::{CLIConfig, ChatMessage};
use crate::render;

/// Parsed form of a `/command [rest]` line.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    Exit,
    Help,
    History,
    Reset,
    Config,
    Health,
    Base(&'a str),
    Unknown,
}

fn parse_command(line: &str) -> Command<'_> {
    let mut parts = line.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("").trim_start_matches('/');
    let rest = parts.next().unwrap_or("").trim();
    match cmd {
        "exit" | "quit" => Command::Exit,
        "help" => Command::Help,
        "history" => Command::History,
        "reset" => Command::Reset,
        "config" => Command::Config,
        "health" => Command::Health,
        "base" => Command::Base(rest),
        _ => Command::Unknown,
    }
}

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
    pub history: Vec<ChatMessage>,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self {
            config,
            client,
            history: Vec::new(),
        }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            self.send(&line);
        }
    }

    /// Returns true when the REPL should exit.
    fn handle_command(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Command::Exit => return true,
            Command::Help => render::help(),
            Command::History => render::history(&self.history),
            Command::Reset => {
                self.history.clear();
                render::info("history cleared");
            }
            Command::Config => render::config(&self.config),
            Command::Health => match self.client.health() {
                Ok(info) => render::health(&info),
                Err(err) => render::error(&err),
            },
            Command::Base("") => render::info(&format!("base: {}", self.config.base_url)),
            Command::Base(url) => match HTTPClient::new(url, self.config.timeout_secs) {
                Ok(client) => {
                    self.config.base_url = url.to_string();
                    self.client = client;
                    render::info("base url updated");
                }
                Err(err) => render::error(&err),
            },
            Command::Unknown => render::info("unknown command, type /help"),
        }
        false
    }

    fn send(&mut self, line: &str) {
        self.history.push(ChatMessage {
            role: "user".to_string(),
            content: line.to_string(),
        });

        match self.client.chat(line) {
            Ok(reply) => {
                self.history.push(ChatMessage {
                    role: "assistant".to_string(),
                    content: reply.output.clone(),
                });
                render::reply(&reply);
            }
            Err(err) => render::error(&err),
        }
    }
}
