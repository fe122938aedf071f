use std::io::{self, Write};

use crate::models::{CLIConfig, ChatMessage, ChatReply, HealthInfo};

pub fn banner(cfg: &CLIConfig) {
    println!("Menu Agent Debug CLI");
    println!("API: {}", cfg.base_url);
    println!("Type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                 Show commands");
    println!("  /exit | /quit         Exit");
    println!("  /history              Show chat history");
    println!("  /reset                Clear chat history");
    println!("  /config               Show current config");
    println!("  /health               Query server health");
    println!("  /base <url>           Update base URL");
}

pub fn reply(reply: &ChatReply) {
    println!("assistant> {}", reply.output);
}

pub fn health(info: &HealthInfo) {
    println!("status: {}  version: {}  uptime: {}s", info.status, info.version, info.uptime_secs);
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  timeout: {}s", cfg.timeout_secs);
}

pub fn history(items: &[ChatMessage]) {
    if items.is_empty() {
        println!("no history");
        return;
    }
    for msg in items {
        println!("{}> {}", msg.role, msg.content);
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
