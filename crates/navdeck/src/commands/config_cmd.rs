//! Config subcommand handlers.

use serde::Serialize;

use navdeck_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Effective configuration with secrets masked.
#[derive(Serialize)]
struct Redacted<'a> {
    server: &'a navdeck_config::ServerSection,
    health: &'a navdeck_config::HealthSection,
    qbittorrent: RedactedQbittorrent<'a>,
    monitor: &'a navdeck_config::MonitorSection,
}

#[derive(Serialize)]
struct RedactedQbittorrent<'a> {
    username: &'a str,
    password: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password_env: Option<&'a str>,
    timeout_ms: u64,
}

fn redact(cfg: &Config) -> Redacted<'_> {
    let qb = &cfg.qbittorrent;
    let password_set = qb.password.is_some()
        || std::env::var(navdeck_config::PASSWORD_ENV).is_ok()
        || qb
            .password_env
            .as_deref()
            .is_some_and(|name| std::env::var(name).is_ok());
    Redacted {
        server: &cfg.server,
        health: &cfg.health,
        qbittorrent: RedactedQbittorrent {
            username: &qb.username,
            password: if password_set { "********" } else { "(default)" },
            password_env: qb.password_env.as_deref(),
            timeout_ms: qb.timeout_ms,
        },
        monitor: &cfg.monitor,
    }
}

pub fn handle(args: &ConfigArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let redacted = redact(cfg);
            let rendered = output::render_single(
                &global.output,
                &redacted,
                |r| toml::to_string_pretty(r).unwrap_or_else(|e| format!("error: {e}")),
                |r| format!("{}:{}", r.server.host, r.server.port),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
        ConfigCommand::Path => {
            let path = config::effective_path(global);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
