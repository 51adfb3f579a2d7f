//! Minimal CLI parsing for run mode and config overrides.

use std::env;

#[derive(Debug, Default)]
pub struct CliOptions {
    pub run_once: bool,
    pub interval_override: Option<u64>,
    pub port_override: Option<u16>,
    pub config_path: Option<String>,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    fn parse(mut args: impl Iterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--once" => options.run_once = true,
                "--interval" => {
                    if let Some(value) = args.next() {
                        options.interval_override = value.parse().ok();
                    }
                }
                "--port" => {
                    if let Some(value) = args.next() {
                        options.port_override = value.parse().ok();
                    }
                }
                "--config" => {
                    if let Some(value) = args.next() {
                        options.config_path = Some(value);
                    }
                }
                _ if arg.starts_with("--interval=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.interval_override = value.parse().ok();
                    }
                }
                _ if arg.starts_with("--port=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.port_override = value.parse().ok();
                    }
                }
                _ if arg.starts_with("--config=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.config_path = Some(value.to_string());
                    }
                }
                _ => {}
            }
        }
        options
    }
}
