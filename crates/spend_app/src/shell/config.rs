use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use spend_engine::{BackendSettings, EngineConfig, RetryPolicy};
use spend_logging::LogDestination;

/// Browse transactions, paginated or filtered by employee.
#[derive(Debug, Parser)]
#[command(name = "spend", version)]
pub struct Args {
    /// Base URL of the transactions backend.
    #[arg(long, env = "SPEND_BASE_URL", default_value = "http://localhost:3000/")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "SPEND_REQUEST_TIMEOUT_MS", default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    /// What to do when a fetch fails.
    #[arg(long, value_enum, default_value_t = RetryArg::Once)]
    pub retry: RetryArg,

    /// Delay before the single retry, in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub retry_delay_ms: u64,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,

    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RetryArg {
    Once,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    File,
    Terminal,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub backend: BackendSettings,
    pub engine: EngineConfig,
}

impl Args {
    pub fn into_config(self) -> ShellConfig {
        let retry_policy = match self.retry {
            RetryArg::Once => RetryPolicy::RetryOnce {
                delay: Duration::from_millis(self.retry_delay_ms),
            },
            RetryArg::Never => RetryPolicy::ReportImmediately,
        };
        ShellConfig {
            backend: BackendSettings {
                base_url: self.base_url,
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                ..BackendSettings::default()
            },
            engine: EngineConfig { retry_policy },
        }
    }
}
