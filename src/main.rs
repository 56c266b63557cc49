use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};

use vdoc::config::Settings;

#[derive(Parser)]
#[command(name = "vdoc")]
#[command(version, about = "Multi version documentation hosting")]
struct Cli {
    /// The log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    /// Settings file (TOML); VDOC_* environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs the application
    Run {
        /// Application bind ip address
        #[arg(long)]
        bind_address: Option<String>,

        /// Application bind port
        #[arg(long)]
        bind_port: Option<u16>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A configuration error aborts before anything is served
    let mut settings = Settings::load(cli.config.as_deref())?;
    let _guard = vdoc::logging::init(cli.log_level.into(), settings.log_dir.as_deref());
    info!("Starting {}@{}", vdoc::app_name(), vdoc::app_version());

    match cli.command {
        Command::Run {
            bind_address,
            bind_port,
        } => {
            if let Some(bind_address) = bind_address {
                settings.bind_address = bind_address;
            }
            if let Some(bind_port) = bind_port {
                settings.bind_port = bind_port;
            }
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(vdoc::server::run(settings))
        }
    }
}
