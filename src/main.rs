use clap::{Parser, Subcommand};
use painel::commands;
use painel_core::{config::Config, SubmissionForm};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEBUG_LOG: &str = "/tmp/painel-debug.log";

#[derive(Parser)]
#[command(name = "painel", version, about = "Painel de indicadores públicos")]
struct Cli {
    /// Configuration file layered over the defaults and the user file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to /tmp/painel-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to bind, overriding `[server] bind`.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Normalize a chart JSON file and print the table and render plan.
    Render { file: PathBuf },
    /// Run the admin submission checks on a chart JSON file.
    Check {
        file: PathBuf,
        /// Title typed in the form; wins over the JSON title.
        #[arg(long)]
        title: Option<String>,
        /// Colour picked in the form; wins over the JSON colour.
        #[arg(long)]
        color: Option<String>,
    },
    /// Browse the published indicators in the terminal.
    Tui,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The viewer owns the terminal, so it only ever logs to the debug file.
    let default_level = match cli.command {
        Command::Serve { .. } => Some("info"),
        Command::Render { .. } | Command::Check { .. } => Some("warn"),
        Command::Tui => None,
    };
    init_logging(cli.debug, default_level)?;

    let config = Config::load(cli.config.as_deref())?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Serve { bind } => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(commands::serve(&config, bind.as_deref())),
        Command::Render { file } => commands::render(&file, &config, &mut stdout),
        Command::Check { file, title, color } => {
            let mut form = SubmissionForm::new(title.unwrap_or_default());
            if let Some(color) = color {
                form = form.with_color(color);
            }
            commands::check(&file, &form, &mut stdout).map(|_| ())
        }
        Command::Tui => {
            drop(stdout);
            commands::tui(config)
        }
    }
}

fn init_logging(debug: bool, default_level: Option<&str>) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("painel debug log started, tail -f {DEBUG_LOG}");
    } else if let Some(level) = default_level {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .init();
    }
    Ok(())
}
