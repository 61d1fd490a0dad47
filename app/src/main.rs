//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point.
// FORMAT: LEVEL:category:message on stderr, seq|level|category|message in --log-file

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clap::Parser;
use serde_json::Value;

use app_lib::config::{load_config, prompt_data_config, read_config, styles_from};
use app_lib::logging::{init_log_file, init_logging, log_error, log_info};
use app_lib::{
    process_file, process_json, serve, ConfigError, ReportConfig, ReportError, ServerState,
    DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_DIR,
};

/// Build PDF and Excel files.
#[derive(Parser, Debug)]
#[command(name = "pivot-report", version, about = "Build PDF and Excel files.")]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Run in interactive mode
    #[arg(long)]
    interactive: bool,

    /// JSON data to process
    #[arg(long)]
    json_data: Option<String>,

    /// Run in API mode
    #[arg(long)]
    api: bool,

    /// Address the API server binds to
    #[arg(long, default_value = "127.0.0.1:5000")]
    bind: String,

    /// Output directory for JSON and API runs (file runs write next to the source)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Copy every log line to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Some(path) = &cli.log_file {
        if let Err(e) = init_log_file(path) {
            eprintln!("{}", e);
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_error!("MAIN", "{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ReportError> {
    let config_path = cli
        .config_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let output_dir = cli
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    if cli.api {
        let state = ServerState {
            config_path,
            output_dir,
        };
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(ConfigError::Io)?;
        return runtime
            .block_on(serve(&cli.bind, state))
            .map_err(|e| ConfigError::Io(e).into());
    }

    let config = if cli.interactive {
        interactive_config(&config_path)?
    } else {
        load_config(&config_path, cli.json_data.is_none())?
    };

    let outcome = match &cli.json_data {
        Some(json_text) => process_json(&config, json_text, &output_dir)?,
        None => process_file(&config)?,
    };

    match outcome {
        Some(artifacts) => {
            log_info!("MAIN", "PDF: {}", artifacts.pdf_file.display());
            log_info!("MAIN", "EXCEL: {}", artifacts.excel_file.display());
        }
        None => log_info!("MAIN", "Nothing to report."),
    }
    Ok(())
}

/// Data settings from the prompts, styles from the config file when it
/// exists.
fn interactive_config(config_path: &Path) -> Result<ReportConfig, ConfigError> {
    let raw = if config_path.is_file() {
        read_config(config_path)?
    } else {
        Value::Object(Default::default())
    };
    let styles = styles_from(&raw)?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let data = prompt_data_config(&mut input, &mut output)?;

    Ok(ReportConfig { data, styles })
}
