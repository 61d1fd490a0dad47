//! FILENAME: app/src/lib.rs
// PURPOSE: Report runner library: configuration, the end-to-end controller,
// and the HTTP surface. The binary in main.rs is a thin CLI over this.

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod server;

pub use config::{load_config, parse_config, prompt_data_config, DataConfig, ReportConfig, DEFAULT_CONFIG_FILE};
pub use controller::{generate_report, process_file, process_json, process_payload, DEFAULT_OUTPUT_DIR};
pub use error::{ConfigError, ReportError};
pub use persistence::Artifacts;
pub use server::{create_router, serve, ServerState};
