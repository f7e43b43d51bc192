use std::path::PathBuf;

use clap::Parser;

/// Casement: a headless window-session shell driven by a line script.
#[derive(Parser, Debug)]
#[command(name = "casement", version, about)]
pub struct Args {
    /// Session script to run. Reads stdin when omitted.
    pub script: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Diagnostic log filter (e.g. `debug` or `casement=trace`).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// The tracing filter directive. A bare level applies to this crate only.
    pub fn log_directive(&self) -> String {
        match self.log_level.as_deref() {
            Some(level) if level.contains('=') => level.to_string(),
            Some(level) => format!("casement={level}"),
            None => "casement=info".to_string(),
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
