mod cli;
mod content;
mod script;
mod shell;

use std::io::{self, BufRead};

use casement_config::schema::CasementConfig;
use tracing_subscriber::EnvFilter;

use crate::script::parse_line;
use crate::shell::Shell;

fn load_config(args: &cli::Args) -> CasementConfig {
    let result = match args.config.as_deref() {
        Some(path) => {
            tracing::info!("Using config override: {}", path.display());
            casement_config::load_config_from(path)
        }
        None => casement_config::load_config(),
    };
    result.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        CasementConfig::default()
    })
}

fn read_script(args: &cli::Args) -> io::Result<Vec<String>> {
    match &args.script {
        Some(path) => Ok(std::fs::read_to_string(path)?
            .lines()
            .map(str::to_string)
            .collect()),
        None => io::stdin().lock().lines().collect(),
    }
}

async fn run(shell: &mut Shell, lines: Vec<String>) -> usize {
    let mut errors = 0;
    for (number, line) in lines.iter().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => {
                for output in shell.execute(command).await {
                    println!("{output}");
                }
            }
            Ok(None) => {}
            Err(e) => {
                errors += 1;
                eprintln!("line {}: {e}", number + 1);
            }
        }
    }
    errors
}

fn main() {
    let args = cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Casement v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args);
    tracing::info!(
        "Config loaded (log level: {}, replay capacity: {})",
        config.logging.level,
        config.bus.replay_capacity
    );

    let lines = match read_script(&args) {
        Ok(lines) => lines,
        Err(e) => {
            tracing::error!("Failed to read script: {e}");
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let mut shell = Shell::new(&config);
    let errors = runtime.block_on(run(&mut shell, lines));

    tracing::info!(
        "Session finished ({} windows open, {} log entries, {errors} script errors)",
        shell.coordinator().len(),
        shell.backend().len()
    );
    if errors > 0 {
        std::process::exit(2);
    }
}
