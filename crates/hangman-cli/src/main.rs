//! Hangman terminal game entry point.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use hangman_cli::bootstrap::bootstrap;
use hangman_cli::config::{Config, LogFormat};
use hangman_cli::error::AppError;
use hangman_cli::render::TerminalSink;
use hangman_cli::session::{Reply, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return e.exit_code();
        }
    };
    init_tracing(config.log_format);

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "hangman stopped");
            eprintln!("{e}");
            e.exit_code()
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

async fn run(config: &Config) -> Result<(), AppError> {
    tracing::info!(data_dir = %config.data_dir.display(), "starting hangman");

    let loader_config = config.clone();
    let game = tokio::task::spawn_blocking(move || {
        bootstrap(&loader_config, Arc::new(TerminalSink))
    })
    .await
    .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

    let mut session = Session::new(game);
    println!("{}", session.greeting());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticks = tokio::time::interval(Duration::from_millis(config.tick_ms));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticks.tick().await;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("input closed");
                    break;
                };
                match session.handle_line(&line) {
                    Reply::Continue(text) => println!("{text}"),
                    Reply::Quit(text) => {
                        println!("{text}");
                        break;
                    }
                }
            }
            _ = ticks.tick() => {
                if let Some(text) = session.tick() {
                    println!("{text}");
                }
            }
        }
    }
    Ok(())
}
