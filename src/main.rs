use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use quickresearch::banner::{BannerInfo, print_banner, print_session_summary};
use quickresearch::commands::{CommandRegistry, CommandResult};
use quickresearch::config::{Config, Overrides};
use quickresearch::coordinator::Coordinator;
use quickresearch::session::Session;
use quickresearch::spinner::Spinner;
use quickresearch::ui::render_deletes;

#[derive(Parser)]
#[command(
    name = "quickresearch",
    version,
    about = "Ask a question, get one authoritative paragraph back."
)]
struct Cli {
    /// Service base URL [env: QUICKRESEARCH_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// Bearer token [env: QUICKRESEARCH_TOKEN]
    #[arg(long)]
    token: Option<String>,

    /// Application id sent as X-Generated-App-ID [env: QUICKRESEARCH_APP_ID]
    #[arg(long)]
    app_id: Option<String>,

    /// Milliseconds to wait between submitting and fetching [env: QUICKRESEARCH_FETCH_DELAY_MS]
    #[arg(short = 'd', long)]
    fetch_delay_ms: Option<u64>,

    /// Keep only this many audit log entries, at least 1 [env: QUICKRESEARCH_LOG_CAPACITY]
    #[arg(long)]
    log_capacity: Option<NonZeroUsize>,

    /// HTTP request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Ask a single question, delete the object, and exit (non-interactive)
    #[arg(short, long)]
    run: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            app_id: self.app_id.clone(),
            fetch_delay_ms: self.fetch_delay_ms,
            log_capacity: self.log_capacity,
            timeout_secs: self.timeout,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let config = Config::load(cli.overrides()).context("failed to load configuration")?;
    info!("using endpoint {}", config.base_url);

    let coordinator = Coordinator::from_config(&config).context("failed to build HTTP client")?;
    let session = Arc::new(Session::new(coordinator));

    // Single question mode
    if let Some(question) = cli.run {
        let answered = ask(&session, &question).await;
        let deletes = session.delete_all().await;
        if deletes.iter().any(|d| !d.is_ok()) {
            eprint!("{}", render_deletes(&deletes));
        }
        print_session_summary(
            session.coordinator().audit_log().len(),
            session.coordinator().registry_len(),
        );
        return Ok(if answered {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    print_banner(&BannerInfo {
        endpoint: &config.base_url,
        app_id: &config.app_id,
        fetch_delay: config.fetch_delay,
        log_capacity: config.log_capacity,
    });

    let commands = CommandRegistry::new();

    // Async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\nresearch> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match commands.dispatch(input, &session).await {
            CommandResult::Quit => break,
            CommandResult::Handled => continue,
            CommandResult::NotACommand => {}
        }

        ask(&session, input).await;
    }

    print_session_summary(
        session.coordinator().audit_log().len(),
        session.coordinator().registry_len(),
    );
    Ok(ExitCode::SUCCESS)
}

/// Ask with a spinner running, then print whatever the UI now shows.
///
/// The request runs in its own task: Ctrl+C stops waiting for it but the
/// remote calls still run to completion. Returns whether an answer came back.
async fn ask(session: &Arc<Session>, question: &str) -> bool {
    let spinner = Spinner::start("researching");
    let mut task = tokio::spawn({
        let session = Arc::clone(session);
        let question = question.to_string();
        async move { session.ask(&question).await }
    });

    let result = tokio::select! {
        joined = &mut task => joined.ok(),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.stop().await;

    let Some(result) = result else {
        println!("\ninterrupted");
        return false;
    };

    let ui = session.ui();
    match &ui.error {
        Some(error) => eprintln!("\nerror: {error}"),
        None => print!("{}", ui.render()),
    }
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_log_capacity_flag_is_rejected() {
        assert!(Cli::try_parse_from(["quickresearch", "--log-capacity", "0"]).is_err());
    }

    #[test]
    fn log_capacity_flag_reaches_overrides() {
        let cli = Cli::try_parse_from(["quickresearch", "--log-capacity", "25"]).unwrap();
        assert_eq!(cli.overrides().log_capacity, NonZeroUsize::new(25));
    }
}
