//! pixiv-sync - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use pixiv_sync::{
    api::{
        session::{establish_session, TerminalCredentials},
        PixivApi,
    },
    cli::Args,
    collection::RateLimiter,
    config::{validate_config, Config},
    download::{RunSummary, SyncOrchestrator, SyncSettings},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_error, print_info,
        print_run_summary, print_success, print_warning,
    },
    shutdown::install_signal_handler,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(Error::Interrupted) => {
            print_info("Interrupted");
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_code_for(&e) as u8)
        }
    }
}

fn exit_code_for(e: &Error) -> i32 {
    match e {
        Error::Config(_)
        | Error::ConfigValidation { .. }
        | Error::MissingConfig(_)
        | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
        Error::Authentication { .. } => exit_codes::AUTH_ERROR,
        Error::QuotaExceeded { .. }
        | Error::Network(_)
        | Error::MalformedResponse(_)
        | Error::Api(_)
        | Error::Http(_) => exit_codes::API_ERROR,
        Error::InvalidFilename(_) => exit_codes::DOWNLOAD_ERROR,
        Error::Interrupted => exit_codes::SUCCESS,
        _ => exit_codes::UNEXPECTED_ERROR,
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let config_path = args.config.clone();
    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config)?;
    validate_config(&config)?;

    let jobs = config.jobs();
    let settings = SyncSettings::from_config(&config);
    print_config_summary(settings.user_id, &jobs, &settings.root);

    // Log in; the token is verified by fetching our own profile
    let user_id = settings.user_id;
    let mut credentials = TerminalCredentials::new(Some(config.account.access_token.clone()));
    print_info("Connecting to Pixiv...");
    let (api, me) = establish_session(&mut credentials, move |token| async move {
        let api = PixivApi::new(token)?;
        let me = api.user_detail(user_id).await?;
        Ok::<_, Error>((api, me))
    })
    .await?;

    print_info(&format!(
        "Logged in as: {}",
        me.name.as_deref().or(me.account.as_deref()).unwrap_or("unknown")
    ));

    let cancel = install_signal_handler();
    let (base, spread) = config.rate_limit();
    let limiter = Arc::new(RateLimiter::new(base, spread));

    let orchestrator = SyncOrchestrator::new(&api, settings, limiter.clone(), cancel);
    let summary = orchestrator.run(&jobs).await;
    tracing::debug!("Rate limiter waited {} times", limiter.wait_count());

    print_run_summary(&summary);
    Ok(finish(&summary))
}

/// Report the outcome of the run and pick the exit code.
fn finish(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        print_info("Interrupted");
        return exit_codes::SUCCESS;
    }

    if let Some(e) = summary.auth_failure() {
        print_error(&format!("{}", e));
        return exit_codes::AUTH_ERROR;
    }

    match summary.jobs_failed() {
        0 => {
            print_success("All jobs completed");
            exit_codes::SUCCESS
        }
        failed => {
            print_warning(&format!("{} job(s) did not complete cleanly", failed));
            exit_codes::SOME_JOBS_FAILED
        }
    }
}
