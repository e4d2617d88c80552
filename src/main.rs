use std::io;
use std::process;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::EnvFilter;

use race_engineer::cli::{Cli, Command};
use race_engineer::config::{self, AdvisorSettings};
use race_engineer::probe::{self, ProbeOutcome};
use race_engineer::session::{self, SessionEnd};
use race_engineer::{Advisor, EngineerState, GeminiAdvisor, MockAdvisor, RaceEngineer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Some(Command::Probe { models }) = &cli.command {
        return run_probe(&cli.advisor_settings(), models).await;
    }

    let context = match &cli.race_context {
        Some(path) => config::load_race_context(path)
            .with_context(|| format!("failed to load race context from {}", path.display()))?,
        None => cli.race_context_flags(),
    };
    let interval = Duration::try_from_secs_f64(cli.interval)
        .context("--interval must be a non-negative number of seconds")?;
    let state = EngineerState::new(interval);
    let settings = cli.advisor_settings();

    print_banner(&settings);

    let input: Box<dyn AsyncBufRead + Unpin> = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open telemetry file {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    match GeminiAdvisor::from_settings(&settings) {
        Some(advisor) => {
            tracing::info!(model = %advisor.model(), "using Gemini model");
            let engineer = RaceEngineer::new(advisor, context, state).with_force(cli.force);
            run(engineer, input).await
        }
        None => {
            let engineer = RaceEngineer::new(MockAdvisor, context, state).with_force(cli.force);
            run(engineer, input).await
        }
    }
}

fn print_banner(settings: &AdvisorSettings) {
    println!("FARVIS - F1 Race Engineer AI Copilot");
    println!("{}", "=".repeat(64));
    match settings.api_key.as_deref() {
        Some(key) if !settings.is_mock() => {
            println!("Gemini API configured (key: {})", config::mask_key(key))
        }
        _ => println!("Running in MOCK MODE (set GEMINI_API_KEY to use real API)"),
    }
    println!("{}", "=".repeat(64));
}

async fn run<A: Advisor>(
    mut engineer: RaceEngineer<A>,
    input: Box<dyn AsyncBufRead + Unpin>,
) -> anyhow::Result<()> {
    let end = session::run(&mut engineer, input, ctrl_c(), &mut io::stdout()).await?;
    match end {
        // stdin reads cannot be cancelled, so the runtime would wait for one
        // more line before shutting down
        SessionEnd::Interrupted => process::exit(0),
        SessionEnd::EndOfInput => Ok(()),
        SessionEnd::InputFailed => bail!("telemetry input kept failing"),
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}

async fn run_probe(settings: &AdvisorSettings, models: &[String]) -> anyhow::Result<()> {
    let Some(base) = GeminiAdvisor::from_settings(settings) else {
        bail!("no API key found: set GEMINI_API_KEY (or --api-key) to probe models");
    };
    let candidates: Vec<String> = if models.is_empty() {
        probe::DEFAULT_CANDIDATES.iter().map(|m| m.to_string()).collect()
    } else {
        models.to_vec()
    };

    println!("Testing Gemini models...");
    println!("{}", "=".repeat(60));

    let mut found = false;
    for outcome in probe::probe_models(&base, &candidates).await {
        match outcome {
            ProbeOutcome::Success { model, reply } => {
                println!("\nTrying: {model}");
                println!("  SUCCESS: {reply}");
                println!("  >>> USE THIS MODEL: {model}");
                found = true;
            }
            ProbeOutcome::Failed { model, error } => {
                println!("\nTrying: {model}");
                println!("  FAILED: {error}");
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    if !found {
        bail!("none of the {} candidate models answered", candidates.len());
    }
    Ok(())
}
