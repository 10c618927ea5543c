// ABOUTME: Entry point for the pullman CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, TargetArgs};
use pullman::config::{self, Config};
use pullman::engine::{ContainerEngine, detect_engine};
use pullman::error::{Error, Result};
use pullman::output::{Output, OutputMode};
use pullman::puller::ImagePuller;
use pullman::types::ImageRef;
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let mode = cli.output;
    if let Err(e) = run(cli) {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { image, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, image.as_deref(), force)
        }
        Commands::Assess { target } => assess(target, cli.output),
        Commands::Pull { target } => pull(target, cli.output),
    }
}

/// Resolve CLI arguments against the discovered config file.
fn build_puller(target: TargetArgs) -> Result<ImagePuller> {
    let cwd = env::current_dir()?;
    let config = Config::discover_or_default(&cwd)?;

    let image = target
        .image
        .as_deref()
        .map(ImageRef::parse)
        .or(config.image)
        .ok_or(Error::MissingImage)?;

    let engine = match target.engine {
        Some(binary) => ContainerEngine::new(binary),
        None => match config.engine {
            Some(engine) => engine,
            None => detect_engine()?,
        },
    };

    let policy = target.pull_policy.unwrap_or(config.pull.policy);

    let arguments = if target.pull_arguments.is_empty() {
        config.pull.arguments
    } else {
        Some(target.pull_arguments)
    };

    Ok(ImagePuller::new(engine, image, arguments, policy))
}

fn assess(target: TargetArgs, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    let mut puller = build_puller(target)?;
    let assessment = puller.assess()?.clone();
    output.assessment(puller.image(), &assessment);
    Ok(())
}

fn pull(target: TargetArgs, mode: OutputMode) -> Result<()> {
    let mut output = Output::new(mode);
    let mut puller = build_puller(target)?;
    let assessment = puller.assess()?.clone();
    output.assessment(puller.image(), &assessment);

    if !assessment.pull_required {
        output.success("Image up to date, nothing to pull");
        return Ok(());
    }

    output.progress(&format!("Running: {}", puller.pull_command().join(" ")));
    output.start_timer();
    for line in puller.pull()? {
        output.pull_line(&line?);
    }
    output.success("Pull complete");
    Ok(())
}
