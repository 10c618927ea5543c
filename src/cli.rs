// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use pullman::output::OutputMode;
use pullman::types::PullPolicy;

#[derive(Parser)]
#[command(name = "pullman")]
#[command(about = "Policy-driven container image pulls for Docker and Podman")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output mode
    #[arg(long, global = true, value_enum, default_value = "normal")]
    pub output: OutputMode,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new pullman.yml configuration file
    Init {
        /// Image reference to seed the template with
        #[arg(short, long)]
        image: Option<String>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Report whether a pull is required, without pulling
    Assess {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Pull the image if the configured policy requires it
    Pull {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
pub struct TargetArgs {
    /// Image reference (overrides the config file)
    pub image: Option<String>,

    /// Container engine binary (default: config file, then auto-detect)
    #[arg(long)]
    pub engine: Option<String>,

    /// Pull policy (default: config file, then `tag`)
    #[arg(long, value_enum)]
    pub pull_policy: Option<PullPolicy>,

    /// Extra argument for the pull command, in shell syntax (repeatable)
    #[arg(long = "pull-arg", value_name = "ARG")]
    pub pull_arguments: Vec<String>,
}
