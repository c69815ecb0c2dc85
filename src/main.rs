//! Strata CLI - layer-cached image provisioner
//!
//! Usage: strata <COMMAND>
//!
//! Commands:
//!   init     Write a starter strata.toml and .strataignore
//!   build    Build the image for a context
//!   plan     Show which stages a build would run
//!   render   Print the recipe as a Dockerfile
//!   run      Run an image's entry command
//!   images   List built images
//!   inspect  Show an image's layers
//!   prune    Remove unreferenced layers

use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.json) {
        eprintln!("{:#}", e);
    }

    match dispatch(cli.command, cli.json) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if cli.json {
                commands::output::emit_error(&e);
            } else {
                eprintln!("Error: {}", commands::output::render_error(&e));
            }
            std::process::exit(1);
        }
    }
}

/// Run a command; the returned code becomes the process exit status
fn dispatch(command: Commands, json: bool) -> anyhow::Result<i32> {
    match command {
        Commands::Init { context, force } => commands::init::cmd_init(&context, force, json),
        Commands::Build {
            context,
            tag,
            no_cache,
        } => commands::build::cmd_build(&context, tag, no_cache, json),
        Commands::Plan {
            context,
            tag,
            no_cache,
            diff,
        } => commands::plan::cmd_plan(&context, tag, no_cache, diff, json),
        Commands::Render { context } => commands::render::cmd_render(&context, json),
        Commands::Run {
            name,
            context,
            args,
        } => commands::run::cmd_run(&context, name, args, json),
        Commands::Images => commands::images::cmd_images(json),
        Commands::Inspect { name } => commands::images::cmd_inspect(&name, json),
        Commands::Prune { dry_run } => commands::prune::cmd_prune(dry_run, json),
    }
}

/// Logs go to stderr; STRATA_LOG overrides the level picked from `-v`.
/// JSON mode stays quiet below errors so stdout consumers see only events.
fn init_tracing(verbose: u8, json: bool) -> anyhow::Result<()> {
    let level = match (json, verbose) {
        (true, 0) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("STRATA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
