use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Strata - layer-cached image provisioner
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI (NDJSON)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter strata.toml and .strataignore
    Init {
        /// Build context directory
        #[arg(short = 'C', long = "context", default_value = ".")]
        context: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Build the image for a context, reusing cached layers
    Build {
        /// Build context directory
        #[arg(short = 'C', long = "context", default_value = ".")]
        context: PathBuf,

        /// Image name (defaults to [image] name, then the context directory name)
        #[arg(short = 't', long = "tag")]
        tag: Option<String>,

        /// Ignore cached layers and rebuild every stage
        #[arg(long)]
        no_cache: bool,
    },

    /// Show which stages a build would run, without running them
    Plan {
        /// Build context directory
        #[arg(short = 'C', long = "context", default_value = ".")]
        context: PathBuf,

        /// Image name to compare against
        #[arg(short = 't', long = "tag")]
        tag: Option<String>,

        /// Plan as if the cache were empty
        #[arg(long)]
        no_cache: bool,

        /// Show a diff of the dependency manifest against the last build
        #[arg(long)]
        diff: bool,
    },

    /// Print the recipe as a Dockerfile
    Render {
        /// Build context directory
        #[arg(short = 'C', long = "context", default_value = ".")]
        context: PathBuf,
    },

    /// Run an image's entry command in the foreground
    Run {
        /// Image name (defaults to the one for the current directory)
        name: Option<String>,

        /// Build context used to resolve the default name
        #[arg(short = 'C', long = "context", default_value = ".")]
        context: PathBuf,

        /// Extra arguments passed to the entry command
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// List built images
    Images,

    /// Show an image's layers and metadata
    Inspect {
        /// Image name
        name: String,
    },

    /// Remove layers no image references
    Prune {
        /// Show what would be removed
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_build_defaults() {
        let cli = Cli::try_parse_from(["strata", "build"]).unwrap();
        if let Commands::Build {
            context,
            tag,
            no_cache,
        } = cli.command
        {
            assert_eq!(context, PathBuf::from("."));
            assert_eq!(tag, None);
            assert!(!no_cache);
        } else {
            panic!("Expected Build command");
        }
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_build_with_args() {
        let cli = Cli::try_parse_from([
            "strata",
            "build",
            "-C",
            "bot",
            "-t",
            "telegram-bot",
            "--no-cache",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        if let Commands::Build {
            context,
            tag,
            no_cache,
        } = cli.command
        {
            assert_eq!(context, PathBuf::from("bot"));
            assert_eq!(tag.as_deref(), Some("telegram-bot"));
            assert!(no_cache);
        } else {
            panic!("Expected Build command");
        }
    }

    #[test]
    fn test_cli_parse_run_passes_trailing_args() {
        let cli =
            Cli::try_parse_from(["strata", "run", "bot", "--", "--token-file", "/run/token"])
                .unwrap();
        if let Commands::Run { name, args, .. } = cli.command {
            assert_eq!(name.as_deref(), Some("bot"));
            assert_eq!(args, vec!["--token-file", "/run/token"]);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_plan_diff() {
        let cli = Cli::try_parse_from(["strata", "plan", "--diff"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan { diff: true, .. }));
    }

    #[test]
    fn test_cli_parse_verbose_count() {
        let cli = Cli::try_parse_from(["strata", "-vv", "images"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Images));
    }

    #[test]
    fn test_cli_parse_prune_dry_run() {
        let cli = Cli::try_parse_from(["strata", "prune", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Commands::Prune { dry_run: true }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["strata"]).is_err());
    }
}
