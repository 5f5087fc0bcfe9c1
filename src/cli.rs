//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::scaffold::ScaffoldMode;
use crate::tags::MatchOrder;

/// Top-level CLI entry point for the channel-to-module converter.
#[derive(Parser, Debug)]
#[command(
    name = "puppetize",
    about = "Convert a configuration channel export into a Puppet module",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a channel export into a Puppet module
    Convert(ConvertOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the per-command log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Convert(_) => "convert",
            Self::Version => "version",
        }
    }
}

/// Options for the `convert` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ConvertOpts {
    /// Channel export (JSON) to convert
    pub channel: PathBuf,

    /// Tool configuration file
    #[arg(short = 'f', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Macro mapping file (JSON); overrides the configured mapping
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,

    /// Directory to build the module in; overrides the configured one
    #[arg(short, long)]
    pub working_dir: Option<PathBuf>,

    /// Directory to place the finished module in
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Class parameter (repeatable); replaces configured parameters
    #[arg(long = "param", value_name = "PARAM")]
    pub params: Vec<String>,

    /// Manifest to patch, without the .pp extension
    #[arg(long)]
    pub manifest: Option<String>,

    /// How to create the module skeleton
    #[arg(long, value_enum)]
    pub scaffold: Option<ScaffoldMode>,

    /// Tie-break order for overlapping mapping tags
    #[arg(long, value_enum)]
    pub match_order: Option<MatchOrder>,

    /// Keep an existing module directory instead of removing it first
    #[arg(long)]
    pub keep: bool,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn convert_opts(args: &[&str]) -> ConvertOpts {
        let Command::Convert(opts) = Cli::parse_from(args.iter().copied()).command else {
            panic!("expected the convert command");
        };
        opts
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_convert_defaults() {
        let opts = convert_opts(&["puppetize", "convert", "channel.json"]);
        assert_eq!(opts.channel, PathBuf::from("channel.json"));
        assert_eq!(opts.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(opts.mapping.is_none());
        assert!(opts.params.is_empty());
        assert!(opts.scaffold.is_none());
        assert!(!opts.keep);
    }

    #[test]
    fn parse_convert_overrides() {
        let opts = convert_opts(&[
            "puppetize",
            "convert",
            "channel.json",
            "--config",
            "/tmp/p.toml",
            "-m",
            "map.json",
            "-w",
            "/tmp/build",
            "--param",
            "$a",
            "--param",
            "$b = 1",
            "--manifest",
            "config",
            "--scaffold",
            "puppet",
            "--match-order",
            "declared",
            "--keep",
        ]);
        assert_eq!(opts.config, PathBuf::from("/tmp/p.toml"));
        assert_eq!(opts.mapping, Some(PathBuf::from("map.json")));
        assert_eq!(opts.working_dir, Some(PathBuf::from("/tmp/build")));
        assert_eq!(opts.params, vec!["$a", "$b = 1"]);
        assert_eq!(opts.manifest.as_deref(), Some("config"));
        assert_eq!(opts.scaffold, Some(ScaffoldMode::Puppet));
        assert_eq!(opts.match_order, Some(MatchOrder::Declared));
        assert!(opts.keep);
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["puppetize", "version"]);
        assert!(matches!(cli.command, Command::Version));
        assert_eq!(cli.command.name(), "version");
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["puppetize", "-v", "convert", "c.json"]);
        assert!(cli.verbose);
        assert_eq!(cli.command.name(), "convert");
    }

    #[test]
    fn convert_requires_channel() {
        assert!(Cli::try_parse_from(["puppetize", "convert"]).is_err());
    }

    #[test]
    fn rejects_unknown_scaffold() {
        assert!(
            Cli::try_parse_from(["puppetize", "convert", "c.json", "--scaffold", "other"])
                .is_err()
        );
    }
}
