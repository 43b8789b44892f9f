//! Command-line interface for planetarium.
//!
//! This module provides the CLI structure for the `planetarium` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, OutputFormat, PlanetCommand, PlanetsCommand, SatelliteCommand, ServeCommand,
    StatusCommand, UploadCommand,
};

/// planetarium - Explore the planets and moons of the solar system
///
/// Serves planet and satellite data over HTTP and stores a representative
/// image for each planet.
#[derive(Debug, Parser)]
#[command(name = "planetarium")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Show catalog and upload status
    Status(StatusCommand),

    /// List all planets
    Planets(PlanetsCommand),

    /// Show a planet with its satellites
    Planet(PlanetCommand),

    /// Show a satellite with its planet
    Satellite(SatelliteCommand),

    /// Store an image for a planet
    Upload(UploadCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "planetarium");
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["planetarium", "serve", "--bind", "0.0.0.0:8000"]).unwrap();
        match cli.command {
            Command::Serve(cmd) => assert_eq!(cmd.bind.as_deref(), Some("0.0.0.0:8000")),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_planet() {
        let cli = Cli::try_parse_from(["planetarium", "planet", "3", "-f", "json"]).unwrap();
        match cli.command {
            Command::Planet(cmd) => {
                assert_eq!(cmd.id, 3);
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("expected planet, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_planet_rejects_non_integer() {
        assert!(Cli::try_parse_from(["planetarium", "planet", "terre"]).is_err());
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from(["planetarium", "upload", "4", "mars.jpg"]).unwrap();
        match cli.command {
            Command::Upload(cmd) => {
                assert_eq!(cmd.planet_id, 4);
                assert_eq!(cmd.file, PathBuf::from("mars.jpg"));
            }
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["planetarium", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["planetarium", "-vv", "planets"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["planetarium", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: None })
        ));
    }
}
