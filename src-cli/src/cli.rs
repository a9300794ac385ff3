use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "leadscan", version)]
#[command(about = "Extract names and phone numbers from a map listing search")]
pub struct Cli {
    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Enumerate a listing and extract one contact per item
    Extract {
        /// Listing search URL
        url: String,

        /// Number of detail pages processed at once
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Write results to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Print progress and the result as newline-delimited JSON events
        #[arg(long)]
        events: bool,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract() {
        let cli = Cli::parse_from([
            "leadscan",
            "extract",
            "https://www.google.com/maps/search/pizzaria",
            "--concurrency",
            "4",
            "-o",
            "out.json",
        ]);
        match cli.command {
            Commands::Extract {
                url,
                concurrency,
                output,
                headed,
                events,
            } => {
                assert_eq!(url, "https://www.google.com/maps/search/pizzaria");
                assert_eq!(concurrency, Some(4));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert!(!headed);
                assert!(!events);
            }
            Commands::Config { .. } => panic!("expected extract"),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::parse_from(["leadscan", "--config", "/tmp/l.toml", "config", "init", "--force"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/l.toml")));
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Init { force: true }
            }
        ));
    }

    #[test]
    fn test_extract_requires_url() {
        assert!(Cli::try_parse_from(["leadscan", "extract"]).is_err());
    }
}
