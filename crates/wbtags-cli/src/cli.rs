use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage tags attached to worldbooks.
#[derive(Debug, Parser)]
#[command(name = "wbtags", version)]
pub struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Host settings file.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Flat JSON file of the legacy storage slot.
    #[arg(long, global = true)]
    pub legacy: Option<PathBuf>,

    /// Directory whose `*.json` files are the known worldbooks.
    #[arg(long, global = true)]
    pub worlds: Option<PathBuf>,

    /// Print store metrics in Prometheus text format to stderr on exit.
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Every tag in use, sorted.
    List,
    /// Tags of one worldbook.
    Show { record: String },
    /// Add a tag to one or more worldbooks.
    Add {
        tag: String,
        #[arg(required = true)]
        records: Vec<String>,
    },
    /// Remove a tag from one or more worldbooks.
    Remove {
        tag: String,
        #[arg(required = true)]
        records: Vec<String>,
    },
    /// Replace the tags of one worldbook. No tags clears it.
    Set { record: String, tags: Vec<String> },
    /// Tags shared by all given worldbooks.
    Common {
        #[arg(required = true)]
        records: Vec<String>,
    },
    /// Known worldbooks carrying any of the given tags.
    Filter {
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Known worldbooks with their tags.
    Records {
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_bulk_add() {
        let cli = Cli::parse_from(["wbtags", "add", "lore", "Dragons", "Elves"]);
        assert_eq!(
            cli.command,
            Command::Add {
                tag: "lore".into(),
                records: vec!["Dragons".into(), "Elves".into()],
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["wbtags", "filter", "--tag", "a", "--tag", "b", "--metrics"]);
        assert!(cli.metrics);
        assert_eq!(
            cli.command,
            Command::Filter {
                tags: vec!["a".into(), "b".into()],
            }
        );
    }

    #[test]
    fn add_requires_a_record() {
        assert!(Cli::try_parse_from(["wbtags", "add", "lore"]).is_err());
    }
}
