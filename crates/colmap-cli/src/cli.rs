//! CLI argument definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use colmap::{SessionConfig, DEFAULT_ENDPOINT, DEFAULT_TARGET_FIELD};
use std::path::PathBuf;

/// colmap: map free-text field names in CSV columns to normalized names
#[derive(Parser)]
#[command(name = "colmap")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub options: SessionOptions,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show field names, eligible columns, and their samples
    Inspect {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Request suggestions, apply them, and write the mapped file
    Map {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to map (repeatable; default: every eligible column)
        #[arg(short, long = "column", value_name = "COLUMN")]
        columns: Vec<String>,

        /// Reject the suggestion for this key (repeatable)
        #[arg(long, value_name = "KEY")]
        reject: Vec<String>,

        /// Use an alternative for a key (repeatable)
        #[arg(long, value_name = "KEY=VALUE")]
        choose: Vec<Choice>,

        /// Output directory (default: next to the input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the session API and the normalize endpoint
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "8000")]
        port: u16,
    },
}

/// Options shared by every command.
#[derive(Args, Clone, Debug)]
pub struct SessionOptions {
    /// Suggestion provider
    #[arg(long, global = true, default_value = "http")]
    pub provider: ProviderChoice,

    /// Normalize endpoint used by the http provider
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Chat model (chat provider, and the serve normalize endpoint)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Header of the column holding field names
    #[arg(long, global = true, value_name = "HEADER")]
    pub target_field: Option<String>,

    /// Offer every column with data instead of the target field only
    #[arg(long, global = true, conflicts_with = "target_field")]
    pub any_field: bool,
}

impl SessionOptions {
    /// Session configuration for these options.
    pub fn session_config(&self) -> SessionConfig {
        let target = if self.any_field {
            None
        } else {
            Some(
                self.target_field
                    .clone()
                    .unwrap_or_else(|| DEFAULT_TARGET_FIELD.to_string()),
            )
        };
        SessionConfig::default().with_target_field(target)
    }
}

/// Suggestion provider choice
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProviderChoice {
    /// POST samples to a normalize endpoint
    #[default]
    Http,
    /// Prompt a chat-completion model directly (requires GROK_API_KEY)
    Chat,
    /// Deterministic offline provider for testing
    Mock,
}

impl std::str::FromStr for ProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "endpoint" => Ok(ProviderChoice::Http),
            "chat" | "grok" => Ok(ProviderChoice::Chat),
            "mock" | "test" => Ok(ProviderChoice::Mock),
            _ => Err(format!("Unknown provider: {}. Use: http, chat, or mock.", s)),
        }
    }
}

impl std::fmt::Display for ProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderChoice::Http => write!(f, "http"),
            ProviderChoice::Chat => write!(f, "chat"),
            ProviderChoice::Mock => write!(f, "mock"),
        }
    }
}

/// A `KEY=VALUE` override for `map --choose`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(Choice {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            }),
            _ => Err(format!("Expected KEY=VALUE, got '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_map_command() {
        let cli = Cli::try_parse_from([
            "colmap",
            "map",
            "dict.csv",
            "--column",
            "Variable / Field Name",
            "--reject",
            "age",
            "--choose",
            "sex=gender",
            "--provider",
            "mock",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.options.provider, ProviderChoice::Mock);
        match cli.command {
            Commands::Map {
                columns, choose, ..
            } => {
                assert_eq!(columns, vec!["Variable / Field Name"]);
                assert_eq!(
                    choose,
                    vec![Choice {
                        key: "sex".to_string(),
                        value: "gender".to_string()
                    }]
                );
            }
            _ => panic!("expected map command"),
        }
    }

    #[test]
    fn test_target_field_options() {
        let cli = Cli::try_parse_from(["colmap", "inspect", "a.csv"]).unwrap();
        assert_eq!(
            cli.options.session_config().target_field.as_deref(),
            Some(DEFAULT_TARGET_FIELD)
        );
        assert_eq!(cli.options.endpoint, DEFAULT_ENDPOINT);

        let cli = Cli::try_parse_from(["colmap", "inspect", "a.csv", "--any-field"]).unwrap();
        assert!(cli.options.session_config().target_field.is_none());

        assert!(
            Cli::try_parse_from(["colmap", "inspect", "a.csv", "--any-field", "--target-field", "x"])
                .is_err()
        );
    }

    #[test]
    fn test_choice_requires_key() {
        assert!("=x".parse::<Choice>().is_err());
        assert!("x".parse::<Choice>().is_err());
        assert_eq!("a=".parse::<Choice>().unwrap().value, "");
    }
}
