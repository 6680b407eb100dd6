//! Command-line arguments.

use clap::{Parser, Subcommand};
use ct_protocol::language_models::Language;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate and run unit tests through remote AI and sandbox services")]
pub struct Cli {
    /// Project root containing `.codetest-kit/`
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Override the AI Generation Service base URL
    #[arg(long, global = true)]
    pub generation_url: Option<String>,

    /// Override the Sandbox Execution Service base URL
    #[arg(long, global = true)]
    pub execution_url: Option<String>,

    /// Override the project archive timeout, in milliseconds
    #[arg(long, global = true)]
    pub archive_timeout_ms: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate tests for a source file and run them in the sandbox
    Run {
        /// Source file to test
        file: PathBuf,

        /// Language of the file; inferred from its extension when omitted
        #[arg(short, long)]
        language: Option<Language>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also print the generated test code
        #[arg(long)]
        show_tests: bool,
    },

    /// Run a zipped project's own test suite in the sandbox
    Project {
        /// Project archive (.zip)
        archive: PathBuf,

        /// Language of the project
        #[arg(short, long)]
        language: Language,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported languages
    Profiles {
        /// Print the profiles as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the sample source for a language
    Sample { language: Language },

    /// Create a `.codetest-kit/` directory with a config template
    Init {
        /// Overwrite an existing `.codetest-kit/` directory
        #[arg(long)]
        force: bool,

        /// Also write sample sources for every language
        #[arg(long)]
        with_samples: bool,
    },
}
