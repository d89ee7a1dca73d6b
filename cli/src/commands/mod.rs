pub mod ask;
pub mod context;
pub mod eval;
pub mod repl;
pub mod ui;

pub use ask::handle_ask;
pub use context::AppContext;
pub use eval::handle_eval;
pub use repl::handle_repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ragline")]
#[command(about = "Retrieval-augmented question answering over a local corpus")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Pre-chunked corpus: JSON array of {content, metadata}
    #[arg(long, value_name = "FILE", default_value = "corpus.json", global = true)]
    pub corpus: PathBuf,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer a single question
    Ask {
        /// The question
        query: String,

        /// Number of chunks to retrieve (defaults to retrieval.top_k)
        #[arg(long)]
        top_k: Option<usize>,

        /// Print the retrieved chunks
        #[arg(long, default_value_t = false)]
        show_chunks: bool,
    },
    /// Evaluate a question set against reference answers
    Eval {
        /// Question set (defaults to evaluation.file)
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Write the batch report as JSON
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Interactive question loop
    Repl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "ragline",
            "--corpus",
            "docs.json",
            "ask",
            "What is RAG?",
            "--top-k",
            "5",
            "--show-chunks",
        ])
        .unwrap();
        assert_eq!(cli.corpus, PathBuf::from("docs.json"));
        match cli.command {
            Commands::Ask {
                query,
                top_k,
                show_chunks,
            } => {
                assert_eq!(query, "What is RAG?");
                assert_eq!(top_k, Some(5));
                assert!(show_chunks);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_parse_eval_defaults() {
        let cli = Cli::try_parse_from(["ragline", "eval", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.corpus, PathBuf::from("corpus.json"));
        assert!(matches!(
            cli.command,
            Commands::Eval {
                file: None,
                output: None
            }
        ));
    }
}
