//! Command line interface
//!
//! - `serve`: run the HTTP API
//! - `ask`: answer one question and exit

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

/// PMP Adaptive RAG - corpus-first question answering with online fallback
#[derive(Parser)]
#[command(name = "pmp-adaptive-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Answer a single question
    Ask(ask::AskArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "pmp-adaptive-rag",
            "ask",
            "What is tokio?",
            "--corpus",
            "docs.json",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Ask(args) => {
                assert_eq!(args.question, "What is tokio?");
                assert_eq!(args.corpus.as_deref(), Some(std::path::Path::new("docs.json")));
                assert!(args.json);
            }
            Command::Serve => panic!("expected ask"),
        }
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["pmp-adaptive-rag", "ask"]).is_err());
    }
}
