//! Ask command - answers one question from the terminal

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::api::types::QuestionResponse;
use crate::config::AppConfig;
use crate::domain::{QuestionAnswering, QuestionOutcome, WorkflowResult};
use crate::infrastructure::logging::init_logging;

#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question to answer
    pub question: String,

    /// Corpus file to load instead of the configured one
    #[arg(long)]
    pub corpus: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (mut config, load_error) = AppConfig::load_or_default();
    init_logging(&config.logging);
    if let Some(e) = load_error {
        warn!(error = %e, "Configuration could not be loaded, using defaults");
    }
    config.validate()?;

    if let Some(corpus) = args.corpus {
        if !corpus.exists() {
            anyhow::bail!("Corpus file not found: {}", corpus.display());
        }
        config.knowledge_base.corpus_path = Some(corpus);
    }

    let components = crate::build_components(&config).await?;
    let result = components.workflow.process_question(&args.question).await?;

    let failed = matches!(result.outcome, QuestionOutcome::AdapterFailure { .. });

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&QuestionResponse::from_result(result, true))?
        );
    } else {
        println!("{}", render(&result));
    }

    if failed {
        anyhow::bail!("Question could not be answered because a collaborator failed");
    }

    Ok(())
}

fn render(result: &WorkflowResult) -> String {
    match &result.outcome {
        QuestionOutcome::Answered => {
            let mut text = result.solution().unwrap_or_default().to_string();
            if let Some(method) = result.search_method() {
                text.push_str(&format!("\n\n(answered from {} evidence", method.as_str()));
                if let Some(score) = result.document_relevance_score() {
                    text.push_str(&format!(
                        ", {} of {} documents relevant ({:.0}%)",
                        score.relevant,
                        score.total,
                        score.relevant_percentage()
                    ));
                }
                text.push(')');
            }
            text
        }
        QuestionOutcome::InsufficientEvidence { reason } => {
            format!("No answer: {}", reason)
        }
        QuestionOutcome::AdapterFailure {
            adapter,
            stage,
            message,
        } => format!(
            "Failed at {} ({}): {}",
            stage.as_str(),
            adapter.as_str(),
            message
        ),
    }
}
