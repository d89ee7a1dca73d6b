use super::context::AppContext;
use super::ui;
use anyhow::{Context, Result};
use console::Style;
use ragline_eval::{load_eval_set, BatchReport, Evaluator};
use ragline_pipeline::RagPipeline;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub async fn handle_eval(
    ctx: &AppContext,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let pipeline = ctx.open_pipeline().await?;
    let file = file.unwrap_or_else(|| ctx.config.evaluation.file.clone());
    run_eval(ctx, pipeline, &file, output.as_deref()).await
}

pub async fn run_eval(
    ctx: &AppContext,
    pipeline: Arc<RagPipeline>,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let items = load_eval_set(file)
        .with_context(|| format!("failed to load evaluation set {}", file.display()))?;

    let mut evaluator = Evaluator::new(pipeline, &ctx.config.evaluation);
    let report = evaluator.evaluate_batch(&items).await?;
    print_report(&report);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("failed to write results to {}", path.display()))?;
        ui::print_key_value("Results written to", &path.display().to_string());
    }
    Ok(())
}

fn print_report(report: &BatchReport) {
    let rule = "=".repeat(80);
    for record in &report.records {
        println!("\n{}", Style::new().dim().apply_to(&rule));
        println!("Question {}:\n{}", record.position + 1, record.question);
        println!("\nReference Answer:\n{}", record.reference_answer);
        println!("\nModel Answer:\n{}", ui::wrap_answer(&record.model_answer));

        println!("\nRetrieved Context Chunks:");
        for (i, (content, title)) in record
            .retrieved_chunk_contents
            .iter()
            .zip(&record.retrieved_titles)
            .enumerate()
        {
            println!("\nChunk {}:\n{}", i + 1, content);
            println!("(Source: {})", title);
            println!("{}", "-".repeat(40));
        }

        let scores: Vec<String> = record
            .metric_scores
            .iter()
            .map(|(name, score)| format!("{}: {}", name, score))
            .collect();
        println!("\nScores: {}", scores.join(", "));
    }

    for skip in &report.skipped {
        ui::print_error(&format!("item {} skipped: {}", skip.position + 1, skip.reason));
    }

    ui::print_header("Summary");
    ui::print_key_value(
        "Evaluated",
        &format!("{} of {}", report.records.len(), report.total()),
    );
    ui::print_key_value("Skipped", &report.skipped_count().to_string());
    for summary in &report.summary {
        let mean = if summary.is_defined() {
            summary.mean.to_string()
        } else {
            "n/a (no successful items)".to_string()
        };
        ui::print_key_value(&format!("mean {}", summary.metric), &mean);
    }
}
