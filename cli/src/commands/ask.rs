use super::context::AppContext;
use super::ui;
use anyhow::Result;
use ragline_pipeline::{RagPipeline, RagResponse};

pub async fn handle_ask(
    ctx: &AppContext,
    query: String,
    top_k: Option<usize>,
    show_chunks: bool,
) -> Result<()> {
    let pipeline = ctx.open_pipeline().await?;
    let response = answer(&pipeline, &query, top_k).await?;
    print_response(&response, show_chunks);
    Ok(())
}

pub async fn answer(pipeline: &RagPipeline, query: &str, top_k: Option<usize>) -> Result<RagResponse> {
    let k = top_k.unwrap_or(pipeline.config().retrieval.top_k);
    Ok(pipeline.run(query, k).await?)
}

pub fn print_response(response: &RagResponse, show_chunks: bool) {
    ui::print_answer(&response.answer);
    ui::print_sources(&response.sources);
    if show_chunks {
        ui::print_chunks(&response.chunks, Some(response.distances.as_slice()));
    }
    ui::print_elapsed(response.elapsed);
}
