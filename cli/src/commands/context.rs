use anyhow::{Context, Result};
use ragline_config::{Config, ConfigBuilder, ErrorFormatter};
use ragline_context::{select_embedder, select_generator};
use ragline_core::corpus::load_corpus;
use ragline_pipeline::RagPipeline;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loaded configuration plus the corpus it will be applied to.
/// Keeps the command handlers from each re-doing setup.
pub struct AppContext {
    pub config: Config,
    pub corpus_path: PathBuf,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>, corpus_path: PathBuf) -> Result<Self> {
        let loaded = match config_path {
            Some(path) => ConfigBuilder::new().with_file(path).with_env().build(),
            None => Config::load(),
        };
        let config = loaded.map_err(|e| anyhow::anyhow!("{}", ErrorFormatter::new(&e)))?;
        Ok(Self {
            config,
            corpus_path,
        })
    }

    /// Read the corpus, connect the configured backends and build the index.
    pub async fn open_pipeline(&self) -> Result<Arc<RagPipeline>> {
        let chunks = load_corpus(&self.corpus_path)
            .with_context(|| format!("failed to load corpus {}", self.corpus_path.display()))?;
        let embedder = select_embedder(&self.config.embedding)?;
        let generator = select_generator(&self.config.generation)?;

        let pipeline = RagPipeline::open(chunks, embedder, generator, self.config.clone())
            .await
            .context("failed to build the retrieval index")?;
        Ok(Arc::new(pipeline))
    }
}
