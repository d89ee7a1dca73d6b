mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_ask, handle_eval, handle_repl, ui, AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("ragline=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragline=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match AppContext::load(cli.config.as_deref(), cli.corpus.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            ui::print_error(&e.to_string());
            std::process::exit(2);
        }
    };

    let outcome = match cli.command {
        Commands::Ask {
            query,
            top_k,
            show_chunks,
        } => handle_ask(&ctx, query, top_k, show_chunks).await,
        Commands::Eval { file, output } => handle_eval(&ctx, file, output).await,
        Commands::Repl => handle_repl(&ctx).await,
    };

    if let Err(e) = outcome {
        ui::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}
