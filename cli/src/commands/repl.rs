use super::ask::{answer, print_response};
use super::context::AppContext;
use super::eval::run_eval;
use super::ui;
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Single,
    Evaluate,
}

impl Mode {
    /// Anything but "2" means single-question mode
    fn parse(input: &str) -> Self {
        if input.trim() == "2" {
            Mode::Evaluate
        } else {
            Mode::Single
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Empty,
    Query(&'a str),
}

impl<'a> Input<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") {
            Input::Quit
        } else if trimmed.is_empty() {
            Input::Empty
        } else {
            Input::Query(trimmed)
        }
    }
}

/// Print `prompt` and read one line; `None` on end of input.
async fn ask_line(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

pub async fn handle_repl(ctx: &AppContext) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(mode) = ask_line(&mut lines, "Choose mode: [1] Single question | [2] Evaluate file: ").await?
    else {
        return Ok(());
    };
    let pipeline = ctx.open_pipeline().await?;

    if Mode::parse(&mode) == Mode::Evaluate {
        let default_file = ctx.config.evaluation.file.clone();
        let prompt = format!(
            "Enter path to eval file (default: {}): ",
            default_file.display()
        );
        let file = ask_line(&mut lines, &prompt)
            .await?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default_file);
        return run_eval(ctx, pipeline, &file, None).await;
    }

    loop {
        let Some(line) =
            ask_line(&mut lines, "Please enter your question (or type 'quit' to exit): ").await?
        else {
            break;
        };

        let query = match Input::parse(&line) {
            Input::Quit => {
                println!("Exiting program.");
                break;
            }
            Input::Empty => {
                println!("Please enter a valid question.");
                continue;
            }
            Input::Query(query) => query,
        };

        println!("Processing your question...");
        match answer(&pipeline, query, None).await {
            Ok(response) => {
                print_response(&response, false);
                let dump = ask_line(&mut lines, "Print chunks? y/n: ").await?;
                if dump.as_deref().map(str::trim) == Some("y") {
                    ui::print_chunks(&response.chunks, Some(response.distances.as_slice()));
                }
            }
            Err(e) => ui::print_error(&format!("An error occurred during the RAG pipeline: {:#}", e)),
        }
        ui::print_rule();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        assert_eq!(Mode::parse(" 2\n"), Mode::Evaluate);
        assert_eq!(Mode::parse("1"), Mode::Single);
        assert_eq!(Mode::parse("anything"), Mode::Single);
    }

    #[test]
    fn test_input_parsing() {
        assert_eq!(Input::parse("QUIT"), Input::Quit);
        assert_eq!(Input::parse("   "), Input::Empty);
        assert_eq!(Input::parse(" capital of France? "), Input::Query("capital of France?"));
    }
}
