use console::Style;
use ragline_core::Chunk;
use std::time::Duration;

/// Answers are wrapped to this many columns
pub const ANSWER_WIDTH: usize = 80;

pub fn print_header(title: &str) {
    println!("\n{}", Style::new().bold().cyan().apply_to(title));
    println!("{}", Style::new().dim().apply_to("─".repeat(title.chars().count())));
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("ERROR:"), msg);
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "{}: {}",
        Style::new().dim().apply_to(key),
        Style::new().bold().apply_to(value)
    );
}

pub fn wrap_answer(answer: &str) -> String {
    textwrap::fill(answer, ANSWER_WIDTH)
}

pub fn print_answer(answer: &str) {
    println!("{}", Style::new().bold().apply_to("Answer:"));
    println!("{}", wrap_answer(answer));
}

pub fn print_sources(sources: &[String]) {
    println!("{}", Style::new().bold().apply_to("Sources:"));
    for source in sources {
        println!("{}", source);
    }
}

/// Retrieved chunks with their titles; distances when known.
pub fn print_chunks(chunks: &[Chunk], distances: Option<&[f32]>) {
    println!("{}", Style::new().bold().apply_to("Retrieved chunks:"));
    for (i, chunk) in chunks.iter().enumerate() {
        let label = match distances.and_then(|d| d.get(i)) {
            Some(distance) => format!("Chunk {} (distance {:.4}):", i + 1, distance),
            None => format!("Chunk {}:", i + 1),
        };
        println!("{}", Style::new().bold().blue().apply_to(label));
        println!("{}", chunk.content);
        println!(
            "{}",
            Style::new()
                .dim()
                .apply_to(format!("(Source: {})", chunk.title().unwrap_or_default()))
        );
        println!("{}", Style::new().dim().apply_to("-".repeat(50)));
    }
}

pub fn print_elapsed(elapsed: Duration) {
    println!(
        "{}",
        Style::new()
            .dim()
            .apply_to(format!("Time taken: {:.2} seconds", elapsed.as_secs_f64()))
    );
}

pub fn print_rule() {
    println!("{}", Style::new().dim().apply_to("-".repeat(60)));
}
