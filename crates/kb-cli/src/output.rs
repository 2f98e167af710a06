//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use kb_core::{KnowledgeDocument, ScoredResult};

/// Print stored documents as a table.
pub fn print_documents_table(docs: &[KnowledgeDocument]) {
    if docs.is_empty() {
        println!("{}", "No knowledge entries found.".dimmed());
        return;
    }

    println!("{:<10} {:<16} {:<6} {:<50}", "ID", "Category", "Dims", "Content");
    println!("{}", "─".repeat(84));

    for doc in docs {
        let dims = if doc.has_embedding() {
            doc.dimensions().to_string().normal()
        } else {
            "-".red()
        };
        println!(
            "{:<10} {:<16} {:<6} {:<50}",
            short_id(&doc.id).dimmed(),
            doc.category.as_str().cyan(),
            dims,
            truncate(&doc.content, 48)
        );
    }
}

/// Print ranked results with a colored score.
pub fn print_results(results: &[ScoredResult]) {
    if results.is_empty() {
        println!("{}", "No relevant knowledge found.".dimmed());
        return;
    }

    println!("{} Found {} results:\n", "✓".green().bold(), results.len());

    for (i, result) in results.iter().enumerate() {
        println!(
            "  {}. {} ({})",
            (i + 1).to_string().bold(),
            result.content,
            score_label(result.score),
        );
    }
}

fn score_label(score: f32) -> ColoredString {
    let text = format!("{:.4}", score);
    if score > 0.8 {
        text.green()
    } else if score > 0.5 {
        text.yellow()
    } else {
        text.red()
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Truncate to `max_chars` characters, marking the cut with "...".
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let head: String = s.chars().take(keep).collect();
    format!("{}...", head)
}
