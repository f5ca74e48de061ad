use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::wire::{Answer, Confidence, Invocation, SourceKind};

/// Spinner on stderr while waiting for the completion service.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn source_badge(kind: SourceKind) -> colored::ColoredString {
    match kind {
        SourceKind::Quran => "[CORAN]".green().bold(),
        SourceKind::Hadith => "[HADITH]".yellow().bold(),
        SourceKind::Scholars => "[SAVANTS]".cyan().bold(),
    }
}

fn confidence_badge(c: Confidence) -> colored::ColoredString {
    match c {
        Confidence::High => "élevée".green().bold(),
        Confidence::Medium => "moyenne".yellow().bold(),
        Confidence::Low => "faible".red().bold(),
        Confidence::Unknown => "inconnue".dimmed(),
    }
}

fn bullets(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", title.bold());
    for item in items {
        println!("  • {}", item);
    }
}

pub fn show_invocation(dua: &Invocation) {
    println!("\n=== DUA ===");
    if let Some(title) = &dua.title {
        println!("{}", title.bold());
    }
    println!("{}", dua.arabic_text.bold());
    println!("{}", dua.transliteration.italic());
    println!("{}", dua.translation);
    println!();

    print!("{} {}", source_badge(dua.source.kind), dua.source.reference);
    match &dua.source.details {
        Some(d) => println!("  ({})", d.dimmed()),
        None => println!(),
    }
    if let Some(a) = &dua.authenticity {
        println!("{} {}", "Authenticité:".bold(), a);
    }
    if !dua.context.is_empty() {
        println!("{} {}", "Contexte:".bold(), dua.context);
    }
    if !dua.tags.is_empty() {
        println!("{} {}", "Thèmes:".bold(), dua.tags.join(", "));
    }
    bullets("Bienfaits:", &dua.benefits);
    bullets("Occasions:", &dua.occasions);

    if let Some(related) = dua.related_duas.as_deref().filter(|r| !r.is_empty()) {
        println!("{}", "Duas similaires:".bold());
        for r in related {
            println!("  • {} - {}", r.title, r.translation.dimmed());
        }
    }
    println!();
}

pub fn show_answer(answer: &Answer) {
    println!("\n=== RÉPONSE ===");
    println!("{}", answer.answer);
    println!();
    println!("{} {}", "Confiance:".bold(), confidence_badge(answer.confidence));
    if let Some(sources) = &answer.sources {
        println!("{}", "Sources:".bold());
        for s in sources {
            println!("  • {} - {}", s.title, s.reference);
        }
    }
    println!();
}

pub fn show_diagnostic(provider: &str, result: &Result<String, crate::errors::PipelineError>) {
    match result {
        Ok(text) => println!("{} {}: {}", "[OK]".green().bold(), provider, text),
        Err(e) => println!("{} {}: {}", "[FAIL]".red().bold(), provider, e),
    }
}
