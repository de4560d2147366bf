//! Content-based language auto-detection.
//!
//! Detection is an ordered table of `(language, predicate)` rules scanned
//! top to bottom; the first predicate that holds decides the language. Order
//! is the tie-break, so specific signals (shebangs, data formats) sit before
//! the keyword probes for general-purpose languages.

mod heuristic;
/// Language allow-list and alias canonicalization.
pub mod language;
#[cfg(test)]
mod tests;

pub use language::{canonicalize, Language};

use heuristic::Sample;

/// Content shorter than this (after trimming) is always plain text.
pub const MIN_DETECTABLE_CHARS: usize = 10;

type Rule = (Language, fn(&Sample) -> bool);

const RULES: &[Rule] = &[
    (Language::Python, heuristic::shebang_python),
    (Language::Bash, heuristic::shebang_bash),
    (Language::Javascript, heuristic::shebang_javascript),
    (Language::Ruby, heuristic::shebang_ruby),
    (Language::Php, heuristic::shebang_php),
    (Language::Json, heuristic::json),
    (Language::Html, heuristic::html),
    (Language::Xml, heuristic::xml),
    (Language::Php, heuristic::php),
    (Language::Rust, heuristic::rust),
    (Language::Kotlin, heuristic::kotlin),
    (Language::Bash, heuristic::bash),
    (Language::Python, heuristic::python),
    (Language::Typescript, heuristic::typescript),
    (Language::Javascript, heuristic::javascript),
    (Language::Java, heuristic::java),
    (Language::Cpp, heuristic::cpp),
    (Language::C, heuristic::c),
    (Language::Csharp, heuristic::csharp),
    (Language::Go, heuristic::go),
    (Language::Swift, heuristic::swift),
    (Language::Ruby, heuristic::ruby),
    (Language::Markdown, heuristic::markdown),
    (Language::Css, heuristic::css),
    (Language::Sql, heuristic::sql),
];

/// Guess the language of `content`.
///
/// Pure and deterministic: the same input always yields the same language.
///
/// # Returns
/// The first matching rule's language, or [`Language::Plaintext`] for short
/// or unrecognized content.
pub fn detect(content: &str) -> Language {
    let trimmed = content.trim();
    if trimmed.chars().count() < MIN_DETECTABLE_CHARS {
        return Language::Plaintext;
    }
    let sample = Sample::new(trimmed);
    RULES
        .iter()
        .find(|(_, matches)| matches(&sample))
        .map(|(language, _)| *language)
        .unwrap_or(Language::Plaintext)
}
