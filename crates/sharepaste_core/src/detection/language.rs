//! Fixed language allow-list and alias canonicalization.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language tag stored with every paste.
///
/// Wire tags are the lowercase variant names (`plaintext`, `csharp`, `cpp`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Plaintext,
    Javascript,
    Python,
    Java,
    Csharp,
    Php,
    Ruby,
    Go,
    Swift,
    Kotlin,
    Rust,
    Sql,
    Html,
    Css,
    Xml,
    Json,
    Markdown,
    Bash,
    Typescript,
    Cpp,
    C,
}

impl Language {
    /// Every allowed language, in wire-tag order.
    pub const ALL: [Language; 21] = [
        Self::Plaintext,
        Self::Javascript,
        Self::Python,
        Self::Java,
        Self::Csharp,
        Self::Php,
        Self::Ruby,
        Self::Go,
        Self::Swift,
        Self::Kotlin,
        Self::Rust,
        Self::Sql,
        Self::Html,
        Self::Css,
        Self::Xml,
        Self::Json,
        Self::Markdown,
        Self::Bash,
        Self::Typescript,
        Self::Cpp,
        Self::C,
    ];

    /// Canonical wire tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Javascript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Csharp => "csharp",
            Self::Php => "php",
            Self::Ruby => "ruby",
            Self::Go => "go",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Rust => "rust",
            Self::Sql => "sql",
            Self::Html => "html",
            Self::Css => "css",
            Self::Xml => "xml",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Bash => "bash",
            Self::Typescript => "typescript",
            Self::Cpp => "cpp",
            Self::C => "c",
        }
    }
}

/// Map a tag or common alias to an allowed language.
///
/// # Returns
/// `None` when the input names nothing on the allow-list.
pub fn canonicalize(language: &str) -> Option<Language> {
    let lowered = language.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "text" | "txt" | "plain" | "plain text" => "plaintext",
        "js" | "node" | "jsx" | "mjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" | "python3" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "kt" | "kts" => "kotlin",
        "golang" => "go",
        "cs" | "c#" => "csharp",
        "c++" | "cc" | "cxx" | "hpp" => "cpp",
        "h" => "c",
        "sh" | "shell" | "zsh" => "bash",
        "md" => "markdown",
        "htm" => "html",
        other => other,
    };
    Language::ALL
        .into_iter()
        .find(|candidate| candidate.as_str() == canonical)
}

impl FromStr for Language {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        canonicalize(value)
            .ok_or_else(|| AppError::InvalidInput(format!("Unsupported language '{}'", value)))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
