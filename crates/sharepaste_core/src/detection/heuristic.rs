//! Sample preparation and per-language predicates for the detection table.
//!
//! Every predicate is a cheap substring/prefix probe over a bounded,
//! case-folded sample. Predicates only need to be specific enough for their
//! position in the rule table: earlier rules have already claimed their matches.

const SAMPLE_MAX_BYTES: usize = 64 * 1024;
const SAMPLE_MAX_LINES: usize = 512;

/// Bounded, pre-folded view of the content under inspection.
pub(super) struct Sample<'a> {
    /// Trimmed original text (bounded).
    text: &'a str,
    /// ASCII-lowercased `text`.
    lower: String,
    /// Whether the bounded sample cut the content short.
    truncated: bool,
    shebang: Option<String>,
}

impl<'a> Sample<'a> {
    pub(super) fn new(trimmed: &'a str) -> Self {
        let text = utf8_prefix(trimmed, SAMPLE_MAX_BYTES);
        Self {
            text,
            lower: text.to_ascii_lowercase(),
            truncated: text.len() < trimmed.len(),
            shebang: shebang_interpreter(text),
        }
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.lower.lines().take(SAMPLE_MAX_LINES)
    }

    fn has(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    fn has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|needle| self.lower.contains(needle))
    }

    fn hits(&self, needles: &[&str]) -> usize {
        needles
            .iter()
            .filter(|needle| self.lower.contains(**needle))
            .count()
    }

    /// `needle` occurs at a word start (not preceded by an identifier char).
    fn has_word(&self, needle: &str) -> bool {
        contains_at_word_start(&self.lower, needle)
    }

    fn shebang_in(&self, interpreters: &[&str]) -> bool {
        self.shebang
            .as_deref()
            .is_some_and(|name| interpreters.contains(&name))
    }
}

pub(super) fn shebang_python(s: &Sample) -> bool {
    s.shebang_in(&["python", "python2", "python3", "pypy", "pypy3"])
}

pub(super) fn shebang_bash(s: &Sample) -> bool {
    s.shebang_in(&["sh", "bash", "zsh", "ksh", "dash", "ash"])
}

pub(super) fn shebang_javascript(s: &Sample) -> bool {
    s.shebang_in(&["node", "nodejs", "deno", "bun"])
}

pub(super) fn shebang_ruby(s: &Sample) -> bool {
    s.shebang_in(&["ruby"])
}

pub(super) fn shebang_php(s: &Sample) -> bool {
    s.shebang_in(&["php"])
}

pub(super) fn json(s: &Sample) -> bool {
    if !(s.text.starts_with('{') || s.text.starts_with('[')) {
        return false;
    }
    // A truncated sample of a large document will not end with its closing delimiter.
    let looks_closed = s.text.ends_with('}') || s.text.ends_with(']');
    s.text.contains('"')
        && (s.text.contains(':') || s.text.starts_with('['))
        && (looks_closed || s.truncated)
}

pub(super) fn html(s: &Sample) -> bool {
    let tag_hits = s.hits(&[
        "<html", "<head", "<body", "<div", "<span", "<script", "<style", "<p>", "<a ",
    ]);
    s.has("<!doctype html") || s.has("<html") || (s.text.starts_with('<') && tag_hits >= 2)
}

pub(super) fn xml(s: &Sample) -> bool {
    s.lower.starts_with("<?xml") || (s.text.starts_with('<') && s.has("</"))
}

pub(super) fn php(s: &Sample) -> bool {
    s.has("<?php") || s.lower.starts_with("<?=")
}

pub(super) fn rust(s: &Sample) -> bool {
    let has_fn = s.has_word("fn ");
    (has_fn
        && s.has_any(&[
            "let ", "->", "println!", "impl ", "::", "&self", "mut ", "pub ", "struct ",
        ]))
        || s.has("fn main()")
        || (s.has_word("impl ") && s.has_word("struct "))
        || s.has_any(&["use std::", "#[derive("])
}

pub(super) fn kotlin(s: &Sample) -> bool {
    (s.has_word("fun ") && s.has_any(&["val ", "var ", "println(", ": string", ": int", "): "]))
        || s.has_any(&["data class ", "companion object", "import kotlin."])
}

pub(super) fn bash(s: &Sample) -> bool {
    let hits = [
        s.has("echo ") && s.has("$"),
        s.has("\nfi"),
        s.has("\ndone"),
        s.has("if ["),
        s.has("; then"),
        s.has(" then\n"),
        s.has("case ") && s.has("esac"),
    ]
    .iter()
    .filter(|hit| **hit)
    .count();
    hits >= 2 && s.text.contains('\n')
}

pub(super) fn python(s: &Sample) -> bool {
    let has_block_header = s.lines().any(|line| line.trim_end().ends_with(':'));
    (s.has_word("def ") && has_block_header)
        || (s.has_word("class ") && has_block_header && s.has("self"))
        || s.has("if __name__ ==")
        || (s.has_word("elif ") && has_block_header)
        || looks_like_python_from_import(s)
}

pub(super) fn typescript(s: &Sample) -> bool {
    let has_annotation = s.has_any(&[
        ": string",
        ": number",
        ": boolean",
        ": any",
        ": void",
        ": unknown",
        " as const",
        "readonly ",
    ]);
    let other_family = s.has_any(&[
        "public static",
        "import java.",
        "system.out.",
        "package ",
        "using system",
        "import foundation",
        "import swiftui",
        "import uikit",
    ]) || s.has_word("func ");
    let has_type_alias = s.lines().any(|line| {
        let trimmed = line.trim_start();
        (trimmed.starts_with("type ") || trimmed.starts_with("export type "))
            && trimmed.contains(" = ")
    });
    !other_family && (has_annotation || has_type_alias || s.has_word("interface "))
}

pub(super) fn javascript(s: &Sample) -> bool {
    let has_binding = s.has_word("const ") || s.has_word("let ") || s.has_word("var ");
    s.has_any(&[
        "console.log",
        "console.error",
        "console.warn",
        "document.",
        "window.",
        "require(",
        "module.exports",
        "export default",
        "addeventlistener(",
    ]) || (s.has_word("function") && s.has("{"))
        || (has_binding && s.has("=>"))
        || (s.has_word("import ") && s.has_any(&[" from '", " from \""]))
}

pub(super) fn java(s: &Sample) -> bool {
    if s.has("using system") || s.has_word("namespace ") {
        return false;
    }
    s.has_any(&["import java.", "system.out.", "public static void main"])
        || s.hits(&[
            "public class",
            "@override",
            " extends ",
            " implements ",
            "package ",
            "private final ",
        ]) >= 2
}

pub(super) fn cpp(s: &Sample) -> bool {
    let has_std_scope = s.has("std::");
    let has_usage = s.has_any(&["cout", "vector<", "::iterator", "int main("]);
    s.has_any(&["using namespace std", "template <", "template<", "#include <iostream>"])
        || (has_std_scope && has_usage)
}

pub(super) fn c(s: &Sample) -> bool {
    s.has("#include") && s.has_any(&["int main", "printf", "malloc(", "struct "])
}

pub(super) fn csharp(s: &Sample) -> bool {
    let has_namespace_class = s.has_word("namespace ") && s.has_word("class ");
    s.has("using system")
        || s.has_any(&["console.writeline", "console.readline", "{ get; set; }"])
        || has_namespace_class
}

pub(super) fn go(s: &Sample) -> bool {
    s.has("package main")
        || (s.has_word("func ") && s.has_any(&["fmt.", ":=", "package "]))
        || s.has("import (\n")
}

pub(super) fn swift(s: &Sample) -> bool {
    s.has_any(&["import foundation", "import swiftui", "import uikit", "guard let"])
        || (s.has_word("func ") && s.has_any(&["-> ", "let ", "var ", "print(", "protocol "]))
}

pub(super) fn ruby(s: &Sample) -> bool {
    let has_end_line = s.lines().any(|line| line.trim() == "end");
    (s.has_word("def ") && has_end_line)
        || s.has_any(&["attr_accessor", "attr_reader", ".each do", "require '"])
        || (s.has_word("puts ") && has_end_line)
}

pub(super) fn markdown(s: &Sample) -> bool {
    if s.text.contains("```") || s.text.contains("](") {
        return true;
    }
    let mut list_lines = 0usize;
    for line in s.text.lines().take(SAMPLE_MAX_LINES) {
        let trimmed = line.trim_start();
        if is_heading_line(trimmed) || trimmed.starts_with("> ") {
            return true;
        }
        if is_list_line(trimmed) {
            list_lines += 1;
        }
    }
    list_lines >= 2
}

pub(super) fn css(s: &Sample) -> bool {
    if !(s.has("{") && s.has("}") && s.has(":") && s.has(";")) {
        return false;
    }
    s.has_any(&[
        "color:",
        "background",
        "margin",
        "padding",
        "font-",
        "display:",
        "position:",
        "border",
        "width:",
        "height:",
    ])
}

pub(super) fn sql(s: &Sample) -> bool {
    s.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            return false;
        }
        looks_like_select_sql_line(trimmed)
            || (trimmed.starts_with("insert into ") && trimmed.contains("values"))
            || (trimmed.starts_with("update ") && trimmed.contains(" set "))
            || (trimmed.starts_with("delete from ")
                && (trimmed.contains(" where ") || trimmed.ends_with(';')))
            || trimmed.starts_with("create table ")
            || trimmed.starts_with("alter table ")
            || trimmed.starts_with("drop table ")
    })
}

fn is_heading_line(line: &str) -> bool {
    let hashes = line.chars().take_while(|ch| *ch == '#').count();
    (1..=6).contains(&hashes) && line[hashes..].starts_with(' ')
}

fn is_list_line(line: &str) -> bool {
    if line.starts_with("- ") || line.starts_with("* ") || line.starts_with("+ ") {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with(". ")
}

fn looks_like_python_from_import(s: &Sample) -> bool {
    s.lines().any(|line| {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("from ") else {
            return false;
        };
        let Some((module, imported)) = rest.split_once(" import ") else {
            return false;
        };
        let module = module.trim();
        !module.is_empty()
            && !imported.trim().is_empty()
            && module
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
    })
}

fn looks_like_select_sql_line(line: &str) -> bool {
    let Some(after_select) = line.strip_prefix("select ") else {
        return false;
    };
    let Some((projection, from_tail)) = after_select.split_once(" from ") else {
        return false;
    };
    let projection = projection.trim();
    if projection.is_empty() {
        return false;
    }
    let source = from_tail
        .split_whitespace()
        .next()
        .map(|token| token.trim_matches(|ch: char| matches!(ch, ',' | ';')))
        .unwrap_or("");
    is_sql_identifier_path(source)
}

fn is_sql_identifier_path(token: &str) -> bool {
    !token.is_empty() && token.split('.').all(is_sql_identifier)
}

fn is_sql_identifier(token: &str) -> bool {
    let token = token.trim_matches(|ch| matches!(ch, '"' | '`' | '[' | ']'));
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

fn contains_at_word_start(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |prev| !(prev.is_alphanumeric() || prev == '_'))
    })
}

fn shebang_interpreter(sample: &str) -> Option<String> {
    let first_line = sample.lines().next()?.trim();
    let interpreter_line = first_line.strip_prefix("#!")?.trim();
    let mut parts = interpreter_line.split_whitespace();
    let first = parts.next()?;
    let mut interpreter = first;
    if path_basename(first).eq_ignore_ascii_case("env") {
        interpreter = parts.find(|arg| !arg.starts_with('-'))?;
    }

    let basename = path_basename(interpreter).trim();
    if basename.is_empty() {
        return None;
    }
    Some(basename.to_ascii_lowercase())
}

fn path_basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn utf8_prefix(content: &str, max_bytes: usize) -> &str {
    if content.len() <= max_bytes {
        return content;
    }
    let mut end = max_bytes;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}
