//! Detection tests for the rule table, tie-breaks, and canonicalization.

use super::{canonicalize, detect, Language};

fn assert_detection_cases(cases: &[(&str, Language)]) {
    for (content, expected) in cases {
        assert_eq!(detect(content), *expected, "content: {content}");
    }
}

#[test]
fn short_or_blank_content_is_plaintext() {
    let cases = [
        ("", Language::Plaintext),
        ("   \n\t  ", Language::Plaintext),
        ("fn x() {}", Language::Plaintext),
        ("   {\"a\":1}   ", Language::Plaintext),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn detects_reference_snippets() {
    let cases = [
        ("def foo():\n    pass", Language::Python),
        ("function foo() { console.log('x'); }", Language::Javascript),
        ("fn main() { let x = 1; }", Language::Rust),
        ("fun main() {\n    val x = 1\n    println(x)\n}", Language::Kotlin),
        ("#!/bin/bash\necho hello", Language::Bash),
        (
            "if [ -f file ]; then\n  echo \"$HOME\"\nfi",
            Language::Bash,
        ),
        ("{\"name\": \"demo\", \"ok\": true}", Language::Json),
        (
            "<!DOCTYPE html>\n<html><body><p>hi</p></body></html>",
            Language::Html,
        ),
        (
            "<?xml version=\"1.0\"?>\n<note><to>A</to></note>",
            Language::Xml,
        ),
        ("<?php echo 'hello world'; ?>", Language::Php),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn detects_compiled_language_family() {
    let cases = [
        (
            "public class Main {\n  public static void main(String[] args) {\n    System.out.println(\"hi\");\n  }\n}",
            Language::Java,
        ),
        (
            "#include <iostream>\nint main() { std::cout << \"hi\"; }",
            Language::Cpp,
        ),
        (
            "#include <stdio.h>\nint main() { printf(\"hi\"); return 0; }",
            Language::C,
        ),
        (
            "using System;\nnamespace Demo { class Program { static void Main() { Console.WriteLine(\"hi\"); } } }",
            Language::Csharp,
        ),
        (
            "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}",
            Language::Go,
        ),
        (
            "import Foundation\nfunc greet() {\n  print(\"hi\")\n}",
            Language::Swift,
        ),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn detects_scripting_and_markup_family() {
    let cases = [
        (
            "const x: number = 5;\nfunction f(a: string): void {}",
            Language::Typescript,
        ),
        (
            "def greet(name)\n  puts \"Hello #{name}\"\nend",
            Language::Ruby,
        ),
        ("# Title\n\nSome **bold** text", Language::Markdown),
        ("body {\n  margin: 0;\n  padding: 0;\n}", Language::Css),
        (
            "SELECT id, name FROM users WHERE active = 1;",
            Language::Sql,
        ),
        ("#!/usr/bin/env python3\nprint('hi')", Language::Python),
        ("#!/usr/bin/env node\nprocess.exit(0)", Language::Javascript),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn unrecognized_prose_is_plaintext() {
    let cases = [
        ("just some plain text words here", Language::Plaintext),
        (
            "Meeting notes: bring snacks and the projector.",
            Language::Plaintext,
        ),
    ];
    assert_detection_cases(cases.as_slice());
}

#[test]
fn rule_order_breaks_ties() {
    // Shebang outranks body keywords that would otherwise match JavaScript.
    assert_eq!(
        detect("#!/bin/sh\nconsole.log() {\n}"),
        Language::Bash
    );
    // JSON outranks JavaScript even when it mentions JS keywords.
    assert_eq!(
        detect("{\"script\": \"console.log('x')\"}"),
        Language::Json
    );
    // Fenced Python inside markdown still reports Python.
    assert_eq!(
        detect("```python\ndef foo():\n    pass\n```"),
        Language::Python
    );
}

#[test]
fn detection_is_deterministic() {
    let content = "fn main() {\n    println!(\"hi\");\n}";
    let first = detect(content);
    for _ in 0..8 {
        assert_eq!(detect(content), first);
    }
}

#[test]
fn large_json_is_detected_from_truncated_sample() {
    let body = (0..20_000)
        .map(|idx| format!("{{\"k{idx}\": {idx}}}"))
        .collect::<Vec<_>>()
        .join(",");
    let content = format!("[{}]", body);
    assert!(content.len() > 64 * 1024);
    assert_eq!(detect(&content), Language::Json);
}

#[test]
fn canonicalize_accepts_tags_and_aliases() {
    for language in Language::ALL {
        assert_eq!(canonicalize(language.as_str()), Some(language));
    }
    let cases = [
        ("JS", Some(Language::Javascript)),
        (" ts ", Some(Language::Typescript)),
        ("c++", Some(Language::Cpp)),
        ("C#", Some(Language::Csharp)),
        ("sh", Some(Language::Bash)),
        ("text", Some(Language::Plaintext)),
        ("yaml", None),
        ("", None),
    ];
    for (raw, expected) in cases {
        assert_eq!(canonicalize(raw), expected, "raw: {raw:?}");
    }
}

#[test]
fn language_parse_rejects_unknown_tags() {
    let err = "cobol".parse::<Language>().expect_err("not on allow-list");
    assert!(matches!(err, crate::AppError::InvalidInput(_)));
}
