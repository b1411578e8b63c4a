/*
 * scenarios.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end parsing scenarios: whole documents in, documents or errors out.
 */

use pretty_assertions::assert_eq;
use serde_json::json;
use tonguetoquill_metadata::{
    Collision, ParseError, ParseErrorKind, ParseOptions, ParseWarning, YamlValue, parse,
    parse_with_options,
};

/// Route parser events to the test output; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const MULTI_SCOPE: &str = "---
title: Global Metadata
---
Main document body.

---
SCOPE: sub_documents
title: First Sub-Document
---
Body of first sub-document.

---
SCOPE: sub_documents
title: Second Sub-Document
---
Body of second sub-document.
";

#[test]
fn global_block_and_scoped_blocks() {
    init_tracing();
    let doc = parse(MULTI_SCOPE).unwrap();

    assert_eq!(
        doc.get_field("title"),
        Some(&YamlValue::from("Global Metadata"))
    );
    assert_eq!(doc.fields().len(), 1);
    assert_eq!(doc.body(), "Main document body.");

    let entries = doc.scope("sub_documents");
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0].get_field("title").and_then(YamlValue::as_str),
        Some("First Sub-Document")
    );
    assert_eq!(entries[0].body(), "Body of first sub-document.");
    assert_eq!(
        entries[1].get_field("title").and_then(YamlValue::as_str),
        Some("Second Sub-Document")
    );
    assert_eq!(entries[1].body(), "Body of second sub-document.");
    assert!(entries[0].get_field("SCOPE").is_none());
    assert!(doc.warnings().is_empty());
}

#[test]
fn template_context_for_renderer() {
    let doc = parse(MULTI_SCOPE).unwrap();
    assert_eq!(
        doc.to_template_context(),
        json!({
            "title": "Global Metadata",
            "body": "Main document body.",
            "sub_documents": [
                {"title": "First Sub-Document", "body": "Body of first sub-document."},
                {"title": "Second Sub-Document", "body": "Body of second sub-document."}
            ]
        })
    );
}

#[test]
fn serialized_document_shape() {
    let doc = parse("---\nQUILL: letter\n---\nHi\n").unwrap();
    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({
            "fields": {"QUILL": "letter"},
            "body": "Hi",
            "scopes": {}
        })
    );
}

#[test]
fn global_fields_round_trip() {
    let doc = parse("---\nkey: value\n---\nBODY").unwrap();
    assert_eq!(doc.fields().len(), 1);
    assert_eq!(doc.get_field("key"), Some(&YamlValue::from("value")));
    assert_eq!(doc.body(), "BODY");
    assert!(doc.scopes().is_empty());
}

#[test]
fn typed_field_values() {
    let doc = parse(
        "---\ncount: 3\nratio: 0.5\ndraft: false\nnothing: ~\nanswer: yes\ntags: [a, b]\nauthor:\n  name: Ada\n---\n",
    )
    .unwrap();

    assert_eq!(doc.get_field("count"), Some(&YamlValue::Integer(3)));
    assert_eq!(doc.get_field("ratio"), Some(&YamlValue::Float(0.5)));
    assert_eq!(doc.get_field("draft"), Some(&YamlValue::Bool(false)));
    assert_eq!(doc.get_field("nothing"), Some(&YamlValue::Null));
    assert_eq!(doc.get_field("answer"), Some(&YamlValue::from("yes")));
    assert_eq!(
        doc.get_field("tags"),
        Some(&YamlValue::Sequence(vec!["a".into(), "b".into()]))
    );
    let author = doc.get_field("author").and_then(YamlValue::as_mapping).unwrap();
    assert_eq!(author.get("name").and_then(YamlValue::as_str), Some("Ada"));
    assert_eq!(doc.body(), "");
}

#[test]
fn no_frontmatter_is_all_body() {
    let text = "# Title\n\nSome *markdown* here.\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.body(), text);
    assert!(doc.fields().is_empty());
    assert!(doc.scopes().is_empty());
}

#[test]
fn empty_document() {
    let doc = parse("").unwrap();
    assert_eq!(doc.body(), "");
    assert!(doc.fields().is_empty());
}

#[test]
fn horizontal_rule_between_paragraphs() {
    let text = "text\n\n---\n\nmore text";
    let doc = parse(text).unwrap();
    assert_eq!(doc.body(), text);
    assert!(doc.fields().is_empty());
    assert!(doc.scopes().is_empty());
}

#[test]
fn horizontal_rule_inside_a_body() {
    init_tracing();
    let text = "---\ntitle: T\n---\nPart one.\n\n---\n\nPart two.\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.body(), "Part one.\n\n---\n\nPart two.");
    assert_eq!(doc.fields().len(), 1);
}

#[test]
fn labelled_paragraph_between_rules_stays_in_body() {
    let text = "---\ntitle: T\n---\nIntro\n\n---\n\nWarning: be careful\n\n---\n\nEnd\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.get_field("title"), Some(&YamlValue::from("T")));
    assert_eq!(doc.fields().len(), 1);
    assert_eq!(doc.body(), "Intro\n\n---\n\nWarning: be careful\n\n---\n\nEnd");
    assert!(doc.scopes().is_empty());
}

#[test]
fn rule_does_not_pair_with_delimiter_in_later_fence() {
    let text = "Intro\n\n---\n\nnote: |\n  ```\n---\nnot yaml\n  ```\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.body(), text);
    assert!(doc.fields().is_empty());
}

#[test]
fn blank_separated_delimiter_still_opens_a_yaml_block() {
    let text = "Intro.\n\n---\n\nSCOPE: notes\nlabel: first\n---\nNote body.";
    let doc = parse(text).unwrap();
    assert_eq!(doc.body(), "Intro.");
    assert_eq!(doc.scope("notes")[0].body(), "Note body.");
}

#[test]
fn leading_text_before_first_block_is_global_body() {
    let text = "Preface.\n\n---\nSCOPE: cards\n---\nCard.";
    let doc = parse(text).unwrap();
    assert_eq!(doc.body(), "Preface.");
    assert!(doc.fields().is_empty());
    assert_eq!(doc.scope("cards").len(), 1);
}

#[test]
fn empty_frontmatter_is_valid() {
    let doc = parse("---\n---\nBody").unwrap();
    assert!(doc.fields().is_empty());
    assert_eq!(doc.body(), "Body");

    let doc = parse("---\n# only a comment\n---\nBody").unwrap();
    assert!(doc.fields().is_empty());
}

#[test]
fn scoped_block_with_only_control_key() {
    let doc = parse("---\nSCOPE: dividers\n---\n").unwrap();
    let entries = doc.scope("dividers");
    assert_eq!(entries.len(), 1);
    assert!(entries[0].fields().is_empty());
    assert_eq!(entries[0].body(), "");
}

#[test]
fn quill_in_global_block() {
    let doc = parse("---\nQUILL: usaf_memo\nsubject: Test\n---\nMemo text").unwrap();
    assert_eq!(doc.quill_tag(), Some("usaf_memo"));
    assert_eq!(doc.get_field("QUILL"), Some(&YamlValue::from("usaf_memo")));
    assert_eq!(doc.get_field("subject"), Some(&YamlValue::from("Test")));
    assert_eq!(doc.body(), "Memo text");
}

#[test]
fn scopes_keep_first_appearance_order() {
    let text = "---\nSCOPE: zeta\nn: 1\n---\n\n---\nSCOPE: alpha\nn: 2\n---\n\n---\nSCOPE: zeta\nn: 3\n---\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.scopes().keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
    let numbers: Vec<_> = doc
        .scope("zeta")
        .iter()
        .filter_map(|entry| entry.get_field("n").and_then(YamlValue::as_i64))
        .collect();
    assert_eq!(numbers, vec![1, 3]);
}

#[test]
fn fenced_code_hides_delimiters() {
    let text = "---\ntitle: Docs\n---\nExample:\n\n```markdown\n---\ntitle: Inner\n---\n```\n";
    let doc = parse(text).unwrap();
    assert_eq!(doc.fields().len(), 1);
    assert_eq!(
        doc.body(),
        "Example:\n\n```markdown\n---\ntitle: Inner\n---\n```"
    );
}

#[test]
fn body_indentation_is_preserved() {
    let doc = parse("---\na: 1\n---\n\n    code block\n\n").unwrap();
    assert_eq!(doc.body(), "    code block");
}

#[test]
fn crlf_document() {
    let lf = parse(MULTI_SCOPE).unwrap();
    let crlf = parse(&MULTI_SCOPE.replace('\n', "\r\n")).unwrap();
    assert_eq!(lf, crlf);
}

#[test]
fn reserved_scope_name() {
    let err = parse("---\nSCOPE: body\n---\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::ReservedNameCollision {
            block: 0,
            line: 2,
            name: "body".to_string(),
            collision: Collision::BodyScope,
        }
    );
}

#[test]
fn reserved_global_field() {
    let err = parse("---\nbody: sneaky\n---\n").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::ReservedNameCollision);
}

#[test]
fn conflicting_control_keys() {
    let err = parse("---\nSCOPE: x\nQUILL: y\n---\n").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::ConflictingControlKeys);
    assert_eq!(err.block(), Some(0));
    assert_eq!(err.line(), Some(3));
}

#[test]
fn unclosed_block() {
    let err = parse("---\nkey: value\n").unwrap_err();
    assert_eq!(err, ParseError::UnclosedBlock { block: 0, line: 1 });
}

#[test]
fn unclosed_second_block() {
    let err = parse("---\na: 1\n---\nBody\n---\nSCOPE: x\n").unwrap_err();
    assert_eq!(err, ParseError::UnclosedBlock { block: 1, line: 5 });
}

#[test]
fn duplicate_global_block() {
    let err = parse("---\na: 1\n---\nOne\n\n---\nb: 2\n---\nTwo").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::DuplicateGlobalBlock);
    assert_eq!(err.block(), Some(1));
    assert_eq!(err.line(), Some(6));
}

#[test]
fn field_collides_with_scope_name() {
    let err = parse("---\ncards: many\n---\n\n---\nSCOPE: cards\n---\n").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::ReservedNameCollision);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn malformed_yaml_identifies_block() {
    let text = "---\ntitle: ok\n---\nBody\n\n---\nSCOPE: cards\nname: [broken\n---\n";
    let err = parse(text).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::MalformedYaml);
    assert_eq!(err.block(), Some(1));
    assert!(err.line().unwrap() >= 7);
}

#[test]
fn duplicate_yaml_key_is_malformed() {
    let err = parse("---\ntitle: a\ntitle: b\n---\n").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::MalformedYaml);
    assert_eq!(err.line(), Some(3));
}

#[test]
fn non_mapping_header_is_malformed() {
    let err = parse("---\n- a\n- b\n---\n").unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::MalformedYaml);
}

#[test]
fn invalid_scope_name_warns() {
    let doc = parse("---\nSCOPE: 1bad-name\ntitle: kept\n---\nStill here").unwrap();
    let entries = doc.scope("1bad-name");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].body(), "Still here");
    assert_eq!(
        doc.warnings(),
        &[ParseWarning::InvalidScopeName {
            block: 0,
            line: 2,
            name: "1bad-name".to_string(),
        }]
    );
}

#[test]
fn every_invalid_scope_name_is_reported() {
    let text = "---\nSCOPE: Bad\n---\n\n---\nSCOPE: Bad\n---\n\n---\nSCOPE: worse-1\n---\n";
    let doc = parse(text).unwrap();
    let blocks: Vec<_> = doc.warnings().iter().map(ParseWarning::block).collect();
    assert_eq!(blocks, vec![0, 1, 2]);
}

#[test]
fn numeric_scope_name_is_kept_with_warning() {
    let doc = parse("---\nSCOPE: 2024\ntitle: kept\n---\nBody").unwrap();
    let entries = doc.scope("2024");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get_field("title"), Some(&YamlValue::from("kept")));
    assert_eq!(entries[0].body(), "Body");
    assert_eq!(
        doc.warnings(),
        &[ParseWarning::InvalidScopeName {
            block: 0,
            line: 2,
            name: "2024".to_string(),
        }]
    );
}

#[test]
fn scalar_control_values_are_stringified() {
    let doc = parse("---\nSCOPE: true\n---\nFlag").unwrap();
    assert_eq!(doc.scope("true").len(), 1);
    assert!(doc.warnings().is_empty());

    let doc = parse("---\nQUILL: 3\nfrom: HQ\n---\nMemo").unwrap();
    assert_eq!(doc.get_field("QUILL"), Some(&YamlValue::Integer(3)));
    assert_eq!(doc.get_field("from"), Some(&YamlValue::from("HQ")));
    assert_eq!(doc.quill_tag(), None);
    assert_eq!(doc.body(), "Memo");
}

#[test]
fn null_control_value_is_rejected() {
    let err = parse("---\nSCOPE: ~\n---\n").unwrap_err();
    assert_eq!(
        err,
        ParseError::InvalidControlValue {
            block: 0,
            line: 2,
            key: "SCOPE",
            found: "null",
        }
    );
}

#[test]
fn strict_scope_names_are_fatal() {
    let options = ParseOptions {
        strict_scope_names: true,
        ..Default::default()
    };
    let err = parse_with_options("---\nSCOPE: 1bad-name\n---\n", &options).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::InvalidScopeName);
}

#[test]
fn size_limit_applies_before_parsing() {
    let options = ParseOptions::default().with_max_input_bytes(8);
    let err = parse_with_options("---\nunclosed: yes\n", &options).unwrap_err();
    assert_eq!(err.kind(), ParseErrorKind::InputTooLarge);
}
