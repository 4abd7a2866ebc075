//! Loading highlighter configuration and match options from JSON.

use std::fs;

use tempfile::TempDir;
use xmlft::analysis::tokenizer::TokenizerKind;
use xmlft::error::FtError;
use xmlft::highlight::{HighlightConfig, HighlightMode, Highlighter};
use xmlft::query::{CaseMode, MatchOptions, ProximityFilter, Selection};
use xmlft::tree::{DocId, TreeBuilder};

#[test]
fn test_load_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("highlight.json");
    fs::write(
        &path,
        r#"{
            "mode": "generic",
            "tokenizer": "whitespace",
            "tag": "em",
            "alpha": 0.25
        }"#,
    )
    .unwrap();

    let config = HighlightConfig::load(&path).unwrap();
    assert_eq!(config.mode, HighlightMode::Generic);
    assert_eq!(config.tokenizer, TokenizerKind::Whitespace);
    assert_eq!(config.tag, "em");
    assert_eq!(config.css_class, None);
    assert_eq!(config.alpha, 0.25);

    let tree = TreeBuilder::document(DocId::new(0))
        .element("p")
        .text("a fox.")
        .end()
        .build()
        .unwrap();
    let highlighter =
        Highlighter::with_config(&Selection::word("fox."), MatchOptions::new(), config).unwrap();
    let mut traversal = highlighter.traverse_document(&tree).unwrap();
    assert_eq!(traversal.marked_text().unwrap(), "a <em>fox.</em>");
    assert_eq!(highlighter.model().scoring().alpha(), 0.25);
}

#[test]
fn test_load_errors() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");
    assert!(matches!(HighlightConfig::load(&missing), Err(FtError::Io(_))));

    let broken = temp_dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(HighlightConfig::load(&broken), Err(FtError::Json(_))));
}

#[test]
fn test_match_options_from_json() {
    let options: MatchOptions = serde_json::from_str(
        r#"{
            "language": "en-US",
            "case": "sensitive",
            "stemming": true,
            "filters": [{"type": "window", "words": 5}]
        }"#,
    )
    .unwrap();
    assert_eq!(options.language.as_deref(), Some("en-US"));
    assert_eq!(options.case, CaseMode::Sensitive);
    assert!(!options.diacritics_sensitive);
    assert!(options.stemming);
    assert_eq!(options.filters, vec![ProximityFilter::Window { words: 5 }]);

    let highlighter = Highlighter::new(&Selection::word("Fox"), options).unwrap();
    assert_eq!(highlighter.options().filters.len(), 1);
}
