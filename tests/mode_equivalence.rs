//! Generic and index-accelerated traversals must agree on every event.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use xmlft::analysis::token::TokenStream;
use xmlft::analysis::tokenizer::{Tokenizer, TokenizerKind, UnicodeWordTokenizer};
use xmlft::error::{FtError, Result};
use xmlft::highlight::{Event, HighlightConfig, HighlightMode, Highlighter, Mode};
use xmlft::index::{IndexedStore, PostingIndex, ResolvedQuery, TermPostingIndex, next_generation};
use xmlft::query::matcher::TermMatcher;
use xmlft::query::{MatchOptions, Selection};
use xmlft::tree::{DocId, MemoryTree, NodeId, NodeKind, NodeTree, TreeBuilder};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn documents() -> Vec<MemoryTree> {
    vec![
        TreeBuilder::document(DocId::new(0))
            .element("article")
            .attribute("title", "The fox")
            .element("p")
            .text("The quick brown fox jumps over the lazy dog.")
            .end()
            .element("p")
            .text("Nothing to see here.")
            .end()
            .comment("fox in a comment")
            .element("p")
            .text("Foxes were jumping; the lazy   dog slept.")
            .end()
            .end()
            .build()
            .unwrap(),
        TreeBuilder::document(DocId::new(0))
            .element("section")
            .element("title")
            .text("Hounds and cats")
            .end()
            .pi("page", "2")
            .element("p")
            .text("A hound, ")
            .element("b")
            .text("two hounds")
            .end()
            .text(" and no fox")
            .end()
            .element("empty")
            .end()
            .end()
            .build()
            .unwrap(),
        TreeBuilder::document(DocId::new(0))
            .element("p")
            .text("unrelated words only")
            .end()
            .build()
            .unwrap(),
        TreeBuilder::fragment(DocId::new(0)).build().unwrap(),
    ]
}

fn selection() -> Selection {
    Selection::any(vec![
        Selection::word("fox"),
        Selection::all(vec![Selection::word("lazy dog"), Selection::wildcard("jump.*")]),
        Selection::mild_not(Selection::word("hound"), Selection::word("cat")),
    ])
}

type Record = (Event, Option<NodeId>, Option<String>, Option<usize>, usize);

fn record(highlighter: &Highlighter, tree: &dyn NodeTree, expected: Mode) -> Vec<Record> {
    let mut traversal = highlighter.traverse_document(tree).unwrap();
    if tree.root().is_some() {
        assert_eq!(traversal.mode(), expected);
    }
    let mut records = Vec::new();
    loop {
        let event = traversal.advance().unwrap();
        let words = traversal.enclosed_word_count().unwrap();
        records.push((
            event,
            traversal.current_node_id(),
            traversal.current_text().map(str::to_string),
            traversal.matched_term_position(),
            words,
        ));
        if event == Event::End {
            return records;
        }
    }
}

#[test]
fn test_modes_produce_identical_events() {
    init_logger();
    let mut store = IndexedStore::new();
    for tree in documents() {
        store.insert(tree).unwrap();
    }

    for options in [
        MatchOptions::new(),
        MatchOptions::new().stemming(true),
        MatchOptions::new().diacritics_sensitive(true),
    ] {
        let indexed = Highlighter::new(&selection(), options.clone()).unwrap();
        let generic = Highlighter::with_config(
            &selection(),
            options,
            HighlightConfig::new().mode(HighlightMode::Generic),
        )
        .unwrap();

        let mut terms = 0;
        for i in 0..store.len() {
            let document = store.document(DocId::new(i as u32)).unwrap();
            let a = record(&generic, &document, Mode::Generic);
            let b = record(&indexed, &document, Mode::Indexed);
            assert_eq!(a, b, "document {i}");
            terms += a.iter().filter(|r| r.0 == Event::Term).count();

            if let Some(root) = document.root() {
                assert_eq!(
                    generic.score(&document, root).unwrap(),
                    indexed.score(&document, root).unwrap()
                );
            }
        }
        assert!(terms >= 5);
    }
}

#[test]
fn test_subtree_traversal_in_indexed_mode() {
    init_logger();
    let mut store = IndexedStore::new();
    let doc = store.insert(documents().remove(0)).unwrap();
    let document = store.document(doc).unwrap();
    let highlighter = Highlighter::new(&Selection::word("dog"), MatchOptions::new()).unwrap();

    // The last paragraph only; hits of earlier paragraphs are skipped.
    let last = (0..document.tree().len() as u32)
        .map(NodeId::new)
        .filter(|&node| document.kind(node).unwrap() == NodeKind::Element)
        .last()
        .unwrap();
    let mut traversal = highlighter.traverse(&document, last).unwrap();
    assert_eq!(traversal.mode(), Mode::Indexed);
    assert_eq!(
        traversal.marked_text().unwrap(),
        "Foxes were jumping; the lazy   <mark>dog</mark> slept."
    );
}

#[derive(Debug, Default)]
struct CountingTokenizer {
    inner: UnicodeWordTokenizer,
    calls: AtomicUsize,
}

impl Tokenizer for CountingTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.tokenize(text)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[test]
fn test_indexed_mode_tokenizes_only_cited_nodes() {
    init_logger();
    let tokenizer = Arc::new(CountingTokenizer::default());
    let mut store = IndexedStore::with_tokenizer(tokenizer.clone());
    let doc = store.insert(documents().remove(0)).unwrap();
    let document = store.document(doc).unwrap();

    let indexed = Highlighter::new(&Selection::word("fox"), MatchOptions::new())
        .unwrap()
        .with_tokenizer(tokenizer.clone())
        .unwrap();
    let generic = Highlighter::with_config(
        &Selection::word("fox"),
        MatchOptions::new(),
        HighlightConfig::new().mode(HighlightMode::Generic),
    )
    .unwrap()
    .with_tokenizer(tokenizer.clone())
    .unwrap();

    let drain = |highlighter: &Highlighter| {
        tokenizer.calls.store(0, Ordering::SeqCst);
        let events: Vec<Event> = highlighter
            .traverse_document(&document)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        (events, tokenizer.calls.load(Ordering::SeqCst))
    };

    let (generic_events, generic_calls) = drain(&generic);
    let (indexed_events, indexed_calls) = drain(&indexed);
    assert_eq!(generic_events, indexed_events);
    // Attributes are off the child chain; generic mode tokenizes the three
    // paragraphs, the index cites only the one holding "fox".
    assert_eq!(generic_calls, 3);
    assert_eq!(indexed_calls, 1);
}

/// An index whose cursor cites fixed nodes regardless of the query.
struct LyingIndex {
    hits: Vec<(DocId, NodeId)>,
    generation: u64,
}

impl PostingIndex for LyingIndex {
    fn tokenizer_name(&self) -> &str {
        "unicode_word"
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn resolve(&self, matcher: &TermMatcher) -> Result<ResolvedQuery> {
        Ok(ResolvedQuery::new(self.hits.clone(), vec![1.0; matcher.len()]))
    }
}

/// Counts how often the wrapped index resolves a query.
struct CountingIndex<'a> {
    inner: &'a TermPostingIndex,
    resolves: AtomicUsize,
}

impl PostingIndex for CountingIndex<'_> {
    fn tokenizer_name(&self) -> &str {
        self.inner.tokenizer_name()
    }

    fn generation(&self) -> u64 {
        self.inner.generation()
    }

    fn resolve(&self, matcher: &TermMatcher) -> Result<ResolvedQuery> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(matcher)
    }
}

/// A tree paired with an arbitrary posting index.
struct WithIndex<'a, I> {
    tree: &'a MemoryTree,
    index: I,
}

impl<I: PostingIndex> NodeTree for WithIndex<'_, I> {
    fn doc_id(&self) -> DocId {
        self.tree.doc_id()
    }

    fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    fn kind(&self, node: NodeId) -> Result<NodeKind> {
        self.tree.kind(node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.tree.first_child(node)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next_sibling(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    fn name(&self, node: NodeId) -> Result<&str> {
        self.tree.name(node)
    }

    fn value(&self, node: NodeId) -> Result<&str> {
        self.tree.value(node)
    }

    fn attributes(&self, node: NodeId) -> Result<&[NodeId]> {
        self.tree.attributes(node)
    }

    fn posting_index(&self) -> Option<&dyn PostingIndex> {
        Some(&self.index)
    }
}

#[test]
fn test_indexed_cost_does_not_grow_with_store() {
    init_logger();
    let query = Selection::word("w7x3");
    for size in [10u32, 400] {
        let mut store = IndexedStore::new();
        for i in 0..size {
            let words: Vec<String> = (0..30).map(|j| format!("w{i}x{j}")).collect();
            let tree = TreeBuilder::document(DocId::new(0))
                .element("p")
                .text(&words.join(" "))
                .end()
                .build()
                .unwrap();
            store.insert(tree).unwrap();
        }

        let highlighter = Highlighter::new(&query, MatchOptions::new()).unwrap();
        let document = WithIndex {
            tree: store.document(DocId::new(7)).unwrap().tree(),
            index: CountingIndex {
                inner: store.index(),
                resolves: AtomicUsize::new(0),
            },
        };
        let root = document.root().unwrap();

        let mut resolutions = Vec::new();
        for _ in 0..20 {
            let mut traversal = highlighter.traverse(&document, root).unwrap();
            assert_eq!(traversal.mode(), Mode::Indexed);
            assert!(traversal.marked_text().unwrap().contains("<mark>w7x3</mark>"));
            assert!(highlighter.score(&document, root).unwrap() > 0.0);
            resolutions.push(highlighter.resolve(&document.index).unwrap());
        }

        // One dictionary scan per store, shared by every later traversal.
        assert_eq!(document.index.resolves.load(Ordering::SeqCst), 1, "store of {size}");
        assert!(resolutions.iter().all(|r| r.shares_hits_with(&resolutions[0])));
        assert_eq!(resolutions[0].hit_count(), 1);
        assert_eq!(resolutions[0].inverse_document_frequencies(), &[size as f64]);
    }
}

#[test]
fn test_divergence_is_fatal() {
    init_logger();
    let doc = DocId::new(7);
    let tree = TreeBuilder::document(doc)
        .element("p")
        .text("the quick fox")
        .end()
        .build()
        .unwrap();
    let document = WithIndex {
        tree: &tree,
        index: LyingIndex {
            hits: vec![(doc, NodeId::new(2))],
            generation: next_generation(),
        },
    };
    let highlighter = Highlighter::new(&Selection::word("dog"), MatchOptions::new()).unwrap();

    let mut traversal = highlighter.traverse_document(&document).unwrap();
    assert_eq!(traversal.mode(), Mode::Indexed);
    assert_eq!(traversal.advance().unwrap(), Event::DocumentStart);
    assert_eq!(traversal.advance().unwrap(), Event::ElementStart);

    let error = traversal.advance().unwrap_err();
    assert!(matches!(
        error,
        FtError::IndexDivergence { doc: d, node } if d == doc && node == NodeId::new(2)
    ));
    assert!(!error.is_recoverable());
    assert_eq!(traversal.advance().unwrap(), Event::End);

    // Forcing generic mode ignores the index and succeeds.
    let generic = Highlighter::with_config(
        &Selection::word("dog"),
        MatchOptions::new(),
        HighlightConfig::new().mode(HighlightMode::Generic),
    )
    .unwrap();
    let events: Vec<Event> = generic
        .traverse_document(&document)
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(events.len(), 6);
}

#[test]
fn test_tokenizer_mismatch_falls_back_to_generic() {
    init_logger();
    let mut store = IndexedStore::new();
    let doc = store.insert(documents().remove(2)).unwrap();
    let document = store.document(doc).unwrap();

    let config = HighlightConfig::new().tokenizer(TokenizerKind::Whitespace);
    let highlighter =
        Highlighter::with_config(&Selection::word("words"), MatchOptions::new(), config).unwrap();
    let mut traversal = highlighter.traverse_document(&document).unwrap();
    assert_eq!(traversal.mode(), Mode::Generic);
    assert_eq!(traversal.marked_text().unwrap(), "unrelated <mark>words</mark> only");
}
