//! Security tests: untrusted catalog entries, oversized input and error sanitization

mod common;

use std::time::{Duration, Instant};

use interlinear::catalog::store::BookRoute;
use interlinear::utils::validation::{ValidationError, MAX_SEGMENT_LENGTH};
use interlinear::web::server::create_safe_error_response;
use interlinear::{
    ComposeError, Composer, ComposerConfig, Corpus, CorpusError, DatasetId, MatcherConfig,
    PassagePath, ReferenceMatcher,
};

/// A catalog row pointing outside the dataset directory rejects the whole catalog
#[test]
fn test_catalog_locator_traversal_rejected() {
    let dir = common::corpus_dir();
    std::fs::write(dir.path().join("secret.xhtml"), "<p>secret</p>").unwrap();
    std::fs::write(
        dir.path().join("latin/books.tsv"),
        "43\tIohannes\t\t../secret.xhtml\n",
    )
    .unwrap();

    let corpus = Corpus::open(dir.path());
    assert!(matches!(
        corpus.dataset(DatasetId::Latin),
        Err(CorpusError::Catalog { .. })
    ));

    // the other datasets still serve
    let path = PassagePath::parse("bible-latin/john/1").unwrap();
    let result = Composer::new(&corpus, ComposerConfig::default())
        .compose_path(&path)
        .unwrap();
    assert_eq!(result.active_datasets(), vec![DatasetId::Bible]);
}

#[test]
fn test_oversized_book_segment() {
    let dir = common::corpus_dir();
    let corpus = Corpus::open(dir.path());
    let segment = "j".repeat(MAX_SEGMENT_LENGTH + 1);

    assert!(matches!(
        corpus.route_book(DatasetId::Bible, &segment),
        Err(CorpusError::Validation(ValidationError::SegmentTooLong))
    ));

    let path = PassagePath::parse(&format!("bible/{segment}/1")).unwrap();
    assert!(matches!(
        Composer::new(&corpus, ComposerConfig::default()).route(&path),
        Err(ComposeError::NotFound(_))
    ));

    assert_eq!(
        corpus.route_book(DatasetId::Bible, "..%2F..%2Fetc").unwrap(),
        BookRoute::NotFound
    );
}

/// Malformed content degrades to a notice for secondary datasets
#[test]
fn test_malformed_content_is_contained() {
    let dir = common::corpus_dir();
    std::fs::write(
        dir.path().join("latin/iohannes.xhtml"),
        r#"<html><section id="iohannes-ch-1"><p><span id="iohannes-1-1">Verbum</p></html>"#,
    )
    .unwrap();

    let corpus = Corpus::open(dir.path());
    let path = PassagePath::parse("bible-latin/john/1").unwrap();
    let result = Composer::new(&corpus, ComposerConfig::default())
        .compose_path(&path)
        .unwrap();
    assert_eq!(result.active_datasets(), vec![DatasetId::Bible]);
    assert_eq!(result.notices.len(), 1);
}

#[test]
fn test_error_sanitization() {
    let response = create_safe_error_response(
        "corpus_error",
        "The corpus could not be read",
        Some("/srv/corpus/bible/nt/john.xhtml: permission denied"),
    );

    assert_eq!(response.error, "The corpus could not be read");
    assert_eq!(response.error_type, "corpus_error");
    assert!(
        response.details.is_none(),
        "Internal details should never be exposed"
    );
}

/// Linking stays linear on input built to provoke backtracking
#[test]
fn test_pathological_link_input() {
    let dir = common::corpus_dir();
    let corpus = Corpus::open(dir.path());
    let matcher = ReferenceMatcher::new(&corpus, MatcherConfig::default());

    let inputs = [
        "John ".repeat(20_000),
        "1. ".repeat(20_000),
        format!("{}3:", "a ".repeat(20_000)),
        "<".repeat(50_000),
        "<a href=x>".repeat(10_000),
    ];

    let start = Instant::now();
    for input in &inputs {
        let linked = matcher.link_references(input, DatasetId::Bible).unwrap();
        assert!(linked.matches.is_empty());
    }
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "Linking took {:?}",
        start.elapsed()
    );
}
