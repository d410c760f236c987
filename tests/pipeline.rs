//! End-to-end indexing and search over in-memory doubles.
//!
//! These tests drive the same `AppContext` code paths the CLI uses, with
//! the hosted services replaced by a hashing embedder and the in-memory
//! index catalog.

mod common;

use common::{memory_context, HashingEmbedder, RecordingProgress};
use recipe_search::corpus;
use recipe_search::demo::run_demo;
use recipe_search::ingest::index_documents;
use recipe_search::search::{run_search, search};
use recipe_search_core::models::Document;
use recipe_search_core::search::{ELLIPSIS, PREVIEW_CHARS};

fn three_recipes() -> Vec<Document> {
    vec![
        Document::new(
            "1",
            "Vanilla Ice Cream",
            "Churn cream, milk, sugar and vanilla bean into a smooth ice cream.",
        ),
        Document::new(
            "2",
            "Tomato Soup",
            "Simmer tomatoes, onion and garlic in stock, then blend until silky.",
        ),
        Document::new(
            "3",
            "Grilled Cheese",
            "Toast bread and cheddar in a buttered skillet until golden.",
        ),
    ]
}

#[tokio::test]
async fn ice_cream_query_finds_vanilla_ice_cream() {
    let (ctx, _, _) = memory_context(HashingEmbedder::new());
    let index = ctx.open_index().await.unwrap();
    let progress = RecordingProgress::default();

    let written = index_documents(&ctx, index.as_ref(), &three_recipes(), &progress)
        .await
        .unwrap();
    assert_eq!(written, 3);

    let results = search(&ctx, index.as_ref(), "recipes with ice cream", 1)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Vanilla Ice Cream");
    assert_eq!(results[0].id, "1");
}

#[tokio::test]
async fn indexing_embeds_and_reports_each_document_in_order() {
    let (ctx, embedder, catalog) = memory_context(HashingEmbedder::new());
    let index = ctx.open_index().await.unwrap();
    let progress = RecordingProgress::default();
    let docs = corpus::recipes();

    index_documents(&ctx, index.as_ref(), &docs, &progress)
        .await
        .unwrap();

    let expected: Vec<String> = docs.iter().map(|d| d.id.clone()).collect();
    assert_eq!(progress.indexed_ids(), expected);
    assert!(progress.finished());
    assert_eq!(embedder.calls(), docs.len());
    assert_eq!(catalog.index("recipes").unwrap().len(), docs.len());
}

#[tokio::test]
async fn first_failure_stops_indexing_and_keeps_earlier_upserts() {
    let (ctx, _, catalog) = memory_context(HashingEmbedder::failing_on(2));
    let index = ctx.open_index().await.unwrap();
    let progress = RecordingProgress::default();

    let err = index_documents(&ctx, index.as_ref(), &three_recipes(), &progress)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("429"));

    let stored = catalog.index("recipes").unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored.get("1").is_some());
    assert_eq!(progress.indexed_ids(), vec!["1".to_string(), "2".to_string()]);
    assert!(!progress.finished());
}

#[tokio::test]
async fn reindexing_an_id_replaces_vector_and_metadata() {
    let (ctx, _, catalog) = memory_context(HashingEmbedder::new());
    let index = ctx.open_index().await.unwrap();
    let progress = RecordingProgress::default();

    index_documents(&ctx, index.as_ref(), &three_recipes(), &progress)
        .await
        .unwrap();

    let replacement = vec![Document::new(
        "2",
        "Gazpacho",
        "Blend raw tomatoes, cucumber and peppers, then serve chilled.",
    )];
    index_documents(&ctx, index.as_ref(), &replacement, &progress)
        .await
        .unwrap();

    let stored = catalog.index("recipes").unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored.get("2").unwrap().metadata.title, "Gazpacho");

    let results = search(&ctx, index.as_ref(), "chilled cucumber", 3)
        .await
        .unwrap();
    assert_eq!(results[0].title, "Gazpacho");
    assert_eq!(results.iter().filter(|r| r.id == "2").count(), 1);
    assert!(results.iter().all(|r| r.title != "Tomato Soup"));
}

#[tokio::test]
async fn opening_the_index_twice_creates_it_once() {
    let (ctx, _, catalog) = memory_context(HashingEmbedder::new());
    let first = ctx.open_index().await.unwrap();
    let second = ctx.open_index().await.unwrap();
    assert_eq!(catalog.create_calls(), 1);
    assert_eq!(first.name(), second.name());
}

#[tokio::test]
async fn results_are_ranked_and_previews_bounded() {
    let (ctx, _, _) = memory_context(HashingEmbedder::new());
    let index = ctx.open_index().await.unwrap();
    let progress = RecordingProgress::default();
    let mut docs = corpus::recipes();
    docs.push(Document::new("long", "Long Recipe", "ice cream ".repeat(50)));

    index_documents(&ctx, index.as_ref(), &docs, &progress)
        .await
        .unwrap();

    let results = search(&ctx, index.as_ref(), "ice cream with chocolate sauce", 10)
        .await
        .unwrap();
    assert_eq!(results.len(), docs.len());
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    for r in &results {
        assert!(r.content.chars().count() <= PREVIEW_CHARS + ELLIPSIS.len());
    }

    let long = results.iter().find(|r| r.id == "long").unwrap();
    assert_eq!(long.content.chars().count(), PREVIEW_CHARS + ELLIPSIS.len());
    assert!(long.content.ends_with(ELLIPSIS));
}

#[tokio::test]
async fn invalid_top_k_is_rejected_before_embedding() {
    let (ctx, embedder, _) = memory_context(HashingEmbedder::new());
    let index = ctx.open_index().await.unwrap();

    assert!(search(&ctx, index.as_ref(), "soup", 0).await.is_err());
    assert!(search(&ctx, index.as_ref(), "soup", 10_001).await.is_err());
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn demo_rejects_top_k_before_touching_the_index() {
    let (ctx, embedder, catalog) = memory_context(HashingEmbedder::new());
    let progress = RecordingProgress::default();

    let err = run_demo(&ctx, &progress, Some(0)).await.unwrap_err();
    assert!(err.to_string().contains("top_k"), "{}", err);
    assert!(run_demo(&ctx, &progress, Some(20_000)).await.is_err());

    assert_eq!(embedder.calls(), 0);
    assert_eq!(catalog.create_calls(), 0);
    assert!(progress.indexed_ids().is_empty());
}

#[tokio::test]
async fn search_command_rejects_bad_arguments_before_touching_the_index() {
    let (ctx, embedder, catalog) = memory_context(HashingEmbedder::new());

    assert!(run_search(&ctx, "soup", 0).await.is_err());
    let err = run_search(&ctx, "  ", 3).await.unwrap_err();
    assert!(err.to_string().contains("must not be empty"), "{}", err);

    assert_eq!(embedder.calls(), 0);
    assert_eq!(catalog.create_calls(), 0);
}

#[tokio::test]
async fn embedder_with_wrong_dimension_cannot_open_the_index() {
    let (ctx, embedder, catalog) = memory_context(HashingEmbedder::with_dims(768));

    let err = ctx.open_index().await.err().unwrap();
    assert!(err.to_string().contains("768"), "{}", err);
    assert_eq!(catalog.create_calls(), 0);
    assert_eq!(embedder.calls(), 0);
}
