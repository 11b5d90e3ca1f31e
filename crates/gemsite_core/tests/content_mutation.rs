use gemsite_core::model::document::{MAX_INDEX_GAP, MAX_PATH_DEPTH};
use gemsite_core::{default_document, ContentDocument, ContentValue, MutationError};

#[test]
fn update_leaves_the_original_snapshot_untouched() {
    let original = default_document();
    let before = original.clone();

    let next = original
        .update("stickySection.items.0.title", "Moonlit Karnak")
        .unwrap();

    assert_eq!(original, before);
    assert_eq!(
        original.get_text("stickySection.items.0.title"),
        Some("Private Giza Gala")
    );
    assert_eq!(
        next.get_text("stickySection.items.0.title"),
        Some("Moonlit Karnak")
    );
    assert_eq!(
        next.get_text("stickySection.items.1.title"),
        original.get_text("stickySection.items.1.title")
    );
}

#[test]
fn missing_intermediate_maps_are_created() {
    let next = ContentDocument::new().update("a.b.c", "x").unwrap();

    assert_eq!(
        next.to_json_string().unwrap(),
        r#"{"a":{"b":{"c":"x"}}}"#
    );
}

#[test]
fn numeric_segment_under_missing_node_creates_a_list() {
    let next = ContentDocument::new()
        .update("gallery.0.caption", "Dunes")
        .unwrap();

    assert_eq!(
        next.to_json_string().unwrap(),
        r#"{"gallery":[{"caption":"Dunes"}]}"#
    );
}

#[test]
fn writing_past_the_end_pads_with_empty_mappings() {
    let next = default_document()
        .update("stickySection.items.3.title", "Siwa Retreat")
        .unwrap();

    let items = next
        .get("stickySection.items")
        .and_then(ContentValue::as_list)
        .unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[2], ContentValue::empty_map());
    assert_eq!(
        next.get_text("stickySection.items.3.title"),
        Some("Siwa Retreat")
    );
}

#[test]
fn key_segment_on_a_list_is_rejected() {
    let err = default_document()
        .update("stickySection.items.first.title", "x")
        .unwrap_err();

    assert_eq!(
        err,
        MutationError::NotAnIndex {
            path: "stickySection.items".to_string(),
            segment: "first".to_string(),
        }
    );
}

#[test]
fn numeric_segment_on_a_map_is_a_key() {
    let next = default_document().update("booking.2024", "Season").unwrap();
    assert_eq!(next.get_text("booking.2024"), Some("Season"));
    assert!(next.get("booking").and_then(ContentValue::as_map).is_some());
}

#[test]
fn index_gap_beyond_limit_is_refused() {
    let far = MAX_INDEX_GAP + 2;
    let err = default_document()
        .update(&format!("stickySection.items.{far}.title"), "x")
        .unwrap_err();

    assert!(matches!(err, MutationError::IndexOutOfRange { len: 2, .. }));
}

#[test]
fn descending_through_text_is_an_error_and_keeps_the_snapshot() {
    let doc = default_document();
    let err = doc.update("brand.name.short", "GEM").unwrap_err();

    assert!(matches!(err, MutationError::ScalarInPath { .. }));
    assert_eq!(doc, default_document());
}

#[test]
fn empty_path_is_invalid() {
    assert!(matches!(
        ContentDocument::new().update("", "x"),
        Err(MutationError::InvalidPath(_))
    ));
    assert!(matches!(
        ContentDocument::new().update("hero..title", "x"),
        Err(MutationError::InvalidPath(_))
    ));
}

#[test]
fn non_string_scalars_are_rejected_at_the_boundary() {
    assert!(ContentDocument::from_json_str(r#"{"count":3}"#).is_err());
    assert!(ContentDocument::from_json_str(r#"{"flag":null}"#).is_err());
    assert!(ContentDocument::from_json_str(r#"["not","a","map"]"#).is_err());
    assert!(ContentDocument::from_json_str(r#"{"a":{"b":["x"]}}"#).is_ok());
}

#[test]
fn path_deeper_than_limit_is_refused() {
    let path = vec!["a"; 130].join(".");
    let err = ContentDocument::new().update(&path, "x").unwrap_err();

    assert_eq!(
        err,
        MutationError::PathTooDeep {
            depth: 130,
            limit: MAX_PATH_DEPTH,
        }
    );
}

#[test]
fn deepest_accepted_path_reads_back_from_json() {
    let path = vec!["a"; MAX_PATH_DEPTH].join(".");
    let doc = ContentDocument::new().update(&path, "x").unwrap();

    let json = doc.to_json_string().unwrap();
    assert_eq!(ContentDocument::from_json_str(&json).unwrap(), doc);
    assert!(ContentDocument::new()
        .update(&format!("{path}.a"), "x")
        .is_err());
}
