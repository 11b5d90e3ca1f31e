use gemsite_core::model::media::image_data_uri;
use gemsite_core::share::{
    build_share_url, decode_share_url, decode_token, encode_token, token_from_url,
    DEFAULT_SHARE_URL_LIMIT,
};
use gemsite_core::model::document::MAX_PATH_DEPTH;
use gemsite_core::{default_document, ContentDocument, ShareLinkError};

const PAGE_URL: &str = "https://gem-events.example/";

#[test]
fn default_content_survives_a_share_link() {
    let doc = default_document();

    let url = build_share_url(&doc, PAGE_URL, DEFAULT_SHARE_URL_LIMIT).unwrap();
    assert!(url.starts_with("https://gem-events.example/?config="));
    assert!(url.len() <= DEFAULT_SHARE_URL_LIMIT);

    assert_eq!(decode_share_url(&url).unwrap(), Some(doc));
}

#[test]
fn token_round_trips_edited_content() {
    let doc = default_document()
        .update("hero.title", "L'Art de la Distinction \u{2728}")
        .unwrap()
        .update("philosophy.cards.3.title", "Quiet Luxury")
        .unwrap();

    let token = encode_token(&doc).unwrap();
    assert_eq!(decode_token(&token).unwrap(), doc);
}

#[test]
fn embedded_image_makes_the_link_too_large() {
    let image = image_data_uri(&vec![7u8; 64 * 1024], "image/png").unwrap();
    let doc = default_document().update("brand.logoUrl", image).unwrap();

    match build_share_url(&doc, PAGE_URL, DEFAULT_SHARE_URL_LIMIT) {
        Err(ShareLinkError::PayloadTooLarge { length, limit }) => {
            assert!(length > limit);
            assert_eq!(limit, DEFAULT_SHARE_URL_LIMIT);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn token_is_read_from_the_config_parameter() {
    assert_eq!(
        token_from_url("https://gem-events.example/?config=abc&x=1").unwrap(),
        Some("abc".to_string())
    );
    assert_eq!(token_from_url(PAGE_URL).unwrap(), None);
}

#[test]
fn malformed_tokens_are_decode_errors() {
    assert!(decode_token("%%%").is_err());
    // base64 of `not json`
    assert!(decode_token("bm90IGpzb24=").is_err());
    // base64 of `{"a":1}`
    assert!(decode_token("eyJhIjoxfQ==").is_err());
}

#[test]
fn deepest_editable_document_survives_a_share_link() {
    let path = vec!["a"; MAX_PATH_DEPTH].join(".");
    let doc = ContentDocument::new().update(&path, "x").unwrap();

    let url = build_share_url(&doc, PAGE_URL, DEFAULT_SHARE_URL_LIMIT).unwrap();
    assert_eq!(decode_share_url(&url).unwrap(), Some(doc));
}
