//! Share-link encoding and decoding.
//!
//! # Invariants
//! - Token = standard base64 of the UTF-8 bytes of the compact JSON document.
//! - A produced URL never exceeds the configured length ceiling; oversized
//!   payloads are refused instead of truncated.
//! - `decode_token(encode_token(d)) == d`.

use crate::model::document::{ContentDocument, ShapeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// Query parameter carrying the encoded document.
pub const SHARE_QUERY_PARAM: &str = "config";

/// Longest share URL handed out, in characters.
pub const DEFAULT_SHARE_URL_LIMIT: usize = 10_000;

/// Share-link generation failures. No partial link is ever produced.
#[derive(Debug)]
pub enum ShareLinkError {
    /// Encoded URL would exceed the safe length.
    PayloadTooLarge { length: usize, limit: usize },
    InvalidPageUrl(url::ParseError),
    Serialize(serde_json::Error),
}

impl Display for ShareLinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayloadTooLarge { length, limit } => write!(
                f,
                "site data is too large to share via a single link ({length} characters, limit {limit}); \
                 use external image URLs instead of uploaded files"
            ),
            Self::InvalidPageUrl(err) => write!(f, "invalid page url: {err}"),
            Self::Serialize(err) => write!(f, "failed to serialize content: {err}"),
        }
    }
}

impl Error for ShareLinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PayloadTooLarge { .. } => None,
            Self::InvalidPageUrl(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

/// Malformed share-link token or URL.
#[derive(Debug)]
pub enum DecodeError {
    InvalidUrl(url::ParseError),
    Base64(base64::DecodeError),
    Utf8(std::string::FromUtf8Error),
    Shape(ShapeError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(err) => write!(f, "invalid share url: {err}"),
            Self::Base64(err) => write!(f, "share token is not valid base64: {err}"),
            Self::Utf8(err) => write!(f, "share token is not valid UTF-8: {err}"),
            Self::Shape(err) => write!(f, "share token does not hold site content: {err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUrl(err) => Some(err),
            Self::Base64(err) => Some(err),
            Self::Utf8(err) => Some(err),
            Self::Shape(err) => Some(err),
        }
    }
}

/// Encodes `document` as a URL-safe query value.
pub fn encode_token(document: &ContentDocument) -> Result<String, serde_json::Error> {
    let json = document.to_json_string()?;
    Ok(STANDARD.encode(json.as_bytes()))
}

/// Decodes a token taken from the `config` query parameter.
///
/// Spaces are read back as `+`, since form decoding of an unescaped token
/// turns `+` into a space.
pub fn decode_token(token: &str) -> Result<ContentDocument, DecodeError> {
    let normalized = token.trim().replace(' ', "+");
    let bytes = STANDARD.decode(normalized).map_err(DecodeError::Base64)?;
    let json = String::from_utf8(bytes).map_err(DecodeError::Utf8)?;
    ContentDocument::from_json_str(&json).map_err(DecodeError::Shape)
}

/// Builds the shareable URL for `document` on top of `page_url`.
///
/// An existing `config` parameter is replaced; other parameters are kept.
///
/// # Errors
/// - `PayloadTooLarge` when the URL would be longer than `limit`.
/// - `InvalidPageUrl` when `page_url` is not an absolute URL.
pub fn build_share_url(
    document: &ContentDocument,
    page_url: &str,
    limit: usize,
) -> Result<String, ShareLinkError> {
    let mut url = Url::parse(page_url).map_err(ShareLinkError::InvalidPageUrl)?;
    let token = encode_token(document).map_err(ShareLinkError::Serialize)?;

    let retained = url
        .query_pairs()
        .filter(|(key, _)| key != SHARE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(SHARE_QUERY_PARAM, &token);

    let shared: String = url.into();
    if shared.len() > limit {
        warn!(
            "event=share_link module=share status=error error_code=payload_too_large length={} limit={limit}",
            shared.len()
        );
        return Err(ShareLinkError::PayloadTooLarge {
            length: shared.len(),
            limit,
        });
    }

    info!(
        "event=share_link module=share status=ok length={}",
        shared.len()
    );
    Ok(shared)
}

/// Extracts the raw `config` token from a page URL, if present.
pub fn token_from_url(page_url: &str) -> Result<Option<String>, DecodeError> {
    let url = Url::parse(page_url).map_err(DecodeError::InvalidUrl)?;
    Ok(url
        .query_pairs()
        .find(|(key, _)| key == SHARE_QUERY_PARAM)
        .map(|(_, value)| value.into_owned()))
}

/// Decodes the document carried by a share URL, if it carries one.
pub fn decode_share_url(page_url: &str) -> Result<Option<ContentDocument>, DecodeError> {
    match token_from_url(page_url)? {
        Some(token) => decode_token(&token).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::document::ContentDocument;

    #[test]
    fn token_uses_standard_alphabet_over_utf8() {
        let doc = ContentDocument::new().update("hero.title", "Café ☕").unwrap();
        let token = encode_token(&doc).unwrap();
        let json = String::from_utf8(STANDARD.decode(&token).unwrap()).unwrap();
        assert_eq!(json, r#"{"hero":{"title":"Café ☕"}}"#);
    }

    #[test]
    fn other_query_parameters_are_kept_and_config_replaced() {
        let doc = ContentDocument::new().update("a", "b").unwrap();
        let url = build_share_url(
            &doc,
            "https://gem.example/?lang=en&config=old",
            DEFAULT_SHARE_URL_LIMIT,
        )
        .unwrap();
        assert!(url.starts_with("https://gem.example/?lang=en&config="));
        assert_eq!(url.matches("config=").count(), 1);
        assert_eq!(decode_share_url(&url).unwrap(), Some(doc));
    }

    #[test]
    fn form_decoded_plus_is_restored() {
        // `>>>` encodes to a token containing `+`.
        let doc = ContentDocument::new().update("t", ">>>").unwrap();
        let token = encode_token(&doc).unwrap();
        assert!(token.contains('+'));
        let mangled = token.replace('+', " ");
        assert_eq!(decode_token(&mangled).unwrap(), doc);
    }

    #[test]
    fn url_without_config_decodes_to_none() {
        assert_eq!(decode_share_url("https://gem.example/?lang=en").unwrap(), None);
    }

    #[test]
    fn relative_page_url_is_rejected() {
        let err = build_share_url(&ContentDocument::new(), "/index.html", 100).unwrap_err();
        assert!(matches!(err, ShareLinkError::InvalidPageUrl(_)));
    }
}
