//! Share links carrying the full content document.
//!
//! # Responsibility
//! - Serialize the document into one URL query parameter and back.
//! - Refuse links that browsers and servers would truncate.
//!
//! # See also
//! - `service::site_session` for the link > storage > defaults precedence.

pub mod link;

pub use link::{
    build_share_url, decode_share_url, decode_token, encode_token, token_from_url, DecodeError,
    ShareLinkError, DEFAULT_SHARE_URL_LIMIT, SHARE_QUERY_PARAM,
};
