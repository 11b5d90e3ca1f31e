//! Image uploads embedded as `data:` URIs.
//!
//! # Invariants
//! - Uploads larger than `MAX_IMAGE_BYTES` are rejected before encoding;
//!   oversized images break persistence quotas and share links.
//! - Only known image types are accepted.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

/// Per-image upload ceiling (2 MiB).
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Placeholder shown in editors instead of a long embedded payload.
pub const EMBEDDED_IMAGE_LABEL: &str = "Custom Image";

const DATA_URI_PREFIX: &str = "data:";

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug)]
pub enum MediaError {
    TooLarge { size: u64, limit: u64 },
    UnsupportedType(String),
    Io(std::io::Error),
}

impl Display for MediaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size, limit } => write!(
                f,
                "image is too large ({size} bytes, limit {limit}); use a compressed version or an external URL"
            ),
            Self::UnsupportedType(name) => write!(f, "unsupported image type: {name}"),
            Self::Io(err) => write!(f, "could not read image: {err}"),
        }
    }
}

impl Error for MediaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::TooLarge { .. } | Self::UnsupportedType(_) => None,
        }
    }
}

impl From<std::io::Error> for MediaError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Encodes raw image bytes as `data:<mime>;base64,<payload>`.
pub fn image_data_uri(bytes: &[u8], mime: &str) -> MediaResult<String> {
    let size = bytes.len() as u64;
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(format!("{DATA_URI_PREFIX}{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Reads an image file and encodes it as a data URI.
///
/// The size check runs on file metadata before the file is read.
pub fn image_file_data_uri(path: &Path) -> MediaResult<String> {
    let mime = mime_for_path(path).ok_or_else(|| {
        MediaError::UnsupportedType(
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })?;

    let size = fs::metadata(path)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(MediaError::TooLarge {
            size,
            limit: MAX_IMAGE_BYTES,
        });
    }

    let bytes = fs::read(path)?;
    image_data_uri(&bytes, mime)
}

/// Image mime type from a file extension (case-insensitive).
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

pub fn is_data_uri(value: &str) -> bool {
    value.starts_with(DATA_URI_PREFIX)
}

/// Editor-facing form of an image reference.
pub fn display_image_ref(value: &str) -> &str {
    if is_data_uri(value) {
        EMBEDDED_IMAGE_LABEL
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn small_image_becomes_base64_data_uri() {
        let uri = image_data_uri(b"\x89PNG", "image/png").unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        assert_eq!(display_image_ref(&uri), EMBEDDED_IMAGE_LABEL);
    }

    #[test]
    fn oversized_image_is_rejected() {
        let bytes = vec![0u8; (MAX_IMAGE_BYTES + 1) as usize];
        let err = image_data_uri(&bytes, "image/png").unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { .. }));
    }

    #[test]
    fn mime_is_inferred_from_extension() {
        assert_eq!(mime_for_path(&PathBuf::from("logo.PNG")), Some("image/png"));
        assert_eq!(mime_for_path(&PathBuf::from("a.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(&PathBuf::from("notes.txt")), None);
        assert_eq!(mime_for_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn image_file_is_read_and_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.gif");
        fs::write(&path, b"GIF89a").unwrap();
        let uri = image_file_data_uri(&path).unwrap();
        assert!(uri.starts_with("data:image/gif;base64,"));
    }

    #[test]
    fn unsupported_file_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"hi").unwrap();
        assert!(matches!(
            image_file_data_uri(&path).unwrap_err(),
            MediaError::UnsupportedType(name) if name == "notes.txt"
        ));
    }

    #[test]
    fn external_url_is_displayed_as_is() {
        assert_eq!(
            display_image_ref("https://example.com/a.png"),
            "https://example.com/a.png"
        );
    }
}
