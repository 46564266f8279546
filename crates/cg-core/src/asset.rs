//! Image reference classification and `data:` URL decoding.
//!
//! While a template is being edited, uploaded images live as transient
//! references (`blob:` handles or inline `data:` URLs). Only remote
//! `http(s)` URLs survive persistence; everything transient is uploaded
//! and rewritten at save time.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use winnow::combinator::{opt, preceded};
use winnow::prelude::*;
use winnow::ascii::Caseless;
use winnow::token::{literal, rest, take_till};

/// Where an image reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Inline `data:` URL.
    DataUrl,
    /// Browser-style `blob:` object handle.
    Blob,
    /// Durable `http://` or `https://` URL.
    Remote,
    /// Anything else (relative paths, unknown schemes).
    Other,
}

impl AssetKind {
    pub fn classify(src: &str) -> Self {
        let trimmed = src.trim_start();
        let lower = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
        if lower.starts_with("data:") {
            AssetKind::DataUrl
        } else if lower.starts_with("blob:") {
            AssetKind::Blob
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            AssetKind::Remote
        } else {
            AssetKind::Other
        }
    }

    /// Transient references must be uploaded before a template is persisted.
    pub fn is_transient(self) -> bool {
        matches!(self, AssetKind::DataUrl | AssetKind::Blob)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("not a data URL")]
    NotDataUrl,
    #[error("malformed data URL: {0}")]
    Malformed(String),
    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// A decoded `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parse `data:[<mime>][;param]*[;base64],<payload>`.
///
/// A missing media type defaults to `text/plain` per RFC 2397.
pub fn parse_data_url(src: &str) -> Result<DataUrl, AssetError> {
    if AssetKind::classify(src) != AssetKind::DataUrl {
        return Err(AssetError::NotDataUrl);
    }
    let mut input = src.trim_start();
    let (mime, params, payload) = data_url_parts
        .parse_next(&mut input)
        .map_err(|e| AssetError::Malformed(e.to_string()))?;

    let is_base64 = params.iter().any(|p| p.eq_ignore_ascii_case("base64"));
    let bytes = if is_base64 {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| AssetError::Base64(e.to_string()))?
    } else {
        payload.as_bytes().to_vec()
    };
    let mime = if mime.is_empty() {
        "text/plain".to_string()
    } else {
        mime.to_ascii_lowercase()
    };
    Ok(DataUrl { mime, bytes })
}

/// File extension for common image MIME types.
pub fn extension_for(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/svg+xml" => "svg",
        "image/avif" => "avif",
        _ => "bin",
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

type DataUrlParts<'a> = (&'a str, Vec<&'a str>, &'a str);

fn data_url_parts<'a>(input: &mut &'a str) -> ModalResult<DataUrlParts<'a>> {
    let _ = literal(Caseless("data:")).parse_next(input)?;
    let mime: &str = take_till(0.., |c: char| c == ';' || c == ',').parse_next(input)?;
    let mut params = Vec::new();
    while let Some(param) = opt(preceded(';', take_till(0.., |c: char| c == ';' || c == ',')))
        .parse_next(input)?
    {
        params.push(param);
    }
    let _ = ','.parse_next(input)?;
    let payload: &str = rest.parse_next(input)?;
    Ok((mime, params, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_references() {
        assert_eq!(AssetKind::classify("data:image/png;base64,AAAA"), AssetKind::DataUrl);
        assert_eq!(AssetKind::classify("blob:http://localhost/1234"), AssetKind::Blob);
        assert_eq!(AssetKind::classify("https://cdn.example.com/a.png"), AssetKind::Remote);
        assert_eq!(AssetKind::classify("HTTP://cdn.example.com/a.png"), AssetKind::Remote);
        assert_eq!(AssetKind::classify("/static/a.png"), AssetKind::Other);
        assert!(AssetKind::Blob.is_transient());
        assert!(!AssetKind::Remote.is_transient());
    }

    #[test]
    fn classify_short_references_after_whitespace() {
        assert_eq!(AssetKind::classify(" blob:x"), AssetKind::Blob);
        assert_eq!(AssetKind::classify("\t data:,"), AssetKind::DataUrl);
        assert_eq!(AssetKind::classify("  http://a"), AssetKind::Remote);
        assert_eq!(AssetKind::classify("   "), AssetKind::Other);
    }

    #[test]
    fn decode_base64_png() {
        let url = parse_data_url("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(url.mime, "image/png");
        assert_eq!(&url.bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn decode_plain_payload_with_params() {
        let url = parse_data_url("data:image/svg+xml;charset=utf-8,<svg/>").unwrap();
        assert_eq!(url.mime, "image/svg+xml");
        assert_eq!(url.bytes, b"<svg/>");
    }

    #[test]
    fn missing_media_type_defaults() {
        let url = parse_data_url("data:,hello").unwrap();
        assert_eq!(url.mime, "text/plain");
    }

    #[test]
    fn malformed_inputs() {
        assert_eq!(
            parse_data_url("https://x/y.png"),
            Err(AssetError::NotDataUrl)
        );
        assert!(matches!(
            parse_data_url("data:image/png;base64"),
            Err(AssetError::Malformed(_))
        ));
        assert!(matches!(
            parse_data_url("data:image/png;base64,@@@"),
            Err(AssetError::Base64(_))
        ));
    }
}
