use serde::{Deserialize, Serialize};
use std::fmt;
use winnow::ascii::dec_uint;
use winnow::combinator::{alt, eof, preceded, terminated};
use winnow::prelude::*;
use winnow::token::take_while;

/// Highest signatory slot index (four blocks: 0..=3).
pub const MAX_SIGNATORY_INDEX: u8 = 3;

const SIGNATORY_NAME_PREFIX: &str = "signatoryName_";
const SIGNATORY_ROLE_PREFIX: &str = "signatoryRole_";
const SIGNATURE_IMAGE_PREFIX: &str = "signature_img_";

/// Stable identifier of a template element.
///
/// Ids survive every edit and double as structural markers: signatory
/// text fields and signature images encode their slot index in the id.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

/// What an id says about the element it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRole {
    SignatoryName(u8),
    SignatoryRole(u8),
    SignatureImage { index: u8, stamp: u64 },
    Plain,
}

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate a unique ID with a type prefix (e.g. `logo_1`, `text_2`).
    pub fn with_prefix(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}_{n}"))
    }

    pub fn signatory_name(index: u8) -> Self {
        Self(format!("{SIGNATORY_NAME_PREFIX}{index}"))
    }

    pub fn signatory_role(index: u8) -> Self {
        Self(format!("{SIGNATORY_ROLE_PREFIX}{index}"))
    }

    pub fn signature_image(index: u8, stamp: u64) -> Self {
        Self(format!("{SIGNATURE_IMAGE_PREFIX}{index}_{stamp}"))
    }

    /// Classify this id by the naming conventions above.
    pub fn role(&self) -> IdRole {
        let mut input = self.0.as_str();
        match parse_role.parse_next(&mut input) {
            Ok(role) => role,
            Err(_) => IdRole::Plain,
        }
    }

    /// Signatory slot this id belongs to, if any.
    pub fn signatory_index(&self) -> Option<u8> {
        match self.role() {
            IdRole::SignatoryName(i) | IdRole::SignatoryRole(i) => Some(i),
            IdRole::SignatureImage { index, .. } => Some(index),
            IdRole::Plain => None,
        }
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        ElementId::new(s)
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Parsers ─────────────────────────────────────────────────────────────

fn parse_role(input: &mut &str) -> ModalResult<IdRole> {
    let role = alt((
        terminated(preceded(SIGNATORY_NAME_PREFIX, slot_index), eof).map(IdRole::SignatoryName),
        terminated(preceded(SIGNATORY_ROLE_PREFIX, slot_index), eof).map(IdRole::SignatoryRole),
        terminated(parse_signature_image, eof),
    ))
    .parse_next(input)?;
    Ok(role)
}

fn parse_signature_image(input: &mut &str) -> ModalResult<IdRole> {
    let index = preceded(SIGNATURE_IMAGE_PREFIX, slot_index).parse_next(input)?;
    let _ = '_'.parse_next(input)?;
    let digits: &str = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let stamp = digits
        .parse::<u64>()
        .map_err(|_| winnow::error::ErrMode::Backtrack(winnow::error::ContextError::new()))?;
    Ok(IdRole::SignatureImage { index, stamp })
}

fn slot_index(input: &mut &str) -> ModalResult<u8> {
    dec_uint
        .verify(|i: &u8| *i <= MAX_SIGNATORY_INDEX)
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatory_ids_roundtrip() {
        assert_eq!(ElementId::signatory_name(2).role(), IdRole::SignatoryName(2));
        assert_eq!(ElementId::signatory_role(0).role(), IdRole::SignatoryRole(0));
        assert_eq!(
            ElementId::signature_image(1, 1_700_000_000_000).role(),
            IdRole::SignatureImage {
                index: 1,
                stamp: 1_700_000_000_000
            }
        );
    }

    #[test]
    fn out_of_range_index_is_plain() {
        assert_eq!(ElementId::new("signatoryName_4").role(), IdRole::Plain);
        assert_eq!(ElementId::new("signature_img_9_123").role(), IdRole::Plain);
    }

    #[test]
    fn near_misses_are_plain() {
        for id in [
            "signatoryName_",
            "signatoryName_1x",
            "signatoryNames_1",
            "signature_img_1",
            "signature_img_1_",
            "certTitle",
        ] {
            assert_eq!(ElementId::new(id).role(), IdRole::Plain, "{id}");
        }
    }

    #[test]
    fn prefixed_ids_are_unique() {
        let a = ElementId::with_prefix("logo");
        let b = ElementId::with_prefix("logo");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("logo_"));
    }
}
