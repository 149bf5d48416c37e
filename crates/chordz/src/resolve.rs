//! Identifier resolution with fallback tracking.
//!
//! Unknown scale, genre, chord-type (and similar) tags resolve to a fixed
//! default rather than failing, matching what a permissive front end expects.
//! Each substitution is recorded so callers and tests can tell an intended
//! default apart from a misconfigured one.

use serde::{Deserialize, Serialize};

use crate::IdentifierKind;

/// A default that was substituted for an unrecognized tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub kind: IdentifierKind,
    /// The tag as supplied by the caller
    pub requested: String,
    /// Tag of the default that replaced it
    pub substituted: String,
}

impl Fallback {
    pub fn new(kind: IdentifierKind, requested: impl Into<String>, substituted: impl Into<String>) -> Self {
        Fallback {
            kind,
            requested: requested.into(),
            substituted: substituted.into(),
        }
    }
}

impl std::fmt::Display for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown {} {:?}, using {:?}",
            self.kind, self.requested, self.substituted
        )
    }
}

/// A resolved value plus any fallbacks taken while resolving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub value: T,
    pub fallbacks: Vec<Fallback>,
}

impl<T> Resolved<T> {
    pub fn normal(value: T) -> Self {
        Resolved {
            value,
            fallbacks: Vec::new(),
        }
    }

    pub fn fallback(value: T, fallback: Fallback) -> Self {
        tracing::warn!(%fallback, "identifier fallback");
        Resolved {
            value,
            fallbacks: vec![fallback],
        }
    }

    /// True when at least one default was substituted.
    pub fn is_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// Move this result's value out, appending its fallbacks to `sink`.
    pub fn collect_into(self, sink: &mut Vec<Fallback>) -> T {
        sink.extend(self.fallbacks);
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            fallbacks: self.fallbacks,
        }
    }
}

/// Identifiers that resolve from a string tag with a documented default.
pub trait Identifier: Sized + Copy + 'static {
    const KIND: IdentifierKind;

    /// Every known value, in table order.
    fn all() -> &'static [Self];

    /// Canonical tag.
    fn tag(self) -> &'static str;

    /// Value substituted for unknown tags.
    fn fallback() -> Self;

    /// Exact tag lookup.
    fn lookup(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::all().iter().copied().find(|v| v.tag() == tag)
    }

    /// Lookup that substitutes [`Identifier::fallback`] for unknown tags.
    fn resolve(tag: &str) -> Resolved<Self> {
        match Self::lookup(tag) {
            Some(value) => Resolved::normal(value),
            None => {
                let fallback = Self::fallback();
                Resolved::fallback(fallback, Fallback::new(Self::KIND, tag, fallback.tag()))
            }
        }
    }

    /// Lookup that reports unknown tags as [`crate::Error::UnknownIdentifier`].
    fn parse_strict(tag: &str) -> crate::Result<Self> {
        Self::lookup(tag).ok_or_else(|| crate::Error::unknown(Self::KIND, tag))
    }
}
