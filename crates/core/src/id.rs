//! Strongly-typed identifiers used across the domain.
//!
//! Document keys in the backing store are opaque strings, so these are
//! string-backed newtypes rather than raw `String`s passed around.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Identifier of a product document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

/// Identifier of a user (actor identity, derived from a verified token upstream).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Identifier of an order document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

/// Identifier of a browser session (analytics scope).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

/// Identifier of a cart document (keyed by user or session).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(String);

/// Identifier of an arbitrary document (store-assigned auto-IDs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

macro_rules! impl_str_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap an existing key. Callers own key validity; use `FromStr`
            /// for untrusted input.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mint a fresh key.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in
            /// tests for determinism.
            pub fn generate() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.is_empty() {
                    return Err(CoreError::invalid_id(concat!($name, ": empty key")));
                }
                Ok(Self(s.to_string()))
            }
        }
    };
}

impl_str_newtype!(ProductId, "ProductId");
impl_str_newtype!(UserId, "UserId");
impl_str_newtype!(OrderId, "OrderId");
impl_str_newtype!(SessionId, "SessionId");
impl_str_newtype!(CartId, "CartId");
impl_str_newtype!(DocumentId, "DocumentId");
