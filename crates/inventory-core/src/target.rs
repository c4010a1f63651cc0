//! # Target Addressing
//!
//! Every store operation names what it acts on: the whole product collection
//! or one product by id.
//!
//! ## Address Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  content://com.example.inventory/fruits        → Target::Collection    │
//! │  content://com.example.inventory/fruits/42     → Target::Item(42)      │
//! │  anything else                                 → UnknownTarget         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inside the workspace targets are always the enum; the string form only
//! exists for callers that hand addresses around (intents, deep links).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::ProductId;
use crate::{CONTENT_AUTHORITY, PATH_FRUITS};

const SCHEME: &str = "content://";

// =============================================================================
// Target
// =============================================================================

/// What a store operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// All products.
    Collection,
    /// A single product by id.
    Item(ProductId),
}

impl Target {
    /// Parses a content address.
    ///
    /// ## Example
    /// ```rust
    /// use inventory_core::Target;
    ///
    /// assert_eq!(
    ///     Target::parse("content://com.example.inventory/fruits/7").unwrap(),
    ///     Target::Item(7)
    /// );
    /// assert!(Target::parse("content://com.example.inventory/vegetables").is_err());
    /// ```
    pub fn parse(address: &str) -> CoreResult<Self> {
        let unknown = || CoreError::unknown_target(address);

        let rest = address.strip_prefix(SCHEME).ok_or_else(unknown)?;
        let rest = rest
            .strip_prefix(CONTENT_AUTHORITY)
            .and_then(|r| r.strip_prefix('/'))
            .ok_or_else(unknown)?;

        let mut segments = rest.split('/');
        if segments.next() != Some(PATH_FRUITS) {
            return Err(unknown());
        }

        let target = match segments.next() {
            None => Target::Collection,
            // Only a run of ASCII digits counts as an id ("+1" and "-1" do not)
            Some(id) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
                Target::Item(id.parse().map_err(|_| unknown())?)
            }
            Some(_) => return Err(unknown()),
        };

        if segments.next().is_some() {
            return Err(unknown());
        }

        Ok(target)
    }

    /// Classifies the target.
    #[inline]
    pub const fn kind(&self) -> TargetKind {
        match self {
            Target::Collection => TargetKind::Collection,
            Target::Item(_) => TargetKind::Item,
        }
    }

    /// The product id, for item targets.
    #[inline]
    pub const fn id(&self) -> Option<ProductId> {
        match self {
            Target::Collection => None,
            Target::Item(id) => Some(*id),
        }
    }

    /// Whether a change to `changed` is relevant to an observer of `self`.
    ///
    /// Collection observers see every change. Item observers see their own
    /// item and collection-wide changes.
    pub fn observes(&self, changed: &Target) -> bool {
        match (self, changed) {
            (Target::Collection, _) => true,
            (Target::Item(_), Target::Collection) => true,
            (Target::Item(a), Target::Item(b)) => a == b,
        }
    }

    /// Renders the content address.
    pub fn address(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Collection => write!(f, "{SCHEME}{CONTENT_AUTHORITY}/{PATH_FRUITS}"),
            Target::Item(id) => write!(f, "{SCHEME}{CONTENT_AUTHORITY}/{PATH_FRUITS}/{id}"),
        }
    }
}

impl FromStr for Target {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::parse(s)
    }
}

// =============================================================================
// Target Kind
// =============================================================================

/// Classification returned by `type_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Collection,
    Item,
}

impl TargetKind {
    /// Content type string for this kind, as a content resolver reports it.
    pub fn content_type(&self) -> String {
        match self {
            TargetKind::Collection => {
                format!("vnd.android.cursor.dir/{CONTENT_AUTHORITY}/{PATH_FRUITS}")
            }
            TargetKind::Item => {
                format!("vnd.android.cursor.item/{CONTENT_AUTHORITY}/{PATH_FRUITS}")
            }
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Collection => f.write_str("collection"),
            TargetKind::Item => f.write_str("item"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
