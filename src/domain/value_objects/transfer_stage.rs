//! # Transfer Stage
//!
//! Per-request relay lifecycle.
//!
//! # State Machine
//!
//! ```text
//! Received → Validated → MetadataFetched → Authorized → FeePlanned → Submitted → Confirmed
//!     ↓          ↓              ↓               ↓            ↓            ↓
//!     └──────────┴──────────────┴───────────────┴────────────┴────────────┴→ Failed
//! ```
//!
//! A failed request records the stage it failed in; there is no resumption.
//!
//! # Examples
//!
//! ```
//! use erc20_relayer::domain::value_objects::transfer_stage::TransferStage;
//!
//! let stage = TransferStage::Received;
//! assert!(stage.can_transition_to(TransferStage::Validated));
//! assert!(!stage.can_transition_to(TransferStage::Submitted));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of a relay request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TransferStage {
    /// Request accepted, nothing checked yet.
    #[default]
    Received = 0,

    /// Addresses, amount, network and token resolved.
    Validated = 1,

    /// Token metadata, allowance and balance read.
    MetadataFetched = 2,

    /// Allowance and balance cover the requested value.
    Authorized = 3,

    /// Gas and fees planned, relayer funding checked.
    FeePlanned = 4,

    /// Transaction broadcast.
    Submitted = 5,

    /// Transaction mined (terminal).
    Confirmed = 6,

    /// Request failed (terminal).
    Failed = 7,
}

impl TransferStage {
    /// Returns true if this is a terminal stage.
    ///
    /// ```
    /// use erc20_relayer::domain::value_objects::transfer_stage::TransferStage;
    ///
    /// assert!(TransferStage::Confirmed.is_terminal());
    /// assert!(TransferStage::Failed.is_terminal());
    /// assert!(!TransferStage::Submitted.is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Returns the next stage on the success path, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Validated),
            Self::Validated => Some(Self::MetadataFetched),
            Self::MetadataFetched => Some(Self::Authorized),
            Self::Authorized => Some(Self::FeePlanned),
            Self::FeePlanned => Some(Self::Submitted),
            Self::Submitted => Some(Self::Confirmed),
            Self::Confirmed | Self::Failed => None,
        }
    }

    /// Returns true if this stage can transition to `target`.
    ///
    /// Stages advance one step at a time; any non-terminal stage may fail.
    ///
    /// # Arguments
    ///
    /// * `target` - The stage to transition to
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == Self::Failed || self.next() == Some(target)
    }

    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "RECEIVED",
            Self::Validated => "VALIDATED",
            Self::MetadataFetched => "METADATA_FETCHED",
            Self::Authorized => "AUTHORIZED",
            Self::FeePlanned => "FEE_PLANNED",
            Self::Submitted => "SUBMITTED",
            Self::Confirmed => "CONFIRMED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
