//! Status enums for cart workflows.

use serde::{Deserialize, Serialize};

/// Checkout progress.
///
/// `Idle -> Submitting -> {Cleared | Failed}`. `Cleared` and `Failed` end
/// one attempt; the next attempt starts again from any state except
/// `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    #[default]
    Idle,
    Submitting,
    Cleared,
    Failed,
}

impl CheckoutState {
    /// Whether an attempt has finished in this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cleared | Self::Failed)
    }

    /// Whether a new attempt may start from this state.
    #[must_use]
    pub const fn can_begin(self) -> bool {
        !matches!(self, Self::Submitting)
    }
}
