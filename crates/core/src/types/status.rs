//! Order fulfillment status and the transition rules between statuses.

use serde::{Deserialize, Serialize};

/// Fulfillment status of a submitted order.
///
/// The forward path is `New -> Paid -> Preparing -> Ready -> Done`, but
/// operator transitions are deliberately permissive: staff may jump to any
/// non-initial status from any non-terminal one (e.g. marking an order
/// `Ready` straight from `New` when payment and prep happened off-screen).
/// Only the two terminal statuses lock the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Submitted, awaiting in-person payment. Auto-cancels after the
    /// payment window elapses.
    #[default]
    New,
    /// Paid at the counter.
    Paid,
    /// Being prepared.
    Preparing,
    /// Ready for pickup.
    Ready,
    /// Picked up. Terminal.
    Done,
    /// Cancelled by staff or by payment-window expiry. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Whether this status is terminal (`Done` or `Cancelled`).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }

    /// Whether an operator may move an order from `self` to `target`.
    ///
    /// Any target except `New` is reachable from any non-terminal status;
    /// transitions out of a terminal status are rejected, as is moving an
    /// order back to `New`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        !self.is_terminal() && !matches!(target, Self::New)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::Paid => "paid",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "paid" => Ok(Self::Paid),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}
