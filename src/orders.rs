//! Orders
//!
//! The kitchen works through each order in four steps:
//! `queued → preparing → ready → delivered`. Staff advance an order one step
//! at a time with an [`OrderAction`]; there is no way back and no
//! cancellation. Payment is tracked separately by [`PaymentStatus`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stored status string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} status: {value}")]
pub struct StatusParseError {
    /// Which status field was being parsed
    pub kind: &'static str,

    /// The rejected value
    pub value: String,
}

/// Raised when an action does not apply to an order's current status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot {action} an order that is {status}")]
pub struct TransitionError {
    /// The attempted action
    pub action: OrderAction,

    /// The status the order was in
    pub status: FulfillmentStatus,
}

/// Kitchen fulfilment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    /// Waiting for the kitchen
    Queued,

    /// Being cooked
    Preparing,

    /// Waiting at the counter
    Ready,

    /// Handed to the customer
    Delivered,
}

impl FulfillmentStatus {
    /// Statuses shown in a customer's active orders.
    pub const ACTIVE: [FulfillmentStatus; 3] = [Self::Queued, Self::Preparing, Self::Ready];

    /// Storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
        }
    }

    /// Whether the order still needs kitchen attention.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Delivered)
    }

    /// The single forward action available from this status.
    #[must_use]
    pub const fn next_action(self) -> Option<OrderAction> {
        match self {
            Self::Queued => Some(OrderAction::StartPreparing),
            Self::Preparing => Some(OrderAction::MarkReady),
            Self::Ready => Some(OrderAction::MarkDelivered),
            Self::Delivered => None,
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FulfillmentStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "queued" => Ok(Self::Queued),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivered" => Ok(Self::Delivered),
            other => Err(StatusParseError {
                kind: "fulfillment",
                value: other.to_string(),
            }),
        }
    }
}

/// Staff action that moves an order one step forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// `queued → preparing`
    StartPreparing,

    /// `preparing → ready`
    MarkReady,

    /// `ready → delivered`
    MarkDelivered,
}

impl OrderAction {
    /// Status an order must be in for the action to apply.
    #[must_use]
    pub const fn from_status(self) -> FulfillmentStatus {
        match self {
            Self::StartPreparing => FulfillmentStatus::Queued,
            Self::MarkReady => FulfillmentStatus::Preparing,
            Self::MarkDelivered => FulfillmentStatus::Ready,
        }
    }

    /// Status the order is in after the action.
    #[must_use]
    pub const fn to_status(self) -> FulfillmentStatus {
        match self {
            Self::StartPreparing => FulfillmentStatus::Preparing,
            Self::MarkReady => FulfillmentStatus::Ready,
            Self::MarkDelivered => FulfillmentStatus::Delivered,
        }
    }

    /// Storage and wire representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartPreparing => "start_preparing",
            Self::MarkReady => "mark_ready",
            Self::MarkDelivered => "mark_delivered",
        }
    }

    /// Apply the action to `status`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] unless `status` is exactly [`Self::from_status`].
    pub fn apply(self, status: FulfillmentStatus) -> Result<FulfillmentStatus, TransitionError> {
        if status == self.from_status() {
            Ok(self.to_status())
        } else {
            Err(TransitionError {
                action: self,
                status,
            })
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name an [`OrderAction`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order action: {0}")]
pub struct ActionParseError(pub String);

impl FromStr for OrderAction {
    type Err = ActionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "start_preparing" => Ok(Self::StartPreparing),
            "mark_ready" => Ok(Self::MarkReady),
            "mark_delivered" => Ok(Self::MarkDelivered),
            other => Err(ActionParseError(other.to_string())),
        }
    }
}

/// Payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Order recorded, payment not settled
    Pending,

    /// Payment settled
    Paid,
}

impl PaymentStatus {
    /// Storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(StatusParseError {
                kind: "payment",
                value: other.to_string(),
            }),
        }
    }
}
