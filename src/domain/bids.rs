// src/domain/bids.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::money::AmountValue;
use super::core::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub bidder: PlayerId,
    pub amount: AmountValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Utc>>,
}

impl Bid {
    pub fn new(bidder: PlayerId, amount: AmountValue) -> Self {
        Bid { bidder, amount, at: None }
    }

    pub fn timed(bidder: PlayerId, amount: AmountValue, at: DateTime<Utc>) -> Self {
        Bid { bidder, amount, at: Some(at) }
    }
}

/// Amount of the standing bid, 0 when nobody has bid.
pub fn highest_amount(high_bid: Option<&Bid>) -> AmountValue {
    high_bid.map(|b| b.amount).unwrap_or(0)
}
