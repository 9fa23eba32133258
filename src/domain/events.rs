// src/domain/events.rs
use serde::{Deserialize, Serialize};
use crate::money::AmountValue;
use super::auctions::AuctionType;
use super::core::{Card, PlayerId};

/// Records consumed by round history and UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum RoundEvent {
    #[serde(rename = "AuctionWon")]
    AuctionWon {
        /// Seat of the winner in the player list.
        #[serde(rename = "winnerIndex")]
        winner_index: usize,
        winner: PlayerId,
        auctioneer: PlayerId,
        amount: AmountValue,
        cards: Vec<Card>,
        #[serde(rename = "auctionType")]
        auction_type: AuctionType,
    },
}

pub trait RoundLog {
    fn append(&mut self, event: RoundEvent);
}

impl RoundLog for Vec<RoundEvent> {
    fn append(&mut self, event: RoundEvent) {
        self.push(event);
    }
}
