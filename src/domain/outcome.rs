// src/domain/outcome.rs
use serde::{Deserialize, Serialize};
use crate::money::AmountValue;
use super::auctions::AuctionType;
use super::bids::Bid;
use super::core::{Card, PlayerId};
use super::table::Lot;

/// The settlement record of a concluded auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionResult {
    pub winner: PlayerId,
    pub auctioneer: PlayerId,
    #[serde(rename = "salePrice")]
    pub sale_price: AmountValue,
    pub cards: Vec<Card>,
    /// Money flowing to the auctioneer. Zero when the auctioneer wins, since
    /// they pay the bank.
    pub profit: AmountValue,
    #[serde(rename = "auctionType")]
    pub auction_type: AuctionType,
}

impl AuctionResult {
    pub fn new(lot: &Lot, winner: PlayerId, sale_price: AmountValue, auction_type: AuctionType) -> Self {
        let profit = if winner == lot.auctioneer { 0 } else { sale_price };
        AuctionResult {
            winner,
            auctioneer: lot.auctioneer,
            sale_price,
            cards: lot.cards.clone(),
            profit,
            auction_type,
        }
    }

    /// The auctioneer keeps the cards without anyone paying.
    pub fn taken_free(lot: &Lot, auction_type: AuctionType) -> Self {
        AuctionResult::new(lot, lot.auctioneer, 0, auction_type)
    }

    pub fn winner_is_auctioneer(&self) -> bool {
        self.winner == self.auctioneer
    }
}

/// Read-only view of an auction for UI and AI callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    #[serde(rename = "auctionType")]
    pub auction_type: AuctionType,
    pub phase: String,
    pub auctioneer: PlayerId,
    pub active: bool,
    #[serde(rename = "canConclude")]
    pub can_conclude: bool,
    #[serde(rename = "currentActor")]
    pub current_actor: Option<PlayerId>,
    #[serde(rename = "highBid")]
    pub high_bid: Option<Bid>,
    #[serde(rename = "fixedPrice", skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<AmountValue>,
    /// Bids everyone may see. Sealed bids stay empty until revealed.
    pub bids: Vec<Bid>,
    pub cards: Vec<Card>,
}
