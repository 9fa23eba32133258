use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use crate::money::AmountValue;
use super::auctions::AuctionSettings;
use super::core::{AuctionId, Card, CardId, Player, PlayerId};
use super::outcome::{AuctionResult, StatusSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Bid,
    Pass,
    Offer,
    SetPrice,
    Buy,
    SubmitSealedBid,
    Reveal,
    AcceptHighestBid,
    Outbid,
    TakeFree,
    OfferSecondCard,
    DeclineSecondCard,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Something a player does in an auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Action {
    Bid { amount: AmountValue },
    Pass,
    Offer { amount: AmountValue },
    SetPrice { price: AmountValue },
    Buy,
    SubmitSealedBid { amount: AmountValue },
    Reveal,
    AcceptHighestBid,
    Outbid { amount: AmountValue },
    TakeFree,
    /// The id of a card in the acting player's hand.
    OfferSecondCard { card: CardId },
    DeclineSecondCard,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Bid { .. } => ActionKind::Bid,
            Action::Pass => ActionKind::Pass,
            Action::Offer { .. } => ActionKind::Offer,
            Action::SetPrice { .. } => ActionKind::SetPrice,
            Action::Buy => ActionKind::Buy,
            Action::SubmitSealedBid { .. } => ActionKind::SubmitSealedBid,
            Action::Reveal => ActionKind::Reveal,
            Action::AcceptHighestBid => ActionKind::AcceptHighestBid,
            Action::Outbid { .. } => ActionKind::Outbid,
            Action::TakeFree => ActionKind::TakeFree,
            Action::OfferSecondCard { .. } => ActionKind::OfferSecondCard,
            Action::DeclineSecondCard => ActionKind::DeclineSecondCard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Command {
    #[serde(rename = "CreateAuction")]
    CreateAuction {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        card: Card,
        auctioneer: PlayerId,
        players: Vec<Player>,
        #[serde(default)]
        settings: AuctionSettings,
    },

    #[serde(rename = "Act")]
    Act {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        player: PlayerId,
        action: Action,
    },

    /// Let the clock run: open auctions whose countdown elapsed close.
    #[serde(rename = "Tick")]
    Tick {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
    },

    #[serde(rename = "Conclude")]
    Conclude {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum CommandSuccess {
    #[serde(rename = "AuctionCreated")]
    AuctionCreated {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        status: StatusSummary,
    },

    #[serde(rename = "ActionAccepted")]
    ActionAccepted {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        player: PlayerId,
        action: Action,
        status: StatusSummary,
    },

    #[serde(rename = "Ticked")]
    Ticked {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        closed: Vec<AuctionId>,
    },

    #[serde(rename = "AuctionConcluded")]
    AuctionConcluded {
        #[serde(rename = "at")]
        timestamp: DateTime<Utc>,
        #[serde(rename = "auctionId")]
        auction_id: AuctionId,
        result: AuctionResult,
    },
}
