// src/domain/core.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;
use crate::money::AmountValue;
use super::auctions::AuctionType;

pub type PlayerId = u32;
pub type CardId = u32;
pub type AuctionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Artist {
    LiteMetal,
    Yoko,
    ChristinP,
    KarlGitter,
    Krypto,
}

impl Artist {
    pub const ALL: [Artist; 5] = [
        Artist::LiteMetal,
        Artist::Yoko,
        Artist::ChristinP,
        Artist::KarlGitter,
        Artist::Krypto,
    ];
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artist::LiteMetal => write!(f, "Lite Metal"),
            Artist::Yoko => write!(f, "Yoko"),
            Artist::ChristinP => write!(f, "Christin P."),
            Artist::KarlGitter => write!(f, "Karl Gitter"),
            Artist::Krypto => write!(f, "Krypto"),
        }
    }
}

impl FromStr for Artist {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Artist::ALL
            .iter()
            .copied()
            .find(|artist| artist.to_string() == s || format!("{:?}", artist) == s)
            .ok_or_else(|| format!("Unknown artist: {}", s))
    }
}

/// A painting. Immutable once dealt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub artist: Artist,
    #[serde(rename = "auctionType")]
    pub auction_type: AuctionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
}

impl Card {
    pub fn new(id: CardId, artist: Artist, auction_type: AuctionType) -> Self {
        Card { id, artist, auction_type, artwork: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub money: AmountValue,
    #[serde(default)]
    pub hand: Vec<Card>,
    #[serde(default)]
    pub purchases: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, money: AmountValue) -> Self {
        Player {
            id,
            name: name.into(),
            money,
            hand: Vec::new(),
            purchases: Vec::new(),
        }
    }

    pub fn with_hand(mut self, hand: Vec<Card>) -> Self {
        self.hand = hand;
        self
    }
}

/// Coarse classification of [`Errors`], used by callers deciding how to re-prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    TurnViolation,
    InsufficientFunds,
    InvalidAmount,
    StaleState,
    PrematureConclusion,
    DuplicateAction,
    InvalidSetup,
    UnsupportedAction,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Errors {
    #[error("Not the turn of player {player}, waiting for {expected:?}")]
    NotYourTurn {
        player: PlayerId,
        expected: Option<PlayerId>,
    },

    #[error("Player {player} cannot afford {amount}, has {available}")]
    InsufficientFunds {
        player: PlayerId,
        amount: AmountValue,
        available: AmountValue,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(AmountValue),

    #[error("Must place bid over highest bid: {0:?}")]
    MustPlaceBidOverHighestBid(AmountValue),

    #[error("Player {0} already holds the highest bid")]
    AlreadyLeading(PlayerId),

    #[error("Cannot take the card for free once bids have been placed")]
    BidsAlreadyPlaced,

    #[error("There is no bid to accept")]
    NoBidToAccept,

    #[error("Auction has ended")]
    AuctionHasEnded,

    #[error("Bids have already been revealed")]
    BidsAlreadyRevealed,

    #[error("Bidding is closed, the auctioneer must decide")]
    BiddingClosed,

    #[error("Auction cannot be concluded yet")]
    NotReadyToConclude,

    #[error("Still waiting for bids from {0:?}")]
    AwaitingBids(Vec<PlayerId>),

    #[error("The auctioneer has not set a price yet")]
    PriceNotSet,

    #[error("Price already set")]
    PriceAlreadySet,

    #[error("Already placed bid")]
    AlreadyPlacedBid,

    #[error("Player {0} has already passed")]
    AlreadyPassed(PlayerId),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Card {card} is not in the hand of player {player}")]
    CardNotInHand {
        player: PlayerId,
        card: CardId,
    },

    #[error("Card {card} by {found} does not match artist {expected}")]
    ArtistMismatch {
        card: CardId,
        expected: Artist,
        found: Artist,
    },

    #[error("Waiting for a second card to be offered")]
    SecondCardPending,

    #[error("A second card has already been offered")]
    SecondCardAlreadyOffered,

    #[error("Card {0} cannot be used here")]
    IneligibleCard(CardId),

    #[error("Invalid countdown: {0} seconds")]
    InvalidCountdown(i64),

    #[error("Action {action} is not supported by {auction_type} auctions")]
    UnsupportedAction {
        action: String,
        auction_type: AuctionType,
    },
}

impl Errors {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Errors::NotYourTurn { .. }
            | Errors::AlreadyLeading(_)
            | Errors::SecondCardPending => ErrorKind::TurnViolation,
            Errors::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Errors::InvalidAmount(_)
            | Errors::MustPlaceBidOverHighestBid(_)
            | Errors::BidsAlreadyPlaced
            | Errors::NoBidToAccept => ErrorKind::InvalidAmount,
            Errors::AuctionHasEnded
            | Errors::BidsAlreadyRevealed
            | Errors::BiddingClosed
            | Errors::PriceAlreadySet
            | Errors::SecondCardAlreadyOffered => ErrorKind::StaleState,
            Errors::NotReadyToConclude
            | Errors::AwaitingBids(_)
            | Errors::PriceNotSet => ErrorKind::PrematureConclusion,
            Errors::AlreadyPlacedBid | Errors::AlreadyPassed(_) => ErrorKind::DuplicateAction,
            Errors::UnknownPlayer(_)
            | Errors::InvalidTable(_)
            | Errors::CardNotInHand { .. }
            | Errors::ArtistMismatch { .. }
            | Errors::IneligibleCard(_)
            | Errors::InvalidCountdown(_) => ErrorKind::InvalidSetup,
            Errors::UnsupportedAction { .. } => ErrorKind::UnsupportedAction,
        }
    }
}
