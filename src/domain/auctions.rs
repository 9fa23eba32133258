// src/domain/auctions.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::money::AmountValue;
use super::bids::Bid;
use super::commands::{Action, ActionKind};
use super::core::{Card, Errors, Player, PlayerId};
use super::double::{self, DoubleState};
use super::fixed_price::{self, FixedPriceState};
use super::one_offer::{self, OneOfferState};
use super::open_outcry::{self, OpenOutcryState, Options as OpenOptions};
use super::outcome::{AuctionResult, StatusSummary};
use super::sealed_bid::{self, SealedBidState};
use super::states::State;
use super::table::Lot;

/// Which mechanism sells a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuctionType {
    Open,
    OneOffer,
    Hidden,
    FixedPrice,
    Double,
}

impl AuctionType {
    pub const ALL: [AuctionType; 5] = [
        AuctionType::Open,
        AuctionType::OneOffer,
        AuctionType::Hidden,
        AuctionType::FixedPrice,
        AuctionType::Double,
    ];
}

impl Serialize for AuctionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: serde::Serializer {
        serializer.serialize_str(&self.to_string())
    }
}
impl<'de> Deserialize<'de> for AuctionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: serde::Deserializer<'de> {
        let text = String::deserialize(deserializer)?;
        AuctionType::from_str(&text).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for AuctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionType::Open => write!(f, "Open"),
            AuctionType::OneOffer => write!(f, "OneOffer"),
            AuctionType::Hidden => write!(f, "Hidden"),
            AuctionType::FixedPrice => write!(f, "FixedPrice"),
            AuctionType::Double => write!(f, "Double"),
        }
    }
}

impl FromStr for AuctionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(AuctionType::Open),
            "OneOffer" => Ok(AuctionType::OneOffer),
            "Hidden" => Ok(AuctionType::Hidden),
            "FixedPrice" => Ok(AuctionType::FixedPrice),
            "Double" => Ok(AuctionType::Double),
            _ => Err(format!("Unknown auction type: {}", s)),
        }
    }
}

/// How an auction is set up beyond the card and the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuctionSettings {
    #[serde(default)]
    pub open: OpenOptions,
    /// Price for a fixed-price card. Without it the auctioneer sets the
    /// price as their first action.
    #[serde(rename = "fixedPrice", default)]
    pub fixed_price: Option<AmountValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionState {
    Open(OpenOutcryState),
    OneOffer(OneOfferState),
    Hidden(SealedBidState),
    FixedPrice(FixedPriceState),
    Double(DoubleState),
}

/// Start the auction for a card the auctioneer just played.
pub fn create(
    card: Card,
    auctioneer: PlayerId,
    players: &[Player],
    now: DateTime<Utc>,
    settings: AuctionSettings,
) -> Result<AuctionState, Errors> {
    let lot = Lot::new(vec![card], auctioneer, players)?;
    if let Some(held) = lot.table.held_card(auctioneer, lot.lead_card().id) {
        if held != lot.lead_card() {
            return Err(Errors::IneligibleCard(held.id));
        }
    }
    // Doubles only build their open auction once the second card arrives.
    settings.open.deadline_from(now)?;
    match (lot.lead_card().auction_type, settings.fixed_price) {
        (AuctionType::FixedPrice, Some(price)) => {
            Ok(AuctionState::FixedPrice(fixed_price::create_with_price(lot, price)?))
        }
        (AuctionType::Double, _) => Ok(AuctionState::Double(double::empty_state(lot, settings.open))),
        _ => empty_state_for(lot, now, settings.open),
    }
}

/// The initial state for the mechanism of the lot's lead card.
pub fn empty_state_for(lot: Lot, now: DateTime<Utc>, options: OpenOptions) -> Result<AuctionState, Errors> {
    match lot.lead_card().auction_type {
        AuctionType::Open => Ok(AuctionState::Open(open_outcry::empty_state(lot, now, options)?)),
        AuctionType::OneOffer => Ok(AuctionState::OneOffer(one_offer::empty_state(lot))),
        AuctionType::Hidden => Ok(AuctionState::Hidden(sealed_bid::empty_state(lot))),
        AuctionType::FixedPrice => Ok(AuctionState::FixedPrice(fixed_price::empty_state(lot))),
        AuctionType::Double => Err(Errors::IneligibleCard(lot.lead_card().id)),
    }
}

impl AuctionState {
    pub fn auction_type(&self) -> AuctionType {
        match self {
            AuctionState::Open(_) => AuctionType::Open,
            AuctionState::OneOffer(_) => AuctionType::OneOffer,
            AuctionState::Hidden(_) => AuctionType::Hidden,
            AuctionState::FixedPrice(_) => AuctionType::FixedPrice,
            AuctionState::Double(_) => AuctionType::Double,
        }
    }

    /// Routes an action to the mechanism that supports it.
    pub fn apply(&self, player: PlayerId, action: Action, now: DateTime<Utc>) -> Result<AuctionState, Errors> {
        match (self, action) {
            (AuctionState::Open(s), Action::Bid { amount }) => s.place_bid(player, amount, now).map(AuctionState::Open),
            (AuctionState::Open(s), Action::Pass) => s.pass(player, now).map(AuctionState::Open),

            (AuctionState::OneOffer(s), Action::Offer { amount }) => s.make_offer(player, amount).map(AuctionState::OneOffer),
            (AuctionState::OneOffer(s), Action::Pass) => s.pass(player).map(AuctionState::OneOffer),
            (AuctionState::OneOffer(s), Action::AcceptHighestBid) => s.accept_highest_bid(player).map(AuctionState::OneOffer),
            (AuctionState::OneOffer(s), Action::Outbid { amount }) => s.outbid(player, amount).map(AuctionState::OneOffer),
            (AuctionState::OneOffer(s), Action::TakeFree) => s.take_free(player).map(AuctionState::OneOffer),

            (AuctionState::Hidden(s), Action::SubmitSealedBid { amount }) => s.submit_bid(player, amount).map(AuctionState::Hidden),
            (AuctionState::Hidden(s), Action::Reveal) => {
                s.lot().table.ensure_seated(player)?;
                s.reveal_bids().map(AuctionState::Hidden)
            }

            (AuctionState::FixedPrice(s), Action::SetPrice { price }) => s.set_price(player, price).map(AuctionState::FixedPrice),
            (AuctionState::FixedPrice(s), Action::Buy) => s.buy_at_price(player).map(AuctionState::FixedPrice),
            (AuctionState::FixedPrice(s), Action::Pass) => s.pass(player).map(AuctionState::FixedPrice),

            (AuctionState::Double(s), Action::OfferSecondCard { card }) => s.offer_second_card(player, card, now).map(AuctionState::Double),
            (AuctionState::Double(s), Action::DeclineSecondCard) => s.decline(player).map(AuctionState::Double),
            (AuctionState::Double(s), action) => s
                .apply_embedded(|inner| inner.apply(player, action, now))
                .map(AuctionState::Double),

            (state, action) => Err(Errors::UnsupportedAction {
                action: action.kind().to_string(),
                auction_type: state.auction_type(),
            }),
        }
    }
}

impl State for AuctionState {
    fn inc(&self, now: DateTime<Utc>) -> Self {
        match self {
            AuctionState::Open(state) => AuctionState::Open(state.inc(now)),
            AuctionState::OneOffer(state) => AuctionState::OneOffer(state.inc(now)),
            AuctionState::Hidden(state) => AuctionState::Hidden(state.inc(now)),
            AuctionState::FixedPrice(state) => AuctionState::FixedPrice(state.inc(now)),
            AuctionState::Double(state) => AuctionState::Double(state.inc(now)),
        }
    }

    fn lot(&self) -> &Lot {
        match self {
            AuctionState::Open(state) => state.lot(),
            AuctionState::OneOffer(state) => state.lot(),
            AuctionState::Hidden(state) => state.lot(),
            AuctionState::FixedPrice(state) => state.lot(),
            AuctionState::Double(state) => state.lot(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            AuctionState::Open(state) => state.is_active(),
            AuctionState::OneOffer(state) => state.is_active(),
            AuctionState::Hidden(state) => state.is_active(),
            AuctionState::FixedPrice(state) => state.is_active(),
            AuctionState::Double(state) => state.is_active(),
        }
    }

    fn can_conclude(&self) -> bool {
        match self {
            AuctionState::Open(state) => state.can_conclude(),
            AuctionState::OneOffer(state) => state.can_conclude(),
            AuctionState::Hidden(state) => state.can_conclude(),
            AuctionState::FixedPrice(state) => state.can_conclude(),
            AuctionState::Double(state) => state.can_conclude(),
        }
    }

    fn current_actor(&self) -> Option<PlayerId> {
        match self {
            AuctionState::Open(state) => state.current_actor(),
            AuctionState::OneOffer(state) => state.current_actor(),
            AuctionState::Hidden(state) => state.current_actor(),
            AuctionState::FixedPrice(state) => state.current_actor(),
            AuctionState::Double(state) => state.current_actor(),
        }
    }

    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        match self {
            AuctionState::Open(state) => state.valid_actions(player),
            AuctionState::OneOffer(state) => state.valid_actions(player),
            AuctionState::Hidden(state) => state.valid_actions(player),
            AuctionState::FixedPrice(state) => state.valid_actions(player),
            AuctionState::Double(state) => state.valid_actions(player),
        }
    }

    fn get_bids(&self) -> Vec<Bid> {
        match self {
            AuctionState::Open(state) => state.get_bids(),
            AuctionState::OneOffer(state) => state.get_bids(),
            AuctionState::Hidden(state) => state.get_bids(),
            AuctionState::FixedPrice(state) => state.get_bids(),
            AuctionState::Double(state) => state.get_bids(),
        }
    }

    fn conclude(&self) -> Result<AuctionResult, Errors> {
        match self {
            AuctionState::Open(state) => state.conclude(),
            AuctionState::OneOffer(state) => state.conclude(),
            AuctionState::Hidden(state) => state.conclude(),
            AuctionState::FixedPrice(state) => state.conclude(),
            AuctionState::Double(state) => state.conclude(),
        }
    }

    fn summary(&self) -> StatusSummary {
        match self {
            AuctionState::Open(state) => state.summary(),
            AuctionState::OneOffer(state) => state.summary(),
            AuctionState::Hidden(state) => state.summary(),
            AuctionState::FixedPrice(state) => state.summary(),
            AuctionState::Double(state) => state.summary(),
        }
    }
}
