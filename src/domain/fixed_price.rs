// src/domain/fixed_price.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::money::AmountValue;
use super::auctions::AuctionType;
use super::bids::Bid;
use super::commands::ActionKind;
use super::core::{Errors, PlayerId};
use super::outcome::{AuctionResult, StatusSummary};
use super::states::State;
use super::table::Lot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixedPriceState {
    AwaitingPrice {
        lot: Lot,
    },
    Offering {
        lot: Lot,
        price: AmountValue,
        /// Clockwise from the auctioneer's left, auctioneer excluded.
        turn_order: Vec<PlayerId>,
        turn_index: usize,
        passed: Vec<PlayerId>,
    },
    Sold {
        lot: Lot,
        price: AmountValue,
        winner: PlayerId,
        passed: Vec<PlayerId>,
        /// Everyone passed and the auctioneer had to buy at their own price.
        forced: bool,
    },
}

pub fn empty_state(lot: Lot) -> FixedPriceState {
    FixedPriceState::AwaitingPrice { lot }
}

pub fn create_with_price(lot: Lot, price: AmountValue) -> Result<FixedPriceState, Errors> {
    let auctioneer = lot.auctioneer;
    empty_state(lot).set_price(auctioneer, price)
}

impl FixedPriceState {
    pub fn price(&self) -> Option<AmountValue> {
        match self {
            FixedPriceState::AwaitingPrice { .. } => None,
            FixedPriceState::Offering { price, .. } | FixedPriceState::Sold { price, .. } => Some(*price),
        }
    }

    pub fn passed(&self) -> &[PlayerId] {
        match self {
            FixedPriceState::AwaitingPrice { .. } => &[],
            FixedPriceState::Offering { passed, .. } | FixedPriceState::Sold { passed, .. } => passed,
        }
    }

    pub fn was_forced(&self) -> bool {
        matches!(self, FixedPriceState::Sold { forced: true, .. })
    }

    /// The auctioneer names the price. They must be able to pay it
    /// themselves, since nobody buying leaves them with the card.
    pub fn set_price(&self, player: PlayerId, price: AmountValue) -> Result<Self, Errors> {
        match self {
            FixedPriceState::Sold { .. } => Err(Errors::AuctionHasEnded),
            FixedPriceState::Offering { .. } => Err(Errors::PriceAlreadySet),
            FixedPriceState::AwaitingPrice { lot } => {
                if player != lot.auctioneer {
                    lot.table.ensure_seated(player)?;
                    return Err(Errors::NotYourTurn { player, expected: Some(lot.auctioneer) });
                }
                if price < 0 {
                    return Err(Errors::InvalidAmount(price));
                }
                lot.table.ensure_affordable(player, price)?;
                Ok(FixedPriceState::Offering {
                    lot: lot.clone(),
                    price,
                    turn_order: lot.table.clockwise_after(lot.auctioneer),
                    turn_index: 0,
                    passed: Vec::new(),
                })
            }
        }
    }

    fn turn(&self, player: PlayerId) -> Result<(&Lot, AmountValue, &[PlayerId], usize, &[PlayerId]), Errors> {
        match self {
            FixedPriceState::Sold { .. } => Err(Errors::AuctionHasEnded),
            FixedPriceState::AwaitingPrice { .. } => Err(Errors::PriceNotSet),
            FixedPriceState::Offering { lot, price, turn_order, turn_index, passed } => {
                if passed.contains(&player) {
                    return Err(Errors::AlreadyPassed(player));
                }
                let current = turn_order[*turn_index];
                if player != current {
                    lot.table.ensure_seated(player)?;
                    return Err(Errors::NotYourTurn { player, expected: Some(current) });
                }
                Ok((lot, *price, turn_order.as_slice(), *turn_index, passed.as_slice()))
            }
        }
    }

    pub fn buy_at_price(&self, player: PlayerId) -> Result<Self, Errors> {
        let (lot, price, _, _, passed) = self.turn(player)?;
        lot.table.ensure_affordable(player, price)?;
        Ok(FixedPriceState::Sold {
            lot: lot.clone(),
            price,
            winner: player,
            passed: passed.to_vec(),
            forced: false,
        })
    }

    pub fn pass(&self, player: PlayerId) -> Result<Self, Errors> {
        let (lot, price, turn_order, turn_index, passed) = self.turn(player)?;
        let mut passed = passed.to_vec();
        passed.push(player);
        let next_index = turn_index + 1;
        if next_index >= turn_order.len() {
            // Nobody wanted it at that price.
            return Ok(FixedPriceState::Sold {
                lot: lot.clone(),
                price,
                winner: lot.auctioneer,
                passed,
                forced: true,
            });
        }
        Ok(FixedPriceState::Offering {
            lot: lot.clone(),
            price,
            turn_order: turn_order.to_vec(),
            turn_index: next_index,
            passed,
        })
    }
}

impl State for FixedPriceState {
    fn inc(&self, _now: DateTime<Utc>) -> Self {
        self.clone()
    }

    fn lot(&self) -> &Lot {
        match self {
            FixedPriceState::AwaitingPrice { lot }
            | FixedPriceState::Offering { lot, .. }
            | FixedPriceState::Sold { lot, .. } => lot,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, FixedPriceState::Sold { .. })
    }

    fn can_conclude(&self) -> bool {
        !self.is_active()
    }

    fn current_actor(&self) -> Option<PlayerId> {
        match self {
            FixedPriceState::AwaitingPrice { lot } => Some(lot.auctioneer),
            FixedPriceState::Offering { turn_order, turn_index, .. } => Some(turn_order[*turn_index]),
            FixedPriceState::Sold { .. } => None,
        }
    }

    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        if self.current_actor() != Some(player) {
            return Vec::new();
        }
        match self {
            FixedPriceState::AwaitingPrice { .. } => vec![ActionKind::SetPrice],
            FixedPriceState::Offering { lot, price, .. } => {
                let mut actions = Vec::new();
                if lot.table.ensure_affordable(player, *price).is_ok() {
                    actions.push(ActionKind::Buy);
                }
                actions.push(ActionKind::Pass);
                actions
            }
            FixedPriceState::Sold { .. } => Vec::new(),
        }
    }

    fn get_bids(&self) -> Vec<Bid> {
        match self {
            FixedPriceState::Sold { winner, price, .. } => vec![Bid::new(*winner, *price)],
            _ => Vec::new(),
        }
    }

    fn conclude(&self) -> Result<AuctionResult, Errors> {
        match self {
            FixedPriceState::Sold { lot, price, winner, .. } => Ok(AuctionResult::new(lot, *winner, *price, AuctionType::FixedPrice)),
            _ => Err(Errors::NotReadyToConclude),
        }
    }

    fn summary(&self) -> StatusSummary {
        let lot = self.lot();
        StatusSummary {
            auction_type: AuctionType::FixedPrice,
            phase: match self {
                FixedPriceState::AwaitingPrice { .. } => "AwaitingPrice".to_string(),
                FixedPriceState::Offering { .. } => "Offering".to_string(),
                FixedPriceState::Sold { .. } => "Sold".to_string(),
            },
            auctioneer: lot.auctioneer,
            active: self.is_active(),
            can_conclude: self.can_conclude(),
            current_actor: self.current_actor(),
            high_bid: None,
            fixed_price: self.price(),
            bids: self.get_bids(),
            cards: lot.cards.clone(),
        }
    }
}
