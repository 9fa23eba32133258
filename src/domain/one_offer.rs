// src/domain/one_offer.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::money::AmountValue;
use super::auctions::AuctionType;
use super::bids::{highest_amount, Bid};
use super::commands::ActionKind;
use super::core::{Errors, PlayerId};
use super::outcome::{AuctionResult, StatusSummary};
use super::states::State;
use super::table::Lot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Offered(Bid),
    Passed(PlayerId),
}

/// Each player left of the auctioneer gets exactly one chance to offer more
/// than the standing bid. The auctioneer then accepts, outbids or, when
/// nobody offered, takes the card for free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OneOfferState {
    Bidding {
        lot: Lot,
        /// Clockwise from the auctioneer's left, auctioneer last.
        turn_order: Vec<PlayerId>,
        turn_index: usize,
        high_bid: Option<Bid>,
        history: Vec<Turn>,
    },
    AuctioneerDecision {
        lot: Lot,
        high_bid: Option<Bid>,
        history: Vec<Turn>,
    },
    Sold {
        lot: Lot,
        winner: PlayerId,
        price: AmountValue,
        history: Vec<Turn>,
    },
}

pub fn empty_state(lot: Lot) -> OneOfferState {
    let turn_order = lot.table.auctioneer_last(lot.auctioneer);
    OneOfferState::Bidding {
        lot,
        turn_order,
        turn_index: 0,
        high_bid: None,
        history: Vec::new(),
    }
}

impl OneOfferState {
    /// The order driving turns. Once bidding is over only the auctioneer
    /// acts, so the order is rebuilt from the table.
    pub fn turn_order(&self) -> Vec<PlayerId> {
        match self {
            OneOfferState::Bidding { turn_order, .. } => turn_order.clone(),
            _ => self.lot().table.auctioneer_last(self.lot().auctioneer),
        }
    }

    pub fn high_bid(&self) -> Option<&Bid> {
        match self {
            OneOfferState::Bidding { high_bid, .. } | OneOfferState::AuctioneerDecision { high_bid, .. } => high_bid.as_ref(),
            OneOfferState::Sold { .. } => None,
        }
    }

    pub fn is_auctioneer_deciding(&self) -> bool {
        matches!(self, OneOfferState::AuctioneerDecision { .. })
    }

    fn history(&self) -> &[Turn] {
        match self {
            OneOfferState::Bidding { history, .. }
            | OneOfferState::AuctioneerDecision { history, .. }
            | OneOfferState::Sold { history, .. } => history,
        }
    }

    /// Checks that `player` may take a bidding turn and returns the pieces
    /// needed to record it.
    fn bidding_turn(&self, player: PlayerId) -> Result<(&Lot, &[PlayerId], usize, Option<&Bid>), Errors> {
        match self {
            OneOfferState::Sold { .. } => Err(Errors::AuctionHasEnded),
            OneOfferState::AuctioneerDecision { lot, .. } => {
                if player == lot.auctioneer {
                    return Err(Errors::BiddingClosed);
                }
                lot.table.ensure_seated(player)?;
                Err(Errors::NotYourTurn { player, expected: Some(lot.auctioneer) })
            }
            OneOfferState::Bidding { lot, turn_order, turn_index, high_bid, .. } => {
                let current = turn_order[*turn_index];
                if player != current {
                    lot.table.ensure_seated(player)?;
                    return Err(Errors::NotYourTurn { player, expected: Some(current) });
                }
                Ok((lot, turn_order.as_slice(), *turn_index, high_bid.as_ref()))
            }
        }
    }

    fn decision(&self, player: PlayerId) -> Result<(&Lot, Option<&Bid>), Errors> {
        match self {
            OneOfferState::Sold { .. } => Err(Errors::AuctionHasEnded),
            OneOfferState::Bidding { lot, turn_order, turn_index, .. } => {
                lot.table.ensure_seated(player)?;
                Err(Errors::NotYourTurn { player, expected: Some(turn_order[*turn_index]) })
            }
            OneOfferState::AuctioneerDecision { lot, high_bid, .. } => {
                if player != lot.auctioneer {
                    lot.table.ensure_seated(player)?;
                    return Err(Errors::NotYourTurn { player, expected: Some(lot.auctioneer) });
                }
                Ok((lot, high_bid.as_ref()))
            }
        }
    }

    fn advance(&self, lot: &Lot, turn_order: &[PlayerId], turn_index: usize, high_bid: Option<Bid>, turn: Turn) -> Self {
        let mut history = self.history().to_vec();
        history.push(turn);
        let next_index = turn_index + 1;
        // The last slot belongs to the auctioneer.
        if next_index >= turn_order.len() - 1 {
            OneOfferState::AuctioneerDecision {
                lot: lot.clone(),
                high_bid,
                history,
            }
        } else {
            OneOfferState::Bidding {
                lot: lot.clone(),
                turn_order: turn_order.to_vec(),
                turn_index: next_index,
                high_bid,
                history,
            }
        }
    }

    pub fn make_offer(&self, player: PlayerId, amount: AmountValue) -> Result<Self, Errors> {
        let (lot, turn_order, turn_index, high_bid) = self.bidding_turn(player)?;
        if amount <= 0 {
            return Err(Errors::InvalidAmount(amount));
        }
        let highest = highest_amount(high_bid);
        if amount <= highest {
            return Err(Errors::MustPlaceBidOverHighestBid(highest));
        }
        lot.table.ensure_affordable(player, amount)?;
        let bid = Bid::new(player, amount);
        Ok(self.advance(lot, turn_order, turn_index, Some(bid.clone()), Turn::Offered(bid)))
    }

    pub fn pass(&self, player: PlayerId) -> Result<Self, Errors> {
        let (lot, turn_order, turn_index, high_bid) = self.bidding_turn(player)?;
        Ok(self.advance(lot, turn_order, turn_index, high_bid.cloned(), Turn::Passed(player)))
    }

    /// The auctioneer sells to the highest bidder at their offer.
    pub fn accept_highest_bid(&self, player: PlayerId) -> Result<Self, Errors> {
        let (lot, high_bid) = self.decision(player)?;
        let bid = high_bid.ok_or(Errors::NoBidToAccept)?;
        Ok(OneOfferState::Sold {
            lot: lot.clone(),
            winner: bid.bidder,
            price: bid.amount,
            history: self.history().to_vec(),
        })
    }

    /// The auctioneer keeps the card by paying more than the highest offer.
    pub fn outbid(&self, player: PlayerId, amount: AmountValue) -> Result<Self, Errors> {
        let (lot, high_bid) = self.decision(player)?;
        if amount <= 0 {
            return Err(Errors::InvalidAmount(amount));
        }
        let highest = highest_amount(high_bid);
        if amount <= highest {
            return Err(Errors::MustPlaceBidOverHighestBid(highest));
        }
        lot.table.ensure_affordable(player, amount)?;
        let mut history = self.history().to_vec();
        history.push(Turn::Offered(Bid::new(player, amount)));
        Ok(OneOfferState::Sold {
            lot: lot.clone(),
            winner: player,
            price: amount,
            history,
        })
    }

    pub fn take_free(&self, player: PlayerId) -> Result<Self, Errors> {
        let (lot, high_bid) = self.decision(player)?;
        if high_bid.is_some() {
            return Err(Errors::BidsAlreadyPlaced);
        }
        Ok(OneOfferState::Sold {
            lot: lot.clone(),
            winner: player,
            price: 0,
            history: self.history().to_vec(),
        })
    }
}

impl State for OneOfferState {
    fn inc(&self, _now: DateTime<Utc>) -> Self {
        self.clone()
    }

    fn lot(&self) -> &Lot {
        match self {
            OneOfferState::Bidding { lot, .. }
            | OneOfferState::AuctioneerDecision { lot, .. }
            | OneOfferState::Sold { lot, .. } => lot,
        }
    }

    fn is_active(&self) -> bool {
        !matches!(self, OneOfferState::Sold { .. })
    }

    fn can_conclude(&self) -> bool {
        !self.is_active()
    }

    fn current_actor(&self) -> Option<PlayerId> {
        match self {
            OneOfferState::Bidding { turn_order, turn_index, .. } => Some(turn_order[*turn_index]),
            OneOfferState::AuctioneerDecision { lot, .. } => Some(lot.auctioneer),
            OneOfferState::Sold { .. } => None,
        }
    }

    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        if self.current_actor() != Some(player) {
            return Vec::new();
        }
        let lot = self.lot();
        let highest = highest_amount(self.high_bid());
        let can_raise = lot.table.funds(player).map(|m| m > highest).unwrap_or(false);
        let mut actions = Vec::new();
        if self.is_auctioneer_deciding() {
            if self.high_bid().is_some() {
                actions.push(ActionKind::AcceptHighestBid);
            } else {
                actions.push(ActionKind::TakeFree);
            }
            if can_raise {
                actions.push(ActionKind::Outbid);
            }
        } else {
            if can_raise {
                actions.push(ActionKind::Offer);
            }
            actions.push(ActionKind::Pass);
        }
        actions
    }

    fn get_bids(&self) -> Vec<Bid> {
        self.history()
            .iter()
            .filter_map(|turn| match turn {
                Turn::Offered(bid) => Some(bid.clone()),
                Turn::Passed(_) => None,
            })
            .collect()
    }

    fn conclude(&self) -> Result<AuctionResult, Errors> {
        match self {
            OneOfferState::Sold { lot, winner, price, .. } => Ok(AuctionResult::new(lot, *winner, *price, AuctionType::OneOffer)),
            _ => Err(Errors::NotReadyToConclude),
        }
    }

    fn summary(&self) -> StatusSummary {
        let lot = self.lot();
        StatusSummary {
            auction_type: AuctionType::OneOffer,
            phase: match self {
                OneOfferState::Bidding { .. } => "Bidding".to_string(),
                OneOfferState::AuctioneerDecision { .. } => "AuctioneerDecision".to_string(),
                OneOfferState::Sold { .. } => "Sold".to_string(),
            },
            auctioneer: lot.auctioneer,
            active: self.is_active(),
            can_conclude: self.can_conclude(),
            current_actor: self.current_actor(),
            high_bid: self.high_bid().cloned(),
            fixed_price: None,
            bids: self.get_bids(),
            cards: lot.cards.clone(),
        }
    }
}
