// src/domain/sealed_bid.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::money::AmountValue;
use super::auctions::AuctionType;
use super::bids::Bid;
use super::commands::ActionKind;
use super::core::{Errors, PlayerId};
use super::outcome::{AuctionResult, StatusSummary};
use super::states::State;
use super::table::Lot;

/// Every player, the auctioneer included, submits one hidden bid. A bid of 0
/// means abstaining. Once everyone has submitted the bids can be revealed;
/// the highest bid wins and ties go to whoever comes first in tie-break order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SealedBidState {
    AcceptingBids {
        lot: Lot,
        /// The auctioneer first, then clockwise.
        tie_break_order: Vec<PlayerId>,
        bids: BTreeMap<PlayerId, AmountValue>,
    },
    Revealed {
        lot: Lot,
        tie_break_order: Vec<PlayerId>,
        bids: BTreeMap<PlayerId, AmountValue>,
    },
}

pub fn empty_state(lot: Lot) -> SealedBidState {
    let tie_break_order = lot.table.auctioneer_first(lot.auctioneer);
    SealedBidState::AcceptingBids {
        lot,
        tie_break_order,
        bids: BTreeMap::new(),
    }
}

impl SealedBidState {
    pub fn tie_break_order(&self) -> &[PlayerId] {
        match self {
            SealedBidState::AcceptingBids { tie_break_order, .. }
            | SealedBidState::Revealed { tie_break_order, .. } => tie_break_order,
        }
    }

    fn bids(&self) -> &BTreeMap<PlayerId, AmountValue> {
        match self {
            SealedBidState::AcceptingBids { bids, .. } | SealedBidState::Revealed { bids, .. } => bids,
        }
    }

    pub fn has_submitted(&self, player: PlayerId) -> bool {
        self.bids().contains_key(&player)
    }

    /// Players who still have to submit, in tie-break order.
    pub fn outstanding(&self) -> Vec<PlayerId> {
        let bids = self.bids();
        self.tie_break_order()
            .iter()
            .copied()
            .filter(|p| !bids.contains_key(p))
            .collect()
    }

    pub fn is_ready_to_reveal(&self) -> bool {
        matches!(self, SealedBidState::AcceptingBids { .. }) && self.outstanding().is_empty()
    }

    pub fn is_revealed(&self) -> bool {
        matches!(self, SealedBidState::Revealed { .. })
    }

    pub fn submit_bid(&self, player: PlayerId, amount: AmountValue) -> Result<Self, Errors> {
        match self {
            SealedBidState::Revealed { .. } => Err(Errors::BidsAlreadyRevealed),
            SealedBidState::AcceptingBids { lot, tie_break_order, bids } => {
                lot.table.ensure_seated(player)?;
                if bids.contains_key(&player) {
                    return Err(Errors::AlreadyPlacedBid);
                }
                if amount < 0 {
                    return Err(Errors::InvalidAmount(amount));
                }
                lot.table.ensure_affordable(player, amount)?;

                let mut new_bids = bids.clone();
                new_bids.insert(player, amount);
                Ok(SealedBidState::AcceptingBids {
                    lot: lot.clone(),
                    tie_break_order: tie_break_order.clone(),
                    bids: new_bids,
                })
            }
        }
    }

    /// Makes the stored bids visible. The bids themselves are untouched.
    pub fn reveal_bids(&self) -> Result<Self, Errors> {
        match self {
            SealedBidState::Revealed { .. } => Err(Errors::BidsAlreadyRevealed),
            SealedBidState::AcceptingBids { lot, tie_break_order, bids } => {
                let outstanding = self.outstanding();
                if !outstanding.is_empty() {
                    return Err(Errors::AwaitingBids(outstanding));
                }
                Ok(SealedBidState::Revealed {
                    lot: lot.clone(),
                    tie_break_order: tie_break_order.clone(),
                    bids: bids.clone(),
                })
            }
        }
    }

    /// The winning bid: highest amount, earliest in tie-break order.
    pub fn winning_bid(&self) -> Option<Bid> {
        let bids = self.bids();
        let max = bids.values().copied().max()?;
        self.tie_break_order()
            .iter()
            .find(|p| bids.get(*p) == Some(&max))
            .map(|p| Bid::new(*p, max))
    }
}

impl State for SealedBidState {
    fn inc(&self, _now: DateTime<Utc>) -> Self {
        self.clone()
    }

    fn lot(&self) -> &Lot {
        match self {
            SealedBidState::AcceptingBids { lot, .. } | SealedBidState::Revealed { lot, .. } => lot,
        }
    }

    fn is_active(&self) -> bool {
        !self.is_revealed()
    }

    fn can_conclude(&self) -> bool {
        self.is_revealed()
    }

    fn current_actor(&self) -> Option<PlayerId> {
        None
    }

    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        if self.is_revealed() || self.lot().table.ensure_seated(player).is_err() {
            return Vec::new();
        }
        if self.is_ready_to_reveal() {
            vec![ActionKind::Reveal]
        } else if self.has_submitted(player) {
            Vec::new()
        } else {
            vec![ActionKind::SubmitSealedBid]
        }
    }

    fn get_bids(&self) -> Vec<Bid> {
        match self {
            SealedBidState::AcceptingBids { .. } => Vec::new(),
            SealedBidState::Revealed { tie_break_order, bids, .. } => tie_break_order
                .iter()
                .filter_map(|p| bids.get(p).map(|amount| Bid::new(*p, *amount)))
                .collect(),
        }
    }

    fn conclude(&self) -> Result<AuctionResult, Errors> {
        match self {
            SealedBidState::AcceptingBids { .. } => Err(Errors::NotReadyToConclude),
            SealedBidState::Revealed { lot, .. } => Ok(match self.winning_bid() {
                Some(bid) if bid.amount > 0 => AuctionResult::new(lot, bid.bidder, bid.amount, AuctionType::Hidden),
                _ => AuctionResult::taken_free(lot, AuctionType::Hidden),
            }),
        }
    }

    fn summary(&self) -> StatusSummary {
        let lot = self.lot();
        StatusSummary {
            auction_type: AuctionType::Hidden,
            phase: if self.is_revealed() {
                "Revealed".to_string()
            } else if self.is_ready_to_reveal() {
                "ReadyToReveal".to_string()
            } else {
                "AcceptingBids".to_string()
            },
            auctioneer: lot.auctioneer,
            active: self.is_active(),
            can_conclude: self.can_conclude(),
            current_actor: None,
            high_bid: if self.is_revealed() { self.winning_bid() } else { None },
            fixed_price: None,
            bids: self.get_bids(),
            cards: lot.cards.clone(),
        }
    }
}
