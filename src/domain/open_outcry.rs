// src/domain/open_outcry.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::money::AmountValue;
use super::auctions::AuctionType;
use super::bids::{highest_amount, Bid};
use super::commands::ActionKind;
use super::core::{Errors, PlayerId};
use super::outcome::{AuctionResult, StatusSummary};
use super::states::State;
use super::table::Lot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// If nobody raises the standing bid within this many seconds, the
    /// standing bid wins.
    #[serde(rename = "countdownSecs")]
    pub countdown_secs: i64,
}

impl Options {
    pub fn with_countdown(countdown_secs: i64) -> Self {
        Options { countdown_secs }
    }

    /// The countdown window. Rejects windows that are not positive or
    /// do not fit a `Duration`.
    pub fn time_frame(&self) -> Result<Duration, Errors> {
        if self.countdown_secs <= 0 {
            return Err(Errors::InvalidCountdown(self.countdown_secs));
        }
        Duration::try_seconds(self.countdown_secs).ok_or(Errors::InvalidCountdown(self.countdown_secs))
    }

    /// The deadline for a countdown starting at `from`.
    pub fn deadline_from(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, Errors> {
        from.checked_add_signed(self.time_frame()?)
            .ok_or(Errors::InvalidCountdown(self.countdown_secs))
    }
}

impl Default for Options {
    fn default() -> Self {
        Options { countdown_secs: 10 }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Open|{}", self.countdown_secs)
    }
}

impl FromStr for Options {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != 2 || parts[0] != "Open" {
            return Err(format!("Invalid open auction options format: {}", s));
        }
        let countdown_secs = parts[1].parse::<i64>()
            .map_err(|_| format!("Invalid countdown: {}", parts[1]))?;
        let options = Options { countdown_secs };
        options.time_frame().map_err(|e| e.to_string())?;
        Ok(options)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenOutcryState {
    OnGoing {
        lot: Lot,
        /// Newest first, so the head is the standing bid.
        bids: Vec<Bid>,
        next_expiry: DateTime<Utc>,
        options: Options,
    },
    HasEnded {
        lot: Lot,
        bids: Vec<Bid>,
        expiry: DateTime<Utc>,
    },
}

pub fn empty_state(lot: Lot, now: DateTime<Utc>, options: Options) -> Result<OpenOutcryState, Errors> {
    Ok(OpenOutcryState::OnGoing {
        lot,
        bids: Vec::new(),
        next_expiry: options.deadline_from(now)?,
        options,
    })
}

impl OpenOutcryState {
    pub fn high_bid(&self) -> Option<&Bid> {
        match self {
            OpenOutcryState::OnGoing { bids, .. } | OpenOutcryState::HasEnded { bids, .. } => bids.first(),
        }
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        match self {
            OpenOutcryState::OnGoing { next_expiry, .. } => *next_expiry,
            OpenOutcryState::HasEnded { expiry, .. } => *expiry,
        }
    }

    /// Whether the countdown has run out at `now`, without changing state.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            OpenOutcryState::OnGoing { next_expiry, .. } => now >= *next_expiry,
            OpenOutcryState::HasEnded { .. } => true,
        }
    }

    pub fn place_bid(&self, player: PlayerId, amount: AmountValue, at: DateTime<Utc>) -> Result<Self, Errors> {
        match self.inc(at) {
            OpenOutcryState::HasEnded { .. } => Err(Errors::AuctionHasEnded),
            OpenOutcryState::OnGoing { lot, bids, options, .. } => {
                lot.table.ensure_seated(player)?;
                if amount <= 0 {
                    return Err(Errors::InvalidAmount(amount));
                }
                if let Some(leader) = bids.first() {
                    if leader.bidder == player {
                        return Err(Errors::AlreadyLeading(player));
                    }
                }
                let highest = highest_amount(bids.first());
                if amount <= highest {
                    return Err(Errors::MustPlaceBidOverHighestBid(highest));
                }
                lot.table.ensure_affordable(player, amount)?;
                let next_expiry = options.deadline_from(at)?;

                let mut new_bids = bids;
                new_bids.insert(0, Bid::timed(player, amount, at));
                Ok(OpenOutcryState::OnGoing {
                    lot,
                    bids: new_bids,
                    next_expiry,
                    options,
                })
            }
        }
    }

    /// Staying silent. Nothing changes besides the clock.
    pub fn pass(&self, player: PlayerId, at: DateTime<Utc>) -> Result<Self, Errors> {
        let next = self.inc(at);
        match &next {
            OpenOutcryState::HasEnded { .. } => Err(Errors::AuctionHasEnded),
            OpenOutcryState::OnGoing { lot, .. } => {
                lot.table.ensure_seated(player)?;
                Ok(next)
            }
        }
    }
}

impl State for OpenOutcryState {
    fn inc(&self, now: DateTime<Utc>) -> Self {
        match self {
            OpenOutcryState::OnGoing { lot, bids, next_expiry, .. } if now >= *next_expiry => {
                // OnGoing -> HasEnded
                OpenOutcryState::HasEnded {
                    lot: lot.clone(),
                    bids: bids.clone(),
                    expiry: *next_expiry,
                }
            }
            _ => self.clone(),
        }
    }

    fn lot(&self) -> &Lot {
        match self {
            OpenOutcryState::OnGoing { lot, .. } | OpenOutcryState::HasEnded { lot, .. } => lot,
        }
    }

    fn is_active(&self) -> bool {
        matches!(self, OpenOutcryState::OnGoing { .. })
    }

    fn can_conclude(&self) -> bool {
        !self.is_active()
    }

    fn current_actor(&self) -> Option<PlayerId> {
        None
    }

    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        let lot = self.lot();
        if !self.is_active() || lot.table.ensure_seated(player).is_err() {
            return Vec::new();
        }
        let leading = self.high_bid().map(|b| b.bidder == player).unwrap_or(false);
        let can_raise = lot
            .table
            .funds(player)
            .map(|money| money > highest_amount(self.high_bid()))
            .unwrap_or(false);
        if !leading && can_raise {
            vec![ActionKind::Bid, ActionKind::Pass]
        } else {
            vec![ActionKind::Pass]
        }
    }

    fn get_bids(&self) -> Vec<Bid> {
        match self {
            OpenOutcryState::OnGoing { bids, .. } | OpenOutcryState::HasEnded { bids, .. } => bids.clone(),
        }
    }

    fn conclude(&self) -> Result<AuctionResult, Errors> {
        match self {
            OpenOutcryState::OnGoing { .. } => Err(Errors::NotReadyToConclude),
            OpenOutcryState::HasEnded { lot, bids, .. } => Ok(match bids.first() {
                Some(bid) => AuctionResult::new(lot, bid.bidder, bid.amount, AuctionType::Open),
                None => AuctionResult::taken_free(lot, AuctionType::Open),
            }),
        }
    }

    fn summary(&self) -> StatusSummary {
        let lot = self.lot();
        StatusSummary {
            auction_type: AuctionType::Open,
            phase: match self {
                OpenOutcryState::OnGoing { .. } => "OnGoing".to_string(),
                OpenOutcryState::HasEnded { .. } => "HasEnded".to_string(),
            },
            auctioneer: lot.auctioneer,
            active: self.is_active(),
            can_conclude: self.can_conclude(),
            current_actor: None,
            high_bid: self.high_bid().cloned(),
            fixed_price: None,
            bids: self.get_bids(),
            cards: lot.cards.clone(),
        }
    }
}
