// src/domain/states.rs
use chrono::{DateTime, Utc};
use super::bids::Bid;
use super::commands::ActionKind;
use super::core::{Errors, PlayerId};
use super::outcome::{AuctionResult, StatusSummary};
use super::table::Lot;

/// Queries shared by every auction mechanism.
///
/// Mutating operations are inherent methods on each state so that only the
/// mechanism that supports an action exposes it.
pub trait State {
    /// Advance the state to `now`. Only clock-driven mechanisms change.
    fn inc(&self, now: DateTime<Utc>) -> Self where Self: Sized;
    fn lot(&self) -> &Lot;
    /// Whether any further action can succeed.
    fn is_active(&self) -> bool;
    fn can_conclude(&self) -> bool;
    fn current_actor(&self) -> Option<PlayerId>;
    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind>;
    /// Bids visible to every player.
    fn get_bids(&self) -> Vec<Bid>;
    fn conclude(&self) -> Result<AuctionResult, Errors>;
    fn summary(&self) -> StatusSummary;
}
