// src/domain/mod.rs
pub mod auctions;
pub mod bids;
pub mod commands;
pub mod core;
pub mod double;
pub mod events;
pub mod executor;
pub mod fixed_price;
pub mod one_offer;
pub mod open_outcry;
pub mod outcome;
pub mod sealed_bid;
pub mod states;
pub mod table;

use log::{debug, info};
use std::collections::HashMap;
use thiserror::Error;
use crate::money::Bank;

pub use self::auctions::*;
pub use self::bids::*;
pub use self::commands::*;
pub use self::core::*;
pub use self::events::*;
pub use self::executor::{execute, SettlementError};
pub use self::outcome::*;
pub use self::states::*;
pub use self::table::*;

/// One auction at a table together with the players it settles against.
///
/// A player sits at no more than one unsettled session, so the money
/// snapshot each auction takes cannot be spent twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub players: Vec<Player>,
    pub state: AuctionState,
    pub bank: Bank,
    pub log: Vec<RoundEvent>,
    pub result: Option<AuctionResult>,
}

pub type Repository = HashMap<AuctionId, Session>;

/// The unsettled session `player` sits at, if any.
pub fn live_session_of(repository: &Repository, player: PlayerId) -> Option<AuctionId> {
    repository
        .iter()
        .filter(|(_, session)| session.result.is_none())
        .filter(|(_, session)| session.players.iter().any(|p| p.id == player))
        .map(|(id, _)| *id)
        .min()
}

pub fn auctions(repository: &Repository) -> Vec<(AuctionId, StatusSummary)> {
    let mut list: Vec<_> = repository
        .iter()
        .map(|(id, session)| (*id, session.state.summary()))
        .collect();
    list.sort_by_key(|(id, _)| *id);
    list
}

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("Auction error: {0}")]
    AuctionError(#[from] Errors),

    #[error("Settlement error: {0}")]
    SettlementError(#[from] SettlementError),

    #[error("Unknown auction: {0}")]
    UnknownAuction(AuctionId),

    #[error("Auction already exists: {0}")]
    AuctionAlreadyExists(AuctionId),

    #[error("Auction already concluded: {0}")]
    AlreadyConcluded(AuctionId),

    #[error("Player {player} is still at auction {auction_id}")]
    PlayerInLiveAuction {
        player: PlayerId,
        auction_id: AuctionId,
    },
}

pub fn handle(command: Command, mut repository: Repository) -> Result<(CommandSuccess, Repository), HandleError> {
    match command {
        Command::CreateAuction { timestamp, auction_id, card, auctioneer, players, settings } => {
            if repository.contains_key(&auction_id) {
                return Err(HandleError::AuctionAlreadyExists(auction_id));
            }
            for player in &players {
                if let Some(live) = live_session_of(&repository, player.id) {
                    return Err(HandleError::PlayerInLiveAuction { player: player.id, auction_id: live });
                }
            }
            let state = create(card, auctioneer, &players, timestamp, settings)?;
            let status = state.summary();
            info!("auction {} created: {} by player {}", auction_id, status.auction_type, auctioneer);
            repository.insert(auction_id, Session {
                players,
                state,
                bank: Bank::new(),
                log: Vec::new(),
                result: None,
            });
            Ok((CommandSuccess::AuctionCreated { timestamp, auction_id, status }, repository))
        }

        Command::Act { timestamp, auction_id, player, action } => {
            let session = repository
                .get_mut(&auction_id)
                .ok_or(HandleError::UnknownAuction(auction_id))?;
            let next = session.state.apply(player, action.clone(), timestamp)?;
            debug!("auction {}: player {} did {}", auction_id, player, action.kind());
            let status = next.summary();
            session.state = next;
            Ok((CommandSuccess::ActionAccepted { timestamp, auction_id, player, action, status }, repository))
        }

        Command::Tick { timestamp } => {
            let mut closed = Vec::new();
            for (auction_id, session) in repository.iter_mut() {
                if !session.state.is_active() {
                    continue;
                }
                let next = session.state.inc(timestamp);
                if !next.is_active() {
                    debug!("auction {}: countdown elapsed", auction_id);
                    closed.push(*auction_id);
                }
                session.state = next;
            }
            closed.sort();
            Ok((CommandSuccess::Ticked { timestamp, closed }, repository))
        }

        Command::Conclude { timestamp, auction_id } => {
            let session = repository
                .get_mut(&auction_id)
                .ok_or(HandleError::UnknownAuction(auction_id))?;
            if session.result.is_some() {
                return Err(HandleError::AlreadyConcluded(auction_id));
            }
            // An elapsed countdown closes the auction even if no tick ran yet.
            session.state = session.state.inc(timestamp);
            let result = session.state.conclude()?;
            execute(&result, &mut session.players, &mut session.bank, &mut session.log)?;
            info!(
                "auction {} concluded: player {} bought {} card(s) for {}",
                auction_id,
                result.winner,
                result.cards.len(),
                result.sale_price
            );
            session.result = Some(result.clone());
            Ok((CommandSuccess::AuctionConcluded { timestamp, auction_id, result }, repository))
        }
    }
}
