// src/domain/executor.rs
use log::debug;
use thiserror::Error;
use crate::money::{Ledger, MoneyError};
use super::core::{Player, PlayerId};
use super::events::{RoundEvent, RoundLog};
use super::outcome::AuctionResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    #[error("Player {0} is not at the table")]
    UnknownPlayer(PlayerId),
}

fn index_of(players: &[Player], player: PlayerId) -> Result<usize, SettlementError> {
    players
        .iter()
        .position(|p| p.id == player)
        .ok_or(SettlementError::UnknownPlayer(player))
}

fn pair_mut(players: &mut [Player], a: usize, b: usize) -> (&mut Player, &mut Player) {
    if a < b {
        let (left, right) = players.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = players.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// Applies a concluded auction: the winner pays, the cards change hands and
/// the sale is logged.
///
/// A winner who is also the auctioneer pays the bank. If the payment is
/// rejected nothing else is touched.
pub fn execute<L, R>(
    result: &AuctionResult,
    players: &mut [Player],
    ledger: &mut L,
    log: &mut R,
) -> Result<RoundEvent, SettlementError>
where
    L: Ledger,
    R: RoundLog,
{
    let winner_index = index_of(players, result.winner)?;
    let auctioneer_index = index_of(players, result.auctioneer)?;

    if winner_index == auctioneer_index {
        ledger.pay_to_bank(&mut players[winner_index], result.sale_price)?;
        debug!("player {} paid {} to the bank", result.winner, result.sale_price);
    } else {
        let (winner, auctioneer) = pair_mut(players, winner_index, auctioneer_index);
        ledger.transfer_money(winner, auctioneer, result.sale_price)?;
        debug!("player {} paid {} to player {}", result.winner, result.sale_price, result.auctioneer);
    }

    for player in players.iter_mut() {
        player.hand.retain(|card| !result.cards.iter().any(|sold| sold.id == card.id));
    }
    players[winner_index].purchases.extend(result.cards.iter().cloned());

    let event = RoundEvent::AuctionWon {
        winner_index,
        winner: result.winner,
        auctioneer: result.auctioneer,
        amount: result.sale_price,
        cards: result.cards.clone(),
        auction_type: result.auction_type,
    };
    log.append(event.clone());
    Ok(event)
}
