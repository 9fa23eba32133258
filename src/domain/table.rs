// src/domain/table.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::money::AmountValue;
use super::core::{Card, CardId, Errors, Player, PlayerId};

/// What a player brings to the table when an auction starts.
///
/// Money does not change while an auction is live, so affordability is
/// checked against this snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub money: AmountValue,
    pub hand: Vec<Card>,
}

/// Seats in clockwise order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    seats: Vec<Seat>,
}

impl Table {
    pub fn from_players(players: &[Player]) -> Result<Self, Errors> {
        if players.len() < 2 {
            return Err(Errors::InvalidTable(format!(
                "an auction needs at least 2 players, got {}",
                players.len()
            )));
        }
        let mut seen = BTreeSet::new();
        for player in players {
            if !seen.insert(player.id) {
                return Err(Errors::InvalidTable(format!("player {} is seated twice", player.id)));
            }
            if player.money < 0 {
                return Err(Errors::InvalidTable(format!("player {} has negative money", player.id)));
            }
        }
        let seats = players
            .iter()
            .map(|p| Seat {
                player: p.id,
                money: p.money,
                hand: p.hand.clone(),
            })
            .collect();
        Ok(Table { seats })
    }

    pub fn seat_index(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player == player)
    }

    pub fn ensure_seated(&self, player: PlayerId) -> Result<(), Errors> {
        self.seat_index(player)
            .map(|_| ())
            .ok_or(Errors::UnknownPlayer(player))
    }

    pub fn funds(&self, player: PlayerId) -> Result<AmountValue, Errors> {
        self.seats
            .iter()
            .find(|s| s.player == player)
            .map(|s| s.money)
            .ok_or(Errors::UnknownPlayer(player))
    }

    pub fn ensure_affordable(&self, player: PlayerId, amount: AmountValue) -> Result<(), Errors> {
        let available = self.funds(player)?;
        if amount > available {
            return Err(Errors::InsufficientFunds { player, amount, available });
        }
        Ok(())
    }

    /// The card as dealt, if `player` holds it.
    pub fn held_card(&self, player: PlayerId, card: CardId) -> Option<&Card> {
        self.seats
            .iter()
            .find(|s| s.player == player)
            .and_then(|s| s.hand.iter().find(|c| c.id == card))
    }

    /// Every other player, walking clockwise from the seat after `player`.
    pub fn clockwise_after(&self, player: PlayerId) -> Vec<PlayerId> {
        let start = self.seat_index(player).unwrap_or(0);
        (1..self.seats.len())
            .map(|offset| self.seats[(start + offset) % self.seats.len()].player)
            .collect()
    }

    /// Players left of the auctioneer in turn, with the auctioneer deciding last.
    pub fn auctioneer_last(&self, auctioneer: PlayerId) -> Vec<PlayerId> {
        let mut order = self.clockwise_after(auctioneer);
        order.push(auctioneer);
        order
    }

    /// The auctioneer first, then clockwise through the other seats.
    pub fn auctioneer_first(&self, auctioneer: PlayerId) -> Vec<PlayerId> {
        let mut order = vec![auctioneer];
        order.extend(self.clockwise_after(auctioneer));
        order
    }
}

/// The cards on offer, who offers them and who is sitting at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub cards: Vec<Card>,
    pub auctioneer: PlayerId,
    pub table: Table,
}

impl Lot {
    pub fn new(cards: Vec<Card>, auctioneer: PlayerId, players: &[Player]) -> Result<Self, Errors> {
        let table = Table::from_players(players)?;
        Lot::at_table(cards, auctioneer, table)
    }

    pub fn at_table(cards: Vec<Card>, auctioneer: PlayerId, table: Table) -> Result<Self, Errors> {
        table.ensure_seated(auctioneer)?;
        if cards.is_empty() {
            return Err(Errors::InvalidTable("nothing to auction".to_string()));
        }
        Ok(Lot { cards, auctioneer, table })
    }

    /// The card whose auction type decides the mechanism.
    pub fn lead_card(&self) -> &Card {
        &self.cards[self.cards.len() - 1]
    }
}
