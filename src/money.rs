// src/money.rs
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::domain::core::{Player, PlayerId};

pub type AmountValue = i64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Cannot move a negative amount: {0}")]
    NegativeAmount(AmountValue),

    #[error("Player {player} cannot pay {amount}, has {available}")]
    InsufficientFunds {
        player: PlayerId,
        amount: AmountValue,
        available: AmountValue,
    },

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} cannot transfer money to themselves")]
    SelfTransfer(PlayerId),
}

/// The money ledger used by settlement.
///
/// Both operations reject negative or unaffordable amounts and leave the
/// players untouched when they do.
pub trait Ledger {
    fn transfer_money(&mut self, from: &mut Player, to: &mut Player, amount: AmountValue) -> Result<(), MoneyError>;
    fn pay_to_bank(&mut self, from: &mut Player, amount: AmountValue) -> Result<(), MoneyError>;
}

fn check_payment(from: &Player, amount: AmountValue) -> Result<(), MoneyError> {
    if amount < 0 {
        return Err(MoneyError::NegativeAmount(amount));
    }
    if from.money < amount {
        return Err(MoneyError::InsufficientFunds {
            player: from.id,
            amount,
            available: from.money,
        });
    }
    Ok(())
}

/// Shared bank that absorbs payments made by an auctioneer buying their own card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub collected: AmountValue,
}

impl Bank {
    pub fn new() -> Self {
        Bank { collected: 0 }
    }
}

impl Ledger for Bank {
    fn transfer_money(&mut self, from: &mut Player, to: &mut Player, amount: AmountValue) -> Result<(), MoneyError> {
        if from.id == to.id {
            return Err(MoneyError::SelfTransfer(from.id));
        }
        check_payment(from, amount)?;
        from.money -= amount;
        to.money += amount;
        Ok(())
    }

    fn pay_to_bank(&mut self, from: &mut Player, amount: AmountValue) -> Result<(), MoneyError> {
        check_payment(from, amount)?;
        from.money -= amount;
        self.collected += amount;
        Ok(())
    }
}
