// src/domain/double.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::auctions::{empty_state_for, AuctionState, AuctionType};
use super::bids::Bid;
use super::commands::ActionKind;
use super::core::{CardId, Errors, PlayerId};
use super::open_outcry::Options as OpenOptions;
use super::outcome::{AuctionResult, StatusSummary};
use super::states::State;
use super::table::Lot;

/// A double card is sold together with a second card of the same artist.
///
/// Starting with the auctioneer and going clockwise, each player may offer
/// the second card or decline. Whoever offers it runs the auction for the
/// pair, using the second card's mechanism, and collects the payment. If
/// everyone declines, the auctioneer keeps the double card for free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoubleState {
    AwaitingSecondCard {
        lot: Lot,
        offer_order: Vec<PlayerId>,
        turn_index: usize,
        declined: Vec<PlayerId>,
        options: OpenOptions,
    },
    Embedded {
        original_auctioneer: PlayerId,
        auction: Box<AuctionState>,
    },
    TakenFree {
        lot: Lot,
    },
}

pub fn empty_state(lot: Lot, options: OpenOptions) -> DoubleState {
    let offer_order = lot.table.auctioneer_first(lot.auctioneer);
    DoubleState::AwaitingSecondCard {
        lot,
        offer_order,
        turn_index: 0,
        declined: Vec::new(),
        options,
    }
}

impl DoubleState {
    pub fn embedded(&self) -> Option<&AuctionState> {
        match self {
            DoubleState::Embedded { auction, .. } => Some(auction.as_ref()),
            _ => None,
        }
    }

    fn offer_turn(&self, player: PlayerId) -> Result<(&Lot, &[PlayerId], usize, &[PlayerId], OpenOptions), Errors> {
        match self {
            DoubleState::TakenFree { .. } => Err(Errors::AuctionHasEnded),
            DoubleState::Embedded { .. } => Err(Errors::SecondCardAlreadyOffered),
            DoubleState::AwaitingSecondCard { lot, offer_order, turn_index, declined, options } => {
                if declined.contains(&player) {
                    return Err(Errors::AlreadyPassed(player));
                }
                let current = offer_order[*turn_index];
                if player != current {
                    lot.table.ensure_seated(player)?;
                    return Err(Errors::NotYourTurn { player, expected: Some(current) });
                }
                Ok((lot, offer_order.as_slice(), *turn_index, declined.as_slice(), *options))
            }
        }
    }

    /// Offer a second card of the same artist, named by id. The card is
    /// taken from the player's hand as dealt and must not be another double.
    pub fn offer_second_card(&self, player: PlayerId, card: CardId, now: DateTime<Utc>) -> Result<Self, Errors> {
        let (lot, _, _, _, options) = self.offer_turn(player)?;
        let double = &lot.cards[0];
        let card = lot
            .table
            .held_card(player, card)
            .cloned()
            .ok_or(Errors::CardNotInHand { player, card })?;
        if card.artist != double.artist {
            return Err(Errors::ArtistMismatch {
                card: card.id,
                expected: double.artist,
                found: card.artist,
            });
        }
        if card.auction_type == AuctionType::Double || card.id == double.id {
            return Err(Errors::IneligibleCard(card.id));
        }
        let package = Lot::at_table(vec![double.clone(), card], player, lot.table.clone())?;
        let auction = empty_state_for(package, now, options)?;
        Ok(DoubleState::Embedded {
            original_auctioneer: lot.auctioneer,
            auction: Box::new(auction),
        })
    }

    pub fn decline(&self, player: PlayerId) -> Result<Self, Errors> {
        let (lot, offer_order, turn_index, declined, options) = self.offer_turn(player)?;
        let mut declined = declined.to_vec();
        declined.push(player);
        let next_index = turn_index + 1;
        if next_index >= offer_order.len() {
            return Ok(DoubleState::TakenFree { lot: lot.clone() });
        }
        Ok(DoubleState::AwaitingSecondCard {
            lot: lot.clone(),
            offer_order: offer_order.to_vec(),
            turn_index: next_index,
            declined,
            options,
        })
    }

    /// Hands an action over to the embedded auction for the pair.
    pub fn apply_embedded<F>(&self, f: F) -> Result<Self, Errors>
    where
        F: FnOnce(&AuctionState) -> Result<AuctionState, Errors>,
    {
        match self {
            DoubleState::AwaitingSecondCard { .. } => Err(Errors::SecondCardPending),
            DoubleState::TakenFree { .. } => Err(Errors::AuctionHasEnded),
            DoubleState::Embedded { original_auctioneer, auction } => Ok(DoubleState::Embedded {
                original_auctioneer: *original_auctioneer,
                auction: Box::new(f(auction.as_ref())?),
            }),
        }
    }
}

impl State for DoubleState {
    fn inc(&self, now: DateTime<Utc>) -> Self {
        match self {
            DoubleState::Embedded { original_auctioneer, auction } => DoubleState::Embedded {
                original_auctioneer: *original_auctioneer,
                auction: Box::new(auction.inc(now)),
            },
            _ => self.clone(),
        }
    }

    fn lot(&self) -> &Lot {
        match self {
            DoubleState::AwaitingSecondCard { lot, .. } | DoubleState::TakenFree { lot } => lot,
            DoubleState::Embedded { auction, .. } => auction.lot(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            DoubleState::AwaitingSecondCard { .. } => true,
            DoubleState::Embedded { auction, .. } => auction.is_active(),
            DoubleState::TakenFree { .. } => false,
        }
    }

    fn can_conclude(&self) -> bool {
        match self {
            DoubleState::AwaitingSecondCard { .. } => false,
            DoubleState::Embedded { auction, .. } => auction.can_conclude(),
            DoubleState::TakenFree { .. } => true,
        }
    }

    fn current_actor(&self) -> Option<PlayerId> {
        match self {
            DoubleState::AwaitingSecondCard { offer_order, turn_index, .. } => Some(offer_order[*turn_index]),
            DoubleState::Embedded { auction, .. } => auction.current_actor(),
            DoubleState::TakenFree { .. } => None,
        }
    }

    fn valid_actions(&self, player: PlayerId) -> Vec<ActionKind> {
        match self {
            DoubleState::AwaitingSecondCard { .. } if self.current_actor() == Some(player) => {
                vec![ActionKind::OfferSecondCard, ActionKind::DeclineSecondCard]
            }
            DoubleState::Embedded { auction, .. } => auction.valid_actions(player),
            _ => Vec::new(),
        }
    }

    fn get_bids(&self) -> Vec<Bid> {
        self.embedded().map(|a| a.get_bids()).unwrap_or_default()
    }

    fn conclude(&self) -> Result<AuctionResult, Errors> {
        match self {
            DoubleState::AwaitingSecondCard { .. } => Err(Errors::NotReadyToConclude),
            DoubleState::TakenFree { lot } => Ok(AuctionResult::taken_free(lot, AuctionType::Double)),
            DoubleState::Embedded { auction, .. } => {
                let mut result = auction.conclude()?;
                result.auction_type = AuctionType::Double;
                Ok(result)
            }
        }
    }

    fn summary(&self) -> StatusSummary {
        match self {
            DoubleState::Embedded { auction, .. } => {
                let mut summary = auction.summary();
                summary.phase = format!("{}:{}", summary.auction_type, summary.phase);
                summary.auction_type = AuctionType::Double;
                summary
            }
            _ => {
                let lot = self.lot();
                StatusSummary {
                    auction_type: AuctionType::Double,
                    phase: match self {
                        DoubleState::TakenFree { .. } => "TakenFree".to_string(),
                        _ => "AwaitingSecondCard".to_string(),
                    },
                    auctioneer: lot.auctioneer,
                    active: self.is_active(),
                    can_conclude: self.can_conclude(),
                    current_actor: self.current_actor(),
                    high_bid: None,
                    fixed_price: None,
                    bids: Vec::new(),
                    cards: lot.cards.clone(),
                }
            }
        }
    }
}
