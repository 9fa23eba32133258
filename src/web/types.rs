use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::domain::{
    ActionKind, AuctionId, AuctionResult, AuctionSettings, Card, Command, Player, PlayerId, Repository,
    RoundEvent, StatusSummary,
};
use crate::domain::open_outcry::Options as OpenOptions;
use crate::money::AmountValue;

pub type AppState = Arc<Mutex<Repository>>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddAuctionRequest {
    pub card: Card,
    pub auctioneer: PlayerId,
    pub players: Vec<Player>,
    #[serde(rename = "fixedPrice", default)]
    pub fixed_price: Option<AmountValue>,
    #[serde(rename = "countdownSecs", default)]
    pub countdown_secs: Option<i64>,
}

impl AddAuctionRequest {
    pub fn to_command(&self, auction_id: AuctionId, now: DateTime<Utc>, default_countdown_secs: i64) -> Command {
        let countdown_secs = self.countdown_secs.unwrap_or(default_countdown_secs);
        Command::CreateAuction {
            timestamp: now,
            auction_id,
            card: self.card.clone(),
            auctioneer: self.auctioneer,
            players: self.players.clone(),
            settings: AuctionSettings {
                open: OpenOptions::with_countdown(countdown_secs),
                fixed_price: self.fixed_price,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuctionItem {
    pub id: AuctionId,
    pub status: StatusSummary,
}

impl From<(AuctionId, StatusSummary)> for AuctionItem {
    fn from((id, status): (AuctionId, StatusSummary)) -> Self {
        AuctionItem { id, status }
    }
}

#[derive(Debug, Serialize)]
pub struct AuctionDetail {
    pub id: AuctionId,
    pub status: StatusSummary,
    pub players: Vec<Player>,
    /// What the authenticated caller may do right now.
    #[serde(rename = "validActions")]
    pub valid_actions: Vec<ActionKind>,
    pub result: Option<AuctionResult>,
    pub log: Vec<RoundEvent>,
}

#[derive(Debug, Serialize)]
pub struct ConcludeResponse {
    pub result: AuctionResult,
    pub players: Vec<Player>,
}
