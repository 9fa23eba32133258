#![allow(dead_code)]
use art_auction::domain::{Artist, AuctionType, Card, Lot, Player, PlayerId};
use chrono::{DateTime, Duration, TimeZone, Utc};
// See https://users.rust-lang.org/t/sharing-code-and-macros-in-tests-directory/3098/7

pub fn sample_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2016, 1, 1, 8, 28, 0).unwrap()
}

pub fn seconds_later(seconds: i64) -> DateTime<Utc> {
    sample_now() + Duration::seconds(seconds)
}

pub fn card(id: u32, artist: Artist, auction_type: AuctionType) -> Card {
    Card::new(id, artist, auction_type)
}

pub fn sample_card(auction_type: AuctionType) -> Card {
    card(100, Artist::Yoko, auction_type)
}

pub fn player(id: PlayerId, money: i64) -> Player {
    Player::new(id, format!("Player {}", id), money)
}

/// Four players seated 1, 2, 3, 4 clockwise.
pub fn four_players(money: i64) -> Vec<Player> {
    (1..=4).map(|id| player(id, money)).collect()
}

pub fn players_with_money(money: &[i64]) -> Vec<Player> {
    money
        .iter()
        .enumerate()
        .map(|(i, m)| player(i as PlayerId + 1, *m))
        .collect()
}

pub fn lot_for(auction_type: AuctionType, auctioneer: PlayerId, players: &[Player]) -> Lot {
    Lot::new(vec![sample_card(auction_type)], auctioneer, players).unwrap()
}
