use art_auction::domain::{execute, AuctionResult, AuctionType, Lot, RoundEvent, SettlementError};
use art_auction::money::{Bank, Ledger, MoneyError};
#[path="utils/mod.rs"] mod utils;
use utils::*;

fn sold_card() -> art_auction::domain::Card {
    sample_card(AuctionType::FixedPrice)
}

fn table() -> Vec<art_auction::domain::Player> {
    vec![
        player(1, 100).with_hand(vec![sold_card()]),
        player(2, 100),
        player(3, 100),
        player(4, 100),
    ]
}

fn result_for(players: &[art_auction::domain::Player], winner: u32, price: i64) -> AuctionResult {
    let lot = Lot::new(vec![sold_card()], 1, players).unwrap();
    AuctionResult::new(&lot, winner, price, AuctionType::FixedPrice)
}

#[test]
fn test_winner_pays_auctioneer_and_receives_card() {
    let mut players = table();
    let result = result_for(&players, 4, 30);
    let mut bank = Bank::new();
    let mut log: Vec<RoundEvent> = Vec::new();

    let event = execute(&result, &mut players, &mut bank, &mut log).unwrap();

    assert_eq!(players[0].money, 130);
    assert_eq!(players[3].money, 70);
    assert!(players[0].hand.is_empty());
    assert_eq!(players[3].purchases, vec![sold_card()]);
    assert_eq!(bank.collected, 0);
    assert_eq!(
        event,
        RoundEvent::AuctionWon {
            winner_index: 3,
            winner: 4,
            auctioneer: 1,
            amount: 30,
            cards: vec![sold_card()],
            auction_type: AuctionType::FixedPrice,
        }
    );
    assert_eq!(log, vec![event]);
}

#[test]
fn test_auctioneer_buying_own_card_pays_bank() {
    let mut players = table();
    let result = result_for(&players, 1, 30);
    assert!(result.winner_is_auctioneer());
    let mut bank = Bank::new();
    let mut log: Vec<RoundEvent> = Vec::new();

    execute(&result, &mut players, &mut bank, &mut log).unwrap();

    assert_eq!(players[0].money, 70);
    assert_eq!(bank.collected, 30);
    assert_eq!(players[0].purchases.len(), 1);
    assert!(players[1..].iter().all(|p| p.money == 100));
}

#[test]
fn test_rejected_payment_leaves_everything_untouched() {
    let mut players = table();
    let result = result_for(&players, 2, 30);
    players[1].money = 10;
    let before = players.clone();
    let mut bank = Bank::new();
    let mut log: Vec<RoundEvent> = Vec::new();

    let err = execute(&result, &mut players, &mut bank, &mut log).unwrap_err();

    assert_eq!(
        err,
        SettlementError::Money(MoneyError::InsufficientFunds { player: 2, amount: 30, available: 10 })
    );
    assert_eq!(players, before);
    assert!(log.is_empty());
}

#[test]
fn test_settling_for_missing_player_fails() {
    let mut players = table();
    let result = result_for(&players, 4, 30);
    players.truncate(3);
    let mut bank = Bank::new();
    let mut log: Vec<RoundEvent> = Vec::new();

    assert_eq!(
        execute(&result, &mut players, &mut bank, &mut log),
        Err(SettlementError::UnknownPlayer(4))
    );
}

#[test]
fn test_bank_rejects_negative_and_self_transfers() {
    let mut bank = Bank::new();
    let mut a = player(1, 50);
    let mut b = player(2, 50);
    let mut a_again = player(1, 50);

    assert_eq!(bank.transfer_money(&mut a, &mut b, -1), Err(MoneyError::NegativeAmount(-1)));
    assert_eq!(bank.pay_to_bank(&mut a, -5), Err(MoneyError::NegativeAmount(-5)));
    assert_eq!(bank.transfer_money(&mut a, &mut a_again, 10), Err(MoneyError::SelfTransfer(1)));
    assert_eq!((a.money, b.money, bank.collected), (50, 50, 0));

    bank.transfer_money(&mut a, &mut b, 50).unwrap();
    assert_eq!((a.money, b.money), (0, 100));
}
