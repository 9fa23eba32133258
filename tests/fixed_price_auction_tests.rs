use art_auction::domain::{
    fixed_price::{self, FixedPriceState},
    ActionKind, AuctionType, ErrorKind, Errors, State,
};
#[path="utils/mod.rs"] mod utils;
use utils::*;

fn priced_auction(price: i64) -> FixedPriceState {
    let lot = lot_for(AuctionType::FixedPrice, 1, &players_with_money(&[100, 50, 50, 50]));
    fixed_price::create_with_price(lot, price).unwrap()
}

#[test]
fn test_first_player_willing_to_pay_buys() {
    let state = priced_auction(30)
        .pass(2).unwrap()
        .pass(3).unwrap()
        .buy_at_price(4).unwrap();

    assert!(!state.is_active());
    assert!(!state.was_forced());
    assert_eq!(state.passed(), &[2, 3]);
    let result = state.conclude().unwrap();
    assert_eq!(result.winner, 4);
    assert_eq!(result.sale_price, 30);
    assert_eq!(result.profit, 30);
    assert_eq!(result.auction_type, AuctionType::FixedPrice);
}

#[test]
fn test_auctioneer_buys_when_everyone_passes() {
    let state = priced_auction(30)
        .pass(2).unwrap()
        .pass(3).unwrap()
        .pass(4).unwrap();

    assert!(state.was_forced());
    let result = state.conclude().unwrap();
    assert_eq!(result.winner, 1);
    assert_eq!(result.sale_price, 30);
    assert_eq!(result.profit, 0);
}

#[test]
fn test_auctioneer_sets_price_before_offering() {
    let lot = lot_for(AuctionType::FixedPrice, 1, &players_with_money(&[100, 50, 50, 50]));
    let state = fixed_price::empty_state(lot);
    assert_eq!(state.current_actor(), Some(1));
    assert_eq!(state.valid_actions(1), vec![ActionKind::SetPrice]);
    assert_eq!(state.buy_at_price(2), Err(Errors::PriceNotSet));
    assert_eq!(state.conclude(), Err(Errors::NotReadyToConclude));

    assert_eq!(
        state.set_price(2, 10),
        Err(Errors::NotYourTurn { player: 2, expected: Some(1) })
    );
    assert_eq!(state.set_price(1, -5), Err(Errors::InvalidAmount(-5)));

    let offering = state.set_price(1, 40).unwrap();
    assert_eq!(offering.price(), Some(40));
    assert_eq!(offering.current_actor(), Some(2));
    assert_eq!(offering.set_price(1, 50).unwrap_err().kind(), ErrorKind::StaleState);
}

#[test]
fn test_auctioneer_cannot_ask_more_than_they_hold() {
    let lot = lot_for(AuctionType::FixedPrice, 1, &players_with_money(&[100, 50, 50, 50]));
    assert_eq!(
        fixed_price::create_with_price(lot, 101),
        Err(Errors::InsufficientFunds { player: 1, amount: 101, available: 100 })
    );
}

#[test]
fn test_offers_go_clockwise_from_auctioneer() {
    let state = priced_auction(30);
    let err = state.buy_at_price(3).unwrap_err();
    assert_eq!(err, Errors::NotYourTurn { player: 3, expected: Some(2) });
    assert_eq!(state.buy_at_price(1).unwrap_err().kind(), ErrorKind::TurnViolation);
}

#[test]
fn test_players_who_passed_cannot_pass_again() {
    let state = priced_auction(30).pass(2).unwrap();
    let err = state.pass(2).unwrap_err();
    assert_eq!(err, Errors::AlreadyPassed(2));
    assert_eq!(err.kind(), ErrorKind::DuplicateAction);
    assert_eq!(state.buy_at_price(2), Err(Errors::AlreadyPassed(2)));
}

#[test]
fn test_buyer_must_afford_the_price() {
    let state = priced_auction(60);
    assert_eq!(
        state.buy_at_price(2),
        Err(Errors::InsufficientFunds { player: 2, amount: 60, available: 50 })
    );
    assert_eq!(state.valid_actions(2), vec![ActionKind::Pass]);
}

#[test]
fn test_zero_price_is_allowed() {
    let result = priced_auction(0).buy_at_price(2).unwrap().conclude().unwrap();
    assert_eq!(result.winner, 2);
    assert_eq!(result.sale_price, 0);
}

#[test]
fn test_no_action_after_sale() {
    let sold = priced_auction(30).buy_at_price(2).unwrap();
    assert_eq!(sold.pass(3), Err(Errors::AuctionHasEnded));
    assert_eq!(sold.buy_at_price(3), Err(Errors::AuctionHasEnded));
    assert_eq!(sold.set_price(1, 10), Err(Errors::AuctionHasEnded));
    assert_eq!(sold.summary().fixed_price, Some(30));
}
