//! Property tests for the auction rules that must hold for any table.

use art_auction::domain::{
    execute, fixed_price, one_offer, open_outcry, sealed_bid, AuctionType, ErrorKind, Errors, Lot, RoundEvent, State,
};
use art_auction::money::Bank;
use proptest::prelude::*;
#[path="utils/mod.rs"] mod utils;
use utils::*;

fn table_of(money: &[i64], auctioneer_seat: usize, auction_type: AuctionType) -> Lot {
    let players = players_with_money(money);
    let auctioneer = players[auctioneer_seat % players.len()].id;
    lot_for(auction_type, auctioneer, &players)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// An opening bid is accepted exactly when it is positive and covered by the bidder's money.
    #[test]
    fn prop_open_bid_accepted_iff_affordable(
        money in 0i64..200,
        amount in -10i64..250,
    ) {
        let lot = table_of(&[100, money], 0, AuctionType::Open);
        let state = open_outcry::empty_state(lot, sample_now(), open_outcry::Options::default()).unwrap();
        let result = state.place_bid(2, amount, seconds_later(1));

        if amount <= 0 {
            prop_assert_eq!(result, Err(Errors::InvalidAmount(amount)));
        } else if amount > money {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::InsufficientFunds);
        } else {
            let next = result.unwrap();
            prop_assert_eq!(next.high_bid().map(|b| b.amount), Some(amount));
        }
    }

    /// One-offer turns visit every other player once, clockwise, and end with the auctioneer.
    #[test]
    fn prop_one_offer_turn_order_shape(
        seats in 2usize..=6,
        auctioneer_seat in 0usize..6,
    ) {
        let money = vec![50; seats];
        let lot = table_of(&money, auctioneer_seat, AuctionType::OneOffer);
        let auctioneer = lot.auctioneer;
        let mut state = one_offer::empty_state(lot);
        let order = state.turn_order();

        prop_assert_eq!(order.len(), seats);
        prop_assert_eq!(order.last().copied(), Some(auctioneer));
        let mut sorted = order.clone();
        sorted.sort();
        prop_assert_eq!(sorted, (1..=seats as u32).collect::<Vec<_>>());
        prop_assert_eq!(order[0], auctioneer % seats as u32 + 1);

        // The order actually drives the turns
        for player in &order[..seats - 1] {
            prop_assert_eq!(state.current_actor(), Some(*player));
            state = state.pass(*player).unwrap();
        }
        prop_assert!(state.is_auctioneer_deciding());
        prop_assert_eq!(state.current_actor(), Some(auctioneer));
    }

    /// The sealed winner holds the highest bid and nobody earlier in tie-break order matched it.
    #[test]
    fn prop_sealed_winner_is_earliest_highest(
        bids in prop::collection::vec(0i64..=20, 2..=5),
        auctioneer_seat in 0usize..5,
    ) {
        let money = vec![20; bids.len()];
        let lot = table_of(&money, auctioneer_seat, AuctionType::Hidden);
        let auctioneer = lot.auctioneer;
        let mut state = sealed_bid::empty_state(lot);
        for (i, amount) in bids.iter().enumerate() {
            state = state.submit_bid(i as u32 + 1, *amount).unwrap();
        }
        let order = state.tie_break_order().to_vec();
        let result = state.reveal_bids().unwrap().conclude().unwrap();

        let max = *bids.iter().max().unwrap();
        if max == 0 {
            prop_assert_eq!(result.winner, auctioneer);
            prop_assert_eq!(result.sale_price, 0);
        } else {
            prop_assert_eq!(result.sale_price, max);
            let expected = order.iter().copied().find(|p| bids[*p as usize - 1] == max).unwrap();
            prop_assert_eq!(result.winner, expected);
        }
    }

    /// The auctioneer profits from a sale only when someone else buys.
    #[test]
    fn prop_profit_only_from_other_buyers(
        price in 0i64..=50,
        passes in 0usize..=3,
    ) {
        let lot = table_of(&[50, 50, 50, 50], 0, AuctionType::FixedPrice);
        let mut state = fixed_price::create_with_price(lot, price).unwrap();
        let turn_order = [2u32, 3, 4];
        for player in turn_order.iter().take(passes) {
            state = state.pass(*player).unwrap();
        }
        if passes < turn_order.len() {
            state = state.buy_at_price(turn_order[passes]).unwrap();
        }
        let result = state.conclude().unwrap();

        if result.winner == result.auctioneer {
            prop_assert_eq!(result.profit, 0);
            prop_assert!(state.was_forced());
        } else {
            prop_assert_eq!(result.profit, price);
        }
        prop_assert_eq!(result.sale_price, price);
    }

    /// Once an auction stops being active, every action is rejected as stale.
    #[test]
    fn prop_sold_one_offer_rejects_everything(
        offer in 1i64..=40,
        player in 1u32..=4,
        amount in 1i64..=40,
    ) {
        let lot = table_of(&[40, 40, 40, 40], 0, AuctionType::OneOffer);
        let sold = one_offer::empty_state(lot)
            .make_offer(2, offer).unwrap()
            .pass(3).unwrap()
            .pass(4).unwrap()
            .accept_highest_bid(1).unwrap();
        prop_assert!(!sold.is_active());

        let attempts = [
            sold.make_offer(player, amount),
            sold.pass(player),
            sold.outbid(player, amount),
            sold.accept_highest_bid(player),
            sold.take_free(player),
        ];
        for attempt in attempts {
            prop_assert_eq!(attempt.unwrap_err().kind(), ErrorKind::StaleState);
        }
    }

    /// Settlement moves money between players and the bank without creating or losing any.
    #[test]
    fn prop_settlement_conserves_money(
        price in 0i64..=60,
        winner in 1u32..=4,
    ) {
        let mut players = players_with_money(&[60, 60, 60, 60]);
        let lot = Lot::new(vec![sample_card(AuctionType::Open)], 1, &players).unwrap();
        let result = art_auction::domain::AuctionResult::new(&lot, winner, price, AuctionType::Open);
        let mut bank = Bank::new();
        let mut log: Vec<RoundEvent> = Vec::new();

        execute(&result, &mut players, &mut bank, &mut log).unwrap();

        let total: i64 = players.iter().map(|p| p.money).sum();
        prop_assert_eq!(total + bank.collected, 240);
        prop_assert_eq!(log.len(), 1);
    }
}
