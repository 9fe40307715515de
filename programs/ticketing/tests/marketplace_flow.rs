use anchor_lang::prelude::*;

use ticketing::handlers::require_allowance;
use ticketing::state::Listing;

// Helper: Generate a test pubkey
fn test_pubkey(seed: u8) -> Pubkey {
    Pubkey::new_from_array([seed; 32])
}

fn test_listing(ask_price: u64) -> Listing {
    Listing {
        event: test_pubkey(1),
        ticket: test_pubkey(2),
        lister: test_pubkey(3),
        ask_price,
        top_bidder: Pubkey::default(),
        top_amount: ask_price,
        proposed_name: String::new(),
        active: true,
        bump: 255,
    }
}

fn assert_err<T: std::fmt::Debug>(result: Result<T>, code: &str) {
    let err = result.unwrap_err();
    let rendered = err.to_string();
    assert!(
        rendered.contains(code),
        "expected {code}, got: {rendered}"
    );
}

#[test]
fn reserve_floor_rejects_bids_at_or_below_ask() {
    let mut listing = test_listing(150);

    assert_err(
        listing.record_bid(test_pubkey(10), 150, "Ada".to_string()),
        "BidTooLow",
    );
    assert_err(
        listing.record_bid(test_pubkey(10), 1, "Ada".to_string()),
        "BidTooLow",
    );
    // Still only the reserve floor; nothing to refund, nobody escrowed.
    assert!(!listing.has_bidder());
    assert_eq!(listing.top_amount, 150);

    let refund = listing
        .record_bid(test_pubkey(10), 151, "Ada".to_string())
        .unwrap();
    assert_eq!(refund, 0);
    assert_eq!(listing.top_bidder, test_pubkey(10));
}

#[test]
fn higher_bid_displaces_and_refunds_the_previous_bidder() {
    let mut listing = test_listing(150);
    let first = test_pubkey(10);
    let second = test_pubkey(11);

    assert_eq!(
        listing.record_bid(first, 155, "Ada".to_string()).unwrap(),
        0
    );

    // Equal amount loses, even from a different bidder.
    assert_err(
        listing.record_bid(second, 155, "Grace".to_string()),
        "BidTooLow",
    );
    assert_eq!(listing.top_bidder, first);

    // A strictly higher bid wins and the full prior escrow is refunded.
    let refund = listing.record_bid(second, 160, "Grace".to_string()).unwrap();
    assert_eq!(refund, 155);
    assert_eq!(listing.top_bidder, second);
    assert_eq!(listing.top_amount, 160);
    assert_eq!(listing.proposed_name, "Grace");
}

#[test]
fn escrow_nets_exactly_the_top_bid_across_a_bid_war() {
    let mut listing = test_listing(100);
    let mut escrowed: u64 = 0;

    for (seed, amount) in [(10u8, 120u64), (11, 130), (12, 200), (13, 201)] {
        let refund = listing
            .record_bid(test_pubkey(seed), amount, "x".to_string())
            .unwrap();
        escrowed += amount;
        escrowed -= refund;
        assert_eq!(escrowed, listing.top_amount);
    }

    // Delisting refunds the outstanding top bid in full.
    escrowed -= listing.top_amount;
    assert_eq!(escrowed, 0);
}

#[test]
fn settlement_split_uses_floor_division() {
    let mut listing = test_listing(150);
    listing.record_bid(test_pubkey(10), 155, "Ada".to_string()).unwrap();

    // 155 * 5 / 100 = 7 (floor), payout is the remainder.
    let (fee, payout) = listing.settlement_split().unwrap();
    assert_eq!(fee, 7);
    assert_eq!(payout, 148);
    assert_eq!(fee + payout, listing.top_amount);

    // Amounts too small to bear a fee pay out whole.
    let mut small = test_listing(10);
    small.record_bid(test_pubkey(10), 19, "Ada".to_string()).unwrap();
    let (fee, payout) = small.settlement_split().unwrap();
    assert_eq!(fee, 0);
    assert_eq!(payout, 19);
}

#[test]
fn inactive_listing_rejects_bids() {
    let mut listing = test_listing(150);
    listing.active = false;

    assert_err(
        listing.record_bid(test_pubkey(10), 500, "Ada".to_string()),
        "NotListed",
    );
}

#[test]
fn relisting_starts_from_a_fresh_slot() {
    let mut first = test_listing(160);
    first
        .record_bid(test_pubkey(10), 170, "Ada".to_string())
        .unwrap();
    first.active = false; // delisted, account closed on-chain

    // A fresh listing cycle carries no residue from the prior one.
    let second = test_listing(120);
    assert!(second.active);
    assert!(!second.has_bidder());
    assert_eq!(second.top_amount, 120);
    assert_eq!(second.proposed_name, "");

    // The old cycle's floor does not constrain the new one.
    let mut second = second;
    let refund = second
        .record_bid(test_pubkey(11), 121, "Grace".to_string())
        .unwrap();
    assert_eq!(refund, 0);
}

#[test]
fn allowance_must_name_the_market_and_cover_the_amount() {
    let market = test_pubkey(20);
    let other = test_pubkey(21);

    // No delegate approved at all.
    assert_err(require_allowance(None, 0, market, 20), "InsufficientAllowance");
    // Approved the wrong delegate.
    assert_err(
        require_allowance(Some(other), 100, market, 20),
        "InsufficientAllowance",
    );
    // Right delegate, amount short by one.
    assert_err(
        require_allowance(Some(market), 19, market, 20),
        "InsufficientAllowance",
    );
    // Exact and surplus approvals pass.
    require_allowance(Some(market), 20, market, 20).unwrap();
    require_allowance(Some(market), 100, market, 20).unwrap();
}
