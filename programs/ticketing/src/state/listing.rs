//! Listing account definition: an active resale offer with its bid slot.

use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, RESALE_FEE_PERCENT};
use crate::error::ErrorCode;

/// One listing per ticket at a time. The bid slot is folded in: before any
/// real bid arrives, `top_amount` carries the asking price as a reserve
/// floor and `top_bidder` stays at the zero address. The listing and its
/// escrow token account are closed on settlement or delisting, so relisting
/// starts from a fresh account with no residue.
#[account]
pub struct Listing {
    /// The event the listed ticket belongs to.
    pub event: Pubkey,
    /// The listed ticket's PDA.
    pub ticket: Pubkey,
    /// Seller; custody of the ticket moved to the market on listing.
    pub lister: Pubkey,
    /// Asking price set at listing time.
    pub ask_price: u64,
    /// Highest bidder, `Pubkey::default()` while only the reserve floor
    /// is set.
    pub top_bidder: Pubkey,
    /// Highest recorded amount; equals `ask_price` until a real bid lands.
    /// Monotonically non-decreasing for the lifetime of the listing.
    pub top_amount: u64,
    /// Holder name the ticket is renamed to if the top bid settles.
    pub proposed_name: String,
    /// Deactivated on settlement or delisting.
    pub active: bool,
    /// PDA bump
    pub bump: u8,
}

impl Listing {
    pub const SEED_PREFIX: &'static [u8] = b"listing";
    pub const ESCROW_SEED_PREFIX: &'static [u8] = b"escrow";
    pub const INIT_SPACE: usize =
        32 + 32 + 32 + 8 + 32 + 8 + (4 + MAX_NAME_LEN) + 1 + 1;

    /// Whether a real bidder (not just the reserve floor) is escrowed.
    pub fn has_bidder(&self) -> bool {
        self.top_bidder != Pubkey::default()
    }

    /// Record a strictly higher bid, returning the amount to refund to the
    /// displaced bidder (0 when only the reserve floor was set). Exactly the
    /// top bid stays escrowed afterwards.
    pub fn record_bid(
        &mut self,
        bidder: Pubkey,
        amount: u64,
        proposed_name: String,
    ) -> Result<u64> {
        require!(self.active, ErrorCode::NotListed);
        require!(amount > self.top_amount, ErrorCode::BidTooLow);
        let refund = if self.has_bidder() { self.top_amount } else { 0 };
        self.top_bidder = bidder;
        self.top_amount = amount;
        self.proposed_name = proposed_name;
        Ok(refund)
    }

    /// Split the settlement amount into (organizer fee, lister payout).
    /// Fee arithmetic is floor division; the two parts always sum back to
    /// the full amount.
    pub fn settlement_split(&self) -> Result<(u64, u64)> {
        let fee = self
            .top_amount
            .checked_mul(RESALE_FEE_PERCENT)
            .ok_or(ErrorCode::ArithmeticOverflow)?
            / 100;
        Ok((fee, self.top_amount - fee))
    }
}
