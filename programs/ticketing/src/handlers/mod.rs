pub mod event;
pub mod marketplace;
pub mod purchase;
pub mod ticket;

pub use event::*;
pub use marketplace::*;
pub use purchase::*;
pub use ticket::*;

use anchor_lang::prelude::*;

use crate::error::ErrorCode;

/// Check a token-account delegate approval against the market authority:
/// the holder must have approved `expected_delegate` for at least
/// `required`. This is the pull-payment precondition for purchases and
/// bids; funds only move through the delegated transfer that follows.
pub fn require_allowance(
    delegate: Option<Pubkey>,
    delegated_amount: u64,
    expected_delegate: Pubkey,
    required: u64,
) -> Result<()> {
    require!(
        delegate == Some(expected_delegate) && delegated_amount >= required,
        ErrorCode::InsufficientAllowance
    );
    Ok(())
}
