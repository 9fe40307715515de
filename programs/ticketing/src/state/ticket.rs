//! Ticket account definition: one issued ticket inside an event's registry.

use anchor_lang::prelude::*;

use crate::constants::MAX_NAME_LEN;
use crate::error::ErrorCode;

#[account]
pub struct Ticket {
    /// The event (registry) this ticket belongs to.
    pub event: Pubkey,
    /// Sequential 1-based id within the event. Never reused.
    pub id: u32,
    /// Current holder. The market authority PDA while listed.
    pub holder: Pubkey,
    /// Display name of the holder; rewritten on resale settlement.
    pub holder_name: String,
    /// Single approved spender, `Pubkey::default()` when unset.
    /// Cleared on every transfer.
    pub approved: Pubkey,
    /// Unix timestamp of issuance.
    pub issued_at: i64,
    /// Unix timestamp after which the ticket is no longer valid.
    pub expires_at: i64,
    /// Set once by the organizer at check-in; irreversible.
    pub used: bool,
    /// PDA bump
    pub bump: u8,
}

impl Ticket {
    pub const SEED_PREFIX: &'static [u8] = b"ticket";
    pub const INIT_SPACE: usize = 32 + 4 + 32 + (4 + MAX_NAME_LEN) + 32 + 8 + 8 + 1 + 1;

    /// Whether a key currently has a standing approval for this ticket.
    pub fn is_approved(&self, key: Pubkey) -> bool {
        self.approved != Pubkey::default() && self.approved == key
    }

    /// A signer may move the ticket if it is the holder or the sole
    /// approved spender.
    pub fn can_be_moved_by(&self, signer: Pubkey) -> bool {
        signer == self.holder || self.is_approved(signer)
    }

    /// Expiry is evaluated lazily against the supplied clock reading;
    /// nothing sweeps tickets proactively.
    pub fn is_expired_or_used(&self, now: i64) -> bool {
        self.used || now > self.expires_at
    }

    /// Reassign the holder. Always clears the approval slot, including when
    /// the approved spender is the one moving the ticket.
    pub fn transfer_to(&mut self, new_holder: Pubkey) -> Result<()> {
        require!(new_holder != Pubkey::default(), ErrorCode::InvalidRecipient);
        self.approved = Pubkey::default();
        self.holder = new_holder;
        Ok(())
    }

    /// Check-in preconditions: fails `AlreadyUsed` before `TicketExpired`
    /// so a redeemed ticket reports the same error regardless of age.
    pub fn assert_redeemable(&self, now: i64) -> Result<()> {
        require!(!self.used, ErrorCode::AlreadyUsed);
        require!(now <= self.expires_at, ErrorCode::TicketExpired);
        Ok(())
    }
}

#[account]
pub struct TicketHolder {
    /// The event this balance is scoped to.
    pub event: Pubkey,
    /// The holder address.
    pub owner: Pubkey,
    /// Number of tickets of this event currently held by `owner`.
    pub tickets_held: u32,
    /// PDA bump
    pub bump: u8,
}

impl TicketHolder {
    pub const SEED_PREFIX: &'static [u8] = b"holder";
    pub const INIT_SPACE: usize = 32 + 32 + 4 + 1;
}
