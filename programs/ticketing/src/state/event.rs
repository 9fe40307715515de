//! Event account definition: per-event ticket registry metadata.

use anchor_lang::prelude::*;

use crate::constants::MAX_NAME_LEN;
use crate::error::ErrorCode;

#[account]
pub struct Event {
    /// The event organizer (fixed at creation; receives primary-sale
    /// proceeds and resale fees, and is the only one who may redeem tickets).
    pub organizer: Pubkey,
    /// Display name. Not unique across events.
    pub name: String,
    /// The payment currency for this event. Pinned at creation.
    pub payment_mint: Pubkey,
    /// Fixed unit price for primary sales.
    pub ticket_price: u64,
    /// Maximum number of tickets that may ever be issued.
    pub max_supply: u32,
    /// Number of tickets issued so far. Never decremented; ticket ids
    /// 1..=tickets_minted exist, ids beyond do not.
    pub tickets_minted: u32,
    /// PDA bump
    pub bump: u8,
}

impl Event {
    pub const SEED_PREFIX: &'static [u8] = b"event";
    pub const INIT_SPACE: usize = 32 + (4 + MAX_NAME_LEN) + 32 + 8 + 4 + 4 + 1;

    /// Reserve the next sequential ticket id (1-based), or fail when the
    /// event is sold out. Ids are never reused.
    pub fn reserve_ticket_id(&mut self) -> Result<u32> {
        require!(
            self.tickets_minted < self.max_supply,
            ErrorCode::CapacityExceeded
        );
        self.tickets_minted += 1;
        Ok(self.tickets_minted)
    }
}

#[account]
pub struct EventCounter {
    /// Total number of events ever created; used to derive event PDAs so
    /// event names need not be unique.
    pub events_created: u64,
    /// PDA bump
    pub bump: u8,
}

impl EventCounter {
    pub const INIT_SPACE: usize = 8 + 1;
}
