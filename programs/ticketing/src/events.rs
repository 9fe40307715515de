//! Anchor events emitted for external observers and tests.

use anchor_lang::prelude::*;

/// Emitted when a new event (ticket registry) is created.
#[event]
pub struct EventCreated {
    pub event: Pubkey,
    pub organizer: Pubkey,
    pub ticket_price: u64,
    pub max_supply: u32,
}

/// Emitted when a ticket is issued into an event's registry.
#[event]
pub struct TicketIssued {
    pub event: Pubkey,
    pub ticket: Pubkey,
    pub id: u32,
    pub holder: Pubkey,
    pub expires_at: i64,
}

/// Emitted when a primary-sale purchase settles.
#[event]
pub struct TicketPurchased {
    pub event: Pubkey,
    pub ticket: Pubkey,
    pub buyer: Pubkey,
    pub price: u64,
}

/// Emitted when the approval slot of a ticket changes.
#[event]
pub struct TicketApproved {
    pub ticket: Pubkey,
    pub holder: Pubkey,
    pub spender: Pubkey,
}

/// Emitted when a ticket changes holder.
#[event]
pub struct TicketTransferred {
    pub ticket: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
}

/// Emitted when a ticket is listed for resale.
#[event]
pub struct TicketListed {
    pub listing: Pubkey,
    pub ticket: Pubkey,
    pub lister: Pubkey,
    pub ask_price: u64,
}

/// Emitted when a bid is escrowed. `refunded` is the amount returned to the
/// displaced bidder, 0 when the bid only beat the reserve floor.
#[event]
pub struct BidPlaced {
    pub listing: Pubkey,
    pub bidder: Pubkey,
    pub amount: u64,
    pub refunded: u64,
}

/// Emitted when the lister accepts the top bid and the sale settles.
#[event]
pub struct BidAccepted {
    pub listing: Pubkey,
    pub ticket: Pubkey,
    pub lister: Pubkey,
    pub bidder: Pubkey,
    pub amount: u64,
    pub fee: u64,
    pub payout: u64,
}

/// Emitted when a listing is withdrawn. `refunded` is 0 when no real bid
/// was outstanding.
#[event]
pub struct TicketDelisted {
    pub listing: Pubkey,
    pub ticket: Pubkey,
    pub lister: Pubkey,
    pub refunded: u64,
}

/// Emitted when the organizer checks a ticket in.
#[event]
pub struct TicketRedeemed {
    pub event: Pubkey,
    pub ticket: Pubkey,
    pub holder: Pubkey,
}
