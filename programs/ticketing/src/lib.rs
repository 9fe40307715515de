#![allow(unexpected_cfgs)]
// See https://solana.stackexchange.com/questions/17777/unexpected-cfg-condition-value-solana)

pub mod constants;
pub mod error;
pub mod events;
pub mod handlers;
pub mod state;

use anchor_lang::prelude::*;
use handlers::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod ticketing {
    use super::*;

    /// Create a new event: a per-event ticket registry with a fixed price,
    /// a hard supply cap and the caller as organizer.
    pub fn create_event(
        context: Context<CreateEvent>,
        name: String,
        ticket_price: u64,
        max_supply: u32,
    ) -> Result<()> {
        handlers::event::create_event(context, name, ticket_price, max_supply)
    }

    /// Buy an unissued ticket at the event's fixed price. The price is
    /// pulled from the buyer's pre-approved token account to the organizer,
    /// then the next sequential ticket is issued to the buyer.
    pub fn purchase_ticket(
        context: Context<PurchaseTicket>,
        holder_name: String,
    ) -> Result<()> {
        handlers::purchase::purchase_ticket(context, holder_name)
    }

    /// Approve a single spender for a ticket. Overwrites any prior
    /// approval; the zero address revokes.
    pub fn approve_ticket(context: Context<ApproveTicket>, spender: Pubkey) -> Result<()> {
        handlers::ticket::approve_ticket(context, spender)
    }

    /// Move a ticket to a new holder. The signer must be the holder or the
    /// approved spender; the approval slot is cleared either way.
    pub fn transfer_ticket(context: Context<TransferTicket>) -> Result<()> {
        handlers::ticket::transfer_ticket(context)
    }

    /// Change a ticket's display name. Holder only.
    pub fn update_holder_name(
        context: Context<UpdateHolderName>,
        new_name: String,
    ) -> Result<()> {
        handlers::ticket::update_holder_name(context, new_name)
    }

    /// Mark a ticket as used at check-in. Organizer only, irreversible.
    pub fn redeem_ticket(context: Context<RedeemTicket>) -> Result<()> {
        handlers::ticket::redeem_ticket(context)
    }

    /// List a held ticket for resale. Custody moves to the market and the
    /// asking price seeds the bid slot as a reserve floor.
    pub fn list_ticket(context: Context<ListTicket>, ask_price: u64) -> Result<()> {
        handlers::marketplace::list_ticket(context, ask_price)
    }

    /// Escrow a bid on an active listing. Must strictly exceed the current
    /// top amount; the displaced bidder is refunded in full.
    pub fn place_bid(
        context: Context<PlaceBid>,
        amount: u64,
        proposed_name: String,
    ) -> Result<()> {
        handlers::marketplace::place_bid(context, amount, proposed_name)
    }

    /// Settle the top bid: fee to the organizer, remainder to the lister,
    /// ticket renamed and handed to the bidder.
    pub fn accept_bid(context: Context<AcceptBid>) -> Result<()> {
        handlers::marketplace::accept_bid(context)
    }

    /// Withdraw an active listing, refunding the escrowed bidder if any.
    pub fn delist_ticket(context: Context<DelistTicket>) -> Result<()> {
        handlers::marketplace::delist_ticket(context)
    }
}
