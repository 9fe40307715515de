//! Primary-sale purchase: delegated payment pull followed by ticket issuance.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::{MARKET_AUTHORITY_SEED, MAX_NAME_LEN, TICKET_VALIDITY_SECONDS};
use crate::error::ErrorCode;
use crate::events::{TicketIssued, TicketPurchased};
use crate::handlers::require_allowance;
use crate::state::{Event, Ticket, TicketHolder};

#[derive(Accounts)]
pub struct PurchaseTicket<'info> {
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(mut)]
    pub event: Account<'info, Event>,

    /// The next sequential ticket of the event. Ids are 1-based and never
    /// reassigned, so the PDA is derived from the yet-unissued id. The
    /// wrapping add only matters at the u32 ceiling, where the capacity
    /// check in the handler rejects the call anyway.
    #[account(
        init,
        payer = buyer,
        space = Ticket::DISCRIMINATOR.len() + Ticket::INIT_SPACE,
        seeds = [
            Ticket::SEED_PREFIX,
            event.key().as_ref(),
            &event.tickets_minted.wrapping_add(1).to_le_bytes(),
        ],
        bump
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        init_if_needed,
        payer = buyer,
        space = TicketHolder::DISCRIMINATOR.len() + TicketHolder::INIT_SPACE,
        seeds = [TicketHolder::SEED_PREFIX, event.key().as_ref(), buyer.key().as_ref()],
        bump
    )]
    pub buyer_holder: Account<'info, TicketHolder>,

    #[account(
        mut,
        constraint = buyer_token.owner == buyer.key() @ ErrorCode::Unauthorized,
        constraint = buyer_token.mint == event.payment_mint,
    )]
    pub buyer_token: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = organizer_token.owner == event.organizer,
        constraint = organizer_token.mint == event.payment_mint,
    )]
    pub organizer_token: Account<'info, TokenAccount>,

    /// CHECK: PDA signing the delegated pull; buyers approve it as the
    /// delegate on their token account beforehand.
    #[account(seeds = [MARKET_AUTHORITY_SEED], bump)]
    pub market_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn purchase_ticket(ctx: Context<PurchaseTicket>, holder_name: String) -> Result<()> {
    require!(holder_name.len() <= MAX_NAME_LEN, ErrorCode::NameTooLong);

    let price = ctx.accounts.event.ticket_price;
    require_allowance(
        ctx.accounts.buyer_token.delegate.into(),
        ctx.accounts.buyer_token.delegated_amount,
        ctx.accounts.market_authority.key(),
        price,
    )?;

    // Reserve the id before any funds move; a sold-out event must fail
    // without touching balances.
    let id = ctx.accounts.event.reserve_ticket_id()?;

    // Payment precedes issuance; if the pull fails the transaction reverts
    // and no orphaned ticket survives.
    let authority_seeds: &[&[u8]] =
        &[MARKET_AUTHORITY_SEED, &[ctx.bumps.market_authority]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.buyer_token.to_account_info(),
                to: ctx.accounts.organizer_token.to_account_info(),
                authority: ctx.accounts.market_authority.to_account_info(),
            },
            &[authority_seeds],
        ),
        price,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let ticket = &mut ctx.accounts.ticket;
    ticket.event = ctx.accounts.event.key();
    ticket.id = id;
    ticket.holder = ctx.accounts.buyer.key();
    ticket.holder_name = holder_name;
    ticket.approved = Pubkey::default();
    ticket.issued_at = now;
    ticket.expires_at = now + TICKET_VALIDITY_SECONDS;
    ticket.used = false;
    ticket.bump = ctx.bumps.ticket;

    let holder = &mut ctx.accounts.buyer_holder;
    holder.event = ctx.accounts.event.key();
    holder.owner = ctx.accounts.buyer.key();
    holder.tickets_held = holder
        .tickets_held
        .checked_add(1)
        .ok_or(ErrorCode::ArithmeticOverflow)?;
    holder.bump = ctx.bumps.buyer_holder;

    emit!(TicketIssued {
        event: ticket.event,
        ticket: ticket.key(),
        id,
        holder: ticket.holder,
        expires_at: ticket.expires_at,
    });
    emit!(TicketPurchased {
        event: ticket.event,
        ticket: ticket.key(),
        buyer: ctx.accounts.buyer.key(),
        price,
    });
    msg!("Ticket {} purchased for {}", id, price);

    Ok(())
}
