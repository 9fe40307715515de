//! Secondary market instructions: listing, bidding, settlement, delisting.
//!
//! Listed tickets sit in the custody of the market authority PDA and bid
//! funds in a per-listing escrow token account owned by the same PDA. Every
//! handler validates, mutates program state, and only then performs token
//! CPIs, so no nested call can observe a half-updated listing.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Mint, Token, TokenAccount, Transfer};

use crate::constants::{MARKET_AUTHORITY_SEED, MAX_NAME_LEN};
use crate::error::ErrorCode;
use crate::events::{BidAccepted, BidPlaced, TicketDelisted, TicketListed};
use crate::handlers::require_allowance;
use crate::state::{Event, Listing, Ticket, TicketHolder};

#[derive(Accounts)]
pub struct ListTicket<'info> {
    #[account(mut)]
    pub lister: Signer<'info>,

    pub event: Account<'info, Event>,

    #[account(
        mut,
        constraint = ticket.event == event.key(),
        constraint = ticket.holder == lister.key() @ ErrorCode::Unauthorized,
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [TicketHolder::SEED_PREFIX, event.key().as_ref(), lister.key().as_ref()],
        bump = lister_holder.bump,
    )]
    pub lister_holder: Account<'info, TicketHolder>,

    /// Fresh on every listing; settlement and delisting close it, so a
    /// relisted ticket starts with no residue from the prior cycle.
    #[account(
        init,
        payer = lister,
        space = Listing::DISCRIMINATOR.len() + Listing::INIT_SPACE,
        seeds = [Listing::SEED_PREFIX, ticket.key().as_ref()],
        bump
    )]
    pub listing: Account<'info, Listing>,

    #[account(
        init,
        payer = lister,
        seeds = [Listing::ESCROW_SEED_PREFIX, ticket.key().as_ref()],
        bump,
        token::mint = payment_mint,
        token::authority = market_authority,
    )]
    pub escrow_token: Account<'info, TokenAccount>,

    #[account(address = event.payment_mint)]
    pub payment_mint: Account<'info, Mint>,

    /// CHECK: custodian PDA for listed tickets and escrowed funds.
    #[account(seeds = [MARKET_AUTHORITY_SEED], bump)]
    pub market_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn list_ticket(ctx: Context<ListTicket>, ask_price: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let ticket = &mut ctx.accounts.ticket;
    require!(!ticket.is_expired_or_used(now), ErrorCode::TicketUnusable);

    // Custody moves to the market; any standing approval dies with it.
    ticket.transfer_to(ctx.accounts.market_authority.key())?;
    let lister_holder = &mut ctx.accounts.lister_holder;
    lister_holder.tickets_held = lister_holder
        .tickets_held
        .checked_sub(1)
        .ok_or(ErrorCode::ArithmeticOverflow)?;

    let listing = &mut ctx.accounts.listing;
    listing.event = ctx.accounts.event.key();
    listing.ticket = ticket.key();
    listing.lister = ctx.accounts.lister.key();
    listing.ask_price = ask_price;
    // Reserve floor: the asking price occupies the bid slot without any
    // escrowed funds until a real bidder outbids it.
    listing.top_bidder = Pubkey::default();
    listing.top_amount = ask_price;
    listing.proposed_name = String::new();
    listing.active = true;
    listing.bump = ctx.bumps.listing;

    emit!(TicketListed {
        listing: listing.key(),
        ticket: listing.ticket,
        lister: listing.lister,
        ask_price,
    });
    msg!("Ticket {} listed at {}", ticket.id, ask_price);

    Ok(())
}

#[derive(Accounts)]
pub struct PlaceBid<'info> {
    #[account(mut)]
    pub bidder: Signer<'info>,

    #[account(constraint = listing.event == event.key())]
    pub event: Account<'info, Event>,

    #[account(constraint = listing.ticket == ticket.key())]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [Listing::SEED_PREFIX, ticket.key().as_ref()],
        bump = listing.bump,
        constraint = listing.active @ ErrorCode::NotListed,
    )]
    pub listing: Account<'info, Listing>,

    #[account(
        mut,
        seeds = [Listing::ESCROW_SEED_PREFIX, ticket.key().as_ref()],
        bump,
    )]
    pub escrow_token: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = bidder_token.owner == bidder.key() @ ErrorCode::Unauthorized,
        constraint = bidder_token.mint == event.payment_mint,
    )]
    pub bidder_token: Account<'info, TokenAccount>,

    /// Refund destination for the currently escrowed bidder; required as
    /// soon as a real bid is outstanding.
    #[account(
        mut,
        constraint = displaced_bidder_token.owner == listing.top_bidder,
        constraint = displaced_bidder_token.mint == event.payment_mint,
    )]
    pub displaced_bidder_token: Option<Account<'info, TokenAccount>>,

    /// CHECK: custodian PDA for listed tickets and escrowed funds.
    #[account(seeds = [MARKET_AUTHORITY_SEED], bump)]
    pub market_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn place_bid(ctx: Context<PlaceBid>, amount: u64, proposed_name: String) -> Result<()> {
    require!(proposed_name.len() <= MAX_NAME_LEN, ErrorCode::NameTooLong);

    let now = Clock::get()?.unix_timestamp;
    require!(
        !ctx.accounts.ticket.is_expired_or_used(now),
        ErrorCode::TicketUnusable
    );
    require_allowance(
        ctx.accounts.bidder_token.delegate.into(),
        ctx.accounts.bidder_token.delegated_amount,
        ctx.accounts.market_authority.key(),
        amount,
    )?;

    // The refund destination must be wired up whenever a real bid is
    // outstanding; its owner was checked against the slot by constraint.
    let displaced_bidder = ctx.accounts.listing.top_bidder;
    let displaced_token = if ctx.accounts.listing.has_bidder() {
        Some(
            ctx.accounts
                .displaced_bidder_token
                .as_ref()
                .ok_or(ErrorCode::MissingRefundAccount)?,
        )
    } else {
        None
    };

    let refund = ctx.accounts.listing.record_bid(
        ctx.accounts.bidder.key(),
        amount,
        proposed_name,
    )?;

    // Pull the new bid first, then pay the displaced bidder back out of
    // escrow; exactly the top bid remains in custody afterwards and the
    // escrow never dips below zero in between.
    let authority_seeds: &[&[u8]] =
        &[MARKET_AUTHORITY_SEED, &[ctx.bumps.market_authority]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.bidder_token.to_account_info(),
                to: ctx.accounts.escrow_token.to_account_info(),
                authority: ctx.accounts.market_authority.to_account_info(),
            },
            &[authority_seeds],
        ),
        amount,
    )?;
    if let Some(displaced) = displaced_token {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.escrow_token.to_account_info(),
                    to: displaced.to_account_info(),
                    authority: ctx.accounts.market_authority.to_account_info(),
                },
                &[authority_seeds],
            ),
            refund,
        )?;
        msg!("Refunded displaced bidder {} with {}", displaced_bidder, refund);
    }

    emit!(BidPlaced {
        listing: ctx.accounts.listing.key(),
        bidder: ctx.accounts.bidder.key(),
        amount,
        refunded: refund,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct AcceptBid<'info> {
    #[account(mut)]
    pub lister: Signer<'info>,

    #[account(constraint = listing.event == event.key())]
    pub event: Account<'info, Event>,

    #[account(
        mut,
        constraint = listing.ticket == ticket.key(),
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [Listing::SEED_PREFIX, ticket.key().as_ref()],
        bump = listing.bump,
        constraint = listing.lister == lister.key() @ ErrorCode::Unauthorized,
        constraint = listing.active @ ErrorCode::NotListed,
        close = lister,
    )]
    pub listing: Account<'info, Listing>,

    #[account(
        mut,
        seeds = [Listing::ESCROW_SEED_PREFIX, ticket.key().as_ref()],
        bump,
    )]
    pub escrow_token: Account<'info, TokenAccount>,

    #[account(
        init_if_needed,
        payer = lister,
        space = TicketHolder::DISCRIMINATOR.len() + TicketHolder::INIT_SPACE,
        seeds = [TicketHolder::SEED_PREFIX, event.key().as_ref(), listing.top_bidder.as_ref()],
        bump
    )]
    pub bidder_holder: Account<'info, TicketHolder>,

    #[account(
        mut,
        constraint = lister_token.owner == listing.lister,
        constraint = lister_token.mint == event.payment_mint,
    )]
    pub lister_token: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = organizer_token.owner == event.organizer,
        constraint = organizer_token.mint == event.payment_mint,
    )]
    pub organizer_token: Account<'info, TokenAccount>,

    /// CHECK: custodian PDA for listed tickets and escrowed funds.
    #[account(seeds = [MARKET_AUTHORITY_SEED], bump)]
    pub market_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn accept_bid(ctx: Context<AcceptBid>) -> Result<()> {
    let listing = &ctx.accounts.listing;
    require!(listing.has_bidder(), ErrorCode::NoBid);

    // Freshness is checked before any funds move so a stale ticket aborts
    // settlement with nothing paid out.
    let now = Clock::get()?.unix_timestamp;
    require!(
        !ctx.accounts.ticket.is_expired_or_used(now),
        ErrorCode::TicketUnusable
    );

    let (fee, payout) = listing.settlement_split()?;
    let amount = listing.top_amount;
    let bidder = listing.top_bidder;
    let new_name = listing.proposed_name.clone();

    let ticket = &mut ctx.accounts.ticket;
    ticket.holder_name = new_name;
    ticket.transfer_to(bidder)?;

    let holder = &mut ctx.accounts.bidder_holder;
    holder.event = ctx.accounts.event.key();
    holder.owner = bidder;
    holder.tickets_held = holder
        .tickets_held
        .checked_add(1)
        .ok_or(ErrorCode::ArithmeticOverflow)?;
    holder.bump = ctx.bumps.bidder_holder;

    let listing = &mut ctx.accounts.listing;
    listing.active = false;

    let authority_seeds: &[&[u8]] =
        &[MARKET_AUTHORITY_SEED, &[ctx.bumps.market_authority]];
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.escrow_token.to_account_info(),
                to: ctx.accounts.lister_token.to_account_info(),
                authority: ctx.accounts.market_authority.to_account_info(),
            },
            &[authority_seeds],
        ),
        payout,
    )?;
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.escrow_token.to_account_info(),
                to: ctx.accounts.organizer_token.to_account_info(),
                authority: ctx.accounts.market_authority.to_account_info(),
            },
            &[authority_seeds],
        ),
        fee,
    )?;
    token::close_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        CloseAccount {
            account: ctx.accounts.escrow_token.to_account_info(),
            destination: ctx.accounts.lister.to_account_info(),
            authority: ctx.accounts.market_authority.to_account_info(),
        },
        &[authority_seeds],
    ))?;

    emit!(BidAccepted {
        listing: listing.key(),
        ticket: ctx.accounts.ticket.key(),
        lister: ctx.accounts.lister.key(),
        bidder,
        amount,
        fee,
        payout,
    });
    msg!("Bid of {} accepted: payout {} / fee {}", amount, payout, fee);

    Ok(())
}

#[derive(Accounts)]
pub struct DelistTicket<'info> {
    #[account(mut)]
    pub lister: Signer<'info>,

    #[account(constraint = listing.event == event.key())]
    pub event: Account<'info, Event>,

    #[account(
        mut,
        constraint = listing.ticket == ticket.key(),
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [Listing::SEED_PREFIX, ticket.key().as_ref()],
        bump = listing.bump,
        constraint = listing.lister == lister.key() @ ErrorCode::Unauthorized,
        constraint = listing.active @ ErrorCode::NotListed,
        close = lister,
    )]
    pub listing: Account<'info, Listing>,

    #[account(
        mut,
        seeds = [Listing::ESCROW_SEED_PREFIX, ticket.key().as_ref()],
        bump,
    )]
    pub escrow_token: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [TicketHolder::SEED_PREFIX, event.key().as_ref(), lister.key().as_ref()],
        bump = lister_holder.bump,
    )]
    pub lister_holder: Account<'info, TicketHolder>,

    /// Refund destination for the escrowed bidder, if any.
    #[account(
        mut,
        constraint = displaced_bidder_token.owner == listing.top_bidder,
        constraint = displaced_bidder_token.mint == event.payment_mint,
    )]
    pub displaced_bidder_token: Option<Account<'info, TokenAccount>>,

    /// CHECK: custodian PDA for listed tickets and escrowed funds.
    #[account(seeds = [MARKET_AUTHORITY_SEED], bump)]
    pub market_authority: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn delist_ticket(ctx: Context<DelistTicket>) -> Result<()> {
    let refund = if ctx.accounts.listing.has_bidder() {
        ctx.accounts.listing.top_amount
    } else {
        0
    };
    let displaced_token = if refund > 0 {
        Some(
            ctx.accounts
                .displaced_bidder_token
                .as_ref()
                .ok_or(ErrorCode::MissingRefundAccount)?,
        )
    } else {
        None
    };

    // Custody returns to the lister regardless of ticket freshness; only
    // the listing itself required a fresh ticket.
    let ticket = &mut ctx.accounts.ticket;
    ticket.transfer_to(ctx.accounts.lister.key())?;
    let lister_holder = &mut ctx.accounts.lister_holder;
    lister_holder.tickets_held = lister_holder
        .tickets_held
        .checked_add(1)
        .ok_or(ErrorCode::ArithmeticOverflow)?;
    let listing = &mut ctx.accounts.listing;
    listing.active = false;

    let authority_seeds: &[&[u8]] =
        &[MARKET_AUTHORITY_SEED, &[ctx.bumps.market_authority]];
    if let Some(displaced) = displaced_token {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.escrow_token.to_account_info(),
                    to: displaced.to_account_info(),
                    authority: ctx.accounts.market_authority.to_account_info(),
                },
                &[authority_seeds],
            ),
            refund,
        )?;
    }
    token::close_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        CloseAccount {
            account: ctx.accounts.escrow_token.to_account_info(),
            destination: ctx.accounts.lister.to_account_info(),
            authority: ctx.accounts.market_authority.to_account_info(),
        },
        &[authority_seeds],
    ))?;

    emit!(TicketDelisted {
        listing: listing.key(),
        ticket: ctx.accounts.ticket.key(),
        lister: ctx.accounts.lister.key(),
        refunded: refund,
    });
    msg!("Ticket {} delisted", ctx.accounts.ticket.id);

    Ok(())
}
