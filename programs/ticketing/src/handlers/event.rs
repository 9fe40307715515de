//! Event creation: deploys a fresh ticket registry for the organizer.

use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::{EVENT_COUNTER_SEED, MAX_NAME_LEN};
use crate::error::ErrorCode;
use crate::events::EventCreated;
use crate::state::{Event, EventCounter};

#[derive(Accounts)]
pub struct CreateEvent<'info> {
    #[account(mut)]
    pub organizer: Signer<'info>,

    /// Global counter the event PDA is derived from, so event names carry
    /// no uniqueness constraint.
    #[account(
        init_if_needed,
        payer = organizer,
        space = EventCounter::DISCRIMINATOR.len() + EventCounter::INIT_SPACE,
        seeds = [EVENT_COUNTER_SEED],
        bump
    )]
    pub counter: Account<'info, EventCounter>,

    #[account(
        init,
        payer = organizer,
        space = Event::DISCRIMINATOR.len() + Event::INIT_SPACE,
        seeds = [Event::SEED_PREFIX, &counter.events_created.to_le_bytes()],
        bump
    )]
    pub event: Account<'info, Event>,

    /// The payment currency all sales for this event settle in.
    pub payment_mint: Account<'info, Mint>,

    pub system_program: Program<'info, System>,
}

pub fn create_event(
    ctx: Context<CreateEvent>,
    name: String,
    ticket_price: u64,
    max_supply: u32,
) -> Result<()> {
    require!(name.len() <= MAX_NAME_LEN, ErrorCode::NameTooLong);

    let counter = &mut ctx.accounts.counter;
    counter.events_created = counter
        .events_created
        .checked_add(1)
        .ok_or(ErrorCode::ArithmeticOverflow)?;
    counter.bump = ctx.bumps.counter;

    let event = &mut ctx.accounts.event;
    event.organizer = ctx.accounts.organizer.key();
    event.name = name;
    event.payment_mint = ctx.accounts.payment_mint.key();
    event.ticket_price = ticket_price;
    event.max_supply = max_supply;
    event.tickets_minted = 0;
    event.bump = ctx.bumps.event;

    emit!(EventCreated {
        event: event.key(),
        organizer: event.organizer,
        ticket_price,
        max_supply,
    });
    msg!("Event created: price {} / supply {}", ticket_price, max_supply);

    Ok(())
}
