//! Ticket registry instructions: approval, transfer, renaming and check-in.

use anchor_lang::prelude::*;

use crate::constants::MAX_NAME_LEN;
use crate::error::ErrorCode;
use crate::events::{TicketApproved, TicketRedeemed, TicketTransferred};
use crate::state::{Event, Ticket, TicketHolder};

#[derive(Accounts)]
pub struct ApproveTicket<'info> {
    pub holder: Signer<'info>,

    #[account(
        mut,
        constraint = ticket.holder == holder.key() @ ErrorCode::Unauthorized,
    )]
    pub ticket: Account<'info, Ticket>,
}

/// Overwrite the single approval slot. `Pubkey::default()` revokes.
pub fn approve_ticket(ctx: Context<ApproveTicket>, spender: Pubkey) -> Result<()> {
    let ticket = &mut ctx.accounts.ticket;
    ticket.approved = spender;

    emit!(TicketApproved {
        ticket: ticket.key(),
        holder: ticket.holder,
        spender,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct TransferTicket<'info> {
    /// The current holder or the approved spender.
    #[account(mut)]
    pub authority: Signer<'info>,

    pub event: Account<'info, Event>,

    #[account(
        mut,
        constraint = ticket.event == event.key(),
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(
        mut,
        seeds = [TicketHolder::SEED_PREFIX, event.key().as_ref(), ticket.holder.as_ref()],
        bump = sender_holder.bump,
    )]
    pub sender_holder: Account<'info, TicketHolder>,

    /// CHECK: Destination of the transfer; only its address is recorded.
    pub recipient: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = authority,
        space = TicketHolder::DISCRIMINATOR.len() + TicketHolder::INIT_SPACE,
        seeds = [TicketHolder::SEED_PREFIX, event.key().as_ref(), recipient.key().as_ref()],
        bump
    )]
    pub recipient_holder: Account<'info, TicketHolder>,

    pub system_program: Program<'info, System>,
}

pub fn transfer_ticket(ctx: Context<TransferTicket>) -> Result<()> {
    let ticket = &mut ctx.accounts.ticket;
    require!(
        ticket.can_be_moved_by(ctx.accounts.authority.key()),
        ErrorCode::Unauthorized
    );

    let from = ticket.holder;
    let to = ctx.accounts.recipient.key();
    // Clears the approval slot even when the approved spender is the caller.
    ticket.transfer_to(to)?;

    // A self-transfer resolves sender and recipient to the same holder PDA,
    // handed to us as two independent copies; touching both would let the
    // later write-back clobber the earlier one. The net balance change is
    // zero, so leave both copies untouched.
    if from != to {
        let sender = &mut ctx.accounts.sender_holder;
        sender.tickets_held = sender
            .tickets_held
            .checked_sub(1)
            .ok_or(ErrorCode::ArithmeticOverflow)?;

        let recipient = &mut ctx.accounts.recipient_holder;
        recipient.event = ctx.accounts.event.key();
        recipient.owner = to;
        recipient.tickets_held = recipient
            .tickets_held
            .checked_add(1)
            .ok_or(ErrorCode::ArithmeticOverflow)?;
        recipient.bump = ctx.bumps.recipient_holder;
    }

    emit!(TicketTransferred {
        ticket: ticket.key(),
        from,
        to,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct UpdateHolderName<'info> {
    pub holder: Signer<'info>,

    #[account(
        mut,
        constraint = ticket.holder == holder.key() @ ErrorCode::Unauthorized,
    )]
    pub ticket: Account<'info, Ticket>,
}

/// Display-name change only; the holder mapping is untouched.
pub fn update_holder_name(ctx: Context<UpdateHolderName>, new_name: String) -> Result<()> {
    require!(new_name.len() <= MAX_NAME_LEN, ErrorCode::NameTooLong);
    ctx.accounts.ticket.holder_name = new_name;
    Ok(())
}

#[derive(Accounts)]
pub struct RedeemTicket<'info> {
    pub organizer: Signer<'info>,

    #[account(
        constraint = event.organizer == organizer.key() @ ErrorCode::Unauthorized,
    )]
    pub event: Account<'info, Event>,

    #[account(
        mut,
        constraint = ticket.event == event.key(),
    )]
    pub ticket: Account<'info, Ticket>,
}

/// Organizer check-in. Irreversible; a used ticket can never be un-used.
pub fn redeem_ticket(ctx: Context<RedeemTicket>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let ticket = &mut ctx.accounts.ticket;
    ticket.assert_redeemable(now)?;
    ticket.used = true;

    emit!(TicketRedeemed {
        event: ticket.event,
        ticket: ticket.key(),
        holder: ticket.holder,
    });
    msg!("Ticket {} redeemed", ticket.id);

    Ok(())
}
