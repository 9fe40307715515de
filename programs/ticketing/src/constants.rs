use anchor_lang::prelude::*;

/// How long a ticket stays valid after issuance, in seconds (10 days).
#[constant]
pub const TICKET_VALIDITY_SECONDS: i64 = 10 * 24 * 60 * 60;

/// Resale fee taken by the event organizer on accepted bids, in percent.
/// Fee arithmetic is floor division: fee = amount * PERCENT / 100.
#[constant]
pub const RESALE_FEE_PERCENT: u64 = 5;

/// Upper bound on event names and ticket holder names.
pub const MAX_NAME_LEN: usize = 64;

/// Seed for the market authority PDA. This PDA is the delegate buyers and
/// bidders approve on their token accounts, the custodian of listed tickets,
/// and the authority over every listing's escrow token account.
#[constant]
pub const MARKET_AUTHORITY_SEED: &[u8] = b"authority";

/// Seed for the global event counter PDA.
#[constant]
pub const EVENT_COUNTER_SEED: &[u8] = b"event_counter";
