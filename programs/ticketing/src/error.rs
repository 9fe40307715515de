use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Caller lacks the required role, ownership or approval")]
    Unauthorized,

    #[msg("Event is sold out")]
    CapacityExceeded,

    #[msg("Ticket is expired or already used")]
    TicketUnusable,

    #[msg("Ticket has already been used")]
    AlreadyUsed,

    #[msg("Ticket validity window has passed")]
    TicketExpired,

    #[msg("Listing is not active")]
    NotListed,

    #[msg("Bid does not exceed the current highest amount")]
    BidTooLow,

    #[msg("No bid has been placed on this listing")]
    NoBid,

    #[msg("Token delegate approval missing or below the required amount")]
    InsufficientAllowance,

    #[msg("Recipient must not be the zero address")]
    InvalidRecipient,

    #[msg("Refund account for the displaced bidder was not supplied")]
    MissingRefundAccount,

    #[msg("Name exceeds the maximum length")]
    NameTooLong,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
