pub mod event;
pub mod listing;
pub mod ticket;

pub use event::*;
pub use listing::*;
pub use ticket::*;
