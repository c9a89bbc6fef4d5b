pub mod auction;
pub mod bid;
pub mod session;

pub use auction::AuctionType;
pub use bid::{Bid, BidStatus};
pub use session::{NewSessionRequest, Session, SessionStatus};
