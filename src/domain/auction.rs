use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Bidding rule set attached to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionType {
    /// Ascending: each accepted bid must top the current highest by at least
    /// the session's increment. Highest bidder at `end_time` wins.
    EnglishAuction,
    /// Price starts high and drops until a bidder accepts it.
    DutchAuction,
    /// Bids are private until the session closes; highest wins.
    SealedAuction,
    /// Sealed, highest bidder wins and pays their own bid.
    FirstPriceSealedAuction,
    /// Asset sells at a set price, no competitive bidding.
    FixedPriceAuction,
}

impl AuctionType {
    pub const ALL: [AuctionType; 5] = [
        AuctionType::EnglishAuction,
        AuctionType::DutchAuction,
        AuctionType::SealedAuction,
        AuctionType::FirstPriceSealedAuction,
        AuctionType::FixedPriceAuction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionType::EnglishAuction => "EnglishAuction",
            AuctionType::DutchAuction => "DutchAuction",
            AuctionType::SealedAuction => "SealedAuction",
            AuctionType::FirstPriceSealedAuction => "FirstPriceSealedAuction",
            AuctionType::FixedPriceAuction => "FixedPriceAuction",
        }
    }
}

impl std::fmt::Display for AuctionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuctionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuctionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown auction type {s:?}")))
    }
}
