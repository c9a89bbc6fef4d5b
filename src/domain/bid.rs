use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "ACCEPTED")]
    Accepted,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "PENDING",
            BidStatus::Accepted => "ACCEPTED",
            BidStatus::Rejected => "REJECTED",
        }
    }
}

impl std::str::FromStr for BidStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BidStatus::Pending),
            "ACCEPTED" => Ok(BidStatus::Accepted),
            "REJECTED" => Ok(BidStatus::Rejected),
            other => Err(AppError::InvalidArgument(format!(
                "unknown bid status {other:?}"
            ))),
        }
    }
}

/// One offer to pay `amount` for an asset, valid until `last_until`.
/// Immutable once written; the id is assigned at intake and survives every
/// durable write unchanged. The JSON form below is also the queue wire format.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde(rename = "bidId")]
    pub id: i64,
    pub amount: f64,
    pub quantity: f64,
    pub symbol: String,
    pub asset_id: String,
    pub status: BidStatus,
    pub accepted: bool,
    #[serde(rename = "placedBy")]
    pub user_fp: String,
    pub asset_owner: String,
    pub placed_at: DateTime<Utc>,
    pub last_until: DateTime<Utc>,
    pub session_id: i64,
}

impl Bid {
    /// Builds a pending bid stamped with the server clock. Fails iff the
    /// expiry does not lie strictly after the placement time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        user_fp: impl Into<String>,
        amount: f64,
        quantity: f64,
        asset_id: impl Into<String>,
        asset_owner: impl Into<String>,
        last_until: DateTime<Utc>,
        session_id: i64,
    ) -> Result<Self, AppError> {
        let placed_at = Utc::now();
        if last_until <= placed_at {
            return Err(AppError::InvalidArgument(format!(
                "lasting time {last_until} is already in the past"
            )));
        }
        let asset_id = asset_id.into();
        Ok(Self {
            id,
            amount,
            quantity,
            symbol: asset_id.clone(),
            asset_id,
            status: BidStatus::Pending,
            accepted: false,
            user_fp: user_fp.into(),
            asset_owner: asset_owner.into(),
            placed_at,
            last_until,
            session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn mk_bid(last_until: DateTime<Utc>) -> Result<Bid, AppError> {
        Bid::new(42, "u1", 5.0, 1.0, "asset-a", "owner-a", last_until, 7)
    }

    #[test]
    fn new_bid_is_pending_and_unaccepted() {
        let bid = mk_bid(Utc::now() + Duration::minutes(5)).unwrap();
        assert_eq!(bid.status, BidStatus::Pending);
        assert!(!bid.accepted);
        assert_eq!(bid.id, 42);
        assert_eq!(bid.symbol, "asset-a");
        assert!(bid.last_until > bid.placed_at);
    }

    #[test]
    fn expiry_in_the_past_is_rejected() {
        assert!(mk_bid(Utc::now() - Duration::seconds(1)).is_err());
    }

    #[test]
    fn expiry_equal_to_now_is_rejected() {
        // placed_at is taken after the argument, so "now" is already stale.
        assert!(mk_bid(Utc::now()).is_err());
    }

    #[test]
    fn queue_json_uses_wire_field_names() {
        let bid = mk_bid(Utc::now() + Duration::minutes(1)).unwrap();
        let json = serde_json::to_value(&bid).unwrap();
        assert_eq!(json["bidId"], 42);
        assert_eq!(json["placedBy"], "u1");
        assert_eq!(json["assetId"], "asset-a");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["sessionId"], 7);
        let back: Bid = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, bid.id);
        assert_eq!(back.status, BidStatus::Pending);
    }
}
