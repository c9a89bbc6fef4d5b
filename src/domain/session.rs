use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::auction::AuctionType;
use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Scheduled,
    Active,
    Closed,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "Scheduled",
            SessionStatus::Active => "Active",
            SessionStatus::Closed => "Closed",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Closed | SessionStatus::Completed | SessionStatus::Cancelled
        )
    }

    /// Transitions move one way: Scheduled -> Active -> terminal. No
    /// regressions, no leaving a terminal state.
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        match self {
            SessionStatus::Scheduled => next != SessionStatus::Scheduled,
            SessionStatus::Active => next.is_terminal(),
            _ => false,
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(SessionStatus::Scheduled),
            "Active" => Ok(SessionStatus::Active),
            "Closed" => Ok(SessionStatus::Closed),
            "Completed" => Ok(SessionStatus::Completed),
            "Cancelled" => Ok(SessionStatus::Cancelled),
            other => Err(AppError::InvalidArgument(format!(
                "unknown session status {other:?}"
            ))),
        }
    }
}

/// Owner-supplied parameters for opening a bidding window on an asset.
#[derive(Clone, Debug, Deserialize)]
pub struct NewSessionRequest {
    pub asset_id: String,
    pub name: String,
    pub auction_type: AuctionType,
    pub auto_execute: bool,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reserve_price: f64,
    pub bid_increment_amount: f64,
}

/// One bidding window on one asset with one auction rule set. Bids placed on
/// the asset while this session is active are grouped under it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "sessionId")]
    pub id: String,
    pub user_fp: String,
    pub name: String,
    pub asset_id: String,
    pub created_at: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub status: SessionStatus,
    pub current_highest_bid: f64,
    pub auction_type: AuctionType,
    pub reserve_price: f64,
    pub auto_execute: bool,
    pub bid_increment_amount: f64,
}

impl Session {
    /// Validates the request and builds the session. The initial status is
    /// `Scheduled` when the window opens in the future, `Active` otherwise.
    pub fn from_request(
        id: i64,
        request: NewSessionRequest,
        user_fp: impl Into<String>,
    ) -> Result<Self, AppError> {
        if request.asset_id.is_empty() {
            return Err(AppError::InvalidArgument("asset id is required".into()));
        }
        if request.end_time <= request.start_time {
            return Err(AppError::InvalidArgument(format!(
                "end time {} must be after start time {}",
                request.end_time, request.start_time
            )));
        }
        if request.reserve_price < 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "reserve price {} must not be negative",
                request.reserve_price
            )));
        }
        if request.bid_increment_amount <= 0.0 {
            return Err(AppError::InvalidArgument(format!(
                "bid increment {} must be positive",
                request.bid_increment_amount
            )));
        }

        let now = Utc::now();
        let status = if request.start_time > now {
            SessionStatus::Scheduled
        } else {
            SessionStatus::Active
        };

        Ok(Self {
            id: id.to_string(),
            user_fp: user_fp.into(),
            name: request.name,
            asset_id: request.asset_id,
            created_at: now,
            end_time: request.end_time,
            start_time: request.start_time,
            status,
            current_highest_bid: 0.0,
            auction_type: request.auction_type,
            reserve_price: request.reserve_price,
            auto_execute: request.auto_execute,
            bid_increment_amount: request.bid_increment_amount,
        })
    }
}
