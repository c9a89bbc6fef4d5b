use thiserror::Error;

/// Error kinds that may surface from the core. The gRPC layer maps these onto
/// status codes; internal details (SQL states, decode errors) stay server-side.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("missing caller identity")]
    Unauthenticated,

    #[error("no active session for asset {0}")]
    NoActiveSession(String),

    /// Core invariant 1 is broken: more than one session on the asset still
    /// has `end_time` in the future. A server-side bug, not a caller error.
    #[error("found {count} overlapping active sessions for asset {asset_id}")]
    ActiveSessionInvariant { asset_id: String, count: usize },

    #[error("{0} not found")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("queue error: {0}")]
    Queue(#[from] redis::RedisError),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("operation cancelled")]
    Cancelled,
}

/// Sentinel returned alongside successfully decoded rows when a paginated read
/// hits rows it cannot map. Callers keep the good rows and surface the count.
#[derive(Error, Debug)]
#[error("skipped {skip_count} undecodable rows (last error: {source})")]
pub struct RowScanError {
    pub skip_count: u64,
    #[source]
    pub source: sqlx::Error,
}
