#![allow(
    unreachable_pub,
    clippy::pedantic,
    clippy::needless_borrows_for_generic_args
)]

/// Files generated with [`tonic-build`] from the sources under `proto/` and
/// checked in, so builds never depend on a protobuf toolchain.
///
/// [`tonic-build`]: https://docs.rs/tonic-build
#[path = ""]
pub mod bid {
    pub mod v1 {
        include!("rfz.bid.v1.rs");
    }
}

#[path = ""]
pub mod session {
    pub mod v1 {
        include!("rfz.session.v1.rs");
    }
}
