//! Client SDK for the Same Day Solutions POS partner API.
//!
//! The partner authenticates every call with an HMAC-SHA256 signature over
//! the request body and a millisecond timestamp (see [`signature`]). The
//! [`client`] module dispatches signed requests, [`objects`] holds the wire
//! and dashboard-facing types, and [`mapper`] converts between the two.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod mapper;
pub mod objects;
pub mod signature;
