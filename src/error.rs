//
//  ebay-browse
//  error.rs
//

//! # Error Types
//!
//! Unified error type for all Browse API client operations.
//!
//! The taxonomy is deliberately small: this crate performs no retry, no
//! wrapping of transport failures, and no interpretation of HTTP status
//! codes or response bodies. Anything the eBay API itself reports (4xx,
//! 5xx, error payloads) reaches the caller inside the raw
//! [`reqwest::Response`] and is theirs to handle.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by the Browse API client.
///
/// # Variants
///
/// | Variant | When |
/// |---------|------|
/// | `Configuration` | Invalid client configuration (missing campaign id) |
/// | `NotImplemented` | A shopping-cart placeholder operation was called |
/// | `Credential` | Access token minting failed |
/// | `Transport` | The underlying HTTP call failed (network, timeout, TLS) |
///
/// # Example
///
/// ```rust
/// use ebay_browse::{BrowseClient, Error};
///
/// match BrowseClient::new("") {
///     Err(Error::Configuration(reason)) => eprintln!("bad config: {}", reason),
///     _ => unreachable!("an empty campaign id never constructs a client"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The client was constructed with invalid configuration.
    ///
    /// Raised when the affiliate campaign id is missing or empty. The
    /// campaign id is a required identity for affiliate tracking and every
    /// request depends on it, so construction fails fast instead of
    /// deferring the problem to the first request.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The operation is a permanent placeholder.
    ///
    /// The shopping-cart operations (`add_item`, `get_shopping_cart`,
    /// `remove_item`, `update_quantity`) always return this variant and
    /// never attempt a network call. Callers must treat it as permanently
    /// unavailable, not transient.
    #[error("Operation not implemented: {0}")]
    NotImplemented(&'static str),

    /// Access token minting failed.
    ///
    /// Propagated unmodified from the token provider. The failure is not
    /// cached: the next call that needs a token will mint again.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The underlying HTTP transport failed.
    ///
    /// Converted automatically from [`reqwest::Error`] and passed through
    /// without classification or retry.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
