//
//  ebay-browse
//  lib.rs
//

//! # eBay Browse API Client
//!
//! A thin Rust client for the eBay Buy Browse API.
//!
//! ## Overview
//!
//! This crate binds the Browse API's public operations (item search,
//! search-by-image, item lookup by id/legacy-id/group, and compatibility
//! checks) to an async HTTP client. It is deliberately thin: each call
//! builds a URL, headers, and (where needed) a JSON body, issues exactly
//! one request, and returns the raw [`reqwest::Response`]. Parsing and
//! HTTP status handling stay with the caller.
//!
//! ## Features
//!
//! - **Sandbox & Production**: base endpoint selected per call through an
//!   injected [`Environment`]
//! - **Lazy Credentials**: a pre-minted token, or one minted once through
//!   an [`AccessTokenProvider`] such as [`ClientCredentialsGrant`]
//! - **Affiliate Tracking**: campaign/reference ids and buyer location
//!   assembled into the `X-EBAY-C-ENDUSERCTX` header on every request
//!
//! ## Module Structure
//!
//! - [`api`]: the [`BrowseClient`] and header assembly
//! - [`auth`]: access token acquisition
//! - [`env`]: sandbox/production selection
//! - [`error`]: the crate error type
//!
//! ## Example
//!
//! ```rust,no_run
//! use ebay_browse::{BrowseClient, ClientCredentialsGrant};
//!
//! # async fn example() -> ebay_browse::Result<()> {
//! let client = BrowseClient::new("campaign-5338")?
//!     .with_country("US")
//!     .with_zip("19406")
//!     .with_token_provider(ClientCredentialsGrant::new("app-id", "cert-id")?);
//!
//! let response = client.search(&[("q", "drone"), ("limit", "3")]).await?;
//! let listings: serde_json::Value = response.json().await?;
//! # Ok(())
//! # }
//! ```

/// API client for the Browse API surface.
pub mod api;

/// Access token acquisition (OAuth client credentials grant).
pub mod auth;

/// Sandbox/production environment selection.
pub mod env;

/// Crate error type and result alias.
pub mod error;

pub use api::{BrowseClient, CompatibilityProperty, EnduserContext};
pub use api::{PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT};
pub use auth::{AccessTokenProvider, ClientCredentialsGrant};
pub use env::{Environment, Production, Sandbox};
pub use error::{Error, Result};

/// Crate version, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
