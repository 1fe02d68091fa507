//
//  ebay-browse
//  api/mod.rs
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the eBay Buy Browse API.
//!
//! ## Architecture
//!
//! - [`browse`]: the [`BrowseClient`] and its operations
//! - [`context`]: assembly of the `X-EBAY-C-ENDUSERCTX` affiliate header
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ebay_browse::{BrowseClient, Sandbox};
//!
//! # async fn example() -> ebay_browse::Result<()> {
//! let client = BrowseClient::new("campaign-5338")?
//!     .with_environment(Sandbox)
//!     .with_access_token("v^1.1#...");
//!
//! let response = client.search(&[("q", "drone"), ("limit", "3")]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Operations return the raw [`reqwest::Response`]; only construction,
//! credential, and transport failures surface as [`Error`](crate::Error)
//! variants. HTTP status interpretation belongs to the caller.

/// Browse API client and operations.
pub mod browse;

/// End-user context header assembly.
pub mod context;

pub use browse::{BrowseClient, CompatibilityProperty, PRODUCTION_ENDPOINT, SANDBOX_ENDPOINT};
pub use context::EnduserContext;
