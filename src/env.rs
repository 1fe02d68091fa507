//
//  ebay-browse
//  env.rs
//

//! # Environment Selection
//!
//! eBay exposes two complete API environments: a sandbox for integration
//! testing and the live production environment. The client consults an
//! injected [`Environment`] on every URL build, so the mode is never cached
//! and swapping the source (or a test fake) between two calls changes the
//! resulting base endpoint.

/// Capability that reports whether requests should target the sandbox.
///
/// Implemented by the unit types [`Production`] and [`Sandbox`] for the
/// common fixed cases. Tests inject fakes backed by an `AtomicBool` to
/// flip the mode between calls.
pub trait Environment: Send + Sync {
    /// Returns `true` if requests should go to the sandbox environment.
    fn is_sandbox(&self) -> bool;
}

/// The live eBay API environment. This is the default for new clients.
#[derive(Debug, Clone, Copy, Default)]
pub struct Production;

impl Environment for Production {
    fn is_sandbox(&self) -> bool {
        false
    }
}

/// The eBay sandbox environment for integration testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sandbox;

impl Environment for Sandbox {
    fn is_sandbox(&self) -> bool {
        true
    }
}
