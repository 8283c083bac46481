//! Rate-limit-aware access to the GitHub REST API.
//!
//! [`ApiClient`] is the single point through which every stage talks to the
//! remote API; it owns the throttle contract. Response classification and
//! backoff computation live in [`classify`] as pure functions so they can be
//! tested without network I/O.

pub mod classify;
mod client;
mod outcome;

pub use client::ApiClient;
pub use outcome::FetchOutcome;
