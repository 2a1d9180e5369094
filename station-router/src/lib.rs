//! Station router.
//!
//! A caching and query-batching layer in front of an external routing
//! engine. Stations are registered once, snapped to the road network, and
//! then referenced by index when asking for travel-duration rows from an
//! arbitrary origin.

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod query;
pub mod registry;
pub mod router;
pub mod web;

#[cfg(test)]
mod test_support;
