//! Issue-tracker source: client, wire types, and conversions.

mod client;
mod convert;
pub mod types;

pub use client::TrackerClient;
