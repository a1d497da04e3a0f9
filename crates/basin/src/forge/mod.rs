//! Code-forge source: client, wire types, and conversions.

mod client;
pub mod convert;
pub mod types;

pub use client::ForgeClient;
