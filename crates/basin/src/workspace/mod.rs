//! Documentation-workspace source: client, wire types, and conversions.

mod client;
mod convert;
pub mod types;

pub use client::WorkspaceClient;
