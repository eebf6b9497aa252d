//! Email delivery adapters

pub mod client;

pub use client::EmailClient;
