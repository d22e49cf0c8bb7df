//! Dashboard backend API access.

pub mod client;

pub use client::{ClientConfig, DashboardClient};
