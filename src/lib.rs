//! A small Rust client for the Thailand SEC Fund Factsheet and Fund Daily Info APIs.
//!
//! The crate covers a `call(path, key) -> JSON` flow plus the pieces built on
//! it: enumerating factsheet endpoints and aggregating their responses,
//! filtering fund lists, and writing JSON/CSV output.
//!
//! ## Quick start
//! - Configure authentication via environment variables (`SEC_FUND_FACTSHEET_KEY`,
//!   optionally `SEC_FUND_DAILY_INFO_KEY` and `SEC_API_URL`) or a `.secfundrc`
//!   file (supported in the current directory and in your home directory).
//! - Call [`Client::call`] with a path, or use the typed helpers such as
//!   [`Client::amcs`].
//!
//! ```no_run
//! use anyhow::Result;
//! use secfund::{Client, collect, factsheet_endpoints};
//!
//! fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!     let endpoints = factsheet_endpoints("M0570_2565");
//!     let agg = collect(&client, &endpoints, client.factsheet_key(), false);
//!     println!("{} of {} sections fetched", agg.succeeded(), agg.attempted);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod aggregate;
mod client;
pub mod commands;
mod config;
mod endpoint;
mod error;
pub mod export;
mod factsheet;
pub mod funds;
pub mod logging;
pub mod report;
mod util;

pub use aggregate::{Aggregation, Failure, Fetch, collect};
pub use client::{Client, ClientConfig, SUBSCRIPTION_KEY_HEADER};
pub use config::Overrides;
pub use endpoint::{Endpoint, amc_list, daily_nav, factsheet_endpoints, fund_assets, funds_by_amc};
pub use error::ApiError;
pub use util::{mask_key, timestamped_filename};
