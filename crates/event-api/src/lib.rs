#![doc = include_str!("../README.md")]

pub mod client;
pub mod error;
pub mod query;
pub mod token;

pub use client::HubApi;
pub use error::EventApiError;
pub use query::EventQuery;
pub use token::{AccessToken, TokenSource};
