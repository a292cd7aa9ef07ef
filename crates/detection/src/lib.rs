#![doc = include_str!("../README.md")]

pub mod detection;
pub mod error;
pub mod forwarder;
pub mod reporter;
pub mod set;

pub use detection::Detection;
pub use error::DetectionError;
pub use forwarder::{BatchReport, DryRunSink, Forwarder};
pub use reporter::Reporter;
pub use set::DetectionSet;
