#![doc = include_str!("../README.md")]

pub mod cef;
pub mod dialer;
pub mod error;
pub mod priority;
pub mod writer;

pub use cef::{CefRecord, Extensions, escape_extension, escape_header};
pub use dialer::{Connection, Dialer, NetConnection, NetDialer, Network};
pub use error::CefSyslogError;
pub use priority::{Facility, Priority, Severity};
pub use writer::{SyslogWriter, WriterOptions};
