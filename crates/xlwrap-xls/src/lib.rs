//! # xlwrap-xls
//!
//! Read-only XLS (BIFF8) backend for xlwrap.
//!
//! This crate handles the legacy Excel binary format (.xls): the CFB
//! container, the BIFF8 record stream, and the cell records that carry
//! values. Formatting records are skipped.

pub mod biff;
pub mod book;
pub mod error;
pub mod reader;

pub use book::XlsBook;
pub use error::{XlsError, XlsResult};
pub use reader::XlsReader;
