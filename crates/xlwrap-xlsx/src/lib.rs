//! # xlwrap-xlsx
//!
//! XLSX and XLSM (Office Open XML) backend for xlwrap.
//!
//! Cell values, shared strings and cached formula results are read and
//! written; styles are replaced by a minimal default stylesheet on save.
//! Macro-enabled packages keep their `vbaProject.bin` byte for byte.

pub mod book;
pub mod error;
pub mod reader;
pub mod writer;

pub use book::XlsxBook;
pub use error::{XlsxError, XlsxResult};
pub use reader::{XlsxPackage, XlsxReader};
pub use writer::XlsxWriter;
