//! Cell value types

use std::fmt;
use std::sync::Arc;

use super::CellError;

/// The value stored in a cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank cell
    #[default]
    Empty,

    Boolean(bool),

    /// Every number, dates included as serial numbers
    Number(f64),

    /// Text; cells loaded from the same shared-string entry share the allocation
    String(Arc<str>),

    Error(CellError),

    /// Formula text (`=B1*2`, or empty when the file keeps only the result)
    /// and the result cached by the application that last saved the file
    Formula {
        text: String,
        cached_value: Option<Box<CellValue>>,
    },
}

impl CellValue {
    pub fn string<S: AsRef<str>>(text: S) -> Self {
        CellValue::String(Arc::from(text.as_ref()))
    }

    pub fn formula<S: Into<String>>(text: S, cached_value: Option<CellValue>) -> Self {
        CellValue::Formula {
            text: text.into(),
            cached_value: cached_value.map(Box::new),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// The form every read path returns. Blank cells render as `""`, integral
/// numbers drop the fraction, formulas show their cached result and fall
/// back to their text.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::String(text) => f.write_str(text),
            CellValue::Error(error) => f.write_str(error.as_str()),
            CellValue::Formula {
                cached_value: Some(cached),
                ..
            } => write!(f, "{}", cached),
            CellValue::Formula { text, .. } => f.write_str(text),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::string(text)
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::String(Arc::from(text))
    }
}

impl From<CellError> for CellValue {
    fn from(error: CellError) -> Self {
        CellValue::Error(error)
    }
}
