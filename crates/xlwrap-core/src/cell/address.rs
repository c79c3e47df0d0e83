//! Cell addresses, column labels and argument normalization
//!
//! Everything here is one-based: row 1 / column 1 is the top-left cell (`A1`).

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A resolved cell location (e.g. `AC55` = row 55, column 29)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1)
    pub col: u32,
}

impl CellAddress {
    /// Create a cell address from one-based coordinates
    ///
    /// # Examples
    /// ```
    /// use xlwrap_core::CellAddress;
    ///
    /// let addr = CellAddress::new(5, 2).unwrap();
    /// assert_eq!(addr.to_string(), "B5");
    /// assert!(CellAddress::new(0, 1).is_err());
    /// ```
    pub fn new(row: u32, col: u32) -> Result<Self> {
        if row == 0 || col == 0 {
            return Err(Error::InvalidAddress(format!(
                "row and column must be >= 1, got ({}, {})",
                row, col
            )));
        }
        if row > MAX_ROWS {
            return Err(Error::InvalidAddress(format!(
                "row {} exceeds the sheet limit of {}",
                row, MAX_ROWS
            )));
        }
        if col > MAX_COLS {
            return Err(Error::InvalidAddress(format!(
                "column {} exceeds the sheet limit of {}",
                col, MAX_COLS
            )));
        }
        Ok(Self { row, col })
    }

    /// Parse an A1-style reference such as `"B5"` or `"ac55"`
    ///
    /// The reference must be one or more letters followed by one or more
    /// digits, nothing else.
    ///
    /// # Examples
    /// ```
    /// use xlwrap_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("AC55").unwrap();
    /// assert_eq!((addr.row, addr.col), (55, 29));
    ///
    /// assert!(CellAddress::parse("50BB").is_err());
    /// assert!(CellAddress::parse("C-1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let split = s
            .bytes()
            .position(|b| !b.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        if digits.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "unexpected characters after row number in '{}'",
                s
            )));
        }

        let col = ColumnLabel::decode(letters)?;
        let row: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        Self::new(row, col)
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", column_letters(self.col), self.row)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Spreadsheet column letters (bijective base-26: A=1 … Z=26, AA=27)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnLabel(String);

impl ColumnLabel {
    /// Parse a label, normalizing it to uppercase
    pub fn parse(letters: &str) -> Result<Self> {
        Self::decode(letters)?;
        Ok(Self(letters.to_ascii_uppercase()))
    }

    /// Build the label for a one-based column number
    pub fn from_index(col: u32) -> Result<Self> {
        if col == 0 {
            return Err(Error::InvalidAddress("column must be >= 1".into()));
        }
        Ok(Self(column_letters(col)))
    }

    /// Column number for this label (A = 1)
    pub fn index(&self) -> u32 {
        // Validated at construction
        Self::decode(&self.0).unwrap_or(0)
    }

    /// The uppercase letters
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert letters to a column number (A = 1, Z = 26, AA = 27), case-insensitive
    pub fn decode(letters: &str) -> Result<u32> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!(
                    "invalid column letter '{}'",
                    c
                )));
            }
            let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
            col = col
                .checked_mul(26)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(|| {
                    Error::InvalidAddress(format!("column label '{}' is too long", letters))
                })?;
        }

        Ok(col)
    }
}

impl fmt::Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ColumnLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert a one-based column number to letters (1 = A, 26 = Z, 27 = AA)
fn column_letters(col: u32) -> String {
    let mut result = Vec::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        result.push(b'A' + (n % 26) as u8);
        n /= 26;
    }

    result.reverse();
    String::from_utf8(result).unwrap_or_default()
}

/// A cell location as supplied by a caller, before validation
///
/// Construct it from a reference string, a `(row, column)` pair, or a raw
/// positional argument list with [`CellTarget::from_args`]; then call
/// [`CellTarget::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellTarget {
    /// A1-style reference
    Reference(String),
    /// Numeric row and column, not yet validated
    Coordinates(i64, i64),
    /// Already resolved
    Address(CellAddress),
}

impl CellTarget {
    /// Interpret positional arguments: one reference, or a row and a column
    ///
    /// Any other count is rejected, including a third trailing value after a
    /// row and column.
    ///
    /// ```
    /// use xlwrap_core::CellTarget;
    ///
    /// assert!(CellTarget::from_args(&["B5"]).is_ok());
    /// assert!(CellTarget::from_args(&["5", "2"]).is_ok());
    /// assert!(CellTarget::from_args(&["1", "2", "3"]).is_err());
    /// ```
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        match args {
            [reference] => Ok(CellTarget::Reference(reference.as_ref().to_string())),
            [row, col] => {
                let row = parse_coordinate(row.as_ref())?;
                let col = parse_coordinate(col.as_ref())?;
                Ok(CellTarget::Coordinates(row, col))
            }
            _ => Err(Error::InvalidAddress(format!(
                "expected a cell reference or a row and column, got {} arguments",
                args.len()
            ))),
        }
    }

    /// Validate and normalize to a [`CellAddress`]
    pub fn resolve(&self) -> Result<CellAddress> {
        match self {
            CellTarget::Reference(s) => CellAddress::parse(s),
            CellTarget::Coordinates(row, col) => {
                let row = u32::try_from(*row).map_err(|_| {
                    Error::InvalidAddress(format!("row must be a positive integer, got {}", row))
                })?;
                let col = u32::try_from(*col).map_err(|_| {
                    Error::InvalidAddress(format!(
                        "column must be a positive integer, got {}",
                        col
                    ))
                })?;
                CellAddress::new(row, col)
            }
            CellTarget::Address(addr) => Ok(*addr),
        }
    }
}

fn parse_coordinate(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("'{}' is not an integer coordinate", s)))
}

impl From<&str> for CellTarget {
    fn from(s: &str) -> Self {
        CellTarget::Reference(s.to_string())
    }
}

impl From<String> for CellTarget {
    fn from(s: String) -> Self {
        CellTarget::Reference(s)
    }
}

impl From<(i64, i64)> for CellTarget {
    fn from((row, col): (i64, i64)) -> Self {
        CellTarget::Coordinates(row, col)
    }
}

impl From<CellAddress> for CellTarget {
    fn from(addr: CellAddress) -> Self {
        CellTarget::Address(addr)
    }
}

/// A column chosen by number or by letters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// One-based column number
    Index(u32),
    /// Column letters, any case
    Label(String),
}

impl ColumnRef {
    /// Resolve to a one-based column number
    pub fn resolve(&self) -> Result<u32> {
        match self {
            ColumnRef::Index(0) => Err(Error::InvalidAddress("column must be >= 1".into())),
            ColumnRef::Index(col) => Ok(*col),
            ColumnRef::Label(letters) => ColumnLabel::decode(letters),
        }
    }
}

impl From<u32> for ColumnRef {
    fn from(col: u32) -> Self {
        ColumnRef::Index(col)
    }
}

impl From<&str> for ColumnRef {
    fn from(s: &str) -> Self {
        ColumnRef::Label(s.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(s: String) -> Self {
        ColumnRef::Label(s)
    }
}

impl From<ColumnLabel> for ColumnRef {
    fn from(label: ColumnLabel) -> Self {
        ColumnRef::Label(label.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolve(target: impl Into<CellTarget>) -> Result<(u32, u32)> {
        target.into().resolve().map(|a| (a.row, a.col))
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(2), "B");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(28), "AB");
        assert_eq!(column_letters(702), "ZZ");
        assert_eq!(column_letters(703), "AAA");
        assert_eq!(column_letters(16384), "XFD");
    }

    #[test]
    fn test_decode_column() {
        assert_eq!(ColumnLabel::decode("A").unwrap(), 1);
        assert_eq!(ColumnLabel::decode("Z").unwrap(), 26);
        assert_eq!(ColumnLabel::decode("AA").unwrap(), 27);
        assert_eq!(ColumnLabel::decode("AC").unwrap(), 29);
        assert_eq!(ColumnLabel::decode("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(ColumnLabel::decode("b").unwrap(), 2);
        assert_eq!(ColumnLabel::decode("aA").unwrap(), 27);

        assert!(ColumnLabel::decode("").is_err());
        assert!(ColumnLabel::decode("A1").is_err());
        assert!(ColumnLabel::decode("ZZZZZZZZ").is_err()); // overflows u32
    }

    #[test]
    fn test_column_label() {
        let label = ColumnLabel::parse("ac").unwrap();
        assert_eq!(label.as_str(), "AC");
        assert_eq!(label.index(), 29);
        assert_eq!(ColumnLabel::from_index(27).unwrap().to_string(), "AA");
        assert!(ColumnLabel::from_index(0).is_err());
    }

    #[test]
    fn test_resolve_references() {
        assert_eq!(resolve("A1").unwrap(), (1, 1));
        assert_eq!(resolve("B5").unwrap(), (5, 2));
        assert_eq!(resolve("AA1").unwrap(), (1, 27));
        assert_eq!(resolve("AC55").unwrap(), (55, 29));
        assert_eq!(resolve("ac55").unwrap(), (55, 29));
        assert_eq!(resolve("XFD1048576").unwrap(), (1048576, 16384));
    }

    #[test]
    fn test_resolve_reference_errors() {
        for bad in ["50BB", "", "C-1", "11", "CB", "1C", "A0", "B5C", " B5", "A1048577", "XFE1"] {
            assert!(
                matches!(resolve(bad), Err(Error::InvalidAddress(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resolve_coordinates() {
        assert_eq!(resolve((2, 2)).unwrap(), (2, 2));
        assert_eq!(resolve((10, 27)).unwrap(), (10, 27));
        assert!(matches!(resolve((0, 1)), Err(Error::InvalidAddress(_))));
        assert!(matches!(resolve((1, -3)), Err(Error::InvalidAddress(_))));
        assert!(matches!(resolve((-1, 1)), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_from_args_arity() {
        assert_eq!(
            CellTarget::from_args(&["C5"]).unwrap(),
            CellTarget::Reference("C5".into())
        );
        assert_eq!(
            CellTarget::from_args(&["5", "3"]).unwrap(),
            CellTarget::Coordinates(5, 3)
        );

        let empty: [&str; 0] = [];
        assert!(CellTarget::from_args(&empty).is_err());
        assert!(CellTarget::from_args(&["1", "2", "3"]).is_err());
        assert!(CellTarget::from_args(&["one", "2"]).is_err());
        assert!(CellTarget::from_args(&["wrong"]).unwrap().resolve().is_err());
    }

    #[test]
    fn test_column_ref() {
        assert_eq!(ColumnRef::from(2).resolve().unwrap(), 2);
        assert_eq!(ColumnRef::from("B").resolve().unwrap(), 2);
        assert_eq!(ColumnRef::from("b").resolve().unwrap(), 2);
        assert!(ColumnRef::from(0).resolve().is_err());
        assert!(ColumnRef::from("B2").resolve().is_err());
    }

    #[test]
    fn test_cell_address_display() {
        assert_eq!(CellAddress::new(1, 1).unwrap().to_string(), "A1");
        assert_eq!(CellAddress::new(100, 3).unwrap().to_string(), "C100");
        assert_eq!(CellAddress::new(55, 29).unwrap().to_a1_string(), "AC55");
    }

    proptest! {
        #[test]
        fn label_round_trips(label in "[A-Za-z]{1,6}") {
            let col = ColumnLabel::decode(&label).unwrap();
            let encoded = ColumnLabel::from_index(col).unwrap();
            prop_assert_eq!(encoded.as_str(), label.to_ascii_uppercase());
        }

        #[test]
        fn address_round_trips(row in 1u32..=1_048_576, col in 1u32..=16_384) {
            let addr = CellAddress::new(row, col).unwrap();
            prop_assert_eq!(CellAddress::parse(&addr.to_string()).unwrap(), addr);
        }
    }
}
