//! Error values a cell can hold

use std::fmt;

/// An Excel error value such as `#DIV/0!`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellError {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    Na,
    GettingData,
}

/// Literal and BIFF8 code of each error, in declaration order
const ERRORS: [(CellError, &str, u8); 8] = [
    (CellError::Null, "#NULL!", 0x00),
    (CellError::Div0, "#DIV/0!", 0x07),
    (CellError::Value, "#VALUE!", 0x0F),
    (CellError::Ref, "#REF!", 0x17),
    (CellError::Name, "#NAME?", 0x1D),
    (CellError::Num, "#NUM!", 0x24),
    (CellError::Na, "#N/A", 0x2A),
    (CellError::GettingData, "#GETTING_DATA", 0x2B),
];

impl CellError {
    /// The literal shown in the cell
    pub fn as_str(self) -> &'static str {
        ERRORS[self as usize].1
    }

    /// Match a literal written in an xlsx `t="e"` cell, ignoring case
    pub fn from_literal(text: &str) -> Option<Self> {
        ERRORS
            .iter()
            .find(|(_, literal, _)| literal.eq_ignore_ascii_case(text))
            .map(|&(error, _, _)| error)
    }

    /// Decode a BOOLERR or FORMULA result code; unknown codes read as `#VALUE!`
    pub fn from_code(code: u8) -> Self {
        ERRORS
            .iter()
            .find(|&&(_, _, c)| c == code)
            .map_or(CellError::Value, |&(error, _, _)| error)
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_follows_declaration_order() {
        for (position, (error, literal, _)) in ERRORS.iter().enumerate() {
            assert_eq!(*error as usize, position);
            assert_eq!(error.as_str(), *literal);
        }
    }

    #[test]
    fn test_literals_and_codes() {
        assert_eq!(CellError::from_literal("#n/a"), Some(CellError::Na));
        assert_eq!(CellError::from_literal("#DIV/0!"), Some(CellError::Div0));
        assert_eq!(CellError::from_literal("N/A"), None);

        assert_eq!(CellError::from_code(0x07), CellError::Div0);
        assert_eq!(CellError::from_code(0x2A), CellError::Na);
        assert_eq!(CellError::from_code(0xEE), CellError::Value);
        assert_eq!(CellError::GettingData.to_string(), "#GETTING_DATA");
    }
}
