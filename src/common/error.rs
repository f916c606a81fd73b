use std::fmt::{Debug, Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // Encoder
    EmptyData,
    CapacityExceeded,
    InvalidVersion,
    InvalidMaskPattern,
    InvalidCharacter(char),

    // Analyzer
    FinderNotFound,
    InvalidGeometry,
    FormatInfoUnreadable,
    VersionInfoUnreadable,
    UncorrectableBlock,
    MalformedSegment,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        match *self {
            // Encoder
            Self::EmptyData => f.write_str("Empty data"),
            Self::CapacityExceeded => f.write_str("Data doesn't fit in any version from 1 to 40"),
            Self::InvalidVersion => f.write_str("Invalid version"),
            Self::InvalidMaskPattern => f.write_str("Invalid masking pattern"),
            Self::InvalidCharacter(c) => write!(f, "Character {c:?} is not valid for the mode"),

            // Analyzer
            Self::FinderNotFound => f.write_str("Not enough finder patterns located"),
            Self::InvalidGeometry => f.write_str("Symbol size doesn't match any version"),
            Self::FormatInfoUnreadable => f.write_str("Neither format info copy is readable"),
            Self::VersionInfoUnreadable => f.write_str("Neither version info copy is readable"),
            Self::UncorrectableBlock => f.write_str("Too many errors to correct successfully"),
            Self::MalformedSegment => f.write_str("Malformed data segment"),
        }
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;

#[cfg(test)]
mod error_tests {
    use super::QRError;

    #[test]
    fn test_display() {
        let msg = QRError::UncorrectableBlock.to_string();
        assert_eq!(msg, "Too many errors to correct successfully");
        assert_eq!(
            QRError::InvalidCharacter('a').to_string(),
            "Character 'a' is not valid for the mode"
        );
    }
}
