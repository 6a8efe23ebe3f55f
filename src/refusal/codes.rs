use std::fmt;
use std::str::FromStr;

/// Canonical refusal codes (v0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefusalCode {
    Io,
    Encoding,
    CsvParse,
    NoColumn,
    BadValue,
    NotMonotonic,
    Empty,
    Seed,
    Overrides,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownRefusalCode;

impl RefusalCode {
    pub const ALL: [RefusalCode; 9] = [
        RefusalCode::Io,
        RefusalCode::Encoding,
        RefusalCode::CsvParse,
        RefusalCode::NoColumn,
        RefusalCode::BadValue,
        RefusalCode::NotMonotonic,
        RefusalCode::Empty,
        RefusalCode::Seed,
        RefusalCode::Overrides,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            RefusalCode::Io => "E_IO",
            RefusalCode::Encoding => "E_ENCODING",
            RefusalCode::CsvParse => "E_CSV_PARSE",
            RefusalCode::NoColumn => "E_NO_COLUMN",
            RefusalCode::BadValue => "E_BAD_VALUE",
            RefusalCode::NotMonotonic => "E_NOT_MONOTONIC",
            RefusalCode::Empty => "E_EMPTY",
            RefusalCode::Seed => "E_SEED",
            RefusalCode::Overrides => "E_OVERRIDES",
        }
    }

    /// A short, stable reason label for human output.
    #[inline]
    pub const fn reason(self) -> &'static str {
        match self {
            RefusalCode::Io => "file read error",
            RefusalCode::Encoding => "unsupported text encoding",
            RefusalCode::CsvParse => "CSV parse failure",
            RefusalCode::NoColumn => "timestamp column missing or ambiguous",
            RefusalCode::BadValue => "non-numeric timestamp value",
            RefusalCode::NotMonotonic => "timestamps decrease",
            RefusalCode::Empty => "no event timestamps",
            RefusalCode::Seed => "first-match seed out of range",
            RefusalCode::Overrides => "overrides table unusable",
        }
    }
}

impl fmt::Display for RefusalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnknownRefusalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown refusal code")
    }
}

impl std::error::Error for UnknownRefusalCode {}

impl FromStr for RefusalCode {
    type Err = UnknownRefusalCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E_IO" => Ok(RefusalCode::Io),
            "E_ENCODING" => Ok(RefusalCode::Encoding),
            "E_CSV_PARSE" => Ok(RefusalCode::CsvParse),
            "E_NO_COLUMN" => Ok(RefusalCode::NoColumn),
            "E_BAD_VALUE" => Ok(RefusalCode::BadValue),
            "E_NOT_MONOTONIC" => Ok(RefusalCode::NotMonotonic),
            "E_EMPTY" => Ok(RefusalCode::Empty),
            "E_SEED" => Ok(RefusalCode::Seed),
            "E_OVERRIDES" => Ok(RefusalCode::Overrides),
            _ => Err(UnknownRefusalCode),
        }
    }
}
