//! Text handling options shared by parsers.

use serde::{Deserialize, Serialize};

/// Which ends of the input a parser trims before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    /// Trim both ends.
    #[default]
    Both,
    Start,
    End,
    /// Leave the text as typed.
    None,
}

impl TrimMode {
    pub fn apply<'a>(&self, text: &'a str) -> &'a str {
        match self {
            Self::Both => text.trim(),
            Self::Start => text.trim_start(),
            Self::End => text.trim_end(),
            Self::None => text,
        }
    }
}

impl From<bool> for TrimMode {
    fn from(trim: bool) -> Self {
        if trim { Self::Both } else { Self::None }
    }
}

/// Case conversion applied as the last text cleanup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseConversion {
    Upper,
    Lower,
}

impl CaseConversion {
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
        }
    }
}

/// Year/month/day order of a short date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateOrder {
    Dmy,
    Mdy,
    Ymd,
    Ydm,
}

impl DateOrder {
    /// Index of the year, month and day within the three captured parts.
    pub fn positions(&self) -> (usize, usize, usize) {
        match self {
            Self::Dmy => (2, 1, 0),
            Self::Mdy => (2, 0, 1),
            Self::Ymd => (0, 1, 2),
            Self::Ydm => (0, 2, 1),
        }
    }

    pub fn year_first(&self) -> bool {
        matches!(self, Self::Ymd | Self::Ydm)
    }
}

impl std::str::FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dmy" => Ok(Self::Dmy),
            "mdy" => Ok(Self::Mdy),
            "ymd" => Ok(Self::Ymd),
            "ydm" => Ok(Self::Ydm),
            other => Err(format!("unknown date order \"{other}\"")),
        }
    }
}
