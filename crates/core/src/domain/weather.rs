use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weather {
    Cold,
    Mild,
    Warm,
    Hot,
    Rainy,
}

impl Weather {
    /// Looks up the label for a three-letter month abbreviation (`Jan` .. `Dec`).
    /// Anything unrecognized maps to [`Weather::Mild`].
    pub fn for_month_abbrev(month: &str) -> Self {
        match month {
            "Jan" | "Nov" | "Dec" => Weather::Cold,
            "Feb" | "Oct" => Weather::Mild,
            "Mar" | "Sep" => Weather::Warm,
            "Apr" | "May" => Weather::Hot,
            "Jun" | "Jul" | "Aug" => Weather::Rainy,
            _ => Weather::Mild,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weather::Cold => "Cold",
            Weather::Mild => "Mild",
            Weather::Warm => "Warm",
            Weather::Hot => "Hot",
            Weather::Rainy => "Rainy",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
