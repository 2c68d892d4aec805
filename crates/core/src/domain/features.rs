use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Model input, in the order the artifact expects: (hour, day, month, year).
///
/// `hour` is not wrapped into 0..24. Lookahead vectors built with [`FeatureVector::shifted_hours`]
/// keep the same calendar day and may carry hours up to 28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl FeatureVector {
    pub const LEN: usize = 4;
    pub const NAMES: [&'static str; Self::LEN] = ["hour", "day", "month", "year"];

    pub fn from_datetime(at: &NaiveDateTime) -> Self {
        Self {
            hour: at.hour(),
            day: at.day(),
            month: at.month(),
            year: at.year(),
        }
    }

    pub fn shifted_hours(self, hours: u32) -> Self {
        Self {
            hour: self.hour + hours,
            ..self
        }
    }

    pub fn as_array(&self) -> [f64; Self::LEN] {
        [
            f64::from(self.hour),
            f64::from(self.day),
            f64::from(self.month),
            f64::from(self.year),
        ]
    }
}
