use crate::domain::features::FeatureVector;
use crate::domain::weather::Weather;
use crate::predict::PricePredictor;
use anyhow::Context;
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

pub const LOOKAHEAD_HOURS: u32 = 5;

pub const NOTIFICATIONS: [&str; 3] = [
    "You can use AC from 22 hours",
    "Switch to solar energy from 14 hours to 18 hours",
    "Charge your vehicle at 23 hours",
];

const PEAK_START: RangeInclusive<u32> = 12..=16;
const PEAK_END: RangeInclusive<u32> = 17..=22;
const OFF_PEAK_START: RangeInclusive<u32> = 0..=5;
const OFF_PEAK_END: RangeInclusive<u32> = 6..=11;

/// Display-only hour window; start and end are drawn independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    fn random<R: Rng + ?Sized>(
        rng: &mut R,
        start: RangeInclusive<u32>,
        end: RangeInclusive<u32>,
    ) -> Self {
        Self {
            start: rng.gen_range(start),
            end: rng.gen_range(end),
        }
    }
}

impl fmt::Display for HourRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceEstimate {
    pub date: String,
    pub time: String,
    pub weather: Weather,
    pub peak_hours: HourRange,
    pub off_peak_hours: HourRange,
    pub current_price: f64,
    pub upcoming_prices: Vec<f64>,
    pub notification: &'static str,
}

pub fn estimate<R: Rng + ?Sized>(
    now: NaiveDateTime,
    predictor: &dyn PricePredictor,
    rng: &mut R,
) -> anyhow::Result<PriceEstimate> {
    let features = FeatureVector::from_datetime(&now);

    let peak_hours = HourRange::random(rng, PEAK_START, PEAK_END);
    let off_peak_hours = HourRange::random(rng, OFF_PEAK_START, OFF_PEAK_END);

    let current_price = predictor
        .predict(&features)
        .context("current price prediction failed")?;

    let upcoming_prices = (1..=LOOKAHEAD_HOURS)
        .map(|offset| {
            predictor
                .predict(&features.shifted_hours(offset))
                .with_context(|| format!("price prediction failed for hour +{offset}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let notification = NOTIFICATIONS
        .choose(rng)
        .copied()
        .unwrap_or(NOTIFICATIONS[0]);

    let weather = Weather::for_month_abbrev(&now.format("%b").to_string());

    Ok(PriceEstimate {
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M:%S").to_string(),
        weather,
        peak_hours,
        off_peak_hours,
        current_price,
        upcoming_prices,
        notification,
    })
}
