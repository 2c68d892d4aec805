use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use serde::Serialize;

/// Rs per kWh.
pub const RATE_PER_KWH: f64 = 40.0;

pub const HOURLY_SAMPLES: usize = 24;
pub const DAILY_SAMPLES: usize = 14;
pub const MONTHLY_SAMPLES: usize = 6;

const HOURLY_RANGE: (f64, f64) = (10.0, 20.0);
const DAILY_RANGE: (f64, f64) = (10.0, 20.0);
const MONTHLY_RANGE: (f64, f64) = (300.0, 500.0);
const ENERGY_SAVED_RANGE: (f64, f64) = (0.0, 2.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSamples {
    /// Prices for the last 24 hours.
    pub hourly: Vec<f64>,
    /// Usage (kWh) for the last 14 days.
    pub daily: Vec<f64>,
    /// Usage (kWh) for the last 6 months.
    pub monthly: Vec<f64>,
}

impl UsageSamples {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            hourly: uniform_samples(rng, HOURLY_RANGE, HOURLY_SAMPLES),
            daily: uniform_samples(rng, DAILY_RANGE, DAILY_SAMPLES),
            monthly: uniform_samples(rng, MONTHLY_RANGE, MONTHLY_SAMPLES),
        }
    }
}

fn uniform_samples<R: Rng + ?Sized>(rng: &mut R, (low, high): (f64, f64), n: usize) -> Vec<f64> {
    let dist = Uniform::new_inclusive(low, high);
    (0..n).map(|_| dist.sample(&mut *rng)).collect()
}

pub fn weekly_cost(daily: &[f64]) -> f64 {
    daily.iter().sum::<f64>() * RATE_PER_KWH
}

pub fn monthly_costs(monthly: &[f64]) -> Vec<f64> {
    monthly.iter().map(|usage| usage * RATE_PER_KWH).collect()
}

/// Uniform in [0, 2] kWh, rounded to two decimals.
pub fn energy_saved<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let (low, high) = ENERGY_SAVED_RANGE;
    round2(rng.gen_range(low..=high))
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub samples: UsageSamples,
    pub weekly_cost: f64,
    pub monthly_costs: Vec<f64>,
    pub energy_saved_kwh: f64,
}

impl UsageReport {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let samples = UsageSamples::generate(rng);
        let energy_saved_kwh = energy_saved(rng);
        Self::from_samples(samples, energy_saved_kwh)
    }

    pub fn from_samples(samples: UsageSamples, energy_saved_kwh: f64) -> Self {
        Self {
            weekly_cost: weekly_cost(&samples.daily),
            monthly_costs: monthly_costs(&samples.monthly),
            samples,
            energy_saved_kwh,
        }
    }

    pub fn daily_message(&self) -> String {
        // Debug keeps the trailing ".0" on whole numbers.
        format!(
            "Today you saved up to {:?} KWH energy",
            self.energy_saved_kwh
        )
    }

    pub fn weekly_cost_message(&self) -> String {
        format!("Total cost for this week: Rs {:.2}", self.weekly_cost)
    }
}
