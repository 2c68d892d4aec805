use askama::Template;
use serde::Serialize;
use wattcast_core::charts::{DAILY_GRAPH, MONTHLY_GRAPH, WEEKLY_GRAPH};
use wattcast_core::domain::estimate::PriceEstimate;
use wattcast_core::domain::report::UsageReport;

pub const STATIC_PREFIX: &str = "/static";

/// Public URLs of the report charts.
#[derive(Debug, Clone, Serialize)]
pub struct ChartUrls {
    pub daily: String,
    pub weekly: String,
    pub monthly: String,
}

impl Default for ChartUrls {
    fn default() -> Self {
        Self {
            daily: format!("{STATIC_PREFIX}/{DAILY_GRAPH}"),
            weekly: format!("{STATIC_PREFIX}/{WEEKLY_GRAPH}"),
            monthly: format!("{STATIC_PREFIX}/{MONTHLY_GRAPH}"),
        }
    }
}

pub struct UpcomingPrice {
    pub hour_offset: usize,
    pub price: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub date: String,
    pub time: String,
    pub weather: String,
    pub peak_hours: String,
    pub off_peak_hours: String,
    pub current_price: String,
    pub upcoming_prices: Vec<UpcomingPrice>,
    pub notification: String,
}

impl From<&PriceEstimate> for IndexPage {
    fn from(est: &PriceEstimate) -> Self {
        Self {
            date: est.date.clone(),
            time: est.time.clone(),
            weather: est.weather.to_string(),
            peak_hours: est.peak_hours.to_string(),
            off_peak_hours: est.off_peak_hours.to_string(),
            current_price: format!("{:.2}", est.current_price),
            upcoming_prices: est
                .upcoming_prices
                .iter()
                .enumerate()
                .map(|(i, price)| UpcomingPrice {
                    hour_offset: i + 1,
                    price: format!("{price:.2}"),
                })
                .collect(),
            notification: est.notification.to_string(),
        }
    }
}

pub struct MonthlyCost {
    pub month: usize,
    pub cost: String,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage {
    pub daily_message: String,
    pub weekly_cost: String,
    pub monthly_costs: Vec<MonthlyCost>,
    pub daily_graph: String,
    pub weekly_graph: String,
    pub monthly_graph: String,
}

impl ReportPage {
    pub fn new(report: &UsageReport, charts: ChartUrls) -> Self {
        Self {
            daily_message: report.daily_message(),
            weekly_cost: report.weekly_cost_message(),
            monthly_costs: report
                .monthly_costs
                .iter()
                .enumerate()
                .map(|(i, cost)| MonthlyCost {
                    month: i + 1,
                    cost: format!("{cost:.2}"),
                })
                .collect(),
            daily_graph: charts.daily,
            weekly_graph: charts.weekly,
            monthly_graph: charts.monthly,
        }
    }
}
