use plotters::prelude::*;
use serde::Serialize;

const CHART_SIZE: (u32, u32) = (640, 480);
const HISTOGRAM_BINS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Equal-width bins over [min, max] of the finite values; the last bin is closed on the right.
/// A zero-width range is widened by 0.5 on each side.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut min, mut max) = finite
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

pub(super) fn hourly_histogram(values: &[f64]) -> anyhow::Result<String> {
    let bins = histogram_bins(values, HISTOGRAM_BINS);
    let (x_min, x_max) = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) => (first.lower, last.upper),
        _ => (0.0, 1.0),
    };
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(0);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Electricity Pricing (Last 24 hours)", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0u32..max_count + 1)?;

        chart
            .configure_mesh()
            .x_desc("Hours")
            .y_desc("Price (Rs)")
            .draw()?;

        chart.draw_series(bins.iter().map(|b| {
            Rectangle::new([(b.lower, 0), (b.upper, b.count)], BLUE.mix(0.8).filled())
        }))?;

        root.present()?;
    }
    Ok(svg)
}

pub(super) fn daily_line(values: &[f64]) -> anyhow::Result<String> {
    let (y_min, y_max) = padded_bounds(values);
    let x_max = values.len().saturating_sub(1).max(1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Electricity Usage (Last 14 days)", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Days")
            .y_desc("Usage (KWH)")
            .draw()?;

        chart.draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            &BLUE,
        ))?;

        root.present()?;
    }
    Ok(svg)
}

pub(super) fn monthly_bars(values: &[f64]) -> anyhow::Result<String> {
    let y_max = values.iter().copied().fold(0.0_f64, f64::max).max(1.0) * 1.1;
    let x_max = values.len().max(1) as f64 + 0.5;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Electricity Usage (Last 6 months)", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0.5f64..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Months")
            .y_desc("Usage (KWH)")
            .draw()?;

        // Months are numbered from 1.
        chart.draw_series(values.iter().enumerate().map(|(i, v)| {
            let x = (i + 1) as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *v)], BLUE.filled())
        }))?;

        root.present()?;
    }
    Ok(svg)
}

fn padded_bounds(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bins_cover_min_to_max() {
        let values: Vec<f64> = (0..=24).map(|i| 10.0 + i as f64).collect();
        let bins = histogram_bins(&values, 24);
        assert_eq!(bins.len(), 24);
        assert_eq!(bins[0].lower, 10.0);
        assert_eq!(bins[23].upper, 34.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 25);
    }

    #[test]
    fn max_value_lands_in_last_bin() {
        let bins = histogram_bins(&[0.0, 1.0, 2.0, 4.0], 4);
        let counts: Vec<u32> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 1]);

        let bins = histogram_bins(&[0.0, 4.0, 4.0], 2);
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn degenerate_range_is_widened() {
        let bins = histogram_bins(&[5.0, 5.0, 5.0], 2);
        assert_eq!(bins[0].lower, 4.5);
        assert_eq!(bins[1].upper, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u32>(), 3);
    }

    #[test]
    fn empty_input_gives_no_bins() {
        assert!(histogram_bins(&[], 24).is_empty());
        assert!(histogram_bins(&[f64::NAN], 24).is_empty());
        assert!(histogram_bins(&[1.0], 0).is_empty());
    }

    #[test]
    fn padded_bounds_handles_flat_and_empty_series() {
        assert_eq!(padded_bounds(&[]), (0.0, 1.0));
        assert_eq!(padded_bounds(&[3.0, 3.0]), (2.5, 3.5));
    }
}
