//! Text rendering of pricing outputs
//!
//! Read-only consumers of engine results: histograms of terminal prices and
//! payoffs, the convergence table and sensitivity sweeps.

use std::fmt::Write;

use crate::analysis::SensitivitySweep;
use crate::pricing::{ConvergenceTrace, PricingRun, SummaryStatistics};

/// Fixed-width histogram over a sample
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets spanning [min, max].
    ///
    /// Returns `None` for an empty sample or zero bins.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }

        let lower = values.iter().copied().fold(f64::INFINITY, f64::min);
        let upper = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let width = (upper - lower) / bins as f64;

        let mut counts = vec![0; bins];
        for &v in values {
            let idx = if width > 0.0 {
                (((v - lower) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }

        Some(Self {
            lower,
            upper,
            counts,
        })
    }

    pub fn bin_width(&self) -> f64 {
        (self.upper - self.lower) / self.counts.len() as f64
    }

    /// Lower edge of bin `i`
    pub fn bin_start(&self, i: usize) -> f64 {
        self.lower + i as f64 * self.bin_width()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Horizontal bar chart, longest bar `width` characters
    pub fn render(&self, width: usize) -> String {
        let peak = self.counts.iter().copied().max().unwrap_or(0).max(1);
        let mut out = String::new();

        for (i, &count) in self.counts.iter().enumerate() {
            let bar = count * width / peak;
            let _ = writeln!(
                out,
                "{:>10.2} | {:<width$} {}",
                self.bin_start(i),
                "#".repeat(bar),
                count,
                width = width
            );
        }
        out
    }
}

/// Headline price and statistics of a run
pub fn render_run(run: &PricingRun, summary: &SummaryStatistics) -> String {
    let p = &run.params;
    let mut out = String::new();

    let _ = writeln!(out, "European {} Option Price: ${:.4}", p.option_type, run.price());
    let (lo, hi) = run.estimate.confidence_interval(1.96);
    if lo.is_finite() && hi.is_finite() {
        let _ = writeln!(out, "  95% CI:               [${:.4}, ${:.4}]", lo, hi);
    }
    let _ = writeln!(out, "  Simulations:          {}", summary.sample_size);
    let _ = writeln!(out, "  Mean Final Price:     ${:.2}", summary.mean_terminal_price);
    let _ = writeln!(out, "  Std Dev Final Prices: ${:.2}", summary.std_terminal_price);
    let _ = writeln!(out, "  Prob. In-The-Money:   {:.1}%", summary.prob_itm * 100.0);
    let _ = writeln!(out, "  Expire Worthless:     {:.1}%", summary.zero_payoff_fraction * 100.0);
    out
}

/// One line per sample size, with the error against `reference` if given
pub fn render_convergence(trace: &ConvergenceTrace, reference: Option<f64>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>12} | {:>12} | {:>10} | {:>10}", "Simulations", "Price", "Std Err", "Error");
    let _ = writeln!(out, "{}", "-".repeat(53));

    for point in &trace.points {
        let est = &point.estimate;
        let error = reference
            .map(|r| format!("{:+.4}", est.value - r))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>12} | {:>12.4} | {:>10.4} | {:>10}",
            point.sample_size, est.value, est.standard_error, error
        );
    }
    out
}

/// Input and price per sweep point
pub fn render_sweep(sweep: &SensitivitySweep) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>12} | {:>12}", sweep.parameter, "Price");
    let _ = writeln!(out, "{}", "-".repeat(27));
    for point in &sweep.points {
        let _ = writeln!(out, "{:>12.4} | {:>12.4}", point.input, point.estimate.value);
    }
    if let Some(pct) = sweep.price_change_pct() {
        let _ = writeln!(out, "Change first to last: {:+.1}%", pct);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PricingParameters, DEFAULT_SAMPLE_SIZES};
    use crate::models::sampler::seeded_rng;
    use crate::pricing::{analyze_convergence, price_option};

    #[test]
    fn test_histogram_counts() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0, 2.0];
        let h = Histogram::from_values(&values, 4).unwrap();

        assert_eq!(h.total(), 6);
        assert_eq!(h.counts, vec![1, 1, 1, 3]);
        assert_eq!(h.bin_width(), 0.5);
        assert_eq!(h.bin_start(2), 1.0);
    }

    #[test]
    fn test_histogram_degenerate() {
        assert!(Histogram::from_values(&[], 10).is_none());
        assert!(Histogram::from_values(&[1.0], 0).is_none());

        let h = Histogram::from_values(&[3.0, 3.0, 3.0], 5).unwrap();
        assert_eq!(h.counts[0], 3);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn test_render_outputs() {
        let params = PricingParameters::call(185.40, 185.0, 0.25, 0.045, 0.283).unwrap();
        let mut rng = seeded_rng(Some(42));
        let run = price_option(&params, 5000, &mut rng).unwrap();
        let summary = run.summary().unwrap();

        let text = render_run(&run, &summary);
        assert!(text.contains("European call Option Price"));
        assert!(text.contains("Prob. In-The-Money"));

        let h = Histogram::from_values(&run.terminal_prices, 20).unwrap();
        assert_eq!(h.render(40).lines().count(), 20);

        let trace = analyze_convergence(&params, &DEFAULT_SAMPLE_SIZES[..3], &mut rng).unwrap();
        let table = render_convergence(&trace, Some(11.6));
        assert_eq!(table.lines().count(), 5);
    }
}
