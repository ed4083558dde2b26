//! Comparison of Monte Carlo prices with quoted market prices
//!
//! Input is a CSV of `Strike,Market_Price` rows for one underlying and
//! expiry. Each strike is priced by simulation with the historical
//! volatility, and the relative error against the quote is reported.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::core::{PricingError, PricingParameters, PricingResult};
use crate::models::black_scholes;
use crate::pricing::engine::{price_option, validate_inputs, MonteCarloEngine, PricingRun};

/// One quoted option price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    #[serde(rename = "Strike")]
    pub strike: f64,
    #[serde(rename = "Market_Price")]
    pub market_price: f64,
}

/// Model versus market at one strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationRow {
    #[serde(rename = "Strike")]
    pub strike: f64,
    #[serde(rename = "Market_Price")]
    pub market_price: f64,
    #[serde(rename = "MC_Price")]
    pub mc_price: f64,
    #[serde(rename = "BS_Price")]
    pub bs_price: f64,
    /// (mc - market) / market * 100
    #[serde(rename = "Error_Percent")]
    pub error_percent: f64,
}

/// Validation table plus error summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub rows: Vec<ValidationRow>,
    pub mean_abs_error_pct: f64,
    pub min_error_pct: f64,
    pub max_error_pct: f64,
}

impl ValidationReport {
    fn from_rows(rows: Vec<ValidationRow>) -> PricingResult<Self> {
        if rows.is_empty() {
            return Err(PricingError::invalid_argument(
                "validation report needs at least one row",
            ));
        }

        let n = rows.len() as f64;
        let mean_abs_error_pct = rows.iter().map(|r| r.error_percent.abs()).sum::<f64>() / n;
        let min_error_pct = rows
            .iter()
            .map(|r| r.error_percent)
            .fold(f64::INFINITY, f64::min);
        let max_error_pct = rows
            .iter()
            .map(|r| r.error_percent)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            rows,
            mean_abs_error_pct,
            min_error_pct,
            max_error_pct,
        })
    }

    /// Write the table as CSV
    pub fn write_csv<W: io::Write>(&self, writer: W) -> PricingResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_csv_file(&self, path: impl AsRef<Path>) -> PricingResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_csv(file)
    }
}

/// Read quotes from CSV with `Strike` and `Market_Price` columns
pub fn read_market_quotes<R: io::Read>(reader: R) -> PricingResult<Vec<MarketQuote>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut quotes = Vec::new();

    for record in rdr.deserialize() {
        let quote: MarketQuote = record?;
        if !(quote.strike > 0.0 && quote.market_price > 0.0) {
            tracing::warn!(
                "Skipping quote with non-positive strike or price: {:?}",
                quote
            );
            continue;
        }
        quotes.push(quote);
    }

    if quotes.is_empty() {
        return Err(PricingError::data_unavailable("no usable market quotes"));
    }
    Ok(quotes)
}

pub fn read_market_quotes_file(path: impl AsRef<Path>) -> PricingResult<Vec<MarketQuote>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_market_quotes(file)
}

fn compare<P>(
    base: &PricingParameters,
    quotes: &[MarketQuote],
    num_sims: usize,
    mut price: P,
) -> PricingResult<ValidationReport>
where
    P: FnMut(&PricingParameters) -> PricingResult<PricingRun>,
{
    if quotes.is_empty() {
        return Err(PricingError::invalid_argument("no market quotes to validate against"));
    }
    base.validate()?;

    // Every strike is checked before the generator is touched
    let scenarios: Vec<PricingParameters> =
        quotes.iter().map(|q| base.with_strike(q.strike)).collect();
    for params in &scenarios {
        validate_inputs(params, num_sims)?;
    }

    let mut rows = Vec::with_capacity(quotes.len());
    for (quote, params) in quotes.iter().zip(&scenarios) {
        let mc_price = price(params)?.price();

        rows.push(ValidationRow {
            strike: quote.strike,
            market_price: quote.market_price,
            mc_price,
            bs_price: black_scholes::price_params(params),
            error_percent: (mc_price - quote.market_price) / quote.market_price * 100.0,
        });
    }

    ValidationReport::from_rows(rows)
}

/// Price every quoted strike by Monte Carlo and compare.
///
/// `base` supplies spot, maturity, rate, volatility and option type; its
/// strike is replaced by each quote's.
pub fn validate_against_market<R: Rng + ?Sized>(
    base: &PricingParameters,
    quotes: &[MarketQuote],
    num_sims: usize,
    rng: &mut R,
) -> PricingResult<ValidationReport> {
    compare(base, quotes, num_sims, |p| price_option(p, num_sims, &mut *rng))
}

impl MonteCarloEngine {
    /// Market validation on this engine's seed and parallel settings
    pub fn validate_against_market(
        &self,
        base: &PricingParameters,
        quotes: &[MarketQuote],
        num_sims: usize,
    ) -> PricingResult<ValidationReport> {
        compare(base, quotes, num_sims, |p| self.price(p, num_sims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sampler::seeded_rng;

    const CSV: &str = "Strike,Market_Price\n265, 16.10\n270,12.85\n275 ,9.95\n280,7.45\n";

    #[test]
    fn test_read_quotes() {
        let quotes = read_market_quotes(CSV.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 4);
        assert_eq!(quotes[0], MarketQuote { strike: 265.0, market_price: 16.10 });
        assert_eq!(quotes[2].strike, 275.0);
    }

    #[test]
    fn test_read_quotes_skips_bad_rows() {
        let csv = "Strike,Market_Price\n265,16.1\n270,0\n";
        assert_eq!(read_market_quotes(csv.as_bytes()).unwrap().len(), 1);

        let csv = "Strike,Market_Price\n";
        assert!(matches!(
            read_market_quotes(csv.as_bytes()),
            Err(PricingError::DataUnavailable(_))
        ));

        let csv = "Strike,Market_Price\nabc,1.0\n";
        assert!(matches!(read_market_quotes(csv.as_bytes()), Err(PricingError::Csv(_))));
    }

    #[test]
    fn test_validation_report() {
        let base = PricingParameters::call(272.0, 270.0, 0.25, 0.045, 0.25).unwrap();
        let quotes = read_market_quotes(CSV.as_bytes()).unwrap();
        let mut rng = seeded_rng(Some(42));

        let report = validate_against_market(&base, &quotes, 20_000, &mut rng).unwrap();
        assert_eq!(report.rows.len(), 4);

        for (row, quote) in report.rows.iter().zip(&quotes) {
            assert_eq!(row.strike, quote.strike);
            let expected = (row.mc_price - row.market_price) / row.market_price * 100.0;
            assert!((row.error_percent - expected).abs() < 1e-9);
            // MC close to closed form at 20k samples
            assert!((row.mc_price - row.bs_price).abs() < 0.5);
        }

        assert!(report.min_error_pct <= report.max_error_pct);
        assert!(report.mean_abs_error_pct >= 0.0);

        let mut out = Vec::new();
        report.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Strike,Market_Price,MC_Price,BS_Price,Error_Percent"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_bad_strike_consumes_no_randomness() {
        let base = PricingParameters::call(272.0, 270.0, 0.25, 0.045, 0.25).unwrap();
        let quotes = [
            MarketQuote { strike: 265.0, market_price: 16.10 },
            MarketQuote { strike: 0.0, market_price: 1.0 },
        ];

        let mut rng = seeded_rng(Some(42));
        let err = validate_against_market(&base, &quotes, 1000, &mut rng).unwrap_err();
        assert!(err.is_invalid_argument());

        let mut fresh = seeded_rng(Some(42));
        assert_eq!(rng.gen::<u64>(), fresh.gen::<u64>());

        // Zero simulations is rejected the same way
        let mut rng = seeded_rng(Some(42));
        assert!(validate_against_market(&base, &quotes[..1], 0, &mut rng).is_err());
        let mut fresh = seeded_rng(Some(42));
        assert_eq!(rng.gen::<u64>(), fresh.gen::<u64>());
    }

    #[test]
    fn test_engine_validation() {
        use crate::core::EngineConfig;

        let base = PricingParameters::call(272.0, 270.0, 0.25, 0.045, 0.25).unwrap();
        let quotes = read_market_quotes(CSV.as_bytes()).unwrap();
        let engine =
            MonteCarloEngine::new(EngineConfig::reproducible(42).with_parallel(2048)).unwrap();

        let a = engine.validate_against_market(&base, &quotes, 20_000).unwrap();
        let b = engine.validate_against_market(&base, &quotes, 20_000).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.rows.len(), 4);

        let first = engine.price(&base.with_strike(265.0), 20_000).unwrap();
        assert_eq!(a.rows[0].mc_price, first.price());

        let bad = [MarketQuote { strike: -5.0, market_price: 1.0 }];
        assert!(engine.validate_against_market(&base, &bad, 1000).is_err());
    }

    #[test]
    fn test_empty_report_rejected() {
        assert!(ValidationReport::from_rows(Vec::new())
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_validation_requires_quotes() {
        let base = PricingParameters::call(272.0, 270.0, 0.25, 0.045, 0.25).unwrap();
        let mut rng = seeded_rng(Some(42));
        assert!(validate_against_market(&base, &[], 1000, &mut rng).is_err());
    }
}
