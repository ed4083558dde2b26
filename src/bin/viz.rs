//! MC Options Visualization
//!
//! Terminal charts of the simulated distribution for a sample option:
//! terminal prices, payoffs and the convergence of the estimate.

use mc_options::prelude::*;
use mc_options::report::{self, Histogram};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> PricingResult<()> {
    println!("MC Options Visualization");
    println!("========================\n");

    // Sample ATM call, 3 months, no network needed
    let params = PricingParameters::call(185.40, 185.0, 0.25, 0.045, 0.283)?;
    let engine = MonteCarloEngine::new(EngineConfig::reproducible(42))?;

    println!("Sample Parameters:");
    println!("  Spot:     ${:.2}", params.spot);
    println!("  Strike:   ${:.2}", params.strike);
    println!("  Maturity: {:.2} years", params.maturity);
    println!("  Rate:     {:.1}%", params.rate * 100.0);
    println!("  Vol:      {:.1}%", params.volatility * 100.0);
    println!();

    let run = engine.price(&params, 50_000)?;
    let summary = run.summary()?;
    print!("{}", report::render_run(&run, &summary));

    println!("\nSimulated Final Prices:");
    if let Some(h) = Histogram::from_values(&run.terminal_prices, 30) {
        print!("{}", h.render(50));
    }

    // Zero payoffs dominate the first bin, so chart only the in-the-money part
    let itm: Vec<f64> = run.payoffs.iter().copied().filter(|&p| p > 0.0).collect();
    println!(
        "\nPositive Payoffs ({} of {}, {:.1}% expire worthless):",
        itm.len(),
        run.len(),
        summary.zero_payoff_fraction * 100.0
    );
    if let Some(h) = Histogram::from_values(&itm, 20) {
        print!("{}", h.render(50));
    }

    let exact = bs_price_params(&params);
    let trace = engine.convergence(&params, &DEFAULT_SAMPLE_SIZES)?;
    println!("\nConvergence (Black-Scholes ${:.4}):", exact);
    print!("{}", report::render_convergence(&trace, Some(exact)));

    // Error scaled by sqrt(N) should stay roughly flat
    println!("\nStandard Error x sqrt(N):");
    for point in &trace.points {
        let scaled = point.estimate.standard_error * (point.sample_size as f64).sqrt();
        let bar = "#".repeat((scaled * 2.0).round() as usize);
        println!("{:>8} | {} {:.2}", point.sample_size, bar, scaled);
    }

    Ok(())
}
