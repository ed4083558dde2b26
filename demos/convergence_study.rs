//! Example: Convergence and sensitivity of the Monte Carlo estimate
//!
//! Run with: cargo run --example convergence_study

use mc_options::prelude::*;

fn main() -> PricingResult<()> {
    let params = PricingParameters::call(185.40, 185.0, 0.25, 0.045, 0.283)?;
    let exact = bs_price_params(&params);

    println!("=== Convergence ===\n");
    println!("Black-Scholes reference: ${:.4}\n", exact);

    // Sequential: one generator threaded through every size
    let mut rng = seeded_rng(Some(42));
    let trace = analyze_convergence(&params, &DEFAULT_SAMPLE_SIZES, &mut rng)?;

    // Parallel: one independent stream per size
    let parallel = analyze_convergence_parallel(&params, &DEFAULT_SAMPLE_SIZES, 42)?;

    println!(
        "{:>8} | {:>10} | {:>10} | {:>10} | {:>10}",
        "N", "Sequential", "Error", "Parallel", "Error"
    );
    println!("{}", "-".repeat(60));
    for (seq, par) in trace.points.iter().zip(&parallel.points) {
        println!(
            "{:>8} | {:>10.4} | {:>+10.4} | {:>10.4} | {:>+10.4}",
            seq.sample_size,
            seq.estimate.value,
            seq.estimate.value - exact,
            par.estimate.value,
            par.estimate.value - exact
        );
    }

    println!(
        "\nLargest absolute error (sequential): {:.4}",
        trace.max_abs_error(exact)
    );

    println!("\n=== Volatility Sensitivity ===\n");
    let vols = [0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40];
    let sweep = volatility_sweep(&params, &vols, 10_000, &mut rng)?;
    for point in &sweep.points {
        println!("  σ = {:.2}: ${:.4}", point.input, point.estimate.value);
    }

    println!("\n=== Strike Sensitivity ===\n");
    let strikes = [170.0, 175.0, 180.0, 185.0, 190.0, 195.0, 200.0];
    let sweep = strike_sweep(&params, &strikes, 10_000, &mut rng)?;
    for point in &sweep.points {
        println!("  K = {:.0}: ${:.4}", point.input, point.estimate.value);
    }

    Ok(())
}
