//! Example: Monte Carlo pricing of a European call and put
//!
//! Run with: cargo run --example basic_pricing

use mc_options::prelude::*;

fn main() -> PricingResult<()> {
    // Option parameters
    let spot = 185.40;
    let strike = 185.0;
    let time = 0.25; // 3 months
    let rate = 0.045; // 4.5% risk-free rate
    let vol = 0.283; // 28.3% historical volatility

    println!("=== Monte Carlo Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years ({:.0} days)", time, time * 365.0);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let params = PricingParameters::call(spot, strike, time, rate, vol)?;
    let mut rng = seeded_rng(Some(42));

    // Call and put on the same terminal prices
    let (call, put) = price_call_and_put(&params, 100_000, &mut rng)?;
    println!(
        "Call Price: ${:.4} ± {:.4}",
        call.price(),
        call.estimate.standard_error
    );
    println!(
        "Put Price:  ${:.4} ± {:.4}",
        put.price(),
        put.estimate.standard_error
    );

    println!("\n=== Black-Scholes Benchmark ===\n");
    let bs_call = bs_price_params(&params);
    let bs_put = bs_price_params(&params.with_option_type(OptionType::Put));
    println!(
        "Call: ${:.4} (within 2 s.e.: {})",
        bs_call,
        call.estimate.is_consistent_with(bs_call, 2.0)
    );
    println!(
        "Put:  ${:.4} (within 2 s.e.: {})",
        bs_put,
        put.estimate.is_consistent_with(bs_put, 2.0)
    );

    // Put-call parity: C - P = S - K*e^(-rT)
    let parity_lhs = call.price() - put.price();
    let parity_rhs = params.parity_value();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.4}", parity_lhs);
    println!("  S - K*e^(-rT) = {:.4}", parity_rhs);
    println!("  Difference: {:.6}", (parity_lhs - parity_rhs).abs());

    println!("\n=== Simulation Summary (Call) ===\n");
    let summary = call.summary()?;
    println!("Mean final price:  ${:.2}", summary.mean_terminal_price);
    println!("Std final price:   ${:.2}", summary.std_terminal_price);
    println!("Prob. ITM:         {:.1}%", summary.prob_itm * 100.0);
    println!("Mean payoff:       ${:.4}", summary.mean_payoff);

    Ok(())
}
