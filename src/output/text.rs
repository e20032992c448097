//! Human-readable text output

use crate::config::Config;
use crate::coordinator::RunOutcome;
use crate::quadrature::Integrand;

/// Failures shown in full before the report falls back to a count
const MAX_FAILURE_ROWS: usize = 16;

/// Print the run report to the console
pub fn print_report(outcome: &RunOutcome, config: &Config) {
    let stats = &outcome.stats;

    println!("═══════════════════════════════════════════════════════════");
    println!("              ADAPTIVE QUADRATURE INTEGRATION");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Integral: ∫ {} dx", config.integrand.describe());
    println!("Bounds:   [{}, {}]", config.domain.lower, config.domain.upper);
    println!("Threshold: {}", config.domain.epsilon);
    println!();
    println!("Result:   {:.6}", outcome.integral);
    println!(
        "Elapsed:  {:.4}s",
        stats.elapsed().unwrap_or_default().as_secs_f64()
    );
    println!();

    println!("Tasks:");
    println!("  Dispatched: {}", format_number(stats.dispatched()));
    println!("  Splits:     {}", format_number(stats.splits()));
    println!("  Leaves:     {}", format_number(stats.leaves()));
    println!("  Deepest:    level {}", stats.deepest_level());
    println!();

    let latency = stats.task_latency();
    if !latency.is_empty() {
        println!("Task latency:");
        println!("  Min:    {:?}", latency.min().unwrap_or_default());
        println!("  Mean:   {:?}", latency.mean().unwrap_or_default());
        println!("  Max:    {:?}", latency.max().unwrap_or_default());
        println!();
        println!("  Percentiles:");
        for &p in &[50.0, 90.0, 99.0] {
            println!(
                "    p{:5.2}: {:?}",
                p,
                latency.percentile(p).unwrap_or_default()
            );
        }
        println!();
    }

    println!("Workers:");
    for (id, counters) in stats.per_worker() {
        let mut line = format!(
            "  {}: {} tasks, {} splits, {} leaves",
            id,
            format_number(counters.dispatched),
            format_number(counters.splits),
            format_number(counters.leaves)
        );
        if counters.precision_failures > 0 {
            line.push_str(&format!(", {} unresolved", counters.precision_failures));
        }
        println!("{line}");
    }
    println!();

    if !outcome.failures.is_empty() {
        println!(
            "Precision unreachable on {} subinterval(s):",
            outcome.failures.len()
        );
        for failure in outcome.failures.iter().take(MAX_FAILURE_ROWS) {
            println!(
                "  {} at level {}: off by {:.3e}",
                failure.interval, failure.depth, failure.delta
            );
        }
        if outcome.failures.len() > MAX_FAILURE_ROWS {
            println!(
                "  ... and {} more",
                outcome.failures.len() - MAX_FAILURE_ROWS
            );
        }
        println!();
    }

    if config.output.show_leaves {
        println!("Leaves:");
        for leaf in &outcome.leaves {
            println!("  {} -> {:.9}", leaf.interval, leaf.value);
        }
        println!();
    }

    println!("═══════════════════════════════════════════════════════════");
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::new();

    for (count, c) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
