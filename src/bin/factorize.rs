//! Factorize - lists the divisors of each given number in parallel

use anyhow::Result;
use category_sorter::factorize::divisors_with_threads;
use clap::Parser;
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

/// Numbers checked when none are given on the command line
const SELF_CHECK: [u64; 4] = [128, 255, 99999, 10651060];

/// Print every divisor of each number, ascending
#[derive(Parser, Debug)]
#[command(name = "factorize")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Positive integers to factorize
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    numbers: Vec<u64>,

    /// Number of threads (0 = one per CPU)
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Divisors {
    number: u64,
    divisors: Vec<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let numbers = if args.numbers.is_empty() {
        SELF_CHECK.to_vec()
    } else {
        args.numbers
    };

    info!(count = numbers.len(), threads = args.threads, "Factorizing");
    let results = divisors_with_threads(&numbers, args.threads)?;

    if args.json {
        let out: Vec<Divisors> = numbers
            .iter()
            .zip(results)
            .map(|(&number, divisors)| Divisors { number, divisors })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (number, divisors) in numbers.iter().zip(&results) {
            let list: Vec<String> = divisors.iter().map(u64::to_string).collect();
            println!("{}: {}", number, list.join(" "));
        }
    }

    Ok(())
}
