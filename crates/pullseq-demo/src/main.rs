#![doc = include_str!("../README.md")]

mod config;
mod demos;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Demo, DemoConfig};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DemoConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    match &config.demo {
        Demo::Fib { from, to } => {
            for r in demos::fib::ratios(*from, *to) {
                println!("{:>4} {:.6}", r.idx, r.ratio);
            }
        }
        Demo::Digit { position } => match demos::digit::nth_digit(*position) {
            Some(digit) => println!("{digit}"),
            None => anyhow::bail!("digit stream ended before position {position}"),
        },
        Demo::Ugly { below, primes } => {
            for n in demos::ugly::below(primes, *below) {
                println!("{n}");
            }
        }
        Demo::Split { count, primes } => {
            let summary = demos::split::summarize(primes, *count, &config.thread_prefix)?;
            println!("first:   {:?}", summary.first);
            println!("sum:     {}", summary.sum);
            println!("evens:   {}", summary.evens);
            println!("largest: {}", summary.largest);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Demo finished");
    Ok(())
}

fn log_startup_info(_config: &DemoConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Running demo with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!("Running demo {:?}", _config.demo);
    }
}
