use anyhow::bail;
use clap::{Parser, Subcommand};

/// One past the last fibonacci index whose successor still fits in a `u128`.
pub const FIB_END_LIMIT: usize = 186;

/// Command-line configuration for the `pullseq-demo` binary.
///
/// Every demo drives the library end to end: generators backed by producer
/// threads, plain sequences, and a fan-out over concurrent consumers. Values
/// are parsed from CLI arguments or environment variables (a `.env` file is
/// loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pullseq-demo",
    version,
    about = "Demos for pull-based generators and sequence fan-out"
)]
pub struct CliArgs {
    /// Prefix for fan-out consumer thread names. Threads are named
    /// `{prefix}-{index}`, which shows up in log output.
    ///
    /// Environment variable: `THREAD_PREFIX`
    #[arg(long, global = true, env = "THREAD_PREFIX", default_value_t = String::from("consumer"))]
    pub thread_prefix: String,

    #[command(subcommand)]
    pub demo: DemoArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum DemoArgs {
    /// Ratio between the bit length of each fibonacci number and its index.
    Fib {
        /// First index to report (inclusive).
        ///
        /// Environment variable: `FIB_FROM`
        #[arg(long, env = "FIB_FROM", default_value_t = 40)]
        from: usize,

        /// Last index to report (exclusive).
        ///
        /// Environment variable: `FIB_TO`
        #[arg(long, env = "FIB_TO", default_value_t = 50)]
        to: usize,
    },

    /// The digit at a zero-based position of 0123456789101112...
    ///
    /// Equivalently the position-th digit (one-based) of 123456789101112...
    Digit {
        /// Position of the digit.
        position: usize,
    },

    /// Every number below a limit whose only prime factors are the given
    /// primes.
    Ugly {
        /// Exclusive upper bound.
        ///
        /// Environment variable: `UGLY_BELOW`
        #[arg(long, env = "UGLY_BELOW", default_value_t = 100)]
        below: u64,

        /// Comma separated prime factors.
        #[arg(long, value_delimiter = ',', default_values_t = [2, 3, 5])]
        primes: Vec<u64>,
    },

    /// Fans the ugly numbers out to several summarizing consumers at once.
    Split {
        /// How many elements each consumer reads.
        ///
        /// Environment variable: `SPLIT_COUNT`
        #[arg(long, env = "SPLIT_COUNT", default_value_t = 20)]
        count: usize,

        /// Comma separated prime factors.
        #[arg(long, value_delimiter = ',', default_values_t = [2, 3, 5])]
        primes: Vec<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Demo {
    Fib { from: usize, to: usize },
    Digit { position: usize },
    Ugly { below: u64, primes: Vec<u64> },
    Split { count: usize, primes: Vec<u64> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub demo: Demo,
    pub thread_prefix: String,
}

impl TryFrom<CliArgs> for DemoConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.thread_prefix.is_empty() {
            bail!("THREAD_PREFIX must not be empty");
        }

        let demo = match args.demo {
            DemoArgs::Fib { from, to } => {
                if from == 0 {
                    bail!("FIB_FROM must be greater than 0");
                }
                if from >= to {
                    bail!("FIB_FROM ({from}) must be less than FIB_TO ({to})");
                }
                if to > FIB_END_LIMIT {
                    bail!("FIB_TO ({to}) exceeds the u128 fibonacci range (max = {FIB_END_LIMIT})");
                }
                Demo::Fib { from, to }
            }
            DemoArgs::Digit { position } => Demo::Digit { position },
            DemoArgs::Ugly { below, primes } => {
                validate_primes(&primes)?;
                Demo::Ugly { below, primes }
            }
            DemoArgs::Split { count, primes } => {
                if count == 0 {
                    bail!("SPLIT_COUNT must be greater than 0");
                }
                validate_primes(&primes)?;
                Demo::Split { count, primes }
            }
        };

        Ok(Self {
            demo,
            thread_prefix: args.thread_prefix,
        })
    }
}

fn validate_primes(primes: &[u64]) -> anyhow::Result<()> {
    if primes.is_empty() {
        bail!("at least one prime factor is required");
    }
    if let Some(bad) = primes.iter().find(|&&p| p < 2) {
        bail!("prime factors must be at least 2 (got {bad})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<DemoConfig> {
        let args = CliArgs::try_parse_from(
            core::iter::once("pullseq-demo").chain(args.iter().copied()),
        )?;
        DemoConfig::try_from(args)
    }

    #[test]
    fn defaults_match_the_classic_demos() {
        assert_eq!(
            parse(&["fib"]).unwrap().demo,
            Demo::Fib { from: 40, to: 50 }
        );
        assert_eq!(
            parse(&["ugly"]).unwrap().demo,
            Demo::Ugly {
                below: 100,
                primes: vec![2, 3, 5]
            }
        );
        assert_eq!(
            parse(&["digit", "287"]).unwrap().demo,
            Demo::Digit { position: 287 }
        );
    }

    #[test]
    fn primes_are_comma_separated() {
        let config = parse(&["split", "--count", "5", "--primes", "3,7"]).unwrap();
        assert_eq!(
            config.demo,
            Demo::Split {
                count: 5,
                primes: vec![3, 7]
            }
        );
    }

    #[test]
    fn global_thread_prefix_after_subcommand() {
        let config = parse(&["split", "--thread-prefix", "reader"]).unwrap();
        assert_eq!(config.thread_prefix, "reader");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse(&["fib", "--from", "0"]).is_err());
        assert!(parse(&["fib", "--from", "50", "--to", "40"]).is_err());
        assert!(parse(&["fib", "--to", "500"]).is_err());
        assert!(parse(&["ugly", "--primes", "1,2"]).is_err());
        assert!(parse(&["split", "--count", "0"]).is_err());

        let err = parse(&["fib", "--to", "187"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "FIB_TO (187) exceeds the u128 fibonacci range (max = 186)"
        );
    }
}
