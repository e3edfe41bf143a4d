//! Command-line argument parsing
//!
//! Short flags follow the classic push/pop benchmark: `-h` is the host,
//! so clap's built-in `-h` help flag is disabled and only `--help` remains.
//! Malformed arguments end the process during parsing with clap's usage
//! error, the way a flag parser would; every numeric value the flags accept,
//! zero included, is a runnable configuration.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

/// List push/pop throughput benchmark for Valkey and Redis
#[derive(Parser, Debug, Clone)]
#[command(name = "valkey-list-bench")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct CliArgs {
    /// Print help information
    #[arg(long = "help", action = clap::ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,

    // ===== Connection Options =====
    /// Server host
    #[arg(short = 'h', long = "host", default_value = "localhost")]
    pub host: String,

    /// Server password (empty = no AUTH)
    #[arg(short = 'p', long = "password", default_value = "")]
    pub password: String,

    /// Server port
    #[arg(short = 'P', long = "port", default_value_t = 6379)]
    pub port: u16,

    /// Connection timeout in milliseconds
    #[arg(
        long = "connect-timeout",
        default_value_t = 5000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub connect_timeout_ms: u64,

    /// Per-command timeout in milliseconds (0 = wait forever)
    #[arg(long = "request-timeout", default_value_t = 0)]
    pub request_timeout_ms: u64,

    // ===== Benchmark Parameters =====
    /// Number of concurrent worker threads
    #[arg(short = 't', long = "threads", default_value_t = 3)]
    pub threads: u32,

    /// Number of elements each worker pushes and then pops
    #[arg(short = 'n', long = "elements", default_value_t = 10)]
    pub num_elems: u64,

    /// Payload size in bytes
    #[arg(short = 's', long = "size", default_value_t = 100)]
    pub packet_size: usize,

    /// Seconds to sleep between runs
    #[arg(short = 'i', long = "interval", default_value_t = 10)]
    pub interval_secs: u64,

    /// Number of runs
    #[arg(short = 'm', long = "runs", default_value_t = 2)]
    pub run_count: u32,

    // ===== Output Options =====
    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse CLI arguments (program name first); exits on error
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args = Self::parse_from(args);
        if let Err(msg) = args.validate() {
            Self::command().error(ErrorKind::ValueValidation, msg).exit();
        }
        args
    }

    /// True when the command line is exactly `<prog> -h`.
    ///
    /// `-h` alone cannot be a host flag (it has no value), so it is
    /// treated as a request for usage.
    pub fn is_bare_help<I, S>(args: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rest: Vec<S> = args.into_iter().skip(1).collect();
        rest.len() == 1 && rest[0].as_ref() == "-h"
    }

    /// Print usage to stdout
    pub fn print_usage() -> std::io::Result<()> {
        Self::command().print_help()
    }

    /// Validate argument combinations
    ///
    /// The per-run operation count `threads * elements * 2` must fit in u64.
    pub fn validate(&self) -> Result<(), String> {
        let total_ops = u64::from(self.threads)
            .checked_mul(self.num_elems)
            .and_then(|ops| ops.checked_mul(2));

        if total_ops.is_none() {
            return Err(format!(
                "-t {} with -n {} overflows the operation count",
                self.threads, self.num_elems
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["test"]);
        assert_eq!(args.host, "localhost");
        assert_eq!(args.password, "");
        assert_eq!(args.port, 6379);
        assert_eq!(args.threads, 3);
        assert_eq!(args.num_elems, 10);
        assert_eq!(args.packet_size, 100);
        assert_eq!(args.interval_secs, 10);
        assert_eq!(args.run_count, 2);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_short_flags() {
        let args = CliArgs::parse_from([
            "test", "-h", "10.0.0.5", "-p", "secret", "-P", "7000", "-t", "8", "-n", "500",
            "-s", "1024", "-i", "1", "-m", "5",
        ]);
        assert_eq!(args.host, "10.0.0.5");
        assert_eq!(args.password, "secret");
        assert_eq!(args.port, 7000);
        assert_eq!(args.threads, 8);
        assert_eq!(args.num_elems, 500);
        assert_eq!(args.packet_size, 1024);
        assert_eq!(args.interval_secs, 1);
        assert_eq!(args.run_count, 5);
    }

    #[test]
    fn test_bare_help_detection() {
        assert!(CliArgs::is_bare_help(["bench", "-h"]));
        assert!(!CliArgs::is_bare_help(["bench", "-h", "localhost"]));
        assert!(!CliArgs::is_bare_help(["bench"]));
        assert!(!CliArgs::is_bare_help(["bench", "-t", "-h"]));
    }

    #[test]
    fn test_host_flag_requires_value() {
        assert!(CliArgs::try_parse_from(["test", "-h"]).is_err());
    }

    #[test]
    fn test_zero_threads_is_valid() {
        let args = CliArgs::parse_from(["test", "-t", "0"]);
        assert_eq!(args.threads, 0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_zero_runs_is_valid() {
        let args = CliArgs::parse_from(["test", "-m", "0"]);
        assert_eq!(args.run_count, 0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_huge_element_count_rejected() {
        let max = u64::MAX.to_string();
        let args = CliArgs::parse_from(["test", "-n", max.as_str()]);
        assert!(args.validate().is_err());

        // A single thread still has to double the count
        let half = (u64::MAX / 2 + 1).to_string();
        let args = CliArgs::parse_from(["test", "-t", "1", "-n", half.as_str()]);
        assert!(args.validate().is_err());

        let fits = (u64::MAX / 2).to_string();
        let args = CliArgs::parse_from(["test", "-t", "1", "-n", fits.as_str()]);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let err = CliArgs::try_parse_from(["test", "-q", "-v"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        assert!(CliArgs::try_parse_from(["test", "--connect-timeout", "0"]).is_err());
    }

    #[test]
    fn test_zero_elements_is_valid() {
        let args = CliArgs::parse_from(["test", "-n", "0"]);
        assert!(args.validate().is_ok());
    }
}
