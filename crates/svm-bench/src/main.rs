//! svm-bench - compare SVM and explicit-copy transfers on an OpenCL device.
//!
//! Runs one (or all) of the four workloads under one or both memory
//! strategies and prints a report line per run.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use svm_bench::workloads::{gemm, hello, vec_add, vec_copy};
use svm_bench::{session, ClError, RunReport, Session, Strategy};

#[derive(Parser, Debug)]
#[clap(
    name = "svm-bench",
    about = "Compare Shared Virtual Memory against explicit buffer copies on an OpenCL device.",
    version
)]
struct Args {
    /// Workload to run
    #[clap(value_enum, default_value_t = WorkloadArg::All)]
    workload: WorkloadArg,

    /// Vector length in elements (e.g. 4194304, 512K, 4M)
    #[clap(short = 'n', long = "size", value_parser = parse_count, default_value = "4M")]
    size: usize,

    /// Matrix dimension for gemm
    #[clap(long, default_value_t = gemm::DEFAULT_DIM)]
    dim: usize,

    /// Memory strategy
    #[clap(short, long, value_enum, default_value_t = StrategyArg::Both)]
    strategy: StrategyArg,

    /// OpenCL platform index
    #[clap(short, long, default_value_t = 0)]
    platform: usize,

    /// Device index within the platform (GPU first, CPU fallback)
    #[clap(short, long, default_value_t = 0)]
    device: usize,

    /// Enable verbose logging
    #[clap(short, long)]
    verbose: bool,

    /// List available OpenCL platforms and devices and exit
    #[clap(long)]
    list_devices: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WorkloadArg {
    Hello,
    Gemm,
    VecAdd,
    VecCopy,
    All,
}

impl WorkloadArg {
    fn expand(self) -> Vec<WorkloadArg> {
        match self {
            WorkloadArg::All => vec![
                WorkloadArg::Hello,
                WorkloadArg::Gemm,
                WorkloadArg::VecAdd,
                WorkloadArg::VecCopy,
            ],
            other => vec![other],
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Svm,
    Copy,
    Both,
}

/// Resolves the requested strategies against the device's SVM support.
///
/// Asking for SVM alone on a non-SVM device is an error; with `both` the
/// SVM half is skipped with a warning and the copy runs still happen.
fn resolve_strategies(arg: StrategyArg, svm_supported: bool) -> Result<Vec<Strategy>, ClError> {
    match arg {
        StrategyArg::Svm if !svm_supported => Err(ClError::SvmUnsupported),
        StrategyArg::Svm => Ok(vec![Strategy::Svm]),
        StrategyArg::Copy => Ok(vec![Strategy::Copy]),
        StrategyArg::Both if svm_supported => Ok(vec![Strategy::Svm, Strategy::Copy]),
        StrategyArg::Both => {
            log::warn!("device has no SVM support, skipping the SVM runs");
            Ok(vec![Strategy::Copy])
        }
    }
}

/// Parses an element count with an optional K/M/G suffix.
fn parse_count(s: &str) -> Result<usize> {
    let s = s.trim().to_uppercase();
    let (num_part, suffix) = s.split_at(
        s.find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len()),
    );

    let num: usize = num_part.parse().context("invalid element count")?;

    match suffix {
        "" => Ok(num),
        "K" => Ok(num * 1024),
        "M" => Ok(num * 1024 * 1024),
        "G" => Ok(num * 1024 * 1024 * 1024),
        _ => bail!("invalid size suffix '{}'; use K, M or G", suffix),
    }
}

fn run_one(
    sess: &Session,
    workload: WorkloadArg,
    strategy: Strategy,
    args: &Args,
) -> Result<RunReport, ClError> {
    match workload {
        WorkloadArg::Hello => hello::run(sess, strategy),
        WorkloadArg::Gemm => gemm::run(sess, strategy, args.dim),
        WorkloadArg::VecAdd => vec_add::run(sess, strategy, args.size),
        WorkloadArg::VecCopy => vec_copy::run(sess, strategy, args.size),
        WorkloadArg::All => unreachable!("expanded before dispatch"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_devices {
        return Ok(session::list_devices()?);
    }

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let sess = Session::new(args.platform, args.device)
        .context("failed to set up the OpenCL device")?;
    println!("device: {}\n", sess.device_name());

    let strategies = resolve_strategies(args.strategy, sess.svm_supported())
        .context("the requested strategy is unavailable on this device")?;

    for strategy in strategies {
        match strategy {
            Strategy::Svm => println!("SVM\n------------------------------"),
            Strategy::Copy => println!("\nNon-SVM\n------------------------------"),
        }

        for workload in args.workload.expand() {
            let report = run_one(&sess, workload, strategy, &args)
                .with_context(|| format!("{:?} failed under {}", workload, strategy))?;
            println!("{}", report);
        }
    }

    #[cfg(feature = "metrics")]
    svm_bench::metrics::summary();
    #[cfg(feature = "memtrace")]
    svm_bench::trace::flush_csv().context("failed to write memtrace.csv")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_count, resolve_strategies, StrategyArg};
    use svm_bench::{ClError, Strategy};

    #[test]
    fn svm_only_on_non_svm_device_is_an_error() {
        match resolve_strategies(StrategyArg::Svm, false) {
            Err(ClError::SvmUnsupported) => {}
            other => panic!("expected SvmUnsupported, got {:?}", other),
        }
    }

    #[test]
    fn both_on_non_svm_device_keeps_the_copy_runs() {
        assert_eq!(
            resolve_strategies(StrategyArg::Both, false).unwrap(),
            vec![Strategy::Copy]
        );
    }

    #[test]
    fn both_on_svm_device_runs_svm_first() {
        assert_eq!(
            resolve_strategies(StrategyArg::Both, true).unwrap(),
            vec![Strategy::Svm, Strategy::Copy]
        );
    }

    #[test]
    fn parse_count_plain_number() {
        assert_eq!(parse_count("1024").unwrap(), 1024);
    }

    #[test]
    fn parse_count_suffixes() {
        assert_eq!(parse_count("4K").unwrap(), 4 * 1024);
        assert_eq!(parse_count("4M").unwrap(), 4 * 1024 * 1024);
        assert_eq!(parse_count("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_count("2m").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_count(" 8k ").unwrap(), 8 * 1024);
    }

    #[test]
    fn parse_count_rejects_garbage() {
        assert!(parse_count("4X").is_err());
        assert!(parse_count("").is_err());
        assert!(parse_count("K").is_err());
    }
}
