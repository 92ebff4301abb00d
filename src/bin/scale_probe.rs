use std::env;
use std::time::Instant;

use rap_dibc::{utils::num_trunks, AllocationError, Instance, RapEngine, StructuredProblem};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

/// Segment counts probed, with the largest `n` worth running for each.
const SEGMENT_LIMITS: &[(usize, usize)] = &[(1, 1 << 20), (2, 1 << 18), (3, 8192), (4, 512)];

fn main() {
    let options = match Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(err) => {
            eprintln!("scale_probe: {err}");
            Options::print_help();
            std::process::exit(2);
        }
    };

    eprintln!("\n{}", "=".repeat(80));
    eprintln!("RAP-DIBC Scaling Probe");
    eprintln!("{}", "=".repeat(80));
    eprintln!();
    eprintln!("Solves synthetic instances of growing size for m = 1..4 segments and checks");
    eprintln!("that every allocation sums to R and stays inside its intervals.");
    eprintln!();
    eprintln!("Metrics:");
    eprintln!("  • wall_s: wall-clock time in seconds");
    eprintln!("  • rss_delta_kib: resident memory delta in KiB");
    eprintln!("  • trunks: partitions prefixes swept, C(n+m-2, m-2)");
    eprintln!("  • status: 'passed' = feasible allocation, 'failed' = check or solve failed");
    eprintln!();
    eprintln!("{}", "=".repeat(80));
    eprintln!();

    let mut sys = System::new();
    let mut measurements = Vec::new();
    let total = SEGMENT_LIMITS.len();
    for (idx, &(m, limit)) in SEGMENT_LIMITS.iter().enumerate() {
        eprintln!("[{}/{}] m = {m} segment(s)...", idx + 1, total);
        measurements.extend(run_segments(m, limit.min(options.max_vars), &mut sys));
        eprintln!();
    }

    print_summary(&measurements);

    if let Err(err) = options.format.write(&measurements) {
        eprintln!("scale_probe output error: {err}");
        std::process::exit(1);
    }
}

struct Options {
    format: OutputFormat,
    max_vars: usize,
}

impl Options {
    fn parse<I, T>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = T>,
        T: Into<String>,
    {
        let mut format = OutputFormat::Csv;
        let mut max_vars = 1usize << 16;

        while let Some(arg) = args.next() {
            let arg = arg.into();
            if arg == "--help" || arg == "-h" {
                Options::print_help();
                std::process::exit(0);
            } else if let Some(value) = arg.strip_prefix("--format=") {
                format = OutputFormat::from_str(value)?;
            } else if arg == "--format" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --format".to_string())?
                    .into();
                format = OutputFormat::from_str(&value)?;
            } else if let Some(value) = arg.strip_prefix("--max-vars=") {
                max_vars = parse_max_vars(value)?;
            } else if arg == "--max-vars" {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value after --max-vars".to_string())?
                    .into();
                max_vars = parse_max_vars(&value)?;
            } else {
                return Err(format!("unrecognized argument '{arg}'"));
            }
        }

        Ok(Self { format, max_vars })
    }

    fn print_help() {
        println!(
            "\
Usage: cargo run --release --bin scale_probe [-- <options>]

Options:
  --format <csv|table|json>     Output format (default: csv)
  --max-vars <N>                Largest number of variables to probe (default: 65536)
  -h, --help                    Print this help message

Examples:
  cargo run --release --bin scale_probe
  cargo run --release --bin scale_probe -- --format table --max-vars 4096
"
        );
    }
}

fn parse_max_vars(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err("max vars must be a positive integer".to_string()),
    }
}

#[derive(Copy, Clone)]
enum OutputFormat {
    Csv,
    Table,
    Json,
}

impl OutputFormat {
    fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "csv" => Ok(Self::Csv),
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }

    fn write(self, measurements: &[Measurement]) -> Result<(), String> {
        match self {
            OutputFormat::Csv => write_csv(measurements),
            OutputFormat::Table => write_table(measurements),
            OutputFormat::Json => write_json(measurements),
        }
    }
}

struct Measurement {
    segments: usize,
    vars: usize,
    trunks: usize,
    wall_s: f64,
    rss_delta_kib: u64,
    status: Status,
    detail: Option<String>,
}

#[derive(Clone, Copy)]
enum Status {
    Passed,
    Failed,
}

impl Status {
    fn label(&self) -> &'static str {
        match self {
            Status::Passed => "passed",
            Status::Failed => "failed",
        }
    }
}

fn run_segments(m: usize, limit: usize, sys: &mut System) -> Vec<Measurement> {
    let sizes: Vec<usize> = std::iter::successors(Some(16usize), |&n| n.checked_mul(4))
        .take_while(|&n| n <= limit)
        .collect();
    let total = sizes.len();
    sizes
        .into_iter()
        .enumerate()
        .map(|(idx, n)| {
            eprint!("      [{}/{}] n = {}... ", idx + 1, total, n);
            let instance = synthetic_instance(n, m);
            let (measurement, lambda) = measure(&instance, sys);
            let icon = match measurement.status {
                Status::Passed => "✓",
                Status::Failed => "✗",
            };
            eprintln!(
                "{} λ*={}, time={:.3}s, status={}",
                icon,
                lambda.map_or_else(|| "-".to_string(), |l| format!("{l:.4}")),
                measurement.wall_s,
                measurement.status.label()
            );
            measurement
        })
        .collect()
}

/// Deterministic instance: shifts decrease linearly, shared segments of
/// width 2 separated by gaps of 1, and R at 60% of the largest reachable sum.
fn synthetic_instance(n: usize, m: usize) -> Instance {
    let shifts: Vec<f64> = (0..n).map(|i| 5.0 - 10.0 * i as f64 / n as f64).collect();
    let lower_fixed: Vec<f64> = (1..m).map(|j| 3.0 * j as f64).collect();
    let upper_fixed: Vec<f64> = (0..m - 1).map(|j| 3.0 * j as f64 + 2.0).collect();
    let top = 3.0 * (m - 1) as f64;
    let lower_var: Vec<f64> = (0..n).map(|i| -1.0 + 0.5 * i as f64 / n as f64).collect();
    let upper_var: Vec<f64> = (0..n).map(|i| top + 2.0 + i as f64 / n as f64).collect();
    let resource = 0.6 * upper_var.iter().sum::<f64>();
    Instance::new(resource, shifts, lower_fixed, upper_fixed, lower_var, upper_var)
        .unwrap_or_else(|err| panic!("synthetic instance is malformed: {err}"))
}

fn measure(instance: &Instance, sys: &mut System) -> (Measurement, Option<f64>) {
    let n = instance.num_vars();
    let m = instance.num_segments();
    let engine = RapEngine::new(instance.clone());
    let before = rss_kib(sys);
    let start = Instant::now();
    let result: Result<_, AllocationError> = engine.run();
    let duration = start.elapsed();
    let after = rss_kib(sys);

    let (status, detail, lambda, trunks) = match result {
        Ok(solution) => {
            let (status, detail) = verify(instance, &solution.allocation);
            (status, detail, Some(solution.multiplier), solution.stats.trunks)
        }
        Err(err) => (Status::Failed, Some(err.to_string()), None, num_trunks(n, m)),
    };

    (
        Measurement {
            segments: m,
            vars: n,
            trunks,
            wall_s: duration.as_secs_f64(),
            rss_delta_kib: after.saturating_sub(before),
            status,
            detail,
        },
        lambda,
    )
}

/// Σx = R within tolerance and every coordinate inside one of its intervals.
fn verify(instance: &Instance, allocation: &[f64]) -> (Status, Option<String>) {
    let total: f64 = allocation.iter().sum();
    let scale = allocation.iter().map(|x| x.abs()).sum::<f64>().max(1.0);
    if (total - instance.resource()).abs() > 1e-9 * scale {
        return (
            Status::Failed,
            Some(format!("sum {total} differs from R = {}", instance.resource())),
        );
    }
    if let Some(var) = (0..allocation.len()).find(|&i| !instance.contains(i, allocation[i])) {
        return (
            Status::Failed,
            Some(format!("x[{var}] = {} outside its intervals", allocation[var])),
        );
    }
    (Status::Passed, None)
}

fn print_summary(measurements: &[Measurement]) {
    eprintln!("\n{}", "=".repeat(80));
    eprintln!("Summary");
    eprintln!("{}", "=".repeat(80));

    let failed = measurements
        .iter()
        .filter(|m| matches!(m.status, Status::Failed))
        .count();
    eprintln!("  Total runs: {}", measurements.len());
    eprintln!("  ✓ Passed: {}", measurements.len() - failed);
    eprintln!("  ✗ Failed: {}", failed);
    for m in measurements.iter().filter(|m| matches!(m.status, Status::Failed)) {
        eprintln!(
            "     m={} n={}: {}",
            m.segments,
            m.vars,
            m.detail.as_deref().unwrap_or("")
        );
    }

    for segments in 1..=4 {
        let runs: Vec<&Measurement> = measurements.iter().filter(|m| m.segments == segments).collect();
        if let (Some(first), Some(last)) = (runs.first(), runs.last()) {
            let ratio = if first.wall_s > 0.0 {
                last.wall_s / first.wall_s
            } else {
                0.0
            };
            eprintln!(
                "  m={segments}: n {}..{}, {:.1}x time from smallest to largest",
                first.vars, last.vars, ratio
            );
        }
    }
    eprintln!("{}", "=".repeat(80));
    eprintln!();
}

fn write_csv(measurements: &[Measurement]) -> Result<(), String> {
    println!("segments,vars,trunks,wall_s,rss_delta_kib,status,detail");
    for m in measurements {
        let detail = m
            .detail
            .as_ref()
            .map(|s| s.replace('"', "'"))
            .unwrap_or_default();
        println!(
            "{},{},{},{:.3},{},{},\"{}\"",
            m.segments,
            m.vars,
            m.trunks,
            m.wall_s,
            m.rss_delta_kib,
            m.status.label(),
            detail
        );
    }
    Ok(())
}

fn write_table(measurements: &[Measurement]) -> Result<(), String> {
    println!(
        "{:>8}  {:>8}  {:>10}  {:>10}  {:>14}  {:>8}  {}",
        "segments", "vars", "trunks", "wall_s", "rss_delta_kib", "status", "detail"
    );
    println!(
        "{:-<8}  {:-<8}  {:-<10}  {:-<10}  {:-<14}  {:-<8}  {:-<8}",
        "", "", "", "", "", "", ""
    );
    for m in measurements {
        println!(
            "{:>8}  {:>8}  {:>10}  {:>10.3}  {:>14}  {:>8}  {}",
            m.segments,
            m.vars,
            m.trunks,
            m.wall_s,
            m.rss_delta_kib,
            m.status.label(),
            m.detail.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn write_json(measurements: &[Measurement]) -> Result<(), String> {
    println!("[");
    for (idx, m) in measurements.iter().enumerate() {
        let detail = m.detail.as_ref().map(|s| s.replace('"', "'"));
        println!(
            "  {{\"segments\":{},\"vars\":{},\"trunks\":{},\"wall_s\":{:.3},\"rss_delta_kib\":{},\"verification\":{{\"status\":\"{}\",\"detail\":{}}}}}{}",
            m.segments,
            m.vars,
            m.trunks,
            m.wall_s,
            m.rss_delta_kib,
            m.status.label(),
            match detail {
                Some(ref d) => format!("\"{d}\""),
                None => "null".to_string(),
            },
            if idx + 1 == measurements.len() { "" } else { "," }
        );
    }
    println!("]");
    Ok(())
}

fn rss_kib(sys: &mut System) -> u64 {
    sys.refresh_processes_specifics(ProcessRefreshKind::new());
    if let Some(process) = get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        bytes_to_kib(process.memory())
    } else {
        0
    }
}

/// sysinfo reports resident memory in bytes.
fn bytes_to_kib(bytes: u64) -> u64 {
    bytes / 1024
}
