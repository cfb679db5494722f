use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use shift_match::logging::level_name;
use shift_match::report::{render_report, write_report};
use shift_match::{
    load_availability, parse_availability, run_matching, MatchingConfig, PersonRecord, TimeGrid,
};
use shift_match::log_changes;

const USAGE: &str = "\
Usage: shift-match [OPTIONS] <INPUT|->

Assign weekly work shifts from a class-availability file.

Options:
  --min <units>          Minimum work per person, in 30-minute units [default: 10]
  --max <units>          Maximum work per person, in 30-minute units [default: 13]
  --occupancy <1|2>      People per slot [default: 1]
  --no-edge-exclusive    Allow more than one first/last-of-day shift per person
  --output <path>        Also write the report to a file
  -v                     Increase verbosity (repeatable)
  -h, --help             Show this help";

struct Args {
    input: String,
    output: Option<PathBuf>,
    config: MatchingConfig,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {}: {}", flag, value))
}

/// Returns `Ok(None)` when help was requested.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>, String> {
    let mut config = MatchingConfig::default();
    let mut input = None;
    let mut output = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--min" => config.min_quota = parse_value("--min", args.next())?,
            "--max" => config.max_quota = parse_value("--max", args.next())?,
            "--occupancy" => config.occupancy = parse_value("--occupancy", args.next())?,
            "--no-edge-exclusive" => config.edge_exclusive = false,
            "--output" => output = Some(PathBuf::from(parse_value::<String>("--output", args.next())?)),
            "-v" | "-vv" | "-vvv" => config.verbosity += (arg.len() - 1) as u8,
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("unknown option: {}", arg));
            }
            _ if input.is_none() => input = Some(arg),
            _ => return Err(format!("unexpected argument: {}", arg)),
        }
    }

    let input = input.ok_or_else(|| "missing input file".to_string())?;
    Ok(Some(Args {
        input,
        output,
        config,
    }))
}

fn read_records(input: &str, grid: &TimeGrid) -> Result<Vec<PersonRecord>, Box<dyn std::error::Error>> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(parse_availability(&text, grid)?)
    } else {
        Ok(load_availability(input, grid)?)
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let grid = TimeGrid::default_week();
    let verbosity = args.config.verbosity;
    log_changes!(verbosity, "Verbosity: {}", level_name(verbosity));

    let records = read_records(&args.input, &grid)?;
    log_changes!(verbosity, "Loaded {} people from {}", records.len(), args.input);

    let min_quota = args.config.min_quota;
    let result = run_matching(records, grid.clone(), args.config)?;
    let report = render_report(&result, &grid, min_quota);
    print!("{}", report);

    if let Some(path) = args.output {
        write_report(&path, &report)?;
        log_changes!(verbosity, "Report written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("error: {}\n\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
