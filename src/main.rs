use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use garage_profit::model::{DatePredicate, parse_iso_date};
use garage_profit::pipeline::{self, ReportSources};
use garage_profit::{Result, ToolError, prompt};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    pipeline::prepare_output_dir(&cli.output_dir)?;

    let predicate = match cli.command {
        Some(Command::Month { month, year }) => DatePredicate::month(year, month)?,
        Some(Command::Range { start, end }) => DatePredicate::range(start, end),
        None => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            prompt::prompt_period(&mut stdin.lock(), &mut stdout)?
        }
    };

    let sources = ReportSources {
        salaries: cli.salaries,
        work_orders: cli.work_orders,
        output_dir: cli.output_dir,
    };
    let files = pipeline::generate_reports(&sources, &predicate)?;
    println!("Text report written to {}", files.text.display());
    println!("Excel report written to {}", files.workbook.display());
    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_iso_date(value).map_err(|error| error.to_string())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Per-mechanic profit reports from payroll and work-order ledgers."
)]
struct Cli {
    /// Payroll ledger with `name,salary,YYYY-MM-DD` lines.
    #[arg(long, global = true, default_value = "employee_data.txt")]
    salaries: PathBuf,

    /// Work-order log (headerless CSV, or an .xlsx workbook).
    #[arg(long, global = true, default_value = "your_data.csv")]
    work_orders: PathBuf,

    /// Directory receiving the generated reports.
    #[arg(long, global = true, default_value = "output")]
    output_dir: PathBuf,

    /// Reporting period. Prompts interactively when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Report a single calendar month.
    Month {
        /// Month number.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Four-digit year.
        #[arg(long)]
        year: i32,
    },
    /// Report an inclusive range of dates.
    Range {
        /// First day of the range (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// Last day of the range (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
    },
}
