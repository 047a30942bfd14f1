use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use prior_record::config::{AppConfig, OutputFormat};
use prior_record::error::AppError;
use prior_record::records::{
    felony_points, Classification, ConvictionImporter, Defendant, RecordReport,
};
use prior_record::telemetry;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "prior-record",
    about = "Compute prior record levels and habitual felon eligibility from a conviction list",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute felony and misdemeanor record levels and habitual status
    Report(ReportArgs),
    /// Print the classification table with severity rank and felony points
    Classes,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// CSV of prior convictions (Crime,Class,Offense Date,Conviction Date,Location,Statute)
    #[arg(long)]
    convictions: PathBuf,
    /// Defendant's birthdate (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    birthdate: NaiveDate,
    /// Optional CSV of pending charges, same columns with a blank conviction date
    #[arg(long)]
    pending: Option<PathBuf>,
    /// Defendant's name for the report heading
    #[arg(long)]
    name: Option<String>,
    /// Override the configured output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Report(args) => {
            let format = args.format.unwrap_or(config.output.format);
            info!(environment = ?config.environment, ?format, "computing record report");
            let report = build_report(&args)?;
            write_report(&mut out, &report, format)
        }
        Command::Classes => render_classes(&mut out).map_err(AppError::from),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn build_report(args: &ReportArgs) -> Result<RecordReport, AppError> {
    let convictions = ConvictionImporter::from_path(&args.convictions)?;
    let pending = match &args.pending {
        Some(path) => ConvictionImporter::from_path(path)?,
        None => Vec::new(),
    };

    let mut defendant = Defendant::new(args.birthdate);
    if let Some(name) = &args.name {
        defendant = defendant.with_name(name.as_str());
    }

    info!(
        convictions = convictions.len(),
        pending = pending.len(),
        "conviction lists imported"
    );

    Ok(RecordReport::compute(&defendant, &convictions, &pending)?)
}

fn write_report<W: Write>(
    out: &mut W,
    report: &RecordReport,
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => render_report(out, report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn render_report<W: Write>(out: &mut W, report: &RecordReport) -> std::io::Result<()> {
    let defendant = &report.defendant;
    match &defendant.name {
        Some(name) => writeln!(out, "Record levels for {}, born {}", name, defendant.birthdate)?,
        None => writeln!(out, "Record levels for defendant born {}", defendant.birthdate)?,
    }
    writeln!(
        out,
        "Eighteenth birthday: {}",
        report.habitual.eighteenth_birthday
    )?;

    let felony = &report.felony;
    writeln!(
        out,
        "\nFelony record: {} points, level {}",
        felony.points, felony.level
    )?;
    for component in &felony.components {
        writeln!(
            out,
            "- {}: {} ({}) +{}",
            component.conviction_date, component.crime, component.classification, component.points
        )?;
    }

    let misdemeanor = &report.misdemeanor;
    writeln!(
        out,
        "\nMisdemeanor record: {} points, level {}",
        misdemeanor.points, misdemeanor.level
    )?;
    if let Some(date) = misdemeanor.level_two_on {
        writeln!(out, "- level 2 reached {date}")?;
    }
    if let Some(date) = misdemeanor.level_three_on {
        writeln!(out, "- level 3 reached {date}")?;
    }

    let habitual = &report.habitual;
    match habitual.qualifying_date {
        Some(date) if habitual.eligible => {
            writeln!(out, "\nHabitual felon eligible: yes, as of {date}")?
        }
        _ => writeln!(out, "\nHabitual felon eligible: no")?,
    }
    for (index, strike) in habitual.counted_convictions.iter().enumerate() {
        writeln!(out, "- strike {}: {}", index + 1, strike)?;
    }

    if report.pending.is_empty() {
        writeln!(out, "\nPending charges: none")?;
    } else {
        writeln!(out, "\nPending charges")?;
        for charge in &report.pending {
            let status = if charge.habitual_eligible {
                "habitual eligible"
            } else {
                "not habitual eligible"
            };
            writeln!(
                out,
                "- {} ({}), offense {}: {}",
                charge.crime, charge.classification, charge.offense_date, status
            )?;
        }
    }

    Ok(())
}

fn render_classes<W: Write>(out: &mut W) -> std::io::Result<()> {
    for class in Classification::ordered() {
        let points = match felony_points(class) {
            Some(points) => points.to_string(),
            None => "-".to_string(),
        };
        writeln!(
            out,
            "{:>2}  {:<22} felony points: {}",
            class.severity_rank(),
            class.label(),
            points
        )?;
    }
    Ok(())
}
