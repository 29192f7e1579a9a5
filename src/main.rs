//! CLI entry point for the grade rater.
//!
//! Loads a roster CSV once, then answers one query against it: class
//! summary, augmented table, rankings, distributions, name search, or an
//! export of the derived columns.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use grade_rater::analyzers::aggregate::{class_summary, subject_means};
use grade_rater::analyzers::distribution::{cumulative_at_or_above, distribution, histogram};
use grade_rater::analyzers::rank::{Metric, Order, RankLimit, rank_by, top_and_bottom};
use grade_rater::analyzers::search::{SearchOutcome, find_by_name};
use grade_rater::config::EngineConfig;
use grade_rater::normalize::{load_roster, load_roster_or_empty};
use grade_rater::output::{format_students, print_pretty, write_json, write_roster_csv};
use grade_rater::roster::{Roster, Student, StudentRecord};
use grade_rater::store::RosterStore;
use serde::Serialize;
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_rater")]
#[command(about = "Student roster analytics: totals, GPA, rankings and grade distributions", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Roster CSV file (.csv or .csv.gz)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// JSON engine config (falls back to GRADE_RATER_CONFIG)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Comma-separated subject columns, overriding the config
    #[arg(long, value_delimiter = ',', global = true)]
    subjects: Option<Vec<String>>,

    /// Column holding student names, overriding the config
    #[arg(long, global = true)]
    name_column: Option<String>,

    /// Pass threshold, overriding the config
    #[arg(long, global = true)]
    pass_threshold: Option<f64>,

    /// Continue with an empty roster if the input cannot be read
    #[arg(long, default_value_t = false, global = true)]
    allow_empty: bool,

    /// Print student lists as JSON instead of a text table
    #[arg(long, default_value_t = false, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Class-wide statistics, pass rates and per-subject reports
    Summary,
    /// Every student with Total, Average, GPA and Status
    Table,
    /// Rank students by a metric
    Rank {
        /// total, average, gpa, a subject name, or subject:<name>
        #[arg(short, long, default_value = "total")]
        by: Metric,

        #[arg(short, long, value_enum, default_value_t = OrderArg::Desc)]
        order: OrderArg,

        /// Number of students to show (defaults to the config's rank limit)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Lowest and highest performers side by side
    TopBottom {
        #[arg(short, long, default_value = "average")]
        by: Metric,

        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },
    /// Case-insensitive search by student name
    Search {
        #[arg(value_name = "QUERY", default_value = "")]
        query: String,
    },
    /// Letter-grade distribution
    Distribution {
        #[command(flatten)]
        scores: ScoreArgs,
    },
    /// Count of scores at or above each threshold
    Cumulative {
        #[command(flatten)]
        scores: ScoreArgs,

        /// Comma-separated thresholds (defaults to the config's list)
        #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
        thresholds: Option<Vec<f64>>,
    },
    /// Fixed-width histogram of scores
    Histogram {
        #[command(flatten)]
        scores: ScoreArgs,
    },
    /// Mean score per subject, flagging subjects below the pass threshold
    Compare,
    /// Write the roster with derived columns to CSV
    Export {
        #[arg(short, long, default_value = "roster_report.csv")]
        output: String,

        /// Gzip compress the output
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[derive(Args)]
struct ScoreArgs {
    /// Use one subject's scores
    #[arg(short, long, conflicts_with = "averages")]
    subject: Option<String>,

    /// Use per-student averages
    #[arg(long, default_value_t = false)]
    averages: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for Order {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => Order::Ascending,
            OrderArg::Desc => Order::Descending,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = build_config(&cli.source)?;
    let roster = if cli.source.allow_empty {
        load_roster_or_empty(&cli.source.input, &config)?
    } else {
        load_roster(&cli.source.input, &config)
            .with_context(|| format!("failed to load {}", cli.source.input.display()))?
    };
    let store = RosterStore::new(roster);
    let roster = store.snapshot();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Summary => {
            let summary = class_summary(&roster);
            print_pretty(&summary);
            write_json(&mut out, &summary)?;
        }
        Commands::Table => {
            let students: Vec<&Student> = roster.students().iter().collect();
            emit_students(&mut out, &roster, &students, cli.source.json)?;
        }
        Commands::Rank { by, order, limit } => {
            let limit = rank_limit(limit, &config)?;
            let ranked = rank_by(&roster, &by, order.into(), limit)?;
            info!(metric = %by, shown = ranked.len(), "Ranked roster");
            emit_students(&mut out, &roster, &ranked, cli.source.json)?;
        }
        Commands::TopBottom { by, limit } => {
            let limit = rank_limit(limit, &config)?;
            let tb = top_and_bottom(&roster, &by, limit)?;
            if cli.source.json {
                #[derive(Serialize)]
                struct Report {
                    bottom: Vec<StudentRecord>,
                    top: Vec<StudentRecord>,
                }
                let report = Report {
                    bottom: records(&roster, &tb.bottom),
                    top: records(&roster, &tb.top),
                };
                write_json(&mut out, &report)?;
            } else {
                writeln!(out, "Needs attention (by {by}):")?;
                write!(out, "{}", format_students(&tb.bottom))?;
                writeln!(out, "\nTop performers (by {by}):")?;
                write!(out, "{}", format_students(&tb.top))?;
            }
        }
        Commands::Search { query } => match find_by_name(&roster, &query)? {
            SearchOutcome::NoResults => {
                warn!(query = %query, "No student matched");
                writeln!(out, "No student called '{query}'")?;
            }
            SearchOutcome::Found(found) => {
                info!(query = %query, matches = found.len(), "Search complete");
                emit_students(&mut out, &roster, &found, cli.source.json)?;
            }
        },
        Commands::Distribution { scores } => {
            let values = score_source(&roster, &scores)?;
            write_json(&mut out, &distribution(values, &config.letter_scale))?;
        }
        Commands::Cumulative { scores, thresholds } => {
            let values = score_source(&roster, &scores)?;
            let thresholds = thresholds.unwrap_or_else(|| config.cumulative_thresholds.clone());
            write_json(&mut out, &cumulative_at_or_above(values, &thresholds))?;
        }
        Commands::Histogram { scores } => {
            let values = score_source(&roster, &scores)?;
            write_json(&mut out, &histogram(values, &config.histogram)?)?;
        }
        Commands::Compare => {
            write_json(&mut out, &subject_means(&roster))?;
        }
        Commands::Export { output, gzip } => {
            write_roster_csv(&output, &roster, &config.name_column, gzip)?;
        }
    }

    Ok(())
}

/// Loads the config file (if any) and applies command-line overrides.
fn build_config(args: &SourceArgs) -> Result<EngineConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os("GRADE_RATER_CONFIG").map(PathBuf::from));

    let mut config = match path {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig::default(),
    };

    if let Some(subjects) = &args.subjects {
        config.subjects = subjects.iter().map(|s| s.trim().to_string()).collect();
    }
    if let Some(name_column) = &args.name_column {
        config.name_column = name_column.clone();
    }
    if let Some(threshold) = args.pass_threshold {
        config.pass_threshold = threshold;
    }

    config.validate()?;
    debug!(?config, "Effective config");
    Ok(config)
}

fn rank_limit(limit: Option<i64>, config: &EngineConfig) -> Result<RankLimit> {
    Ok(match limit {
        Some(limit) => RankLimit::try_from(limit)?,
        None => RankLimit::new(config.rank_limit),
    })
}

/// Scores selected by `--subject` / `--averages`, or every present score.
fn score_source(roster: &Roster, args: &ScoreArgs) -> Result<Vec<Option<f64>>> {
    if let Some(subject) = &args.subject {
        let idx = roster
            .subjects()
            .index_of(subject)
            .ok_or_else(|| grade_rater::QueryError::UnknownMetric(subject.clone()))?;
        return Ok(roster.subject_column(idx).collect());
    }
    if args.averages {
        return Ok(roster.students().iter().map(Student::average).collect());
    }
    Ok(roster.students().iter().flat_map(|s| s.scores().to_vec()).collect())
}

fn records(roster: &Roster, students: &[&Student]) -> Vec<StudentRecord> {
    students.iter().map(|s| roster.record(s)).collect()
}

fn emit_students(
    out: &mut impl Write,
    roster: &Roster,
    students: &[&Student],
    json: bool,
) -> Result<()> {
    if json {
        write_json(out, &records(roster, students))
    } else {
        write!(out, "{}", format_students(students))?;
        Ok(())
    }
}
