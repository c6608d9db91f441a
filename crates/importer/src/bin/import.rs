use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use importer::{
    FieldMapping, ImportOptions, ModelConfig, ParseOutcome, SourceFormat, group_races,
    score_groups,
};
use rust_decimal::Decimal;
use scoring::{CourseRepository, ScoringError};
use scoring::models::{Course, RaceTime};
use scoring::services::{prediction, recompute};
use serde::Serialize;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "xc-import")]
#[command(about = "Cross-country results importer and scorer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Only needed by commands that read from the results store.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a results file and group it into races.
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Parse, group and team-score a results file run on one course.
    Score {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        course: CourseArgs,
    },
    /// Re-derive XC times for every stored result on a course.
    Recompute { course_id: Uuid },
    /// Suggest a difficulty rating from athletes shared with a reference course.
    Calibrate {
        course_id: Uuid,

        #[arg(long)]
        reference: Uuid,
    },
    /// Forecast a time on a course from a universal-ability (XC) time.
    Predict {
        ability: RaceTime,

        #[command(flatten)]
        course: CourseArgs,
    },
}

#[derive(clap::Args)]
struct InputArgs {
    /// CSV export or scraped JSON array.
    file: PathBuf,

    /// JSON object mapping logical fields to source headers.
    #[arg(short, long)]
    mapping: PathBuf,

    /// Race date, used to derive grades from graduation years (YYYY-MM-DD).
    #[arg(long)]
    race_date: Option<NaiveDate>,

    #[arg(long)]
    validate_only: bool,
}

#[derive(clap::Args)]
struct CourseArgs {
    #[arg(long, default_value = "Course")]
    course_name: String,

    #[arg(long)]
    distance: u32,

    #[arg(long, default_value = "1.0")]
    rating: Decimal,

    /// Age/progression multiplier applied to the XC time.
    #[arg(long)]
    maturation: Option<Decimal>,
}

impl CourseArgs {
    fn course(&self) -> Result<Course> {
        Ok(Course::new(&self.course_name, self.distance, self.rating)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "xc_import={},importer={},scoring={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let model = ModelConfig::from_env()?;

    match cli.command {
        Commands::Parse { input } => {
            let Some(outcome) = load_results(&input).await? else {
                return Ok(());
            };
            let groups = group_races(&outcome.results);
            let races: Vec<_> = groups
                .iter()
                .map(|group| {
                    json!({
                        "name": group.name,
                        "category": group.category,
                        "gender": group.gender,
                        "results_count": group.results_count(),
                        "results": group.results,
                    })
                })
                .collect();

            print_json(&json!({
                "summary": outcome.summary,
                "warnings": outcome.warnings,
                "races": races,
            }))?;
        }
        Commands::Score {
            input,
            course: course_args,
        } => {
            let (course, maturation) = course_from(&course_args)?;
            let Some(outcome) = load_results(&input).await? else {
                return Ok(());
            };
            let groups = group_races(&outcome.results);
            let reports = score_groups(&groups, &course, maturation, &model.normalization)?;

            print_json(&json!({
                "summary": outcome.summary,
                "warnings": outcome.warnings,
                "course": course,
                "races": reports,
            }))?;
        }
        Commands::Recompute { course_id } => {
            let pool = connect(cli.database_url.as_deref()).await?;
            let repository = CourseRepository::new(&pool);

            let updates =
                recompute::recompute_course_xc_times(&repository, course_id, &model.normalization)
                    .await
                    .map_err(|e| store_failure(course_id, e))?;
            print_json(&updates)?;
        }
        Commands::Calibrate {
            course_id,
            reference,
        } => {
            let pool = connect(cli.database_url.as_deref()).await?;
            let repository = CourseRepository::new(&pool);

            let advice = recompute::advise_course_difficulty(&repository, course_id, reference)
                .await
                .map_err(|e| store_failure(course_id, e))?;
            match advice {
                Some(advice) => print_json(&advice)?,
                None => tracing::warn!("Not enough shared athletes to recommend a rating"),
            }
        }
        Commands::Predict {
            ability,
            course: course_args,
        } => {
            let (course, maturation) = course_from(&course_args)?;
            let prediction = prediction::predict_time(
                ability,
                &course,
                maturation,
                &model.prediction,
                &model.normalization,
            )?;

            print_json(&json!({
                "base": prediction.base.to_string(),
                "penalty": prediction.penalty,
                "predicted": prediction.predicted.to_string(),
                "predicted_cs": prediction.predicted.centiseconds(),
            }))?;
        }
    }

    Ok(())
}

fn course_from(args: &CourseArgs) -> Result<(Course, Option<Decimal>)> {
    Ok((args.course()?, args.maturation))
}

/// Reads, validates and parses the input file. `None` when only
/// validation was requested.
async fn load_results(input: &InputArgs) -> Result<Option<ParseOutcome>> {
    tracing::info!("Loading field mapping from: {}", input.mapping.display());
    let mapping_json = tokio::fs::read_to_string(&input.mapping)
        .await
        .with_context(|| format!("Cannot read mapping file {}", input.mapping.display()))?;
    let mapping: FieldMapping =
        serde_json::from_str(&mapping_json).context("Mapping file is not a valid field mapping")?;

    let format = SourceFormat::from_path(&input.file)?;
    let importer = format.importer();

    tracing::info!("Loading {} results from: {}", importer.name(), input.file.display());
    let content = tokio::fs::read_to_string(&input.file)
        .await
        .with_context(|| format!("Cannot read results file {}", input.file.display()))?;

    tracing::info!("Validating field mapping...");
    let report = importer.validate(&content, &mapping)?;
    report.log_warnings();
    tracing::info!("✓ Mapping is valid");

    if input.validate_only {
        return Ok(None);
    }

    let options = ImportOptions {
        race_date: input.race_date,
    };
    let outcome = importer.import(&content, &mapping, &options)?;
    for warning in outcome.warnings.iter().skip(report.warnings.len()) {
        tracing::warn!("{}", warning);
    }

    Ok(Some(outcome))
}

async fn connect(database_url: Option<&str>) -> Result<sqlx::PgPool> {
    let database_url =
        database_url.ok_or_else(|| anyhow!("DATABASE_URL is required for this command"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .context("Cannot connect to the results store")?;
    Ok(pool)
}

fn store_failure(course_id: Uuid, err: ScoringError) -> anyhow::Error {
    let message = if err.is_external() {
        format!("Results store failed while processing course {}; safe to retry", course_id)
    } else {
        format!("Cannot process course {}", course_id)
    };
    anyhow::Error::new(err).context(message)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
