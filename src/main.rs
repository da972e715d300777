use std::process::ExitCode;

use chrono::Local;
use clap::Parser;

use pick_grader::app::{run_grading_with, GradeRun};
use pick_grader::cli::{Cli, Commands};
use pick_grader::config::GraderConfig;
use pick_grader::models::parse_odds;
use pick_grader::openai::ResponsesClient;
use pick_grader::services::{editor, PickOutcome};
use pick_grader::store::{self, WeeksStore};

const RULE: &str = "|===================================================";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json);

    let mut config = GraderConfig::from_env()?;
    if let Some(path) = &cli.data_file {
        config.data_file = path.clone();
    }
    let weeks = WeeksStore::new(&config.data_file);

    match cli.into_command() {
        Commands::Grade { force } => grade(&weeks, &config, force).await,
        Commands::AddWeek { week } => {
            let mut doc = weeks.load().await?;
            editor::add_week(&mut doc, week)?;
            weeks.save(&mut doc).await?;
            println!("Added week {week} to {}", weeks.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Commands::SetPick {
            week,
            name,
            pick,
            status,
            odds,
        } => {
            let mut doc = weeks.load().await?;
            let odds = odds.as_deref().map(parse_odds);
            let saved = editor::set_pick(&mut doc, week, &name, &pick, status, odds)?;
            weeks.save(&mut doc).await?;
            println!("Week {week}: {name} -> {} ({})", saved.pick, saved.status);
            Ok(ExitCode::SUCCESS)
        }
        Commands::MarkWorst { week, name, worst } => {
            let mut doc = weeks.load().await?;
            editor::mark_worst(&mut doc, week, &name, worst)?;
            weeks.save(&mut doc).await?;
            println!("Week {week}: {name} worst = {worst}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Show => {
            let doc = weeks.load().await?;
            let week = store::current_week(&doc)?;
            for line in editor::week_summary(week) {
                println!("{line}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn grade(weeks: &WeeksStore, config: &GraderConfig, force: bool) -> anyhow::Result<ExitCode> {
    let metrics_handle = match config.metrics_file {
        Some(_) => Some(pick_grader::metrics::init_metrics()?),
        None => None,
    };

    let client = ResponsesClient::new(config)?;
    if !config.has_api_key() {
        tracing::warn!("No OPENAI_KEY / OPENAI_API_KEY set; picks will not be graded");
    }

    banner("SCRIPT START");

    let now = Local::now().naive_local();
    let print_line = |line: &PickOutcome| println!("| {line}");
    let outcome = match run_grading_with(weeks, &client, config, now, force, print_line).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(error = %e, "Grading aborted");
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let GradeRun::Skipped(reason) = &outcome {
        println!("| {reason}");
    }

    banner("SCRIPT END");

    if let GradeRun::Completed { report, version } = &outcome {
        println!(
            "Saved {} (version {version}, {} graded)",
            weeks.path().display(),
            report.graded()
        );
    }

    if let (Some(handle), Some(path)) = (&metrics_handle, &config.metrics_file) {
        if let Err(e) = pick_grader::metrics::write_textfile(handle, path).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to write metrics file");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn banner(title: &str) {
    println!("{RULE}");
    println!("|=== {title} {}", "=".repeat(RULE.len().saturating_sub(title.len() + 6)));
    println!("{RULE}");
}

fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = json || std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
