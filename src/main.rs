use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use revfeed::audit::FeedbackAuditor;
use revfeed::ingest::{OpenReviewClient, load_paper, load_review};
use revfeed::llm::{AnthropicClient, LlmClient};
use revfeed::pipeline::{FeedbackPipeline, FeedbackReport, LogObserver, parse_kinds};
use revfeed::prompt::{PromptLoader, PromptSet};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, RunOptions};
use config::Config;

fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revfeed")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("revfeed.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run { paper, review, options } => {
            let paper_text = load_paper(paper).await.context("Failed to load paper")?;
            let review_text = load_review(review).context("Failed to load review")?;
            generate_feedback(&paper_text, &review_text, options, cli.is_verbose(), config).await
        }
        Commands::OpenReview {
            paper_id,
            review_id,
            reviewer_id,
            options,
        } => {
            let client = OpenReviewClient::new(
                &config.openreview.api_url,
                &config.openreview.pdf_url,
                Duration::from_millis(config.openreview.timeout_ms),
            )?;

            let review_id = match (review_id, reviewer_id) {
                (Some(id), _) => id.clone(),
                (None, Some(reviewer)) => client.find_review_id(paper_id, reviewer).await?,
                (None, None) => return Err(eyre!("Either --review-id or --reviewer-id is required")),
            };
            println!("{} {} on paper {}", "Review:".cyan(), review_id, paper_id);

            let (paper_text, review_text) = client.fetch_paper_and_review(paper_id, &review_id).await?;
            generate_feedback(&paper_text, &review_text, options, cli.is_verbose(), config).await
        }
        Commands::Check { architecture } => handle_check_command(architecture),
    }
}

fn handle_check_command(architecture: &str) -> Result<()> {
    info!("Checking architecture: {}", architecture);
    let kinds = parse_kinds(architecture)?;

    println!("{} {} stages", "Valid architecture:".green(), kinds.len());
    for (i, kind) in kinds.iter().enumerate() {
        println!("  {}. {}", i + 1, kind);
    }
    Ok(())
}

fn load_prompts(config: &Config) -> Result<PromptSet> {
    let prompts = PromptSet::builtin();
    match &config.pipeline.prompts_dir {
        Some(dir) => {
            info!("Loading prompt overrides from {}", dir.display());
            Ok(prompts.with_overrides(&PromptLoader::new(dir))?)
        }
        None => Ok(prompts),
    }
}

async fn generate_feedback(
    paper: &str,
    review: &str,
    options: &RunOptions,
    verbose: bool,
    config: &Config,
) -> Result<()> {
    let llm = Arc::new(AnthropicClient::new(config.llm.to_anthropic())?);
    let architecture = options
        .architecture
        .clone()
        .unwrap_or_else(|| config.pipeline.architecture.clone());

    let pipeline = FeedbackPipeline::builder(llm.clone())
        .architecture(&architecture)
        .prompts(load_prompts(config)?)
        .observer(LogObserver)
        .build()
        .context("Failed to build pipeline")?;

    let stages: Vec<String> = pipeline.sequence().iter().map(|k| k.to_string()).collect();
    println!("{} {}", "Pipeline:".cyan(), stages.join(" -> "));
    println!("{} {}", "Model:".cyan(), llm.model());

    let report = pipeline.run(paper, review).await.context("Pipeline failed")?;
    write_report(&report, options, verbose)?;

    let usage = llm.total_usage();
    println!(
        "{} {} tokens (${:.4})",
        "Usage:".cyan(),
        usage.total(),
        usage.cost_usd(llm.model())
    );

    if options.audit || config.audit.enabled {
        let final_feedback = report
            .final_feedback()
            .ok_or_else(|| eyre!("Pipeline produced no feedback to audit"))?;

        let auditor = FeedbackAuditor::new(llm.clone()).with_properties(config.audit.properties()?);
        let (passed, failed) = auditor.audit(final_feedback, review).await.context("Audit failed")?;

        if passed {
            println!("{}", "Audit passed".green());
        } else {
            println!("{} {}", "Audit failed:".red(), failed.join(", "));
        }
    }

    Ok(())
}

fn write_report(report: &FeedbackReport, options: &RunOptions, verbose: bool) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;

    match &options.output {
        Some(path) => {
            fs::write(path, &json).context(format!("Failed to write report to {}", path.display()))?;
            println!("{} {}", "Report written to".green(), path.display());
            match report.final_feedback() {
                Some(feedback) => println!("\n{}\n", feedback),
                None => println!("{}", "No feedback produced".yellow()),
            }
        }
        None if verbose => println!("{}", json),
        None => match report.final_feedback() {
            Some(feedback) => println!("\n{}\n", feedback),
            None => println!("{}", "No feedback produced".yellow()),
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
