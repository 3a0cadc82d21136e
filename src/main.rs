// hfs - command-line access to the HFS exam results API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use hfs_query::{ClientConfig, Endpoint, HfsApi, HfsClient, HfsError};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("hfs error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    if let Command::Endpoints = cli.command {
        let registry: Vec<_> = Endpoint::ALL
            .iter()
            .map(|endpoint| {
                serde_json::json!({
                    "name": endpoint.name(),
                    "template": endpoint.template(),
                    "placeholders": endpoint.placeholders(),
                })
            })
            .collect();
        return print_json(&registry);
    }

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let token = cli
        .token
        .filter(|t| !t.is_empty())
        .ok_or(HfsError::MissingToken)?;
    let client = HfsClient::new(&config).context("failed to build HTTP client")?;
    let api = HfsApi::new(Arc::new(client), &config.base_url);

    match cli.command {
        Command::Exams => print_json(&api.exam_list(&token).await?),
        Command::Snapshot => print_json(&api.user_snapshot(&token).await?),
        Command::LastExam => print_json(&api.last_exam_overview(&token).await?),
        Command::Overview { exam_id } => print_json(&api.exam_overview(&token, &exam_id).await?),
        Command::OverviewV4 { exam_id } => {
            print_json(&api.exam_overview_v4(&token, &exam_id).await?)
        }
        Command::Rank { exam_id } => print_json(&api.exam_rank_info(&token, &exam_id).await?),
        Command::PaperRank { exam_id, paper_id } => {
            print_json(&api.paper_rank_info(&token, &exam_id, &paper_id).await?)
        }
        Command::Pictures {
            exam_id,
            paper_id,
            pid,
        } => print_json(&api.answer_pictures(&token, &exam_id, &paper_id, &pid).await?),
        Command::Endpoints => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    let filter = tracing_subscriber::EnvFilter::try_from_env("HFS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
