// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use robots_sitemap::services::logging::init_tracing;
use robots_sitemap::{
    ProgressSink, ResolverSettings, Robots, TransportSettings, UrlEntry, WILDCARD_AGENT,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

// Version is extracted from Cargo.toml at compile time via build.rs
// In release pipelines, the patch version can be overridden via ROBOTS_SITEMAP_PATCH_VERSION
const VERSION: &str = env!("ROBOTS_SITEMAP_VERSION");

#[derive(Parser)]
#[command(name = "robots-sitemap", version = VERSION, about = "Query robots.txt rules and resolve sitemaps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether a path is allowed for an agent
    Check {
        robots_url: String,
        path: String,
        #[arg(long, default_value = WILDCARD_AGENT)]
        agent: String,
    },
    /// Print the crawl delay for an agent
    Delay {
        robots_url: String,
        #[arg(long, default_value = WILDCARD_AGENT)]
        agent: String,
    },
    /// Resolve the sitemaps of a robots.txt, or a single sitemap URL, into page URLs
    Sitemaps {
        url: String,
        /// Print one JSON object per URL
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("warn");
    let cli = Cli::parse();

    let transport = TransportSettings::from_env();
    let settings = ResolverSettings::from_env();
    let robots = Robots::http(&transport, settings).context("failed to build HTTP client")?;

    match cli.command {
        Command::Check {
            robots_url,
            path,
            agent,
        } => check(robots, &robots_url, &path, &agent).await,
        Command::Delay { robots_url, agent } => delay(robots, &robots_url, &agent).await,
        Command::Sitemaps { url, json } => sitemaps(robots, &url, json).await,
    }
}

async fn check(mut robots: Robots, robots_url: &str, path: &str, agent: &str) -> Result<()> {
    robots
        .load_from_url(robots_url)
        .await
        .with_context(|| format!("failed to load {}", robots_url))?;

    let verdict = if robots.is_path_disallowed(path, agent)? {
        "disallowed"
    } else if robots.is_path_allowed(path, agent)? {
        "allowed (explicit)"
    } else {
        "allowed"
    };
    println!("{}", verdict);
    Ok(())
}

async fn delay(mut robots: Robots, robots_url: &str, agent: &str) -> Result<()> {
    robots
        .load_from_url(robots_url)
        .await
        .with_context(|| format!("failed to load {}", robots_url))?;

    println!("{}", robots.crawl_delay(agent)?);
    Ok(())
}

async fn sitemaps(robots: Robots, url: &str, json: bool) -> Result<()> {
    let token = CancellationToken::new();
    let on_ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let progress: ProgressSink = Arc::new(|total| eprintln!("{} urls found", total));
    let mut robots = robots.with_progress(progress).with_cancellation(token);

    let resolution = if is_robots_url(url) {
        robots
            .load_from_url(url)
            .await
            .with_context(|| format!("failed to load {}", url))?;
        robots.resolve_sitemaps(None).await?
    } else {
        robots.resolve_sitemaps(Some(url)).await?
    };

    for entry in &resolution.entries {
        print_entry(entry, json)?;
    }

    for failure in &resolution.failures {
        warn!(url = %failure.url, error = %failure.error, "sitemap skipped");
    }
    if resolution.cancelled {
        eprintln!("cancelled after {} urls", resolution.len());
    }
    Ok(())
}

fn print_entry(entry: &UrlEntry, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(entry)?);
    } else {
        println!("{}", entry.loc);
    }
    Ok(())
}

fn is_robots_url(url: &str) -> bool {
    url::Url::parse(url).is_ok_and(|parsed| parsed.path().eq_ignore_ascii_case("/robots.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_follows_semver_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|part| part.parse::<u32>().is_ok()));
    }

    #[test]
    fn test_is_robots_url() {
        assert!(is_robots_url("https://example.com/robots.txt"));
        assert!(!is_robots_url("https://example.com/sitemap.xml"));
        assert!(!is_robots_url("robots.txt"));
    }

    #[test]
    fn test_cli_parses_agent_default() {
        let cli = Cli::parse_from(["robots-sitemap", "delay", "https://example.com/robots.txt"]);
        match cli.command {
            Command::Delay { agent, .. } => assert_eq!(agent, "*"),
            _ => panic!("expected delay command"),
        }
    }

    #[test]
    fn test_cli_parses_sitemaps_json_flag() {
        let cli = Cli::parse_from([
            "robots-sitemap",
            "sitemaps",
            "https://example.com/sitemap.xml",
            "--json",
        ]);
        assert!(matches!(cli.command, Command::Sitemaps { json: true, .. }));
    }
}
