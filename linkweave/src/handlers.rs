use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkweave_core::budget::LinkBudgetMode;
use linkweave_core::crawl::{
    CrawlMap, CrawlOptions, Discovery, DiscoveryCallback, FetchErrorPolicy, PageCallback,
    execute_crawl,
};
use linkweave_core::graph::NodeKind;
use linkweave_core::report::{ReportFormat, generate_summary, render_report, save_report};
use linkweave_scanner::HttpLinkExtractor;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::prompt::{parse_max_depth, parse_seed_url, prompt_max_depth, prompt_seed_url};

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Gather crawl options from command line values
pub fn crawl_options_from_args(
    max_depth: u8,
    rng_seed: Option<u64>,
    fixed_link_budget: Option<f64>,
    skip_failed: bool,
) -> Result<CrawlOptions> {
    let link_budget = match fixed_link_budget {
        Some(budget) if !budget.is_finite() => bail!("link budget must be a finite number"),
        Some(budget) => LinkBudgetMode::Fixed(budget),
        None => LinkBudgetMode::Random { seed: rng_seed },
    };

    let mut options = CrawlOptions::new(max_depth)?;
    options.link_budget = link_budget;
    options.fetch_error_policy = if skip_failed {
        FetchErrorPolicy::Skip
    } else {
        FetchErrorPolicy::Abort
    };
    Ok(options)
}

/// Expand a leading `~` in an output path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// An explicit `--format` wins, then the output file extension, then text.
pub fn infer_format(explicit: Option<&str>, output: Option<&Path>) -> ReportFormat {
    explicit
        .and_then(ReportFormat::from_str)
        .or_else(|| {
            output
                .and_then(|p| p.extension())
                .and_then(|ext| ext.to_str())
                .and_then(ReportFormat::from_str)
        })
        .unwrap_or(ReportFormat::Text)
}

/// One console line per newly classified link
pub fn format_discovery(discovery: &Discovery) -> String {
    let (label, url) = match discovery.kind {
        NodeKind::External => ("External link:", discovery.url.yellow()),
        _ => ("Internal link:", discovery.url.blue()),
    };
    format!("[{}] {} {}", discovery.id, label, url)
}

fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Starting crawl...");
    pb
}

fn print_summary(map: &CrawlMap) {
    println!();
    for line in generate_summary(&map.summary()).lines() {
        println!("{}", line.green().bold());
    }
    if !map.failed_pages.is_empty() {
        println!(
            "{} {} page(s) could not be fetched",
            "⚠".yellow().bold(),
            map.failed_pages.len()
        );
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    // Seed and depth come from flags when given, otherwise from the console.
    let seed_url = match sub_matches.get_one::<Url>("url") {
        Some(url) => parse_seed_url(url.as_str())?,
        None => {
            let stdin = io::stdin();
            prompt_seed_url(&mut stdin.lock(), &mut io::stdout())
                .context("failed to read the seed link")?
        }
    };
    let max_depth = match sub_matches.get_one::<String>("depth") {
        Some(depth) => parse_max_depth(depth)?,
        None => {
            let stdin = io::stdin();
            prompt_max_depth(&mut stdin.lock(), &mut io::stdout())
                .context("failed to read the graph depth")?
        }
    };

    let options = crawl_options_from_args(
        max_depth,
        sub_matches.get_one::<u64>("seed").copied(),
        sub_matches.get_one::<f64>("link-budget").copied(),
        sub_matches.get_flag("skip-failed"),
    )?;
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let output = sub_matches
        .get_one::<String>("output")
        .map(|raw| resolve_output_path(raw));
    let format = infer_format(
        sub_matches.get_one::<String>("format").map(String::as_str),
        output.as_deref(),
    );

    if !quiet {
        println!("\n{} {}", "Crawling".bright_white().bold(), seed_url.bright_cyan());
        println!("Max depth: {}", max_depth);
        println!("Timeout: {}s\n", timeout);
    }

    let extractor = HttpLinkExtractor::with_timeout(timeout)?;
    let pb = spinner(!quiet);

    let discovery_callback: Option<DiscoveryCallback> = if quiet {
        None
    } else {
        let pb = pb.clone();
        Some(Arc::new(move |discovery: &Discovery| {
            if discovery.first_sighting {
                pb.suspend(|| println!("{}", format_discovery(discovery)));
            }
        }))
    };

    let page_pb = pb.clone();
    let page_callback: PageCallback = Arc::new(move |fetched: usize, url: &str| {
        page_pb.set_message(format!("Crawling... {} pages fetched, now {}", fetched, url));
    });

    let result = execute_crawl(
        &seed_url,
        extractor,
        options,
        discovery_callback,
        Some(page_callback),
    )
    .await;

    let map = match result {
        Ok(map) => {
            pb.finish_and_clear();
            map
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e).context("crawl failed");
        }
    };

    info!(
        "Crawl of {} finished at depth {} with {} nodes",
        map.seed_url,
        map.depth_reached,
        map.graph.node_count()
    );
    print_summary(&map);

    match output {
        Some(path) => {
            let content = render_report(&map, format).await?;
            save_report(&content, &path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!(
                "\n{} Report saved to: {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None if sub_matches.get_one::<String>("format").is_some() => {
            let content = render_report(&map, format).await?;
            let mut stdout = io::stdout();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
        None => {}
    }

    Ok(())
}
