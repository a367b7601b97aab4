use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};
use serde_json::Value;

use company_intel::logo::LogoResolver;
use company_intel::merge::{self, MergeReport};
use company_intel::pipeline::{self, FAILED_LIST, FINAL_ARTIFACT, RAW_ARTIFACT, REPORT_FILE};
use company_intel::profile::Profile;
use company_intel::store::ProfileStore;

#[derive(Parser)]
#[command(
    name = "company_intel",
    about = "Company profile enrichment from archived website HTML"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every archived site into validated raw profiles
    Run {
        /// Directory of <domain>/index.html dumps
        #[arg(short, long, default_value = "data/input/website_dumps")]
        input: PathBuf,
        /// Output directory for artifacts
        #[arg(short, long, default_value = "data/output")]
        output: PathBuf,
        /// Concurrent documents in flight
        #[arg(short, long, default_value_t = pipeline::DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
    /// Merge raw profiles into the final deduplicated artifact
    Merge {
        /// Directory holding companies_raw.json; receives companies.json
        #[arg(short, long, default_value = "data/output")]
        output: PathBuf,
    },
    /// Coverage and sector statistics for the final artifact
    Stats {
        /// Path to the merged artifact
        #[arg(short, long, default_value = "data/output/companies.json")]
        file: PathBuf,
    },
    /// Look up one company by domain
    Lookup {
        /// Domain to look up (scheme and www. are stripped)
        domain: String,
        /// Path to the merged artifact
        #[arg(short, long, default_value = "data/output/companies.json")]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            concurrency,
        } => {
            let resolver = Arc::new(LogoResolver::new());
            let batch = pipeline::run(&input, concurrency, resolver).await?;
            pipeline::write_outputs(&output, &batch)?;

            let total = batch.accepted.len() + batch.failed.len();
            println!(
                "Processed {} domains: {} accepted, {} failed.",
                total,
                batch.accepted.len(),
                batch.failed.len()
            );
            println!("Raw profiles: {}", output.join(RAW_ARTIFACT).display());
            if !batch.failed.is_empty() {
                println!("Failures:     {}", output.join(FAILED_LIST).display());
                for (domain, kind) in batch.failed.iter().take(10) {
                    println!("  {} ({})", domain, kind.describe());
                }
                if batch.failed.len() > 10 {
                    println!("  ... and {} more", batch.failed.len() - 10);
                }
            }
            println!("\nNext step: company_intel merge");
            Ok(())
        }
        Commands::Merge { output } => {
            let raw_path = output.join(RAW_ARTIFACT);
            let content = std::fs::read_to_string(&raw_path).map_err(|e| {
                anyhow::anyhow!(
                    "{}: {} (run 'company_intel run' first)",
                    raw_path.display(),
                    e
                )
            })?;
            let raw: Vec<Value> = serde_json::from_str(&content)?;
            println!("Loaded {} raw profiles", raw.len());

            let (merged, report) = merge::merge(&raw);

            let final_path = output.join(FINAL_ARTIFACT);
            std::fs::write(&final_path, serde_json::to_string_pretty(&merged)?)?;
            let report_path = output.join(REPORT_FILE);
            std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)?;

            println!("Final artifact: {}", final_path.display());
            print_report(&report);
            Ok(())
        }
        Commands::Stats { file } => {
            let profiles = load_profiles(&file)?;
            let report = merge::build_report(&profiles, 0);
            print_report(&report);
            Ok(())
        }
        Commands::Lookup { domain, file } => {
            let store = ProfileStore::load(&file)?;
            match store.get(&domain) {
                Some(profile) => println!("{}", serde_json::to_string_pretty(profile)?),
                None => println!("Company not found: {}", domain),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_profiles(path: &std::path::Path) -> anyhow::Result<Vec<Profile>> {
    let content = std::fs::read_to_string(path)?;
    let raw: Vec<Value> = serde_json::from_str(&content)?;
    Ok(raw.iter().map(Profile::from_value).collect())
}

fn print_report(report: &MergeReport) {
    println!("\nProfiles:   {}", report.total);
    println!("Duplicates: {}", report.duplicates_removed);

    println!("\nField coverage:");
    for (field, count) in &report.field_coverage {
        let pct = if report.total > 0 {
            *count as f64 / report.total as f64 * 100.0
        } else {
            0.0
        };
        println!("  {:<20} {:>5}/{} ({:.1}%)", field, count, report.total, pct);
    }

    let mut sectors: Vec<(&String, &usize)> = report.sector_distribution.iter().collect();
    sectors.sort_by(|a, b| b.1.cmp(a.1));

    println!("\nSector distribution:");
    for (sector, count) in sectors.iter().take(10) {
        println!("  {:<30} {:>4}", sector, count);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
