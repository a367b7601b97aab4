use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use crate::gate::{self, RejectReason, ValidationOutcome};
use crate::logo::LogoResolver;
use crate::profile::Profile;
use crate::{classify, describe, html};

/// Documents yielding less extracted text than this are skipped as
/// insufficient input.
pub const MIN_TEXT_LEN: usize = 50;

pub const DEFAULT_CONCURRENCY: usize = 8;

pub const RAW_ARTIFACT: &str = "companies_raw.json";
pub const FINAL_ARTIFACT: &str = "companies.json";
pub const REPORT_FILE: &str = "merge_report.json";
pub const FAILED_LIST: &str = "failed_companies.txt";

/// Why a single document produced no profile. Local to that document — the
/// batch always continues.
#[derive(Debug, Clone)]
pub enum FailureKind {
    MissingHtml,
    Unreadable(String),
    InsufficientText(usize),
    Rejected(RejectReason),
}

impl FailureKind {
    pub fn describe(&self) -> String {
        match self {
            FailureKind::MissingHtml => "index.html not found".to_string(),
            FailureKind::Unreadable(err) => format!("unreadable file: {}", err),
            FailureKind::InsufficientText(len) => {
                format!("insufficient text ({} chars)", len)
            }
            FailureKind::Rejected(reason) => format!("rejected: {}", reason.code()),
        }
    }
}

enum DocOutcome {
    Accepted(Profile),
    Failed { domain: String, kind: FailureKind },
}

pub struct PipelineOutput {
    pub accepted: Vec<Profile>,
    pub failed: Vec<(String, FailureKind)>,
}

/// Process every `<domain>/index.html` under `input_dir` concurrently and
/// collect the outcomes. Workers stream results over a channel to a single
/// collector, so no shared mutable state is needed.
pub async fn run(
    input_dir: &Path,
    concurrency: usize,
    resolver: Arc<LogoResolver>,
) -> Result<PipelineOutput> {
    let docs = scan_input_dir(input_dir)?;
    let total = docs.len();
    info!("processing {} domains from {}", total, input_dir.display());

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let (tx, mut rx) = mpsc::channel::<DocOutcome>(concurrency.max(1) * 2);

    for (domain, html_path) in docs {
        let resolver = Arc::clone(&resolver);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();
            let outcome = process_document(&resolver, &domain, &html_path).await;
            let _ = tx.send(outcome).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut accepted = Vec::new();
    let mut failed = Vec::new();

    while let Some(outcome) = rx.recv().await {
        match outcome {
            DocOutcome::Accepted(profile) => accepted.push(profile),
            DocOutcome::Failed { domain, kind } => {
                warn!("{} failed: {}", domain, kind.describe());
                failed.push((domain, kind));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "batch done: {} accepted, {} failed of {}",
        accepted.len(),
        failed.len(),
        total
    );

    Ok(PipelineOutput { accepted, failed })
}

/// One document through the whole chain: extract, classify, synthesize,
/// resolve logo, gate. Every failure is an outcome value, never a panic or
/// a batch abort.
async fn process_document(resolver: &LogoResolver, domain: &str, html_path: &Path) -> DocOutcome {
    let source = match tokio::fs::read_to_string(html_path).await {
        Ok(source) => source,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return DocOutcome::Failed {
                domain: domain.to_string(),
                kind: FailureKind::MissingHtml,
            };
        }
        Err(e) => {
            return DocOutcome::Failed {
                domain: domain.to_string(),
                kind: FailureKind::Unreadable(e.to_string()),
            };
        }
    };

    let extracted = html::extract(&source);
    let text_len = extracted.text.chars().count();
    if text_len < MIN_TEXT_LEN {
        return DocOutcome::Failed {
            domain: domain.to_string(),
            kind: FailureKind::InsufficientText(text_len),
        };
    }

    let classification = classify::classify(&extracted.text);
    let (short_description, long_description) = describe::generate(&extracted.text);
    let logo = resolver.resolve(domain, &source).await;

    // Title wins; the gate derives a name from the domain if both are empty.
    let company_name = extracted.title;

    let candidate = Profile {
        domain: domain.to_string(),
        company_name,
        logo,
        short_description,
        long_description,
        sector: classification.sector,
        industry: classification.industry,
        sub_industry: classification.sub_industry,
        sic_code: classification.sic_code,
        sic_text: classification.sic_text,
        tags: classification.tags,
    };

    match gate::validate(&candidate.to_value()) {
        ValidationOutcome::Accepted(profile) => DocOutcome::Accepted(profile),
        ValidationOutcome::Rejected { domain, reason } => DocOutcome::Failed {
            domain,
            kind: FailureKind::Rejected(reason),
        },
    }
}

/// One subdirectory per domain, each expected to hold an index.html.
/// A missing input directory is the batch's only fatal error.
fn scan_input_dir(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        bail!("input directory not found: {}", dir.display());
    }

    let mut docs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let domain = entry.file_name().to_string_lossy().to_string();
            docs.push((domain, entry.path().join("index.html")));
        }
    }

    // Listing order is filesystem-dependent; sort so progress and logs are
    // reproducible. Output order comes from the merger alone.
    docs.sort();
    Ok(docs)
}

/// Write the raw artifact and the failure list.
pub fn write_outputs(output_dir: &Path, output: &PipelineOutput) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let raw_path = output_dir.join(RAW_ARTIFACT);
    let json = serde_json::to_string_pretty(&output.accepted)?;
    std::fs::write(&raw_path, json)
        .with_context(|| format!("Failed to write {}", raw_path.display()))?;

    let failed_path = output_dir.join(FAILED_LIST);
    let mut lines: Vec<&str> = output.failed.iter().map(|(d, _)| d.as_str()).collect();
    lines.sort();
    std::fs::write(&failed_path, lines.join("\n"))
        .with_context(|| format!("Failed to write {}", failed_path.display()))?;

    Ok(())
}

// ── Tests ──
