//! End-to-end: dump directory -> pipeline -> raw artifact + failure list ->
//! merge -> final artifact -> store lookup.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use company_intel::logo::{LogoResolver, LogoResolverConfig};
use company_intel::pipeline::{self, FAILED_LIST, RAW_ARTIFACT};
use company_intel::profile::Profile;
use company_intel::store::ProfileStore;
use company_intel::{merge, ValidationOutcome};

const SOFTWARE_PAGE: &str = r#"<html>
<head>
    <title>Cloudworks | Home</title>
    <link rel="apple-touch-icon" href="/apple-icon.png">
</head>
<body>
    <nav class="navigation">Home Pricing Docs</nav>
    <div class="cookie-banner">We use cookies to improve your experience</div>
    <main>
        <h1>Cloudworks</h1>
        <p>We provide cloud-based enterprise software solutions for growing businesses.
           Founded in 2015, we serve over 500 companies worldwide every single day.
           Our platform helps teams streamline operations and improve productivity.</p>
    </main>
    <footer>Copyright 2025 Cloudworks</footer>
</body>
</html>"#;

const BANK_PAGE: &str = r#"<html>
<head><title>Firstrate Bank - Personal Banking</title></head>
<body>
    <p>Firstrate Bank offers personal banking, savings accounts and checking accounts.
       We provide trusted financial services, credit cards and mortgage loans to families.
       Our investment advisors build wealth portfolios for every stage of life.</p>
</body>
</html>"#;

fn write_doc(root: &Path, domain: &str, html: &str) {
    let dir = root.join(domain);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), html).unwrap();
}

fn offline_resolver() -> Arc<LogoResolver> {
    Arc::new(LogoResolver::with_config(LogoResolverConfig {
        logo_service: "https://integration-test.invalid".to_string(),
        timeout: Duration::from_millis(200),
        ..LogoResolverConfig::default()
    }))
}

#[tokio::test]
async fn full_batch_produces_merged_artifact_and_failure_list() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_doc(input.path(), "cloudworks.io", SOFTWARE_PAGE);
    write_doc(input.path(), "firstrate-bank.invalid", BANK_PAGE);
    // Too little text: must land in the failure list, not the artifact.
    write_doc(input.path(), "thin.com", "<html><body>hello</body></html>");

    let batch = pipeline::run(input.path(), 4, offline_resolver())
        .await
        .unwrap();
    pipeline::write_outputs(output.path(), &batch).unwrap();

    assert_eq!(batch.accepted.len(), 2);
    assert_eq!(batch.failed.len(), 1);

    let raw_content = std::fs::read_to_string(output.path().join(RAW_ARTIFACT)).unwrap();
    let raw: Vec<Value> = serde_json::from_str(&raw_content).unwrap();
    assert_eq!(raw.len(), 2);

    let failed = std::fs::read_to_string(output.path().join(FAILED_LIST)).unwrap();
    assert_eq!(failed.trim(), "thin.com");
    assert!(!raw_content.contains("thin.com"));

    // Merge and check the batch invariants.
    let (merged, report) = merge::merge(&raw);
    assert_eq!(report.duplicates_removed, 0);

    let domains: HashSet<_> = merged.iter().map(|p| p.domain.as_str()).collect();
    assert_eq!(domains.len(), merged.len());
    for pair in merged.windows(2) {
        assert!(pair[0].company_name.to_lowercase() <= pair[1].company_name.to_lowercase());
    }

    let cloudworks = merged.iter().find(|p| p.domain == "cloudworks.io").unwrap();
    assert_eq!(cloudworks.company_name, "Cloudworks");
    assert_eq!(cloudworks.sector, "Technology");
    assert_eq!(cloudworks.logo, "https://cloudworks.io/apple-icon.png");
    assert!(cloudworks.short_description.contains("cloud-based enterprise software"));
    // Cookie-banner text never reaches a description.
    assert!(!cloudworks.long_description.to_lowercase().contains("cookie"));

    let bank = merged
        .iter()
        .find(|p| p.domain == "firstrate-bank.invalid")
        .unwrap();
    assert_eq!(bank.sector, "Financial Services");
    assert_eq!(bank.industry, "Banking");
    assert_eq!(bank.company_name, "Firstrate Bank");

    // Every accepted profile satisfies the gate invariants.
    for profile in &merged {
        assert!(!profile.short_description.is_empty());
        assert!(!profile.sector.is_empty());
        assert!(!profile.industry.is_empty());
        assert!(!profile.industry.eq_ignore_ascii_case("unknown"));
    }
}

#[tokio::test]
async fn merged_artifact_serves_normalized_lookups() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    write_doc(input.path(), "cloudworks.io", SOFTWARE_PAGE);

    let batch = pipeline::run(input.path(), 2, offline_resolver())
        .await
        .unwrap();
    let (merged, _) = merge::merge(
        &batch.accepted.iter().map(|p| p.to_value()).collect::<Vec<_>>(),
    );

    let artifact = output.path().join("companies.json");
    std::fs::write(&artifact, serde_json::to_string_pretty(&merged).unwrap()).unwrap();

    let store = ProfileStore::load(&artifact).unwrap();
    assert_eq!(store.len(), 1);

    // Scheme and www. are stripped before lookup.
    assert!(store.get("https://www.cloudworks.io").is_some());
    assert!(store.get("cloudworks.io").is_some());
    // Absent domain is the 404-equivalent.
    assert!(store.get("missing.example").is_none());
}

#[tokio::test]
async fn logo_probe_tier_is_used_when_html_names_no_icon() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/favicon.ico"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let input = tempfile::tempdir().unwrap();
    // The "domain" is the mock server's host:port; its page names no icon,
    // so resolution falls through to the conventional-path probes.
    let domain = server.uri().trim_start_matches("http://").to_string();
    write_doc(input.path(), &domain, BANK_PAGE);

    let resolver = Arc::new(LogoResolver::with_config(LogoResolverConfig {
        probe_scheme: "http".to_string(),
        logo_service: "https://integration-test.invalid".to_string(),
        timeout: Duration::from_millis(500),
        ..LogoResolverConfig::default()
    }));

    let batch = pipeline::run(input.path(), 2, resolver).await.unwrap();
    assert_eq!(batch.accepted.len(), 1);
    assert_eq!(
        batch.accepted[0].logo,
        format!("http://{}/favicon.ico", domain)
    );
}

#[test]
fn rejected_candidate_lands_in_failure_list_not_artifact() {
    let raw = serde_json::json!({
        "domain": "bad.com",
        "short_description": "",
        "sector": "Technology",
        "industry": "Software"
    });

    let outcome = company_intel::gate::validate(&raw);
    let ValidationOutcome::Rejected { domain, reason } = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(domain, "bad.com");

    // The pipeline records rejections exactly like extraction failures.
    let output = pipeline::PipelineOutput {
        accepted: vec![],
        failed: vec![(domain, pipeline::FailureKind::Rejected(reason))],
    };
    let dir = tempfile::tempdir().unwrap();
    pipeline::write_outputs(dir.path(), &output).unwrap();

    let failed = std::fs::read_to_string(dir.path().join(FAILED_LIST)).unwrap();
    assert_eq!(failed.trim(), "bad.com");

    let raw_artifact = std::fs::read_to_string(dir.path().join(RAW_ARTIFACT)).unwrap();
    let profiles: Vec<Profile> = serde_json::from_str(&raw_artifact).unwrap();
    assert!(profiles.is_empty());
}
