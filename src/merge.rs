use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::profile::Profile;

/// Fields whose coverage is worth reporting to the frontend team.
const COVERAGE_FIELDS: &[&str] = &[
    "logo",
    "short_description",
    "long_description",
    "sector",
    "industry",
];

/// Aggregate statistics emitted beside the final artifact. Reporting only —
/// nothing downstream depends on it.
#[derive(Debug, Serialize)]
pub struct MergeReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub duplicates_removed: usize,
    pub field_coverage: BTreeMap<String, usize>,
    pub sector_distribution: BTreeMap<String, usize>,
}

/// Enforce the output schema over the whole batch, drop duplicate domains
/// (first occurrence wins) and sort by company name, case-insensitively.
pub fn merge(raw: &[Value]) -> (Vec<Profile>, MergeReport) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<Profile> = Vec::new();
    let mut duplicates = 0usize;

    for value in raw {
        // Same coercion as the quality gate, so re-running it here is a no-op
        // for profiles that already went through the pipeline.
        let profile = Profile::from_value(value);

        if !seen.insert(profile.domain.clone()) {
            warn!("duplicate domain dropped: {}", profile.domain);
            duplicates += 1;
            continue;
        }
        merged.push(profile);
    }

    merged.sort_by_key(|p| p.company_name.to_lowercase());

    let report = build_report(&merged, duplicates);
    (merged, report)
}

pub fn build_report(profiles: &[Profile], duplicates_removed: usize) -> MergeReport {
    let mut field_coverage = BTreeMap::new();
    for field in COVERAGE_FIELDS {
        let count = profiles.iter().filter(|p| !p.field(field).is_empty()).count();
        field_coverage.insert(field.to_string(), count);
    }

    let mut sector_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for profile in profiles {
        let sector = if profile.sector.is_empty() {
            "Unknown".to_string()
        } else {
            profile.sector.clone()
        };
        *sector_distribution.entry(sector).or_insert(0) += 1;
    }

    MergeReport {
        generated_at: Utc::now(),
        total: profiles.len(),
        duplicates_removed,
        field_coverage,
        sector_distribution,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_profile(domain: &str, name: &str) -> Value {
        json!({
            "domain": domain,
            "company_name": name,
            "short_description": "A description of the company.",
            "sector": "Technology",
            "industry": "Software"
        })
    }

    #[test]
    fn duplicate_domains_keep_first_occurrence() {
        let raw = vec![
            raw_profile("dup.com", "First Corp"),
            raw_profile("dup.com", "Second Corp"),
            raw_profile("other.com", "Other Corp"),
        ];
        let (merged, report) = merge(&raw);

        assert_eq!(merged.len(), 2);
        assert_eq!(report.duplicates_removed, 1);
        let dup = merged.iter().find(|p| p.domain == "dup.com").unwrap();
        assert_eq!(dup.company_name, "First Corp");
    }

    #[test]
    fn output_has_no_duplicate_domains() {
        let raw = vec![
            raw_profile("a.com", "A"),
            raw_profile("b.com", "B"),
            raw_profile("a.com", "A again"),
            raw_profile("b.com", "B again"),
        ];
        let (merged, _) = merge(&raw);
        let domains: HashSet<_> = merged.iter().map(|p| p.domain.as_str()).collect();
        assert_eq!(domains.len(), merged.len());
    }

    #[test]
    fn sorts_by_company_name_case_insensitively() {
        let raw = vec![
            raw_profile("c.com", "zeta Corp"),
            raw_profile("a.com", "Alpha Corp"),
            raw_profile("b.com", "Beta corp"),
        ];
        let (merged, _) = merge(&raw);
        let names: Vec<_> = merged.iter().map(|p| p.company_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Corp", "Beta corp", "zeta Corp"]);

        for pair in merged.windows(2) {
            assert!(pair[0].company_name.to_lowercase() <= pair[1].company_name.to_lowercase());
        }
    }

    #[test]
    fn schema_enforcement_is_idempotent() {
        let raw = vec![json!({
            "domain": "loose.com",
            "company_name": null,
            "tags": ["a", "b"],
            "sic_code": 7372,
            "short_description": "  padded  ",
        })];
        let (once, _) = merge(&raw);
        let reserialized: Vec<Value> =
            once.iter().map(|p| serde_json::to_value(p).unwrap()).collect();
        let (twice, _) = merge(&reserialized);
        assert_eq!(once, twice);
    }

    #[test]
    fn report_counts_coverage_and_sectors() {
        let mut with_logo = raw_profile("a.com", "A");
        with_logo["logo"] = json!("https://a.com/logo.png");
        let raw = vec![with_logo, raw_profile("b.com", "B")];

        let (_, report) = merge(&raw);
        assert_eq!(report.total, 2);
        assert_eq!(report.field_coverage["logo"], 1);
        assert_eq!(report.field_coverage["short_description"], 2);
        assert_eq!(report.sector_distribution["Technology"], 2);
    }
}
