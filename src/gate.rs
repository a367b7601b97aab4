use serde_json::Value;
use tracing::warn;

use crate::profile::Profile;

/// Why the gate refused a candidate. Reasons are values, not errors: a
/// rejection is recorded against the domain and the batch moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoShortDescription,
    UnknownIndustry,
    NoSector,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NoShortDescription => "no_short_description",
            RejectReason::UnknownIndustry => "unknown_industry",
            RejectReason::NoSector => "no_sector",
        }
    }
}

/// Accepted-and-repaired profile, or a rejection with its reason. Never both.
#[derive(Debug)]
pub enum ValidationOutcome {
    Accepted(Profile),
    Rejected { domain: String, reason: RejectReason },
}

/// Validate a candidate profile: coerce to the strict schema, reject on the
/// fatal rules, then repair the fixable defects.
pub fn validate(raw: &Value) -> ValidationOutcome {
    let mut profile = Profile::from_value(raw);

    if profile.short_description.is_empty() {
        return reject(profile.domain, RejectReason::NoShortDescription);
    }
    if profile.industry.is_empty() || profile.industry.eq_ignore_ascii_case("unknown") {
        return reject(profile.domain, RejectReason::UnknownIndustry);
    }
    if profile.sector.is_empty() {
        return reject(profile.domain, RejectReason::NoSector);
    }

    // Repairs only run on profiles that passed every rejection rule.
    if profile.company_name.is_empty() {
        profile.company_name = company_name_from_domain(&profile.domain);
    }
    if profile.long_description.is_empty() {
        profile.long_description = profile.short_description.clone();
    }
    if !profile.logo.is_empty()
        && !profile.logo.starts_with("http://")
        && !profile.logo.starts_with("https://")
    {
        // Schemeless logo URLs are useless to the frontend; an empty logo is
        // a legal final state.
        profile.logo = String::new();
    }

    ValidationOutcome::Accepted(profile)
}

fn reject(domain: String, reason: RejectReason) -> ValidationOutcome {
    warn!("rejected {}: {}", domain, reason.code());
    ValidationOutcome::Rejected { domain, reason }
}

/// Derive a display name from the domain's first label: "acme-corp.com"
/// becomes "Acme-corp".
fn company_name_from_domain(domain: &str) -> String {
    if domain.is_empty() {
        return "Unknown Company".to_string();
    }
    let stripped = domain.strip_prefix("www.").unwrap_or(domain);
    let label = stripped.split('.').next().unwrap_or(stripped);
    capitalize(label)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// ── Tests ──
