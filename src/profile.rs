use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field order matches the serialized artifact.
pub const FIELDS: &[&str] = &[
    "domain",
    "company_name",
    "logo",
    "short_description",
    "long_description",
    "sector",
    "industry",
    "sub_industry",
    "sic_code",
    "sic_text",
    "tags",
];

/// The final per-company record. Every field is a plain string once a
/// profile leaves the merger — never null, never a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub sub_industry: String,
    #[serde(default)]
    pub sic_code: String,
    #[serde(default)]
    pub sic_text: String,
    #[serde(default)]
    pub tags: String,
}

impl Profile {
    /// Coerce an arbitrary loosely-typed profile object into the strict
    /// schema. Missing keys and nulls become empty strings, non-empty lists
    /// are comma-joined, non-string scalars are stringified, and every value
    /// is trimmed. Both the quality gate and the merger go through this one
    /// function, which keeps the coercion idempotent.
    pub fn from_value(raw: &Value) -> Profile {
        let field = |key: &str| coerce_field(raw.get(key));

        Profile {
            domain: field("domain"),
            company_name: field("company_name"),
            logo: field("logo"),
            short_description: field("short_description"),
            long_description: field("long_description"),
            sector: field("sector"),
            industry: field("industry"),
            sub_industry: field("sub_industry"),
            sic_code: field("sic_code"),
            sic_text: field("sic_text"),
            tags: field("tags"),
        }
    }

    /// Loose-JSON view of the profile, the shape the quality gate and the
    /// raw artifact work in.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "domain": self.domain,
            "company_name": self.company_name,
            "logo": self.logo,
            "short_description": self.short_description,
            "long_description": self.long_description,
            "sector": self.sector,
            "industry": self.industry,
            "sub_industry": self.sub_industry,
            "sic_code": self.sic_code,
            "sic_text": self.sic_text,
            "tags": self.tags,
        })
    }

    pub fn field(&self, key: &str) -> &str {
        match key {
            "domain" => &self.domain,
            "company_name" => &self.company_name,
            "logo" => &self.logo,
            "short_description" => &self.short_description,
            "long_description" => &self.long_description,
            "sector" => &self.sector,
            "industry" => &self.industry,
            "sub_industry" => &self.sub_industry,
            "sic_code" => &self.sic_code,
            "sic_text" => &self.sic_text,
            "tags" => &self.tags,
            _ => "",
        }
    }
}

fn coerce_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
            .trim()
            .to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

// ── Tests ──
