//! Offline sector/industry classification over extracted page text.
//!
//! The rule table is an ordered slice, not a map: when two sectors (or two
//! industries) score equally, the first-declared one wins, so classification
//! is reproducible run to run.

use serde::{Deserialize, Serialize};

pub struct SectorRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub industries: &'static [IndustryRule],
}

pub struct IndustryRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub sic_code: &'static str,
    pub sic_text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sector: String,
    pub industry: String,
    pub sub_industry: String,
    pub sic_code: String,
    pub sic_text: String,
    pub tags: String,
}

pub static RULES: &[SectorRule] = &[
    SectorRule {
        name: "Technology",
        keywords: &[
            "software", "saas", "cloud", "app", "platform", "tech", "digital", "ai", "ml",
            "data", "cyber", "it solutions", "computer", "programming", "web", "mobile",
            "api", "database", "server",
        ],
        industries: &[
            IndustryRule {
                name: "Software",
                keywords: &["software", "saas", "application", "app development", "platform", "program"],
                sic_code: "7372",
                sic_text: "Prepackaged Software",
            },
            IndustryRule {
                name: "IT Services",
                keywords: &["consulting", "it services", "managed services", "support", "it consulting"],
                sic_code: "7371",
                sic_text: "Computer Programming Services",
            },
            IndustryRule {
                name: "Cybersecurity",
                keywords: &["security", "cyber", "encryption", "firewall", "protection", "antivirus"],
                sic_code: "7373",
                sic_text: "Computer Integrated Systems Design",
            },
            IndustryRule {
                name: "Web Development",
                keywords: &["web", "website", "web design", "web development", "frontend", "backend"],
                sic_code: "7371",
                sic_text: "Computer Programming Services",
            },
        ],
    },
    SectorRule {
        name: "Financial Services",
        keywords: &[
            "bank", "finance", "investment", "insurance", "trading", "wealth", "credit",
            "loan", "mortgage", "fintech", "payment", "accounting", "financial",
        ],
        industries: &[
            IndustryRule {
                name: "Banking",
                keywords: &["bank", "savings", "checking", "deposit", "atm"],
                sic_code: "6020",
                sic_text: "Commercial Banks",
            },
            IndustryRule {
                name: "Investment",
                keywords: &["investment", "portfolio", "trading", "stocks", "securities", "broker"],
                sic_code: "6211",
                sic_text: "Security Brokers & Dealers",
            },
            IndustryRule {
                name: "Insurance",
                keywords: &["insurance", "coverage", "policy", "claims", "underwriting"],
                sic_code: "6311",
                sic_text: "Life Insurance",
            },
            IndustryRule {
                name: "Accounting",
                keywords: &["accounting", "bookkeeping", "tax", "audit", "cpa"],
                sic_code: "8721",
                sic_text: "Accounting, Auditing & Bookkeeping",
            },
        ],
    },
    SectorRule {
        name: "Healthcare",
        keywords: &[
            "health", "medical", "hospital", "clinic", "patient", "doctor", "nurse",
            "pharmaceutical", "biotech", "medicine", "care", "wellness", "therapy",
            "healthcare",
        ],
        industries: &[
            IndustryRule {
                name: "Healthcare Services",
                keywords: &["hospital", "clinic", "patient care", "medical services", "healthcare"],
                sic_code: "8062",
                sic_text: "General Medical & Surgical Hospitals",
            },
            IndustryRule {
                name: "Pharmaceuticals",
                keywords: &["pharmaceutical", "drug", "medication", "pharmacy", "prescription"],
                sic_code: "2834",
                sic_text: "Pharmaceutical Preparations",
            },
            IndustryRule {
                name: "Medical Devices",
                keywords: &["medical device", "equipment", "diagnostic", "imaging", "surgical"],
                sic_code: "3841",
                sic_text: "Surgical & Medical Instruments",
            },
        ],
    },
    SectorRule {
        name: "Retail",
        keywords: &[
            "retail", "store", "shop", "ecommerce", "e-commerce", "marketplace", "buy",
            "sell", "products", "shopping", "merchant", "sales",
        ],
        industries: &[
            IndustryRule {
                name: "E-commerce",
                keywords: &["ecommerce", "e-commerce", "online store", "marketplace", "shopping", "online shop"],
                sic_code: "5961",
                sic_text: "Catalog & Mail-Order Houses",
            },
            IndustryRule {
                name: "Consumer Goods",
                keywords: &["products", "goods", "merchandise", "consumer"],
                sic_code: "5399",
                sic_text: "Miscellaneous General Merchandise Stores",
            },
        ],
    },
    SectorRule {
        name: "Manufacturing",
        keywords: &[
            "manufacturing", "production", "factory", "industrial", "machinery",
            "equipment", "fabrication", "assembly", "manufacture",
        ],
        industries: &[IndustryRule {
            name: "Industrial Manufacturing",
            keywords: &["manufacturing", "production", "assembly", "factory"],
            sic_code: "3569",
            sic_text: "General Industrial Machinery",
        }],
    },
    SectorRule {
        name: "Professional Services",
        keywords: &[
            "consulting", "advisory", "professional services", "legal", "accounting",
            "marketing", "advertising", "design", "agency", "recruitment", "consulting firm",
        ],
        industries: &[
            IndustryRule {
                name: "Consulting",
                keywords: &["consulting", "advisory", "strategy", "consultant"],
                sic_code: "8742",
                sic_text: "Management Consulting Services",
            },
            IndustryRule {
                name: "Legal Services",
                keywords: &["legal", "law", "attorney", "lawyer", "law firm"],
                sic_code: "8111",
                sic_text: "Legal Services",
            },
            IndustryRule {
                name: "Marketing",
                keywords: &["marketing", "advertising", "branding", "agency", "digital marketing"],
                sic_code: "7311",
                sic_text: "Advertising Agencies",
            },
            IndustryRule {
                name: "Design",
                keywords: &["design", "graphic", "creative", "branding", "ux", "ui"],
                sic_code: "7336",
                sic_text: "Commercial Art & Graphic Design",
            },
        ],
    },
    SectorRule {
        name: "Education",
        keywords: &[
            "education", "school", "university", "training", "learning", "course",
            "teaching", "e-learning", "academic", "tutor",
        ],
        industries: &[IndustryRule {
            name: "Educational Services",
            keywords: &["education", "training", "learning", "school", "university"],
            sic_code: "8200",
            sic_text: "Educational Services",
        }],
    },
    SectorRule {
        name: "Real Estate",
        keywords: &[
            "real estate", "property", "housing", "commercial property", "residential",
            "realtor", "broker",
        ],
        industries: &[IndustryRule {
            name: "Real Estate Services",
            keywords: &["real estate", "property management", "realtor", "broker"],
            sic_code: "6531",
            sic_text: "Real Estate Agents & Managers",
        }],
    },
    SectorRule {
        name: "Transportation",
        keywords: &[
            "transportation", "logistics", "shipping", "delivery", "freight", "trucking",
            "transport",
        ],
        industries: &[IndustryRule {
            name: "Logistics",
            keywords: &["logistics", "shipping", "freight", "delivery"],
            sic_code: "4213",
            sic_text: "Trucking, Except Local",
        }],
    },
    SectorRule {
        name: "Hospitality",
        keywords: &[
            "hotel", "restaurant", "hospitality", "travel", "tourism", "accommodation",
            "food service",
        ],
        industries: &[
            IndustryRule {
                name: "Hotels",
                keywords: &["hotel", "accommodation", "lodging", "resort"],
                sic_code: "7011",
                sic_text: "Hotels & Motels",
            },
            IndustryRule {
                name: "Restaurants",
                keywords: &["restaurant", "dining", "food service", "cafe", "catering"],
                sic_code: "5812",
                sic_text: "Eating Places",
            },
        ],
    },
];

/// Classify page text by keyword evidence. Pure and deterministic; text with
/// no keyword evidence gets the fixed Technology/Software default so the
/// classification is never partially populated.
pub fn classify(text: &str) -> Classification {
    if text.chars().count() < 20 {
        return default_classification();
    }

    let normalized = text.to_lowercase().trim().to_string();

    let mut best_sector: Option<(&SectorRule, usize)> = None;
    for sector in RULES {
        let score = keyword_score(&normalized, sector.keywords);
        if score == 0 {
            continue;
        }
        // Strict > keeps the first-declared sector on ties.
        if best_sector.map_or(true, |(_, s)| score > s) {
            best_sector = Some((sector, score));
        }
    }

    let Some((sector, _)) = best_sector else {
        return default_classification();
    };

    let mut best_industry: Option<(&IndustryRule, usize)> = None;
    for industry in sector.industries {
        let score = keyword_score(&normalized, industry.keywords);
        if score == 0 {
            continue;
        }
        if best_industry.map_or(true, |(_, s)| score > s) {
            best_industry = Some((industry, score));
        }
    }

    // No industry evidence still yields a concrete industry, never "unknown".
    let industry = best_industry.map(|(i, _)| i).unwrap_or(&sector.industries[0]);

    Classification {
        sector: sector.name.to_string(),
        industry: industry.name.to_string(),
        sub_industry: industry.name.to_string(),
        sic_code: industry.sic_code.to_string(),
        sic_text: industry.sic_text.to_string(),
        tags: format!("{}, {}", sector.name, industry.name),
    }
}

/// Substring containment, not word-boundary matching: "banking" matches
/// inside "bankingcorp". Kept for compatibility with existing outputs.
fn keyword_score(normalized: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| normalized.contains(*kw)).count()
}

pub fn default_classification() -> Classification {
    Classification {
        sector: "Technology".to_string(),
        industry: "Software".to_string(),
        sub_industry: "Software".to_string(),
        sic_code: "7372".to_string(),
        sic_text: "Prepackaged Software".to_string(),
        tags: "Technology, Software".to_string(),
    }
}

// ── Tests ──
