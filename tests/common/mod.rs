//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

pub const IDEA: &str = "A subscription box for artisanal coffee";

/// A complete, valid analysis document with `source_count` sources.
pub fn analysis_doc(source_count: usize) -> Value {
    let sources: Vec<Value> = (1..=source_count)
        .map(|i| json!({"title": format!("Coffee industry survey {}", i), "relevance": "Demand signal"}))
        .collect();

    json!({
        "validationScore": 72,
        "competitors": [
            {"name": "Bean Box", "strength": 70, "description": "Seattle roaster sampler", "marketShare": 8.0}
        ],
        "priceSuggestions": [
            {"type": "subscription", "value": "$29/month", "description": "Monthly box"}
        ],
        "forecasts": {
            "bestCase": {"revenue": 300, "marketShare": 3.0, "customers": 30},
            "worstCase": {"revenue": 100, "marketShare": 1.0, "customers": 10}
        },
        "timeline": {
            "phases": [{"name": "Launch", "duration": "3 months", "tasks": ["Site", "Roaster deals"]}],
            "criticalPath": ["Launch"]
        },
        "goToMarket": {
            "strategy": ["Content marketing"],
            "channels": ["Instagram"],
            "kpis": ["Monthly churn under 8%"]
        },
        "clients": [
            {"name": "Remote workers", "description": "Brew at home daily"}
        ],
        "sources": sources,
        "summary": "Viable niche subscription with loyal customers and thin margins.",
        "scoreAnalysis": {
            "category": "Consumer subscription",
            "marketPotential": {"score": 70, "analysis": "Steady growth"},
            "competition": {"score": 55, "analysis": "Crowded"},
            "marketSize": {"score": 65, "analysis": "Mid-sized"},
            "timing": {"score": 75, "analysis": "Favorable"},
            "recommendations": ["Partner with local roasters"]
        },
        "currency": "USD"
    })
}

/// The valid document with the required 15 sources.
pub fn valid_doc() -> Value {
    analysis_doc(15)
}
