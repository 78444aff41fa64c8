//! The Analysis aggregate: one structured evaluation of a business idea.
//!
//! Field names serialize in camelCase because the presentation layer reads
//! this shape field-for-field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Exact number of research sources an analysis must carry.
pub const REQUIRED_SOURCE_COUNT: usize = 15;

/// Maximum summary length in characters.
pub const MAX_SUMMARY_CHARS: usize = 250;

/// Lower bound of the validation score.
pub const MIN_VALIDATION_SCORE: i64 = 0;

/// Upper bound of the validation score.
pub const MAX_VALIDATION_SCORE: i64 = 100;

/// Period label used when a forecast case does not name one.
pub const DEFAULT_FORECAST_PERIOD: &str = "12 months";

/// Structured result of analyzing one business idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub validation_score: u8,
    pub competitors: Vec<Competitor>,
    pub price_suggestions: Vec<PriceSuggestion>,
    pub forecasts: Forecasts,
    pub timeline: Timeline,
    pub go_to_market: GoToMarket,
    pub clients: Vec<ClientSegment>,
    pub sources: Vec<Source>,
    pub summary: String,
    pub score_analysis: ScoreAnalysis,
    pub currency: String,
    /// Additional top-level fields the model returned (financial plan, etc.).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    /// Competitive strength, 0–100.
    pub strength: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSuggestion {
    /// Pricing model label ("subscription", "one-time", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub value: MonetaryValue,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<TrendPoint>>,
}

/// A monetary figure, either a bare amount or display text such as `"$29/month"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonetaryValue {
    Amount(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecasts {
    pub best_case: ForecastCase,
    pub worst_case: ForecastCase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_case: Option<ForecastCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastCase {
    pub revenue: f64,
    pub market_share: f64,
    pub customers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl ForecastCase {
    /// Period label, or the default when absent.
    pub fn period_or_default(&self) -> &str {
        self.period.as_deref().unwrap_or(DEFAULT_FORECAST_PERIOD)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default)]
    pub phases: Vec<TimelinePhase>,
    #[serde(default)]
    pub critical_path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub name: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoToMarket {
    #[serde(default)]
    pub strategy: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub kpis: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSegment {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub relevance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAnalysis {
    pub category: String,
    pub market_potential: ScoreFactor,
    pub competition: ScoreFactor,
    pub market_size: ScoreFactor,
    pub timing: ScoreFactor,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    pub score: f64,
    #[serde(default)]
    pub analysis: String,
}

impl Analysis {
    /// Decodes a structurally valid JSON document into the typed model.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn fixture_decodes_with_all_sections() {
        let analysis = analysis();

        assert_eq!(analysis.validation_score, 72);
        assert_eq!(analysis.sources.len(), REQUIRED_SOURCE_COUNT);
        assert_eq!(analysis.competitors[0].market_share, Some(12.5));
        assert_eq!(analysis.competitors[1].market_share, None);
        assert_eq!(analysis.forecasts.best_case.revenue, 300000.0);
        assert!(analysis.forecasts.average_case.is_none());
        assert_eq!(analysis.currency, "USD");
    }

    #[test]
    fn monetary_value_accepts_number_or_text() {
        let analysis = analysis();

        assert_eq!(
            analysis.price_suggestions[0].value,
            MonetaryValue::Text("$24/month".to_string())
        );
        assert_eq!(analysis.price_suggestions[1].value, MonetaryValue::Amount(35.0));
    }

    #[test]
    fn serializes_back_to_camel_case_wire_names() {
        let value = serde_json::to_value(analysis()).unwrap();

        assert!(value.get("validationScore").is_some());
        assert!(value.get("priceSuggestions").is_some());
        assert!(value["forecasts"].get("bestCase").is_some());
        assert!(value["forecasts"].get("averageCase").is_none());
        assert_eq!(value["priceSuggestions"][0]["type"], "subscription");
    }

    #[test]
    fn unknown_top_level_fields_are_carried_through() {
        let mut doc = analysis_json();
        doc["financialPlan"] = json!({"startupCosts": 25000});

        let analysis = Analysis::from_value(doc).unwrap();
        assert_eq!(analysis.extra["financialPlan"]["startupCosts"], 25000);

        let round = serde_json::to_value(&analysis).unwrap();
        assert_eq!(round["financialPlan"]["startupCosts"], 25000);
    }

    #[test]
    fn competitor_without_name_fails_to_decode() {
        let mut doc = analysis_json();
        doc["competitors"] = json!([{"strength": 50}]);

        assert!(Analysis::from_value(doc).is_err());
    }

    #[test]
    fn period_or_default_falls_back() {
        let case = ForecastCase {
            revenue: 1.0,
            market_share: 1.0,
            customers: 1,
            period: None,
        };
        assert_eq!(case.period_or_default(), DEFAULT_FORECAST_PERIOD);
    }
}
