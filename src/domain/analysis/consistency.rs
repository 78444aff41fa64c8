//! Cross-field consistency checks over decoded analyses.
//!
//! Corrections are applied in a fixed order (currency, forecast, summary),
//! each to the output of the previous one, so the corrected document covers
//! every issue at once.

use super::currency::{canonical_code, rewrite_foreign_markers};
use super::model::{Analysis, ForecastCase, Forecasts, MonetaryValue, MAX_SUMMARY_CHARS};
use super::reports::ConsistencyReport;

pub const CURRENCY_INCONSISTENCY: &str = "currency inconsistency";
pub const FORECAST_MISORDERED: &str = "forecast cases not properly ordered";
pub const FORECAST_INVERTED: &str = "worst case revenue exceeds best case revenue";
pub const FORECAST_SHARE_INVERTED: &str = "worst case market share exceeds best case market share";
pub const FORECAST_CUSTOMERS_INVERTED: &str = "worst case customers exceed best case customers";

/// A violated rule and, when possible, the analysis with it fixed.
enum Finding {
    Corrected(String, Analysis),
    Uncorrectable(Vec<String>),
}

type Rule = fn(&Analysis) -> Option<Finding>;

/// Checks invariants that span several fields of an analysis.
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    check_currency: bool,
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self {
            check_currency: true,
        }
    }

    /// Disables currency uniformity checking (for multi-currency analyses).
    pub fn skip_currency_check(mut self, skip: bool) -> Self {
        self.check_currency = !skip;
        self
    }

    pub fn check(&self, analysis: &Analysis) -> ConsistencyReport {
        let mut issues = Vec::new();
        let mut working = analysis.clone();
        let mut correctable = true;

        let mut rules: Vec<Rule> = Vec::with_capacity(3);
        if self.check_currency {
            rules.push(check_currency);
        }
        rules.push(check_forecasts);
        rules.push(check_summary);

        for rule in rules {
            match rule(&working) {
                None => {}
                Some(Finding::Corrected(issue, fixed)) => {
                    issues.push(issue);
                    working = fixed;
                }
                Some(Finding::Uncorrectable(found)) => {
                    issues.extend(found);
                    correctable = false;
                }
            }
        }

        let corrected = (!issues.is_empty() && correctable).then_some(working);
        ConsistencyReport { issues, corrected }
    }
}

fn check_currency(analysis: &Analysis) -> Option<Finding> {
    let code = canonical_code(&analysis.currency);
    let mut fixed = analysis.clone();
    fixed.currency = code.clone();

    for suggestion in &mut fixed.price_suggestions {
        if let MonetaryValue::Text(text) = &suggestion.value {
            suggestion.value = MonetaryValue::Text(rewrite_foreign_markers(text, &code));
        }
    }

    (fixed != *analysis).then(|| Finding::Corrected(CURRENCY_INCONSISTENCY.to_string(), fixed))
}

fn check_forecasts(analysis: &Analysis) -> Option<Finding> {
    let Forecasts {
        best_case,
        worst_case,
        average_case,
    } = &analysis.forecasts;

    let inverted: Vec<String> = [
        (worst_case.revenue > best_case.revenue, FORECAST_INVERTED),
        (worst_case.market_share > best_case.market_share, FORECAST_SHARE_INVERTED),
        (worst_case.customers > best_case.customers, FORECAST_CUSTOMERS_INVERTED),
    ]
    .into_iter()
    .filter(|(violated, _)| *violated)
    .map(|(_, issue)| issue.to_string())
    .collect();
    if !inverted.is_empty() {
        return Some(Finding::Uncorrectable(inverted));
    }

    let average = average_case.as_ref()?;
    if worst_case.revenue < average.revenue && average.revenue < best_case.revenue {
        return None;
    }

    let corrected_average = ForecastCase {
        revenue: (best_case.revenue + worst_case.revenue) / 2.0,
        market_share: (best_case.market_share + worst_case.market_share) / 2.0,
        customers: ((best_case.customers as f64 + worst_case.customers as f64) / 2.0).round()
            as u64,
        period: Some(average.period_or_default().to_string()),
    };
    if corrected_average == *average {
        return None;
    }

    let mut fixed = analysis.clone();
    fixed.forecasts = Forecasts {
        best_case: with_period(best_case),
        worst_case: with_period(worst_case),
        average_case: Some(corrected_average),
    };
    Some(Finding::Corrected(FORECAST_MISORDERED.to_string(), fixed))
}

fn with_period(case: &ForecastCase) -> ForecastCase {
    ForecastCase {
        period: Some(case.period_or_default().to_string()),
        ..case.clone()
    }
}

fn check_summary(analysis: &Analysis) -> Option<Finding> {
    let length = analysis.summary.chars().count();
    if length <= MAX_SUMMARY_CHARS {
        return None;
    }

    let mut fixed = analysis.clone();
    fixed.summary = analysis.summary.chars().take(MAX_SUMMARY_CHARS).collect();
    Some(Finding::Corrected(
        format!(
            "summary is {} characters, maximum is {}",
            length, MAX_SUMMARY_CHARS
        ),
        fixed,
    ))
}
