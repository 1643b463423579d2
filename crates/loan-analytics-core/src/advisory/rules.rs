use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::PortfolioMetrics;

/// Recommendation priority, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Which side of the threshold triggers the rule. Both comparisons
/// are strict; a reading exactly at the threshold does not fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Below,
    Above,
}

/// One row of an indicator's threshold table. `{value}` in the state
/// template is replaced with the reading, rounded to two decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub threshold: Decimal,
    pub comparison: Comparison,
    pub priority: Priority,
    pub title: String,
    pub state_template: String,
    pub impact: String,
    pub action_steps: Vec<String>,
}

/// The ordered rule table for one indicator. Rules are evaluated
/// top-down and the first satisfied rule wins; if none is satisfied
/// the indicator produces no recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRules {
    pub indicator: String,
    pub category: String,
    pub rules: Vec<ThresholdRule>,
}

/// A scalar indicator reading supplied by the caller. Readings
/// flagged insufficient are skipped entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub name: String,
    pub value: Decimal,
    #[serde(default)]
    pub insufficient_data: bool,
}

impl IndicatorReading {
    pub fn new(name: &str, value: Decimal) -> Self {
        IndicatorReading {
            name: name.to_string(),
            value,
            insufficient_data: false,
        }
    }
}

/// A prioritized improvement recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub indicator: String,
    pub priority: Priority,
    pub title: String,
    pub current_state: String,
    pub impact: String,
    pub action_steps: Vec<String>,
}

/// Threshold-table evaluator. Rules are data, not control flow: the
/// tables can be replaced wholesale without touching any calculation
/// code, and identical inputs always produce an identical ordered
/// list.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    tables: Vec<IndicatorRules>,
}

impl RecommendationEngine {
    pub fn new(tables: Vec<IndicatorRules>) -> Self {
        RecommendationEngine { tables }
    }

    /// The built-in rule set covering the portfolio health indicators
    /// tracked on the dashboard.
    pub fn standard() -> Self {
        RecommendationEngine::new(standard_tables())
    }

    pub fn tables(&self) -> &[IndicatorRules] {
        &self.tables
    }

    /// Evaluate every reading against its table. Output is ordered by
    /// priority, then by reading order within a priority (the sort is
    /// stable). Readings without a table, readings flagged
    /// insufficient, and readings in a healthy range emit nothing.
    pub fn generate(&self, readings: &[IndicatorReading]) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for reading in readings {
            if reading.insufficient_data {
                continue;
            }
            let table = match self.tables.iter().find(|t| t.indicator == reading.name) {
                Some(t) => t,
                None => continue,
            };
            for rule in &table.rules {
                let satisfied = match rule.comparison {
                    Comparison::Below => reading.value < rule.threshold,
                    Comparison::Above => reading.value > rule.threshold,
                };
                if satisfied {
                    recommendations.push(Recommendation {
                        category: table.category.clone(),
                        indicator: table.indicator.clone(),
                        priority: rule.priority,
                        title: rule.title.clone(),
                        current_state: render_template(&rule.state_template, reading.value),
                        impact: rule.impact.clone(),
                        action_steps: rule.action_steps.clone(),
                    });
                    break;
                }
            }
        }

        recommendations.sort_by_key(|r| r.priority);
        recommendations
    }
}

/// Readings the engine can derive from portfolio metrics alone.
/// Concentration, retention, and LTV readings need data the metrics
/// do not carry and come from the caller.
pub fn snapshot_readings(metrics: &PortfolioMetrics) -> Vec<IndicatorReading> {
    vec![
        IndicatorReading {
            name: "portfolio_yield_pct".into(),
            value: metrics.portfolio_yield_pct,
            insufficient_data: metrics.insufficient_data,
        },
        IndicatorReading {
            name: "weighted_holding_days".into(),
            value: metrics.weighted_average_days,
            insufficient_data: metrics.insufficient_data,
        },
    ]
}

fn render_template(template: &str, value: Decimal) -> String {
    template.replace("{value}", &format!("{:.2}", value))
}

fn rule(
    threshold: Decimal,
    comparison: Comparison,
    priority: Priority,
    title: &str,
    state_template: &str,
    impact: &str,
    action_steps: &[&str],
) -> ThresholdRule {
    ThresholdRule {
        threshold,
        comparison,
        priority,
        title: title.to_string(),
        state_template: state_template.to_string(),
        impact: impact.to_string(),
        action_steps: action_steps.iter().map(|s| s.to_string()).collect(),
    }
}

fn standard_tables() -> Vec<IndicatorRules> {
    use Comparison::{Above, Below};
    use Priority::{High, Low, Medium};

    vec![
        IndicatorRules {
            indicator: "collection_efficiency_pct".into(),
            category: "collections".into(),
            rules: vec![
                rule(
                    dec!(85),
                    Below,
                    High,
                    "Improve Collection Efficiency",
                    "Collection efficiency at {value}% is well below the 92% target",
                    "Systematic follow-up recovers most of the shortfall in pending interest",
                    &[
                        "Send payment reminders ahead of each due date",
                        "Escalate overdue accounts on a fixed follow-up schedule",
                        "Offer a small rebate for early settlement",
                        "Assign dedicated staff to the largest outstanding balances",
                    ],
                ),
                rule(
                    dec!(92),
                    Below,
                    Medium,
                    "Tighten Collection Follow-up",
                    "Collection efficiency at {value}% leaves room before the 95% stretch target",
                    "Fine-tuning adds 2-3% to collected interest with little extra effort",
                    &[
                        "Review the largest uncollected balances for common patterns",
                        "Reach out proactively before payment due dates",
                        "Trial alternative reminder channels and keep what works",
                    ],
                ),
            ],
        },
        IndicatorRules {
            indicator: "portfolio_yield_pct".into(),
            category: "pricing".into(),
            rules: vec![
                rule(
                    dec!(12),
                    Below,
                    High,
                    "Reprice Lending Rates",
                    "Portfolio yield at {value}% sits below the 12-15% reference band",
                    "Closing the gap to 14% adds material annual interest revenue",
                    &[
                        "Review interest rates against the local market",
                        "Introduce risk-based pricing tiers",
                        "Add processing fees where none are charged",
                        "Shorten tenure on new disbursements to lift annualized yield",
                    ],
                ),
                rule(
                    dec!(18),
                    Above,
                    Medium,
                    "Review Premium Pricing",
                    "Portfolio yield at {value}% runs above market rates",
                    "Sustained premium pricing risks losing good customers to competitors",
                    &[
                        "Track competitor rates monthly",
                        "Offer tiered rates for loyal, low-risk customers",
                        "Watch churn among the best repeat customers",
                    ],
                ),
            ],
        },
        IndicatorRules {
            indicator: "top5_concentration_pct".into(),
            category: "risk".into(),
            rules: vec![
                rule(
                    dec!(50),
                    Above,
                    High,
                    "Reduce Customer Concentration",
                    "Top five customers hold {value}% of outstanding exposure",
                    "Diversifying the book cuts portfolio volatility sharply",
                    &[
                        "Cap per-customer exposure as a share of the book",
                        "Acquire mid-sized customers to dilute the top of the book",
                        "Prefer smaller, more frequent disbursements over single large ones",
                    ],
                ),
                rule(
                    dec!(30),
                    Above,
                    Medium,
                    "Broaden the Customer Base",
                    "Top five customers hold {value}% of outstanding exposure",
                    "Earlier diversification is cheaper than unwinding concentration later",
                    &[
                        "Track the concentration ratio monthly",
                        "Alert when any single customer passes 15% of the book",
                        "Target new segments in acquisition campaigns",
                    ],
                ),
            ],
        },
        IndicatorRules {
            indicator: "repeat_customer_rate_pct".into(),
            category: "retention".into(),
            rules: vec![
                rule(
                    dec!(40),
                    Below,
                    High,
                    "Improve Customer Retention",
                    "Only {value}% of customers come back for another loan",
                    "Small retention gains compound into outsized profit gains",
                    &[
                        "Survey customers who did not return",
                        "Streamline the renewal process",
                        "Follow up shortly before typical loan maturity",
                        "Introduce rate discounts for repeat customers",
                    ],
                ),
                rule(
                    dec!(60),
                    Below,
                    Medium,
                    "Strengthen Customer Loyalty",
                    "Repeat customer rate at {value}% has room to grow",
                    "Loyal customers lower acquisition cost and stabilize volume",
                    &[
                        "Create a preferred tier for customers with three or more loans",
                        "Add a referral reward program",
                        "Personalize outreach using loan history",
                    ],
                ),
            ],
        },
        IndicatorRules {
            indicator: "average_ltv_pct".into(),
            category: "risk".into(),
            rules: vec![
                rule(
                    dec!(85),
                    Above,
                    High,
                    "Reduce Loan-to-Value Exposure",
                    "Average loan-to-value at {value}% exceeds the safe ceiling of 85%",
                    "Bringing LTV back to 75-80% cuts default severity substantially",
                    &[
                        "Tighten valuation guidelines on new loans",
                        "Re-examine collateral purity assessment",
                        "Require additional collateral on high-value loans",
                        "Alert on any loan crossing 85% LTV",
                    ],
                ),
                rule(
                    dec!(65),
                    Below,
                    Medium,
                    "Raise Conservative Loan-to-Value Limits",
                    "Average loan-to-value at {value}% is conservative",
                    "Lifting LTV toward 70-75% grows volume without much added risk",
                    &[
                        "Pilot higher limits with established low-risk customers",
                        "Monitor default rates through the transition",
                        "Keep conservative limits for first-time customers",
                    ],
                ),
            ],
        },
        IndicatorRules {
            indicator: "weighted_holding_days".into(),
            category: "tenure".into(),
            rules: vec![
                rule(
                    dec!(250),
                    Above,
                    Medium,
                    "Shorten Loan Tenure",
                    "Capital is held {value} days on average, dragging annualized yield",
                    "Faster capital turnover lifts annualized yield by 1-2%",
                    &[
                        "Price longer tenures higher",
                        "Remind customers about settlement at the 90-day mark",
                        "Check whether long tenure signals customer stress",
                    ],
                ),
                rule(
                    dec!(90),
                    Below,
                    Low,
                    "Validate Short-Tenure Economics",
                    "Capital turns over every {value} days on average",
                    "High turnover is only good if per-loan revenue covers handling cost",
                    &[
                        "Compare handling cost against interest earned on quick loans",
                        "Consider a minimum charge for very short holdings",
                    ],
                ),
            ],
        },
        IndicatorRules {
            indicator: "volume_growth_3m_pct".into(),
            category: "growth".into(),
            rules: vec![
                rule(
                    dec!(0),
                    Below,
                    High,
                    "Reverse Portfolio Contraction",
                    "Disbursement volume changed {value}% over the last quarter",
                    "Shrinking volume compounds into revenue decline and share loss",
                    &[
                        "Determine whether the decline is seasonal or structural",
                        "Check pricing against competitors",
                        "Step up acquisition campaigns",
                        "Survey lost customers",
                    ],
                ),
                rule(
                    dec!(10),
                    Below,
                    Medium,
                    "Accelerate Portfolio Growth",
                    "Disbursement volume grew only {value}% over the last quarter",
                    "The book is growing below its potential in an expanding market",
                    &[
                        "Set quarterly growth targets",
                        "Reduce friction in application and approval",
                        "Open additional acquisition channels",
                    ],
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_low_collection_efficiency_fires_high() {
        let engine = RecommendationEngine::standard();
        let recs = engine.generate(&[IndicatorReading::new("collection_efficiency_pct", dec!(80))]);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[0].title, "Improve Collection Efficiency");
        assert_eq!(recs[0].category, "collections");
        assert!(recs[0].current_state.contains("80.00%"));
    }

    #[test]
    fn test_healthy_collection_efficiency_is_silent() {
        let engine = RecommendationEngine::standard();
        let recs = engine.generate(&[IndicatorReading::new("collection_efficiency_pct", dec!(93))]);
        assert_eq!(recs.len(), 0);
    }

    #[test]
    fn test_first_satisfied_rule_wins() {
        // 80 satisfies both <85 and <92; only the first (High) fires
        let engine = RecommendationEngine::standard();
        let recs = engine.generate(&[IndicatorReading::new("collection_efficiency_pct", dec!(80))]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::High);

        let recs = engine.generate(&[IndicatorReading::new("collection_efficiency_pct", dec!(88))]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::Medium);
    }

    #[test]
    fn test_threshold_is_strict() {
        let engine = RecommendationEngine::standard();
        // Exactly 50% concentration does not trip the Above-50 rule,
        // but it does trip Above-30
        let recs = engine.generate(&[IndicatorReading::new("top5_concentration_pct", dec!(50))]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::Medium);
    }

    #[test]
    fn test_insufficient_reading_skipped() {
        let engine = RecommendationEngine::standard();
        let reading = IndicatorReading {
            name: "portfolio_yield_pct".into(),
            value: Decimal::ZERO,
            insufficient_data: true,
        };
        assert_eq!(engine.generate(&[reading]).len(), 0);
    }

    #[test]
    fn test_unknown_indicator_ignored() {
        let engine = RecommendationEngine::standard();
        let recs = engine.generate(&[IndicatorReading::new("nonexistent_pct", dec!(1))]);
        assert_eq!(recs.len(), 0);
    }

    #[test]
    fn test_ordering_priority_then_input_order() {
        let engine = RecommendationEngine::standard();
        let readings = [
            // Medium (88 < 92)
            IndicatorReading::new("collection_efficiency_pct", dec!(88)),
            // High (-5 < 0)
            IndicatorReading::new("volume_growth_3m_pct", dec!(-5)),
            // Low (60 < 90)
            IndicatorReading::new("weighted_holding_days", dec!(60)),
            // High (35 < 40)
            IndicatorReading::new("repeat_customer_rate_pct", dec!(35)),
        ];
        let recs = engine.generate(&readings);

        let ordered: Vec<(Priority, &str)> = recs
            .iter()
            .map(|r| (r.priority, r.indicator.as_str()))
            .collect();
        assert_eq!(
            ordered,
            vec![
                (Priority::High, "volume_growth_3m_pct"),
                (Priority::High, "repeat_customer_rate_pct"),
                (Priority::Medium, "collection_efficiency_pct"),
                (Priority::Low, "weighted_holding_days"),
            ]
        );
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let engine = RecommendationEngine::standard();
        let readings = [
            IndicatorReading::new("average_ltv_pct", dec!(90)),
            IndicatorReading::new("portfolio_yield_pct", dec!(10.5)),
        ];
        assert_eq!(engine.generate(&readings), engine.generate(&readings));
    }

    #[test]
    fn test_custom_table() {
        let engine = RecommendationEngine::new(vec![IndicatorRules {
            indicator: "expense_ratio_pct".into(),
            category: "costs".into(),
            rules: vec![rule(
                dec!(20),
                Comparison::Above,
                Priority::High,
                "Cut Operating Costs",
                "Expenses consume {value}% of interest income",
                "Leaner operations flow straight to the bottom line",
                &["Audit recurring expenses"],
            )],
        }]);
        let recs = engine.generate(&[IndicatorReading::new("expense_ratio_pct", dec!(24))]);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title, "Cut Operating Costs");
        assert_eq!(recs[0].current_state, "Expenses consume 24.00% of interest income");
    }

    #[test]
    fn test_snapshot_readings_carry_insufficiency() {
        let readings = snapshot_readings(&PortfolioMetrics::insufficient());
        assert_eq!(readings.len(), 2);
        assert!(readings.iter().all(|r| r.insufficient_data));

        let engine = RecommendationEngine::standard();
        assert_eq!(engine.generate(&readings).len(), 0);
    }
}
