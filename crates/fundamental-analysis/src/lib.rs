use analysis_core::{
    Classification, CompanyFacts, DerivedMetrics, DisplayMode, Evaluation, MetricAssessment,
    MetricAssessments, ScoreReport, Verdict,
};

/// Classify a metric value against a `(good, bad)` threshold pair and
/// format it for display. Unknown values are Neutral and render as "N/A";
/// there is no error path.
pub fn classify(
    value: Option<f64>,
    good_threshold: f64,
    bad_threshold: f64,
    mode: DisplayMode,
) -> MetricAssessment {
    let Some(v) = value else {
        return MetricAssessment::unknown();
    };

    let display = match mode {
        DisplayMode::Percent => format!("{:.2}%", v * 100.0),
        DisplayMode::Plain => format!("{:.2}", v),
    };

    let classification = if v >= good_threshold {
        Classification::Good
    } else if v <= bad_threshold {
        Classification::Bad
    } else {
        Classification::Neutral
    };

    MetricAssessment {
        classification,
        display,
    }
}

/// One scoring rule: reads a single field, fires on a predicate, and
/// contributes its delta plus a strength reason.
struct ScoreRule {
    value: fn(&CompanyFacts) -> Option<f64>,
    fires: fn(f64) -> bool,
    delta: i32,
    reason: &'static str,
}

/// Rules within a group are mutually exclusive; the first one that fires
/// wins. Most groups hold a single rule; the debt/equity group gives
/// low-debt priority over moderate-debt.
const SCORE_RULES: &[&[ScoreRule]] = &[
    &[ScoreRule {
        value: |f| f.recommendation_mean,
        fires: |v| v < 2.5,
        delta: 1,
        reason: "Positive analyst recommendations",
    }],
    &[ScoreRule {
        value: |f| f.return_on_equity,
        fires: |v| v > 0.15,
        delta: 1,
        reason: "Strong return on equity",
    }],
    &[
        ScoreRule {
            value: |f| f.debt_to_equity,
            fires: |v| v < 0.5,
            delta: 2,
            reason: "Low debt levels",
        },
        ScoreRule {
            value: |f| f.debt_to_equity,
            fires: |v| v < 1.0,
            delta: 1,
            reason: "Moderate debt levels",
        },
    ],
    &[ScoreRule {
        value: |f| f.profit_margin,
        fires: |v| v > 0.1,
        delta: 1,
        reason: "Good profit margins",
    }],
    &[ScoreRule {
        value: |f| f.revenue_growth,
        fires: |v| v > 0.1,
        delta: 1,
        reason: "Strong revenue growth",
    }],
];

/// Warning rules are independent of the score and of each other.
struct WarningRule {
    value: fn(&CompanyFacts) -> Option<f64>,
    fires: fn(f64) -> bool,
    warning: &'static str,
}

const WARNING_RULES: &[WarningRule] = &[
    WarningRule {
        value: |f| f.debt_to_equity,
        fires: |v| v > 1.5,
        warning: "High debt levels",
    },
    WarningRule {
        value: |f| f.current_ratio,
        fires: |v| v < 1.0,
        warning: "Potential liquidity issues",
    },
    WarningRule {
        value: |f| f.trailing_pe,
        fires: |v| v > 25.0,
        warning: "High valuation (P/E)",
    },
    WarningRule {
        value: |f| f.peg_ratio,
        fires: |v| v > 2.0,
        warning: "High growth-adjusted valuation (PEG)",
    },
];

pub struct FundamentalsEvaluator;

impl FundamentalsEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline over one facts record: threshold assessments,
    /// derived metrics, and the heuristic score report.
    pub fn evaluate(&self, facts: &CompanyFacts) -> Evaluation {
        let assessments = MetricAssessments {
            trailing_pe: classify(facts.trailing_pe, 15.0, 25.0, DisplayMode::Plain),
            peg_ratio: classify(facts.peg_ratio, 1.0, 2.0, DisplayMode::Plain),
            price_to_sales: classify(facts.price_to_sales, 2.0, 5.0, DisplayMode::Plain),
            return_on_equity: classify(facts.return_on_equity, 0.15, 0.05, DisplayMode::Percent),
            profit_margin: classify(facts.profit_margin, 0.10, 0.05, DisplayMode::Percent),
            revenue_growth: classify(facts.revenue_growth, 0.10, 0.0, DisplayMode::Percent),
            debt_to_equity: classify(facts.debt_to_equity, 0.5, 1.5, DisplayMode::Plain),
            current_ratio: classify(facts.current_ratio, 1.5, 1.0, DisplayMode::Plain),
            dividend_yield: classify(facts.dividend_yield, 0.03, 0.01, DisplayMode::Percent),
        };

        Evaluation {
            symbol: facts.symbol.clone(),
            assessments,
            derived: self.derive_metrics(facts),
            score: self.score_report(facts),
        }
    }

    /// Compute metrics not reported directly by the provider. A derived
    /// metric is unknown whenever any of its inputs is unknown.
    pub fn derive_metrics(&self, facts: &CompanyFacts) -> DerivedMetrics {
        let price_change_pct = match (facts.current_price, facts.previous_close) {
            (Some(current), Some(prev)) if prev != 0.0 => Some((current - prev) / prev * 100.0),
            _ => None,
        };

        DerivedMetrics {
            price_change_pct,
            free_cash_flow_billions: facts.free_cash_flow.map(|fcf| fcf / 1e9),
        }
    }

    /// Apply the rule tables. Rules whose input is unknown are skipped
    /// silently; they contribute neither points nor warnings.
    pub fn score_report(&self, facts: &CompanyFacts) -> ScoreReport {
        let mut score = 0;
        let mut reasons = Vec::new();

        for group in SCORE_RULES {
            for rule in *group {
                if let Some(v) = (rule.value)(facts) {
                    if (rule.fires)(v) {
                        score += rule.delta;
                        reasons.push(rule.reason.to_string());
                        break;
                    }
                }
            }
        }

        let mut warnings = Vec::new();
        for rule in WARNING_RULES {
            if let Some(v) = (rule.value)(facts) {
                if (rule.fires)(v) {
                    warnings.push(rule.warning.to_string());
                }
            }
        }

        ScoreReport {
            score,
            verdict: Verdict::from_score(score),
            reasons,
            warnings,
        }
    }
}

impl Default for FundamentalsEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn empty_facts() -> CompanyFacts {
        CompanyFacts {
            symbol: "TEST".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_good_at_and_above_threshold() {
        let a = classify(Some(1.5), 1.5, 1.0, DisplayMode::Plain);
        assert_eq!(a.classification, Classification::Good);
        assert_eq!(a.display, "1.50");

        let a = classify(Some(3.0), 1.5, 1.0, DisplayMode::Plain);
        assert_eq!(a.classification, Classification::Good);
    }

    #[test]
    fn test_classify_bad_at_and_below_threshold() {
        let a = classify(Some(1.0), 1.5, 1.0, DisplayMode::Plain);
        assert_eq!(a.classification, Classification::Bad);

        let a = classify(Some(0.2), 1.5, 1.0, DisplayMode::Plain);
        assert_eq!(a.classification, Classification::Bad);
    }

    #[test]
    fn test_classify_neutral_between_thresholds() {
        let a = classify(Some(1.2), 1.5, 1.0, DisplayMode::Plain);
        assert_eq!(a.classification, Classification::Neutral);
    }

    #[test]
    fn test_classify_unknown_is_neutral_na() {
        let a = classify(None, 1.5, 1.0, DisplayMode::Plain);
        assert_eq!(a.classification, Classification::Neutral);
        assert_eq!(a.display, "N/A");

        let a = classify(None, 0.15, 0.05, DisplayMode::Percent);
        assert_eq!(a.display, "N/A");
    }

    #[test]
    fn test_classify_percent_formatting() {
        let a = classify(Some(0.1234), 0.15, 0.05, DisplayMode::Percent);
        assert_eq!(a.display, "12.34%");
        assert_eq!(a.classification, Classification::Neutral);

        let a = classify(Some(0.2), 0.15, 0.05, DisplayMode::Percent);
        assert_eq!(a.display, "20.00%");
        assert_eq!(a.classification, Classification::Good);
    }

    #[test]
    fn test_price_change_pct() {
        let evaluator = FundamentalsEvaluator::new();
        let mut facts = empty_facts();
        facts.current_price = Some(110.0);
        facts.previous_close = Some(100.0);

        let derived = evaluator.derive_metrics(&facts);
        assert_relative_eq!(derived.price_change_pct.unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_price_change_unknown_when_input_missing() {
        let evaluator = FundamentalsEvaluator::new();

        let mut facts = empty_facts();
        facts.current_price = Some(110.0);
        assert!(evaluator.derive_metrics(&facts).price_change_pct.is_none());

        let mut facts = empty_facts();
        facts.previous_close = Some(100.0);
        assert!(evaluator.derive_metrics(&facts).price_change_pct.is_none());
    }

    #[test]
    fn test_free_cash_flow_billions() {
        let evaluator = FundamentalsEvaluator::new();
        let mut facts = empty_facts();
        facts.free_cash_flow = Some(92_500_000_000.0);

        let derived = evaluator.derive_metrics(&facts);
        assert_relative_eq!(
            derived.free_cash_flow_billions.unwrap(),
            92.5,
            epsilon = 1e-9
        );

        assert!(evaluator
            .derive_metrics(&empty_facts())
            .free_cash_flow_billions
            .is_none());
    }

    #[test]
    fn test_score_all_positive_rules() {
        let evaluator = FundamentalsEvaluator::new();
        let facts = CompanyFacts {
            symbol: "TEST".to_string(),
            recommendation_mean: Some(2.0),
            return_on_equity: Some(0.20),
            debt_to_equity: Some(0.4),
            profit_margin: Some(0.12),
            revenue_growth: Some(0.15),
            current_ratio: Some(2.0),
            trailing_pe: Some(18.0),
            peg_ratio: Some(1.2),
            ..Default::default()
        };

        let report = evaluator.score_report(&facts);
        assert_eq!(report.score, 6);
        assert_eq!(report.verdict, Verdict::Strong);
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.reasons,
            vec![
                "Positive analyst recommendations",
                "Strong return on equity",
                "Low debt levels",
                "Good profit margins",
                "Strong revenue growth",
            ]
        );
    }

    #[test]
    fn test_score_all_warnings_no_points() {
        let evaluator = FundamentalsEvaluator::new();
        let facts = CompanyFacts {
            symbol: "TEST".to_string(),
            debt_to_equity: Some(2.0),
            current_ratio: Some(0.8),
            trailing_pe: Some(30.0),
            peg_ratio: Some(3.0),
            ..Default::default()
        };

        let report = evaluator.score_report(&facts);
        assert_eq!(report.score, 0);
        assert_eq!(report.verdict, Verdict::Weak);
        assert!(report.reasons.is_empty());
        assert_eq!(
            report.warnings,
            vec![
                "High debt levels",
                "Potential liquidity issues",
                "High valuation (P/E)",
                "High growth-adjusted valuation (PEG)",
            ]
        );
    }

    #[test]
    fn test_low_debt_excludes_moderate_debt() {
        let evaluator = FundamentalsEvaluator::new();
        let mut facts = empty_facts();
        facts.debt_to_equity = Some(0.3);

        let report = evaluator.score_report(&facts);
        assert_eq!(report.score, 2);
        assert_eq!(report.reasons, vec!["Low debt levels"]);
    }

    #[test]
    fn test_moderate_debt_fires_alone() {
        let evaluator = FundamentalsEvaluator::new();
        let mut facts = empty_facts();
        facts.debt_to_equity = Some(0.7);

        let report = evaluator.score_report(&facts);
        assert_eq!(report.score, 1);
        assert_eq!(report.reasons, vec!["Moderate debt levels"]);
    }

    #[test]
    fn test_each_rule_adds_independently() {
        let evaluator = FundamentalsEvaluator::new();
        let cases: &[(fn(&mut CompanyFacts), i32)] = &[
            (|f| f.recommendation_mean = Some(2.0), 1),
            (|f| f.return_on_equity = Some(0.20), 1),
            (|f| f.debt_to_equity = Some(0.3), 2),
            (|f| f.profit_margin = Some(0.15), 1),
            (|f| f.revenue_growth = Some(0.25), 1),
        ];

        for (set_field, expected) in cases {
            let mut facts = empty_facts();
            set_field(&mut facts);
            let report = evaluator.score_report(&facts);
            assert_eq!(report.score, *expected);
            assert_eq!(report.reasons.len(), 1);
            assert!(report.warnings.is_empty());
        }
    }

    #[test]
    fn test_unknown_fields_skip_all_rules() {
        let evaluator = FundamentalsEvaluator::new();
        let report = evaluator.score_report(&empty_facts());
        assert_eq!(report.score, 0);
        assert!(report.reasons.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.verdict, Verdict::Weak);
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_score(6), Verdict::Strong);
        assert_eq!(Verdict::from_score(5), Verdict::Strong);
        assert_eq!(Verdict::from_score(4), Verdict::Good);
        assert_eq!(Verdict::from_score(3), Verdict::Good);
        assert_eq!(Verdict::from_score(2), Verdict::Caution);
        assert_eq!(Verdict::from_score(1), Verdict::Caution);
        assert_eq!(Verdict::from_score(0), Verdict::Weak);
    }

    #[test]
    fn test_evaluate_empty_record_is_all_neutral() {
        let evaluator = FundamentalsEvaluator::new();
        let evaluation = evaluator.evaluate(&empty_facts());

        for assessment in [
            &evaluation.assessments.trailing_pe,
            &evaluation.assessments.peg_ratio,
            &evaluation.assessments.price_to_sales,
            &evaluation.assessments.return_on_equity,
            &evaluation.assessments.profit_margin,
            &evaluation.assessments.revenue_growth,
            &evaluation.assessments.debt_to_equity,
            &evaluation.assessments.current_ratio,
            &evaluation.assessments.dividend_yield,
        ] {
            assert_eq!(assessment.classification, Classification::Neutral);
            assert_eq!(assessment.display, "N/A");
        }

        assert!(evaluation.derived.price_change_pct.is_none());
        assert_eq!(evaluation.score.score, 0);
    }

    #[test]
    fn test_evaluate_wires_percent_mode_for_profitability() {
        let evaluator = FundamentalsEvaluator::new();
        let mut facts = empty_facts();
        facts.return_on_equity = Some(0.20);
        facts.trailing_pe = Some(18.0);

        let evaluation = evaluator.evaluate(&facts);
        assert_eq!(evaluation.assessments.return_on_equity.display, "20.00%");
        assert_eq!(
            evaluation.assessments.return_on_equity.classification,
            Classification::Good
        );
        assert_eq!(evaluation.assessments.trailing_pe.display, "18.00");
    }
}
