use serde::{Deserialize, Serialize};

/// One company's fundamentals snapshot, normalized at the data provider
/// boundary. Every field except `symbol` is optional: `None` means the
/// provider did not report it (or reported something non-numeric), and it
/// must never be conflated with zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyFacts {
    pub symbol: String,
    pub name: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,

    // Price
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub fifty_two_week_high: Option<f64>,

    // Valuation
    pub trailing_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub forward_pe: Option<f64>,

    // Profitability
    pub return_on_equity: Option<f64>,
    pub profit_margin: Option<f64>,
    pub revenue_growth: Option<f64>,

    // Financial health
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub free_cash_flow: Option<f64>,

    // Dividends
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub dividend_growth_5y: Option<f64>,

    // Analyst coverage
    pub recommendation_mean: Option<f64>,
    pub recommendation_key: Option<String>,
    pub target_mean_price: Option<f64>,
    pub target_high_price: Option<f64>,
    pub target_low_price: Option<f64>,
}

/// Tri-state tag for a single metric versus its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Good,
    Bad,
    Neutral,
}

/// How a metric value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Plain,
    Percent,
}

/// A classified metric plus its display string ("N/A" when unknown).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricAssessment {
    pub classification: Classification,
    pub display: String,
}

impl MetricAssessment {
    pub fn unknown() -> Self {
        Self {
            classification: Classification::Neutral,
            display: "N/A".to_string(),
        }
    }

    /// True when the underlying value was present. Unknown assessments are
    /// Neutral but must render without any Good/Bad styling.
    pub fn is_known(&self) -> bool {
        self.display != "N/A"
    }
}

/// Composite verdict tier derived from the heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Strong,
    Good,
    Caution,
    Weak,
}

impl Verdict {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 5 => Verdict::Strong,
            s if s >= 3 => Verdict::Good,
            s if s >= 1 => Verdict::Caution,
            _ => Verdict::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Strong => "STRONG",
            Verdict::Good => "GOOD",
            Verdict::Caution => "CAUTION",
            Verdict::Weak => "WEAK",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Verdict::Strong => "This company shows excellent financial indicators",
            Verdict::Good => "This company shows positive financial indicators",
            Verdict::Caution => "This company shows mixed financial indicators",
            Verdict::Weak => "This company shows concerning financial indicators",
        }
    }
}

/// Heuristic investment score with its supporting strengths and risks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: i32,
    pub reasons: Vec<String>,
    pub warnings: Vec<String>,
    pub verdict: Verdict,
}

/// Metrics computed from the raw facts rather than reported directly.
/// Each is `None` whenever any of its inputs is unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub price_change_pct: Option<f64>,
    pub free_cash_flow_billions: Option<f64>,
}

/// Threshold assessments for every colorized metric in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricAssessments {
    pub trailing_pe: MetricAssessment,
    pub peg_ratio: MetricAssessment,
    pub price_to_sales: MetricAssessment,
    pub return_on_equity: MetricAssessment,
    pub profit_margin: MetricAssessment,
    pub revenue_growth: MetricAssessment,
    pub debt_to_equity: MetricAssessment,
    pub current_ratio: MetricAssessment,
    pub dividend_yield: MetricAssessment,
}

/// Full output of one evaluation pass over a `CompanyFacts` record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub symbol: String,
    pub assessments: MetricAssessments,
    pub derived: DerivedMetrics,
    pub score: ScoreReport,
}
