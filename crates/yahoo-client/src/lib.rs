use analysis_core::{AnalysisError, CompanyFacts, FactProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const MODULES: &str = "assetProfile,price,summaryDetail,financialData,defaultKeyStatistics";

// Yahoo rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; ticker-iq/0.1)";

/// Client for the Yahoo Finance `quoteSummary` endpoint. Fetches one
/// fundamentals snapshot per ticker and normalizes it into `CompanyFacts`
/// at this boundary; downstream code never sees the raw envelope.
#[derive(Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Self {
        let base_url = std::env::var("YAHOO_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut c = Self::new();
        c.base_url = base_url.into();
        c
    }

    /// Fetch the quoteSummary modules for one symbol.
    async fn fetch_quote_summary(&self, symbol: &str) -> Result<CompanyFacts, AnalysisError> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES)])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(AnalysisError::SymbolNotFound(symbol.to_string()));
        }
        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let envelope: QuoteSummaryEnvelope = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let result = envelope
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::SymbolNotFound(symbol.to_string()))?;

        tracing::debug!("Fetched quoteSummary for {}", symbol);

        Ok(facts_from_summary(symbol, result))
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FactProvider for YahooClient {
    async fn fetch_facts(&self, symbol: &str) -> Result<CompanyFacts, AnalysisError> {
        self.fetch_quote_summary(symbol).await
    }
}

/// Flatten the module envelope into the normalized facts record. Absent
/// modules and absent or malformed fields all collapse to `None` here.
fn facts_from_summary(symbol: &str, result: QuoteSummaryResult) -> CompanyFacts {
    let profile = result.asset_profile.unwrap_or_default();
    let price = result.price.unwrap_or_default();
    let detail = result.summary_detail.unwrap_or_default();
    let financial = result.financial_data.unwrap_or_default();
    let stats = result.key_statistics.unwrap_or_default();

    CompanyFacts {
        symbol: symbol.to_string(),
        name: price.long_name,
        industry: profile.industry,
        sector: profile.sector,

        current_price: financial.current_price.num(),
        previous_close: detail.previous_close.num(),
        market_cap: price.market_cap.num(),
        fifty_two_week_low: detail.fifty_two_week_low.num(),
        fifty_two_week_high: detail.fifty_two_week_high.num(),

        trailing_pe: detail.trailing_pe.num(),
        peg_ratio: stats.peg_ratio.num(),
        price_to_sales: detail.price_to_sales.num(),
        forward_pe: detail.forward_pe.num(),

        return_on_equity: financial.return_on_equity.num(),
        profit_margin: financial.profit_margins.num(),
        revenue_growth: financial.revenue_growth.num(),

        debt_to_equity: financial.debt_to_equity.num(),
        current_ratio: financial.current_ratio.num(),
        free_cash_flow: financial.free_cashflow.num(),

        dividend_yield: detail.dividend_yield.num(),
        payout_ratio: detail.payout_ratio.num(),
        dividend_growth_5y: detail.five_year_avg_dividend_yield.num(),

        recommendation_mean: financial.recommendation_mean.num(),
        recommendation_key: financial.recommendation_key,
        target_mean_price: financial.target_mean_price.num(),
        target_high_price: financial.target_high_price.num(),
        target_low_price: financial.target_low_price.num(),
    }
}

/// Yahoo wraps every numeric as `{"raw": 1.23, "fmt": "1.23"}`, and
/// sometimes sends `{}` or a bare string instead. Anything that is not a
/// number (bare or wrapped) deserializes to `None` rather than failing the
/// whole record.
#[derive(Debug, Clone, Copy, Default)]
struct RawValue(Option<f64>);

impl RawValue {
    fn num(self) -> Option<f64> {
        self.0
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let raw = match &value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::Object(map) => map.get("raw").and_then(|r| r.as_f64()),
            _ => None,
        };
        Ok(RawValue(raw))
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSummaryResult {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialData>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Default, Deserialize)]
struct AssetProfile {
    industry: Option<String>,
    sector: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap", default)]
    market_cap: RawValue,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "previousClose", default)]
    previous_close: RawValue,
    #[serde(rename = "fiftyTwoWeekLow", default)]
    fifty_two_week_low: RawValue,
    #[serde(rename = "fiftyTwoWeekHigh", default)]
    fifty_two_week_high: RawValue,
    #[serde(rename = "trailingPE", default)]
    trailing_pe: RawValue,
    #[serde(rename = "forwardPE", default)]
    forward_pe: RawValue,
    #[serde(rename = "priceToSalesTrailing12Months", default)]
    price_to_sales: RawValue,
    #[serde(rename = "dividendYield", default)]
    dividend_yield: RawValue,
    #[serde(rename = "payoutRatio", default)]
    payout_ratio: RawValue,
    #[serde(rename = "fiveYearAvgDividendYield", default)]
    five_year_avg_dividend_yield: RawValue,
}

#[derive(Debug, Default, Deserialize)]
struct FinancialData {
    #[serde(rename = "currentPrice", default)]
    current_price: RawValue,
    #[serde(rename = "returnOnEquity", default)]
    return_on_equity: RawValue,
    #[serde(rename = "profitMargins", default)]
    profit_margins: RawValue,
    #[serde(rename = "revenueGrowth", default)]
    revenue_growth: RawValue,
    #[serde(rename = "debtToEquity", default)]
    debt_to_equity: RawValue,
    #[serde(rename = "currentRatio", default)]
    current_ratio: RawValue,
    #[serde(rename = "freeCashflow", default)]
    free_cashflow: RawValue,
    #[serde(rename = "recommendationMean", default)]
    recommendation_mean: RawValue,
    #[serde(rename = "recommendationKey")]
    recommendation_key: Option<String>,
    #[serde(rename = "targetMeanPrice", default)]
    target_mean_price: RawValue,
    #[serde(rename = "targetHighPrice", default)]
    target_high_price: RawValue,
    #[serde(rename = "targetLowPrice", default)]
    target_low_price: RawValue,
}

#[derive(Debug, Default, Deserialize)]
struct KeyStatistics {
    #[serde(rename = "pegRatio", default)]
    peg_ratio: RawValue,
}
