use analysis_core::{Classification, CompanyFacts, Evaluation, MetricAssessment, Verdict};
use console::{style, Color};

/// Print the full report for one evaluated ticker.
pub fn print_report(facts: &CompanyFacts, evaluation: &Evaluation) {
    let a = &evaluation.assessments;
    let derived = &evaluation.derived;

    println!();
    println!(
        "{}",
        style(format!(
            "=== Financial Analysis for {} ===",
            evaluation.symbol
        ))
        .cyan()
    );
    println!("Company Name: {}", text_or_na(facts.name.as_deref()));
    println!("Industry: {}", text_or_na(facts.industry.as_deref()));
    println!("Sector: {}", text_or_na(facts.sector.as_deref()));
    println!();

    println!("Current Price: {}", money_or_na(facts.current_price));
    if let Some(change) = derived.price_change_pct {
        let colored = if change >= 0.0 {
            style(format!("{change:.2}%")).green()
        } else {
            style(format!("{change:.2}%")).red()
        };
        println!("Price Change: {colored} (from prev close)");
    }
    println!(
        "Market Cap: {}",
        facts
            .market_cap
            .map(|m| format!("${}", fmt_commas(m)))
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!(
        "52-Week Range: {} - {}",
        num_or_na(facts.fifty_two_week_low),
        num_or_na(facts.fifty_two_week_high)
    );

    println!("\n{}", style("Valuation:").bold());
    println!("P/E Ratio: {}", paint(&a.trailing_pe));
    println!("PEG Ratio: {}", paint(&a.peg_ratio));
    println!("P/S Ratio: {}", paint(&a.price_to_sales));
    println!("Forward P/E: {}", num_or_na(facts.forward_pe));

    println!("\n{}", style("Profitability:").bold());
    println!("Return on Equity: {}", paint(&a.return_on_equity));
    println!("Profit Margin: {}", paint(&a.profit_margin));
    println!("Revenue Growth: {}", paint(&a.revenue_growth));

    println!("\n{}", style("Financial Health:").bold());
    println!("Debt to Equity: {}", paint(&a.debt_to_equity));
    println!("Current Ratio: {}", paint(&a.current_ratio));
    println!(
        "Free Cash Flow: {}",
        derived
            .free_cash_flow_billions
            .map(|b| format!("${b:.2}B"))
            .unwrap_or_else(|| "N/A".to_string())
    );

    if facts.dividend_yield.is_some() {
        println!("\n{}", style("Dividend Info:").bold());
        println!("Dividend Yield: {}", paint(&a.dividend_yield));
        println!("Payout Ratio: {}", num_or_na(facts.payout_ratio));
        println!("Dividend Growth (5Y): {}", num_or_na(facts.dividend_growth_5y));
    }

    println!("\n{}", style("Analyst Ratings:").bold());
    println!(
        "Recommendation: {}",
        facts
            .recommendation_key
            .as_deref()
            .map(title_case)
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("Mean Target: {}", money_or_na(facts.target_mean_price));
    println!("High Target: {}", money_or_na(facts.target_high_price));
    println!("Low Target: {}", money_or_na(facts.target_low_price));

    println!("\n{}", style("Investment Summary:").bold());
    let verdict = evaluation.score.verdict;
    let headline = format!("{} {}: {}", verdict_emoji(verdict), verdict.label(), verdict.summary());
    let headline = match verdict {
        Verdict::Strong | Verdict::Good => style(headline).green(),
        Verdict::Caution => style(headline).yellow(),
        Verdict::Weak => style(headline).red(),
    };
    println!("{headline}");

    if !evaluation.score.reasons.is_empty() {
        println!("\n{}", style("Strengths:").green());
        for reason in &evaluation.score.reasons {
            println!("• {reason}");
        }
    }

    if !evaluation.score.warnings.is_empty() {
        println!("\n{}", style("Risks:").red());
        for warning in &evaluation.score.warnings {
            println!("• {warning}");
        }
    }

    println!(
        "\n{}",
        style("Note: This is automated analysis only. Always do further research before investing.")
            .yellow()
    );
}

pub fn print_banner() {
    println!();
    println!("{}", style("Welcome to the Financial Analyzer!").cyan());
    println!("This tool helps you analyze companies for potential investment.");
    println!("Enter stock tickers like 'AAPL' for Apple or 'MSFT' for Microsoft");
    println!("Type 'quit' to exit\n");
}

fn verdict_emoji(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Strong => "✅",
        Verdict::Good => "🟢",
        Verdict::Caution => "🟡",
        Verdict::Weak => "🔴",
    }
}

/// Color for a classified metric. Unknown values get no color at all,
/// known values map Good→green, Bad→red, Neutral→yellow.
fn tag_color(assessment: &MetricAssessment) -> Option<Color> {
    if !assessment.is_known() {
        return None;
    }
    Some(match assessment.classification {
        Classification::Good => Color::Green,
        Classification::Bad => Color::Red,
        Classification::Neutral => Color::Yellow,
    })
}

fn paint(assessment: &MetricAssessment) -> String {
    match tag_color(assessment) {
        Some(color) => style(&assessment.display).fg(color).to_string(),
        None => assessment.display.clone(),
    }
}

fn text_or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

fn num_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn money_or_na(value: Option<f64>) -> String {
    value
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Format with two decimals and comma-grouped thousands.
fn fmt_commas(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Uppercase the first letter of every word, like "strong buy" → "Strong Buy".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_boundary {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(ch);
            at_boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_color_mapping() {
        let good = MetricAssessment {
            classification: Classification::Good,
            display: "18.00".to_string(),
        };
        let bad = MetricAssessment {
            classification: Classification::Bad,
            display: "0.80".to_string(),
        };
        let neutral = MetricAssessment {
            classification: Classification::Neutral,
            display: "1.20".to_string(),
        };

        assert_eq!(tag_color(&good), Some(Color::Green));
        assert_eq!(tag_color(&bad), Some(Color::Red));
        assert_eq!(tag_color(&neutral), Some(Color::Yellow));
    }

    #[test]
    fn test_unknown_is_never_colored() {
        let unknown = MetricAssessment::unknown();
        assert_eq!(tag_color(&unknown), None);
        assert_eq!(paint(&unknown), "N/A");
    }

    #[test]
    fn test_fmt_commas() {
        assert_eq!(fmt_commas(0.5), "0.50");
        assert_eq!(fmt_commas(1234.5), "1,234.50");
        assert_eq!(fmt_commas(2_850_000_000_000.0), "2,850,000,000,000.00");
        assert_eq!(fmt_commas(-98765.432), "-98,765.43");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("buy"), "Buy");
        assert_eq!(title_case("strong_buy"), "Strong_Buy");
        assert_eq!(title_case("strong buy"), "Strong Buy");
    }

    #[test]
    fn test_na_fallbacks() {
        assert_eq!(num_or_na(None), "N/A");
        assert_eq!(num_or_na(Some(1.239)), "1.24");
        assert_eq!(money_or_na(None), "N/A");
        assert_eq!(money_or_na(Some(185.0)), "$185.00");
        assert_eq!(text_or_na(None), "N/A");
    }
}
