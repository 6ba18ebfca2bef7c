use console::{style, StyledObject};
use sacred_numbers::Key;
use sacred_search::{MatchResult, ScanReport};

const NAME_COLUMN: usize = 24;
const NAME_WIDTH: usize = 20;
const RELEVANCE_WIDTH: usize = 10;
const DELTA_WIDTH: usize = 15;
const COMPLEXITY_WIDTH: usize = 10;

/// Decimals kept on the percent delta: three more than the tolerance shows
pub fn delta_decimals(tolerance: f64) -> usize {
    let shown = (1.0 / tolerance).log10().round();
    if shown.is_finite() {
        (3.0 + shown).max(0.0) as usize
    } else {
        3
    }
}

pub fn render_number(value: f64, matches: &[MatchResult], tolerance: f64, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        style(format!("Matches for {value}:")).bold().underlined()
    ));
    if matches.is_empty() {
        out.push_str("  no remarkable number within tolerance\n");
        return out;
    }
    for found in matches.iter().take(limit) {
        out.push_str(&format!("{:NAME_COLUMN$}", ""));
        out.push_str(&render_match(found, tolerance));
        out.push('\n');
    }
    out
}

pub fn render_scan(report: &ScanReport, tolerance: f64, limit: usize) -> String {
    let mut out = String::new();
    if report.is_empty() {
        out.push_str("No remarkable number found\n");
        return out;
    }
    for property in &report.properties {
        out.push_str(&format!(
            "\n{}\n\n",
            style(format!("{}:", property.property)).white().bright().bold().underlined()
        ));
        for item in &property.items {
            for (index, found) in item.matches.iter().take(limit).enumerate() {
                let label = if index == 0 { item.item.as_str() } else { "" };
                out.push_str(&format!(
                    "{}",
                    style(format!("{label:NAME_COLUMN$}")).cyan().bright().bold()
                ));
                out.push_str(&render_match(found, tolerance));
                out.push('\n');
            }
        }
    }
    out
}

pub fn render_integer(n: u64, divisors: &[u64], series: &[&str]) -> String {
    let divisors = if divisors.is_empty() {
        "none (prime or trivial)".to_string()
    } else {
        divisors
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let series = if series.is_empty() {
        "none".to_string()
    } else {
        series.join(", ")
    };
    format!(
        "{}\n  divisors: {divisors}\n  series:   {series}\n",
        style(n).bold()
    )
}

fn render_match(found: &MatchResult, tolerance: f64) -> String {
    let decimals = delta_decimals(tolerance);
    let relevance = format!("R={:.2}", found.relevance);
    let delta = format!("Δ={:.decimals$}%", found.delta * 100.0);

    format!(
        "{}{}{}{}{}{} -> {}",
        style(format!("{:NAME_WIDTH$}", found.name)).yellow().bright(),
        emphasize(format!("{relevance:RELEVANCE_WIDTH$}"), found.relevance),
        emphasize(format!("{delta:DELTA_WIDTH$}"), found.relevance),
        format!("{:COMPLEXITY_WIDTH$}", format!("C={:.1}", found.remarkable_complexity)),
        format!("{:COMPLEXITY_WIDTH$}", format!("Cf={:.1}", found.complexity_factor)),
        significant(found.value),
        significant(found.remarkable_value),
    )
}

fn emphasize(text: String, relevance: f64) -> StyledObject<String> {
    let styled = style(text);
    if relevance >= 3.0 {
        styled.on_red().bold()
    } else if relevance >= 2.0 {
        styled.red().bright().bold()
    } else if relevance >= 1.0 {
        styled.yellow().bright().bold()
    } else {
        styled
    }
}

/// Drop the floating-point noise past the keyed digits
fn significant(value: f64) -> f64 {
    Key::of(value).map_or(value, Key::value)
}
