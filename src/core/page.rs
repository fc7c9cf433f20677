//! Server-rendered HTML for the form and the result view.

use std::fmt::Write;

use super::error::AnalysisError;
use super::service::AnalysisOutcome;
use crate::services::market_data::Interval;

pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 180;
pub const RECENT_ROWS: usize = 5;

/// Values echoed back into the form.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub symbol: String,
    pub lookback_days: u32,
    pub interval: Interval,
    pub use_brokerage: bool,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            interval: Interval::Day,
            use_brokerage: false,
        }
    }
}

pub fn render_form_page(form: &FormValues, brokerage_available: bool) -> String {
    layout(&form_html(form, brokerage_available), "")
}

pub fn render_result_page(form: &FormValues, brokerage_available: bool, outcome: &AnalysisOutcome) -> String {
    let analysis = &outcome.analysis;
    let rec = &analysis.recommendation;
    let mut body = String::new();

    let _ = write!(
        body,
        "<section class=\"result\">\
         <h2>{symbol} &mdash; Last Close: {close:.2}</h2>\
         <p class=\"signal signal-{class}\">Suggestion: <strong>{signal}</strong></p>\
         <p class=\"rationale\">{rationale}</p>\
         <p class=\"meta\">{bars} bars from {provider}</p>",
        symbol = escape(analysis.series.symbol()),
        close = rec.snapshot.close,
        class = rec.signal.as_str().to_lowercase(),
        signal = rec.signal,
        rationale = escape(&rec.rationale),
        bars = analysis.series.len(),
        provider = escape(outcome.provider),
    );

    body.push_str(
        "<table><thead><tr><th>Date</th><th>Close</th><th>RSI</th><th>MACD</th><th>Signal</th>\
         <th>SMA short</th><th>SMA long</th><th>BB lower</th><th>BB upper</th></tr></thead><tbody>",
    );
    for row in analysis.recent_rows(RECENT_ROWS) {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.timestamp.format("%Y-%m-%d %H:%M"),
            row.close,
            cell(row.rsi),
            cell(row.macd),
            cell(row.macd_signal),
            cell(row.sma_short),
            cell(row.sma_long),
            cell(row.bb_lower),
            cell(row.bb_upper),
        );
    }
    body.push_str("</tbody></table></section>");

    layout(&form_html(form, brokerage_available), &body)
}

pub fn render_error_page(form: &FormValues, brokerage_available: bool, error: &AnalysisError) -> String {
    let message = match error {
        AnalysisError::Indicator(crate::indicators::IndicatorError::InsufficientData { required, available }) => {
            format!(
                "Not enough history to compute a signal: {} bars needed, {} returned. Try a longer history window.",
                required, available
            )
        }
        AnalysisError::DataUnavailable(e) => {
            format!("Failed to fetch data: {}. Check the symbol and data provider configuration.", e)
        }
        other => other.to_string(),
    };
    let body = format!("<section class=\"error\"><p>{}</p></section>", escape(&message));
    layout(&form_html(form, brokerage_available), &body)
}

fn form_html(form: &FormValues, brokerage_available: bool) -> String {
    let mut options = String::new();
    for interval in Interval::ALL {
        let _ = write!(
            options,
            "<option value=\"{v}\"{sel}>{v}</option>",
            v = interval.as_str(),
            sel = if interval == form.interval { " selected" } else { "" },
        );
    }

    let brokerage_note = if brokerage_available {
        ""
    } else {
        " <small>(not configured, public data will be used)</small>"
    };

    format!(
        "<form method=\"get\" action=\"/analyze\">\
         <label>Symbol / Ticker <input name=\"symbol\" value=\"{symbol}\" required></label>\
         <label>History (days) <input type=\"number\" name=\"lookback_days\" min=\"30\" max=\"365\" step=\"30\" value=\"{days}\"></label>\
         <label>Interval <select name=\"interval\">{options}</select></label>\
         <label><input type=\"checkbox\" name=\"use_brokerage\"{checked}> Use brokerage data{note}</label>\
         <button type=\"submit\">Fetch &amp; Analyze</button>\
         </form>",
        symbol = escape(&form.symbol),
        days = form.lookback_days,
        options = options,
        checked = if form.use_brokerage { " checked" } else { "" },
        note = brokerage_note,
    )
}

fn layout(form: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Automated Trade Recommendation</title>\
         <style>body{{font-family:sans-serif;margin:2rem}}label{{display:block;margin:.4rem 0}}\
         table{{border-collapse:collapse;margin-top:1rem}}td,th{{border:1px solid #ccc;padding:.25rem .5rem;text-align:right}}\
         .signal-buy{{color:#080}}.signal-sell{{color:#b00}}.signal-hold{{color:#666}}.error{{color:#b00}}</style>\
         </head><body><h1>Automated Trade Recommendation System</h1>{form}{body}</body></html>",
        form = form,
        body = body,
    )
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "&ndash;".to_string())
}

/// Minimal HTML escaping for text and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
