//! HTML for each region. Every function returns the complete contents of one
//! region; server text goes through [`escape_html`] first.

use std::fmt::Write;

use super::view_models::{
    AlertRowView, AnalysisView, FibonacciRow, MetricRow, PriceCardsView, RecentAlertView,
};

pub const NO_ACTIVE_ALERTS: &str = "No active alerts";
pub const NO_RECENT_ALERTS: &str = "No recent alerts";
pub const NO_FIBONACCI_LEVELS: &str = "No Fibonacci levels";
pub const NO_ONCHAIN_DATA: &str = "On-chain data not available";

pub fn escape_html(raw: &str) -> String {
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

fn placeholder(text: &str) -> String {
    format!(r#"<div class="empty-state">{}</div>"#, text)
}

fn metric_rows(out: &mut String, rows: &[MetricRow]) {
    for row in rows {
        let _ = write!(
            out,
            r#"<div class="metric-row"><span class="metric-label">{}</span><span class="metric-value {}">{}</span></div>"#,
            escape_html(&row.label),
            row.class,
            escape_html(&row.value)
        );
    }
}

fn panel(out: &mut String, title: &str, rows: &[MetricRow]) {
    let _ = write!(out, r#"<div class="analysis-panel"><h3>{}</h3>"#, title);
    metric_rows(out, rows);
    out.push_str("</div>");
}

pub fn price_cards(view: &PriceCardsView) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="price-card"><div class="card-label">{}</div><div class="card-value">{}</div><div class="card-change {}">{}</div></div>"#,
        escape_html(&view.symbol),
        escape_html(&view.price),
        view.change_class,
        escape_html(&view.change)
    );
    let _ = write!(
        out,
        r#"<div class="price-card"><div class="card-label">24h Volume</div><div class="card-value">{}</div></div>"#,
        escape_html(&view.volume)
    );
    let _ = write!(
        out,
        r#"<div class="price-card"><div class="card-label">Bid / Ask</div><div class="card-value">{} / {}</div></div>"#,
        escape_html(&view.bid),
        escape_html(&view.ask)
    );
    let _ = write!(
        out,
        r#"<div class="price-card"><div class="card-label">RSI</div><div class="card-value {}">{}</div></div>"#,
        view.rsi_class,
        escape_html(&view.rsi)
    );
    out
}

pub fn analysis(view: &AnalysisView) -> String {
    let mut out = String::new();
    let _ = write!(out, r#"<h2 class="analysis-heading">{}</h2>"#, escape_html(&view.heading));
    panel(&mut out, "Indicators", &view.indicators);
    panel(&mut out, "Signals", &view.signals);

    out.push_str(r#"<div class="analysis-panel"><h3>Candlestick Patterns</h3>"#);
    if view.patterns.is_empty() {
        out.push_str(&placeholder("No patterns detected"));
    } else {
        out.push_str(r#"<ul class="pattern-list">"#);
        for pattern in &view.patterns {
            let _ = write!(out, "<li>{}</li>", escape_html(pattern));
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");

    panel(&mut out, "Market Sentiment", &view.sentiment);
    match &view.onchain {
        Some(rows) => panel(&mut out, "On-Chain", rows),
        None => {
            let _ = write!(out, r#"<div class="analysis-panel"><h3>On-Chain</h3>{}</div>"#, placeholder(NO_ONCHAIN_DATA));
        }
    }
    if !view.key_levels.is_empty() {
        panel(&mut out, "Key Levels", &view.key_levels);
    }
    if let Some(rows) = &view.support_resistance {
        panel(&mut out, "Support &amp; Resistance", rows);
    }
    out
}

pub fn fibonacci(rows: &[FibonacciRow]) -> String {
    if rows.is_empty() {
        return placeholder(NO_FIBONACCI_LEVELS);
    }
    let mut out = String::from(r#"<div class="fib-levels">"#);
    for row in rows {
        let class = if row.nearest { "fib-level fib-nearest" } else { "fib-level" };
        let _ = write!(
            out,
            r#"<div class="{}"><span class="fib-ratio">{}</span><span class="fib-price">{}</span></div>"#,
            class,
            escape_html(&row.label),
            escape_html(&row.price)
        );
    }
    out.push_str("</div>");
    out
}

/// Each row carries a delete button with `data-alert-id`; the page handles
/// clicks on it through a single delegated listener.
pub fn active_alerts(rows: &[AlertRowView]) -> String {
    if rows.is_empty() {
        return placeholder(NO_ACTIVE_ALERTS);
    }
    let mut out = String::new();
    for row in rows {
        let _ = write!(
            out,
            concat!(
                r#"<div class="alert-item {}">"#,
                r#"<div class="alert-info"><div class="alert-symbol">{} <span class="alert-kind">{}</span></div>"#,
                r#"<div class="alert-condition">{}</div><div class="alert-created">{}</div></div>"#,
                r#"<span class="alert-state">{}</span>"#,
                r#"<button class="alert-delete" data-alert-id="{}" title="Delete alert"><i class="fas fa-trash"></i></button>"#,
                "</div>"
            ),
            row.state_class,
            escape_html(&row.symbol),
            row.kind,
            escape_html(&row.description),
            escape_html(&row.created),
            row.state_label,
            row.id
        );
    }
    out
}

pub fn recent_alerts(rows: &[RecentAlertView]) -> String {
    if rows.is_empty() {
        return placeholder(NO_RECENT_ALERTS);
    }
    let mut out = String::new();
    for row in rows {
        let _ = write!(
            out,
            r#"<div class="recent-alert"><div class="recent-message">{}</div><div class="recent-time">{}</div></div>"#,
            escape_html(&row.message),
            escape_html(&row.time)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="alert('x')">&"#),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt;&amp;"
        );
    }

    #[test]
    fn empty_lists_render_placeholders() {
        insta::assert_snapshot!(recent_alerts(&[]), @r#"<div class="empty-state">No recent alerts</div>"#);
        assert!(active_alerts(&[]).contains(NO_ACTIVE_ALERTS));
        assert!(fibonacci(&[]).contains(NO_FIBONACCI_LEVELS));
    }

    #[test]
    fn alert_rows_carry_delete_ids() {
        let row = AlertRowView {
            id: 17,
            symbol: "BTC/USDT".into(),
            kind: "Price Alert",
            description: "Above $70,000.00".into(),
            created: "Mar 5, 02:07 PM".into(),
            state_class: "alert-active",
            state_label: "Active",
        };
        let html = active_alerts(&[row]);
        assert!(html.contains(r#"data-alert-id="17""#));
        assert!(html.contains(r#"class="alert-item alert-active""#));
    }

    #[test]
    fn recent_alert_text_is_escaped() {
        let html = recent_alerts(&[RecentAlertView { message: "<b>pump</b>".into(), time: String::new() }]);
        assert!(html.contains("&lt;b&gt;pump&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[quickcheck]
    fn escaped_text_has_no_raw_brackets(raw: String) -> bool {
        let escaped = escape_html(&raw);
        !escaped.contains('<') && !escaped.contains('>') && !escaped.contains('"')
    }
}
