//! Unit tests for HTML rendering helpers

use tradepilot::core::page::{escape, render_form_page, FormValues};

#[test]
fn test_escape() {
    assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
}

#[test]
fn test_form_echoes_escaped_symbol() {
    let form = FormValues {
        symbol: "<script>".to_string(),
        ..FormValues::default()
    };
    let html = render_form_page(&form, false);
    assert!(html.contains("value=\"&lt;script&gt;\""));
    assert!(!html.contains("<script>"));
    assert!(html.contains("not configured"));
}
