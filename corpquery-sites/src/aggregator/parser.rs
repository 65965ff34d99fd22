//! Aggregator page patterns.
//!
//! The detail page is a two-column table: a label cell followed by the
//! value cell. Value cells often wrap the text in links or spans, so the
//! whole cell is captured and cleaned.

use corpquery_core::RecordField;
use regex::Regex;
use std::sync::LazyLock;

use crate::extract::RegexExtractor;

/// First link to a company detail page.
pub static DETAIL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href=["']((?:https?://[^"'/]+)?/firm/[^"'?#]+\.html)["']"#)
        .expect("Invalid regex")
});

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h1[^>]*>(.*?)</h1>").expect("Invalid regex"));

static REG_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| table_cell("统一社会信用代码"));

static LEGAL_REP_RE: LazyLock<Regex> = LazyLock::new(|| table_cell("法定代表人"));

static CAPITAL_RE: LazyLock<Regex> = LazyLock::new(|| table_cell("注册资本"));

static ESTABLISHED_RE: LazyLock<Regex> = LazyLock::new(|| table_cell("成立日期"));

fn table_cell(label: &str) -> Regex {
    Regex::new(&format!(
        r"(?s){}\s*</t[dh]>\s*<td[^>]*>(.*?)</td>",
        regex::escape(label)
    ))
    .expect("Invalid regex")
}

/// Extractors for the aggregator detail page.
pub fn aggregator_extractors() -> Vec<RegexExtractor> {
    vec![
        RegexExtractor::new(RecordField::Name, NAME_RE.clone()),
        RegexExtractor::new(RecordField::RegNumber, REG_NUMBER_RE.clone()),
        RegexExtractor::new(RecordField::LegalRep, LEGAL_REP_RE.clone()),
        RegexExtractor::new(RecordField::Capital, CAPITAL_RE.clone()),
        RegexExtractor::new(RecordField::Established, ESTABLISHED_RE.clone()),
    ]
}
