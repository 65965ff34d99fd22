//! Registry page patterns.

use corpquery_core::RecordField;
use regex::Regex;
use std::sync::LazyLock;

use crate::extract::RegexExtractor;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h1 class="company-name">(.+?)</h1>"#).expect("Invalid regex"));

static REG_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"统一社会信用代码：(.+?)</span>").expect("Invalid regex"));

static LEGAL_REP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"法定代表人：(.+?)</span>").expect("Invalid regex"));

static CAPITAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"注册资本：(.+?)</span>").expect("Invalid regex"));

static ESTABLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"成立日期：(.+?)</span>").expect("Invalid regex"));

/// Extractors for the registry's inline company block.
pub fn registry_extractors() -> Vec<RegexExtractor> {
    vec![
        RegexExtractor::new(RecordField::Name, NAME_RE.clone()),
        RegexExtractor::new(RecordField::RegNumber, REG_NUMBER_RE.clone()),
        RegexExtractor::new(RecordField::LegalRep, LEGAL_REP_RE.clone()),
        RegexExtractor::new(RecordField::Capital, CAPITAL_RE.clone()),
        RegexExtractor::new(RecordField::Established, ESTABLISHED_RE.clone()),
    ]
}
