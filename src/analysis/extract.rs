use regex::Regex;
use std::sync::LazyLock;

static CURRENCY_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$€£¥]([0-9,]+)").expect("currency pattern is valid"));

/// Pulls currency amounts out of free text, in the order they appear.
///
/// Grouping commas are stripped before conversion. Runs without digits and
/// values that overflow `u64` are skipped, so this never fails.
pub fn extract_sales(text: &str) -> Vec<u64> {
    CURRENCY_AMOUNT
        .captures_iter(text)
        .filter_map(|caps| {
            let digits: String = caps[1].chars().filter(|c| *c != ',').collect();
            digits.parse::<u64>().ok()
        })
        .collect()
}
