//! Currency-expression parser.
//!
//! Extracts a single monetary amount from an arbitrary text span: a currency
//! token (symbol or code) adjacent to a numeric literal, in either order,
//! with optional whitespace in between. Negation can be an explicit leading
//! minus, a sign inside the numeric literal, or accounting parentheses.
//!
//! This is a total function over all inputs: anything that fails the guards
//! and every pattern rule is simply `None`, and nothing here panics.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::currencies::{self, CURRENCIES};

/// A monetary amount recognized in text. `value` carries the sign.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAmount {
    pub currency_code: String,
    pub value: f64,
}

/// Alternation over every known symbol (escaped, symbols contain regex
/// metacharacters like `$`) and every known code, in table order. The regex
/// crate picks the leftmost match and, at equal positions, the first
/// alternative, so table order doubles as match priority.
fn currency_token_alternation() -> String {
    let mut tokens: Vec<String> = CURRENCIES
        .iter()
        .map(|c| regex::escape(c.symbol))
        .collect();
    tokens.extend(CURRENCIES.iter().map(|c| c.code.to_string()));
    tokens.join("|")
}

fn amount_pattern(pattern: &str) -> Regex {
    let pattern = pattern.replace("{token}", &currency_token_alternation());
    Regex::new(&format!("(?i){pattern}")).expect("invalid amount pattern")
}

// Numeric literals are digits with optional comma grouping and an optional
// decimal part; commas are stripped, not locale-validated.
static STANDALONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-?[\d,]+(?:\.\d+)?\s*$").expect("invalid number pattern"));
static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+:\d+\s*(?:am|pm)?").expect("invalid time pattern"));

// Pattern rules, in priority order.
static NEGATIVE_CURRENCY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| amount_pattern(r"-\s*({token})\s*([\d,]+(?:\.\d+)?)"));
static CURRENCY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| amount_pattern(r"({token})\s*(-?[\d,]+(?:\.\d+)?)"));
static NEGATIVE_NUMBER_FIRST: LazyLock<Regex> =
    LazyLock::new(|| amount_pattern(r"-\s*([\d,]+(?:\.\d+)?)\s*({token})"));
static NUMBER_FIRST: LazyLock<Regex> =
    LazyLock::new(|| amount_pattern(r"([\d,]+(?:\.\d+)?)\s*({token})"));

// Accounting notation: a parenthesized amount is negative by convention.
static PAREN_CURRENCY_FIRST: LazyLock<Regex> =
    LazyLock::new(|| amount_pattern(r"\(\s*({token})\s*([\d,]+(?:\.\d+)?)\s*\)"));
static PAREN_NUMBER_FIRST: LazyLock<Regex> =
    LazyLock::new(|| amount_pattern(r"\(\s*([\d,]+(?:\.\d+)?)\s*({token})\s*\)"));

fn numeric_value(digits: &str) -> Option<f64> {
    digits.replace(',', "").parse().ok()
}

/// Parses the first currency amount in `text`, or `None` if the text does
/// not denote one.
///
/// `mappings` and `context_domain` disambiguate shared symbols (`$` on a
/// `.ca` storefront can resolve to CAD); unrecognized tokens fall back to
/// USD per [`currencies::resolve_currency_code`].
pub fn parse_amount(
    text: &str,
    mappings: &HashMap<String, String>,
    context_domain: Option<&str>,
) -> Option<ParsedAmount> {
    // Reject-fast guards: URLs, assignments/query strings, source code,
    // bare numbers and clock times are never currency amounts.
    if text.contains("://")
        || text.contains('=')
        || text.contains("function")
        || text.contains("const ")
    {
        return None;
    }
    if STANDALONE_NUMBER.is_match(text) || CLOCK_TIME.is_match(text) {
        return None;
    }

    let amount = |token: &str, value: f64| ParsedAmount {
        currency_code: currencies::resolve_currency_code(token, mappings, context_domain),
        value,
    };

    // Parenthesized amounts must be checked before the plain rules:
    // "($7.50)" contains a plain currency-before-number match that would
    // otherwise win and drop the sign.
    if text.contains('(') && text.contains(')') {
        if let Some(caps) = PAREN_CURRENCY_FIRST.captures(text) {
            return Some(amount(&caps[1], -numeric_value(&caps[2])?));
        }
        if let Some(caps) = PAREN_NUMBER_FIRST.captures(text) {
            return Some(amount(&caps[2], -numeric_value(&caps[1])?));
        }
    }

    if let Some(caps) = NEGATIVE_CURRENCY_FIRST.captures(text) {
        return Some(amount(&caps[1], -numeric_value(&caps[2])?));
    }
    if let Some(caps) = CURRENCY_FIRST.captures(text) {
        return Some(amount(&caps[1], numeric_value(&caps[2])?));
    }
    if let Some(caps) = NEGATIVE_NUMBER_FIRST.captures(text) {
        return Some(amount(&caps[2], -numeric_value(&caps[1])?));
    }
    if let Some(caps) = NUMBER_FIRST.captures(text) {
        return Some(amount(&caps[2], numeric_value(&caps[1])?));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currencies::format_amount;

    fn parse(text: &str) -> Option<ParsedAmount> {
        parse_amount(text, &HashMap::new(), None)
    }

    fn assert_parses(text: &str, code: &str, value: f64) {
        let parsed = parse(text).unwrap_or_else(|| panic!("expected a match for {text:?}"));
        assert_eq!(parsed.currency_code, code, "currency for {text:?}");
        assert_eq!(parsed.value, value, "value for {text:?}");
    }

    #[test]
    fn test_symbol_before_number() {
        assert_parses("$10.99", "USD", 10.99);
        assert_parses("€ 15.50", "EUR", 15.50);
        assert_parses("£20", "GBP", 20.0);
        assert_parses("¥1,000", "JPY", 1000.0);
        assert_parses("₿0.00123456", "BTC", 0.00123456);
    }

    #[test]
    fn test_number_before_symbol() {
        assert_parses("10.99$", "USD", 10.99);
        assert_parses("15.50 €", "EUR", 15.50);
        assert_parses("20£", "GBP", 20.0);
        assert_parses("1,000¥", "JPY", 1000.0);
    }

    #[test]
    fn test_code_before_number() {
        assert_parses("USD 45.99", "USD", 45.99);
        assert_parses("EUR 25.75", "EUR", 25.75);
        assert_parses("GBP50", "GBP", 50.0);
        assert_parses("JPY 10,000", "JPY", 10000.0);
        assert_parses("BTC 0.00123456", "BTC", 0.00123456);
    }

    #[test]
    fn test_code_after_number() {
        assert_parses("45.99 USD", "USD", 45.99);
        assert_parses("50EUR", "EUR", 50.0);
        assert_parses("30 GBP", "GBP", 30.0);
        assert_parses("1,000 GBP", "GBP", 1000.0);
    }

    #[test]
    fn test_codes_match_case_insensitively() {
        assert_parses("45.99 usd", "USD", 45.99);
        assert_parses("eur 25.75", "EUR", 25.75);
    }

    #[test]
    fn test_explicit_negatives() {
        assert_parses("-$5.99", "USD", -5.99);
        assert_parses("-€ 15.50", "EUR", -15.50);
        assert_parses("-10.99 USD", "USD", -10.99);
        // Sign embedded in the numeric literal
        assert_parses("$-5.99", "USD", -5.99);
    }

    #[test]
    fn test_parenthesized_negatives() {
        assert_parses("($7.50)", "USD", -7.50);
        assert_parses("($ 10.99)", "USD", -10.99);
        assert_parses("(10.99$)", "USD", -10.99);
        assert_parses("(EUR 15.50)", "EUR", -15.50);
        assert_parses("(10.99 EUR)", "EUR", -10.99);
    }

    #[test]
    fn test_parenthetical_text_still_matches_plain_rules() {
        // Parens present but not wrapping the amount
        assert_parses("(see the $5 price)", "USD", 5.0);
    }

    #[test]
    fn test_thousands_separators() {
        assert_parses("$1,000.00", "USD", 1000.0);
        assert_parses("€1,000,000.50", "EUR", 1000000.50);
        assert_parses("1,000,000.50 USD", "USD", 1000000.50);
    }

    #[test]
    fn test_amount_inside_sentence() {
        assert_parses("The product costs $19.99 plus shipping.", "USD", 19.99);
        assert_parses("<strong>€99.99</strong>", "EUR", 99.99);
    }

    #[test]
    fn test_first_amount_wins() {
        assert_parses("Convert $100 USD to €92 EUR or £79 GBP", "USD", 100.0);
    }

    #[test]
    fn test_cryptocurrencies() {
        assert_parses("₿0.5", "BTC", 0.5);
        assert_parses("Ξ2.5", "ETH", 2.5);
        assert_parses("DOGE 420.69", "DOGE", 420.69);
    }

    #[test]
    fn test_less_common_currencies() {
        assert_parses("฿500", "THB", 500.0);
        assert_parses("₹1,000", "INR", 1000.0);
        assert_parses("₫20,000", "VND", 20000.0);
    }

    #[test]
    fn test_url_guard() {
        assert!(parse("https://x.com?currency=USD&amount=50").is_none());
        assert!(parse("ftp://example.com/$10").is_none());
    }

    #[test]
    fn test_code_context_guards() {
        assert!(parse("const $element = document.getElementById('price');").is_none());
        assert!(parse("function pay() { charge($10); }").is_none());
        assert!(parse("price = 10").is_none());
    }

    #[test]
    fn test_standalone_number_guard() {
        assert!(parse("1234.56").is_none());
        assert!(parse("  -1,234  ").is_none());
    }

    #[test]
    fn test_time_guard() {
        assert!(parse("10:30 AM").is_none());
        assert!(parse("meeting at 14:45").is_none());
    }

    #[test]
    fn test_no_currency_marker() {
        assert!(parse("20% discount").is_none());
        assert!(parse("").is_none());
        assert!(parse("no numbers here").is_none());
    }

    #[test]
    fn test_total_on_junk_input() {
        for text in ["(", ")", "((()))", "$", "-", ",,,", "$,", "(-)", "¥¥¥"] {
            // Must not panic; match or no-match are both acceptable shapes.
            let _ = parse(text);
        }
    }

    #[test]
    fn test_domain_mapping_applies_to_parsed_symbol() {
        let mut mappings = HashMap::new();
        mappings.insert("amazon.ca".to_string(), "CAD".to_string());

        let parsed = parse_amount("$9.99", &mappings, Some("amazon.ca")).unwrap();
        assert_eq!(parsed.currency_code, "CAD");
        assert_eq!(parsed.value, 9.99);

        let parsed = parse_amount("$9.99", &mappings, Some("amazon.com")).unwrap();
        assert_eq!(parsed.currency_code, "USD");
    }

    #[test]
    fn test_round_trip_rendering() {
        let mappings = HashMap::new();
        for (code, value) in [("EUR", 12.5), ("GBP", 3.0), ("BTC", 0.25), ("USD", 99.99)] {
            let text = format_amount(code, value);
            let parsed = parse_amount(&text, &mappings, None)
                .unwrap_or_else(|| panic!("round trip failed for {text:?}"));
            assert_eq!(parsed.currency_code, code);
            assert_eq!(parsed.value, value);
        }
    }
}
