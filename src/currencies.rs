//! Static currency table and symbol-to-code resolution.
//!
//! Symbols are a one-to-many relation: `$` is shared by USD and ARS, `¥` by
//! JPY and CNY, `kr` by the Scandinavian currencies. Declaration order is the
//! tie-break; a per-domain mapping can override it for ambiguous symbols.

use std::collections::HashMap;
use tracing::debug;

/// Fallback when a token cannot be resolved to a known currency.
pub const DEFAULT_CURRENCY: &str = "USD";

pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
}

/// Supported currencies, fiat and crypto. Order matters: the first entry
/// with a given symbol wins when no domain mapping applies.
pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$" },
    Currency { code: "EUR", symbol: "€" },
    Currency { code: "GBP", symbol: "£" },
    Currency { code: "JPY", symbol: "¥" },
    Currency { code: "INR", symbol: "₹" },
    Currency { code: "CNY", symbol: "¥" },
    Currency { code: "AUD", symbol: "A$" },
    Currency { code: "CAD", symbol: "C$" },
    Currency { code: "CHF", symbol: "Fr" },
    Currency { code: "HKD", symbol: "HK$" },
    Currency { code: "SGD", symbol: "S$" },
    Currency { code: "NZD", symbol: "NZ$" },
    Currency { code: "ZAR", symbol: "R" },
    Currency { code: "RUB", symbol: "₽" },
    Currency { code: "KRW", symbol: "₩" },
    Currency { code: "THB", symbol: "฿" },
    Currency { code: "MXN", symbol: "Mex$" },
    Currency { code: "BRL", symbol: "R$" },
    Currency { code: "PLN", symbol: "zł" },
    Currency { code: "SEK", symbol: "kr" },
    Currency { code: "NOK", symbol: "kr" },
    Currency { code: "DKK", symbol: "kr" },
    Currency { code: "ILS", symbol: "₪" },
    Currency { code: "TRY", symbol: "₺" },
    Currency { code: "SAR", symbol: "﷼" },
    Currency { code: "AED", symbol: "د.إ" },
    Currency { code: "PHP", symbol: "₱" },
    Currency { code: "CZK", symbol: "Kč" },
    Currency { code: "IDR", symbol: "Rp" },
    Currency { code: "MYR", symbol: "RM" },
    Currency { code: "HUF", symbol: "Ft" },
    Currency { code: "CLP", symbol: "CLP$" },
    Currency { code: "TWD", symbol: "NT$" },
    Currency { code: "ARS", symbol: "$" },
    Currency { code: "COP", symbol: "COL$" },
    Currency { code: "PEN", symbol: "S/" },
    Currency { code: "VND", symbol: "₫" },
    Currency { code: "UAH", symbol: "₴" },
    Currency { code: "EGP", symbol: "E£" },
    Currency { code: "CRC", symbol: "₡" },
    Currency { code: "QAR", symbol: "QR" },
    Currency { code: "NGN", symbol: "₦" },
    Currency { code: "MAD", symbol: "MAD" },
    Currency { code: "KWD", symbol: "KD" },
    Currency { code: "BHD", symbol: "BD" },
    Currency { code: "OMR", symbol: "OMR" },
    Currency { code: "JOD", symbol: "JD" },
    Currency { code: "DZD", symbol: "DA" },
    Currency { code: "TND", symbol: "DT" },
    Currency { code: "LBP", symbol: "L£" },
    Currency { code: "PKR", symbol: "₨" },
    Currency { code: "BDT", symbol: "৳" },
    Currency { code: "KES", symbol: "KSh" },
    Currency { code: "GHS", symbol: "GH₵" },
    Currency { code: "UGX", symbol: "USh" },
    Currency { code: "TZS", symbol: "TSh" },
    Currency { code: "RWF", symbol: "RF" },
    Currency { code: "ETB", symbol: "Br" },
    Currency { code: "XAF", symbol: "FCFA" },
    Currency { code: "XOF", symbol: "CFA" },
    Currency { code: "XPF", symbol: "CFPF" },
    Currency { code: "BTC", symbol: "₿" },
    Currency { code: "ETH", symbol: "Ξ" },
    Currency { code: "LTC", symbol: "Ł" },
    Currency { code: "XRP", symbol: "XRP" },
    Currency { code: "DOGE", symbol: "Ð" },
    Currency { code: "USDT", symbol: "₮" },
    Currency { code: "BNB", symbol: "BNB" },
    Currency { code: "SOL", symbol: "SOL" },
    Currency { code: "ADA", symbol: "ADA" },
    Currency { code: "DOT", symbol: "DOT" },
    Currency { code: "TRX", symbol: "TRX" },
];

pub fn is_known_code(token: &str) -> bool {
    CURRENCIES.iter().any(|c| c.code == token)
}

/// Display symbol for a code. First declaration wins for codes listed once.
pub fn symbol_for(code: &str) -> Option<&'static str> {
    CURRENCIES.iter().find(|c| c.code == code).map(|c| c.symbol)
}

/// A symbol shared by more than one currency (e.g. `$`, `¥`, `kr`).
pub fn is_ambiguous_symbol(symbol: &str) -> bool {
    CURRENCIES.iter().filter(|c| c.symbol == symbol).count() > 1
}

/// Resolves a symbol-or-code token to a currency code, or `None` when the
/// token matches nothing in the table.
///
/// Domain mappings only apply to ambiguous symbols; an explicit code or an
/// unshared symbol is never overridden.
pub fn try_resolve_currency_code(
    token: &str,
    mappings: &HashMap<String, String>,
    context_domain: Option<&str>,
) -> Option<String> {
    let token = token.trim().to_uppercase();

    if is_known_code(&token) {
        return Some(token);
    }

    for currency in CURRENCIES {
        if currency.symbol.to_uppercase() == token {
            if is_ambiguous_symbol(currency.symbol)
                && let Some(domain) = context_domain
                && let Some(code) = mappings.get(&domain.to_lowercase())
            {
                debug!("Using domain mapping for {domain}: {code}");
                return Some(code.trim().to_uppercase());
            }
            return Some(currency.code.to_string());
        }
    }

    None
}

/// Permissive variant of [`try_resolve_currency_code`]: unresolvable tokens
/// fall back to [`DEFAULT_CURRENCY`] instead of failing. Callers that need
/// to distinguish "unknown" from "resolved to USD" should use the fallible
/// variant.
pub fn resolve_currency_code(
    token: &str,
    mappings: &HashMap<String, String>,
    context_domain: Option<&str>,
) -> String {
    try_resolve_currency_code(token, mappings, context_domain)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

/// Renders an amount the way it would appear in page text, e.g. `$10.99`.
pub fn format_amount(code: &str, value: f64) -> String {
    match symbol_for(code) {
        Some(symbol) => format!("{symbol}{value}"),
        None => format!("{code} {value}"),
    }
}
