//! Currency codes, symbols and marker rewriting for monetary text.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Known currencies: ISO code and display symbol, if one is in common use.
///
/// Several currencies share `$` and `¥`; a shared symbol is never treated as
/// foreign when the declared currency also uses it.
const CURRENCIES: &[(&str, Option<&str>)] = &[
    ("USD", Some("$")),
    ("EUR", Some("€")),
    ("GBP", Some("£")),
    ("JPY", Some("¥")),
    ("INR", Some("₹")),
    ("KRW", Some("₩")),
    ("NGN", Some("₦")),
    ("CAD", Some("$")),
    ("AUD", Some("$")),
    ("NZD", Some("$")),
    ("SGD", Some("$")),
    ("HKD", Some("$")),
    ("MXN", Some("$")),
    ("CNY", Some("¥")),
    ("CHF", None),
    ("BRL", None),
    ("SEK", None),
    ("NOK", None),
    ("DKK", None),
    ("ZAR", None),
];

static SYMBOLS_BY_CODE: Lazy<HashMap<&'static str, Option<&'static str>>> =
    Lazy::new(|| CURRENCIES.iter().copied().collect());

/// Canonical form of a declared currency.
///
/// Trims and uppercases codes, and maps a bare symbol to the first currency
/// using it (`"$"` becomes `"USD"`). Unknown codes are kept, uppercased.
pub fn canonical_code(declared: &str) -> String {
    let trimmed = declared.trim();
    if let Some((code, _)) = CURRENCIES
        .iter()
        .find(|(_, symbol)| *symbol == Some(trimmed))
    {
        return (*code).to_string();
    }
    trimmed.to_uppercase()
}

/// Display symbol for a currency code, if known.
pub fn symbol_for(code: &str) -> Option<&'static str> {
    SYMBOLS_BY_CODE.get(code).copied().flatten()
}

/// Rewrites foreign currency markers inside `text` to the declared currency.
///
/// Foreign symbols become the declared symbol (or `"<CODE> "` when the declared
/// currency has none); foreign codes standing as whole words become the
/// declared code. Text that already uses only the declared currency is returned
/// unchanged.
pub fn rewrite_foreign_markers(text: &str, declared_code: &str) -> String {
    let declared_symbol = symbol_for(declared_code);
    let mut result = text.to_string();

    for (code, symbol) in CURRENCIES {
        if *code == declared_code {
            continue;
        }
        if let Some(symbol) = symbol {
            if Some(*symbol) != declared_symbol && result.contains(symbol) {
                let replacement = match declared_symbol {
                    Some(own) => own.to_string(),
                    None => format!("{} ", declared_code),
                };
                result = result.replace(symbol, &replacement);
            }
        }
        result = replace_code_word(&result, code, declared_code);
    }

    result
}

/// Replaces `code` with `replacement` where it is not part of a longer word.
fn replace_code_word(text: &str, code: &str, replacement: &str) -> String {
    if !text.contains(code) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(code) {
        let before = rest[..pos].chars().next_back();
        let after = rest[pos + code.len()..].chars().next();
        let bounded = !before.is_some_and(char::is_alphabetic)
            && !after.is_some_and(char::is_alphabetic);

        out.push_str(&rest[..pos]);
        out.push_str(if bounded { replacement } else { code });
        rest = &rest[pos + code.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_code_uppercases_and_trims() {
        assert_eq!(canonical_code(" usd "), "USD");
        assert_eq!(canonical_code("EUR"), "EUR");
    }

    #[test]
    fn canonical_code_maps_bare_symbols() {
        assert_eq!(canonical_code("$"), "USD");
        assert_eq!(canonical_code("€"), "EUR");
        assert_eq!(canonical_code("£"), "GBP");
    }

    #[test]
    fn canonical_code_keeps_unknown_codes() {
        assert_eq!(canonical_code("xyz"), "XYZ");
    }

    #[test]
    fn rewrites_foreign_symbol_to_declared_symbol() {
        assert_eq!(rewrite_foreign_markers("€29/month", "USD"), "$29/month");
        assert_eq!(rewrite_foreign_markers("$29/month", "EUR"), "€29/month");
    }

    #[test]
    fn rewrites_foreign_code_word() {
        assert_eq!(rewrite_foreign_markers("29 EUR per seat", "USD"), "29 USD per seat");
    }

    #[test]
    fn leaves_code_inside_longer_words() {
        assert_eq!(rewrite_foreign_markers("EUROPE launch", "USD"), "EUROPE launch");
    }

    #[test]
    fn declared_currency_text_is_unchanged() {
        assert_eq!(rewrite_foreign_markers("$24/month", "USD"), "$24/month");
        assert_eq!(rewrite_foreign_markers("24 USD", "USD"), "24 USD");
    }

    #[test]
    fn shared_dollar_symbol_is_native_for_dollar_currencies() {
        assert_eq!(rewrite_foreign_markers("$40", "CAD"), "$40");
    }

    #[test]
    fn shared_yen_symbol_is_native_for_yuan() {
        assert_eq!(rewrite_foreign_markers("¥3000", "CNY"), "¥3000");
        assert_eq!(rewrite_foreign_markers("¥3000", "JPY"), "¥3000");
    }

    #[test]
    fn yen_symbol_is_foreign_to_other_currencies() {
        assert_eq!(rewrite_foreign_markers("¥3000", "USD"), "$3000");
        assert_eq!(rewrite_foreign_markers("¥3000", "CHF"), "CHF 3000");
    }

    #[test]
    fn symbol_less_declared_currency_uses_code_prefix() {
        assert_eq!(rewrite_foreign_markers("$40", "CHF"), "CHF 40");
    }

    #[test]
    fn rewriting_is_idempotent() {
        let once = rewrite_foreign_markers("£10 or 12 EUR", "USD");
        let twice = rewrite_foreign_markers(&once, "USD");
        assert_eq!(once, twice);
        assert_eq!(once, "$10 or 12 USD");
    }
}
