//! Currency code → symbol lookup and monetary formatting

/// Symbol for a currency code, if one is registered
pub fn symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "PLN" => Some("zł"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CNY" => Some("¥"),
        "INR" => Some("₹"),
        "RUB" => Some("₽"),
        "KRW" => Some("₩"),
        "BRL" => Some("R$"),
        "SGD" => Some("SGD$"),
        "ZAR" => Some("R"),
        _ => None,
    }
}

/// Format a per-item cell: symbol prefix, two decimals
///
/// An unregistered code yields the bare numeric value with no symbol; making
/// one up would mislabel the amount.
pub fn format_amount(code: &str, value: f64) -> String {
    format!("{}{value:.2}", symbol(code).unwrap_or(""))
}

/// Format a totals-block cell: two decimals, code suffix (e.g. "123.45 USD")
pub fn format_amount_with_code(code: &str, value: f64) -> String {
    format!("{value:.2} {code}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registered_symbols() {
        assert_eq!(symbol("USD"), Some("$"));
        assert_eq!(symbol("PLN"), Some("zł"));
        assert_eq!(symbol("XYZ"), None);
    }

    #[test]
    fn test_format_amount_with_symbol() {
        assert_eq!(format_amount("USD", 50.0), "$50.00");
        assert_eq!(format_amount("EUR", 0.5), "€0.50");
    }

    #[test]
    fn test_format_amount_unregistered_code_is_bare() {
        assert_eq!(format_amount("XYZ", 50.0), "50.00");
    }

    #[test]
    fn test_format_amount_with_code() {
        assert_eq!(format_amount_with_code("USD", 50.0), "50.00 USD");
        assert_eq!(format_amount_with_code("XYZ", 50.0), "50.00 XYZ");
    }

    #[test]
    fn test_format_rounds_to_two_decimals() {
        assert_eq!(format_amount("USD", 10.006), "$10.01");
        assert_eq!(format_amount_with_code("USD", 10.004), "10.00 USD");
    }
}
