/// Canonical ticker form: alphanumerics plus the separators real symbols use
/// (BRK.B, BF-B), capped in length, upper-cased. Idempotent.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker
        .chars()
        .take(20)
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect::<String>()
        .to_uppercase()
}
