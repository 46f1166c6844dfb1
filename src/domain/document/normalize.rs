//! Identifier normalization

/// Keep only the ASCII decimal digits of `raw`, in order.
///
/// Punctuation, whitespace and any other characters are dropped, so
/// `"111.444.777-35"` becomes `"11144477735"`. Never fails.
pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Digits of an already normalized string as numeric values.
pub(crate) fn digit_values(digits: &str) -> Vec<u32> {
    digits.bytes().map(|b| u32::from(b - b'0')).collect()
}

/// True when every digit is the same (e.g. `"00000000000"`).
pub(crate) fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}
