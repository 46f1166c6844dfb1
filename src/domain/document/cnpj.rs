//! CNPJ (Cadastro Nacional da Pessoa Jurídica) check digits and formatting

use super::normalize::{all_same, digit_values, only_digits};

/// Number of digits in a CNPJ
pub const CNPJ_LENGTH: usize = 14;

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Validate a CNPJ, ignoring any punctuation in `raw`.
pub fn is_valid_cnpj(raw: &str) -> bool {
    let cnpj = only_digits(raw);

    if cnpj.len() != CNPJ_LENGTH {
        return false;
    }

    let digits = digit_values(&cnpj);

    if all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..12], &FIRST_WEIGHTS);

    let mut base = digits[..12].to_vec();
    base.push(first);
    let second = check_digit(&base, &SECOND_WEIGHTS);

    first == digits[12] && second == digits[13]
}

fn check_digit(base: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = base.iter().zip(weights).map(|(d, w)| d * w).sum();
    let remainder = sum % 11;

    if remainder < 2 { 0 } else { 11 - remainder }
}

/// Format as `dd.ddd.ddd/dddd-dd`; anything that is not 14 digits is
/// returned as its bare digits.
pub fn format_cnpj(raw: &str) -> String {
    let cnpj = only_digits(raw);

    if cnpj.len() != CNPJ_LENGTH {
        return cnpj;
    }

    format!(
        "{}.{}.{}/{}-{}",
        &cnpj[..2],
        &cnpj[2..5],
        &cnpj[5..8],
        &cnpj[8..12],
        &cnpj[12..]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cnpj() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(is_valid_cnpj("11.444.777/0001-61"));
    }

    #[test]
    fn test_bad_check_digits_rejected() {
        assert!(!is_valid_cnpj("11222333000180"));
        assert!(!is_valid_cnpj("11222333000191"));
    }

    #[test]
    fn test_repeated_digits_rejected() {
        assert!(!is_valid_cnpj("11111111111111"));
        assert!(!is_valid_cnpj("00.000.000/0000-00"));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid_cnpj("112223330001810"));
        assert!(!is_valid_cnpj("11144477735"));
    }

    #[test]
    fn test_check_digit_remainder_rule() {
        // sum 102 -> remainder 3 -> 8
        assert_eq!(check_digit(&digit_values("112223330001"), &FIRST_WEIGHTS), 8);
        // sum 120 -> remainder 10 -> 1
        assert_eq!(
            check_digit(&digit_values("1122233300018"), &SECOND_WEIGHTS),
            1
        );
        // remainder below 2 maps to 0
        assert_eq!(check_digit(&[0; 12], &FIRST_WEIGHTS), 0);
    }

    #[test]
    fn test_format_cnpj() {
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
    }

    #[test]
    fn test_format_cnpj_fallback() {
        assert_eq!(format_cnpj("11.222"), "11222");
        assert_eq!(format_cnpj(""), "");
    }
}
