//! CPF (Cadastro de Pessoas Físicas) check digits and formatting

use super::normalize::{all_same, digit_values, only_digits};

/// Number of digits in a CPF
pub const CPF_LENGTH: usize = 11;

/// Validate a CPF, ignoring any punctuation in `raw`.
///
/// Rejects anything that is not exactly 11 digits and the repeated-digit
/// sequences (`000.000.000-00` and friends), which satisfy the checksum but
/// are never issued.
pub fn is_valid_cpf(raw: &str) -> bool {
    let cpf = only_digits(raw);

    if cpf.len() != CPF_LENGTH {
        return false;
    }

    let digits = digit_values(&cpf);

    if all_same(&digits) {
        return false;
    }

    (9..CPF_LENGTH).all(|target| check_digit(&digits[..target]) == digits[target])
}

/// Check digit for the digits preceding position `base.len()`.
///
/// Digit `j` is weighted by `(base.len() + 1) - j`.
fn check_digit(base: &[u32]) -> u32 {
    let top = base.len() as u32 + 1;
    let sum: u32 = base
        .iter()
        .enumerate()
        .map(|(j, d)| d * (top - j as u32))
        .sum();

    ((sum * 10) % 11) % 10
}

/// Format as `ddd.ddd.ddd-dd`; anything that is not 11 digits is returned
/// as its bare digits.
pub fn format_cpf(raw: &str) -> String {
    let cpf = only_digits(raw);

    if cpf.len() != CPF_LENGTH {
        return cpf;
    }

    format!("{}.{}.{}-{}", &cpf[..3], &cpf[3..6], &cpf[6..9], &cpf[9..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("111.444.777-35"));
        assert!(is_valid_cpf("529.982.247-25"));
    }

    #[test]
    fn test_repeated_digits_rejected() {
        assert!(!is_valid_cpf("11111111111"));
        assert!(!is_valid_cpf("000.000.000-00"));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(!is_valid_cpf("111444777"));
        assert!(!is_valid_cpf("111444777350"));
        assert!(!is_valid_cpf(""));
    }

    #[test]
    fn test_bad_check_digits_rejected() {
        assert!(!is_valid_cpf("11144477736"));
        assert!(!is_valid_cpf("11144477725"));
    }

    #[test]
    fn test_check_digit_weights() {
        // 1*10 + 1*9 + 1*8 + 4*7 + 4*6 + 4*5 + 7*4 + 7*3 + 7*2 = 162
        // (162 * 10) % 11 = 3
        assert_eq!(check_digit(&digit_values("111444777")), 3);
        assert_eq!(check_digit(&digit_values("1114447773")), 5);
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("11144477735"), "111.444.777-35");
        assert_eq!(format_cpf("111.444.777-35"), "111.444.777-35");
    }

    #[test]
    fn test_format_cpf_fallback() {
        assert_eq!(format_cpf("123"), "123");
        assert_eq!(format_cpf("12.3"), "123");
    }
}
