//! Password generation and strength checks

use rand::seq::SliceRandom;
use rand::Rng;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;
pub const MIN_PASSWORD_LENGTH: usize = 8;

fn pick(rng: &mut impl Rng, set: &[u8]) -> u8 {
    set[rng.gen_range(0..set.len())]
}

/// Random password with at least one uppercase letter, lowercase letter,
/// digit and symbol
///
/// Lengths below 4 still produce 4 characters.
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();

    let mut chars = vec![
        pick(&mut rng, UPPERCASE),
        pick(&mut rng, LOWERCASE),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SYMBOLS),
    ];
    while chars.len() < length {
        chars.push(pick(&mut rng, &all));
    }
    chars.shuffle(&mut rng);

    chars.into_iter().map(char::from).collect()
}

/// Result of [`check_password_strength`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    pub problems: Vec<String>,
}

impl PasswordStrength {
    pub fn is_strong(&self) -> bool {
        self.problems.is_empty()
    }
}

pub fn check_password_strength(password: &str) -> PasswordStrength {
    let mut problems = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Password must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Password must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must contain a digit".to_string());
    }

    PasswordStrength { problems }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_password_has_every_class() {
        for _ in 0..50 {
            let password = generate_password(DEFAULT_PASSWORD_LENGTH);
            assert_eq!(password.len(), DEFAULT_PASSWORD_LENGTH);
            assert!(password.bytes().any(|b| UPPERCASE.contains(&b)));
            assert!(password.bytes().any(|b| LOWERCASE.contains(&b)));
            assert!(password.bytes().any(|b| DIGITS.contains(&b)));
            assert!(password.bytes().any(|b| SYMBOLS.contains(&b)));
            assert!(check_password_strength(&password).is_strong());
        }
    }

    #[test]
    fn test_short_length_still_covers_classes() {
        assert_eq!(generate_password(2).len(), 4);
    }

    #[test]
    fn test_strength_problems() {
        let weak = check_password_strength("abc");
        assert_eq!(weak.problems.len(), 3);
        assert!(!weak.is_strong());

        assert!(check_password_strength("Secret123").is_strong());
        assert_eq!(check_password_strength("SECRET123").problems.len(), 1);
    }
}
