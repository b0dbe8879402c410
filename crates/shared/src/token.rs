//! One-time confirmation token generation.

use rand::Rng;

/// Length of a confirmation token in characters.
pub const TOKEN_LEN: usize = 32;

/// Alphabet for confirmation tokens. 62 symbols at 32 positions gives
/// ~190 bits of entropy, far beyond guessability.
const TOKEN_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random confirmation token.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARS.len());
            TOKEN_CHARS[idx] as char
        })
        .collect()
}

/// Cheap shape check for inbound tokens before hitting the database.
pub fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.bytes().all(|b| b.is_ascii_alphanumeric()));
        assert!(is_well_formed(&token));
    }

    #[test]
    fn test_generate_token_uniqueness() {
        let tokens: Vec<String> = (0..100).map(|_| generate_token()).collect();
        let unique: std::collections::HashSet<_> = tokens.iter().collect();
        // With 62^32 possible tokens a collision here would indicate a broken RNG
        assert_eq!(unique.len(), 100);
    }

    #[test]
    fn test_is_well_formed_rejects_bad_shapes() {
        assert!(!is_well_formed(""));
        assert!(!is_well_formed("short"));
        assert!(!is_well_formed(&"a".repeat(TOKEN_LEN + 1)));
        assert!(!is_well_formed(&format!("{}!", "a".repeat(TOKEN_LEN - 1))));
    }
}
