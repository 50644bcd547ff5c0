//! Random style identifiers.
//!
//! Ids are short lowercase base-36 strings (e.g. `k3x9q0a7m`), safe to use as
//! file names and URL path segments.

use rand::RngExt;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const STYLE_ID_LEN: usize = 9;

/// Generate a fresh random style id.
pub fn generate_style_id() -> String {
    let mut rng = rand::rng();
    (0..STYLE_ID_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_base36_and_fixed_length() {
        for _ in 0..50 {
            let id = generate_style_id();
            assert_eq!(id.len(), STYLE_ID_LEN);
            assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }
}
