//! Random identifiers handed to users: invite codes, share tokens, upload names.

use rand::Rng;

pub const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub fn random_string(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_string_uses_charset() {
        let s = random_string(UPPER_ALNUM, 8);
        assert_eq!(s.len(), 8);
        assert!(s.bytes().all(|b| UPPER_ALNUM.contains(&b)));
        assert_ne!(random_string(LOWER_ALNUM, 26), random_string(LOWER_ALNUM, 26));
    }
}
