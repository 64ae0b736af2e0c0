//! Secret key generation

use rand::Rng;

pub const SECRET_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*(-_=+)";
pub const SECRET_LENGTH: usize = 50;

/// 50 characters drawn from the OS-seeded thread CSPRNG
pub fn generate_secret_key() -> String {
    generate_secret_key_with(&mut rand::rng())
}

pub fn generate_secret_key_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SECRET_LENGTH)
        .map(|_| SECRET_ALPHABET[rng.random_range(0..SECRET_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_secret_length_and_alphabet() {
        let key = generate_secret_key();
        assert_eq!(key.len(), SECRET_LENGTH);
        assert!(key.bytes().all(|b| SECRET_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate_secret_key(), generate_secret_key());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_secret_key_with(&mut StdRng::seed_from_u64(7));
        let b = generate_secret_key_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
