//! Random credential generation.

use rand::Rng;

/// Produces opaque credentials for newly registered accounts.
pub trait SecretGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Alphanumerics without the lookalikes 0/O, 1/l/I. Generated
/// credentials end up typed from a notification, so readability counts.
const READABLE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

/// Generates fixed-length readable keys.
pub struct RandomSecretGenerator {
    length: usize,
}

impl RandomSecretGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomSecretGenerator {
    fn default() -> Self {
        Self::new(32)
    }
}

impl SecretGenerator for RandomSecretGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| READABLE_CHARSET[rng.gen_range(0..READABLE_CHARSET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let generator = RandomSecretGenerator::default();
        assert_eq!(generator.generate().len(), 32);
        assert_eq!(RandomSecretGenerator::new(12).generate().len(), 12);
    }

    #[test]
    fn uses_only_readable_characters() {
        let secret = RandomSecretGenerator::default().generate();
        assert!(secret.bytes().all(|b| READABLE_CHARSET.contains(&b)));
    }

    #[test]
    fn successive_secrets_differ() {
        let generator = RandomSecretGenerator::default();
        assert_ne!(generator.generate(), generator.generate());
    }
}
