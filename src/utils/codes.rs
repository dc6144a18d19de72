use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const CONFIRMATION_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates the short public identifiers handed out by the booking flow:
/// confirmation numbers, baggage tracking numbers and boarding-pass QR
/// payloads. Uniqueness is enforced by the storage layer; callers retry an
/// insert with a fresh code on a unique-constraint violation.
pub struct CodeGenerator {
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    pub fn new() -> Self {
        CodeGenerator {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    // Deterministic sequence for tests
    pub fn with_seed(seed: u64) -> Self {
        CodeGenerator {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// 6 characters from [A-Z0-9]
    pub fn confirmation_number(&self) -> String {
        let mut rng = self.rng.lock().expect("code generator rng poisoned");
        (0..6)
            .map(|_| CONFIRMATION_ALPHABET[rng.gen_range(0..CONFIRMATION_ALPHABET.len())] as char)
            .collect()
    }

    /// 3 uppercase letters followed by 6 digits
    pub fn tracking_number(&self) -> String {
        let mut rng = self.rng.lock().expect("code generator rng poisoned");
        let mut code = String::with_capacity(9);
        for _ in 0..3 {
            code.push(LETTERS[rng.gen_range(0..LETTERS.len())] as char);
        }
        for _ in 0..6 {
            code.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        code
    }

    /// Opaque display token embedding the confirmation number. Not
    /// cryptographically verifiable; scanners only echo it back.
    pub fn boarding_qr_payload(&self, confirmation_number: &str) -> String {
        let mut rng = self.rng.lock().expect("code generator rng poisoned");
        let suffix: String = (0..16)
            .map(|_| CONFIRMATION_ALPHABET[rng.gen_range(0..CONFIRMATION_ALPHABET.len())] as char)
            .collect();
        format!("BP1.{}.{}", confirmation_number, suffix)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}
