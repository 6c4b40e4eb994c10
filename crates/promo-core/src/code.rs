//! Promo-code generation.
//!
//! Codes are short, human-typeable, and drawn from an alphabet without the
//! usual look-alikes (no `0`/`O`, `1`/`I`/`L`). Eight characters over a
//! 31-symbol alphabet give ~2^39 possibilities — a vanishing collision
//! probability at this service's scale. The store's UNIQUE constraint on
//! `code` remains the source of truth for absolute uniqueness.

use rand_core::{OsRng, RngCore};

/// Characters a generated code may contain.
pub const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of every generated code.
pub const CODE_LEN: usize = 8;

/// Generate a fresh promo code from OS randomness.
pub fn generate() -> String {
  let mut bytes = [0u8; CODE_LEN];
  OsRng.fill_bytes(&mut bytes);
  bytes
    .iter()
    .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
    .collect()
}
