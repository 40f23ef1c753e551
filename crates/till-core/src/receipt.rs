//! # Receipt & Barcode Identifiers
//!
//! ## Receipt Id Format
//! ```text
//! RCP-1718035200123-7QX2
//! ─┬─ ──────┬────── ──┬─
//!  │        │         └── 4 chars, [0-9A-Z], random
//!  │        └──────────── epoch milliseconds at checkout
//!  └───────────────────── fixed prefix
//! ```
//!
//! Ids sort roughly by time and are unique in practice within one register.
//! Randomness comes from a v4 UUID so this module stays free of RNG state.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Prefix every receipt id starts with.
pub const RECEIPT_PREFIX: &str = "RCP";

/// Length of the random receipt suffix.
pub const RECEIPT_SUFFIX_LEN: usize = 4;

/// Number of digits in a generated barcode.
pub const BARCODE_LEN: usize = 13;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a fresh receipt id for a sale completed at `now`.
pub fn generate_receipt_id(now: DateTime<Utc>) -> String {
    receipt_id_from_parts(now.timestamp_millis(), Uuid::new_v4().as_u128())
}

/// Builds a receipt id from its parts. Deterministic; used by tests and by
/// `generate_receipt_id`.
pub fn receipt_id_from_parts(epoch_millis: i64, random: u128) -> String {
    let mut suffix = String::with_capacity(RECEIPT_SUFFIX_LEN);
    let mut rest = random;
    for _ in 0..RECEIPT_SUFFIX_LEN {
        suffix.push(BASE36[(rest % 36) as usize] as char);
        rest /= 36;
    }

    format!("{}-{}-{}", RECEIPT_PREFIX, epoch_millis, suffix)
}

/// Checks that a string has the receipt id shape.
pub fn is_receipt_id(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    let (Some(prefix), Some(millis), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == RECEIPT_PREFIX
        && !millis.is_empty()
        && millis.chars().all(|c| c.is_ascii_digit())
        && suffix.len() == RECEIPT_SUFFIX_LEN
        && suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
}

/// Generates a random 13-digit barcode for a new product.
pub fn generate_barcode() -> String {
    barcode_from_random(Uuid::new_v4().as_u128())
}

fn barcode_from_random(random: u128) -> String {
    let mut digits = String::with_capacity(BARCODE_LEN);
    let mut rest = random;
    for _ in 0..BARCODE_LEN {
        digits.push(char::from(b'0' + (rest % 10) as u8));
        rest /= 10;
    }
    digits
}
