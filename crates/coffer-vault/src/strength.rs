// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength estimation.
//!
//! Entropy is approximated as `length * log2(pool)`, where the pool is the
//! combined size of every character class that appears in the password.
//! Common passwords, runs of one character and ascending sequences reduce
//! the estimate.

use serde::Serialize;

use crate::generator::is_denylisted;

const LOWER_POOL: f64 = 26.0;
const UPPER_POOL: f64 = 26.0;
const DIGIT_POOL: f64 = 10.0;
const SYMBOL_POOL: f64 = 33.0;

/// Bits credited to a denylisted password regardless of its length.
const COMMON_PASSWORD_BITS: f64 = 4.0;

/// Minimum run length that counts as a repeat or a sequence.
const PATTERN_RUN: usize = 3;

/// Result of [`estimate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthReport {
    /// 0 (very weak) to 4 (very strong).
    pub score: u8,
    pub entropy_bits: f64,
    pub warnings: Vec<String>,
}

/// Estimate the strength of `password`.
pub fn estimate(password: &str) -> StrengthReport {
    let chars: Vec<char> = password.chars().collect();
    let mut warnings = Vec::new();

    if chars.is_empty() {
        return StrengthReport {
            score: 0,
            entropy_bits: 0.0,
            warnings: vec!["password is empty".to_string()],
        };
    }

    let pool = pool_size(&chars);
    let per_char = pool.log2();

    // Characters that belong to a repeat or sequence run contribute a single
    // bit each instead of a full draw from the pool.
    let patterned = patterned_chars(&chars);
    let free = chars.len() - patterned;
    let mut bits = free as f64 * per_char + patterned as f64;

    if has_run(&chars, |a, b| a == b) {
        warnings.push("contains repeated characters".to_string());
    }
    if has_run(&chars, is_successor) {
        warnings.push("contains a sequence such as abc or 123".to_string());
    }
    if is_denylisted(password) {
        warnings.push("is a very common password".to_string());
        bits = bits.min(COMMON_PASSWORD_BITS);
    }

    StrengthReport {
        score: score_for_bits(bits),
        entropy_bits: bits,
        warnings,
    }
}

/// Shorthand for `estimate(password).score`.
pub fn score(password: &str) -> u8 {
    estimate(password).score
}

/// Bucket an entropy estimate into a 0..=4 score.
pub fn score_for_bits(bits: f64) -> u8 {
    match bits {
        b if b < 28.0 => 0,
        b if b < 36.0 => 1,
        b if b < 60.0 => 2,
        b if b < 80.0 => 3,
        _ => 4,
    }
}

fn pool_size(chars: &[char]) -> f64 {
    let mut pool = 0.0;
    if chars.iter().any(char::is_ascii_lowercase) {
        pool += LOWER_POOL;
    }
    if chars.iter().any(char::is_ascii_uppercase) {
        pool += UPPER_POOL;
    }
    if chars.iter().any(char::is_ascii_digit) {
        pool += DIGIT_POOL;
    }
    if chars.iter().any(|c| !c.is_ascii_alphanumeric()) {
        pool += SYMBOL_POOL;
    }
    // A single distinct class of one character still carries no entropy.
    f64::max(pool, 1.0)
}

fn is_successor(a: char, b: char) -> bool {
    a.is_ascii_alphanumeric() && (a as u32) + 1 == b as u32
}

/// Whether some run of `PATTERN_RUN` chars is linked pairwise by `linked`.
fn has_run(chars: &[char], linked: impl Fn(char, char) -> bool) -> bool {
    chars
        .windows(PATTERN_RUN)
        .any(|w| w.windows(2).all(|p| linked(p[0], p[1])))
}

/// Count characters after the first in each repeat or sequence run.
fn patterned_chars(chars: &[char]) -> usize {
    let mut count = 0;
    let mut run = 1;
    for pair in chars.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a == b || is_successor(a, b) {
            run += 1;
            if run == PATTERN_RUN {
                count += PATTERN_RUN - 1;
            } else if run > PATTERN_RUN {
                count += 1;
            }
        } else {
            run = 1;
        }
    }
    count
}
