// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password generator with character-class constraints.
//!
//! 1. Build a pool per enabled class, minus similar and excluded characters.
//! 2. Optionally draw one character from each enabled class.
//! 3. Fill the remaining length from the union of the pools.
//! 4. Fisher-Yates shuffle.
//! 5. Retry if the result is on the weak-password denylist.
//!
//! Randomness comes from a CSPRNG (`OsRng` by default).

use coffer_config::model::GeneratorConfig;
use coffer_core::CofferError;
use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::{CryptoRng, Rng, RngCore};

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Characters that are easy to confuse when read or typed.
pub const SIMILAR: &str = "il1O0";

/// Results that are rejected and regenerated.
pub const DENYLIST: &[&str] = &["123456", "password", "qwerty", "admin123"];

const MAX_ATTEMPTS: usize = 32;

/// Options controlling one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_similar: bool,
    /// Extra characters never to emit.
    pub exclude: String,
    /// Guarantee at least one character from each enabled class.
    pub require_each_class: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            exclude_similar: true,
            exclude: String::new(),
            require_each_class: true,
        }
    }
}

impl From<&GeneratorConfig> for GeneratorOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            length: config.length,
            lowercase: config.lowercase,
            uppercase: config.uppercase,
            digits: config.digits,
            symbols: config.symbols,
            exclude_similar: config.exclude_similar,
            exclude: config.exclude.clone(),
            require_each_class: config.require_each_class,
        }
    }
}

impl GeneratorOptions {
    /// The enabled classes as `(name, full character set)`.
    fn enabled_classes(&self) -> Vec<(&'static str, &'static str)> {
        [
            (self.lowercase, ("lowercase", LOWERCASE)),
            (self.uppercase, ("uppercase", UPPERCASE)),
            (self.digits, ("digits", DIGITS)),
            (self.symbols, ("symbols", SYMBOLS)),
        ]
        .into_iter()
        .filter_map(|(on, class)| on.then_some(class))
        .collect()
    }

    /// Whether `c` survives the similar-character and exclusion filters.
    fn allows(&self, c: char) -> bool {
        !(self.exclude_similar && SIMILAR.contains(c)) && !self.exclude.contains(c)
    }

    /// Filtered pools, one per enabled class.
    fn class_pools(&self) -> Result<Vec<Vec<char>>, CofferError> {
        let classes = self.enabled_classes();
        if classes.is_empty() {
            return Err(CofferError::Generator(
                "at least one character class must be enabled".to_string(),
            ));
        }

        classes
            .into_iter()
            .map(|(name, set)| {
                let pool: Vec<char> = set.chars().filter(|&c| self.allows(c)).collect();
                if pool.is_empty() {
                    Err(CofferError::Generator(format!(
                        "every {name} character is excluded"
                    )))
                } else {
                    Ok(pool)
                }
            })
            .collect()
    }
}

/// Generate a password with the OS CSPRNG.
pub fn generate(options: &GeneratorOptions) -> Result<String, CofferError> {
    generate_with(options, &mut OsRng)
}

/// Generate a password with a caller-supplied CSPRNG.
pub fn generate_with<R>(options: &GeneratorOptions, rng: &mut R) -> Result<String, CofferError>
where
    R: RngCore + CryptoRng,
{
    generate_avoiding(options, rng, DENYLIST)
}

fn generate_avoiding<R>(
    options: &GeneratorOptions,
    rng: &mut R,
    denied: &[&str],
) -> Result<String, CofferError>
where
    R: RngCore + CryptoRng,
{
    let pools = class_pools_checked(options)?;
    let union: Vec<char> = pools.iter().flatten().copied().collect();

    for _ in 0..MAX_ATTEMPTS {
        let candidate = draw(options, &pools, &union, rng);
        if !matches_any(denied, &candidate) {
            return Ok(candidate);
        }
    }

    Err(CofferError::Generator(format!(
        "no acceptable password after {MAX_ATTEMPTS} attempts"
    )))
}

fn class_pools_checked(options: &GeneratorOptions) -> Result<Vec<Vec<char>>, CofferError> {
    let pools = options.class_pools()?;
    let required = if options.require_each_class { pools.len() } else { 0 };
    if options.length == 0 || options.length < required {
        return Err(CofferError::Generator(format!(
            "length {} is too short; at least {} characters are needed",
            options.length,
            required.max(1)
        )));
    }
    Ok(pools)
}

fn draw<R: Rng>(
    options: &GeneratorOptions,
    pools: &[Vec<char>],
    union: &[char],
    rng: &mut R,
) -> String {
    let mut chars = Vec::with_capacity(options.length);
    if options.require_each_class {
        chars.extend(pools.iter().map(|pool| pool[rng.gen_range(0..pool.len())]));
    }
    while chars.len() < options.length {
        chars.push(union[rng.gen_range(0..union.len())]);
    }
    // SliceRandom::shuffle is a Fisher-Yates shuffle.
    chars.shuffle(rng);
    chars.into_iter().collect()
}

/// Whether `candidate` is on the weak-password denylist (case-insensitive).
pub fn is_denylisted(candidate: &str) -> bool {
    matches_any(DENYLIST, candidate)
}

fn matches_any(list: &[&str], candidate: &str) -> bool {
    list.iter().any(|weak| weak.eq_ignore_ascii_case(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_satisfies(password: &str, options: &GeneratorOptions) {
        assert_eq!(password.chars().count(), options.length);
        let classes = [
            (options.lowercase, LOWERCASE),
            (options.uppercase, UPPERCASE),
            (options.digits, DIGITS),
            (options.symbols, SYMBOLS),
        ];
        for c in password.chars() {
            assert!(
                classes.iter().any(|(on, set)| *on && set.contains(c)),
                "{c:?} is not from an enabled class"
            );
            assert!(options.allows(c), "{c:?} should have been excluded");
        }
        if options.require_each_class {
            for (on, set) in classes {
                if on {
                    assert!(password.chars().any(|c| set.contains(c)), "missing class {set}");
                }
            }
        }
    }

    #[test]
    fn default_options_satisfy_every_class() {
        let options = GeneratorOptions::default();
        for _ in 0..50 {
            let pw = generate(&options).unwrap();
            assert_satisfies(&pw, &options);
        }
    }

    #[test]
    fn similar_characters_are_never_emitted() {
        let options = GeneratorOptions {
            length: 64,
            ..Default::default()
        };
        for _ in 0..20 {
            let pw = generate(&options).unwrap();
            assert!(!pw.chars().any(|c| SIMILAR.contains(c)));
        }
    }

    #[test]
    fn user_exclusions_are_respected() {
        let options = GeneratorOptions {
            length: 40,
            exclude: "abcXYZ!@#".to_string(),
            ..Default::default()
        };
        let pw = generate(&options).unwrap();
        assert!(!pw.chars().any(|c| "abcXYZ!@#".contains(c)));
    }

    #[test]
    fn single_class_digits_only() {
        let options = GeneratorOptions {
            length: 12,
            lowercase: false,
            uppercase: false,
            symbols: false,
            exclude_similar: false,
            ..Default::default()
        };
        let pw = generate(&options).unwrap();
        assert!(pw.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn no_classes_is_an_error() {
        let options = GeneratorOptions {
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
            ..Default::default()
        };
        assert!(matches!(generate(&options), Err(CofferError::Generator(_))));
    }

    #[test]
    fn fully_excluded_class_is_an_error() {
        let options = GeneratorOptions {
            digits: true,
            exclude: DIGITS.to_string(),
            ..Default::default()
        };
        let err = generate(&options).unwrap_err();
        assert!(err.to_string().contains("digits"));
    }

    #[test]
    fn length_shorter_than_required_classes_is_an_error() {
        let options = GeneratorOptions {
            length: 3,
            ..Default::default()
        };
        assert!(generate(&options).is_err());

        let relaxed = GeneratorOptions {
            length: 3,
            require_each_class: false,
            ..Default::default()
        };
        assert_eq!(generate(&relaxed).unwrap().len(), 3);
    }

    #[test]
    fn zero_length_is_an_error() {
        let options = GeneratorOptions {
            length: 0,
            require_each_class: false,
            ..Default::default()
        };
        assert!(generate(&options).is_err());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let options = GeneratorOptions::default();
        let a = generate_with(&options, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_with(&options, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn denylist_is_case_insensitive() {
        assert!(is_denylisted("Password"));
        assert!(is_denylisted("admin123"));
        assert!(!is_denylisted("admin1234"));
    }

    #[test]
    fn denylisted_pool_never_escapes() {
        // Only "qwerty" can be produced: 6 letters from a 6-letter pool in
        // some order. Any permutation other than "qwerty" is accepted.
        let options = GeneratorOptions {
            length: 6,
            uppercase: false,
            digits: false,
            symbols: false,
            exclude_similar: false,
            exclude: LOWERCASE.chars().filter(|c| !"qwerty".contains(*c)).collect(),
            require_each_class: false,
            ..Default::default()
        };
        for seed in 0..50 {
            let pw = generate_with(&options, &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_ne!(pw, "qwerty");
        }
    }

    #[test]
    fn exhausted_attempts_report_generator_error() {
        // A one-letter pool can only ever produce "aaaa".
        let options = GeneratorOptions {
            length: 4,
            uppercase: false,
            digits: false,
            symbols: false,
            exclude_similar: false,
            exclude: LOWERCASE.chars().filter(|c| *c != 'a').collect(),
            require_each_class: false,
            ..Default::default()
        };
        let err = generate_avoiding(&options, &mut StdRng::seed_from_u64(1), &["AAAA"]).unwrap_err();
        match err {
            CofferError::Generator(msg) => assert!(msg.contains(&MAX_ATTEMPTS.to_string())),
            other => panic!("unexpected error: {other:?}"),
        }

        // The same pool is fine once nothing it can produce is denied.
        assert_eq!(generate_avoiding(&options, &mut StdRng::seed_from_u64(1), &[]).unwrap(), "aaaa");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn generated_password_satisfies_options(
                length in 4usize..80,
                lowercase in any::<bool>(),
                uppercase in any::<bool>(),
                digits in any::<bool>(),
                symbols in any::<bool>(),
                exclude_similar in any::<bool>(),
                seed in any::<u64>(),
            ) {
                prop_assume!(lowercase || uppercase || digits || symbols);
                let options = GeneratorOptions {
                    length,
                    lowercase,
                    uppercase,
                    digits,
                    symbols,
                    exclude_similar,
                    exclude: String::new(),
                    require_each_class: true,
                };
                let pw = generate_with(&options, &mut StdRng::seed_from_u64(seed)).unwrap();
                assert_satisfies(&pw, &options);
            }
        }
    }
}
