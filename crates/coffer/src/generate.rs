// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `coffer generate` command implementation.

use clap::Args;
use coffer_config::CofferConfig;
use coffer_config::model::GeneratorConfig;
use coffer_core::CofferError;
use coffer_vault::generator::{self, GeneratorOptions};
use coffer_vault::strength;

/// Flags override the `[generator]` section of the configuration.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    #[arg(long)]
    pub length: Option<usize>,
    #[arg(long)]
    pub no_lower: bool,
    #[arg(long)]
    pub no_upper: bool,
    #[arg(long)]
    pub no_digits: bool,
    #[arg(long)]
    pub no_symbols: bool,
    /// Allow easily confused characters (i, l, 1, O, 0).
    #[arg(long)]
    pub allow_similar: bool,
    /// Characters never to use.
    #[arg(long)]
    pub exclude: Option<String>,
    /// How many passwords to print.
    #[arg(long, default_value_t = 1)]
    pub count: usize,
}

impl GenerateArgs {
    pub fn options(&self, config: &GeneratorConfig) -> GeneratorOptions {
        let mut options = GeneratorOptions::from(config);
        if let Some(length) = self.length {
            options.length = length;
        }
        options.lowercase &= !self.no_lower;
        options.uppercase &= !self.no_upper;
        options.digits &= !self.no_digits;
        options.symbols &= !self.no_symbols;
        options.exclude_similar &= !self.allow_similar;
        if let Some(exclude) = &self.exclude {
            options.exclude = exclude.clone();
        }
        options
    }
}

/// Run `coffer generate`: passwords on stdout, strength on stderr.
pub fn run_generate(config: &CofferConfig, args: &GenerateArgs) -> Result<(), CofferError> {
    let options = args.options(&config.generator);
    for _ in 0..args.count.max(1) {
        let password = generator::generate(&options)?;
        let report = strength::estimate(&password);
        println!("{password}");
        eprintln!(
            "strength: {}/4 (~{:.0} bits)",
            report.score, report.entropy_bits
        );
    }
    Ok(())
}
