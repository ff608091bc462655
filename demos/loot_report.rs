//! Loot-table diagnostics: estimated vs. observed rarity at different luck.
//!
//! At luck 1 with a single attempt the sampled column tracks the estimated
//! one; raising luck and retries shifts mass toward the rare rows.

use kismet::{LootPool, DEFAULT_LUCK, DEFAULT_RETRIES};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut pool = LootPool::new();
    pool.insert("rusty sword", 50.0)?;
    pool.insert("buckler", 30.0)?;
    pool.insert("war horn", 12.0)?;
    pool.insert("frost blade", 6.5)?;
    pool.insert("dragon sigil", 1.5)?;

    let mut out = std::io::stdout();

    println!("luck 1, single attempt:");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    pool.sample_report_with_rng(
        10_000,
        DEFAULT_LUCK,
        DEFAULT_RETRIES,
        |item| item.to_string(),
        &mut out,
        &mut rng,
    )?;

    println!();
    println!("luck 8, best of 5 attempts:");
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    pool.sample_report_with_rng(10_000, 8.0, 5, |item| item.to_string(), &mut out, &mut rng)?;

    Ok(())
}
