use std::collections::BTreeSet;
use std::env;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rb_tree::{Natural, RbTree, SetOutcome, TreeConfig};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("ignoring unparsable {}={:?}", name, raw);
                default
            }
        },
        Err(_) => default,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ops: usize = env_or("RB_TREE_OPS", 100_000);
    let seed: u64 = env_or("RB_TREE_SEED", 42);
    info!("workload: {} operations, seed {}", ops, seed);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree: RbTree<u32> =
        RbTree::with_config(Natural, TreeConfig::default().with_capacity(ops));
    let mut reference = BTreeSet::new();

    let start = Instant::now();
    let mut rejected = 0usize;
    for _ in 0..ops {
        let key: u32 = rng.gen();
        if tree.add(key).is_err() {
            rejected += 1;
        }
        reference.insert(key);
    }
    info!(
        "added {} keys ({} duplicates rejected) in {:?}; height {}, black-height {}",
        tree.len(),
        rejected,
        start.elapsed(),
        tree.height(),
        tree.black_height()
    );

    let start = Instant::now();
    let mut hits = 0usize;
    for _ in 0..ops {
        let key: u32 = rng.gen();
        if tree.contains(&key) {
            hits += 1;
        }
    }
    info!("{} lookups, {} hits, in {:?}", ops, hits, start.elapsed());

    // Thin out every other element through a cursor.
    let start = Instant::now();
    let mut removed = 0usize;
    {
        let mut cursor = tree.begin_mut();
        while !cursor.is_end() {
            if let Some(key) = cursor.get().copied() {
                if let SetOutcome::Removed(()) = cursor.set(None) {
                    reference.remove(&key);
                    removed += 1;
                }
            }
            if !cursor.is_end() {
                cursor.move_next();
            }
        }
    }
    info!("removed {} elements through a cursor in {:?}", removed, start.elapsed());

    if let Err(e) = tree.audit() {
        error!("tree failed its audit: {}", e);
        process::exit(1);
    }
    if !tree.iter().eq(reference.iter()) {
        error!("tree contents diverged from the reference set");
        process::exit(1);
    }

    let start = Instant::now();
    let remaining: Vec<u32> = tree.iter().copied().collect();
    for key in &remaining {
        tree.remove(key);
    }
    info!(
        "removed the remaining {} elements in {:?}",
        remaining.len(),
        start.elapsed()
    );

    match tree.audit() {
        Ok(_) if tree.is_empty() => info!("done"),
        Ok(_) => {
            error!("{} elements left behind", tree.len());
            process::exit(1);
        }
        Err(e) => {
            error!("tree failed its audit: {}", e);
            process::exit(1);
        }
    }
}
