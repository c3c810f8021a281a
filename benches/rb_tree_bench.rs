use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rb_tree::RbTree;

fn random_keys(n: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    (0..n).map(|_| rng.gen()).collect()
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for n in [1_000usize, 10_000, 100_000] {
        let keys = random_keys(n);
        group.bench_with_input(BenchmarkId::new("rb_tree", n), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = RbTree::new();
                for &k in keys {
                    let _ = tree.add(k);
                }
                black_box(tree.len())
            })
        });
        group.bench_with_input(BenchmarkId::new("std_btreeset", n), &keys, |b, keys| {
            b.iter(|| {
                let mut set = BTreeSet::new();
                for &k in keys {
                    set.insert(k);
                }
                black_box(set.len())
            })
        });
    }
    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let keys = random_keys(100_000);
    let tree: RbTree<u32> = keys.iter().copied().collect();
    c.bench_function("find/rb_tree/100000", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for k in keys.iter().step_by(7) {
                if tree.contains(k) {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_add_remove(c: &mut Criterion) {
    let keys = random_keys(10_000);
    c.bench_function("add_remove/rb_tree/10000", |b| {
        b.iter(|| {
            let mut tree = RbTree::new();
            for &k in &keys {
                let _ = tree.add(k);
            }
            for k in keys.iter().rev() {
                tree.remove(k);
            }
            black_box(tree.is_empty())
        })
    });
}

criterion_group!(benches, bench_add, bench_find, bench_add_remove);
criterion_main!(benches);
