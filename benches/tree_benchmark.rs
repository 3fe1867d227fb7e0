use btree_index::{BPlusTree, FilteredBTree, TreeConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

const SIZE: u64 = 10_000;

fn shuffled_keys() -> Vec<u64> {
    let mut keys: Vec<u64> = (0..SIZE).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(7));
    keys
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    let keys = shuffled_keys();

    for t in [2usize, 8, 32] {
        group.bench_function(format!("FilteredBTree t={}", t), |b| {
            b.iter(|| {
                let mut tree = FilteredBTree::new(TreeConfig::with_degree(t));
                for k in &keys {
                    tree.insert(black_box(*k));
                }
                tree
            })
        });

        group.bench_function(format!("BPlusTree t={}", t), |b| {
            b.iter(|| {
                let mut tree = BPlusTree::new(TreeConfig::with_degree(t));
                for k in &keys {
                    tree.insert(black_box(*k));
                }
                tree
            })
        });
    }

    group.bench_function("std::BTreeSet", |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for k in &keys {
                set.insert(black_box(*k));
            }
            set
        })
    });

    group.finish();
}

fn search_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let keys = shuffled_keys();

    let mut filtered = FilteredBTree::new(TreeConfig::with_degree(8).filter(16_384, 3));
    let mut plain = BPlusTree::new(TreeConfig::with_degree(8));
    for k in &keys {
        filtered.insert(*k);
        plain.insert(*k);
    }

    // Half hits, half misses
    let probes: Vec<u64> = (SIZE / 2..SIZE + SIZE / 2).collect();

    group.bench_function("FilteredBTree", |b| {
        b.iter(|| probes.iter().filter(|k| filtered.search(black_box(k))).count())
    });
    group.bench_function("BPlusTree", |b| {
        b.iter(|| probes.iter().filter(|k| plain.search(black_box(k))).count())
    });

    group.finish();
}

fn delete_benchmark(c: &mut Criterion) {
    let keys = shuffled_keys();

    c.bench_function("BPlusTree delete all", |b| {
        b.iter_batched(
            || {
                let mut tree = BPlusTree::new(TreeConfig::with_degree(8));
                for k in &keys {
                    tree.insert(*k);
                }
                tree
            },
            |mut tree| {
                for k in &keys {
                    tree.delete(black_box(k));
                }
                tree
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, insert_benchmark, search_benchmark, delete_benchmark);
criterion_main!(benches);
