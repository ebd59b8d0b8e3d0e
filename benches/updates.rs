/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::OsRng;
use rsa_accumulator::{AccParams, Element, RsaAccumulator};

fn elements(count: u64) -> Vec<Element> {
    (1..=count).map(|v| Element::from(v * 1_000)).collect()
}

fn updates_bench(c: &mut Criterion) {
    let config = AccParams::with_prime_bits(512);
    let empty = RsaAccumulator::setup(&config, OsRng).unwrap();
    let batch = elements(64);

    c.bench_function("batch_add_64", |b| {
        b.iter_batched(
            || empty.clone(),
            |acc| acc.add_elements(black_box(&batch)).unwrap(),
            BatchSize::SmallInput,
        )
    });

    let (full, _) = empty.add_elements(&batch).unwrap();
    let member = batch[17].clone();
    c.bench_function("prove_one_of_64", |b| {
        b.iter(|| full.prove_membership(black_box(&member)).unwrap())
    });

    let witness = full.prove_membership(&member).unwrap();
    let nonce = full.nonce(&member).unwrap();
    c.bench_function("verify_one", |b| {
        b.iter(|| witness.verify(full.params(), full.value(), black_box(&member), nonce))
    });
}

criterion_group!(benches, updates_bench);
criterion_main!(benches);
