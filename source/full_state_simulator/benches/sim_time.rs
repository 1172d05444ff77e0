// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use criterion::{criterion_group, criterion_main, Criterion};
use full_state_simulator::{
    Axis, CircuitFactory, Gate, StatevectorConfiguration, UnitaryConfiguration,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const SEED: u64 = 1000;
const NUM_QUBITS: usize = 8;

fn random_gate(rng: &mut StdRng) -> Gate {
    let target = rng.gen_range(0..NUM_QUBITS);
    let other = (target + 1 + rng.gen_range(0..NUM_QUBITS - 1)) % NUM_QUBITS;
    match rng.gen_range(0..5) {
        0 => Gate::not(target),
        1 => Gate::hadamard(target),
        2 => Gate::rotation(Axis::Y, rng.gen_range(-3.0..3.0), target),
        3 => Gate::controlled_not(target, other),
        4 => Gate::controlled(Gate::hadamard(target), vec![other]),
        _ => unreachable!(),
    }
}

fn random_gates(num_gates: usize) -> Vec<Gate> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..num_gates).map(|_| random_gate(&mut rng)).collect()
}

fn bench_strategy(c: &mut Criterion, name: &str, configuration: StatevectorConfiguration) {
    const NUM_GATES: usize = 50;
    let factory = CircuitFactory::new(
        UnitaryConfiguration::matrix(1).expect("workers are valid"),
        configuration,
    );
    let circuit = factory.circuit(random_gates(NUM_GATES));
    c.bench_function(name, |b| {
        b.iter(|| black_box(circuit.statevector().expect("circuit should run")));
    });
}

fn sim_full_matrix(c: &mut Criterion) {
    bench_strategy(
        c,
        "full-matrix, 50 gates",
        StatevectorConfiguration::matrix(4).expect("workers are valid"),
    );
}

fn sim_row_by_row(c: &mut Criterion) {
    bench_strategy(
        c,
        "row-by-row, 50 gates",
        StatevectorConfiguration::row(4, 1).expect("workers are valid"),
    );
}

fn sim_element_wise(c: &mut Criterion) {
    bench_strategy(
        c,
        "element-by-element, 50 gates",
        StatevectorConfiguration::value(4).expect("workers are valid"),
    );
}

fn sim_direct(c: &mut Criterion) {
    bench_strategy(
        c,
        "direct, 50 gates",
        StatevectorConfiguration::direct(4).expect("workers are valid"),
    );
}

criterion_group!(
    benches,
    sim_full_matrix,
    sim_row_by_row,
    sim_element_wise,
    sim_direct
);
criterion_main!(benches);
