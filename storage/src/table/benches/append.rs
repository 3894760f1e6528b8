use super::{append_random_rows, get_table};
use criterion::{criterion_group, BatchSize, Criterion};

/// Number of rows to append in each benchmark iteration.
const ROWS_TO_WRITE: u64 = 100_000;

fn bench_append(c: &mut Criterion) {
    c.bench_function(
        &format!("{}/rows={}", module_path!(), ROWS_TO_WRITE),
        |b| {
            b.iter_batched(
                get_table,
                |mut table| append_random_rows(&mut table, ROWS_TO_WRITE),
                BatchSize::SmallInput,
            );
        },
    );
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_append
}
