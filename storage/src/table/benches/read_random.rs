use super::{append_random_rows, get_table};
use criterion::{black_box, criterion_group, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Number of rows in the table being read from.
const ROWS_TO_WRITE: u64 = 100_000;

/// Number of rows to read in each benchmark iteration.
const ROWS_TO_READ: u64 = 10_000;

fn bench_read_random(c: &mut Criterion) {
    let mut table = get_table();
    append_random_rows(&mut table, ROWS_TO_WRITE);
    assert_eq!(table.row_count().unwrap(), ROWS_TO_WRITE);

    c.bench_function(
        &format!("{}/rows={} reads={}", module_path!(), ROWS_TO_WRITE, ROWS_TO_READ),
        |b| {
            b.iter_custom(|iters| {
                let mut rng = StdRng::seed_from_u64(0);
                let mut duration = Duration::ZERO;
                for _ in 0..iters {
                    let start = Instant::now();
                    for _ in 0..ROWS_TO_READ {
                        let index = rng.gen_range(0..ROWS_TO_WRITE);
                        black_box(table.read_row(index).expect("failed to read row"));
                    }
                    duration += start.elapsed();
                }
                duration
            });
        },
    );
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_read_random
}
