// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use criterion::{criterion_group, criterion_main};


criterion_group!(benches, atomic_cell_bench::bench_atomic_cell);
criterion_main!(benches);
