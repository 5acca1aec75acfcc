use criterion::{criterion_group, criterion_main, Criterion};
use svm_bench::workloads::vec_add;
use svm_bench::{Session, Strategy};

fn bench_vec_add(c: &mut Criterion) {
    let session = Session::new(0, 0).expect("no usable OpenCL device");
    let n = 1 << 18; // 1 MiB per vector

    let mut group = c.benchmark_group("vec_add");
    if session.svm_supported() {
        group.bench_function("svm", |b| {
            b.iter(|| vec_add::run(&session, Strategy::Svm, n).unwrap());
        });
    }
    group.bench_function("copy", |b| {
        b.iter(|| vec_add::run(&session, Strategy::Copy, n).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_vec_add);
criterion_main!(benches);
