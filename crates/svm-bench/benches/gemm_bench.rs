use criterion::{criterion_group, criterion_main, Criterion};
use svm_bench::workloads::gemm;
use svm_bench::{Session, Strategy};

fn bench_gemm(c: &mut Criterion) {
    let session = Session::new(0, 0).expect("no usable OpenCL device");
    let dim = 128;

    let mut group = c.benchmark_group("gemm");
    group.sample_size(10);
    if session.svm_supported() {
        group.bench_function("svm", |b| {
            b.iter(|| gemm::run(&session, Strategy::Svm, dim).unwrap());
        });
    }
    group.bench_function("copy", |b| {
        b.iter(|| gemm::run(&session, Strategy::Copy, dim).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_gemm);
criterion_main!(benches);
