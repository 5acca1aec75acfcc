//! Device round-trip tests. These need a working OpenCL runtime, so they are
//! ignored by default: `cargo test -- --ignored`.

use svm_bench::workloads::{gemm, hello, vec_add, vec_copy};
use svm_bench::{ClError, Session, Strategy};

fn session() -> Session {
    Session::new(0, 0).expect("no usable OpenCL device")
}

/// SVM runs pass on SVM devices and fail cleanly everywhere else.
fn accept(result: Result<svm_bench::RunReport, ClError>, strategy: Strategy) {
    match result {
        Ok(report) => assert_eq!(report.strategy, strategy),
        Err(ClError::SvmUnsupported) if strategy == Strategy::Svm => {}
        Err(e) => panic!("run failed: {}", e),
    }
}

#[test]
#[ignore]
fn hello_round_trip_both_strategies() {
    let sess = session();
    accept(hello::run(&sess, Strategy::Svm), Strategy::Svm);
    accept(hello::run(&sess, Strategy::Copy), Strategy::Copy);
}

#[test]
#[ignore]
fn gemm_small_both_strategies() {
    let sess = session();
    accept(gemm::run(&sess, Strategy::Svm, 32), Strategy::Svm);
    accept(gemm::run(&sess, Strategy::Copy, 32), Strategy::Copy);
}

#[test]
#[ignore]
fn vec_add_both_strategies() {
    let sess = session();
    accept(vec_add::run(&sess, Strategy::Svm, 1 << 16), Strategy::Svm);
    accept(vec_add::run(&sess, Strategy::Copy, 1 << 16), Strategy::Copy);
}

#[test]
#[ignore]
fn vec_copy_both_strategies() {
    let sess = session();
    accept(vec_copy::run(&sess, Strategy::Svm, 1 << 16), Strategy::Svm);
    accept(vec_copy::run(&sess, Strategy::Copy, 1 << 16), Strategy::Copy);
}

#[test]
#[ignore]
fn zero_size_is_rejected_before_any_allocation() {
    let sess = session();
    assert!(matches!(
        vec_add::run(&sess, Strategy::Copy, 0),
        Err(ClError::InvalidSize(0))
    ));
    assert!(matches!(
        gemm::run(&sess, Strategy::Copy, 0),
        Err(ClError::InvalidSize(0))
    ));
}
