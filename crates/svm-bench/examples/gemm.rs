//! Integer GEMM under both memory strategies.

use svm_bench::workloads::gemm;
use svm_bench::{ClError, Session, Strategy};

fn main() -> Result<(), ClError> {
    let session = Session::new(0, 0)?;
    println!("device: {}\n", session.device_name());

    let dim = gemm::DEFAULT_DIM;

    println!("SVM\n------------------------------");
    match gemm::run(&session, Strategy::Svm, dim) {
        Ok(report) => println!("{}", report),
        Err(ClError::SvmUnsupported) => println!("(device has no SVM support)"),
        Err(e) => return Err(e),
    }

    println!("\nNon-SVM\n------------------------------");
    let report = gemm::run(&session, Strategy::Copy, dim)?;
    println!("{}", report);
    Ok(())
}
