//! Float vector add under both memory strategies.

use svm_bench::workloads::vec_add;
use svm_bench::{ClError, Session, Strategy};

fn main() -> Result<(), ClError> {
    let session = Session::new(0, 0)?;
    println!("device: {}\n", session.device_name());

    let n = vec_add::DEFAULT_N;

    println!("SVM\n------------------------------");
    match vec_add::run(&session, Strategy::Svm, n) {
        Ok(report) => println!("{}", report),
        Err(ClError::SvmUnsupported) => println!("(device has no SVM support)"),
        Err(e) => return Err(e),
    }

    println!("\nNon-SVM\n------------------------------");
    let report = vec_add::run(&session, Strategy::Copy, n)?;
    println!("{}", report);
    Ok(())
}
