//! 1D buffer round-trip under both memory strategies.

use svm_bench::workloads::hello;
use svm_bench::{ClError, Session, Strategy};

fn main() -> Result<(), ClError> {
    let session = Session::new(0, 0)?;
    println!("device: {}\n", session.device_name());

    println!("SVM\n------------------------------");
    match hello::run(&session, Strategy::Svm) {
        Ok(report) => println!("{}", report),
        Err(ClError::SvmUnsupported) => println!("(device has no SVM support)"),
        Err(e) => return Err(e),
    }

    println!("\nNon-SVM\n------------------------------");
    let report = hello::run(&session, Strategy::Copy)?;
    println!("{}", report);

    println!(
        "\ninput:   {}\ndecoded: {}",
        String::from_utf8_lossy(hello::INPUT),
        String::from_utf8_lossy(hello::EXPECTED)
    );
    Ok(())
}
