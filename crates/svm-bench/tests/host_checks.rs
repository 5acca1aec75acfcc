//! Host-side checks that run without an OpenCL runtime.

use svm_bench::workloads::{gemm, hello, vec_add, vec_copy, RunReport, Strategy};
use svm_bench::ClError;

#[test]
fn hello_input_decodes_to_hello_world() {
    let shifted: Vec<u8> = hello::INPUT.iter().map(|b| b + 1).collect();
    assert_eq!(&shifted, hello::EXPECTED);
    assert!(hello::verify(&shifted).is_ok());
}

#[test]
fn hello_verify_reports_first_bad_byte() {
    let mut out = hello::EXPECTED.to_vec();
    out[3] = b'?';
    match hello::verify(&out) {
        Err(ClError::Verify(3)) => {}
        other => panic!("expected Verify(3), got {:?}", other),
    }
}

#[test]
fn gemm_expected_row_matches_naive_multiply() {
    for dim in [1usize, 2, 4, 7, 16] {
        let sz = dim * dim;
        let a: Vec<i32> = (0..sz).map(|i| i as i32).collect();
        let b: Vec<i32> = vec![1; sz];
        let mut c = vec![0i32; sz];
        for row in 0..dim {
            for col in 0..dim {
                let mut acc = 0i32;
                for k in 0..dim {
                    acc = acc.wrapping_add(a[row * dim + k].wrapping_mul(b[k * dim + col]));
                }
                c[row * dim + col] = acc;
            }
        }

        for row in 0..dim {
            assert_eq!(c[row * dim], gemm::expected_row(dim, row), "dim={}", dim);
        }
        assert!(gemm::verify(&c, dim).is_ok(), "dim={}", dim);
    }
}

#[test]
fn gemm_verify_flags_wrong_element() {
    let dim = 4;
    let mut c: Vec<i32> = (0..dim)
        .flat_map(|row| std::iter::repeat(gemm::expected_row(dim, row)).take(dim))
        .collect();
    c[9] += 1;
    match gemm::verify(&c, dim) {
        Err(ClError::Verify(9)) => {}
        other => panic!("expected Verify(9), got {:?}", other),
    }
}

#[test]
fn vec_add_verify_accepts_exact_sum() {
    assert!(vec_add::verify(&[3.0; 128]).is_ok());
}

#[test]
fn vec_add_verify_flags_wrong_element() {
    let mut c = vec![3.0f32; 16];
    c[5] = 2.5;
    match vec_add::verify(&c) {
        Err(ClError::Verify(5)) => {}
        other => panic!("expected Verify(5), got {:?}", other),
    }
}

#[test]
fn hello_verify_rejects_wrong_length_output() {
    // Truncated output fails at the first missing byte.
    match hello::verify(&hello::EXPECTED[..5]) {
        Err(ClError::Verify(5)) => {}
        other => panic!("expected Verify(5), got {:?}", other),
    }

    let mut long = hello::EXPECTED.to_vec();
    long.push(b'!');
    match hello::verify(&long) {
        Err(ClError::Verify(10)) => {}
        other => panic!("expected Verify(10), got {:?}", other),
    }
}

#[test]
fn vec_copy_uses_the_vienna_launch_shape() {
    // 16384 global / 128 local, independent of the vector length.
    assert_eq!(vec_copy::GLOBAL_SIZE, 16384);
    assert_eq!(vec_copy::LOCAL_SIZE, 128);
    assert_eq!(vec_copy::GLOBAL_SIZE % vec_copy::LOCAL_SIZE, 0);
}

#[test]
fn vec_copy_verify_is_elementwise() {
    let input: Vec<f32> = (0..256).map(|i| (i % 64) as f32).collect();
    assert!(vec_copy::verify(&input, &input).is_ok());

    let mut out = input.clone();
    out[17] += 1.0;
    match vec_copy::verify(&out, &input) {
        Err(ClError::Verify(17)) => {}
        other => panic!("expected Verify(17), got {:?}", other),
    }
}

#[test]
fn report_line_names_workload_and_strategy() {
    let report = RunReport {
        workload: "vec_add",
        strategy: Strategy::Svm,
        elements: 1 << 20,
        elapsed: std::time::Duration::from_millis(12),
        kernel_time: None,
    };
    let line = report.to_string();
    assert!(line.contains("vec_add"));
    assert!(line.contains("svm"));
    assert!(line.contains("kernel=n/a"));
}

#[test]
fn strategy_display_names() {
    assert_eq!(Strategy::Svm.to_string(), "svm");
    assert_eq!(Strategy::Copy.to_string(), "copy");
}

#[test]
fn error_display_carries_detail() {
    assert_eq!(
        ClError::Verify(42).to_string(),
        "verification failed at element 42"
    );
    assert!(ClError::Api(-5).to_string().contains("-5"));
}
