#![cfg(feature = "memtrace")]

//! Transfer timeline tracing.
//!
//! Every transfer, SVM map/unmap and kernel dispatch gets a [`PhaseToken`];
//! `flush_csv()` writes the collected timeline to `memtrace.csv` with the
//! idle gap before each phase, which is what shows whether the SVM path
//! actually saves copy time or just moves it into the map calls.

use once_cell::sync::Lazy;
use std::{fs::File, io::Write, sync::Mutex, time::Instant};

#[derive(Clone, Copy)]
pub enum Phase {
    H2D,
    D2H,
    Map,
    Unmap,
    Kernel,
}

impl Phase {
    fn as_str(self) -> &'static str {
        match self {
            Phase::H2D => "H2D",
            Phase::D2H => "D2H",
            Phase::Map => "Map",
            Phase::Unmap => "Unmap",
            Phase::Kernel => "Kernel",
        }
    }
}

/// Zero point of the timeline, fixed at the first `start()`.
static T0: Lazy<Instant> = Lazy::new(Instant::now);

/// (start_us, end_us, bytes, phase, idle_us)
static LOG: Lazy<Mutex<Vec<(u128, u128, usize, &'static str, u128)>>> =
    Lazy::new(|| Mutex::new(Vec::new()));

pub struct PhaseToken {
    start: Instant,
    bytes: usize,
    phase: Phase,
}

pub fn start(phase: Phase, bytes: usize) -> PhaseToken {
    Lazy::force(&T0);
    PhaseToken {
        start: Instant::now(),
        bytes,
        phase,
    }
}

impl PhaseToken {
    pub fn finish(self) {
        let t0 = *T0;
        let s = self.start.duration_since(t0).as_micros();
        let e = Instant::now().duration_since(t0).as_micros();

        let mut log = LOG.lock().unwrap();
        let prev_end = log.last().map(|entry| entry.1).unwrap_or(0);
        let idle = s.saturating_sub(prev_end);

        log.push((s, e, self.bytes, self.phase.as_str(), idle));
    }
}

/// Writes the timeline to `memtrace.csv`, once at program end.
pub fn flush_csv() -> std::io::Result<()> {
    let mut f = File::create("memtrace.csv")?;
    writeln!(f, "t_start_us,t_end_us,bytes,phase,idle_us")?;
    for (s, e, b, p, idle) in LOG.lock().unwrap().iter() {
        writeln!(f, "{},{},{},{},{}", s, e, b, p, idle)?;
    }
    Ok(())
}
