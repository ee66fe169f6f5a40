use crate::algorithm::Algorithm;
use crate::error::{EstreamError, Result};
use std::time::{Duration, Instant};

/// Buffer size transformed per iteration
pub const BENCH_BUFFER: usize = 1024;

/// Options for the bench command
#[derive(Debug, Clone)]
pub struct BenchOptions {
    pub algorithms: Vec<Algorithm>,
    /// Number of `BENCH_BUFFER`-sized transforms per algorithm
    pub iterations: usize,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            algorithms: Algorithm::ALL.to_vec(),
            iterations: 16 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BenchResult {
    pub algorithm: Algorithm,
    pub setup: Duration,
    pub elapsed: Duration,
    pub bytes: u64,
}

impl BenchResult {
    pub fn throughput_mb_s(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bytes as f64 / (1024.0 * 1024.0) / secs
    }
}

/// Time setup and in-place transforms over a zero key and IV
pub fn run_bench(options: &BenchOptions) -> Result<Vec<BenchResult>> {
    if options.iterations == 0 {
        return Err(EstreamError::InvalidOption(
            "iterations must be greater than zero".into(),
        ));
    }

    let mut results = Vec::with_capacity(options.algorithms.len());
    for &algorithm in &options.algorithms {
        let key = vec![0u8; algorithm.key_len()];
        let iv = vec![0u8; algorithm.iv_len()];

        let start = Instant::now();
        let mut cipher = algorithm.new_cipher(&key, &iv)?;
        let setup = start.elapsed();

        let mut buf = [0u8; BENCH_BUFFER];
        let start = Instant::now();
        for _ in 0..options.iterations {
            cipher.apply_keystream(&mut buf);
        }
        let elapsed = start.elapsed();

        results.push(BenchResult {
            algorithm,
            setup,
            elapsed,
            bytes: (options.iterations * BENCH_BUFFER) as u64,
        });
    }

    Ok(results)
}

pub fn show_bench(options: &BenchOptions) -> Result<String> {
    let results = run_bench(options)?;

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:>12} {:>12} {:>12} {:>10}\n",
        "cipher", "setup", "data", "elapsed", "MB/s"
    ));
    for result in &results {
        output.push_str(&format!(
            "{:<8} {:>12} {:>12} {:>12} {:>10.1}\n",
            result.algorithm.to_string(),
            format!("{:.1?}", result.setup),
            format_size(result.bytes),
            format!("{:.1?}", result.elapsed),
            result.throughput_mb_s()
        ));
    }
    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bench_counts_bytes() {
        let options = BenchOptions {
            algorithms: vec![Algorithm::Rabbit],
            iterations: 4,
        };
        let results = run_bench(&options).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].bytes, 4096);
        assert_eq!(results[0].algorithm, Algorithm::Rabbit);
    }

    #[test]
    fn test_show_bench_lists_every_algorithm() {
        let options = BenchOptions {
            iterations: 2,
            ..Default::default()
        };
        let table = show_bench(&options).unwrap();
        assert!(table.contains("hc128"));
        assert!(table.contains("hc256"));
        assert!(table.contains("rabbit"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let options = BenchOptions {
            iterations: 0,
            ..Default::default()
        };
        assert!(matches!(run_bench(&options), Err(EstreamError::InvalidOption(_))));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(16 * 1024 * 1024), "16.0 MB");
    }
}
