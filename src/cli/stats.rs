use crate::cli::keystream::{generate_keystream, KeystreamOptions};
use crate::error::Result;

/// Summary statistics over a run of keystream bytes
#[derive(Debug, Clone)]
pub struct KeystreamStats {
    pub bytes: usize,
    pub entropy: f64,
    pub chi_square: f64,
    pub chi_p_value: f64,
    pub unique_bytes: usize,
    pub runs: usize,
    pub expected_runs: f64,
    pub serial_correlation: f64,
    /// Count of set bits at each bit position 0 (LSB) ..= 7
    pub bit_ones: [usize; 8],
}

impl KeystreamStats {
    pub fn compute(data: &[u8]) -> Self {
        let chi_square = calculate_chi_square(data);
        let (runs, expected_runs) = calculate_runs(data);
        Self {
            bytes: data.len(),
            entropy: calculate_entropy(data),
            chi_square,
            chi_p_value: chi_square_p_value(chi_square, 255),
            unique_bytes: count_unique_bytes(data),
            runs,
            expected_runs,
            serial_correlation: calculate_serial_correlation(data),
            bit_ones: count_bit_ones(data),
        }
    }
}

/// Generate keystream per `options` and report its statistics
pub fn show_stats(options: &KeystreamOptions) -> Result<String> {
    let keystream = generate_keystream(options)?;
    let stats = KeystreamStats::compute(&keystream);

    let mut output = String::new();

    output.push_str(&format!("{} Keystream Statistics\n", options.algorithm));
    output.push_str("==========================\n\n");
    output.push_str(&format!(
        "Sample: {} bytes from offset {}\n\n",
        stats.bytes, options.offset
    ));

    let entropy_pct = (stats.entropy / 8.0) * 100.0;
    output.push_str(&format!(
        "Shannon Entropy: {:.4} bits/byte ({:.1}% of max)\n",
        stats.entropy, entropy_pct
    ));
    output.push_str(&format!("  Interpretation: {}\n\n", interpret_entropy(stats.entropy)));

    output.push_str(&format!("Chi-Square: {:.2} (df=255)\n", stats.chi_square));
    output.push_str(&format!("  P-value: {}\n", format_p_value(stats.chi_p_value)));
    output.push_str(&format!(
        "  Interpretation: {}\n\n",
        interpret_chi_square(stats.chi_p_value)
    ));

    output.push_str(&format!("Unique bytes: {}/256\n\n", stats.unique_bytes));

    output.push_str(&format!("Runs Test: {} runs\n", stats.runs));
    output.push_str(&format!("  Expected: ~{:.0} runs\n", stats.expected_runs));
    output.push_str(&format!(
        "  Interpretation: {}\n\n",
        interpret_runs(stats.runs, stats.expected_runs)
    ));

    output.push_str(&format!("Serial Correlation: {:.4}\n", stats.serial_correlation));
    output.push_str(&format!(
        "  Interpretation: {}\n\n",
        interpret_correlation(stats.serial_correlation)
    ));

    output.push_str("Bit Balance:\n");
    for (bit, ones) in stats.bit_ones.iter().enumerate() {
        let ratio = if stats.bytes == 0 {
            0.0
        } else {
            *ones as f64 / stats.bytes as f64
        };
        output.push_str(&format!("  Bit {}: {:.4} ones\n", bit, ratio));
    }

    Ok(output)
}

/// Shannon entropy in bits per byte
fn calculate_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut freq = [0u64; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;

    for &count in &freq {
        if count > 0 {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
    }

    entropy
}

fn interpret_entropy(entropy: f64) -> &'static str {
    if entropy > 7.9 {
        "PASS - indistinguishable from uniform bytes"
    } else if entropy > 7.5 {
        "Marginal - sample may be too short"
    } else {
        "SUSPECT - keystream is not uniform"
    }
}

fn calculate_chi_square(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut freq = [0u64; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let expected = data.len() as f64 / 256.0;
    let mut chi_square = 0.0;

    for &count in &freq {
        let diff = count as f64 - expected;
        chi_square += (diff * diff) / expected;
    }

    chi_square
}

/// Approximate upper-tail p-value via the normal approximation for large df
fn chi_square_p_value(chi_square: f64, df: usize) -> f64 {
    let z = ((2.0 * chi_square).sqrt() - (2.0 * df as f64 - 1.0).sqrt()) / std::f64::consts::SQRT_2;
    0.5 * (1.0 - erf(z / std::f64::consts::SQRT_2))
}

/// Abramowitz-Stegun 7.1.26
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

fn format_p_value(p: f64) -> String {
    if p < 0.001 {
        "< 0.001".to_string()
    } else if p > 0.999 {
        "> 0.999".to_string()
    } else {
        format!("{:.3}", p)
    }
}

fn interpret_chi_square(p_value: f64) -> &'static str {
    if !(0.01..=0.99).contains(&p_value) {
        "SUSPECT - significant deviation from uniform"
    } else if !(0.05..=0.95).contains(&p_value) {
        "Marginal - slight deviation from uniform"
    } else {
        "PASS - consistent with random data"
    }
}

fn count_unique_bytes(data: &[u8]) -> usize {
    let mut seen = [false; 256];
    for &byte in data {
        seen[byte as usize] = true;
    }
    seen.iter().filter(|&&b| b).count()
}

/// Number of runs of equal consecutive bits, MSB first, and the expectation
fn calculate_runs(data: &[u8]) -> (usize, f64) {
    if data.is_empty() {
        return (0, 0.0);
    }

    let mut runs = 1usize;
    let mut prev_bit = (data[0] >> 7) & 1;

    for &byte in data {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1;
            if bit != prev_bit {
                runs += 1;
                prev_bit = bit;
            }
        }
    }

    let n = data.len() * 8;
    let expected_runs = (n as f64 + 1.0) / 2.0;

    (runs, expected_runs)
}

fn interpret_runs(actual: usize, expected: f64) -> &'static str {
    let ratio = actual as f64 / expected;
    if ratio > 0.95 && ratio < 1.05 {
        "PASS - normal run distribution"
    } else if ratio > 0.85 && ratio < 1.15 {
        "Marginal - notable deviation"
    } else {
        "SUSPECT - abnormal run distribution"
    }
}

fn calculate_serial_correlation(data: &[u8]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }

    let n = data.len() as f64;
    let mean: f64 = data.iter().map(|&b| b as f64).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, &byte) in data.iter().enumerate() {
        let x = byte as f64 - mean;
        let y = data[(i + 1) % data.len()] as f64 - mean;
        numerator += x * y;
        denominator += x * x;
    }

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn interpret_correlation(corr: f64) -> &'static str {
    let abs_corr = corr.abs();
    if abs_corr < 0.05 {
        "PASS - no significant correlation"
    } else if abs_corr < 0.1 {
        "Marginal - weak correlation"
    } else {
        "SUSPECT - significant serial correlation"
    }
}

fn count_bit_ones(data: &[u8]) -> [usize; 8] {
    let mut ones = [0usize; 8];
    for &byte in data {
        for (bit, count) in ones.iter_mut().enumerate() {
            *count += ((byte >> bit) & 1) as usize;
        }
    }
    ones
}
