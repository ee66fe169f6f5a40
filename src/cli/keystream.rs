use crate::algorithm::Algorithm;
use crate::error::Result;
use serde::Serialize;

/// Scratch size used while discarding keystream ahead of `offset`
const SKIP_CHUNK: usize = 4096;

/// Options for the keystream command
#[derive(Debug, Clone)]
pub struct KeystreamOptions {
    pub algorithm: Algorithm,
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
    /// Keystream bytes to skip before output starts
    pub offset: u64,
    pub length: usize,
}

impl Default for KeystreamOptions {
    fn default() -> Self {
        let algorithm = Algorithm::default();
        Self {
            algorithm,
            key: vec![0u8; algorithm.key_len()],
            iv: vec![0u8; algorithm.iv_len()],
            offset: 0,
            length: 64,
        }
    }
}

/// Keystream dump in the shape printed by `keystream --json`
#[derive(Debug, Clone, Serialize)]
pub struct KeystreamReport {
    pub algorithm: Algorithm,
    pub key: String,
    pub iv: String,
    pub offset: u64,
    pub keystream: String,
}

/// Generate `options.length` keystream bytes starting at `options.offset`
pub fn generate_keystream(options: &KeystreamOptions) -> Result<Vec<u8>> {
    let mut cipher = options.algorithm.new_cipher(&options.key, &options.iv)?;

    let mut scratch = [0u8; SKIP_CHUNK];
    let mut remaining = options.offset;
    while remaining > 0 {
        let n = remaining.min(SKIP_CHUNK as u64) as usize;
        cipher.apply_keystream(&mut scratch[..n]);
        remaining -= n as u64;
    }

    let mut keystream = vec![0u8; options.length];
    cipher.apply_keystream(&mut keystream);
    Ok(keystream)
}

pub fn keystream_report(options: &KeystreamOptions) -> Result<KeystreamReport> {
    let keystream = generate_keystream(options)?;
    Ok(KeystreamReport {
        algorithm: options.algorithm,
        key: hex::encode(&options.key),
        iv: hex::encode(&options.iv),
        offset: options.offset,
        keystream: hex::encode(keystream),
    })
}

/// Render the keystream as 16-byte hex rows labelled with their offset
pub fn show_keystream(options: &KeystreamOptions) -> Result<String> {
    let keystream = generate_keystream(options)?;

    let mut output = String::new();
    output.push_str(&format!(
        "{} key={} iv={}\n",
        options.algorithm,
        hex::encode(&options.key),
        if options.iv.is_empty() {
            "none".to_string()
        } else {
            hex::encode(&options.iv)
        }
    ));
    for (i, row) in keystream.chunks(16).enumerate() {
        let offset = options.offset + (i * 16) as u64;
        output.push_str(&format!("{:08x}: {}\n", offset, hex::encode_upper(row)));
    }
    Ok(output)
}

pub fn show_keystream_json(options: &KeystreamOptions) -> Result<String> {
    let report = keystream_report(options)?;
    Ok(serde_json::to_string_pretty(&report)?)
}
