use crate::algorithm::Algorithm;
use crate::error::{EstreamError, Result};
use crate::stream::StreamCipher;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Options for the xor command (encryption and decryption are the same)
#[derive(Debug, Clone)]
pub struct XorOptions {
    pub algorithm: Algorithm,
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
    /// Bytes read per iteration; need not be a multiple of the block size
    pub chunk_size: usize,
}

impl Default for XorOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            key: Vec::new(),
            iv: Vec::new(),
            chunk_size: 64 * 1024,
        }
    }
}

/// XOR `input` with the keystream and write the result to `output`
/// Returns the number of bytes processed
pub fn xor_file(input_path: &Path, output_path: &Path, options: &XorOptions) -> Result<u64> {
    let mut cipher = options.algorithm.new_cipher(&options.key, &options.iv)?;
    let input = File::open(input_path)?;
    // Creating the output truncates it, so it must not be the input
    if output_path.exists() && input_path.canonicalize()? == output_path.canonicalize()? {
        return Err(EstreamError::InvalidOption(format!(
            "output {} is the same file as the input",
            output_path.display()
        )));
    }
    let output = File::create(output_path)?;
    xor_stream(&mut *cipher, input, output, options.chunk_size)
}

/// XOR everything readable from `reader` into `writer`
pub fn xor_stream<C, R, W>(cipher: &mut C, mut reader: R, writer: W, chunk_size: usize) -> Result<u64>
where
    C: StreamCipher + ?Sized,
    R: Read,
    W: Write,
{
    if chunk_size == 0 {
        return Err(EstreamError::InvalidOption(
            "chunk size must be greater than zero".into(),
        ));
    }

    let mut writer = BufWriter::new(writer);
    let mut buf = vec![0u8; chunk_size];
    let mut total = 0u64;

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        cipher.apply_keystream(&mut buf[..n]);
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    writer.flush()?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hc256;
    use tempfile::tempdir;

    #[test]
    fn test_xor_file_roundtrip() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.bin");
        let opened = dir.path().join("opened.txt");

        let data: Vec<u8> = (0..10_000).map(|i| (i % 251) as u8).collect();
        std::fs::write(&plain, &data).unwrap();

        let options = XorOptions {
            algorithm: Algorithm::Hc256,
            key: vec![9u8; 32],
            iv: vec![3u8; 32],
            chunk_size: 333,
        };
        assert_eq!(xor_file(&plain, &sealed, &options).unwrap(), 10_000);
        assert_ne!(std::fs::read(&sealed).unwrap(), data);

        xor_file(&sealed, &opened, &options).unwrap();
        assert_eq!(std::fs::read(&opened).unwrap(), data);
    }

    #[test]
    fn test_chunk_size_does_not_change_output() {
        let data = vec![0u8; 1000];
        let mut outputs = Vec::new();
        for chunk_size in [1usize, 3, 4, 17, 1000, 4096] {
            let mut cipher = Hc256::new(&[1u8; 32], &[2u8; 32]).unwrap();
            let mut out = Vec::new();
            xor_stream(&mut cipher, &data[..], &mut out, chunk_size).unwrap();
            outputs.push(out);
        }
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));

        let mut cipher = Hc256::new(&[1u8; 32], &[2u8; 32]).unwrap();
        let mut expected = data.clone();
        cipher.apply_keystream(&mut expected);
        assert_eq!(outputs[0], expected);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut cipher = Hc256::new(&[1u8; 32], &[2u8; 32]).unwrap();
        let result = xor_stream(&mut cipher, &[1u8, 2, 3][..], Vec::<u8>::new(), 0);
        assert!(matches!(result, Err(EstreamError::InvalidOption(_))));
    }

    #[test]
    fn test_same_input_and_output_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"keep me").unwrap();
        let options = XorOptions {
            key: vec![0u8; 16],
            iv: vec![0u8; 16],
            ..Default::default()
        };

        // Same file reached through a different spelling of the path
        let aliased = dir.path().join(".").join("data.bin");
        let result = xor_file(&path, &aliased, &options);
        assert!(matches!(result, Err(EstreamError::InvalidOption(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempdir().unwrap();
        let options = XorOptions {
            key: vec![0u8; 16],
            iv: vec![0u8; 16],
            ..Default::default()
        };
        let result = xor_file(
            &dir.path().join("missing"),
            &dir.path().join("out"),
            &options,
        );
        assert!(matches!(result, Err(EstreamError::Io(_))));
    }
}
