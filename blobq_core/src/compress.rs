//! zlib compression of framed objects.

use crate::error::{Error, Result};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

/// Growth step for the decompression output buffer.
const CHUNK_SIZE: usize = 16 * 1024;

/// Compress data with zlib at the default level.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::default(),
    );
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a complete zlib stream.
///
/// Fails with `CorruptStream` on a bad header, bad data, checksum mismatch,
/// truncation, or trailing bytes after the end of the stream.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(CHUNK_SIZE));

    loop {
        if out.len() == out.capacity() {
            out.reserve(CHUNK_SIZE);
        }

        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let input = &data[before_in as usize..];

        let status = inflater
            .decompress_vec(input, &mut out, FlushDecompress::None)
            .map_err(|e| Error::corrupt_stream(format!("zlib decompression failed: {}", e)))?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // Spare output room and no progress: the input ran out mid-stream
                if inflater.total_in() == before_in && inflater.total_out() == before_out {
                    return Err(Error::corrupt_stream(format!(
                        "truncated stream after {} bytes",
                        before_in
                    )));
                }
            }
        }
    }

    let consumed = inflater.total_in() as usize;
    if consumed != data.len() {
        return Err(Error::corrupt_stream(format!(
            "{} trailing bytes after end of stream",
            data.len() - consumed
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_empty() {
        let compressed = compress(b"").unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }

    #[test]
    fn test_roundtrip_framed_blob() {
        let compressed = compress(b"blob 3\0hi\n").unwrap();
        // zlib header: CM=8, 32K window
        assert_eq!(compressed[0], 0x78);
        assert_eq!(decompress(&compressed).unwrap(), b"blob 3\0hi\n");
    }

    #[test]
    fn test_roundtrip_larger_than_chunk() {
        // Highly compressible, so output is many times the input size
        let data = vec![0x5a; CHUNK_SIZE * 64 + 7];
        let compressed = compress(&data).unwrap();
        assert!(compressed.len() < data.len() / 10);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_decompress_empty_input() {
        assert!(matches!(decompress(b""), Err(Error::CorruptStream { .. })));
    }

    #[test]
    fn test_decompress_garbage() {
        assert!(matches!(
            decompress(b"not a zlib stream"),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_decompress_truncated() {
        let compressed = compress(&vec![7u8; 10_000]).unwrap();
        let truncated = &compressed[..compressed.len() - 6];
        assert!(matches!(
            decompress(truncated),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_decompress_checksum_mismatch() {
        let mut compressed = compress(b"blob 11\0hello world").unwrap();
        let last = compressed.len() - 1;
        compressed[last] ^= 0xff;
        assert!(matches!(
            decompress(&compressed),
            Err(Error::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_decompress_trailing_bytes() {
        let mut compressed = compress(b"blob 0\0").unwrap();
        compressed.extend_from_slice(b"junk");
        assert!(matches!(
            decompress(&compressed),
            Err(Error::CorruptStream { .. })
        ));
    }

    // Property-based tests
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 56,
            max_shrink_iters: 1000,
            ..ProptestConfig::default()
        })]

        /// Compression round-trip preserves data
        #[test]
        fn prop_compression_roundtrip(data in prop::collection::vec(any::<u8>(), 0..100_000)) {
            let compressed = compress(&data)?;
            let decompressed = decompress(&compressed)?;
            prop_assert_eq!(decompressed, data, "Compression must be lossless");
        }
    }
}
