use std::io;

/// Compute the high-order entropy (HOE) of program output.
///
/// HOE = compressed_size / raw_size, where compression uses brotli at quality 2.
/// Output that is mostly repeated bytes (long runs of `0` from `n` on fresh
/// cells, say) scores far below 1.0; varied output approaches 1.0.
///
/// Values slightly above 1.0 are possible due to compression overhead on short
/// inputs. Empty input scores 0.
pub fn high_order_entropy(data: &[u8]) -> io::Result<f64> {
    if data.is_empty() {
        return Ok(0.0);
    }

    let mut compressed = Vec::new();
    let params = brotli::enc::BrotliEncoderParams {
        quality: 2,
        ..Default::default()
    };
    brotli::BrotliCompress(&mut &data[..], &mut compressed, &params)?;

    Ok(compressed.len() as f64 / data.len() as f64)
}

/// Count how often each byte value occurs.
pub fn byte_histogram(data: &[u8]) -> [usize; 256] {
    let mut hist = [0usize; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    hist
}

/// Number of distinct byte values present.
pub fn distinct_bytes(data: &[u8]) -> usize {
    byte_histogram(data).iter().filter(|&&n| n > 0).count()
}
