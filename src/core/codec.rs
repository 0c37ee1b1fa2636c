//! 4-bit nucleotide codec
//!
//! Layout: a 4-byte big-endian symbol count followed by `ceil(count / 2)` payload bytes.
//! Each payload byte packs two codes, high nibble first; an odd count leaves the last low
//! nibble zero.
//!
//! ```text
//! [ count: u32 BE ][ s0 s1 ][ s2 s3 ] ... [ s(n-1) 0 ]
//! ```

use crate::core::dna::{complement_code, Nucleotide};
use crate::core::error::{CodecError, CodecResult};
use byteorder::{BigEndian, ByteOrder};

/// Size of the symbol count header in bytes
pub const HEADER_SIZE: usize = 4;

/// Buffer size needed for `count` symbols
#[inline]
pub fn encoded_len(count: usize) -> usize {
    HEADER_SIZE + count.div_ceil(2)
}

/// Pack symbols into a new buffer
///
/// # Examples
/// ```
/// use fast_slicemap::core::codec::{decode, encode};
/// use fast_slicemap::core::dna::parse_nucleotides;
///
/// let symbols = parse_nucleotides("ACGTN").unwrap();
/// let bytes = encode(&symbols).unwrap();
/// assert_eq!(bytes.len(), 4 + 3);
/// assert_eq!(decode(&bytes).unwrap(), symbols);
/// ```
pub fn encode(symbols: &[Nucleotide]) -> CodecResult<Vec<u8>> {
    let count = u32::try_from(symbols.len()).map_err(|_| CodecError::TooLong(symbols.len()))?;
    let mut buffer = vec![0u8; encoded_len(symbols.len())];
    BigEndian::write_u32(&mut buffer[..HEADER_SIZE], count);

    for (byte, pair) in buffer[HEADER_SIZE..].iter_mut().zip(symbols.chunks(2)) {
        let high = pair[0].code() << 4;
        let low = pair.get(1).map_or(0, |n| n.code());
        *byte = high | low;
    }
    Ok(buffer)
}

/// Symbol count stored in the header, after checking it against the payload size
pub fn decoded_len(bytes: &[u8]) -> CodecResult<usize> {
    if bytes.len() < HEADER_SIZE {
        return Err(CodecError::CorruptEncoding(format!(
            "buffer of {} bytes is shorter than the {}-byte header",
            bytes.len(),
            HEADER_SIZE
        )));
    }
    let count = BigEndian::read_u32(&bytes[..HEADER_SIZE]) as usize;
    if bytes.len() != encoded_len(count) {
        return Err(CodecError::CorruptEncoding(format!(
            "header declares {} symbols ({} bytes) but buffer holds {} bytes",
            count,
            encoded_len(count),
            bytes.len()
        )));
    }
    Ok(count)
}

/// Unpack every symbol
pub fn decode(bytes: &[u8]) -> CodecResult<Vec<Nucleotide>> {
    let count = decoded_len(bytes)?;
    let mut symbols = Vec::with_capacity(count);
    for byte in &bytes[HEADER_SIZE..] {
        symbols.push(Nucleotide::from_code(byte >> 4));
        symbols.push(Nucleotide::from_code(byte & 0x0F));
    }
    symbols.truncate(count);
    Ok(symbols)
}

/// Random access to one symbol without decoding the rest
///
/// # Examples
/// ```
/// use fast_slicemap::core::codec::{decode_at, encode};
/// use fast_slicemap::core::dna::parse_nucleotides;
/// use fast_slicemap::core::Nucleotide;
///
/// let bytes = encode(&parse_nucleotides("ACG").unwrap()).unwrap();
/// assert_eq!(decode_at(&bytes, 2).unwrap(), Nucleotide::Guanine);
/// assert!(decode_at(&bytes, 3).is_err());
/// ```
#[inline]
pub fn decode_at(bytes: &[u8], index: usize) -> CodecResult<Nucleotide> {
    let count = decoded_len(bytes)?;
    if index >= count {
        return Err(CodecError::IndexOutOfBounds { index, len: count });
    }
    Ok(nibble(bytes, index))
}

#[inline]
fn nibble(bytes: &[u8], index: usize) -> Nucleotide {
    let byte = bytes[HEADER_SIZE + index / 2];
    if index % 2 == 0 {
        Nucleotide::from_code(byte >> 4)
    } else {
        Nucleotide::from_code(byte & 0x0F)
    }
}

#[inline]
fn complement_byte_swapped(byte: u8) -> u8 {
    (complement_code(byte & 0x0F) << 4) | complement_code(byte >> 4)
}

/// Reverse complement an encoded buffer without a full decode
///
/// Even counts reverse the payload bytes and complement each with its nibbles swapped;
/// odd counts are re-packed shifted by one nibble.
pub fn reverse_complement(bytes: &[u8]) -> CodecResult<Vec<u8>> {
    let count = decoded_len(bytes)?;
    let mut out = vec![0u8; bytes.len()];
    out[..HEADER_SIZE].copy_from_slice(&bytes[..HEADER_SIZE]);

    if count % 2 == 0 {
        for (dst, src) in out[HEADER_SIZE..]
            .iter_mut()
            .zip(bytes[HEADER_SIZE..].iter().rev())
        {
            *dst = complement_byte_swapped(*src);
        }
    } else {
        for (i, dst) in out[HEADER_SIZE..].iter_mut().enumerate() {
            let high = complement_code(nibble(bytes, count - 1 - 2 * i).code());
            let low = if 2 * i + 1 < count {
                complement_code(nibble(bytes, count - 2 - 2 * i).code())
            } else {
                0
            };
            *dst = (high << 4) | low;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dna::{self, parse_nucleotides};

    #[test]
    fn test_header_is_big_endian() {
        let symbols = vec![Nucleotide::Adenine; 258];
        let bytes = encode(&symbols).unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 1, 2]);
        assert_eq!(bytes.len(), 4 + 129);
    }

    #[test]
    fn test_packing_high_nibble_first() {
        let bytes = encode(&parse_nucleotides("CGT").unwrap()).unwrap();
        assert_eq!(&bytes[4..], &[0x1E, 0xF0]);
    }

    #[test]
    fn test_empty() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert!(decode(&bytes).unwrap().is_empty());
        assert_eq!(
            decode_at(&bytes, 0),
            Err(CodecError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_corrupt_buffers() {
        assert!(matches!(decode(&[0, 0]), Err(CodecError::CorruptEncoding(_))));
        // header says 5 symbols, payload holds 2 bytes
        assert!(matches!(
            decode(&[0, 0, 0, 5, 0x01, 0x23]),
            Err(CodecError::CorruptEncoding(_))
        ));
        assert!(matches!(
            decoded_len(&[0, 0, 0, 1, 0x10, 0x00]),
            Err(CodecError::CorruptEncoding(_))
        ));
    }

    #[test]
    fn test_reverse_complement_even_and_odd() {
        for text in ["", "A", "AC", "ACGTN", "ACGT-RYKM", "GATTACA", "WS-N"] {
            let symbols = parse_nucleotides(text).unwrap();
            let expected = encode(&dna::reverse_complement(&symbols)).unwrap();
            let actual = reverse_complement(&encode(&symbols).unwrap()).unwrap();
            assert_eq!(actual, expected, "{}", text);
        }
    }
}
