//! Property-based tests for the nucleotide alphabet and 4-bit codec
//!
//! **Feature: fast-slicemap, Property 2: Codec round trips**

use fast_slicemap::core::codec::{decode, decode_at, decoded_len, encode, reverse_complement};
use fast_slicemap::core::dna::{self, ALL};
use fast_slicemap::core::{CodecError, Nucleotide};
use proptest::prelude::*;

/// Generate a symbol sequence over the full alphabet, gaps included
fn arb_symbols() -> impl Strategy<Value = Vec<Nucleotide>> {
    prop::collection::vec(prop::sample::select(ALL.to_vec()), 0..200)
}

/// Generate a sequence of standard bases as text
fn arb_bases_text() -> impl Strategy<Value = String> {
    let alphabet = vec!['A', 'C', 'G', 'T', 'a', 'c', 'g', 't'];
    prop::collection::vec(prop::sample::select(alphabet), 0..100)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: decode(encode(s)) == s**
    ///
    /// Holds for empty and odd-length sequences as well.
    #[test]
    fn prop_encode_decode(symbols in arb_symbols()) {
        let bytes = encode(&symbols).unwrap();
        prop_assert_eq!(bytes.len(), 4 + symbols.len().div_ceil(2));
        prop_assert_eq!(decoded_len(&bytes).unwrap(), symbols.len());
        prop_assert_eq!(decode(&bytes).unwrap(), symbols);
    }

    /// **Property 2: Random access agrees with full decode**
    #[test]
    fn prop_decode_at_matches_decode(symbols in arb_symbols()) {
        let bytes = encode(&symbols).unwrap();
        let decoded = decode(&bytes).unwrap();
        for (i, expected) in decoded.iter().enumerate() {
            prop_assert_eq!(decode_at(&bytes, i).unwrap(), *expected);
        }
        prop_assert_eq!(
            decode_at(&bytes, symbols.len()),
            Err(CodecError::IndexOutOfBounds { index: symbols.len(), len: symbols.len() })
        );
    }

    /// **Property 3: Byte-level reverse complement equals decode, reverse, complement, encode**
    #[test]
    fn prop_reverse_complement_matches_symbolic(symbols in arb_symbols()) {
        let bytes = encode(&symbols).unwrap();
        let expected = encode(&dna::reverse_complement(&symbols)).unwrap();
        prop_assert_eq!(reverse_complement(&bytes).unwrap(), expected);
    }

    /// **Property 4: Reverse complement is an involution**
    #[test]
    fn prop_reverse_complement_involution(symbols in arb_symbols()) {
        let bytes = encode(&symbols).unwrap();
        let twice = reverse_complement(&reverse_complement(&bytes).unwrap()).unwrap();
        prop_assert_eq!(twice, bytes);
    }

    /// **Property 5: Text parsing is case-insensitive and round trips in upper case**
    #[test]
    fn prop_parse_text(text in arb_bases_text()) {
        let symbols = dna::parse_nucleotides(&text).unwrap();
        prop_assert_eq!(dna::to_string(&symbols), text.to_uppercase());
    }

    /// **Property 6: Truncated buffers are rejected**
    #[test]
    fn prop_truncated_rejected(
        symbols in prop::collection::vec(prop::sample::select(ALL.to_vec()), 1..100),
    ) {
        let bytes = encode(&symbols).unwrap();
        let truncated = &bytes[..bytes.len() - 1];
        prop_assert!(matches!(decode(truncated), Err(CodecError::CorruptEncoding(_))));
    }
}

#[test]
fn test_complement_is_bit_flip_for_pairs() {
    for n in ALL {
        let code = n.code();
        let self_complementary = matches!(
            n,
            Nucleotide::Weak | Nucleotide::Strong | Nucleotide::Unknown | Nucleotide::Gap
        );
        if self_complementary {
            assert_eq!(n.complement(), n);
        } else {
            assert_eq!(n.complement().code(), !code & 0x0F, "{}", n);
        }
    }
}

#[test]
fn test_sixteen_distinct_symbols() {
    let chars: std::collections::HashSet<char> = ALL.iter().map(|n| n.to_char()).collect();
    assert_eq!(chars.len(), 16);
}

#[test]
fn test_odd_length_low_nibble_zero() {
    let bytes = encode(&[Nucleotide::Thymine]).unwrap();
    assert_eq!(bytes, vec![0, 0, 0, 1, 0xF0]);
}
