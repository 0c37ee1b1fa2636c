//! Property-based tests for gapped and reference-relative sequences
//!
//! **Feature: fast-slicemap, Property 3: Gapped coordinate translation**

use fast_slicemap::core::dna::{parse_nucleotides, to_string};
use fast_slicemap::core::{
    GappedSequence, Nucleotide, NucleotideSequence, Range, ReferenceEncodedSequence, SequenceError,
};
use proptest::prelude::*;
use std::sync::Arc;

/// Generate gapped text
fn arb_gapped_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T', '-', 'N']), 0..120)
        .prop_map(|chars| chars.into_iter().collect())
}

fn arb_bases(max: usize) -> impl Strategy<Value = Vec<Nucleotide>> {
    prop::collection::vec(
        prop::sample::select(vec![
            Nucleotide::Adenine,
            Nucleotide::Cytosine,
            Nucleotide::Guanine,
            Nucleotide::Thymine,
            Nucleotide::Gap,
        ]),
        0..max,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: ungapped_to_gapped inverts gapped_to_ungapped on every base**
    #[test]
    fn prop_translation_round_trip(text in arb_gapped_text()) {
        let seq: NucleotideSequence = text.parse().unwrap();
        for i in 0..seq.len() {
            match seq.gapped_to_ungapped(i) {
                Ok(u) => prop_assert_eq!(seq.ungapped_to_gapped(u), i),
                Err(e) => {
                    prop_assert!(seq.is_gap(i));
                    prop_assert_eq!(e, SequenceError::PositionIsGap(i));
                }
            }
        }
        prop_assert_eq!(seq.ungapped_len(), text.chars().filter(|&c| c != '-').count());
    }

    /// **Property 2: Gap offsets are sorted and point at gaps**
    #[test]
    fn prop_gap_offsets_sorted(text in arb_gapped_text()) {
        let seq: NucleotideSequence = text.parse().unwrap();
        let gaps = seq.gap_offsets();
        prop_assert!(gaps.windows(2).all(|w| w[0] < w[1]));
        for &g in gaps {
            prop_assert_eq!(seq.get(g).unwrap(), Nucleotide::Gap);
        }
        prop_assert_eq!(seq.to_string(), text);
    }

    /// **Property 3: Reference encoding reproduces the read exactly**
    #[test]
    fn prop_reference_encoding_reproduces(
        reference in arb_bases(60),
        read in arb_bases(40),
        offset in -20i64..70,
    ) {
        let reference = Arc::new(NucleotideSequence::new(&reference).unwrap());
        let encoded = ReferenceEncodedSequence::new(reference.clone(), &read, offset);
        prop_assert_eq!(encoded.len(), read.len());
        prop_assert_eq!(encoded.to_vec(), read.clone());

        for (&local, &symbol) in encoded.differences() {
            let ref_index = local as i64 + offset;
            prop_assert!(ref_index >= 0 && (ref_index as usize) < reference.len());
            prop_assert_ne!(reference.get(ref_index as usize).unwrap(), symbol);
            prop_assert!(!symbol.is_gap());
        }
        prop_assert_eq!(encoded.num_gaps(), read.iter().filter(|n| n.is_gap()).count());
    }

    /// **Property 4: Reverse complement twice is identity**
    #[test]
    fn prop_sequence_reverse_complement(text in arb_gapped_text()) {
        let seq: NucleotideSequence = text.parse().unwrap();
        let twice = seq.reverse_complement().unwrap().reverse_complement().unwrap();
        prop_assert_eq!(twice, seq);
    }

    /// **Property 5: sub_sequence matches slicing the symbols**
    #[test]
    fn prop_sub_sequence(text in arb_gapped_text(), begin in 0i64..120, len in 0i64..40) {
        let seq: NucleotideSequence = text.parse().unwrap();
        let range = Range::new(begin, begin + len - 1).unwrap();
        let sub = seq.sub_sequence(&range).unwrap();
        let expected: String = text
            .chars()
            .enumerate()
            .filter(|(i, _)| range.contains(*i as i64))
            .map(|(_, c)| c)
            .collect();
        prop_assert_eq!(sub.to_string(), expected);
    }
}

#[test]
fn test_reference_difference_scenario() {
    let reference = Arc::new("ACGT".parse::<NucleotideSequence>().unwrap());
    let read = parse_nucleotides("ACTT").unwrap();
    let encoded = ReferenceEncodedSequence::new(reference, &read, 0);
    assert_eq!(encoded.num_differences(), 1);
    assert_eq!(encoded.differences().get(&2), Some(&Nucleotide::Thymine));
    assert_eq!(encoded.num_gaps(), 0);
    assert_eq!(encoded.get(2).unwrap(), Nucleotide::Thymine);
    assert_eq!(to_string(&encoded.to_vec()), "ACTT");
}

#[test]
fn test_whitespace_is_ignored() {
    let seq: NucleotideSequence = " AC\tG\r\nT ".parse().unwrap();
    assert_eq!(seq.to_string(), "ACGT");
}
