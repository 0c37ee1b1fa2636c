//! Property-based tests for variable-width windows, codons and RNA edits
//!
//! **Feature: fast-slicemap, Property 5: Window aggregation**

use fast_slicemap::core::dna::{parse_nucleotides, to_string};
use fast_slicemap::core::{GappedSequence, Nucleotide, NucleotideSequence, Range, SliceError};
use fast_slicemap::pileup::{
    CodonSliceMapBuilder, ReadEditKind, RnaEdit, VariableWidthSliceMapBuilder, CODON_LENGTH,
};
use proptest::prelude::*;

fn n(text: &str) -> Vec<Nucleotide> {
    parse_nucleotides(text).unwrap()
}

fn seq(text: &str) -> NucleotideSequence {
    text.parse().unwrap()
}

/// Generate a gapped reference whose ungapped length is a multiple of 3
fn arb_codon_reference() -> impl Strategy<Value = NucleotideSequence> {
    (1usize..12, prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T']), 36))
        .prop_flat_map(|(codons, bases)| {
            let len = codons * CODON_LENGTH;
            let bases: Vec<char> = bases.into_iter().take(len).collect();
            (Just(bases), prop::collection::vec(0usize..3, len))
        })
        .prop_map(|(bases, gaps_after)| {
            let mut text = String::new();
            for (i, (base, gaps)) in bases.into_iter().zip(gaps_after).enumerate() {
                text.push(base);
                // keep most positions ungapped
                if i % 4 == 1 {
                    text.extend(std::iter::repeat('-').take(gaps));
                }
            }
            text.parse::<NucleotideSequence>().unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Window count is ungapped length / width**
    #[test]
    fn prop_window_count(reference in arb_codon_reference()) {
        let builder = VariableWidthSliceMapBuilder::new(&reference, CODON_LENGTH).unwrap();
        prop_assert_eq!(builder.num_windows(), reference.ungapped_len() / CODON_LENGTH);
    }

    /// **Property 2: The reference itself lands once in every window with its own sequence**
    #[test]
    fn prop_reference_counts_itself(reference in arb_codon_reference()) {
        let builder = VariableWidthSliceMapBuilder::new(&reference, CODON_LENGTH).unwrap();
        let counted = builder.add(0, &reference).unwrap();
        let map = builder.build();
        prop_assert_eq!(counted, map.len());
        for slice in map.iter() {
            prop_assert_eq!(slice.get_count_for(slice.reference_sequence()), 1);
            prop_assert_eq!(slice.coverage_depth(), 1);
        }
    }

    /// **Property 3: Window spans tile the region after the first base**
    #[test]
    fn prop_windows_tile(reference in arb_codon_reference()) {
        let map = VariableWidthSliceMapBuilder::new(&reference, CODON_LENGTH).unwrap().build();
        for pair in map.iter().collect::<Vec<_>>().windows(2) {
            prop_assert_eq!(pair[0].gapped_range().end() + 1, pair[1].gapped_range().begin());
        }
        if let Some(last) = map.iter().last() {
            prop_assert_eq!(last.gapped_range().end(), reference.len() as i64 - 1);
        }
    }

    /// **Property 4: A partial read counts exactly the windows whose end bases it covers**
    #[test]
    fn prop_partial_reads_count_covered_windows(
        reference in arb_codon_reference(),
        begin in 0usize..40,
        len in 1usize..40,
    ) {
        let full = reference.to_vec();
        prop_assume!(begin < full.len());
        let end = (begin + len).min(full.len());
        let read = NucleotideSequence::new(&full[begin..end]).unwrap();

        let builder = VariableWidthSliceMapBuilder::new(&reference, CODON_LENGTH).unwrap();
        builder.add(begin as i64, &read).unwrap();
        let map = builder.build();

        let first_covered = (begin..end).find(|&c| !reference.is_gap(c));
        let last_covered = (begin..end).rev().find(|&c| !reference.is_gap(c));
        for (w, slice) in map.iter().enumerate() {
            let first_base = reference.ungapped_to_gapped(w * CODON_LENGTH);
            let last_base = reference.ungapped_to_gapped(w * CODON_LENGTH + CODON_LENGTH - 1);
            let covered = match (first_covered, last_covered) {
                (Some(b), Some(e)) => first_base >= b && last_base <= e,
                _ => false,
            };
            prop_assert_eq!(slice.coverage_depth(), covered as u64);
            if covered {
                // gap columns of the reference add nothing to the candidate
                prop_assert_eq!(slice.get_count_for(slice.reference_sequence()), 1);
            }
        }
    }

    /// **Property 5: Candidates hold one symbol per window base and never only gaps**
    #[test]
    fn prop_candidates_have_window_width(
        reference in arb_codon_reference(),
        reads in prop::collection::vec(
            (
                0i64..40,
                prop::collection::vec(prop::sample::select(vec!['A', 'C', 'G', 'T', '-']), 1..30),
            ),
            1..10,
        ),
    ) {
        let builder = VariableWidthSliceMapBuilder::new(&reference, CODON_LENGTH).unwrap();
        for (offset, chars) in &reads {
            let text: String = chars.iter().collect();
            builder.add(*offset, &text.parse::<NucleotideSequence>().unwrap()).unwrap();
        }
        let map = builder.build();
        for slice in map.iter() {
            for element in slice.elements() {
                prop_assert_eq!(element.sequence.len(), CODON_LENGTH);
                prop_assert!(element.sequence.iter().any(|n| !n.is_gap()));
            }
        }
    }
}

#[test]
fn test_two_windows_of_three() {
    let reference = seq("ACGTAA");
    let builder = VariableWidthSliceMapBuilder::new(&reference, 3).unwrap();
    builder.add(0, &seq("ACGTAA")).unwrap();
    let map = builder.build();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_slice(0).unwrap().get_count_for(&n("ACG")), 1);
}

#[test]
fn test_unaligned_width_rejected() {
    let err = VariableWidthSliceMapBuilder::new(&seq("ACGTA"), 3).err().unwrap();
    assert_eq!(err, SliceError::UnalignedWidth { ungapped_length: 5, width: 3 });
}

#[test]
fn test_leading_reference_gap_run() {
    // first window starts after the leading gaps; they belong to no window
    let reference = seq("--ACGTAA");
    let builder = VariableWidthSliceMapBuilder::new(&reference, 3).unwrap();
    builder.add(0, &seq("GGACGTAA")).unwrap();
    let map = builder.build();
    assert_eq!(map.get_slice(0).unwrap().gapped_range(), Range::new(2, 4).unwrap());
    assert_eq!(map.get_slice(0).unwrap().get_count_for(&n("ACG")), 1);
}

#[test]
fn test_read_gaps_kept_in_window_candidates() {
    let reference = seq("ACGTAAGGC");
    let builder = VariableWidthSliceMapBuilder::new(&reference, 3).unwrap();
    builder.add(0, &seq("A-GTAAGGC")).unwrap();
    builder.add(0, &seq("ACG---GGC")).unwrap();
    let map = builder.build();

    assert_eq!(map.get_slice(0).unwrap().get_count_for(&n("A-G")), 1);
    assert_eq!(map.get_slice(0).unwrap().get_count_for(&n("AG")), 0);
    let middle = map.get_slice(1).unwrap();
    assert_eq!(middle.coverage_depth(), 1);
    assert_eq!(middle.elements().len(), 1);
    assert_eq!(middle.get_count_for(&n("TAA")), 1);
}

#[test]
fn test_rna_edit_adjusts_downstream_offsets() {
    let reference = seq("AACGTAAAAAAA");
    let edit = RnaEdit::new(Range::new(2, 4).unwrap(), n("CGT"), n("CAGT")).unwrap();
    assert_eq!(edit.bases_added(), 1);
    let applied = edit.edit_reference(&reference).unwrap();
    assert_eq!(applied.adjust_start_offset(10), 11);
    assert_eq!(applied.adjust_start_offset(4), 4);
    assert_eq!(to_string(&applied.edited_reference().to_vec()), "AACAGTAAAAAAA");
}

#[test]
fn test_diverged_read_keeps_gap_widening() {
    let reference = seq("AACGTAAAAAAA");
    let applied = RnaEdit::new(Range::new(2, 4).unwrap(), n("CGT"), n("CAGT"))
        .unwrap()
        .edit_reference(&reference)
        .unwrap();
    // read covers the edited region but disagrees with the edit's original bases
    let edited = applied.edit_read(&n("AAGGGAA"), &Range::new(0, 6).unwrap()).unwrap();
    assert_eq!(edited.kind, ReadEditKind::Diverged);
    assert_eq!(to_string(&edited.symbols), "AAGGG-AA");
}

#[test]
fn test_codon_builder_with_edit_and_range() {
    // ATG | AAA | TAG | CCC with AAA -> AAAAGG (+3)
    let reference = seq("ATGAAATAGCCC");
    let edit = RnaEdit::new(Range::new(3, 5).unwrap(), n("AAA"), n("AAAAGG")).unwrap();
    let builder = CodonSliceMapBuilder::with_options(&reference, None, Some(&edit)).unwrap();
    builder.add(0, &seq("ATGAAATAG")).unwrap();
    builder.add(6, &seq("TAGCCC")).unwrap();
    let map = builder.build();

    assert_eq!(map.len(), 5);
    assert_eq!(map.get_slice(1).unwrap().get_count_for(&n("AAA")), 1);
    assert_eq!(map.get_slice(2).unwrap().get_count_for(&n("AGG")), 1);
    assert_eq!(map.get_slice(3).unwrap().get_count_for(&n("TAG")), 2);
    assert_eq!(map.get_slice(4).unwrap().get_count_for(&n("CCC")), 1);
}
