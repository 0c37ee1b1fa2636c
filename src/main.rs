//! FastSliceMap CLI entry point
//!
//! Encodes and decodes sequences, converts ranges, and builds per-column or per-codon
//! tallies from reads given on the command line.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use fast_slicemap::core::{codec, dna, CoordinateSystem, DirectedRange, GappedSequence, Range};
use fast_slicemap::pileup::{
    AlignedRead, CodonSliceMapBuilder, CoverageMap, GapQualityStrategy, Quality, RnaEdit,
    SliceMapBuilder,
};
use fast_slicemap::{NucleotideSequence, Strand};
use memchr::memchr_iter;
use std::time::Instant;

/// Coordinate system (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum SystemArg {
    /// 0-based inclusive
    #[default]
    #[value(name = "0b")]
    ZeroBased,
    /// 1-based inclusive
    #[value(name = "rb")]
    ResidueBased,
    /// Inter-residue positions
    #[value(name = "sb")]
    SpaceBased,
}

impl From<SystemArg> for CoordinateSystem {
    fn from(arg: SystemArg) -> Self {
        match arg {
            SystemArg::ZeroBased => CoordinateSystem::ZeroBased,
            SystemArg::ResidueBased => CoordinateSystem::ResidueBased,
            SystemArg::SpaceBased => CoordinateSystem::SpaceBased,
        }
    }
}

/// Gap quality strategy (CLI enum)
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum GapQualityArg {
    /// Lower of the flanking base qualities
    #[default]
    #[value(name = "lowest")]
    LowestFlanking,
    /// Always zero
    #[value(name = "zero")]
    AlwaysZero,
}

impl From<GapQualityArg> for GapQualityStrategy {
    fn from(arg: GapQualityArg) -> Self {
        match arg {
            GapQualityArg::LowestFlanking => GapQualityStrategy::LowestFlanking,
            GapQualityArg::AlwaysZero => GapQualityStrategy::AlwaysZero,
        }
    }
}

#[derive(Parser)]
#[command(name = "fast-slicemap")]
#[command(about = "Compact gapped sequences and per-column / per-codon read tallies")]
#[command(version)]
#[command(author = "FastSliceMap Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a sequence and print the bytes as hex
    Encode {
        /// Nucleotide sequence (IUPAC, '-' for gaps)
        sequence: String,
        /// Print the reverse complement encoding instead
        #[arg(long)]
        revcomp: bool,
    },
    /// Decode hex bytes back into a sequence
    Decode {
        /// Hex string produced by `encode`
        hex: String,
    },
    /// Parse a range and print it in every coordinate system
    Range {
        /// Range text such as "10..20", "10-20" or "[10, 20]"
        text: String,
        /// Coordinate system the text is written in
        #[arg(short = 's', long, default_value = "0b")]
        system: SystemArg,
    },
    /// Per-column tallies over a reference
    Pileup {
        /// Reference (consensus) sequence
        #[arg(short = 'r', long)]
        reference: String,
        /// Read as OFFSET:STRAND:SEQUENCE, repeatable
        #[arg(long = "read", required = true)]
        reads: Vec<String>,
        /// Quality assigned to every base
        #[arg(short = 'q', long, default_value = "30")]
        quality: u8,
        /// Gap quality strategy
        #[arg(long = "gap-quality", default_value = "lowest")]
        gap_quality: GapQualityArg,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
    /// Per-codon tallies over a reference
    Codons {
        /// Reference sequence
        #[arg(short = 'r', long)]
        reference: String,
        /// Read as OFFSET:SEQUENCE, repeatable
        #[arg(long = "read", required = true)]
        reads: Vec<String>,
        /// RNA edit as START-END:ORIGINAL:REPLACEMENT (ungapped, zero-based)
        #[arg(long)]
        edit: Option<String>,
        /// Gapped reference range to restrict codons to
        #[arg(long)]
        range: Option<String>,
        /// Number of threads
        #[arg(short = 't', long, default_value = "1")]
        threads: usize,
    },
}

/// Split `text` at every ':' into exactly `expected` fields
fn split_fields(text: &str, expected: usize) -> anyhow::Result<Vec<&str>> {
    let mut fields = Vec::with_capacity(expected);
    let mut start = 0;
    for pos in memchr_iter(b':', text.as_bytes()) {
        fields.push(&text[start..pos]);
        start = pos + 1;
    }
    fields.push(&text[start..]);
    if fields.len() != expected {
        bail!("expected {} ':'-separated fields in '{}', found {}", expected, text, fields.len());
    }
    Ok(fields)
}

fn parse_pileup_read(index: usize, text: &str) -> anyhow::Result<AlignedRead> {
    let fields = split_fields(text, 3)?;
    let offset: i64 = fields[0]
        .parse()
        .with_context(|| format!("invalid offset in read '{}'", text))?;
    let strand = fields[1]
        .chars()
        .next()
        .and_then(Strand::from_char)
        .ok_or_else(|| anyhow!("invalid strand in read '{}'", text))?;
    let sequence: NucleotideSequence = fields[2].parse()?;
    Ok(AlignedRead::new(format!("read{}", index + 1), offset, strand, sequence))
}

fn parse_codon_read(index: usize, text: &str) -> anyhow::Result<AlignedRead> {
    let fields = split_fields(text, 2)?;
    let offset: i64 = fields[0]
        .parse()
        .with_context(|| format!("invalid offset in read '{}'", text))?;
    let sequence: NucleotideSequence = fields[1].parse()?;
    Ok(AlignedRead::new(format!("read{}", index + 1), offset, Strand::Forward, sequence))
}

fn parse_edit(text: &str) -> anyhow::Result<RnaEdit> {
    let fields = split_fields(text, 3)?;
    let region: Range = fields[0].parse()?;
    let edit = RnaEdit::new(
        region,
        dna::parse_nucleotides(fields[1])?,
        dna::parse_nucleotides(fields[2])?,
    )?;
    Ok(edit)
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let text = text.trim();
    if !text.is_ascii() {
        bail!("hex string '{}' contains non-ASCII characters", text);
    }
    if text.len() % 2 != 0 {
        bail!("hex string has odd length {}", text.len());
    }
    (0..text.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&text[i..i + 2], 16)
                .with_context(|| format!("invalid hex byte '{}'", &text[i..i + 2]))
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Encode { sequence, revcomp } => {
            let symbols = dna::parse_nucleotides(&sequence)?;
            let mut bytes = codec::encode(&symbols)?;
            if revcomp {
                bytes = codec::reverse_complement(&bytes)?;
            }
            println!("{}", to_hex(&bytes));
        }

        Commands::Decode { hex } => {
            let bytes = from_hex(&hex)?;
            let symbols = codec::decode(&bytes)?;
            println!("{}", dna::to_string(&symbols));
        }

        Commands::Range { text, system } => {
            let system: CoordinateSystem = system.into();
            let directed = DirectedRange::parse(&text, system)?;
            let range = directed.range();
            println!("strand\t{}", directed.strand());
            println!("length\t{}", range.len());
            for target in [
                CoordinateSystem::ZeroBased,
                CoordinateSystem::ResidueBased,
                CoordinateSystem::SpaceBased,
            ] {
                println!("{}\t{}", target.abbreviation(), range.to_string_in(target));
            }
        }

        Commands::Pileup { reference, reads, quality, gap_quality, threads } => {
            let reference: NucleotideSequence = reference.parse()?;
            let reads = reads
                .iter()
                .enumerate()
                .map(|(i, text)| parse_pileup_read(i, text))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let builder = SliceMapBuilder::from_consensus(&reference)
                .default_quality(Quality(quality))
                .gap_quality_strategy(gap_quality.into());
            let stats = builder.add_reads_parallel(&reads, threads)?;
            let map = builder.build();
            let coverage = CoverageMap::from_reads(&reads);

            println!("#column\tconsensus\tdepth\tbases");
            for (column, slice) in map.iter().enumerate() {
                let bases: Vec<String> = slice
                    .nucleotide_counts()
                    .into_iter()
                    .map(|(base, count)| format!("{}:{}", base, count))
                    .collect();
                println!(
                    "{}\t{}\t{}\t{}",
                    column,
                    slice.consensus().map_or('.', |n| n.to_char()),
                    slice.coverage_depth(),
                    bases.join(",")
                );
            }

            eprintln!("\n=== Pileup Statistics ===");
            eprintln!("Reads:           {}", stats.total);
            eprintln!("Added:           {}", stats.added);
            eprintln!("Skipped:         {}", stats.skipped);
            eprintln!("Max depth:       {}", coverage.max_depth());
            eprintln!("Mean depth:      {:.2}", map.average_coverage());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Codons { reference, reads, edit, range, threads } => {
            let reference: NucleotideSequence = reference.parse()?;
            let reads = reads
                .iter()
                .enumerate()
                .map(|(i, text)| parse_codon_read(i, text))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let edit = edit.as_deref().map(parse_edit).transpose()?;
            let range = range.as_deref().map(str::parse::<Range>).transpose()?;

            let builder = CodonSliceMapBuilder::with_options(&reference, range, edit.as_ref())?;
            if let Some(applied) = builder.rna_edit() {
                eprintln!("Edited reference: {}", applied.edited_reference());
            }
            let stats = builder.add_reads_parallel(&reads, threads)?;
            let map = builder.build();

            println!("#codon\tcolumns\treference\tdepth\tcounts");
            for (index, slice) in map.iter().enumerate() {
                let counts: Vec<String> = slice
                    .elements()
                    .iter()
                    .map(|e| format!("{}:{}", dna::to_string(&e.sequence), e.count))
                    .collect();
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    index,
                    slice.gapped_range(),
                    dna::to_string(slice.reference_sequence()),
                    slice.coverage_depth(),
                    counts.join(",")
                );
            }

            eprintln!("\n=== Codon Statistics ===");
            eprintln!("Reads:           {}", stats.total);
            eprintln!("Added:           {}", stats.added);
            eprintln!("Skipped:         {}", stats.skipped);
            eprintln!("Codons:          {}", map.len());
            eprintln!("Reference span:  {} ({} columns)", map.range(), reference.len());
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
        }
    }

    Ok(())
}
