//! Synonymous-codon search.
//!
//! ## Modules
//!
//! - [`hillclimb`]: local search toward one target score
//! - [`stepwise`]: sequence of hillclimbs walking the score to a stop value

pub mod hillclimb;
pub mod stepwise;

pub use hillclimb::*;
pub use stepwise::*;

use crate::sequence::{CodingSequence, OptimizationWindow};

/// Panic unless `recoded` encodes the same protein as `original` and leaves
/// both frozen windows untouched.
pub(crate) fn assert_recoding_invariants(
    original: &CodingSequence,
    recoded: &CodingSequence,
    window: OptimizationWindow,
) {
    assert_eq!(
        original.codon_count(),
        recoded.codon_count(),
        "recoding changed the sequence length"
    );
    assert!(
        original.translation() == recoded.translation(),
        "recoding changed the encoded protein"
    );

    let n = original.codon_count();
    let head = window.start.min(n);
    let tail = n - window.end.min(n);
    assert!(
        original.codons()[..head] == recoded.codons()[..head],
        "recoding touched the first {} codons",
        window.start
    );
    assert!(
        original.codons()[tail..] == recoded.codons()[tail..],
        "recoding touched the last {} codons",
        window.end
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariants_hold_for_synonymous_change() {
        let a: CodingSequence = "CTGCTGCTG".parse().unwrap();
        let b: CodingSequence = "CTGTTACTG".parse().unwrap();
        assert_recoding_invariants(&a, &b, OptimizationWindow::new(1, 1));
    }

    #[test]
    #[should_panic(expected = "encoded protein")]
    fn test_invariants_catch_protein_change() {
        let a: CodingSequence = "CTGCTGCTG".parse().unwrap();
        let b: CodingSequence = "CTGAAACTG".parse().unwrap();
        assert_recoding_invariants(&a, &b, OptimizationWindow::new(0, 0));
    }

    #[test]
    #[should_panic(expected = "last 1 codons")]
    fn test_invariants_catch_window_change() {
        let a: CodingSequence = "CTGCTGCTG".parse().unwrap();
        let b: CodingSequence = "CTGCTGTTA".parse().unwrap();
        assert_recoding_invariants(&a, &b, OptimizationWindow::new(1, 1));
    }
}
