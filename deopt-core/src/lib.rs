//! # deopt - codon-usage deoptimization
//!
//! Recodes protein-coding sequences with synonymous substitutions so that
//! their Fop (fraction of optimal codons) walks in controlled steps from the
//! native value toward a chosen target. The encoded protein and two
//! configurable end windows never change.
//!
//! ## Features
//!
//! - **Fop scoring** against the bundled *E. coli* profile or any TOML profile
//! - **Hillclimb search** over random synonymous substitutions with a bounded
//!   retry budget
//! - **Stepwise trajectories** recording every intermediate variant
//! - **Reproducible runs** from a seeded ChaCha generator
//! - **Parallel processing** of multi-record FASTA input with Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use deopt_core::{Deoptimizer, config::DeoptConfig};
//!
//! let deoptimizer = Deoptimizer::new(DeoptConfig {
//!     start_window: 1,
//!     end_window: 1,
//!     seed: Some(1),
//!     ..DeoptConfig::default()
//! });
//!
//! let results = deoptimizer.deoptimize_sequence(
//!     &"GCTCTGGGT".repeat(12),
//!     Some("demo".to_string()),
//! )?;
//!
//! for (sequence, description, fop) in results.trajectory.as_tuples() {
//!     println!("{description}\t{fop:.3}\t{}", sequence.len());
//! }
//! # Ok::<(), deopt_core::types::DeoptError>(())
//! ```
//!
//! ## Lower-level use
//!
//! The search can be driven directly with any [`scoring::SequenceScorer`]
//! and any random source:
//!
//! ```rust
//! use deopt_core::optimizer::{deoptimize, CodonOptimizer, StepwiseParams};
//! use deopt_core::scoring::FopScorer;
//! use deopt_core::sequence::{CodingSequence, OptimizationWindow};
//! use rand::SeedableRng;
//!
//! let seq: CodingSequence = "CTG".repeat(30).parse()?;
//! let params = StepwiseParams {
//!     window: OptimizationWindow::new(0, 0),
//!     ..StepwiseParams::default()
//! };
//! let mut rng = rand_chacha::ChaCha20Rng::seed_from_u64(3);
//! let trajectory = deoptimize(&CodonOptimizer::new(FopScorer::default()), &seq, "leu30", &params, &mut rng)?;
//! assert!(trajectory.last().score < trajectory.first().score);
//! # Ok::<(), deopt_core::types::DeoptError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Configuration options and output formats
//! - [`engine`]: High-level [`Deoptimizer`] over sequences and FASTA files
//! - [`genetic_code`]: Standard genetic code and optimal-codon profiles
//! - [`scoring`]: Fop scorer and the scorer trait
//! - [`optimizer`]: Hillclimb search and stepwise driver
//! - [`results`]: Trajectories and per-sequence metadata
//! - [`sequence`]: Coding sequences, windows and FASTA input
//! - [`output`]: FASTA and TSV writers
//! - [`types`]: Amino acids, codons and errors
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, DeoptError>`](types::DeoptError).
//! Validation and scoring errors are returned before any substitution is
//! made. A step that cannot reach its target is not an error; it is recorded
//! with [`optimizer::SearchStatus::Exhausted`], or
//! [`optimizer::SearchStatus::Overshot`] when a substitution jumped past it.

pub mod config;
pub mod constants;
pub mod engine;
pub mod genetic_code;
pub mod optimizer;
pub mod output;
pub mod results;
pub mod scoring;
pub mod sequence;
pub mod types;

pub use engine::Deoptimizer;
pub use types::DeoptError;
