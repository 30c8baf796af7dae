use rand::Rng;

use crate::constants::{
    DEFAULT_END_WINDOW, DEFAULT_FOP_STEP, DEFAULT_FOP_STOP, DEFAULT_MAX_WAIT_COUNT,
    DEFAULT_START_WINDOW, DEFAULT_TOLERANCE, SCORE_EPSILON, SCORE_PRECISION,
};
use crate::optimizer::hillclimb::{CodonOptimizer, Direction, HillclimbParams, SearchStatus};
use crate::results::{Trajectory, TrajectoryRecord};
use crate::scoring::SequenceScorer;
use crate::sequence::{CodingSequence, OptimizationWindow};
use crate::types::DeoptError;

/// Parameters of a whole deoptimization trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepwiseParams {
    /// Signed Fop increment per step; the sign sets the direction of travel
    pub fop_step: f64,
    /// Fop the trajectory ends at
    pub fop_stop: f64,
    pub window: OptimizationWindow,
    pub tolerance: f64,
    /// Retry budget of each hillclimb, reset at every step
    pub max_wait_count: usize,
}

impl Default for StepwiseParams {
    fn default() -> Self {
        Self {
            fop_step: DEFAULT_FOP_STEP,
            fop_stop: DEFAULT_FOP_STOP,
            window: OptimizationWindow::new(DEFAULT_START_WINDOW, DEFAULT_END_WINDOW),
            tolerance: DEFAULT_TOLERANCE,
            max_wait_count: DEFAULT_MAX_WAIT_COUNT,
        }
    }
}

impl StepwiseParams {
    /// Validate every parameter against a sequence of `nucleotides` length.
    ///
    /// # Errors
    ///
    /// A step smaller in magnitude than [`SCORE_EPSILON`] is rejected as
    /// [`DeoptError::InvalidFopStep`] along with steps outside `(-1, 1)`.
    ///
    /// In order of checking: [`DeoptError::InvalidSequenceLength`],
    /// [`DeoptError::InvalidFopStep`], [`DeoptError::InvalidFopStop`],
    /// [`DeoptError::InvalidTolerance`], [`DeoptError::InvalidMaxWait`], then
    /// the window errors of [`OptimizationWindow::validate`].
    pub fn validate(&self, nucleotides: usize) -> Result<(), DeoptError> {
        if nucleotides % 3 != 0 {
            return Err(DeoptError::InvalidSequenceLength(nucleotides));
        }
        let step = self.fop_step.abs();
        if !(step >= SCORE_EPSILON && step < 1.0) {
            return Err(DeoptError::InvalidFopStep(self.fop_step));
        }
        if !(self.fop_stop > 0.0 && self.fop_stop < 1.0) {
            return Err(DeoptError::InvalidFopStop(self.fop_stop));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(DeoptError::InvalidTolerance(self.tolerance));
        }
        if self.max_wait_count == 0 {
            return Err(DeoptError::InvalidMaxWait);
        }
        self.window.validate(nucleotides)
    }

    /// Whether `value` lies beyond `fop_stop` in the direction of travel.
    fn is_past_stop(&self, value: f64) -> bool {
        self.fop_step * (self.fop_stop - value) < 0.0
    }

    /// Hillclimb target for a running target, and whether it is the last one.
    fn step_target(&self, running: f64) -> (f64, bool) {
        let nominal = running + self.tolerance.copysign(self.fop_step);
        if self.is_past_stop(running) {
            return (nominal.clamp(0.0, 1.0), true);
        }
        if self.is_past_stop(nominal) || nominal == self.fop_stop {
            return (self.fop_stop, true);
        }
        (nominal.clamp(0.0, 1.0), false)
    }

    fn advance(&self, running: f64) -> f64 {
        let next = running + self.fop_step;
        // A step lost to float rounding would never reach the stop
        if self.is_past_stop(next) || next == running {
            self.fop_stop
        } else {
            next
        }
    }

    /// Step targets a trajectory starting at `initial_fop` will aim for.
    ///
    /// Targets depend only on the starting score, never on what earlier
    /// steps achieved.
    ///
    /// ```rust
    /// use deopt_core::optimizer::StepwiseParams;
    ///
    /// let params = StepwiseParams {
    ///     fop_step: -0.2,
    ///     fop_stop: 0.3,
    ///     ..StepwiseParams::default()
    /// };
    /// let targets = params.schedule(0.8);
    /// assert_eq!(targets.len(), 4);
    /// assert!((targets[0] - 0.79).abs() < 1e-12);
    /// assert!((targets[2] - 0.39).abs() < 1e-12);
    /// // The last step is shortened to land on the stop value
    /// assert_eq!(targets[3], 0.3);
    /// ```
    #[must_use]
    pub fn schedule(&self, initial_fop: f64) -> Vec<f64> {
        let mut targets = Vec::new();
        let mut running = initial_fop;
        loop {
            let (target, last) = self.step_target(running);
            targets.push(target);
            if last {
                return targets;
            }
            running = self.advance(running);
        }
    }
}

/// Walk the Fop of `sequence` to `params.fop_stop` in steps of
/// `params.fop_step`, recording every intermediate variant.
///
/// The first record is the untouched input. Each later record is the result
/// of one hillclimb toward the next scheduled target, started from the
/// previous record. The search direction of a step is chosen from the score
/// actually reached so far, so an overshoot is corrected on the next step.
/// Steps whose hillclimb runs out of patience or jumps past its target are
/// kept and flagged.
///
/// # Errors
///
/// Every validation and scoring error is returned before any substitution
/// is attempted.
///
/// # Panics
///
/// If the final variant no longer encodes the input protein.
///
/// # Examples
///
/// ```rust
/// use deopt_core::optimizer::{deoptimize, CodonOptimizer, StepwiseParams};
/// use deopt_core::scoring::FopScorer;
/// use deopt_core::sequence::{CodingSequence, OptimizationWindow};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let optimizer = CodonOptimizer::new(FopScorer::default());
/// let seq: CodingSequence = "GCT".repeat(40).parse()?;
/// let params = StepwiseParams {
///     window: OptimizationWindow::new(5, 5),
///     ..StepwiseParams::default()
/// };
///
/// let mut rng = ChaCha20Rng::seed_from_u64(2024);
/// let trajectory = deoptimize(&optimizer, &seq, "ala40", &params, &mut rng)?;
///
/// assert_eq!(trajectory.first().score, 1.0);
/// assert!(trajectory.last().score < 0.5);
/// # Ok::<(), deopt_core::types::DeoptError>(())
/// ```
pub fn deoptimize<S: SequenceScorer, R: Rng + ?Sized>(
    optimizer: &CodonOptimizer<S>,
    sequence: &CodingSequence,
    label: &str,
    params: &StepwiseParams,
    rng: &mut R,
) -> Result<Trajectory, DeoptError> {
    params.validate(sequence.len())?;
    let initial_fop = optimizer.scorer().score(sequence)?;

    let mut trajectory = Trajectory::new(TrajectoryRecord {
        sequence: sequence.clone(),
        score: initial_fop,
        description: format!(
            "{label} -- Fop = {initial_fop:.prec$}",
            prec = SCORE_PRECISION
        ),
        target: None,
        status: None,
    });

    let schedule = params.schedule(initial_fop);
    log::debug!(
        "{label}: native Fop {initial_fop:.4}, {} steps toward {}",
        schedule.len(),
        params.fop_stop
    );

    let mut current = sequence.clone();
    let mut score = initial_fop;
    for (step, target) in schedule.into_iter().enumerate() {
        let hillclimb = HillclimbParams {
            window: params.window,
            target,
            tolerance: params.tolerance,
            max_wait_count: params.max_wait_count,
            direction: Direction::toward(score, target),
        };
        let outcome = optimizer.hillclimb(&current, &hillclimb, rng)?;

        let mut description = format!(
            "{label} -- recoded to Fop = {:.prec$} (keeping first {} and last {} codons unchanged)",
            outcome.score,
            params.window.start,
            params.window.end,
            prec = SCORE_PRECISION
        );
        match outcome.status {
            SearchStatus::Converged => log::info!(
                "{label}: step {} reached Fop {:.4} (target {target:.4})",
                step + 1,
                outcome.score
            ),
            SearchStatus::Exhausted => {
                log::warn!(
                    "{label}: step {} stopped at Fop {:.4} without reaching {target:.4} after {} attempts",
                    step + 1,
                    outcome.score,
                    outcome.attempts
                );
                description.push_str(&format!(
                    " [target {target:.prec$} not reached]",
                    prec = SCORE_PRECISION
                ));
            }
            SearchStatus::Overshot => {
                log::info!(
                    "{label}: step {} crossed target {target:.4} to Fop {:.4}",
                    step + 1,
                    outcome.score
                );
                description.push_str(&format!(
                    " [target {target:.prec$} overshot]",
                    prec = SCORE_PRECISION
                ));
            }
        }

        current = outcome.sequence;
        score = outcome.score;
        trajectory.push(TrajectoryRecord {
            sequence: current.clone(),
            score,
            description,
            target: Some(target),
            status: Some(outcome.status),
        });
    }

    assert!(
        trajectory.first().sequence.translation() == trajectory.last().sequence.translation(),
        "{label}: final variant no longer encodes the input protein"
    );

    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FopScorer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn seq(s: &str) -> CodingSequence {
        s.parse().unwrap()
    }

    fn optimizer() -> CodonOptimizer<FopScorer> {
        CodonOptimizer::new(FopScorer::default())
    }

    fn params(start: usize, end: usize) -> StepwiseParams {
        StepwiseParams {
            window: OptimizationWindow::new(start, end),
            max_wait_count: 500,
            ..StepwiseParams::default()
        }
    }

    /// 30 scored codons, all optimal: Leu, Ala, Ser, Gly, Val repeated.
    fn all_optimal_30() -> CodingSequence {
        seq(&"CTGGCTTCTGGTGTT".repeat(6))
    }

    fn assert_trajectory_invariants(
        original: &CodingSequence,
        trajectory: &Trajectory,
        window: OptimizationWindow,
    ) {
        let n = original.codon_count();
        for record in trajectory {
            assert_eq!(record.sequence.len() % 3, 0);
            assert_eq!(record.sequence.translation(), original.translation());
            assert_eq!(record.sequence.codons()[..window.start], original.codons()[..window.start]);
            assert_eq!(
                record.sequence.codons()[n - window.end..],
                original.codons()[n - window.end..]
            );
            assert!((0.0..=1.0).contains(&record.score));
        }
    }

    #[test]
    fn test_default_params() {
        let p = StepwiseParams::default();
        assert_eq!(p.fop_step, -0.1);
        assert_eq!(p.fop_stop, 0.1);
        assert_eq!(p.window, OptimizationWindow::new(14, 14));
        assert_eq!(p.tolerance, 0.01);
        assert_eq!(p.max_wait_count, 5000);
    }

    #[test]
    fn test_validate_rejects_zero_step() {
        let p = StepwiseParams {
            fop_step: 0.0,
            ..params(0, 0)
        };
        assert!(matches!(p.validate(90), Err(DeoptError::InvalidFopStep(_))));
    }

    #[test]
    fn test_validate_parameter_ranges() {
        let base = params(0, 0);
        let cases = [
            StepwiseParams { fop_step: 1.0, ..base },
            StepwiseParams { fop_step: -1.5, ..base },
            StepwiseParams { fop_step: f64::NAN, ..base },
        ];
        for p in cases {
            assert!(matches!(p.validate(90), Err(DeoptError::InvalidFopStep(_))));
        }
        for stop in [0.0, 1.0, -0.2, f64::NAN] {
            let p = StepwiseParams { fop_stop: stop, ..base };
            assert!(matches!(p.validate(90), Err(DeoptError::InvalidFopStop(_))));
        }
        let p = StepwiseParams { tolerance: -0.01, ..base };
        assert!(matches!(p.validate(90), Err(DeoptError::InvalidTolerance(_))));
        let p = StepwiseParams { max_wait_count: 0, ..base };
        assert!(matches!(p.validate(90), Err(DeoptError::InvalidMaxWait)));
        assert!(matches!(base.validate(91), Err(DeoptError::InvalidSequenceLength(91))));
    }

    #[test]
    fn test_validate_rejects_step_below_score_resolution() {
        for step in [-1e-17, 1e-12, -5e-10] {
            let p = StepwiseParams { fop_step: step, ..params(0, 0) };
            assert!(matches!(p.validate(300), Err(DeoptError::InvalidFopStep(_))));
        }
        let p = StepwiseParams { fop_step: -SCORE_EPSILON, ..params(0, 0) };
        assert!(p.validate(300).is_ok());
    }

    #[test]
    fn test_schedule_terminates_when_step_is_lost_to_rounding() {
        // Adding -1e-17 to 0.5 leaves 0.5 unchanged
        let p = StepwiseParams {
            fop_step: -1e-17,
            ..params(0, 0)
        };
        let targets = p.schedule(0.5);
        assert_eq!(targets.len(), 2);
        assert!((targets[0] - 0.49).abs() < 1e-12);
        assert_eq!(targets[1], 0.1);
    }

    #[test]
    fn test_validation_reports_step_before_window() {
        let p = StepwiseParams {
            fop_step: 0.0,
            ..params(50, 50)
        };
        assert!(matches!(p.validate(30), Err(DeoptError::InvalidFopStep(_))));
    }

    #[test]
    fn test_windows_exhaust_28_codon_sequence() {
        let s = seq(&"CTG".repeat(28));
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let result = deoptimize(&optimizer(), &s, "short", &params(14, 14), &mut rng);
        assert!(matches!(
            result,
            Err(DeoptError::WindowsExhaustSequence {
                start: 14,
                end: 14,
                codons: 28
            })
        ));
    }

    #[test]
    fn test_unscorable_sequence_fails_before_search() {
        let s = seq(&"ATGTGGAAA".repeat(4));
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let result = deoptimize(&optimizer(), &s, "unscorable", &params(0, 0), &mut rng);
        assert!(matches!(result, Err(DeoptError::NoScorableCodons)));
    }

    #[test]
    fn test_schedule_downward_from_one() {
        let targets = params(0, 0).schedule(1.0);
        assert_eq!(targets.len(), 10);
        assert!((targets[0] - 0.99).abs() < 1e-9);
        assert!((targets[8] - 0.19).abs() < 1e-9);
        assert_eq!(targets[9], 0.1);
    }

    #[test]
    fn test_schedule_is_strictly_monotonic() {
        for (step, stop, initial) in [(-0.1, 0.1, 0.73), (0.07, 0.85, 0.12), (-0.25, 0.2, 0.95)] {
            let p = StepwiseParams {
                fop_step: step,
                fop_stop: stop,
                ..params(0, 0)
            };
            let targets = p.schedule(initial);
            assert_eq!(*targets.last().unwrap(), stop);
            for pair in targets.windows(2) {
                let delta = (pair[1] - pair[0]) * step.signum();
                assert!(delta > 0.0, "targets {targets:?} not monotonic");
                assert!(delta <= step.abs() + 1e-9, "step {delta} too large in {targets:?}");
            }
            let full_steps = &targets[..targets.len() - 1];
            for pair in full_steps.windows(2) {
                assert!(((pair[1] - pair[0]).abs() - step.abs()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_schedule_started_past_stop_is_single_step() {
        // Native Fop already below the stop when walking down
        let targets = params(0, 0).schedule(0.05);
        assert_eq!(targets.len(), 1);
        assert!((targets[0] - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_schedule_lands_on_stop_when_nominal_equals_it() {
        let p = StepwiseParams {
            fop_step: 0.25,
            fop_stop: 0.75,
            tolerance: 0.25,
            ..params(0, 0)
        };
        assert_eq!(p.schedule(0.5), vec![0.75]);
    }

    #[test]
    fn test_scenario_thirty_codons_down_to_tenth() {
        let original = all_optimal_30();
        let p = params(0, 0);
        let mut rng = ChaCha20Rng::seed_from_u64(1234);
        let trajectory = deoptimize(&optimizer(), &original, "thirty", &p, &mut rng).unwrap();

        assert_eq!(trajectory.first().score, 1.0);
        assert_eq!(trajectory.first().sequence, original);
        assert!((trajectory.last().score - 0.1).abs() <= 0.01 + 1e-9);
        assert!(trajectory.converged());
        assert_eq!(trajectory.len(), 11);
        assert_trajectory_invariants(&original, &trajectory, p.window);
    }

    #[test]
    fn test_trajectory_respects_windows() {
        let original = seq(&"CTGGCTTCTGGTGTTCGTACTATC".repeat(8));
        let p = StepwiseParams {
            fop_step: -0.2,
            fop_stop: 0.4,
            ..params(14, 14)
        };
        let mut rng = ChaCha20Rng::seed_from_u64(77);
        let trajectory = deoptimize(&optimizer(), &original, "windowed", &p, &mut rng).unwrap();
        assert_trajectory_invariants(&original, &trajectory, p.window);
        assert!(trajectory.last().score < trajectory.first().score);
    }

    #[test]
    fn test_upward_trajectory() {
        // All non-optimal Leu and Ala
        let original = seq(&"CTAGCA".repeat(20));
        let p = StepwiseParams {
            fop_step: 0.25,
            fop_stop: 0.8,
            ..params(0, 0)
        };
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let trajectory = deoptimize(&optimizer(), &original, "up", &p, &mut rng).unwrap();
        assert_eq!(trajectory.first().score, 0.0);
        assert!((trajectory.last().score - 0.8).abs() <= 0.01 + 1e-9);
        assert_trajectory_invariants(&original, &trajectory, p.window);
    }

    #[test]
    fn test_exhausted_steps_are_recorded_not_fatal() {
        // Scored codons only in the frozen windows, Met/Trp in between
        let original = seq(&format!("{}{}{}", "CTG".repeat(3), "ATGTGG".repeat(5), "CTA".repeat(3)));
        let p = StepwiseParams {
            max_wait_count: 25,
            ..params(3, 3)
        };
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        let trajectory = deoptimize(&optimizer(), &original, "frozen", &p, &mut rng).unwrap();

        assert!(!trajectory.converged());
        assert_eq!(trajectory.len(), 6);
        // 0.49 is within tolerance of the native 0.5; nothing below is reachable
        let mut steps = trajectory.steps();
        assert_eq!(steps.next().unwrap().status, Some(SearchStatus::Converged));
        for record in steps {
            assert_eq!(record.status, Some(SearchStatus::Exhausted));
            assert!(record.description.ends_with("not reached]"));
        }
        for record in &trajectory {
            assert_eq!(record.score, 0.5);
            assert_eq!(record.sequence, original);
        }
    }

    #[test]
    fn test_overshoot_is_corrected_on_next_step() {
        // Four scored codons: Fop only takes values 0, 0.25, 0.5, 0.75 and 1
        let original = seq("CTGCTGCTGCTG");
        let p = StepwiseParams {
            fop_stop: 0.7,
            ..params(0, 0)
        };
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let trajectory = deoptimize(&optimizer(), &original, "coarse", &p, &mut rng).unwrap();

        let targets = trajectory.targets();
        assert_eq!(targets.len(), 4);
        assert_eq!(targets[3], 0.7);

        let steps: Vec<_> = trajectory.steps().collect();
        let statuses: Vec<_> = steps.iter().map(|r| r.status.unwrap()).collect();
        assert_eq!(
            statuses,
            vec![
                SearchStatus::Converged,
                SearchStatus::Overshot,
                SearchStatus::Overshot,
                SearchStatus::Overshot
            ]
        );
        let scores: Vec<_> = steps.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![1.0, 0.75, 1.0, 0.5]);

        // 0.75 undershoots the 0.79 target, so the next step climbs
        assert!(scores[2] > scores[1]);
        assert!(steps[1].description.ends_with("overshot]"));
        assert!(!trajectory.converged());
        assert_trajectory_invariants(&original, &trajectory, p.window);
    }

    #[test]
    fn test_annotations() {
        let original = all_optimal_30();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let p = StepwiseParams {
            fop_step: -0.5,
            fop_stop: 0.5,
            ..params(1, 2)
        };
        let trajectory = deoptimize(&optimizer(), &original, "gene1 test", &p, &mut rng).unwrap();
        assert_eq!(trajectory.first().description, "gene1 test -- Fop = 1.000000");
        assert_eq!(trajectory.len(), 3);
        let last = trajectory.last();
        assert_eq!(last.target, Some(0.5));
        assert_eq!(
            last.description,
            format!(
                "gene1 test -- recoded to Fop = {:.6} (keeping first 1 and last 2 codons unchanged)",
                last.score
            )
        );
    }

    #[test]
    fn test_reproducible_with_seed() {
        let original = all_optimal_30();
        let p = params(2, 2);
        let a = deoptimize(&optimizer(), &original, "a", &p, &mut ChaCha20Rng::seed_from_u64(8)).unwrap();
        let b = deoptimize(&optimizer(), &original, "a", &p, &mut ChaCha20Rng::seed_from_u64(8)).unwrap();
        let seqs_a: Vec<_> = a.as_tuples().map(|t| t.0).collect();
        let seqs_b: Vec<_> = b.as_tuples().map(|t| t.0).collect();
        assert_eq!(seqs_a, seqs_b);
    }
}
