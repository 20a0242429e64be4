// tests/property_aggregator.rs

use proptest::prelude::*;

use pipegate::gate::{GateAggregator, JobOutcome, Verdict};
use pipegate::types::ConflictPolicy;

fn terminal_outcome() -> impl Strategy<Value = JobOutcome> {
    prop_oneof![
        Just(JobOutcome::Succeeded),
        Just(JobOutcome::Failed),
        Just(JobOutcome::Skipped),
        Just(JobOutcome::Cancelled),
    ]
}

/// A grid of outcomes: one inner vec per job, one entry per matrix cell.
fn outcome_grid() -> impl Strategy<Value = Vec<Vec<JobOutcome>>> {
    proptest::collection::vec(
        proptest::collection::vec(terminal_outcome(), 1..4),
        1..5,
    )
}

fn build_gate(grid: &[Vec<JobOutcome>]) -> GateAggregator {
    let deps = grid
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let name = format!("job_{i}");
            let cell_names = (0..cells.len()).map(|j| format!("cell_{j}")).collect();
            (name, cell_names)
        })
        .collect();

    GateAggregator::new("gate", ConflictPolicy::default(), deps).expect("non-empty deps")
}

/// Flatten the grid into `(job index, cell index, outcome)` records.
fn flatten(grid: &[Vec<JobOutcome>]) -> Vec<(usize, usize, JobOutcome)> {
    grid.iter()
        .enumerate()
        .flat_map(|(i, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(j, outcome)| (i, j, *outcome))
        })
        .collect()
}

proptest! {
    /// Strict conjunction: the verdict is Pass exactly when every cell of
    /// every job succeeded, regardless of the order outcomes arrive in.
    #[test]
    fn verdict_is_strict_conjunction(
        (grid, order) in outcome_grid().prop_flat_map(|grid| {
            let records = flatten(&grid);
            (Just(grid), Just(records).prop_shuffle())
        })
    ) {
        let mut agg = build_gate(&grid);

        prop_assert!(!agg.is_ready());

        for (i, j, outcome) in order {
            agg.record_outcome(
                &format!("job_{i}"),
                Some(&format!("cell_{j}")),
                outcome,
            ).unwrap();
        }

        prop_assert!(agg.is_ready());

        let expected = if grid
            .iter()
            .flatten()
            .all(|o| *o == JobOutcome::Succeeded)
        {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        let verdict = agg.compute_verdict().unwrap();
        prop_assert_eq!(verdict, expected);

        // Idempotent on the terminal run.
        prop_assert_eq!(agg.compute_verdict().unwrap(), expected);
    }

    /// Before every cell has reported, `compute_verdict` always refuses with
    /// `NotReady` and never fixes a verdict.
    #[test]
    fn no_partial_verdicts(
        grid in outcome_grid(),
        holdback in any::<proptest::sample::Index>(),
    ) {
        let records = flatten(&grid);
        let skip = holdback.index(records.len());

        let mut agg = build_gate(&grid);

        for (k, (i, j, outcome)) in records.iter().enumerate() {
            if k == skip {
                continue;
            }
            agg.record_outcome(
                &format!("job_{i}"),
                Some(&format!("cell_{j}")),
                *outcome,
            ).unwrap();
        }

        prop_assert!(!agg.is_ready());
        prop_assert!(agg.compute_verdict().is_err());
        prop_assert!(agg.verdict().is_none());
    }
}
