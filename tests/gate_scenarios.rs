// tests/gate_scenarios.rs

use pipegate::errors::GateError;
use pipegate::gate::{GateAggregator, JobOutcome, RunPhase, Verdict};
use pipegate::types::ConflictPolicy;
use pipegate_test_utils::builders::{JobConfigBuilder, PipelineFileBuilder};
use pipegate_test_utils::init_tracing;

const CELLS: [&str; 3] = ["ubuntu-stable", "ubuntu-beta", "macos-stable"];

/// Gate over a three-cell `test` matrix plus plain `lint` and `cross-check`.
fn tests_pass_gate() -> GateAggregator {
    let cfg = PipelineFileBuilder::new()
        .gate_name("tests-pass")
        .with_job("test", JobConfigBuilder::new().matrix(&CELLS).build())
        .with_job("lint", JobConfigBuilder::new().build())
        .with_job("cross-check", JobConfigBuilder::new().build())
        .build();

    GateAggregator::from_pipeline(&cfg).expect("valid gate")
}

fn record_test_matrix(agg: &mut GateAggregator, outcomes: [JobOutcome; 3]) {
    for (cell, outcome) in CELLS.iter().copied().zip(outcomes) {
        agg.record_outcome("test", Some(cell), outcome).unwrap();
    }
}

#[test]
fn scenario_a_all_success_passes() {
    init_tracing();

    let mut agg = tests_pass_gate();
    record_test_matrix(
        &mut agg,
        [
            JobOutcome::Succeeded,
            JobOutcome::Succeeded,
            JobOutcome::Succeeded,
        ],
    );
    agg.record_outcome("lint", None, JobOutcome::Succeeded).unwrap();
    agg.record_outcome("cross-check", None, JobOutcome::Succeeded)
        .unwrap();

    assert!(agg.is_ready());
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn scenario_b_single_matrix_cell_failure_fails() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .gate_name("tests-pass")
        .with_job("test", JobConfigBuilder::new().matrix(&CELLS).build())
        .with_job("lint", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    record_test_matrix(
        &mut agg,
        [
            JobOutcome::Succeeded,
            JobOutcome::Failed,
            JobOutcome::Succeeded,
        ],
    );
    agg.record_outcome("lint", None, JobOutcome::Succeeded).unwrap();

    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Fail);
}

#[test]
fn scenario_c_skip_is_not_neutral() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().build())
        .with_job("lint", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();
    agg.record_outcome("lint", None, JobOutcome::Skipped).unwrap();

    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Fail);
}

#[test]
fn scenario_d_cancelled_fails() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Cancelled).unwrap();

    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Fail);
}

#[test]
fn scenario_e_late_report_keeps_verdict() {
    init_tracing();

    let mut agg = tests_pass_gate();
    record_test_matrix(
        &mut agg,
        [
            JobOutcome::Succeeded,
            JobOutcome::Succeeded,
            JobOutcome::Succeeded,
        ],
    );
    agg.record_outcome("lint", None, JobOutcome::Succeeded).unwrap();
    agg.record_outcome("cross-check", None, JobOutcome::Succeeded)
        .unwrap();
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);

    let err = agg
        .record_outcome("lint", None, JobOutcome::Failed)
        .unwrap_err();
    assert!(matches!(err, GateError::LateReport { .. }));

    // The verdict is fixed; the late failure changes nothing.
    assert_eq!(agg.verdict(), Some(Verdict::Pass));
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn verdict_before_ready_is_an_error() {
    init_tracing();

    let mut agg = tests_pass_gate();
    agg.record_outcome("lint", None, JobOutcome::Succeeded).unwrap();

    // Three matrix cells plus cross-check are still pending.
    let err = agg.compute_verdict().unwrap_err();
    assert!(matches!(err, GateError::NotReady { pending: 4 }));
    assert_eq!(agg.verdict(), None);
}

#[test]
fn pending_report_does_not_make_a_cell_ready() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    // An in-flight marker is recorded but does not count as finished.
    agg.record_outcome("test", None, JobOutcome::Pending).unwrap();
    assert!(!agg.is_ready());
    assert!(matches!(
        agg.compute_verdict().unwrap_err(),
        GateError::NotReady { pending: 1 }
    ));

    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn phases_follow_collecting_ready_terminal() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().matrix(&["a", "b"]).build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    assert_eq!(agg.current_state(), RunPhase::Collecting);

    agg.record_outcome("test", Some("a"), JobOutcome::Succeeded)
        .unwrap();
    assert_eq!(agg.current_state(), RunPhase::Collecting);

    agg.record_outcome("test", Some("b"), JobOutcome::Succeeded)
        .unwrap();
    assert_eq!(agg.current_state(), RunPhase::Ready);

    agg.compute_verdict().unwrap();
    assert_eq!(agg.current_state(), RunPhase::Terminal);
}

#[test]
fn verdict_is_idempotent_on_terminal_run() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Failed).unwrap();

    let first = agg.compute_verdict().unwrap();
    let second = agg.compute_verdict().unwrap();
    assert_eq!(first, Verdict::Fail);
    assert_eq!(first, second);
    assert_eq!(agg.current_state(), RunPhase::Terminal);
}

#[test]
fn identical_re_report_is_idempotent() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();
    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();

    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn conflicting_terminal_writes_last_write_wins() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .conflict_policy(ConflictPolicy::LastWriteWins)
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();
    let err = agg
        .record_outcome("test", None, JobOutcome::Failed)
        .unwrap_err();
    assert!(matches!(err, GateError::InconsistentWrite { .. }));

    // The conflict is surfaced, but the newer terminal value is kept.
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Fail);
}

#[test]
fn conflicting_terminal_writes_reject_keeps_original() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .conflict_policy(ConflictPolicy::Reject)
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();
    let err = agg
        .record_outcome("test", None, JobOutcome::Failed)
        .unwrap_err();
    assert!(matches!(err, GateError::InconsistentWrite { .. }));

    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn terminal_outcome_is_not_overwritten_by_pending() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();
    let err = agg
        .record_outcome("test", None, JobOutcome::Pending)
        .unwrap_err();
    assert!(matches!(err, GateError::InconsistentWrite { .. }));

    assert!(agg.is_ready());
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn unknown_job_and_cell_are_rejected() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .with_job("test", JobConfigBuilder::new().matrix(&["a"]).build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    assert!(matches!(
        agg.record_outcome("deploy", None, JobOutcome::Succeeded)
            .unwrap_err(),
        GateError::UnknownJob(_)
    ));
    assert!(matches!(
        agg.record_outcome("test", Some("z"), JobOutcome::Succeeded)
            .unwrap_err(),
        GateError::UnknownCell { .. }
    ));
    assert!(matches!(
        agg.record_outcome("test", None, JobOutcome::Succeeded)
            .unwrap_err(),
        GateError::MissingCell(_)
    ));
}

#[test]
fn job_outside_gate_needs_is_acknowledged() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .gate_needs(&["test"])
        .with_job("test", JobConfigBuilder::new().build())
        .with_job("docs", JobConfigBuilder::new().build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    // `docs` is declared but not required by the gate: its failure is noted
    // and ignored, not an error and not part of the verdict.
    agg.record_outcome("docs", None, JobOutcome::Failed).unwrap();
    agg.record_outcome("test", None, JobOutcome::Succeeded).unwrap();

    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Pass);
}

#[test]
fn empty_dependency_set_is_a_configuration_error() {
    init_tracing();

    let err = GateAggregator::new("tests-pass", ConflictPolicy::default(), vec![]).unwrap_err();
    assert!(matches!(err, GateError::ConfigError(_)));
}

#[test]
fn cancel_in_flight_fails_the_gate() {
    init_tracing();

    let mut agg = tests_pass_gate();
    agg.record_outcome("test", Some("ubuntu-stable"), JobOutcome::Succeeded)
        .unwrap();
    agg.record_outcome("lint", None, JobOutcome::Succeeded).unwrap();

    // Host cancels the pipeline: everything still in flight is cancelled.
    let cancelled = agg.cancel_in_flight();
    assert_eq!(cancelled, 3); // two test cells + cross-check

    assert!(agg.is_ready());
    assert_eq!(agg.compute_verdict().unwrap(), Verdict::Fail);
}

#[test]
fn report_lists_failing_cells() {
    init_tracing();

    let cfg = PipelineFileBuilder::new()
        .gate_name("tests-pass")
        .with_job("test", JobConfigBuilder::new().matrix(&["a", "b"]).build())
        .build();
    let mut agg = GateAggregator::from_pipeline(&cfg).unwrap();

    agg.record_outcome("test", Some("a"), JobOutcome::Succeeded)
        .unwrap();
    agg.record_outcome("test", Some("b"), JobOutcome::Skipped)
        .unwrap();
    agg.compute_verdict().unwrap();

    let report = agg.report().unwrap();
    assert_eq!(report.gate(), "tests-pass");
    assert_eq!(report.verdict(), Verdict::Fail);
    assert_eq!(
        report.failing_cells(),
        vec![("test", "b", JobOutcome::Skipped)]
    );

    let rendered = report.to_string();
    assert!(rendered.contains("gate 'tests-pass': FAIL"));
    assert!(rendered.contains("test/b (skipped)"));
}
