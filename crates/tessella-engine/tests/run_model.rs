//! A cell model driven by the runner, writing into a memory store.

use proptest::prelude::*;
use tessella_cells::{apply_rule_to_all, CellManager, CellTraits, Shuffle, Update};
use tessella_core::{DataError, DatasetHandle};
use tessella_data::MemoryStore;
use tessella_engine::{logging, Model, MonitorScope, RunConfig, RunError, Runner, StopToken};
use tessella_test_utils::fixtures::Counter;
use tessella_test_utils::{manager_from_yaml, model_config, SQUARE_4X4_BOUNDED};

/// Every cell counts up by one per step.
struct Growth {
    cm: CellManager<Counter>,
    store: MemoryStore,
    counts: DatasetHandle,
    stop_at: Option<(u64, StopToken)>,
    steps: u64,
}

impl Growth {
    fn new() -> Self {
        let cm = manager_from_yaml(
            SQUARE_4X4_BOUNDED,
            CellTraits::default().with_default_state_constructor(),
            3,
        )
        .unwrap();
        let mut store = MemoryStore::new();
        cm.write_ids(&mut store, "growth/ids").unwrap();
        let counts = cm
            .create_cell_dataset::<u64, _>(&mut store, "growth/count")
            .unwrap();
        Self {
            cm,
            store,
            counts,
            stop_at: None,
            steps: 0,
        }
    }
}

impl Model for Growth {
    type Error = DataError;

    fn name(&self) -> &str {
        "Growth"
    }

    fn perform_step(&mut self) -> Result<(), DataError> {
        apply_rule_to_all(&mut self.cm, Update::Sync, Shuffle::Off, |cell, _| Counter {
            count: cell.state().count + 1,
        });
        self.steps += 1;
        if let Some((n, token)) = &self.stop_at {
            if self.steps == *n {
                token.stop();
            }
        }
        Ok(())
    }

    fn write_data(&mut self, _time: u64) -> Result<(), DataError> {
        self.cm
            .write_cell_data(&mut self.store, self.counts, |c| c.state().count)
    }

    fn monitor(&self, scope: &mut MonitorScope<'_>) {
        let total: u64 = self.cm.cells().iter().map(|c| c.state().count).sum();
        scope.set("total_count", total);
    }
}

/// A model whose writes always fail.
struct Unwritable;

impl Model for Unwritable {
    type Error = DataError;

    fn name(&self) -> &str {
        "Unwritable"
    }

    fn perform_step(&mut self) -> Result<(), DataError> {
        Ok(())
    }

    fn write_data(&mut self, _time: u64) -> Result<(), DataError> {
        Err(DataError::UnknownHandle { handle: 99 })
    }
}

fn run_config(yaml: &str) -> RunConfig {
    RunConfig::from_config(&model_config(yaml)).unwrap()
}

// ── Scheduling ──────────────────────────────────────────────────

#[test]
fn records_follow_write_schedule() {
    logging::init_for_tests();
    let mut model = Growth::new();
    let mut runner =
        Runner::new(run_config("{ num_steps: 7, write_start: 1, write_every: 3 }")).unwrap();

    let summary = runner.run(&mut model, &StopToken::new()).unwrap();
    assert_eq!(summary.final_time, 7);
    assert_eq!(summary.writes, 3);

    let data = model.store.read::<u64>("growth/count").unwrap();
    assert_eq!(data.shape, vec![16, 3]);
    let firsts: Vec<u64> = data.values.chunks(16).map(|rec| rec[0]).collect();
    assert_eq!(firsts, vec![1, 4, 7]);
    assert!(data.values.chunks(16).all(|rec| rec.iter().all(|&v| v == rec[0])));

    let ids = model.store.read::<u64>("growth/ids").unwrap();
    assert_eq!(ids.values, (0..16).collect::<Vec<u64>>());
}

#[test]
fn initial_state_written_by_default() {
    let mut model = Growth::new();
    Runner::new(run_config("num_steps: 2"))
        .unwrap()
        .run(&mut model, &StopToken::new())
        .unwrap();
    let data = model.store.read::<u64>("growth/count").unwrap();
    assert_eq!(data.shape, vec![16, 3]);
    assert_eq!(data.values[0], 0);
    assert_eq!(data.values[32], 2);
}

#[test]
fn monitor_reports_model_entries() {
    let mut model = Growth::new();
    let mut runner =
        Runner::new(run_config("{ num_steps: 3, monitor_emit_interval: 0 }")).unwrap();
    let summary = runner.run(&mut model, &StopToken::new()).unwrap();
    assert_eq!(summary.monitor_emits, 3);
    assert_eq!(runner.monitor().render(), "{time: 3, Growth.total_count: 48}");
}

// ── Stopping and errors ─────────────────────────────────────────

#[test]
fn stop_request_ends_run_after_current_step() {
    let token = StopToken::new();
    let mut model = Growth::new();
    model.stop_at = Some((4, token.clone()));
    let summary = Runner::new(run_config("num_steps: 1000"))
        .unwrap()
        .run(&mut model, &token)
        .unwrap();
    assert!(summary.stopped);
    assert_eq!(summary.steps, 4);
    assert_eq!(model.store.num_records("growth/count"), Some(5));
    assert!(model.cm.cells().iter().all(|c| c.state().count == 4));
}

#[test]
fn write_error_carries_time() {
    let err = Runner::new(run_config("{ num_steps: 5, write_start: 2 }"))
        .unwrap()
        .run(&mut Unwritable, &StopToken::new())
        .unwrap_err();
    assert_eq!(
        err,
        RunError::WriteData {
            time: 2,
            source: DataError::UnknownHandle { handle: 99 }
        }
    );
    assert!(err.to_string().starts_with("writing data of time 2 failed"));
}

#[test]
fn missing_num_steps_is_a_config_error() {
    let err: RunError<DataError> = RunConfig::from_config(&model_config("seed: 1"))
        .unwrap_err()
        .into();
    assert!(matches!(err, RunError::Config(_)));
}

// ── Properties ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn writes_match_schedule(num_steps in 0u64..30, start in 0u64..10, every in 1u64..5) {
        let cfg = RunConfig { num_steps, write_start: start, write_every: every, ..RunConfig::default() };
        let expected = (0..=num_steps).filter(|&t| cfg.is_write_time(t)).count() as u64;
        let mut model = Growth::new();
        let summary = Runner::new(cfg).unwrap().run(&mut model, &StopToken::new()).unwrap();
        prop_assert_eq!(summary.writes, expected);
        prop_assert_eq!(model.store.num_records("growth/count"), Some(expected as usize));
    }
}
