//! Cell managers built from YAML, driven through data, selection and rules.

use proptest::prelude::*;
use tessella_cells::{
    apply_rule_to_all, select_cells, select_cells_from_config, CellManager, CellManagerError,
    CellState, CellTraits, Selection, Shuffle, Update,
};
use tessella_core::{CellId, DataError, DataSink};
use tessella_data::MemoryStore;
use tessella_space::{GridError, NbMode, NbParams};
use tessella_test_utils::fixtures::{Bare, Counter, Opinion};
use tessella_test_utils::{
    manager_from_yaml, model_config, seeded_rng, FailingSource, SQUARE_4X4_BOUNDED,
    SQUARE_4X8_PERIODIC, TRIANGULAR,
};

fn with_cell_params(base: &str, params: &str) -> String {
    format!("{base}  cell_params: {params}\n")
}

// ── Construction ────────────────────────────────────────────────

#[test]
fn periodic_4x8_end_to_end() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ initial_count: 3 }");
    let mut mgr: CellManager<Counter> =
        manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();

    assert_eq!(mgr.len(), 32);
    assert_eq!(mgr.grid().shape().as_slice(), &[4, 8]);
    assert!(mgr.cells().iter().all(|c| c.state().count == 3));
    assert_eq!(mgr.nb_mode(), NbMode::VonNeumann);
    assert!(mgr.has_neighbor_cache());
    assert!(mgr.boundary_cells_by_name("all").unwrap().is_empty());

    // Every cell has four distinct neighbors on a periodic 4x8 grid.
    for cell in mgr.cells() {
        let mut nb = mgr.neighbor_ids(cell.id()).into_owned();
        nb.sort();
        nb.dedup();
        assert_eq!(nb.len(), 4);
        assert!(!nb.contains(&cell.id()));
    }

    // Each step, every cell adds the number of neighbors with an even count.
    apply_rule_to_all(&mut mgr, Update::Sync, Shuffle::On, |cell, mgr| {
        let even = mgr
            .neighbors_of(cell.id())
            .iter()
            .filter(|nb| nb.state().count % 2 == 0)
            .count() as u64;
        Counter {
            count: cell.state().count + even,
        }
    });
    assert!(mgr.cells().iter().all(|c| c.state().count == 3));

    let picked = select_cells(&mut mgr, &Selection::Sample(7)).unwrap();
    assert_eq!(picked.len(), 7);
}

#[test]
fn random_states_are_seeded() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ min: -1.0, max: 1.0 }");
    let a: CellManager<Opinion> = manager_from_yaml(&yaml, CellTraits::default(), 5).unwrap();
    let b: CellManager<Opinion> = manager_from_yaml(&yaml, CellTraits::default(), 5).unwrap();
    let values = |m: &CellManager<Opinion>| m.cells().iter().map(|c| c.state().value).collect::<Vec<_>>();

    assert_eq!(values(&a), values(&b));
    assert!(values(&a).iter().all(|v| (-1.0..1.0).contains(v)));
    assert!(values(&a).windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn default_constructor_flag_ignores_params() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ initial_count: 3 }");
    let traits = CellTraits::default().with_default_state_constructor();
    let mgr: CellManager<Counter> = manager_from_yaml(&yaml, traits, 1).unwrap();
    assert!(mgr.cells().iter().all(|c| c.state().count == 0));
}

#[test]
fn state_without_constructor_fails() {
    let err = manager_from_yaml::<Bare>(SQUARE_4X8_PERIODIC, CellTraits::default(), 1).unwrap_err();
    assert!(matches!(err, CellManagerError::MissingInitialState { .. }));
}

#[test]
fn triangular_manager_fails() {
    let err = manager_from_yaml::<Counter>(
        &with_cell_params(TRIANGULAR, "{ initial_count: 0 }"),
        CellTraits::default(),
        1,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        CellManagerError::Grid(GridError::NotImplemented { .. })
    ));
}

#[test]
fn von_neumann_unsupported_on_triangular_grid() {
    let cfg = model_config(TRIANGULAR);
    let space = tessella_space::Space::from_config(&cfg.require("space").unwrap()).unwrap();
    let grid = tessella_space::create_grid(
        std::sync::Arc::new(space),
        &cfg.require("cell_manager").unwrap().require("grid").unwrap(),
    )
    .unwrap();
    assert!(matches!(
        grid.nb_func(NbMode::VonNeumann, NbParams::default()),
        Err(GridError::UnsupportedNeighborhood { .. })
    ));
}

// ── Loading states ──────────────────────────────────────────────

#[test]
fn states_load_in_index_order() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ initial_count: 0 }");
    let mut mgr: CellManager<Counter> = manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();
    let mut store = MemoryStore::new();
    store
        .insert_array("init/count", &[4, 8], &(0..32u64).collect::<Vec<_>>())
        .unwrap();

    mgr.set_cell_states(&store, "init/count", |cell, v: u64| cell.state_mut().count = v)
        .unwrap();
    assert!(mgr
        .cells()
        .iter()
        .all(|c| c.state().count == c.id().index() as u64));
}

/// A default-constructed state with one float and one flag.
#[derive(Clone, Debug, Default, PartialEq)]
struct Mixed {
    a_double: f64,
    a_bool: bool,
}

impl CellState for Mixed {
    const DEFAULT: bool = true;

    fn default_state() -> Option<Self> {
        Some(Self::default())
    }
}

#[test]
fn bounded_4x8_loads_float_and_bool_states() {
    let yaml = "space: { periodic: false, extent: [4., 8.] }\n\
                cell_manager: { grid: { structure: square, resolution: 1 } }\n";
    let mut mgr: CellManager<Mixed> =
        CellManager::from_config(&model_config(yaml), CellTraits::default(), seeded_rng(0))
            .unwrap();
    assert_eq!(mgr.grid().shape().as_slice(), &[4, 8]);
    assert_eq!(mgr.len(), 32);
    assert!(mgr.cells().iter().all(|c| *c.state() == Mixed::default()));

    let mut store = MemoryStore::new();
    let ids: Vec<f64> = (0..32).map(f64::from).collect();
    store.insert_array("init/a_double", &[4, 8], &ids).unwrap();
    store.insert_array("init/a_bool", &[4, 8], &[true; 32]).unwrap();

    mgr.set_cell_states(&store, "init/a_double", |cell, v: f64| {
        cell.state_mut().a_double = v
    })
    .unwrap();
    mgr.set_cell_states(&store, "init/a_bool", |cell, v: bool| cell.state_mut().a_bool = v)
        .unwrap();

    for cell in mgr.cells() {
        assert_eq!(cell.state().a_double, cell.id().index() as f64);
        assert!(cell.state().a_bool);
    }
}

#[test]
fn mismatched_shape_is_rejected() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ initial_count: 0 }");
    let mut mgr: CellManager<Counter> = manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();
    let mut store = MemoryStore::new();
    store.insert_array("init/count", &[4, 4], &[1u64; 16]).unwrap();

    let err = mgr
        .set_cell_states(&store, "init/count", |cell, v: u64| cell.state_mut().count = v)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "data error: Shape mismatch between loaded data (4, 4) and grid (4, 8)!"
    );
    assert!(mgr.cells().iter().all(|c| c.state().count == 0));
}

#[test]
fn load_failures_propagate() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ initial_count: 0 }");
    let mut mgr: CellManager<Counter> = manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();
    let err = mgr
        .set_cell_states(&FailingSource::new("disk on fire"), "x", |_, _: f64| {})
        .unwrap_err();
    assert!(matches!(
        err,
        CellManagerError::Data(DataError::LoadFailed { ref reason, .. }) if reason == "disk on fire"
    ));
}

// ── Output ──────────────────────────────────────────────────────

#[test]
fn cell_data_is_written_per_record() {
    let yaml = with_cell_params(SQUARE_4X4_BOUNDED, "{ initial_count: 2 }");
    let mut mgr: CellManager<Counter> = manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();
    let mut store = MemoryStore::new();

    mgr.write_ids(&mut store, "cells/ids").unwrap();
    mgr.write_positions(&mut store, "cells/positions").unwrap();
    let h = mgr.create_cell_dataset::<u64, _>(&mut store, "cells/count").unwrap();
    mgr.write_cell_data(&mut store, h, |c| c.state().count).unwrap();
    apply_rule_to_all(&mut mgr, Update::Sync, Shuffle::Off, |c, _| Counter {
        count: c.state().count * 2,
    });
    mgr.write_cell_data(&mut store, h, |c| c.state().count).unwrap();

    let ids = store.read::<usize>("cells/ids").unwrap();
    assert_eq!(ids.shape, vec![16, 1]);
    assert_eq!(ids.values, (0..16).collect::<Vec<_>>());

    let pos = store.read::<f64>("cells/positions").unwrap();
    assert_eq!(pos.shape, vec![2, 16, 1]);
    assert_eq!(&pos.values[10..12], &[1.5, 1.5]);

    let count = store.read::<u64>("cells/count").unwrap();
    assert_eq!(count.shape, vec![16, 2]);
    assert_eq!(count.values[0], 2);
    assert_eq!(count.values[16], 4);

    assert!(matches!(
        mgr.write_cell_data(&mut store, h, |c| c.state().count as f64),
        Err(DataError::TypeMismatch { .. })
    ));
    assert!(store.create_dataset("cells/ids", &[16], tessella_core::ElementKind::UInt).is_err());
}

#[test]
fn stored_positions_locate_their_cells() {
    let yaml = with_cell_params(SQUARE_4X8_PERIODIC, "{ initial_count: 0 }");
    let mgr: CellManager<Counter> = manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();
    let mut store = MemoryStore::new();
    mgr.write_ids(&mut store, "ids").unwrap();
    mgr.write_positions(&mut store, "positions").unwrap();

    let ids = store.read::<usize>("ids").unwrap().values;
    let pos = store.read::<f64>("positions").unwrap().values;
    for (id, xy) in ids.iter().zip(pos.chunks(2)) {
        assert_eq!(mgr.cell_at(xy).unwrap(), CellId(*id));
    }
}

// ── Selection ───────────────────────────────────────────────────

#[test]
fn selection_from_config_on_bounded_grid() {
    let yaml = with_cell_params(SQUARE_4X4_BOUNDED, "{ initial_count: 0 }");
    let mut mgr: CellManager<Counter> = manager_from_yaml(&yaml, CellTraits::default(), 1).unwrap();
    let cfg = model_config("{ mode: boundary, boundary: right }");
    assert_eq!(
        select_cells_from_config(&mut mgr, &cfg).unwrap(),
        vec![CellId(3), CellId(7), CellId(11), CellId(15)]
    );
    let cfg = model_config("{ mode: sample, num_cells: 17 }");
    assert!(matches!(
        select_cells_from_config(&mut mgr, &cfg),
        Err(CellManagerError::Selection(_))
    ));
}

// ── Properties ──────────────────────────────────────────────────

fn bare_manager(
    nx: usize,
    ny: usize,
    periodic: bool,
) -> CellManager<Bare> {
    let space = tessella_space::Space::new(2, &[nx as f64, ny as f64], periodic).unwrap();
    CellManager::with_initial_state(
        std::sync::Arc::new(space),
        &model_config("grid: { structure: square, resolution: 1 }"),
        CellTraits::default(),
        seeded_rng(0),
        Bare(0),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn cache_matches_on_demand(
        nx in 1usize..7,
        ny in 1usize..7,
        periodic in any::<bool>(),
        moore in any::<bool>(),
        distance in 1usize..3,
    ) {
        let mode = if moore { NbMode::Moore } else { NbMode::VonNeumann };
        let mut mgr = bare_manager(nx, ny, periodic);
        mgr.select_neighborhood(mode, false, NbParams { distance }).unwrap();
        let on_demand: Vec<Vec<CellId>> =
            (0..mgr.len()).map(|i| mgr.neighbor_ids(CellId(i)).into_owned()).collect();
        mgr.compute_cell_neighbors();
        for (i, nb) in on_demand.iter().enumerate() {
            let cached = mgr.neighbor_ids(CellId(i));
            prop_assert_eq!(cached.as_ref(), nb.as_slice());
        }
    }

    #[test]
    fn sample_yields_distinct_ids(n in 0usize..=24, seed in any::<u64>()) {
        let mut mgr = bare_manager(4, 6, true);
        *mgr.rng_mut() = seeded_rng(seed);
        let picked = select_cells(&mut mgr, &Selection::Sample(n)).unwrap();
        prop_assert_eq!(picked.len(), n);
        prop_assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sync_step_is_order_independent(seed in any::<u64>()) {
        let rule = |c: &tessella_cells::Cell<Bare>, m: &CellManager<Bare>| {
            Bare(m.neighbors_of(c.id()).iter().map(|nb| nb.state().0).sum::<i32>() + 1)
        };
        let mut a = bare_manager(5, 5, true);
        let mut b = bare_manager(5, 5, true);
        *b.rng_mut() = seeded_rng(seed);
        for m in [&mut a, &mut b] {
            m.select_neighborhood(NbMode::Moore, true, NbParams::default()).unwrap();
            for cell in m.cells_mut() {
                cell.state_mut().0 = cell.id().index() as i32;
            }
        }
        apply_rule_to_all(&mut a, Update::Sync, Shuffle::Off, rule);
        apply_rule_to_all(&mut b, Update::Sync, Shuffle::On, rule);
        let states = |m: &CellManager<Bare>| m.cells().iter().map(|c| *c.state()).collect::<Vec<_>>();
        prop_assert_eq!(states(&a), states(&b));
    }
}
