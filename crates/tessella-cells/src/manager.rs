//! The cell manager: owner of the space, the grid and all cells.
//!
//! [`CellManager`] is constructed from a `cell_manager` config node (or a
//! model node containing `space` and `cell_manager`). Construction sets
//! up the grid, builds one cell per grid cell in index order and selects
//! the configured neighborhood.
//!
//! # Ownership model
//!
//! The cell collection is built once and never resized, so a
//! [`CellId`] stays valid for the manager's lifetime. Read accessors
//! hand out shared references; anything that mutates cells or draws
//! from the RNG takes `&mut self`.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::RngCore;
use rand_chacha::ChaCha8Rng;
use tessella_core::{
    CellId, Config, DataElement, DataError, MultiIndex, SpaceVec, StateSource,
};
use tessella_space::{create_grid, BoundarySelect, Grid, GridError, NbFunc, NbMode, NbParams, Space};
use tracing::{debug, info, warn};

use crate::cache::NeighborCache;
use crate::cell::{Cell, CellTraits};
use crate::error::CellManagerError;
use crate::state::{build_states, CellState};

// Compile-time assertion: a manager over plain data can move across threads.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<CellManager<f64>>();
    }
};

/// Owner of a space, its grid and one cell per grid cell.
///
/// `S` is the cell state, `L` the custom-links payload and `R` the RNG
/// used for random construction, shuffled traversal and random
/// selections.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use tessella_cells::{CellManager, CellTraits};
/// use tessella_core::Config;
///
/// let cfg = Config::from_yaml_str(
///     "space: { periodic: true, extent: [4., 8.] }\n\
///      cell_manager: { grid: { structure: square, resolution: 1 } }\n",
/// )
/// .unwrap();
/// let space = tessella_space::Space::from_config(&cfg.require("space").unwrap()).unwrap();
/// let mgr: CellManager<f64> = CellManager::with_initial_state(
///     std::sync::Arc::new(space),
///     &cfg.require("cell_manager").unwrap(),
///     CellTraits::default(),
///     ChaCha8Rng::seed_from_u64(0),
///     0.0,
/// )
/// .unwrap();
/// assert_eq!(mgr.len(), 32);
/// ```
pub struct CellManager<S, L = (), R = ChaCha8Rng> {
    space: Arc<Space>,
    grid: Arc<dyn Grid>,
    cfg: Config,
    cells: Vec<Cell<S, L>>,
    traits: CellTraits,
    rng: R,
    nb_mode: NbMode,
    nb_params: NbParams,
    nb_func: NbFunc,
    nb_size: usize,
    nb_cache: Option<NeighborCache>,
    warned_empty: AtomicBool,
}

// ── Construction ───────────────────────────────────────────────────

impl<S: CellState, L: Default, R: RngCore> CellManager<S, L, R> {
    /// Set up a manager over `space` from its `cell_manager` node `cfg`,
    /// constructing initial states through [`CellState`].
    ///
    /// # Errors
    ///
    /// Fails if the grid cannot be built or cannot count its cells, if
    /// the neighborhood configuration is invalid, or if no initial state
    /// can be constructed.
    pub fn new(
        space: Arc<Space>,
        cfg: &Config,
        traits: CellTraits,
        mut rng: R,
    ) -> Result<Self, CellManagerError> {
        let grid = setup_grid(&space, cfg)?;
        let n = grid.num_cells()?;
        let states = build_states::<S>(n, cfg, &traits, &mut rng)?;
        Self::assemble(space, grid, cfg, traits, rng, states)
    }

    /// Set up a manager from a model node containing `space` and
    /// `cell_manager`.
    ///
    /// Without a `space` node the space is the non-periodic unit square.
    pub fn from_config(
        model_cfg: &Config,
        traits: CellTraits,
        rng: R,
    ) -> Result<Self, CellManagerError> {
        let space = match model_cfg.get("space") {
            Some(node) => Space::from_config(&node)?,
            None => Space::default_2d(),
        };
        let cfg = model_cfg.require("cell_manager")?;
        Self::new(Arc::new(space), &cfg, traits, rng)
    }
}

impl<S: Clone, L: Default, R: RngCore> CellManager<S, L, R> {
    /// Set up a manager whose cells all start as a clone of `state`.
    pub fn with_initial_state(
        space: Arc<Space>,
        cfg: &Config,
        traits: CellTraits,
        rng: R,
        state: S,
    ) -> Result<Self, CellManagerError> {
        let grid = setup_grid(&space, cfg)?;
        let n = grid.num_cells()?;
        info!("setting up cells using explicitly given initial state");
        Self::assemble(space, grid, cfg, traits, rng, vec![state; n])
    }

    fn assemble(
        space: Arc<Space>,
        grid: Arc<dyn Grid>,
        cfg: &Config,
        traits: CellTraits,
        rng: R,
        states: Vec<S>,
    ) -> Result<Self, CellManagerError> {
        let expected = grid.num_cells()?;
        let cells: Vec<Cell<S, L>> = states
            .into_iter()
            .enumerate()
            .map(|(i, s)| Cell::new(CellId(i), s, &traits))
            .collect();
        if cells.len() != expected {
            return Err(CellManagerError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        info!(num_cells = cells.len(), "populated cell container");

        let nb_params = NbParams::default();
        let nb_func = grid.nb_func(NbMode::Empty, nb_params)?;
        let mut mgr = Self {
            space,
            grid,
            cfg: cfg.clone(),
            cells,
            traits,
            rng,
            nb_mode: NbMode::Empty,
            nb_params,
            nb_func,
            nb_size: 0,
            nb_cache: None,
            warned_empty: AtomicBool::new(false),
        };

        if let Some(nb_cfg) = cfg.get("neighborhood") {
            mgr.select_neighborhood_from_config(&nb_cfg)?;
        }
        Ok(mgr)
    }
}

fn setup_grid(space: &Arc<Space>, cfg: &Config) -> Result<Arc<dyn Grid>, CellManagerError> {
    info!("setting up grid discretization");
    let grid_cfg = cfg
        .get("grid")
        .ok_or_else(|| cfg.missing("grid", "cell manager configuration entry"))?;
    Ok(create_grid(Arc::clone(space), &grid_cfg)?)
}

// ── Accessors ──────────────────────────────────────────────────────

impl<S, L, R> CellManager<S, L, R> {
    /// All cells, in ID order.
    pub fn cells(&self) -> &[Cell<S, L>] {
        &self.cells
    }

    /// Mutable access to all cells. The collection itself cannot be resized.
    pub fn cells_mut(&mut self) -> &mut [Cell<S, L>] {
        &mut self.cells
    }

    /// The cell with the given ID.
    pub fn cell(&self, id: CellId) -> Option<&Cell<S, L>> {
        self.cells.get(id.index())
    }

    /// Mutable access to the cell with the given ID.
    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell<S, L>> {
        self.cells.get_mut(id.index())
    }

    /// The cells for `ids`, in the given order. Unknown IDs are skipped.
    pub fn cells_from_ids(&self, ids: &[CellId]) -> Vec<&Cell<S, L>> {
        ids.iter().filter_map(|&id| self.cell(id)).collect()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether there are no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The physical space.
    pub fn space(&self) -> &Arc<Space> {
        &self.space
    }

    /// The grid discretizing the space.
    pub fn grid(&self) -> &Arc<dyn Grid> {
        &self.grid
    }

    /// The capability flags the cells were built with.
    pub fn traits(&self) -> &CellTraits {
        &self.traits
    }

    /// The manager's RNG.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// The `cell_manager` config node this manager was built from.
    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    pub(crate) fn cells_and_rng_mut(&mut self) -> (&mut [Cell<S, L>], &mut R) {
        (&mut self.cells, &mut self.rng)
    }
}

// ── Neighborhoods ──────────────────────────────────────────────────

impl<S, L, R> CellManager<S, L, R> {
    /// Select the neighborhood used by [`neighbor_ids`](Self::neighbor_ids).
    ///
    /// Switching to another mode or other parameters drops the neighbor
    /// cache. Re-selecting the current non-empty neighborhood keeps it.
    /// With `compute_and_store` the cache is (re)built right away.
    ///
    /// # Errors
    ///
    /// [`GridError::UnsupportedNeighborhood`] if the grid does not offer
    /// `mode`; the current selection is then left unchanged.
    pub fn select_neighborhood(
        &mut self,
        mode: NbMode,
        compute_and_store: bool,
        params: NbParams,
    ) -> Result<(), GridError> {
        if mode != NbMode::Empty && mode == self.nb_mode && params == self.nb_params {
            debug!(mode = %mode, "neighborhood already set");
        } else {
            let nb_func = self.grid.nb_func(mode, params)?;
            let nb_size = self.grid.expected_num_neighbors(mode, params)?;
            self.nb_mode = mode;
            self.nb_params = params;
            self.nb_func = nb_func;
            self.nb_size = nb_size;
            self.nb_cache = None;
            info!(mode = %mode, distance = params.distance, "selected neighborhood");
        }

        if compute_and_store {
            self.compute_cell_neighbors();
        }
        Ok(())
    }

    /// Select the neighborhood described by a `neighborhood` config node.
    ///
    /// `mode` is required; `compute_and_store` defaults to `false`; the
    /// other entries are read as [`NbParams`].
    pub fn select_neighborhood_from_config(&mut self, cfg: &Config) -> Result<(), GridError> {
        if !cfg.contains("mode") {
            return Err(cfg.missing("mode", "neighborhood configuration key").into());
        }
        let mode: String = cfg.get_as("mode")?;
        let mode: NbMode = mode.parse()?;
        let compute_and_store = cfg.get_as_or("compute_and_store", false)?;
        let params = NbParams::from_config(cfg)?;
        self.select_neighborhood(mode, compute_and_store, params)
    }

    /// Compute the neighbors of every cell and store them.
    ///
    /// Later lookups return exactly what the on-demand function returns.
    pub fn compute_cell_neighbors(&mut self) {
        info!(
            mode = %self.nb_mode,
            num_cells = self.cells.len(),
            "computing and storing neighbors"
        );
        self.nb_cache = Some(NeighborCache::build(self.cells.len(), &self.nb_func));
    }

    /// IDs of the neighbors of `id` in the selected neighborhood.
    ///
    /// Borrowed from the cache if one exists, otherwise computed.
    pub fn neighbor_ids(&self, id: CellId) -> Cow<'_, [CellId]> {
        if let Some(cache) = &self.nb_cache {
            return Cow::Borrowed(cache.get(id));
        }
        if self.nb_mode == NbMode::Empty && !self.warned_empty.swap(true, Ordering::Relaxed) {
            warn!("neighbors requested, but the selected neighborhood is empty");
        }
        Cow::Owned((self.nb_func)(id).into_vec())
    }

    /// The neighbors of `id` in the selected neighborhood.
    pub fn neighbors_of(&self, id: CellId) -> Vec<&Cell<S, L>> {
        self.cells_from_ids(&self.neighbor_ids(id))
    }

    /// The selected neighborhood mode.
    pub fn nb_mode(&self) -> NbMode {
        self.nb_mode
    }

    /// Parameters of the selected neighborhood.
    pub fn nb_params(&self) -> NbParams {
        self.nb_params
    }

    /// Neighborhood size of an interior cell.
    pub fn nb_size(&self) -> usize {
        self.nb_size
    }

    /// Whether neighbor IDs are currently served from a cache.
    pub fn has_neighbor_cache(&self) -> bool {
        self.nb_cache.is_some()
    }
}

// ── Geometry ───────────────────────────────────────────────────────

impl<S, L, R> CellManager<S, L, R> {
    /// Multi-index of a cell.
    pub fn midx_of(&self, id: CellId) -> Result<MultiIndex, GridError> {
        self.grid.midx_of(id)
    }

    /// Barycenter of a cell.
    pub fn barycenter_of(&self, id: CellId) -> Result<SpaceVec, GridError> {
        self.grid.barycenter_of(id)
    }

    /// Physical extent of a cell.
    pub fn extent_of(&self, id: CellId) -> Result<SpaceVec, GridError> {
        self.grid.extent_of(id)
    }

    /// Vertices of a cell, counter-clockwise.
    pub fn vertices_of(&self, id: CellId) -> Result<Vec<SpaceVec>, GridError> {
        self.grid.vertices_of(id)
    }

    /// The cell containing `pos`.
    pub fn cell_at(&self, pos: &[f64]) -> Result<CellId, GridError> {
        self.grid.cell_at(pos)
    }

    /// Boundary cells, sorted by ID. Empty for periodic spaces.
    pub fn boundary_cells(&self, select: BoundarySelect) -> Result<Vec<CellId>, GridError> {
        Ok(self.grid.boundary_cells(select)?.into_iter().collect())
    }

    /// Boundary cells selected by name (`"all"`, `"left"`, ...), sorted.
    pub fn boundary_cells_by_name(&self, select: &str) -> Result<Vec<CellId>, GridError> {
        Ok(self.grid.boundary_cells_by_name(select)?.into_iter().collect())
    }
}

// ── Loading states ─────────────────────────────────────────────────

impl<S, L, R> CellManager<S, L, R> {
    /// Load the array at `path` and hand each cell its element.
    ///
    /// The array must have exactly the grid's shape. Elements are
    /// assigned in cell-index order.
    ///
    /// # Errors
    ///
    /// Propagates load failures from `source`;
    /// [`DataError::ShapeMismatch`] if the shapes differ.
    pub fn set_cell_states<T, Src>(
        &mut self,
        source: &Src,
        path: &str,
        mut assign: impl FnMut(&mut Cell<S, L>, T),
    ) -> Result<(), CellManagerError>
    where
        T: DataElement,
        Src: StateSource,
    {
        let loaded = source.load::<T>(path)?;
        let shape = self.grid.shape();
        if loaded.shape.as_slice() != shape.as_slice() {
            return Err(DataError::ShapeMismatch {
                loaded: loaded.shape,
                expected: shape.to_vec(),
            }
            .into());
        }
        if loaded.values.len() != self.cells.len() {
            return Err(DataError::RecordSizeMismatch {
                path: path.to_owned(),
                expected: self.cells.len(),
                actual: loaded.values.len(),
            }
            .into());
        }

        for (cell, value) in self.cells.iter_mut().zip(loaded.values) {
            assign(cell, value);
        }
        info!(path, num_cells = self.cells.len(), "set cell states from data");
        Ok(())
    }
}

impl<S, L, R> fmt::Debug for CellManager<S, L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellManager")
            .field("grid", &self.grid)
            .field("num_cells", &self.cells.len())
            .field("traits", &self.traits)
            .field("nb_mode", &self.nb_mode)
            .field("nb_params", &self.nb_params)
            .field("has_neighbor_cache", &self.nb_cache.is_some())
            .finish_non_exhaustive()
    }
}
