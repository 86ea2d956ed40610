//! The cell entity and its capability flags.

use tessella_core::CellId;

/// How cell states are advanced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Update {
    /// All cells compute their new state from the same snapshot, then all
    /// commit together. Cells carry a `state_new` staging buffer.
    #[default]
    Sync,
    /// Each cell commits its new state immediately; later cells see it.
    Async,
    /// No staging buffer; the update mode is chosen at each rule
    /// application. Synchronous application uses a transient buffer.
    Manual,
}

/// Marker bits attached to a cell when [`CellTraits::tagged`] is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag {
    /// The marker.
    pub tagged: bool,
}

/// Capability flags of the cells in a manager.
///
/// These replace compile-time trait bundles: they are resolved once
/// when the manager constructs its cells.
///
/// # Examples
///
/// ```
/// use tessella_cells::{CellTraits, Update};
///
/// let traits = CellTraits::new(Update::Async).with_tag().with_custom_links();
/// assert!(traits.tagged && traits.custom_links);
/// assert!(!traits.has_staging_buffer());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellTraits {
    /// Update mode; [`Update::Sync`] gives cells a staging buffer.
    pub update: Update,
    /// Force construction of cell states through the default constructor.
    pub use_default_state_constructor: bool,
    /// Attach a [`Tag`] to every cell.
    pub tagged: bool,
    /// Attach a default-constructed custom-links payload to every cell.
    pub custom_links: bool,
}

impl CellTraits {
    /// Traits with the given update mode and no extensions.
    pub fn new(update: Update) -> Self {
        Self {
            update,
            ..Self::default()
        }
    }

    /// Use the state's default constructor.
    pub fn with_default_state_constructor(mut self) -> Self {
        self.use_default_state_constructor = true;
        self
    }

    /// Attach tags.
    pub fn with_tag(mut self) -> Self {
        self.tagged = true;
        self
    }

    /// Attach custom-links payloads.
    pub fn with_custom_links(mut self) -> Self {
        self.custom_links = true;
        self
    }

    /// Whether cells carry a `state_new` staging buffer.
    pub fn has_staging_buffer(&self) -> bool {
        self.update == Update::Sync
    }
}

/// A grid cell: an ID, a state, and the optional extensions selected by
/// its [`CellTraits`].
///
/// `L` is the type of the custom-links payload. The core never fills it;
/// application code may store cell IDs or anything else there.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell<S, L = ()> {
    id: CellId,
    state: S,
    state_new: Option<S>,
    tag: Option<Tag>,
    custom_links: Option<L>,
}

impl<S: Clone, L: Default> Cell<S, L> {
    /// Create a cell with the extensions requested by `traits`.
    ///
    /// The staging buffer, if any, starts as a copy of `state`.
    pub fn new(id: CellId, state: S, traits: &CellTraits) -> Self {
        Self {
            id,
            state_new: traits.has_staging_buffer().then(|| state.clone()),
            state,
            tag: traits.tagged.then(Tag::default),
            custom_links: traits.custom_links.then(L::default),
        }
    }
}

impl<S: Clone, L> Cell<S, L> {
    /// Commit the staged state.
    ///
    /// Copies `state_new` into `state`. If nothing was staged since the
    /// last update this re-copies the previous value; cells without a
    /// staging buffer are left unchanged.
    pub fn update(&mut self) {
        if let Some(next) = &self.state_new {
            self.state = next.clone();
        }
    }
}

impl<S, L> Cell<S, L> {
    /// The cell's ID, equal to its position in the manager.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// The current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable access to the current state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// The staged state, if this cell has a staging buffer.
    pub fn state_new(&self) -> Option<&S> {
        self.state_new.as_ref()
    }

    /// Mutable access to the staged state, if this cell has a staging buffer.
    pub fn state_new_mut(&mut self) -> Option<&mut S> {
        self.state_new.as_mut()
    }

    /// The tag, if tagging is enabled.
    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    /// Mutable access to the tag, if tagging is enabled.
    pub fn tag_mut(&mut self) -> Option<&mut Tag> {
        self.tag.as_mut()
    }

    /// The custom-links payload, if enabled.
    pub fn custom_links(&self) -> Option<&L> {
        self.custom_links.as_ref()
    }

    /// Mutable access to the custom-links payload, if enabled.
    pub fn custom_links_mut(&mut self) -> Option<&mut L> {
        self.custom_links.as_mut()
    }

    /// Stage `state` if a buffer exists; otherwise hand it back.
    pub(crate) fn stage(&mut self, state: S) -> Result<(), S> {
        match &mut self.state_new {
            Some(slot) => {
                *slot = state;
                Ok(())
            }
            None => Err(state),
        }
    }

    /// Replace the current state directly.
    pub(crate) fn commit(&mut self, state: S) {
        self.state = state;
    }
}
