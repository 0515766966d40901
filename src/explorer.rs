use std::sync::{Arc, RwLock};

use serde::{Serialize, Serializer};

use crate::{
    Action, Axis, Config, Direction, Error, Explore, Grid, Instruction, ObjectAccess, Result,
    Roots, SharedValue, Snapshot, build_snapshot, can_explore, resolve,
};

/// Handle to a set of root objects and the grid exploring them.
///
/// Cloning is cheap and every clone works on the same state, so the same
/// explorer can be shared between the host program (registering roots) and a
/// front end (applying instructions and taking snapshots).
///
/// Roots and grid are guarded by separate locks, always taken in that order.
#[derive(Clone, Default)]
pub struct Explorer {
    state: Arc<SharedState>,
}

#[derive(Default)]
struct SharedState {
    config: Config,
    roots: RwLock<Roots>,
    grid: RwLock<Grid>,
}

/// Outcome of an applied instruction.
///
/// Only expanding actions place cells. A selection that can't be expanded
/// doesn't fail the instruction, it is reported in `skipped` instead.
#[derive(Debug, Default, Serialize)]
pub struct Navigation {
    pub placed: Vec<Placement>,
    pub skipped: Vec<Skipped>,
}

/// A cell created by an expanding instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub label: String,
}

/// A selection left out of an expanding instruction.
#[derive(Debug, Serialize)]
pub struct Skipped {
    pub selection: String,
    #[serde(serialize_with = "error_message")]
    pub error: Error,
}

fn error_message<S: Serializer>(error: &Error, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

impl Explorer {
    pub fn new(config: Config) -> Self {
        Self {
            state: Arc::new(SharedState {
                config,
                roots: RwLock::new(Roots::new()),
                grid: RwLock::new(Grid::new()),
            }),
        }
    }

    /// Builder flavour of [`register`](Explorer::register).
    pub fn with_root<T>(self, label: impl Into<String>, value: T) -> Result<Self>
    where
        T: Explore + Send + Sync + 'static,
    {
        self.register(label, value)?;
        Ok(self)
    }

    /// Registers `value` as a root object and shows it in the first free row
    /// of column 0.
    ///
    /// The explorer takes ownership of `value`. To watch state that keeps
    /// changing, keep a clone of an `Arc` and use
    /// [`register_shared`](Explorer::register_shared).
    pub fn register<T>(&self, label: impl Into<String>, value: T) -> Result
    where
        T: Explore + Send + Sync + 'static,
    {
        self.register_shared(label, Arc::new(value))
    }

    /// Registers a shared root object.
    ///
    /// Fails with [`Error::DuplicateRoot`] if `label` is taken and with
    /// [`Error::EmptyRootLabel`] if it is empty. The grid is left untouched.
    pub fn register_shared(&self, label: impl Into<String>, value: SharedValue) -> Result {
        let label = label.into();
        let mut roots = self.state.roots.write().expect("Roots lock poisoned");
        roots.insert(label.clone(), value)?;

        let mut grid = self.state.grid.write().expect("Grid lock poisoned");
        match grid.put_from(0, 0, Axis::Rows, ObjectAccess::for_root(label.clone())) {
            Some((row, column)) => tracing::debug!(root = %label, row, column, "Root registered"),
            None => tracing::warn!(root = %label, "Root registered, but column 0 is full"),
        }
        Ok(())
    }

    /// Labels of the registered roots, in registration order.
    pub fn root_labels(&self) -> Vec<String> {
        self.state
            .roots
            .read()
            .expect("Roots lock poisoned")
            .labels()
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Accessor at `(row, column)`, the empty one for unoccupied cells.
    pub fn object_at(&self, row: usize, column: usize) -> ObjectAccess {
        self.state
            .grid
            .read()
            .expect("Grid lock poisoned")
            .object_at(row, column)
    }

    /// Renders the grid against the current values of the roots.
    pub fn snapshot(&self) -> Snapshot {
        let roots = self.state.roots.read().expect("Roots lock poisoned");
        let grid = self.state.grid.read().expect("Grid lock poisoned");
        build_snapshot(&grid, &roots, &self.state.config)
    }

    /// Decodes an instruction from JSON and applies it.
    pub fn apply_json(&self, json: &str) -> Result<Navigation> {
        self.apply(&Instruction::from_json(json)?)
    }

    /// Applies `instruction` to the grid.
    ///
    /// - `down`/`right` place every explorable selection of the source cell
    ///   next to it. The first child goes to the cell below (right of) the
    ///   source; further children fan out across columns (down rows), each
    ///   taking the first free cell after the previous one. Occupied cells are
    ///   never overwritten.
    /// - `remove` clears the source cell. Cells showing a root are kept.
    /// - `toggleNils` shows or hides the nil fields of the source cell.
    ///
    /// An empty source cell makes every action a no-op.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedCommand`] if children would be placed beyond the last
    /// addressable row or column. The grid is left untouched.
    pub fn apply(&self, instruction: &Instruction) -> Result<Navigation> {
        if let Some(direction) = instruction.action.direction() {
            return self.expand(instruction, direction);
        }

        let (row, column) = (instruction.row, instruction.column);
        match instruction.action {
            Action::Remove => self.remove(row, column),
            Action::ToggleNils => self.toggle_nils(row, column),
            Action::Down | Action::Right => unreachable!("expanding actions have a direction"),
        }
        Ok(Navigation::default())
    }

    fn expand(&self, instruction: &Instruction, direction: Direction) -> Result<Navigation> {
        let (row, column) = (instruction.row, instruction.column);
        let target = direction.target(row, column).ok_or_else(|| {
            Error::MalformedCommand(format!("no room to expand cell ({row}, {column})"))
        })?;

        let config = &self.state.config;
        let roots = self.state.roots.read().expect("Roots lock poisoned");
        let mut grid = self.state.grid.write().expect("Grid lock poisoned");

        let mut navigation = Navigation::default();
        let source = grid.object_at(row, column);
        if source.is_empty() {
            tracing::warn!(row, column, "Nothing to expand in an empty cell");
            return Ok(navigation);
        }

        let axis = direction.fan_out();
        let mut next = target;
        for selection in &instruction.selections {
            let child = source.child(selection.as_str());
            let checked = resolve(&roots, &child, config, |value| can_explore(value, config))
                .and_then(|explorable| {
                    if explorable {
                        Ok(())
                    } else {
                        Err(Error::NotExplorable {
                            path: child.location(child.path().len()),
                        })
                    }
                });
            if let Err(error) = checked {
                tracing::warn!(row, column, selection = %selection, error = %error, "Selection skipped");
                navigation.skipped.push(Skipped {
                    selection: selection.clone(),
                    error,
                });
                continue;
            }

            let label = child.label().to_string();
            match grid.put_from(next.0, next.1, axis, child) {
                Some((to_row, to_column)) => {
                    tracing::debug!(row = to_row, column = to_column, label = %label, "Cell placed");
                    navigation.placed.push(Placement {
                        row: to_row,
                        column: to_column,
                        label,
                    });
                    next = (to_row, to_column);
                }
                None => {
                    let error = Error::MalformedCommand(format!(
                        "no free cell left for '{label}' from ({}, {})",
                        next.0, next.1
                    ));
                    tracing::warn!(row, column, selection = %selection, error = %error, "Selection skipped");
                    navigation.skipped.push(Skipped {
                        selection: selection.clone(),
                        error,
                    });
                }
            }
        }
        Ok(navigation)
    }

    fn remove(&self, row: usize, column: usize) {
        let mut grid = self.state.grid.write().expect("Grid lock poisoned");
        let Some(access) = grid.get(row, column) else {
            tracing::debug!(row, column, "Nothing to remove");
            return;
        };
        if access.is_root() {
            tracing::warn!(row, column, root = access.root(), "Root cells can't be removed");
            return;
        }
        grid.remove_object_at(row, column);
    }

    fn toggle_nils(&self, row: usize, column: usize) {
        let mut grid = self.state.grid.write().expect("Grid lock poisoned");
        if !grid.update_object_at(row, column, ObjectAccess::toggle_nils) {
            tracing::debug!(row, column, "Nothing to toggle");
        }
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("config", &self.state.config)
            .field("roots", &self.root_labels())
            .finish()
    }
}
