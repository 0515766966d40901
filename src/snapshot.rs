use serde::{Deserialize, Serialize};

use crate::{
    Config, Error, FieldEntry, Grid, ObjectAccess, Result, Roots, fields::settled_type_name,
    list_fields, resolve,
};

/// Type shown for cells whose accessor no longer resolves.
pub const ERROR_TYPE: &str = "!error";

/// Render-ready view of the grid.
///
/// Built fresh by [`build_snapshot`] and never updated afterwards. Rows are
/// all equally wide; unoccupied cells appear as holes (see [`Cell::is_hole`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

/// One rendered grid cell: the accessor's value and its listed members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub label: String,
    pub path: String,
    pub row: usize,
    pub column: usize,
    #[serde(rename = "type")]
    pub type_name: String,
    pub is_root: bool,
    /// Whether the value has nil members, shown or not.
    #[serde(rename = "has_zeros")]
    pub has_nils: bool,
    /// Whether nil members are currently hidden.
    #[serde(default)]
    pub hide_nils: bool,
    pub fields: Vec<FieldEntry>,
}

impl Cell {
    /// Placeholder for an unoccupied coordinate.
    pub fn hole(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            ..Default::default()
        }
    }

    /// Cell for an accessor that failed to resolve.
    fn failed(row: usize, column: usize, access: &ObjectAccess, error: &Error) -> Self {
        Self {
            label: access.label().to_string(),
            path: access.path().to_string(),
            row,
            column,
            type_name: ERROR_TYPE.to_string(),
            is_root: access.is_root(),
            has_nils: false,
            hide_nils: access.hide_nils(),
            fields: vec![FieldEntry {
                label: "error".to_string(),
                key: String::new(),
                type_name: "Error".to_string(),
                value: error.to_string(),
                explorable: false,
                nil: false,
            }],
        }
    }

    pub fn is_hole(&self) -> bool {
        self.label.is_empty() && self.type_name.is_empty()
    }

    /// True if the accessor of this cell failed to resolve.
    pub fn is_error(&self) -> bool {
        self.type_name == ERROR_TYPE
    }
}

impl Snapshot {
    /// The cell at `(row, column)`, holes included.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row)?.cells.get(column)
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = &Cell> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| !cell.is_hole())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Encoding(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Encoding(e.to_string()))
    }
}

/// Renders every cell of `grid` against the current values of `roots`.
///
/// Rows and columns run up to the last occupied ones, unoccupied coordinates
/// become holes. A cell whose accessor fails to resolve is rendered as an
/// error cell; it never spoils the rest of the snapshot.
pub fn build_snapshot(grid: &Grid, roots: &Roots, config: &Config) -> Snapshot {
    let extent = grid.extent();
    let rows = (0..extent.rows)
        .map(|row| TableRow {
            cells: (0..extent.columns)
                .map(|column| match grid.get(row, column) {
                    Some(access) => build_cell(row, column, access, roots, config),
                    None => Cell::hole(row, column),
                })
                .collect(),
        })
        .collect();
    Snapshot { rows }
}

fn build_cell(
    row: usize,
    column: usize,
    access: &ObjectAccess,
    roots: &Roots,
    config: &Config,
) -> Cell {
    let resolved = resolve(roots, access, config, |value| {
        (
            settled_type_name(value, config),
            list_fields(value, access.hide_nils(), config),
        )
    });
    match resolved {
        Ok((type_name, listing)) => Cell {
            label: access.label().to_string(),
            path: access.path().to_string(),
            row,
            column,
            type_name,
            is_root: access.is_root(),
            has_nils: listing.has_nils,
            hide_nils: access.hide_nils(),
            fields: listing.entries,
        },
        Err(e) => {
            tracing::debug!(row, column, label = access.label(), error = %e, "cell failed to resolve");
            Cell::failed(row, column, access, &e)
        }
    }
}
