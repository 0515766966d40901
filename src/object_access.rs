use crate::FieldPath;

/// Recipe for reading the value shown in one grid cell.
///
/// An accessor never holds the value itself: it names a root object and the
/// path to follow from it, and the value is re-derived on every read. This
/// keeps the grid in step with objects the host program keeps mutating.
///
/// `hide_nils` is a display option of the cell and not part of the identity
/// of the accessor, see [`same_subject`](ObjectAccess::same_subject).
///
/// The default value is the *empty* accessor, returned for unoccupied cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectAccess {
    root: String,
    path: FieldPath,
    label: String,
    hide_nils: bool,
}

impl ObjectAccess {
    /// Accessor for the root object registered under `root`.
    pub fn for_root(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            label: root.clone(),
            root,
            path: FieldPath::new(),
            hide_nils: false,
        }
    }

    /// Accessor for `segment` below this accessor's value.
    ///
    /// The child starts with nil fields visible.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let path = self.path.child(segment);
        Self {
            label: format!("{}.{}", self.root, path),
            root: self.root.clone(),
            path,
            hide_nils: false,
        }
    }

    pub fn with_hide_nils(mut self, hide_nils: bool) -> Self {
        self.hide_nils = hide_nils;
        self
    }

    /// Label of the root object this accessor starts from.
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }

    #[inline]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Display label of the cell.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn hide_nils(&self) -> bool {
        self.hide_nils
    }

    pub fn toggle_nils(&mut self) {
        self.hide_nils = !self.hide_nils;
    }

    /// True for the accessor of an unoccupied cell.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// True if this accessor shows a root object itself.
    pub fn is_root(&self) -> bool {
        !self.is_empty() && self.path.is_empty()
    }

    /// Compares root and path, ignoring display options.
    pub fn same_subject(&self, other: &ObjectAccess) -> bool {
        self.root == other.root && self.path == other.path
    }

    /// Root label and the first `depth` path segments, joined with `.`.
    pub(crate) fn location(&self, depth: usize) -> String {
        let prefix = self.path.prefix(depth);
        if prefix.is_empty() {
            self.root.clone()
        } else {
            format!("{}.{}", self.root, prefix)
        }
    }
}
