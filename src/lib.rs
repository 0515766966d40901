//! structview - browse live in-process values through a grid of expandable fields.
//!
//! Register a few root objects with an [`Explorer`], then drive it with
//! [`Instruction`]s (usually coming from a browser). Each instruction expands
//! fields of a grid cell into neighbouring cells, removes a cell, or toggles
//! the visibility of nil fields. [`Explorer::snapshot`] renders the current
//! grid against the *live* values: nothing is cached, every snapshot re-reads
//! the objects from their roots.
//!
//! Values take part through the [`Explore`] trait. It is implemented for
//! scalars, std collections, smart pointers and lock types, and can be derived
//! for your own structs and enums:
//!
//! ```rust
//! use std::sync::{Arc, RwLock};
//! use structview::{Action, Explore, Explorer, Instruction};
//!
//! #[derive(Explore)]
//! struct Server {
//!     name: String,
//!     sessions: Vec<Session>,
//! }
//!
//! #[derive(Explore)]
//! struct Session {
//!     user: String,
//!     idle: bool,
//! }
//!
//! let state = Arc::new(RwLock::new(Server {
//!     name: "api".into(),
//!     sessions: vec![Session { user: "ann".into(), idle: false }],
//! }));
//!
//! let explorer = Explorer::default();
//! explorer.register_shared("server", state.clone()).unwrap();
//! explorer
//!     .apply(&Instruction::new(0, 0, Action::Right).with_selections(["sessions"]))
//!     .unwrap();
//!
//! let snapshot = explorer.snapshot();
//! assert_eq!(snapshot.rows[0].cells[1].path, "sessions");
//! ```
//!
//! With the `server` feature the explorer can be served over HTTP, see
//! `server::serve`.

extern crate self as structview;

mod config;
mod error;
mod explore;
mod explorer;
mod field_path;
mod fields;
mod grid;
mod instruction;
mod object_access;
mod resolve;
mod roots;
mod snapshot;

#[cfg(feature = "server")]
pub mod server;

pub use config::Config;
pub use error::Error;
pub use explore::{Debugged, Explore, Kind, Opaque, Visit, short_type_name};
pub use explorer::{Explorer, Navigation, Placement, Skipped};
pub use field_path::FieldPath;
pub use fields::{FieldEntry, Listing, can_explore, list_fields};
pub use grid::{Axis, Direction, Extent, Grid};
pub use instruction::{Action, Instruction};
pub use object_access::ObjectAccess;
pub use resolve::resolve;
pub use roots::{Roots, SharedValue};
pub use snapshot::{Cell, Snapshot, TableRow, build_snapshot};

#[cfg(feature = "macros")]
pub use structview_macros::Explore;

pub type Result<T = ()> = std::result::Result<T, Error>;
