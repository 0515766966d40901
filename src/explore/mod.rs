//! The capability that makes a value explorable.
//!
//! Rust has no runtime reflection, so the explorer walks values through the
//! [`Explore`] trait instead. A value reports its [`Kind`], names its members
//! and hands them out one at a time through a visitor closure. Handing out
//! members through a closure (rather than returning references) lets values
//! sitting behind a lock guard be read in place, without copying and without
//! keeping the lock longer than the visit.
//!
//! Implementations are provided for:
//! - scalars: integers, floats, `bool`, `char`, strings, `()`, `Duration`, atomics
//! - sequences: `Vec`, `VecDeque`, slices, arrays, `BTreeSet`
//! - maps: `HashMap` and `BTreeMap` with displayable keys
//! - structs: tuples up to six elements
//! - transparent pointers: `Box`, `Rc`, `Arc`, `&T`
//! - references: `Option`, `Weak`, `Mutex`, `RwLock`
//! - opaque values: channel endpoints and thread handles
//!
//! User types usually derive the trait with `#[derive(Explore)]`.

mod collections;
mod pointers;
mod scalars;
mod wrappers;

pub use wrappers::{Debugged, Opaque};

/// Classification of an explorable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Named (or positional) fields, listed in declaration order.
    Struct,
    /// Entries addressed by their rendered key.
    Map,
    /// Elements addressed by their index.
    Sequence,
    /// Points at another value which may be missing (nil).
    /// Dereferenced transparently by the explorer.
    Reference,
    /// A leaf with a printable value.
    Scalar,
    /// A leaf that can't be looked into, rendered by its type name.
    Opaque,
}

impl Kind {
    /// True for kinds that have members to list.
    pub fn is_container(&self) -> bool {
        matches!(self, Kind::Struct | Kind::Map | Kind::Sequence)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Kind::Reference)
    }
}

/// Visitor receiving a member, the target of a reference, or a resolved value.
pub type Visit<'a> = dyn FnMut(&dyn Explore) + 'a;

/// A value the explorer can look into.
///
/// Only [`kind`](Explore::kind) and [`type_name`](Explore::type_name) are
/// required. Containers implement [`members`](Explore::members) and
/// [`member`](Explore::member), references implement
/// [`target`](Explore::target), scalars implement [`render`](Explore::render).
///
/// Implementations must not panic. A member listed by `members` may have
/// disappeared by the time `member` is called (the value can change between
/// two reads); `member` then simply returns `false`.
///
/// # Example
///
/// ```rust
/// use structview::{Explore, Kind};
///
/// struct Temperature(f64);
///
/// impl Explore for Temperature {
///     fn kind(&self) -> Kind {
///         Kind::Scalar
///     }
///
///     fn type_name(&self) -> &'static str {
///         std::any::type_name::<Self>()
///     }
///
///     fn render(&self) -> String {
///         format!("{:.1}°C", self.0)
///     }
/// }
/// ```
pub trait Explore {
    fn kind(&self) -> Kind;

    /// Full type name, usually `std::any::type_name::<Self>()`.
    fn type_name(&self) -> &'static str;

    /// Keys of the members, in listing order.
    fn members(&self) -> Vec<String> {
        Vec::new()
    }

    /// Number of members, without building their keys.
    fn member_count(&self) -> usize {
        self.members().len()
    }

    /// Calls `visit` with the member stored under `key`.
    ///
    /// Returns `false` (without calling `visit`) if there is no such member.
    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        let _ = (key, visit);
        false
    }

    /// Calls `visit` with the value a reference points at.
    ///
    /// Returns `false` (without calling `visit`) if the reference is nil.
    fn target(&self, visit: &mut Visit<'_>) -> bool {
        let _ = visit;
        false
    }

    /// Short printable form of the value.
    fn render(&self) -> String {
        short_type_name(self.type_name())
    }
}

/// Strips module paths from a type name.
///
/// ```rust
/// use structview::short_type_name;
///
/// assert_eq!(
///     short_type_name("alloc::vec::Vec<app::model::User>"),
///     "Vec<User>"
/// );
/// ```
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else {
            out.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment_start = out.len();
            }
        }
    }
    out
}

/// Follows references until a non-reference value or a nil is reached.
///
/// Calls `visit` exactly once: with the value found, or with `None` for a nil
/// reference (or a chain longer than `max_hops`).
pub(crate) fn settle(
    value: &dyn Explore,
    max_hops: usize,
    visit: &mut dyn FnMut(Option<&dyn Explore>),
) {
    if !value.kind().is_reference() {
        visit(Some(value));
        return;
    }
    if max_hops == 0 {
        tracing::debug!(type_name = value.type_name(), "reference chain too long");
        visit(None);
        return;
    }
    let found = value.target(&mut |target: &dyn Explore| settle(target, max_hops - 1, visit));
    if !found {
        visit(None);
    }
}

/// Index-addressed member lookup shared by the sequence implementations.
pub(crate) fn visit_index<'a, T, I>(items: I, key: &str, visit: &mut Visit<'_>) -> bool
where
    T: Explore + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let Ok(index) = key.parse::<usize>() else {
        return false;
    };
    match items.into_iter().nth(index) {
        Some(item) => {
            visit(item);
            true
        }
        None => false,
    }
}

pub(crate) fn index_keys(len: usize) -> Vec<String> {
    (0..len).map(|i| i.to_string()).collect()
}
