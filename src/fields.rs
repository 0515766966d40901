use serde::{Deserialize, Serialize};

use crate::{Config, Explore, Kind, explore::settle, short_type_name};

/// One member of a listed value, ready to be rendered.
///
/// Only `label`, `key`, `type` and `value` travel over the wire; the flags are
/// recomputed on every listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Text shown for the member.
    pub label: String,
    /// Path segment selecting the member.
    pub key: String,
    /// Short type name of the member (of its target for references).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Printable form of the member's value.
    pub value: String,
    /// Whether the member can be expanded into its own cell.
    #[serde(skip)]
    pub explorable: bool,
    /// Whether the member is a nil reference.
    #[serde(skip)]
    pub nil: bool,
}

impl FieldEntry {
    /// Describes `value` stored under `key`.
    pub(crate) fn describe(key: &str, value: &dyn Explore, config: &Config) -> Self {
        let mut entry = FieldEntry {
            label: key.to_string(),
            key: key.to_string(),
            ..Default::default()
        };
        settle(value, config.max_depth, &mut |settled: Option<&dyn Explore>| {
            match settled {
                Some(target) => {
                    entry.type_name = short_type_name(target.type_name());
                    entry.explorable = target.kind().is_container();
                    entry.value = printable(target, config);
                }
                None => {
                    entry.type_name = short_type_name(value.type_name());
                    entry.nil = true;
                    entry.value = "nil".to_string();
                }
            }
        });
        entry
    }
}

/// Members of one value, as listed by [`list_fields`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<FieldEntry>,
    /// True if any member is nil, including members hidden from `entries`.
    pub has_nils: bool,
    /// True if members were cut at [`Config::max_members`].
    pub truncated: bool,
}

/// Lists the members of `value` in a stable order.
///
/// - struct-like values list their fields in declaration order,
/// - maps list their entries by key (hash maps sorted by rendered key),
/// - sequences list their elements by index,
/// - references are listed as their target,
/// - scalars, opaque values and nils have no members.
///
/// With `hide_nils`, nil members are left out of the entries but still
/// reported through [`Listing::has_nils`].
pub fn list_fields(value: &dyn Explore, hide_nils: bool, config: &Config) -> Listing {
    let mut listing = Listing::default();
    settle(value, config.max_depth, &mut |settled: Option<&dyn Explore>| {
        let Some(value) = settled else {
            return;
        };
        if !value.kind().is_container() {
            return;
        }
        let keys = value.members();
        if keys.len() > config.max_members {
            tracing::debug!(
                type_name = value.type_name(),
                members = keys.len(),
                limit = config.max_members,
                "listing truncated"
            );
            listing.truncated = true;
        }
        for key in keys.iter().take(config.max_members) {
            let mut entry = None;
            value.member(key, &mut |member: &dyn Explore| {
                entry = Some(FieldEntry::describe(key, member, config));
            });
            // The member may have gone away since the keys were read.
            let Some(entry) = entry else {
                continue;
            };
            if entry.nil {
                listing.has_nils = true;
                if hide_nils {
                    continue;
                }
            }
            listing.entries.push(entry);
        }
    });
    listing
}

/// True if `value` (or what it references) has members to expand.
///
/// False for nils, scalars and opaque values.
pub fn can_explore(value: &dyn Explore, config: &Config) -> bool {
    let mut explorable = false;
    settle(value, config.max_depth, &mut |settled: Option<&dyn Explore>| {
        explorable = settled.is_some_and(|v| v.kind().is_container());
    });
    explorable
}

/// Short type name of `value`, looking through references.
///
/// A nil reference reports its own type.
pub(crate) fn settled_type_name(value: &dyn Explore, config: &Config) -> String {
    let mut name = short_type_name(value.type_name());
    settle(value, config.max_depth, &mut |settled: Option<&dyn Explore>| {
        if let Some(target) = settled {
            name = short_type_name(target.type_name());
        }
    });
    name
}

/// Printable form of a non-reference value.
///
/// Never fails: containers are summarized, opaque values show their type.
fn printable(value: &dyn Explore, config: &Config) -> String {
    let text = match value.kind() {
        Kind::Map => format!("{{{} entries}}", value.member_count()),
        Kind::Sequence => format!("[{} items]", value.member_count()),
        Kind::Opaque => short_type_name(value.type_name()),
        Kind::Struct | Kind::Scalar | Kind::Reference => value.render(),
    };
    truncate(text, config.max_value_len)
}

fn truncate(text: String, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text,
    }
}
