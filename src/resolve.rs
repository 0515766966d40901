use crate::{Config, Error, Explore, Kind, ObjectAccess, Result, Roots, Visit};

/// Reads the current value an accessor designates and passes it to `f`.
///
/// The walk starts again from the root object on every call, so the value
/// seen by `f` is always the live one. Along the way:
///
/// - struct-like values select the member named by the segment,
/// - maps select the entry whose rendered key equals the segment,
/// - sequences parse the segment as an index (bounds are checked against the
///   live length),
/// - references are followed transparently before each segment.
///
/// A reference at the end of the path is handed to `f` as it is (it may be
/// nil), see [`can_explore`](crate::can_explore) and
/// [`list_fields`](crate::list_fields) which dereference it.
///
/// # Errors
///
/// - [`Error::UnknownRoot`] if the root label isn't registered
/// - [`Error::PathNotFound`] if a segment doesn't name a member
/// - [`Error::NilDereference`] if a nil reference is met before the path ends
/// - [`Error::PathTooDeep`] if the path (or a chain of references) is longer
///   than [`Config::max_depth`]
pub fn resolve<R>(
    roots: &Roots,
    access: &ObjectAccess,
    config: &Config,
    f: impl FnOnce(&dyn Explore) -> R,
) -> Result<R> {
    if access.path().len() > config.max_depth {
        return Err(Error::PathTooDeep {
            path: access.location(access.path().len()),
            limit: config.max_depth,
        });
    }
    let root = roots
        .get(access.root())
        .ok_or_else(|| Error::UnknownRoot(access.root().to_string()))?;

    let walker = Walker { access, config };
    let mut f = Some(f);
    let mut output = None;
    walker.walk(root.as_ref(), 0, 0, &mut |value: &dyn Explore| {
        if let Some(f) = f.take() {
            output = Some(f(value));
        }
    })?;

    output.ok_or_else(|| Error::PathNotFound {
        path: access.location(access.path().len()),
        segment: String::new(),
    })
}

struct Walker<'a> {
    access: &'a ObjectAccess,
    config: &'a Config,
}

impl Walker<'_> {
    /// Applies the segments from `depth` on to `value`.
    ///
    /// `hops` counts the references followed since the last segment.
    fn walk(
        &self,
        value: &dyn Explore,
        depth: usize,
        hops: usize,
        visit: &mut Visit<'_>,
    ) -> Result<()> {
        let segments = self.access.path().segments();
        let Some(segment) = segments.get(depth) else {
            visit(value);
            return Ok(());
        };

        match value.kind() {
            Kind::Reference => {
                if hops >= self.config.max_depth {
                    return Err(Error::PathTooDeep {
                        path: self.access.location(depth),
                        limit: self.config.max_depth,
                    });
                }
                let mut result = Ok(());
                let found = value.target(&mut |target: &dyn Explore| {
                    result = self.walk(target, depth, hops + 1, visit);
                });
                if !found {
                    return Err(Error::NilDereference {
                        path: self.access.location(depth),
                    });
                }
                result
            }
            Kind::Struct | Kind::Map | Kind::Sequence => {
                let mut result = Ok(());
                let found = value.member(segment, &mut |member: &dyn Explore| {
                    result = self.walk(member, depth + 1, 0, visit);
                });
                if !found {
                    return Err(self.not_found(depth));
                }
                result
            }
            Kind::Scalar | Kind::Opaque => Err(self.not_found(depth)),
        }
    }

    fn not_found(&self, depth: usize) -> Error {
        Error::PathNotFound {
            path: self.access.location(depth),
            segment: self.access.path().segments()[depth].clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, RwLock},
    };

    use super::*;

    fn roots_with(label: &str, value: crate::SharedValue) -> Roots {
        let mut roots = Roots::new();
        roots.insert(label, value).unwrap();
        roots
    }

    fn render_at(roots: &Roots, access: &ObjectAccess) -> Result<String> {
        resolve(roots, access, &Config::default(), |v| v.render())
    }

    #[test]
    fn test_resolve_root_itself() {
        let roots = roots_with("n", Arc::new(5u32));
        assert_eq!(render_at(&roots, &ObjectAccess::for_root("n")).unwrap(), "5");
    }

    #[test]
    fn test_resolve_through_map_sequence_and_option() {
        let mut map = HashMap::new();
        map.insert("xs".to_string(), Some(vec![1u8, 2, 3]));
        let roots = roots_with("m", Arc::new(map));

        let access = ObjectAccess::for_root("m").child("xs").child("2");
        assert_eq!(render_at(&roots, &access).unwrap(), "3");
    }

    #[test]
    fn test_unknown_root() {
        let roots = Roots::new();
        let err = render_at(&roots, &ObjectAccess::for_root("nope")).unwrap_err();
        assert!(matches!(err, Error::UnknownRoot(label) if label == "nope"));
    }

    #[test]
    fn test_missing_key_and_bad_index() {
        let roots = roots_with("v", Arc::new(vec![1u8]));
        let err = render_at(&roots, &ObjectAccess::for_root("v").child("1")).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { ref segment, .. } if segment == "1"));

        let err = render_at(&roots, &ObjectAccess::for_root("v").child("first")).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { ref path, .. } if path == "v"));
    }

    #[test]
    fn test_segment_below_scalar() {
        let roots = roots_with("s", Arc::new(String::from("x")));
        let err = render_at(&roots, &ObjectAccess::for_root("s").child("len")).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { .. }));
    }

    #[test]
    fn test_nil_mid_path() {
        let value: Option<Vec<u8>> = None;
        let roots = roots_with("o", Arc::new(value));
        let err = render_at(&roots, &ObjectAccess::for_root("o").child("0")).unwrap_err();
        assert!(matches!(err, Error::NilDereference { ref path } if path == "o"));
    }

    #[test]
    fn test_nil_at_end_of_path_resolves() {
        let value: Vec<Option<u8>> = vec![None];
        let roots = roots_with("o", Arc::new(value));
        let kind = resolve(
            &roots,
            &ObjectAccess::for_root("o").child("0"),
            &Config::default(),
            |v| v.kind(),
        )
        .unwrap();
        assert_eq!(kind, Kind::Reference);
    }

    #[test]
    fn test_path_too_deep() {
        let roots = roots_with("v", Arc::new(vec![vec![vec![1u8]]]));
        let access = ObjectAccess::for_root("v").child("0").child("0").child("0");
        let config = Config::default().with_max_depth(2);
        let err = resolve(&roots, &access, &config, |_| ()).unwrap_err();
        assert!(matches!(err, Error::PathTooDeep { limit: 2, .. }));
    }

    #[test]
    fn test_reference_chain_counts_per_segment() {
        let config = Config::default().with_max_depth(2);
        let access = ObjectAccess::for_root("v").child("0").child("0");

        let roots = roots_with("v", Arc::new(vec![Some(Some(vec![Some(Some(1u8))]))]));
        let kind = resolve(&roots, &access, &config, |v| v.kind()).unwrap();
        assert_eq!(kind, Kind::Reference);

        let roots = roots_with("v", Arc::new(vec![Some(Some(Some(vec![1u8])))]));
        let err = resolve(&roots, &access, &config, |_| ()).unwrap_err();
        assert!(matches!(err, Error::PathTooDeep { limit: 2, ref path } if path == "v.0"));
    }

    #[test]
    fn test_resolve_sees_live_changes() {
        let state = Arc::new(RwLock::new(vec![1u8]));
        let roots = roots_with("live", state.clone());
        let access = ObjectAccess::for_root("live").child("1");

        assert!(render_at(&roots, &access).is_err());
        state.write().unwrap().push(7);
        assert_eq!(render_at(&roots, &access).unwrap(), "7");
        state.write().unwrap().clear();
        assert!(render_at(&roots, &access).is_err());
    }
}
