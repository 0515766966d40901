use std::{
    collections::{BTreeMap, BTreeSet, HashMap, VecDeque},
    fmt::Display,
    hash::BuildHasher,
};

use super::{Explore, Kind, Visit, index_keys, visit_index};

impl<T: Explore> Explore for [T] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        index_keys(self.len())
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_index(self, key, visit)
    }
}

impl<T: Explore, const N: usize> Explore for [T; N] {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        index_keys(N)
    }

    fn member_count(&self) -> usize {
        N
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_index(self, key, visit)
    }
}

impl<T: Explore> Explore for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        index_keys(self.len())
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_index(self, key, visit)
    }
}

impl<T: Explore> Explore for VecDeque<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        index_keys(self.len())
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_index(self, key, visit)
    }
}

/// Sets are listed as sequences in their iteration order.
impl<T: Explore + Ord> Explore for BTreeSet<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        index_keys(self.len())
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_index(self, key, visit)
    }
}

/// Hash maps are listed sorted by rendered key so listings are stable.
impl<K: Display, V: Explore, S: BuildHasher> Explore for HashMap<K, V, S> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys().map(|k| k.to_string()).collect();
        keys.sort();
        keys
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_entry(self.iter(), key, visit)
    }
}

/// Ordered maps keep their own key order.
impl<K: Display + Ord, V: Explore> Explore for BTreeMap<K, V> {
    fn kind(&self) -> Kind {
        Kind::Map
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn members(&self) -> Vec<String> {
        self.keys().map(|k| k.to_string()).collect()
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        visit_entry(self.iter(), key, visit)
    }
}

fn visit_entry<'a, K, V, I>(entries: I, key: &str, visit: &mut Visit<'_>) -> bool
where
    K: Display + 'a,
    V: Explore + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    match entries.into_iter().find(|(k, _)| k.to_string() == key) {
        Some((_, value)) => {
            visit(value);
            true
        }
        None => false,
    }
}

macro_rules! tuple_struct {
    ($(($($name:ident : $index:tt),+)),* $(,)?) => {$(
        impl<$($name: Explore),+> Explore for ($($name,)+) {
            fn kind(&self) -> Kind {
                Kind::Struct
            }

            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }

            fn members(&self) -> Vec<String> {
                vec![$(stringify!($index).to_string()),+]
            }

            fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
                match key {
                    $(stringify!($index) => {
                        visit(&self.$index);
                        true
                    })+
                    _ => false,
                }
            }
        }
    )*};
}

tuple_struct!(
    (A: 0),
    (A: 0, B: 1),
    (A: 0, B: 1, C: 2),
    (A: 0, B: 1, C: 2, D: 3),
    (A: 0, B: 1, C: 2, D: 3, E: 4),
    (A: 0, B: 1, C: 2, D: 3, E: 4, F: 5),
);
