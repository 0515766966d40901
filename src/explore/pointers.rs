use std::{
    cell::RefCell,
    rc::Rc,
    sync::{Arc, Mutex, PoisonError, RwLock, Weak},
};

use super::{Explore, Kind, Visit};

// Pointers that can never be nil are fully transparent: they report the kind,
// type and members of their target.
macro_rules! transparent_pointer {
    ($($ptr:ident),* $(,)?) => {$(
        impl<T: Explore + ?Sized> Explore for $ptr<T> {
            fn kind(&self) -> Kind {
                (**self).kind()
            }

            fn type_name(&self) -> &'static str {
                (**self).type_name()
            }

            fn members(&self) -> Vec<String> {
                (**self).members()
            }

            fn member_count(&self) -> usize {
                (**self).member_count()
            }

            fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
                (**self).member(key, visit)
            }

            fn target(&self, visit: &mut Visit<'_>) -> bool {
                (**self).target(visit)
            }

            fn render(&self) -> String {
                (**self).render()
            }
        }
    )*};
}

transparent_pointer!(Box, Rc, Arc);

impl<T: Explore + ?Sized> Explore for &T {
    fn kind(&self) -> Kind {
        (**self).kind()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn members(&self) -> Vec<String> {
        (**self).members()
    }

    fn member_count(&self) -> usize {
        (**self).member_count()
    }

    fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
        (**self).member(key, visit)
    }

    fn target(&self, visit: &mut Visit<'_>) -> bool {
        (**self).target(visit)
    }

    fn render(&self) -> String {
        (**self).render()
    }
}

impl<T: Explore> Explore for Option<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn target(&self, visit: &mut Visit<'_>) -> bool {
        match self {
            Some(value) => {
                visit(value);
                true
            }
            None => false,
        }
    }
}

/// A weak pointer is nil once its target has been dropped.
///
/// Weak pointers are the usual way to build cycles; the explorer only follows
/// them on request, one level at a time.
impl<T: Explore> Explore for Weak<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn target(&self, visit: &mut Visit<'_>) -> bool {
        match self.upgrade() {
            Some(value) => {
                visit(value.as_ref());
                true
            }
            None => false,
        }
    }
}

impl<T: Explore> Explore for std::rc::Weak<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn target(&self, visit: &mut Visit<'_>) -> bool {
        match self.upgrade() {
            Some(value) => {
                visit(value.as_ref());
                true
            }
            None => false,
        }
    }
}

thread_local! {
    /// Addresses of the locks this thread is visiting right now.
    static VISITING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Removes a lock address from [`VISITING`] when the visit ends, unwinding
/// included.
struct Visiting(usize);

impl Drop for Visiting {
    fn drop(&mut self) {
        let _ = VISITING.try_with(|visiting| {
            let mut visiting = visiting.borrow_mut();
            if let Some(at) = visiting.iter().rposition(|addr| *addr == self.0) {
                visiting.remove(at);
            }
        });
    }
}

/// Runs `f` with the lock at `lock` marked as visited by this thread.
///
/// Returns `None` without running `f` if the lock is already being visited
/// further up the stack: a value reaching its own lock again (typically through
/// a `Weak` back pointer) would otherwise lock it twice and deadlock.
fn visit_lock<L, F: FnOnce()>(lock: &L, type_name: &str, f: F) -> Option<()> {
    let addr = lock as *const L as usize;
    let entered = VISITING.with(|visiting| {
        let mut visiting = visiting.borrow_mut();
        if visiting.contains(&addr) {
            false
        } else {
            visiting.push(addr);
            true
        }
    });
    if !entered {
        tracing::debug!(type_name, "lock already visited by this thread, shown as nil");
        return None;
    }
    let _visiting = Visiting(addr);
    f();
    Some(())
}

/// The lock is held only while the target is visited.
///
/// A poisoned lock is still read: exploring is read-only and the data is
/// exactly what the panicking writer left behind. A lock reached again while
/// its target is being visited (a cycle) is shown as nil.
impl<T: Explore> Explore for Mutex<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn target(&self, visit: &mut Visit<'_>) -> bool {
        visit_lock(self, self.type_name(), || {
            let guard = self.lock().unwrap_or_else(PoisonError::into_inner);
            visit(&*guard);
        })
        .is_some()
    }
}

impl<T: Explore> Explore for RwLock<T> {
    fn kind(&self) -> Kind {
        Kind::Reference
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn target(&self, visit: &mut Visit<'_>) -> bool {
        visit_lock(self, self.type_name(), || {
            let guard = self.read().unwrap_or_else(PoisonError::into_inner);
            visit(&*guard);
        })
        .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explore::settle;

    fn target_render(value: &dyn Explore) -> Option<String> {
        let mut out = None;
        value.target(&mut |t: &dyn Explore| out = Some(t.render()));
        out
    }

    #[test]
    fn test_option_is_a_reference() {
        let some = Some(5u8);
        let none: Option<u8> = None;
        assert_eq!(some.kind(), Kind::Reference);
        assert_eq!(target_render(&some).as_deref(), Some("5"));
        assert_eq!(target_render(&none), None);
    }

    #[test]
    fn test_smart_pointers_are_transparent() {
        let boxed: Box<Vec<u8>> = Box::new(vec![1, 2]);
        assert_eq!(boxed.kind(), Kind::Sequence);
        assert_eq!(boxed.members(), vec!["0", "1"]);
        assert_eq!(boxed.type_name(), std::any::type_name::<Vec<u8>>());

        let shared: Arc<dyn Explore + Send + Sync> = Arc::new(String::from("a"));
        assert_eq!(shared.kind(), Kind::Scalar);
        assert_eq!(shared.render(), "\"a\"");
    }

    #[test]
    fn test_weak_becomes_nil_when_dropped() {
        let strong = Arc::new(3u8);
        let weak = Arc::downgrade(&strong);
        assert_eq!(target_render(&weak).as_deref(), Some("3"));
        drop(strong);
        assert_eq!(target_render(&weak), None);
    }

    #[test]
    fn test_locks_read_current_value() {
        let lock = RwLock::new(1u8);
        assert_eq!(target_render(&lock).as_deref(), Some("1"));
        *lock.write().unwrap() = 2;
        assert_eq!(target_render(&lock).as_deref(), Some("2"));

        let mutex = Mutex::new("m".to_string());
        assert_eq!(target_render(&mutex).as_deref(), Some("\"m\""));
    }

    #[test]
    fn test_poisoned_lock_is_still_readable() {
        let lock = Arc::new(Mutex::new(9u8));
        let clone = lock.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().unwrap();
            panic!("poison");
        })
        .join();
        assert!(lock.is_poisoned());
        assert_eq!(target_render(lock.as_ref()).as_deref(), Some("9"));
    }

    struct Looped {
        back: Weak<Mutex<Looped>>,
    }

    impl Explore for Looped {
        fn kind(&self) -> Kind {
            Kind::Struct
        }

        fn type_name(&self) -> &'static str {
            std::any::type_name::<Self>()
        }

        fn members(&self) -> Vec<String> {
            vec!["back".to_string()]
        }

        fn member(&self, key: &str, visit: &mut Visit<'_>) -> bool {
            if key != "back" {
                return false;
            }
            visit(&self.back);
            true
        }
    }

    #[test]
    fn test_lock_reached_again_is_nil() {
        let looped = Arc::new_cyclic(|me| Mutex::new(Looped { back: me.clone() }));
        let mut inner = None;
        let outer = looped.target(&mut |node: &dyn Explore| {
            node.member("back", &mut |back: &dyn Explore| {
                settle(back, 8, &mut |v: Option<&dyn Explore>| inner = Some(v.is_some()));
            });
        });
        assert!(outer);
        assert_eq!(inner, Some(false));

        // The lock is released and visitable again afterwards.
        assert!(looped.target(&mut |_: &dyn Explore| {}));
        assert!(looped.try_lock().is_ok());
    }

    #[test]
    fn test_same_lock_on_another_thread_is_waited_for() {
        let lock = Arc::new(RwLock::new(1u8));
        let clone = lock.clone();
        let mut seen = None;
        lock.target(&mut |_: &dyn Explore| {
            let clone = clone.clone();
            seen = std::thread::spawn(move || target_render(clone.as_ref()))
                .join()
                .unwrap();
        });
        assert_eq!(seen.as_deref(), Some("1"));
    }
}
