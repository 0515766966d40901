use std::{
    fmt::Debug,
    sync::mpsc::{Receiver, Sender, SyncSender},
    thread::JoinHandle,
};

use super::{Explore, Kind, short_type_name};

/// Shows any value as an unexplorable leaf named after its type.
///
/// Used by `#[explore(opaque)]` for fields whose type doesn't implement
/// [`Explore`].
pub struct Opaque<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized> Explore for Opaque<'_, T> {
    fn kind(&self) -> Kind {
        Kind::Opaque
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shows a value as a leaf rendered with its `Debug` output.
///
/// Used by `#[explore(debug)]` for foreign types that implement `Debug` but
/// not [`Explore`].
pub struct Debugged<'a, T: ?Sized>(pub &'a T);

impl<T: Debug + ?Sized> Explore for Debugged<'_, T> {
    fn kind(&self) -> Kind {
        Kind::Scalar
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn render(&self) -> String {
        format!("{:?}", self.0)
    }
}

macro_rules! opaque {
    ($($t:ident),* $(,)?) => {$(
        impl<T> Explore for $t<T> {
            fn kind(&self) -> Kind {
                Kind::Opaque
            }

            fn type_name(&self) -> &'static str {
                std::any::type_name::<Self>()
            }

            fn render(&self) -> String {
                short_type_name(self.type_name())
            }
        }
    )*};
}

opaque!(Sender, SyncSender, Receiver, JoinHandle);
