//! Strongly typed arena indices.
//!
//! Every entity in the simulation is addressed by an index into an arena
//! `Vec` owned by the kernel or the dispatch world.  Back-references between
//! entities (a timer pointing at its call, a call pointing at its process)
//! are stored as these ids, never as references.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// Index of a resumable process in the kernel's process arena.
    pub struct ProcessId(u32);
}

typed_id! {
    /// Index of a call record in the dispatch world's call arena.
    pub struct CallId(u32);
}

typed_id! {
    /// Index of a reassessment timer record.
    pub struct TimerId(u32);
}
