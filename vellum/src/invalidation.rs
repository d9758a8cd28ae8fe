//! Per-component dirty flags and the re-entrancy guard of a validation pass.

use core::cell::Cell;
use core::fmt;
use core::ops::{BitOr, BitOrAssign};

/// A set of invalidation flags.
///
/// Each constant names one concern a component may need to recompute. [`DirtyFlags::ALL`] is the
/// union of every flag, so a set containing it answers `true` for any query.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirtyFlags(u16);

impl DirtyFlags {
    pub const NONE: Self = Self(0);
    pub const SIZE: Self = Self(1 << 0);
    pub const DATA: Self = Self(1 << 1);
    pub const STATE: Self = Self(1 << 2);
    pub const SKIN: Self = Self(1 << 3);
    pub const SCROLL: Self = Self(1 << 4);
    pub const SELECTION: Self = Self(1 << 5);
    pub const RENDERER: Self = Self(1 << 6);
    pub const TEXT: Self = Self(1 << 7);
    pub const ICON: Self = Self(1 << 8);
    pub const ALL: Self = Self((1 << 9) - 1);

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if any flag of `other` is set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if every flag of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for DirtyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for DirtyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(DirtyFlags, &str); 9] = [
            (DirtyFlags::SIZE, "SIZE"),
            (DirtyFlags::DATA, "DATA"),
            (DirtyFlags::STATE, "STATE"),
            (DirtyFlags::SKIN, "SKIN"),
            (DirtyFlags::SCROLL, "SCROLL"),
            (DirtyFlags::SELECTION, "SELECTION"),
            (DirtyFlags::RENDERER, "RENDERER"),
            (DirtyFlags::TEXT, "TEXT"),
            (DirtyFlags::ICON, "ICON"),
        ];
        if *self == Self::ALL {
            return f.write_str("DirtyFlags(ALL)");
        }
        let mut set = f.debug_set();
        for (flag, name) in NAMES {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}

/// The invalidation bookkeeping of one component.
///
/// Interior mutability lets event handlers holding a `Weak` to this set mark their owner dirty
/// without borrowing the component itself. A fresh set is fully invalid.
#[derive(Debug)]
pub struct InvalidationSet {
    flags: Cell<DirtyFlags>,
    validating: Cell<bool>,
}

impl Default for InvalidationSet {
    fn default() -> Self {
        Self::new()
    }
}

impl InvalidationSet {
    pub fn new() -> Self {
        Self {
            flags: Cell::new(DirtyFlags::ALL),
            validating: Cell::new(false),
        }
    }

    pub fn flags(&self) -> DirtyFlags {
        self.flags.get()
    }

    pub fn invalidate(&self, flags: DirtyFlags) {
        self.flags.set(self.flags.get() | flags);
    }

    /// `flags` may be [`DirtyFlags::ALL`] to ask whether anything is dirty.
    pub fn is_invalid(&self, flags: DirtyFlags) -> bool {
        self.flags.get().intersects(flags)
    }

    pub fn is_valid(&self) -> bool {
        self.flags.get().is_empty()
    }

    pub fn is_validating(&self) -> bool {
        self.validating.get()
    }

    /// Stores `value` in `slot` and marks `flags` dirty, unless the value is unchanged.
    ///
    /// Returns `true` if the slot changed.
    pub fn assign<V: PartialEq>(&self, slot: &mut V, value: V, flags: DirtyFlags) -> bool {
        if *slot == value {
            return false;
        }
        *slot = value;
        self.invalidate(flags);
        true
    }

    pub(crate) fn begin_pass(&self) {
        self.validating.set(true);
    }

    /// Clears every flag and drops the re-entrancy guard. Only the outermost pass calls this.
    pub(crate) fn finish_pass(&self) {
        self.flags.set(DirtyFlags::NONE);
        self.validating.set(false);
    }
}
