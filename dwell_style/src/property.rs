// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed property cells shared along the cascade.
//!
//! A [`StyleProperty`] is owned by exactly one [`StyleClass`](crate::StyleClass)
//! and shared by reference with every descendant that has not overridden it.

use alloc::rc::Rc;
use core::any::Any;
use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use peniko::Color;

/// Callback that coerces a value into the legal range of a property.
///
/// Constraints run when a value is stored, never when it is read, so every
/// reader observes a legal value.
pub type Constraint<T> = Rc<dyn Fn(T) -> T>;

/// Identity of a style class node.
///
/// Ids are drawn from a process-wide counter and never reused, so comparing a
/// cell's owner id against a node id is a reliable ownership test even after
/// its first owner has been dropped.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleClassId(u64);

impl StyleClassId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id value.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for StyleClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StyleClassId").field(&self.0).finish()
    }
}

/// A typed value cell with a constraint and an owning class.
pub struct StyleProperty<T> {
    owner: StyleClassId,
    value: RefCell<T>,
    constraint: Constraint<T>,
}

impl<T: Clone + 'static> StyleProperty<T> {
    /// Creates a cell owned by `owner`. The value passes through `constraint`.
    pub(crate) fn new(owner: StyleClassId, value: T, constraint: Constraint<T>) -> Self {
        let value = constraint(value);
        Self {
            owner,
            value: RefCell::new(value),
            constraint,
        }
    }

    /// Returns a copy of the stored value.
    #[must_use]
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Stores a new value after coercing it.
    pub(crate) fn set(&self, value: T) {
        let value = (self.constraint)(value);
        *self.value.borrow_mut() = value;
    }

    /// Returns the id of the class that authored this cell.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> StyleClassId {
        self.owner
    }

    /// Returns the constraint applied on every store.
    #[must_use]
    #[inline]
    pub fn constraint(&self) -> &Constraint<T> {
        &self.constraint
    }
}

impl<T: fmt::Debug> fmt::Debug for StyleProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleProperty")
            .field("owner", &self.owner)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Type-erased view of a [`StyleProperty`], so that maps can hold cells of
/// every value type and propagation does not need to know `T`.
pub(crate) trait ErasedProperty {
    fn owner(&self) -> StyleClassId;
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Clone + 'static> ErasedProperty for StyleProperty<T> {
    fn owner(&self) -> StyleClassId {
        self.owner
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// Accepts any value.
#[must_use]
pub fn unconstrained<T: 'static>() -> Constraint<T> {
    Rc::new(|value| value)
}

/// Clamps to `value >= min`. Non-finite input becomes `min`.
#[must_use]
pub fn at_least(min: f32) -> Constraint<f32> {
    Rc::new(move |value: f32| {
        if value.is_finite() {
            value.max(min)
        } else {
            min
        }
    })
}

/// Clamps to `min <= value <= max`. Non-finite input becomes `min`.
#[must_use]
pub fn clamped(min: f32, max: f32) -> Constraint<f32> {
    Rc::new(move |value: f32| {
        if value.is_finite() {
            value.clamp(min, max)
        } else {
            min
        }
    })
}

/// Clamps every color component into `[0, 1]`.
#[must_use]
pub fn unit_color() -> Constraint<Color> {
    Rc::new(|color: Color| {
        Color::new(color.components.map(|c| {
            if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 }
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = StyleClassId::next();
        let b = StyleClassId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn constraint_applies_on_creation_and_set() {
        let owner = StyleClassId::next();
        let cell = StyleProperty::new(owner, -3.0, at_least(0.0));
        assert_eq!(cell.get(), 0.0);
        cell.set(2.5);
        assert_eq!(cell.get(), 2.5);
        cell.set(f32::NAN);
        assert_eq!(cell.get(), 0.0);
        assert_eq!(cell.owner(), owner);
    }

    #[test]
    fn clamped_range() {
        let c = clamped(0.0, 1.0);
        assert_eq!(c(1.5), 1.0);
        assert_eq!(c(-1.0), 0.0);
        assert_eq!(c(0.25), 0.25);
        assert_eq!(c(f32::INFINITY), 0.0);
    }

    #[test]
    fn color_components_are_clamped() {
        let c = unit_color();
        let color = c(Color::new([2.0, -1.0, 0.5, f32::NAN]));
        assert_eq!(color.components, [1.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn erased_downcast_roundtrip() {
        let cell: Rc<dyn ErasedProperty> =
            Rc::new(StyleProperty::new(StyleClassId::next(), 1.0_f32, unconstrained()));
        assert!(cell.as_any().downcast_ref::<StyleProperty<f32>>().is_some());
        assert!(cell.as_any().downcast_ref::<StyleProperty<Color>>().is_none());
        let any = cell.into_any();
        assert!(any.downcast::<StyleProperty<f32>>().is_ok());
    }
}
