// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Style class nodes and copy-on-write propagation.

use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;
use tracing::{debug, trace, warn};

use crate::error::StyleError;
use crate::key::{Assignment, PropertyKey, StyleKey};
use crate::property::{Constraint, ErasedProperty, StyleClassId, StyleProperty};

type PropertyMap = HashMap<PropertyKey, Rc<dyn ErasedProperty>>;

struct StyleClassData {
    id: StyleClassId,
    name: String,
    parent: Weak<StyleClassData>,
    properties: RefCell<PropertyMap>,
    // Keeps children alive; only filled for children added with `store_shared`.
    children: RefCell<Vec<StyleClass>>,
    weak_children: RefCell<Vec<Weak<StyleClassData>>>,
}

impl StyleClassData {
    /// Upgrades every live child and forgets the dead ones.
    fn live_children(&self) -> Vec<Rc<Self>> {
        let mut weak_children = self.weak_children.borrow_mut();
        weak_children.retain(|child| child.strong_count() > 0);
        weak_children.iter().filter_map(Weak::upgrade).collect()
    }

    fn owns(&self, key: PropertyKey) -> bool {
        self.properties
            .borrow()
            .get(&key)
            .is_some_and(|cell| cell.owner() == self.id)
    }
}

/// A named node of the style cascade.
///
/// A class either owns a property cell or shares the cell of its nearest
/// ancestor that does. Setting a value on a class that does not own the key
/// allocates an owned cell and pushes it down to every descendant that still
/// shares the old one.
///
/// `StyleClass` is a cheap handle: cloning it clones an [`Rc`].
///
/// ```rust
/// use dwell_style::{FloatProperty, StyleClassBuilder};
///
/// let root = StyleClassBuilder::new().name("base").build();
/// let child = root.add_child(true, "panel");
///
/// child.set_value(FloatProperty::AnimationDuration, 0.5);
/// let grandchild = child.add_child(false, "button");
///
/// assert_eq!(root.get_value(FloatProperty::AnimationDuration), 0.1);
/// assert_eq!(grandchild.get_value(FloatProperty::AnimationDuration), 0.5);
/// assert!(child.owns(FloatProperty::AnimationDuration));
/// assert!(!grandchild.owns(FloatProperty::AnimationDuration));
/// ```
#[derive(Clone)]
pub struct StyleClass {
    inner: Rc<StyleClassData>,
}

impl StyleClass {
    /// Returns the identity of this node.
    #[must_use]
    #[inline]
    pub fn id(&self) -> StyleClassId {
        self.inner.id
    }

    /// Returns the name of this node.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns the parent, if it is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.inner.parent.upgrade().map(|inner| Self { inner })
    }

    /// Returns every live child.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.inner
            .live_children()
            .into_iter()
            .map(|inner| Self { inner })
            .collect()
    }

    /// Returns `true` if this node authored the cell it uses for `key`.
    #[must_use]
    pub fn owns(&self, key: impl Into<PropertyKey>) -> bool {
        self.inner.owns(key.into())
    }

    /// Returns the value this node sees for `key`.
    ///
    /// A key absent from the node falls back to its default value and logs a
    /// warning.
    #[must_use]
    pub fn get_value<K: StyleKey>(&self, key: K) -> K::Value {
        match self.fetch_property(key) {
            Some(cell) => cell.get(),
            None => {
                let name: PropertyKey = key.into();
                warn!(class = %self.name(), key = %name, "style property missing, using default");
                key.default_value()
            }
        }
    }

    /// Returns the cell this node uses for `key`.
    #[must_use]
    pub fn fetch_property<K: StyleKey>(&self, key: K) -> Option<Rc<StyleProperty<K::Value>>> {
        let cell = self.inner.properties.borrow().get(&key.into()).cloned()?;
        cell.into_any().downcast().ok()
    }

    /// Sets `key` on this node and propagates to descendants that share it.
    ///
    /// The value passes through the key's constraint before it is stored.
    pub fn set_value<K: StyleKey>(&self, key: K, value: K::Value) {
        let current = self.fetch_property(key);
        if let Some(cell) = &current {
            if cell.owner() == self.id() {
                cell.set(value);
                return;
            }
        }
        let constraint: Constraint<K::Value> = match &current {
            Some(cell) => Rc::clone(cell.constraint()),
            None => key.default_constraint(),
        };
        let cell: Rc<dyn ErasedProperty> =
            Rc::new(StyleProperty::new(self.id(), value, constraint));
        let key = key.into();
        self.inner
            .properties
            .borrow_mut()
            .insert(key, Rc::clone(&cell));
        self.propagate(key, &cell);
    }

    /// Parses `text` according to the family of `key` and sets it.
    ///
    /// Floats use the usual decimal notation, colors are hex `RRGGBBAA` (or
    /// `RRGGBB`), strings are taken verbatim.
    pub fn set_value_str(&self, key: PropertyKey, text: &str) -> Result<(), StyleError> {
        self.assign(key.parse_assignment(text)?);
        Ok(())
    }

    pub(crate) fn assign(&self, assignment: Assignment) {
        match assignment {
            Assignment::Float(key, value) => self.set_value(key, value),
            Assignment::Color(key, value) => self.set_value(key, value),
            Assignment::String(key, value) => self.set_value(key, value),
        }
    }

    /// Creates a child that shares every cell of this node.
    ///
    /// With `store_shared` this node keeps the child alive. Otherwise the
    /// caller's handle is the only strong reference.
    pub fn add_child(&self, store_shared: bool, name: impl Into<String>) -> Self {
        let properties = self.inner.properties.borrow().clone();
        let child = Self {
            inner: Rc::new(StyleClassData {
                id: StyleClassId::next(),
                name: name.into(),
                parent: Rc::downgrade(&self.inner),
                properties: RefCell::new(properties),
                children: RefCell::new(Vec::new()),
                weak_children: RefCell::new(Vec::new()),
            }),
        };
        self.inner
            .weak_children
            .borrow_mut()
            .push(Rc::downgrade(&child.inner));
        if store_shared {
            self.inner.children.borrow_mut().push(child.clone());
        }
        debug!(class = %child.name(), parent = %self.name(), store_shared, "style class created");
        child
    }

    /// Finds this node or a descendant by name, depth first.
    #[must_use]
    pub fn fetch_this_or_child(&self, name: &str) -> Option<Self> {
        let mut stack = Vec::from([Rc::clone(&self.inner)]);
        while let Some(node) = stack.pop() {
            if node.name == name {
                return Some(Self { inner: node });
            }
            let mut children = node.live_children();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    fn propagate(&self, key: PropertyKey, cell: &Rc<dyn ErasedProperty>) {
        let mut stack = self.inner.live_children();
        while let Some(node) = stack.pop() {
            if node.owns(key) {
                continue;
            }
            node.properties.borrow_mut().insert(key, Rc::clone(cell));
            trace!(class = %node.name, %key, "style property pushed down");
            stack.extend(node.live_children());
        }
    }
}

impl PartialEq for StyleClass {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for StyleClass {}

impl fmt::Debug for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleClass")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

/// Builder for a root [`StyleClass`].
///
/// The root owns a cell for every key, initialised with the key's default
/// value and constraint unless overridden here.
pub struct StyleClassBuilder {
    id: StyleClassId,
    name: String,
    properties: PropertyMap,
}

impl StyleClassBuilder {
    /// Creates a builder for a root named `base`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: StyleClassId::next(),
            name: String::from("base"),
            properties: HashMap::new(),
        }
    }

    /// Sets the name of the root.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the initial value of `key`, keeping its default constraint.
    #[must_use]
    pub fn set<K: StyleKey>(self, key: K, value: K::Value) -> Self {
        let constraint = key.default_constraint();
        self.constrain(key, value, constraint)
    }

    /// Sets the initial value of `key` together with its constraint.
    ///
    /// Classes that later override the key inherit this constraint.
    #[must_use]
    pub fn constrain<K: StyleKey>(
        mut self,
        key: K,
        value: K::Value,
        constraint: Constraint<K::Value>,
    ) -> Self {
        let cell: Rc<dyn ErasedProperty> = Rc::new(StyleProperty::new(self.id, value, constraint));
        self.properties.insert(key.into(), cell);
        self
    }

    /// Builds the root class.
    #[must_use]
    pub fn build(self) -> StyleClass {
        let Self {
            id,
            name,
            mut properties,
        } = self;
        for key in PropertyKey::all() {
            properties
                .entry(key)
                .or_insert_with(|| default_cell(id, key));
        }
        debug!(class = %name, "root style class created");
        StyleClass {
            inner: Rc::new(StyleClassData {
                id,
                name,
                parent: Weak::new(),
                properties: RefCell::new(properties),
                children: RefCell::new(Vec::new()),
                weak_children: RefCell::new(Vec::new()),
            }),
        }
    }
}

impl Default for StyleClassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StyleClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleClassBuilder")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("overrides", &self.properties.len())
            .finish()
    }
}

fn default_cell(owner: StyleClassId, key: PropertyKey) -> Rc<dyn ErasedProperty> {
    fn cell<K: StyleKey>(owner: StyleClassId, key: K) -> Rc<dyn ErasedProperty> {
        Rc::new(StyleProperty::new(
            owner,
            key.default_value(),
            key.default_constraint(),
        ))
    }
    match key {
        PropertyKey::Float(key) => cell(owner, key),
        PropertyKey::Color(key) => cell(owner, key),
        PropertyKey::String(key) => cell(owner, key),
    }
}
