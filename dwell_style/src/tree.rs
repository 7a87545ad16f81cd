// Copyright 2025 the Dwell Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named style classes rooted at `base`.

use alloc::string::String;

use hashbrown::HashMap;
use tracing::warn;

use crate::class::{StyleClass, StyleClassBuilder};
use crate::error::StyleError;
use crate::key::{PropertyKey, StyleKey};

/// Name of the root class every tree starts with.
pub const BASE_STYLE_CLASS: &str = "base";

/// A registry of named style classes.
///
/// Classes added through the tree are kept alive by their parent, so they
/// outlive the widgets that instantiate them. Widgets get weakly held leaf
/// classes through [`instantiate_style_class`](Self::instantiate_style_class).
#[derive(Debug)]
pub struct StyleTree {
    root: StyleClass,
    classes: HashMap<String, StyleClass>,
}

impl StyleTree {
    /// Creates a tree holding only the `base` class with default values.
    #[must_use]
    pub fn new() -> Self {
        let root = StyleClassBuilder::new().name(BASE_STYLE_CLASS).build();
        let mut classes = HashMap::new();
        classes.insert(String::from(BASE_STYLE_CLASS), root.clone());
        Self { root, classes }
    }

    /// Returns the `base` class.
    #[must_use]
    pub fn root(&self) -> &StyleClass {
        &self.root
    }

    /// Returns the number of named classes, `base` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always `false`: a tree holds at least `base`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Adds a named class under `parent`, or under `base` if `None`.
    pub fn add_style_class(
        &mut self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<StyleClass, StyleError> {
        if self.classes.contains_key(name) {
            return Err(StyleError::DuplicateClass(name.into()));
        }
        let parent = match parent {
            Some(parent) => self
                .classes
                .get(parent)
                .ok_or_else(|| StyleError::UnknownParent(parent.into()))?,
            None => &self.root,
        };
        let class = parent.add_child(true, name);
        self.classes.insert(name.into(), class.clone());
        Ok(class)
    }

    /// Looks a class up by name.
    #[must_use]
    pub fn fetch_style_class(&self, name: &str) -> Option<StyleClass> {
        self.classes.get(name).cloned()
    }

    /// Sets a typed value on a named class.
    pub fn set_value<K: StyleKey>(
        &self,
        class: &str,
        key: K,
        value: K::Value,
    ) -> Result<(), StyleError> {
        self.class(class)?.set_value(key, value);
        Ok(())
    }

    /// Sets a value by textual key and value, as a stylesheet would.
    pub fn set_value_str(&self, class: &str, key: &str, value: &str) -> Result<(), StyleError> {
        let class = self.class(class)?;
        let key = PropertyKey::from_name(key).ok_or_else(|| StyleError::UnknownProperty(key.into()))?;
        class.set_value_str(key, value)
    }

    /// Creates a weakly held child of the named class for a widget.
    ///
    /// An unknown name logs a warning and falls back to `base`.
    #[must_use]
    pub fn instantiate_style_class(&self, name: &str) -> StyleClass {
        let parent = self.classes.get(name).unwrap_or_else(|| {
            warn!(class = name, "unknown style class, falling back to base");
            &self.root
        });
        parent.add_child(false, parent.name())
    }

    fn class(&self, name: &str) -> Result<&StyleClass, StyleError> {
        self.classes
            .get(name)
            .ok_or_else(|| StyleError::UnknownClass(name.into()))
    }
}

impl Default for StyleTree {
    fn default() -> Self {
        Self::new()
    }
}
