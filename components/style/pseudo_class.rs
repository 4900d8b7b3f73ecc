/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Pseudo-classes and sets of them.

use crate::Atom;
use smallvec::SmallVec;
use std::fmt;

/// A named pseudo-class such as `:hover` or `:focused`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PseudoClass(Atom);

impl PseudoClass {
    /// Get the pseudo-class with the given name, without the leading colon.
    pub fn new(name: &str) -> Self {
        PseudoClass(Atom::from(name.trim_start_matches(':')))
    }

    /// The name of this pseudo-class, without the leading colon.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PseudoClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

/// A set of pseudo-classes.
///
/// The set is kept sorted by name so that two sets with the same members
/// compare and hash equal, which lets them be used in cache keys.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct PseudoClassState(SmallVec<[PseudoClass; 4]>);

impl PseudoClassState {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from pseudo-class names.
    pub fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        names.into_iter().map(PseudoClass::new).collect()
    }

    fn position(&self, pseudo_class: &PseudoClass) -> Result<usize, usize> {
        self.0
            .binary_search_by(|probe| probe.name().cmp(pseudo_class.name()))
    }

    /// Add a pseudo-class, returning whether it was absent.
    pub fn insert(&mut self, pseudo_class: PseudoClass) -> bool {
        match self.position(&pseudo_class) {
            Ok(_) => false,
            Err(index) => {
                self.0.insert(index, pseudo_class);
                true
            },
        }
    }

    /// Remove a pseudo-class, returning whether it was present.
    pub fn remove(&mut self, pseudo_class: &PseudoClass) -> bool {
        match self.position(pseudo_class) {
            Ok(index) => {
                self.0.remove(index);
                true
            },
            Err(_) => false,
        }
    }

    pub fn contains(&self, pseudo_class: &PseudoClass) -> bool {
        self.position(pseudo_class).is_ok()
    }

    /// Whether every member of `other` is in this set.
    pub fn contains_all(&self, other: &PseudoClassState) -> bool {
        other.iter().all(|pseudo_class| self.contains(pseudo_class))
    }

    /// Add every member of `other` to this set.
    pub fn union_with(&mut self, other: &PseudoClassState) {
        for pseudo_class in other.iter() {
            self.insert(pseudo_class.clone());
        }
    }

    /// The members of this set that are also in `other`.
    pub fn intersection(&self, other: &PseudoClassState) -> PseudoClassState {
        PseudoClassState(
            self.0
                .iter()
                .filter(|pseudo_class| other.contains(pseudo_class))
                .cloned()
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PseudoClass> {
        self.0.iter()
    }
}

impl FromIterator<PseudoClass> for PseudoClassState {
    fn from_iter<I: IntoIterator<Item = PseudoClass>>(iter: I) -> Self {
        let mut state = PseudoClassState::new();
        for pseudo_class in iter {
            state.insert(pseudo_class);
        }
        state
    }
}

impl fmt::Display for PseudoClassState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[")?;
        for (i, pseudo_class) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", pseudo_class)?;
        }
        f.write_str("]")
    }
}
