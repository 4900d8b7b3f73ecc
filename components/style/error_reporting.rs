/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Types used to report errors found while resolving styles.
//!
//! None of these errors is fatal: the property they concern is left alone
//! and resolution continues with the next one.

#![deny(missing_docs)]

use crate::Atom;
use crate::stylesheets::{Style, StyleOrigin};
use log::warn;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// An error converting a declared value into a computed value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConversionError {
    /// The value is not of a kind the converter accepts.
    Mismatch {
        /// The name of the converter.
        converter: &'static str,
        /// The offending value.
        found: String,
    },
    /// The value still contains a lookup.
    UnresolvedLookup(Atom),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConversionError::Mismatch {
                converter,
                ref found,
            } => write!(f, "{} cannot convert '{}'", converter, found),
            ConversionError::UnresolvedLookup(ref name) => {
                write!(f, "unresolved lookup '{}'", name)
            },
        }
    }
}

impl Error for ConversionError {}

/// The different kinds of errors found while resolving a property.
#[derive(Debug)]
pub enum StyleErrorKind {
    /// A declared value could not be converted.
    Conversion(ConversionError),
    /// Resolving a lookup led back to a value that was already being
    /// resolved.
    LookupCycle {
        /// The name being looked up when the cycle was found.
        lookup: Atom,
        /// The selector of the rule declaring the repeated value.
        selector: String,
    },
    /// A lookup has no matching declaration on the node or its ancestors.
    UnresolvedReference(Atom),
    /// The styleable property rejected the computed value.
    Apply(Box<dyn Error + Send + Sync>),
}

impl From<ConversionError> for StyleErrorKind {
    fn from(error: ConversionError) -> Self {
        match error {
            ConversionError::UnresolvedLookup(name) => StyleErrorKind::UnresolvedReference(name),
            error => StyleErrorKind::Conversion(error),
        }
    }
}

/// Where the declaration that caused an error came from.
#[derive(Clone, Debug, PartialEq)]
pub enum Provenance {
    /// A rule in a stylesheet loaded from a url.
    Stylesheet {
        /// The selector of the rule.
        selector: String,
        /// The url of the stylesheet.
        url: Arc<str>,
    },
    /// The inline style of the node.
    Inline,
    /// Unknown.
    Unknown,
}

impl Provenance {
    /// The provenance of a style.
    pub fn of(style: &Style) -> Self {
        match style.declaration.stylesheet_url {
            Some(ref url) => Provenance::Stylesheet {
                selector: style.selector.to_string(),
                url: url.clone(),
            },
            None if style.declaration.origin == StyleOrigin::Inline => Provenance::Inline,
            None => Provenance::Unknown,
        }
    }
}

/// An error found while resolving or applying a property of a node.
#[derive(Debug)]
pub struct StyleError {
    /// What went wrong.
    pub kind: StyleErrorKind,
    /// A description of the node being styled.
    pub node: String,
    /// The property being resolved.
    pub property: Atom,
    /// Where the offending declaration came from.
    pub provenance: Provenance,
}

impl StyleError {
    /// Create an error for `property` on `node`.
    pub fn new(kind: StyleErrorKind, node: String, property: Atom, style: Option<&Style>) -> Self {
        StyleError {
            kind,
            node,
            property,
            provenance: style.map_or(Provenance::Unknown, Provenance::of),
        }
    }
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            StyleErrorKind::Conversion(ref error) => write!(
                f,
                "Caught '{}' while calculating value for '{}'",
                error, self.property
            )?,
            StyleErrorKind::LookupCycle {
                ref lookup,
                ref selector,
            } => write!(
                f,
                "Loop detected in {} while resolving '{}' for '{}'",
                selector, lookup, self.property
            )?,
            StyleErrorKind::UnresolvedReference(ref name) => write!(
                f,
                "Could not resolve '{}' while resolving lookups for '{}'",
                name, self.property
            )?,
            StyleErrorKind::Apply(ref error) => {
                return write!(
                    f,
                    "Failed to set css [{}] on {} due to {}",
                    self.property, self.node, error
                );
            },
        }
        match self.provenance {
            Provenance::Stylesheet {
                ref selector,
                ref url,
            } => write!(f, " from rule '{}' in stylesheet {}", selector, url),
            Provenance::Inline => write!(f, " from inline style on {}", self.node),
            Provenance::Unknown => Ok(()),
        }
    }
}

impl Error for StyleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.kind {
            StyleErrorKind::Conversion(ref error) => Some(error),
            StyleErrorKind::Apply(ref error) => Some(&**error),
            _ => None,
        }
    }
}

/// A generic trait for an error reporter.
pub trait StyleErrorReporter: Send + Sync {
    /// Called when the style engine recovers from an error.
    fn report_error(&self, error: StyleError);
}

/// An error reporter that uses [the `log` crate](https://github.com/rust-lang/log)
/// at `warn` level.
pub struct RustLogReporter;

impl StyleErrorReporter for RustLogReporter {
    fn report_error(&self, error: StyleError) {
        warn!("{}", error);
    }
}

/// Error reporter which silently forgets errors
pub struct NullReporter;

impl StyleErrorReporter for NullReporter {
    fn report_error(&self, _: StyleError) {
        // do nothing
    }
}

/// Error reporter which logs errors and keeps them until they are taken.
#[derive(Default)]
pub struct CollectingReporter {
    errors: Mutex<Vec<StyleError>>,
}

impl CollectingReporter {
    /// Create a reporter with no errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the errors reported so far.
    pub fn take_errors(&self) -> Vec<StyleError> {
        std::mem::take(&mut *self.errors.lock())
    }
}

impl StyleErrorReporter for CollectingReporter {
    fn report_error(&self, error: StyleError) {
        warn!("{}", error);
        self.errors.lock().push(error);
    }
}

impl<R: StyleErrorReporter + ?Sized> StyleErrorReporter for Arc<R> {
    fn report_error(&self, error: StyleError) {
        (**self).report_error(error)
    }
}
