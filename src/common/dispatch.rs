//! Tag Dispatch
//!
//! A [`Dispatcher`] routes tagged tuple values, lists of the form
//! `(tag arg ...)`, to handler functions registered for each tag. The set
//! of tags is closed once construction finishes; registration happens only
//! through the builder and there is no way to add handlers afterwards.
//!
//! Callers may supply extra leading arguments at dispatch time; these are
//! prepended to the tuple's own arguments before the handler runs.

use crate::common::sexp::Sexp;
use std::collections::HashMap;
use std::fmt;

/// Dispatch failed: no handler for the tag, or the value is not a tagged
/// tuple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The value is tagged but no handler is registered for its tag.
    UnknownTag { tag: String, value: Sexp },
    /// The value is not a list headed by a symbol.
    NotTagged { value: Sexp },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownTag { tag, value } => {
                write!(f, "dispatch failed: no handler for tag `{}` in {}", tag, value)
            }
            DispatchError::NotTagged { value } => {
                write!(f, "dispatch failed: {} is not a tagged tuple", value)
            }
        }
    }
}

impl std::error::Error for DispatchError {}

type Handler<T> = Box<dyn Fn(&[Sexp]) -> T>;

/// A tag-indexed table of handler functions.
pub struct Dispatcher<T> {
    handlers: HashMap<&'static str, Handler<T>>,
}

impl<T> Dispatcher<T> {
    pub fn new() -> Self {
        Dispatcher {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `tag`. A later registration for the same tag
    /// replaces the earlier one.
    pub fn on(mut self, tag: &'static str, handler: impl Fn(&[Sexp]) -> T + 'static) -> Self {
        self.handlers.insert(tag, Box::new(handler));
        self
    }

    /// Dispatch on a tagged tuple, prepending `extra` to its arguments.
    pub fn dispatch(&self, value: &Sexp, extra: &[Sexp]) -> Result<T, DispatchError> {
        let (tag, args) = value.tag().ok_or_else(|| DispatchError::NotTagged {
            value: value.clone(),
        })?;
        let handler = self.handlers.get(tag).ok_or_else(|| DispatchError::UnknownTag {
            tag: tag.to_string(),
            value: value.clone(),
        })?;
        let mut argv = extra.to_vec();
        argv.extend_from_slice(args);
        Ok(handler(&argv))
    }
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}
