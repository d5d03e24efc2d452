//! S-expression Values
//!
//! This module defines the tagged tree value that flows between compiler
//! passes. Every intermediate representation in a pipeline is an [`Sexp`];
//! the final pass of a code-generation pipeline produces the flat-text
//! variant [`Sexp::Str`] holding assembly source.
//!
//! Deep equality (`PartialEq`) is what the differential checker uses to
//! compare interpreter results.

use std::fmt;

/// A recursively nested tagged tree value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sexp {
    Int(i64),
    Bool(bool),
    Sym(String),
    Str(String),
    List(Vec<Sexp>),
}

impl Sexp {
    /// Construct a symbol.
    pub fn sym(name: &str) -> Sexp {
        Sexp::Sym(name.to_string())
    }

    /// Construct a list.
    pub fn list(items: Vec<Sexp>) -> Sexp {
        Sexp::List(items)
    }

    /// View this value as a tagged tuple: a list whose head is a symbol.
    ///
    /// Returns the tag and the remaining arguments, or `None` if the value
    /// is not in tagged-tuple shape.
    pub fn tag(&self) -> Option<(&str, &[Sexp])> {
        match self {
            Sexp::List(items) => match items.split_first() {
                Some((Sexp::Sym(tag), args)) => Some((tag, args)),
                _ => None,
            },
            _ => None,
        }
    }

    /// View this value as flat text (the shape a final code-gen pass must
    /// produce).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Sexp::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for Sexp {
    fn from(n: i64) -> Self {
        Sexp::Int(n)
    }
}

impl From<bool> for Sexp {
    fn from(b: bool) -> Self {
        Sexp::Bool(b)
    }
}

impl From<&str> for Sexp {
    fn from(name: &str) -> Self {
        Sexp::sym(name)
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sexp::Int(n) => write!(f, "{}", n),
            Sexp::Bool(true) => write!(f, "#t"),
            Sexp::Bool(false) => write!(f, "#f"),
            Sexp::Sym(s) => write!(f, "{}", s),
            Sexp::Str(s) => write!(f, "{:?}", s),
            Sexp::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Sexp::list(vec![
            Sexp::sym("+"),
            Sexp::Int(1),
            Sexp::list(vec![Sexp::sym("-"), Sexp::Int(2)]),
        ]);
        assert_eq!(e.to_string(), "(+ 1 (- 2))");
        assert_eq!(Sexp::Bool(true).to_string(), "#t");
        assert_eq!(Sexp::Bool(false).to_string(), "#f");
    }

    #[test]
    fn test_tag() {
        let e = Sexp::list(vec![Sexp::sym("add"), Sexp::Int(2), Sexp::Int(3)]);
        let (tag, args) = e.tag().unwrap();
        assert_eq!(tag, "add");
        assert_eq!(args, &[Sexp::Int(2), Sexp::Int(3)]);

        assert!(Sexp::Int(5).tag().is_none());
        assert!(Sexp::list(vec![Sexp::Int(1)]).tag().is_none());
        assert!(Sexp::List(vec![]).tag().is_none());
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Sexp::Str("mov".to_string()).as_text(), Some("mov"));
        assert_eq!(Sexp::sym("mov").as_text(), None);
    }
}
