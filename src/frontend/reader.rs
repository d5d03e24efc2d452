//! Program Reader
//!
//! Parses the s-expression surface syntax that test programs are written
//! in. The reader accepts integers, `#t`/`#f` booleans, double-quoted
//! strings, symbols, `(...)` and `[...]` lists, and `;` line comments, and
//! produces the [`Sexp`] tree the pipeline operates on.

use crate::common::sexp::Sexp;
use chumsky::prelude::*;
use std::fmt;
use std::ops::Range;

/// The program text could not be parsed.
#[derive(Clone, Debug)]
pub struct ReadError {
    /// One `(message, byte span)` pair per parse error.
    pub errors: Vec<(String, Range<usize>)>,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (message, span)) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "read error at {}..{}: {}", span.start, span.end, message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReadError {}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "+-*/<>=!?_.".contains(c)
}

/// Parser for a single s-expression, surrounded by whitespace and comments.
pub fn sexp_parser<'src>() -> impl Parser<'src, &'src str, Sexp, extra::Err<Rich<'src, char>>> {
    recursive(|sexp| {
        let int = just('-')
            .or_not()
            .then(text::int(10))
            .to_slice()
            .from_str()
            .unwrapped()
            .map(Sexp::Int);

        let boolean = just("#t")
            .to(Sexp::Bool(true))
            .or(just("#f").to(Sexp::Bool(false)));

        let string = none_of('"')
            .repeated()
            .collect::<String>()
            .delimited_by(just('"'), just('"'))
            .map(Sexp::Str);

        let symbol = any()
            .filter(|c: &char| is_symbol_char(*c))
            .repeated()
            .at_least(1)
            .collect::<String>()
            .map(Sexp::Sym);

        // Elements carry their own padding; the extra pad makes `( )` legal.
        let items = sexp.repeated().collect::<Vec<_>>().padded();
        let list = items
            .clone()
            .delimited_by(just('('), just(')'))
            .or(items.delimited_by(just('['), just(']')))
            .map(Sexp::List);

        let comment = just(';')
            .then(any().and_is(just('\n').not()).repeated())
            .padded();

        choice((list, boolean, int, string, symbol))
            .padded_by(comment.repeated())
            .padded()
    })
}

/// Read one program from source text.
pub fn read_str(source: &str) -> Result<Sexp, ReadError> {
    sexp_parser()
        .then_ignore(end())
        .parse(source)
        .into_result()
        .map_err(|errors| ReadError {
            errors: errors
                .iter()
                .map(|e| {
                    let span = e.span();
                    (e.to_string(), span.start..span.end)
                })
                .collect(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_int() {
        assert_eq!(read_str("42").unwrap(), Sexp::Int(42));
        assert_eq!(read_str("-7").unwrap(), Sexp::Int(-7));
    }

    #[test]
    fn test_read_bool() {
        assert_eq!(read_str("#t").unwrap(), Sexp::Bool(true));
        assert_eq!(read_str("#f").unwrap(), Sexp::Bool(false));
    }

    #[test]
    fn test_read_symbol() {
        assert_eq!(read_str("read").unwrap(), Sexp::sym("read"));
        assert_eq!(read_str("-").unwrap(), Sexp::sym("-"));
    }

    #[test]
    fn test_read_string() {
        assert_eq!(
            read_str("\"hello\"").unwrap(),
            Sexp::Str("hello".to_string())
        );
    }

    #[test]
    fn test_read_nested_list() {
        let program = read_str("(program (+ 2 (- (read))))").unwrap();
        assert_eq!(
            program,
            Sexp::list(vec![
                Sexp::sym("program"),
                Sexp::list(vec![
                    Sexp::sym("+"),
                    Sexp::Int(2),
                    Sexp::list(vec![
                        Sexp::sym("-"),
                        Sexp::list(vec![Sexp::sym("read")]),
                    ]),
                ]),
            ])
        );
    }

    #[test]
    fn test_read_brackets_and_empty_list() {
        assert_eq!(
            read_str("[1 2]").unwrap(),
            Sexp::list(vec![Sexp::Int(1), Sexp::Int(2)])
        );
        assert_eq!(read_str("( )").unwrap(), Sexp::List(vec![]));
    }

    #[test]
    fn test_read_comments_and_whitespace() {
        let src = "; a program\n  (+ 1 2) ; trailing\n";
        assert_eq!(
            read_str(src).unwrap(),
            Sexp::list(vec![Sexp::sym("+"), Sexp::Int(1), Sexp::Int(2)])
        );
    }

    #[test]
    fn test_read_unbalanced_fails() {
        assert!(read_str("(+ 1 2").is_err());
        assert!(read_str(")").is_err());
    }

    #[test]
    fn test_read_error_carries_spans() {
        let err = read_str("(+ 1").unwrap_err();
        assert!(!err.errors.is_empty());
        assert!(!err.to_string().is_empty());
    }
}
