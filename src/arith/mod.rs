//! Straight-line Arithmetic Language
//!
//! A deliberately small language used to exercise the harness end to end:
//!
//! ```text
//! program ::= (program exp)
//! exp     ::= int | (read) | (- exp) | (+ exp exp)
//! ```
//!
//! It supplies the collaborators a pipeline needs: a reference interpreter,
//! a semantics-preserving constant-folding pass, and a final code-gen pass
//! producing x86-64 assembly. The emitted `main` returns the program's
//! value as its exit code; `(read)` calls the `read_int` function from the
//! runtime object.

use crate::backend::x86_64::regs::{align, label_name};
use crate::common::debug::DebugLog;
use crate::common::sexp::Sexp;
use crate::pipeline::{Pass, Pipeline};
use std::fs;
use std::io::{self, BufRead};
use std::path::Path;

/// Where `(read)` takes its integers from.
enum ReadSource {
    /// Tokens of the test's input file, consumed left to right.
    File { values: Vec<i64>, next: usize },
    Stdin,
}

impl ReadSource {
    fn from_file(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("cannot read input {}: {}", path.display(), e))?;
        let values = text
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<i64>()
                    .map_err(|e| format!("bad input token `{}`: {}", token, e))
            })
            .collect::<Result<Vec<i64>, String>>()?;
        Ok(ReadSource::File { values, next: 0 })
    }

    fn next_int(&mut self) -> Result<i64, String> {
        match self {
            ReadSource::File { values, next } => {
                let value = values
                    .get(*next)
                    .copied()
                    .ok_or_else(|| "input exhausted".to_string())?;
                *next += 1;
                Ok(value)
            }
            ReadSource::Stdin => {
                let mut line = String::new();
                io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|e| e.to_string())?;
                let token = line.trim();
                token
                    .parse::<i64>()
                    .map_err(|e| format!("bad input `{}`: {}", token, e))
            }
        }
    }
}

fn program_body(program: &Sexp) -> Result<&Sexp, String> {
    match program.tag() {
        Some(("program", [body])) => Ok(body),
        _ => Err(format!("not a program: {}", program)),
    }
}

fn interp_exp(exp: &Sexp, input: &mut ReadSource) -> Result<i64, String> {
    match exp {
        Sexp::Int(n) => Ok(*n),
        _ => match exp.tag() {
            Some(("read", [])) => input.next_int(),
            Some(("-", [e])) => Ok(-interp_exp(e, input)?),
            Some(("+", [a, b])) => Ok(interp_exp(a, input)? + interp_exp(b, input)?),
            _ => Err(format!("unknown expression: {}", exp)),
        },
    }
}

/// Reference interpreter.
///
/// `input` redirects `(read)`; without it, integers come from the
/// process's standard input, one per line.
pub fn interp(program: &Sexp, input: Option<&Path>) -> Result<Sexp, String> {
    let body = program_body(program)?;
    let mut source = match input {
        Some(path) => ReadSource::from_file(path)?,
        None => ReadSource::Stdin,
    };
    Ok(Sexp::Int(interp_exp(body, &mut source)?))
}

fn fold_exp(exp: Sexp) -> Sexp {
    match exp {
        Sexp::List(items) => {
            let folded: Vec<Sexp> = items.into_iter().map(fold_exp).collect();
            match folded.as_slice() {
                [Sexp::Sym(op), Sexp::Int(a), Sexp::Int(b)] if op.as_str() == "+" => {
                    Sexp::Int(a + b)
                }
                [Sexp::Sym(op), Sexp::Int(a)] if op.as_str() == "-" => Sexp::Int(-a),
                _ => Sexp::List(folded),
            }
        }
        atom => atom,
    }
}

/// Constant folding: collapses `(+ int int)` and `(- int)` subtrees.
/// `(read)` is opaque, so anything containing it survives.
pub fn fold_constants(program: Sexp) -> Sexp {
    fold_exp(program)
}

/// Stack slots needed to evaluate an expression without clobbering
/// pending operands.
fn temp_slots(exp: &Sexp) -> i64 {
    match exp {
        Sexp::Int(_) => 0,
        _ => match exp.tag() {
            Some(("read", [])) => 0,
            Some(("-", [e])) => temp_slots(e),
            Some(("+", [a, b])) => temp_slots(a).max(temp_slots(b) + 1),
            _ => panic!("emit_x86: unsupported expression {}", exp),
        },
    }
}

fn emit_exp(exp: &Sexp, next_slot: i64, lines: &mut Vec<String>) {
    match exp {
        Sexp::Int(n) => lines.push(format!("\tmovq\t${}, %rax", n)),
        _ => match exp.tag() {
            Some(("read", [])) => lines.push(format!("\tcallq\t{}", label_name("read_int"))),
            Some(("-", [e])) => {
                emit_exp(e, next_slot, lines);
                lines.push("\tnegq\t%rax".to_string());
            }
            Some(("+", [a, b])) => {
                emit_exp(a, next_slot, lines);
                let offset = -8 * (next_slot + 1);
                lines.push(format!("\tmovq\t%rax, {}(%rbp)", offset));
                emit_exp(b, next_slot + 1, lines);
                lines.push(format!("\taddq\t{}(%rbp), %rax", offset));
            }
            _ => panic!("emit_x86: unsupported expression {}", exp),
        },
    }
}

/// Final pass: emit AT&T-syntax x86-64 assembly as flat text.
///
/// Intermediates live in a fixed frame below `%rbp`, sized to a 16-byte
/// multiple so every `read_int` call sees an aligned stack.
pub fn emit_x86(program: Sexp) -> Sexp {
    let body = match program.tag() {
        Some(("program", [body])) => body,
        _ => panic!("emit_x86: not a program: {}", program),
    };

    let mut lines = Vec::new();
    let main = label_name("main");
    lines.push(format!("\t.globl {}", main));
    lines.push(format!("{}:", main));
    lines.push("\tpushq\t%rbp".to_string());
    lines.push("\tmovq\t%rsp, %rbp".to_string());
    let frame = align(8 * temp_slots(body), 16);
    if frame > 0 {
        lines.push(format!("\tsubq\t${}, %rsp", frame));
    }
    emit_exp(body, 0, &mut lines);
    if frame > 0 {
        lines.push(format!("\taddq\t${}, %rsp", frame));
    }
    lines.push("\tpopq\t%rbp".to_string());
    lines.push("\tretq".to_string());
    Sexp::Str(lines.join("\n"))
}

/// The standard two-pass pipeline for this language.
pub fn pipeline(debug: DebugLog) -> Pipeline {
    Pipeline::new(
        "arith",
        vec![
            Pass::checked("fold_constants", fold_constants, interp),
            Pass::new("emit_x86", emit_x86),
        ],
    )
    .with_debug(debug)
}
