//! Shared Infrastructure
//!
//! Value representation and generic helpers used by every other component:
//!
//! - `sexp`: the tagged tree value exchanged between passes
//! - `util`: dual-result map and association lookup
//! - `dispatch`: tag-indexed handler tables
//! - `debug`: gated diagnostic printing

pub mod debug;
pub mod dispatch;
pub mod sexp;
pub mod util;

pub use debug::{soft_assert, DebugLog};
pub use dispatch::{DispatchError, Dispatcher};
pub use sexp::Sexp;
pub use util::{lookup, map2, LookupError};
