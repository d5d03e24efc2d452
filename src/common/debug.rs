//! Debug Logging
//!
//! Gated diagnostic printing. A [`DebugLog`] is an explicit context passed
//! by value into the pipeline and drivers; components never consult global
//! state, so two runs in the same process can log independently.

use std::env;
use std::fmt;

/// Logging context gating diagnostic output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugLog {
    enabled: bool,
}

impl DebugLog {
    pub fn new(enabled: bool) -> Self {
        DebugLog { enabled }
    }

    /// Read the gate from the `TANDEM_DEBUG` environment variable.
    pub fn from_env() -> Self {
        DebugLog::new(env::var("TANDEM_DEBUG").is_ok())
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Print a label and a rendering of `value` when enabled.
    pub fn print(&self, label: &str, value: &dyn fmt::Display) {
        if self.enabled {
            eprintln!("{}:\n{}\n", label, value);
        }
    }
}

/// Advisory check: warn and continue.
pub fn soft_assert(cond: bool, msg: &str) {
    if !cond {
        eprintln!("warning: {}", msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_by_default() {
        assert!(!DebugLog::default().enabled());
    }

    #[test]
    fn test_print_is_silent_when_disabled() {
        // Must not panic or require the value to be cheap.
        DebugLog::new(false).print("tree", &"unused");
        DebugLog::new(true).print("tree", &42);
    }

    #[test]
    fn test_soft_assert_continues() {
        soft_assert(true, "never shown");
        soft_assert(false, "shown but not fatal");
    }
}
