// src/exit.rs
//! Standardized process exit codes for `rulegate`.
//!
//! Provides a stable contract for scripts and CI automation.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RulegateExit {
    /// Run completed and the verdict passed.
    Success = 0,
    /// Generic error (e.g. IO, bad configuration, unknown rule).
    Error = 1,
    /// One or more targets failed to produce a fragment.
    ExecFailed = 2,
    /// The verdict failed: findings drifted from the baseline.
    CheckFailed = 3,
}

impl RulegateExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }
}

impl Termination for RulegateExit {
    fn report(self) -> std::process::ExitCode {
        // Scripts generally rely on 0 vs non-0, but the specific codes
        // distinguish "the run broke" from "the baseline drifted".
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
