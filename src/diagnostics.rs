// src/diagnostics.rs

use std::io;
use tracing::warn;

/// Receiver for read errors that are swallowed while iterating.
///
/// A failing read ends the current sequence as if the stream had run out; the
/// sink is the only place the failure is visible.
pub trait Diagnostics {
    fn read_failed(&self, err: &io::Error);
}

/// Default sink: logs every swallowed error at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn read_failed(&self, err: &io::Error) {
        warn!(error = %err, kind = ?err.kind(), "read failed, ending iteration");
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&io::Error),
{
    fn read_failed(&self, err: &io::Error) {
        self(err)
    }
}
