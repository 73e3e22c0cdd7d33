//! Scan instrumentation.
//!
//! `scan_span!` opens an info span tagged with the offset grid of a scan and
//! `scan_outcome!` reports the counters a scan ends with. Both forward to
//! `tracing` when the `tracing` feature is on and reduce to plain evaluation
//! of their arguments otherwise.

/// Opens a span for a scan over `grid`, plus optional extra fields.
#[cfg(feature = "tracing")]
macro_rules! scan_span {
    ($name:literal, $grid:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let grid: $crate::search::scan::OffsetGrid = $grid;
        tracing::info_span!($name, cols = grid.cols, rows = grid.rows $(, $key = $value)*)
    }};
}

#[cfg(not(feature = "tracing"))]
macro_rules! scan_span {
    ($name:literal, $grid:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let _ = ($grid, $($value,)*);
        $crate::trace::ScanGuard
    }};
}

/// Reports the counters of a finished scan.
#[cfg(feature = "tracing")]
macro_rules! scan_outcome {
    ($message:literal $(, $key:ident = $value:expr)+ $(,)?) => {
        tracing::info!($($key = $value,)+ $message)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! scan_outcome {
    ($message:literal $(, $key:ident = $value:expr)+ $(,)?) => {{
        let _ = ($($value,)+);
    }};
}

pub(crate) use scan_outcome;
pub(crate) use scan_span;

/// Stand-in for an entered span when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
pub(crate) struct ScanGuard;

#[cfg(not(feature = "tracing"))]
impl ScanGuard {
    #[inline]
    pub(crate) fn entered(self) -> Self {
        self
    }
}
