//! `crosscheck-sheet` — worksheet-shaped output boundary for
//! reconciliation results: the sink trait, an in-memory sink, report
//! layout, and write throttling.

pub mod a1;
pub mod report;
pub mod sink;
pub mod throttle;

pub use report::ReportWriter;
pub use sink::{next_free_row, MemorySink, SheetSink, SinkError};
pub use throttle::{Clock, SystemClock, WriteThrottle};
