//! Report generation: Markdown report, probe wordlist and risk verdict.

pub mod criticality;
pub mod render;
pub mod sink;

pub use criticality::{assess, Assessment, Criticality, Finding};
pub use render::{render_report, RenderContext};
pub use sink::{FileSink, ReportSink};
