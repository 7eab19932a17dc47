//! Validation and repair of generated summaries

pub mod cleanup;
pub mod corrections;
pub mod diagnostics;
pub mod links;
pub mod machine;


pub use cleanup::{escape_newlines_in_strings, lenient_json_fixups, strip_code_fence};
pub use corrections::{CorrectionTable, LinkCorrection};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use links::{bill_links, broken_bill_links};
pub use machine::{RepairFailure, RepairJob, RepairState, StepContext, SummaryRepairer};
