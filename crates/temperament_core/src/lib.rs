//! Temperament test core.
//!
//! Classifies a 42-answer questionnaire into a temperament and
//! sub-temperament, and composes the multi-page report as a list of
//! abstract draw instructions. Storage and document rendering sit behind
//! the traits in [`ports`]; this crate has no database or PDF dependency.

pub mod answers;
pub mod calendar;
pub mod classify;
pub mod compose;
pub mod dial;
pub mod draw;
pub mod error;
pub mod layout;
pub mod memory;
pub mod paginate;
pub mod ports;
pub mod service;
pub mod submission;
pub mod types;
pub mod wrap;

pub use answers::{Answer, AnswerSheet, ANSWER_COUNT};
pub use classify::{classify, classify_tokens};
pub use compose::{compose, ComposedReport};
pub use draw::{DrawInstruction, Graphic};
pub use error::{FieldError, Result, TemperamentError};
pub use layout::ReportLayout;
pub use service::ReportService;
pub use submission::SubmissionRequest;
pub use types::{
    Classification, Language, NewReportRecord, ReferenceText, ReportRecord, ResultId,
    SubTemperament, Temperament, TemperamentText,
};
