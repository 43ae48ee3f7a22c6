//! Comparison core for DevDuel.
//!
//! Orchestrates one head-to-head GitHub profile comparison: quota admission,
//! concurrent dual-profile retrieval, deterministic prompt construction, a
//! single Gemini invocation, and strict validation of the reply against the
//! comparison schema. Every failure is recovered into the [`CompareError`]
//! taxonomy; nothing propagates unstructured past this crate.
//!
//! The model is an untrusted boundary: its raw reply stays a plain string
//! until it has passed [`validate::validate_reply`], and the validated
//! [`schema::ComparisonPayload`] is a distinct type so no code path can
//! treat unchecked text as structured data.

pub mod error;
pub mod gemini;
pub mod pipeline;
pub mod prompt;
pub mod quota;
pub mod report;
pub mod schema;
pub mod validate;

pub use error::{CompareError, GeminiError, ValidationError};
pub use gemini::GeminiClient;
pub use pipeline::{ComparePipeline, CompareRequest};
pub use quota::{MemoryQuotaStore, QuotaCommit, QuotaDecision, QuotaStore, QuotaStoreError};
pub use report::{ComparisonReport, ReportFormat};
pub use schema::ComparisonPayload;
