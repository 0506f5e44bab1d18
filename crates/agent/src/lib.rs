//! Action runtime for the dialogue server.
//!
//! This crate holds the handlers the dialogue runtime calls by name:
//! - Form validation for the feature-request, bug-report and generic-comment forms
//! - Form completion, switching between forms, and session bootstrap
//! - Static content lookups and the Mongolian greeting check
//! - Model-assisted steps: field extraction, user-story synthesis and the
//!   low-confidence fallback classifier
//!
//! # Key Types
//!
//! - `ActionRuntime` - resolves `next_action` and runs the handler (see `runtime`)
//! - `LlmClient` - chat-completion seam, with the Azure adapter in `azure`
//! - `SubmissionStore` - persistence seam, re-exported from `parley-db`
//!
//! The model never decides form flow. It only proposes slot values, which
//! the validators accept or reset.

pub mod actions;
pub mod azure;
pub mod extraction;
pub mod fallback;
pub mod llm;
pub mod runtime;

pub use azure::AzureOpenAiClient;
pub use llm::{LlmClient, LlmError, LlmErrorKind, ScriptedLlmClient};
pub use runtime::{ActionDependencies, ActionRuntime};
