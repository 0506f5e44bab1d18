pub mod config;
pub mod content;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod session;

pub use content::{ContentError, ContentLookup, HelpRecord, PageRecord};
pub use domain::{
    ActionRequest, ActionResponse, BotMessage, Button, Event, ResponseCollector, SlotValue,
    SubmissionRecord, Tracker,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use forms::{FormEngine, FormId, FormStep, SwitchOutcome, SwitchTransition};
