pub mod event;
pub mod protocol;
pub mod response;
pub mod slot;
pub mod submission;
pub mod tracker;

pub use event::{Event, ParseData, ParsedIntent, ACTION_LISTEN};
pub use protocol::{ActionRequest, ActionResponse};
pub use response::{BotMessage, Button, ResponseCollector};
pub use slot::SlotValue;
pub use submission::SubmissionRecord;
pub use tracker::{ActiveLoopRef, IntentRef, LatestMessage, Tracker, TrackerEvent};
