use async_trait::async_trait;

use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;
use parley_core::session::{restart_events, session_start_events, SESSION_START_ACTION};

use crate::actions::Action;

pub struct SessionStart;

#[async_trait]
impl Action for SessionStart {
    fn name(&self) -> &'static str {
        SESSION_START_ACTION
    }

    async fn run(
        &self,
        _responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        Ok(session_start_events(tracker))
    }
}

pub struct Restart;

#[async_trait]
impl Action for Restart {
    fn name(&self) -> &'static str {
        "action_restart"
    }

    async fn run(
        &self,
        _responses: &mut ResponseCollector,
        _tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError> {
        Ok(restart_events())
    }
}
