//! Custom actions the dialogue runtime can call by name.

use std::collections::HashMap;

use async_trait::async_trait;

use parley_core::domain::event::Event;
use parley_core::domain::response::ResponseCollector;
use parley_core::domain::tracker::Tracker;
use parley_core::errors::ApplicationError;

pub mod greeting;
pub mod llm_fallback;
pub mod lookup;
pub mod session;
pub mod submission;
pub mod switch;
pub mod validation;

pub use greeting::CheckMongolianGreeting;
pub use llm_fallback::FallbackToLlm;
pub use lookup::{ExplainFeature, FindPage};
pub use session::{Restart, SessionStart};
pub use submission::{AcknowledgeFeedback, RequestFeature};
pub use switch::SwitchFormsAction;
pub use validation::FormValidationAction;

/// One handler per action name. Actions read the snapshot, may add bot
/// messages, and return the events the runtime should apply.
#[async_trait]
pub trait Action: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(
        &self,
        responses: &mut ResponseCollector,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ApplicationError>;
}

#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<&'static str, Box<dyn Action>>,
}

impl ActionRegistry {
    pub fn register<A>(&mut self, action: A)
    where
        A: Action + 'static,
    {
        self.actions.insert(action.name(), Box::new(action));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Action> {
        self.actions.get(name).map(|action| &**action)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = self.actions.keys().copied().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
