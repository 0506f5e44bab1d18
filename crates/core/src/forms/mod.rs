pub mod descriptor;
pub mod engine;
pub mod slots;
pub mod switch;

pub use descriptor::{FormDescriptor, FormId};
pub use engine::{
    check_user_story, description_too_short, validate_confirmation, FormEngine, FormStep,
    UserStoryCheck,
};
pub use switch::{SwitchOutcome, SwitchTransition};
