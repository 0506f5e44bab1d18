//! Slot names shared between the forms, the submission record and session
//! bootstrap.

pub const REQUESTED_SLOT: &str = "requested_slot";
pub const CONTINUE_FORM: &str = "AA_CONTINUE_FORM";
pub const CONFIRM_FORM: &str = "zz_confirm_form";

pub const NEXT_FORM_NAME: &str = "next_form_name";
pub const PREVIOUS_FORM_NAME: &str = "previous_form_name";

pub const REQUEST_SUBJECT: &str = "request_subject";
pub const BUG_DESCRIPTION: &str = "bug_description";
pub const COMMENT_DESCRIPTION: &str = "comment_description";

pub const REQUEST_DESCRIPTION: &str = "bb_request_description";
pub const FEATURE_CHALLENGES: &str = "feature_challenges";
pub const FEATURE_USE_CASE: &str = "feature_use_case";
pub const FEATURE_TARGET_AREA: &str = "feature_target_area";
pub const FEATURE_GOAL: &str = "feature_goal";
pub const FEATURE_CRITERIA: &str = "feature_criteria";
pub const FEATURE_PRIORITY: &str = "feature_priority";
pub const FEATURE_DESCRIPTION: &str = "feature_description";
pub const USER_STORY: &str = "user_story";

pub const TEMP_GOAL: &str = "feature_form_temp_goal";
pub const TEMP_CHALLENGES: &str = "feature_form_temp_challenges";
pub const TEMP_USE_CASE: &str = "feature_form_temp_use_case";
pub const TEMP_AREA: &str = "feature_form_temp_area";
pub const TEMP_CRITERIA: &str = "feature_form_temp_criteria";
pub const TEMP_PRIORITY: &str = "feature_form_temp_priority";

pub const TEMP_GOAL_IDENT: &str = "feature_form_temp_goal_ident";
pub const TEMP_CHALLENGES_IDENT: &str = "feature_form_temp_challenges_ident";
pub const TEMP_USE_CASE_IDENT: &str = "feature_form_temp_use_case_ident";
pub const TEMP_AREA_IDENT: &str = "feature_form_temp_area_ident";
pub const TEMP_CRITERIA_IDENT: &str = "feature_form_temp_criteria_ident";
pub const TEMP_PRIORITY_IDENT: &str = "feature_form_temp_priority_ident";

pub const PAGE: &str = "page";
pub const FEATURE_TO_EXPLAIN: &str = "feature_to_explain";
pub const MONGOLIAN_GREETING_USED: &str = "mongolian_greeting_used";

/// Fields the user refines explicitly during the feature-request chat.
pub const CHAT_FIELDS: [&str; 8] = [
    FEATURE_CHALLENGES,
    FEATURE_USE_CASE,
    FEATURE_TARGET_AREA,
    FEATURE_GOAL,
    FEATURE_CRITERIA,
    FEATURE_PRIORITY,
    FEATURE_DESCRIPTION,
    USER_STORY,
];

/// The initial description plus the fields extracted from it.
pub const INITIAL_FIELDS: [&str; 7] = [
    REQUEST_DESCRIPTION,
    TEMP_GOAL,
    TEMP_CHALLENGES,
    TEMP_USE_CASE,
    TEMP_AREA,
    TEMP_CRITERIA,
    TEMP_PRIORITY,
];

pub const TEMP_IDENT_FLAGS: [&str; 6] = [
    TEMP_GOAL_IDENT,
    TEMP_CHALLENGES_IDENT,
    TEMP_USE_CASE_IDENT,
    TEMP_AREA_IDENT,
    TEMP_CRITERIA_IDENT,
    TEMP_PRIORITY_IDENT,
];
