use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::forms::slots::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormId {
    FeatureRequest,
    BugReport,
    GenericComment,
}

/// Static shape of a form: which slots it asks for, in which order, and which
/// slots belong to it when it is reset.
#[derive(Debug, PartialEq, Eq)]
pub struct FormDescriptor {
    pub id: FormId,
    pub gate: Option<&'static str>,
    pub required_slots: &'static [&'static str],
    pub reset_slots: &'static [&'static str],
}

static FEATURE_REQUEST: FormDescriptor = FormDescriptor {
    id: FormId::FeatureRequest,
    gate: Some(CONTINUE_FORM),
    required_slots: &[
        REQUEST_DESCRIPTION,
        FEATURE_CHALLENGES,
        FEATURE_USE_CASE,
        FEATURE_TARGET_AREA,
        FEATURE_GOAL,
        FEATURE_CRITERIA,
        FEATURE_PRIORITY,
        FEATURE_DESCRIPTION,
        USER_STORY,
        CONFIRM_FORM,
    ],
    reset_slots: &[
        CONTINUE_FORM,
        CONFIRM_FORM,
        REQUEST_DESCRIPTION,
        FEATURE_CHALLENGES,
        FEATURE_USE_CASE,
        FEATURE_TARGET_AREA,
        FEATURE_GOAL,
        FEATURE_CRITERIA,
        FEATURE_PRIORITY,
        FEATURE_DESCRIPTION,
        USER_STORY,
        TEMP_GOAL,
        TEMP_CHALLENGES,
        TEMP_USE_CASE,
        TEMP_AREA,
        TEMP_CRITERIA,
        TEMP_PRIORITY,
        TEMP_GOAL_IDENT,
        TEMP_CHALLENGES_IDENT,
        TEMP_USE_CASE_IDENT,
        TEMP_AREA_IDENT,
        TEMP_CRITERIA_IDENT,
        TEMP_PRIORITY_IDENT,
    ],
};

static BUG_REPORT: FormDescriptor = FormDescriptor {
    id: FormId::BugReport,
    gate: Some(CONTINUE_FORM),
    required_slots: &[REQUEST_SUBJECT, BUG_DESCRIPTION, CONFIRM_FORM],
    reset_slots: &[CONTINUE_FORM, CONFIRM_FORM, REQUEST_SUBJECT, BUG_DESCRIPTION],
};

static GENERIC_COMMENT: FormDescriptor = FormDescriptor {
    id: FormId::GenericComment,
    gate: Some(CONTINUE_FORM),
    required_slots: &[REQUEST_SUBJECT, COMMENT_DESCRIPTION, CONFIRM_FORM],
    reset_slots: &[CONTINUE_FORM, CONFIRM_FORM, REQUEST_SUBJECT, COMMENT_DESCRIPTION],
};

impl FormId {
    pub const ALL: [FormId; 3] = [Self::FeatureRequest, Self::BugReport, Self::GenericComment];

    pub fn form_name(self) -> &'static str {
        match self {
            Self::FeatureRequest => "feature_request_form",
            Self::BugReport => "bug_report_form",
            Self::GenericComment => "generic_comment_form",
        }
    }

    pub fn validation_action(self) -> &'static str {
        match self {
            Self::FeatureRequest => "validate_feature_request_form",
            Self::BugReport => "validate_bug_report_form",
            Self::GenericComment => "validate_generic_comment_form",
        }
    }

    /// Short description used when talking about the form mid-conversation.
    pub fn description(self) -> &'static str {
        match self {
            Self::FeatureRequest => "request new feature",
            Self::BugReport => "report bug and errors",
            Self::GenericComment => "provide comments and feedback",
        }
    }

    /// Title used when offering to switch away from the form.
    pub fn title(self) -> &'static str {
        match self {
            Self::FeatureRequest => "Feature Request Form",
            Self::BugReport => "Bug Report Form",
            Self::GenericComment => "Generic Comment Form",
        }
    }

    pub fn descriptor(self) -> &'static FormDescriptor {
        match self {
            Self::FeatureRequest => &FEATURE_REQUEST,
            Self::BugReport => &BUG_REPORT,
            Self::GenericComment => &GENERIC_COMMENT,
        }
    }

    pub fn from_form_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|form| form.form_name() == name)
    }

    /// Form started by an intent, accepting both the `provide_*` intents and
    /// the bare form keys.
    pub fn from_intent(intent: &str) -> Option<Self> {
        match intent {
            "provide_feature_request" | "feature_request" => Some(Self::FeatureRequest),
            "provide_bug_report" | "bug_report" => Some(Self::BugReport),
            "provide_generic_comment" | "generic_comment" => Some(Self::GenericComment),
            _ => None,
        }
    }
}

impl FromStr for FormId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_form_name(value.trim()).ok_or_else(|| DomainError::UnknownForm(value.to_owned()))
    }
}
