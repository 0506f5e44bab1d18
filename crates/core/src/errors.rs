use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown form `{0}`")]
    UnknownForm(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("no registered action found for name `{0}`")]
    UnknownAction(String),
    #[error("action `{action}` rejected execution: {message}")]
    ActionRejected { action: String, message: String },
}

/// Failures reported back to the dialogue runtime. Handlers absorb external
/// outages themselves, so only protocol problems reach this layer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, action_name: Option<String>, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, action_name: Option<String>, correlation_id: String },
}

impl InterfaceError {
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::NotFound { message, .. } => message,
        }
    }

    pub fn action_name(&self) -> Option<&str> {
        match self {
            Self::BadRequest { action_name, .. } | Self::NotFound { action_name, .. } => {
                action_name.as_deref()
            }
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } | Self::NotFound { correlation_id, .. } => {
                correlation_id
            }
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        match self {
            ApplicationError::UnknownAction(name) => InterfaceError::NotFound {
                message: format!("No registered action found for name '{name}'."),
                action_name: Some(name),
                correlation_id,
            },
            ApplicationError::ActionRejected { action, message } => InterfaceError::BadRequest {
                message,
                action_name: Some(action),
                correlation_id,
            },
            ApplicationError::Domain(error) => InterfaceError::BadRequest {
                message: error.to_string(),
                action_name: None,
                correlation_id,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError};

    #[test]
    fn unknown_action_maps_to_not_found_with_action_name() {
        let interface = ApplicationError::UnknownAction("action_missing".to_owned())
            .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::NotFound { ref correlation_id, .. } if correlation_id == "req-1"
        ));
        assert_eq!(interface.action_name(), Some("action_missing"));
        assert_eq!(interface.message(), "No registered action found for name 'action_missing'.");
    }

    #[test]
    fn rejected_action_maps_to_bad_request() {
        let interface = ApplicationError::ActionRejected {
            action: "validate_bug_report_form".to_owned(),
            message: "active form is `feature_request_form`".to_owned(),
        }
        .into_interface("req-2");

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert_eq!(interface.action_name(), Some("validate_bug_report_form"));
        assert_eq!(interface.correlation_id(), "req-2");
    }

    #[test]
    fn domain_error_maps_to_bad_request() {
        let interface = ApplicationError::from(DomainError::UnknownForm("survey_form".to_owned()))
            .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert!(interface.message().contains("survey_form"));
        assert_eq!(interface.action_name(), None);
    }
}
