use crate::model::ApiFailure;

/// Shown when a query failed without a structured error from the service.
pub const UNCLASSIFIED_ERROR_MESSAGE: &str = "Something went wrong on our side. Please try again.";

/// Closed set of screens the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Nothing cached and nothing searched yet.
    #[default]
    Initial,
    Loading,
    /// Compact summary.
    Loaded,
    /// Expanded summary.
    Detailed,
    Error(String),
}

impl ViewState {
    /// Recompute the view after a controller mutation.
    ///
    /// Never yields `Initial` or `Detailed`; those are only entered at
    /// construction and through an explicit expand.
    pub fn project(
        is_loading: bool,
        last_error: Option<&ApiFailure>,
        has_unclassified_error: bool,
    ) -> Self {
        if is_loading {
            ViewState::Loading
        } else if let Some(failure) = last_error {
            ViewState::Error(failure.user_message().to_string())
        } else if has_unclassified_error {
            ViewState::Error(UNCLASSIFIED_ERROR_MESSAGE.to_string())
        } else {
            ViewState::Loaded
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}
