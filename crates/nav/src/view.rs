//! What the page shows for the current navigation.

use crate::asset::{AssetError, AssetResult};
use crate::navigator::Phase;

/// Title shown while an asset is pending.
pub const LOADING_TITLE: &str = "Loading…";

/// Page view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    /// No result yet.
    Loading,
    /// The markdown source to render.
    Document {
        /// Asset body.
        source: &'a str,
    },
    /// A failed load with its placeholder title.
    Failure {
        /// The failure.
        error: AssetError,
        /// Placeholder title, e.g. `404 Document Not Found`.
        title: String,
    },
}

impl<'a> View<'a> {
    /// Builds the view for a phase and its current result.
    pub fn new(phase: Phase, result: &'a AssetResult) -> Self {
        match phase {
            Phase::Idle | Phase::Loading => View::Loading,
            Phase::Displaying(status) => match AssetError::from_status(status) {
                Some(error) => View::Failure {
                    error,
                    title: error.to_string(),
                },
                None => View::Document {
                    source: result.text.as_deref().unwrap_or_default(),
                },
            },
        }
    }

    /// Placeholder title, `None` when a document is shown.
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            View::Loading => Some(LOADING_TITLE),
            View::Document { .. } => None,
            View::Failure { title, .. } => Some(title),
        }
    }
}
