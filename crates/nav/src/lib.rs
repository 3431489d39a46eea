#![deny(missing_docs)]
//! Navigation for mark: asset resolution and loading, history, intents and
//! the navigation state machine.

/// Asset resolution, status classes and the fetch seam.
pub mod asset;
/// Cancellation tokens for in-flight requests.
pub mod cancel;
/// Session history.
pub mod history;
/// Click classification.
pub mod intent;
/// Navigation state machine.
pub mod navigator;
/// Site descriptors.
pub mod site;
/// Page view model.
pub mod view;

pub use asset::{
    AssetError, AssetResult, Fetch, FetchError, FetchResponse, StatusClass, UNREACHABLE, load,
    resolve,
};
pub use cancel::Cancellation;
pub use history::{History, MemoryHistory, NavigationState};
pub use intent::{Click, ClickTarget, Intent, Modifiers, classify};
pub use navigator::{Effect, Navigator, Phase, Scroll, Ticket};
pub use site::{Section, Site, SiteDescriptors};
pub use view::{LOADING_TITLE, View};
