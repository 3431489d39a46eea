//! Navigation state machine.
//!
//! The navigator owns the current [`NavigationState`] and [`AssetResult`].
//! It never performs I/O itself: every transition returns the [`Effect`]s
//! the host must run, and fetch results come back through
//! [`Navigator::complete`].

use crate::asset::{AssetResult, StatusClass, resolve};
use crate::cancel::Cancellation;
use crate::history::{History, NavigationState};
use crate::intent::Intent;
use crate::view::View;
use url::Url;

/// Base used to resolve relative hrefs. Only its path component is kept.
const RESOLVE_BASE: &str = "http://mark.invalid";

/// Default browsing context for external links.
const EXTERNAL_TARGET: &str = "_blank";

/// Identifies one fetch. A result is only accepted for the latest ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub u64);

/// A scroll position to apply on the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scroll {
    /// The element with this id, percent-encoded as in the location.
    /// No-op if the document has no such element.
    Anchor(String),
    /// Top of the page.
    Top,
}

/// Work the host must perform after a transition.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Fetch `url` and report back with [`Navigator::complete`].
    Fetch {
        /// Ticket to hand back with the result.
        ticket: Ticket,
        /// Resolved asset URL.
        url: String,
        /// Cancelled when a later navigation supersedes this one.
        token: Cancellation,
    },
    /// Deferred scroll.
    Scroll(Scroll),
    /// Open a link outside the site.
    OpenExternal {
        /// Link target.
        href: String,
        /// Browsing context name.
        target: String,
    },
    /// Set the `active` attribute of the clicked image.
    SetImageActive(bool),
}

/// Navigator phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started.
    Idle,
    /// Waiting for the current asset.
    Loading,
    /// Showing the result of the current asset.
    Displaying(StatusClass),
}

#[derive(Debug)]
struct InFlight {
    ticket: Ticket,
    token: Cancellation,
}

/// The navigation state machine.
#[derive(Debug)]
pub struct Navigator<H: History> {
    history: H,
    state: Option<NavigationState>,
    phase: Phase,
    result: AssetResult,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl<H: History> Navigator<H> {
    /// Creates an idle navigator over `history`.
    pub fn new(history: H) -> Self {
        Self {
            history,
            state: None,
            phase: Phase::Idle,
            result: AssetResult::pending(),
            in_flight: None,
            next_ticket: 0,
        }
    }

    /// Loads the current history entry.
    pub fn start(&mut self) -> Vec<Effect> {
        let current = self.history.current();
        log::debug!("Starting navigation at {}", current.href());
        self.transition(current)
    }

    /// Handles one intent.
    pub fn dispatch(&mut self, intent: Intent) -> Vec<Effect> {
        match intent {
            Intent::InternalLink { href } => self.follow(&href),
            Intent::AnchorLink { fragment } => {
                let path = self.current_path();
                let next = NavigationState::new(path, &fragment);
                self.history.push(&next);
                self.transition(next)
            }
            Intent::ExternalLink { href, target } => vec![Effect::OpenExternal {
                href,
                target: target
                    .filter(|target| !target.is_empty())
                    .unwrap_or_else(|| EXTERNAL_TARGET.to_string()),
            }],
            Intent::ImageToggle { active } => vec![Effect::SetImageActive(!active)],
            Intent::HistoryRestore => {
                let current = self.history.current();
                self.transition(current)
            }
        }
    }

    /// Accepts the result of the fetch issued under `ticket`.
    ///
    /// Results for superseded or cancelled fetches are dropped.
    pub fn complete(&mut self, ticket: Ticket, result: AssetResult) -> Vec<Effect> {
        let current = match &self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket && !in_flight.token.is_cancelled() => {
                true
            }
            _ => false,
        };
        if !current {
            log::debug!("Discarding stale result for ticket {}", ticket.0);
            return Vec::new();
        }

        self.in_flight = None;
        log::debug!("Displaying {:?}", result.status);
        self.phase = Phase::Displaying(result.status);
        self.result = result;
        vec![Effect::Scroll(self.scroll_target())]
    }

    /// Current navigation state, once started.
    pub fn state(&self) -> Option<&NavigationState> {
        self.state.as_ref()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Result for the current path.
    pub fn result(&self) -> &AssetResult {
        &self.result
    }

    /// What the page should show.
    pub fn view(&self) -> View<'_> {
        View::new(self.phase, &self.result)
    }

    /// The wrapped history.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access to the wrapped history, for hosts that move through
    /// it before dispatching [`Intent::HistoryRestore`].
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    fn current_path(&self) -> String {
        match &self.state {
            Some(state) => state.path.clone(),
            None => self.history.current().path,
        }
    }

    fn follow(&mut self, href: &str) -> Vec<Effect> {
        let resolved = Url::parse(RESOLVE_BASE)
            .and_then(|base| base.join(&self.current_path()))
            .and_then(|location| location.join(href));
        let target = match resolved {
            Ok(target) => target,
            Err(err) => {
                log::warn!("Ignoring unresolvable link {href:?}: {err}");
                return Vec::new();
            }
        };

        if target.host_str() != Some("mark.invalid") {
            return vec![Effect::OpenExternal {
                href: href.to_string(),
                target: EXTERNAL_TARGET.to_string(),
            }];
        }

        let next = NavigationState::new(target.path(), target.fragment().unwrap_or(""));
        self.history.push(&next);
        self.transition(next)
    }

    fn transition(&mut self, next: NavigationState) -> Vec<Effect> {
        let same_path = self.phase != Phase::Idle
            && self
                .state
                .as_ref()
                .is_some_and(|current| current.path == next.path);
        self.state = Some(next);

        if same_path {
            vec![Effect::Scroll(self.scroll_target())]
        } else {
            vec![self.begin_fetch()]
        }
    }

    fn begin_fetch(&mut self) -> Effect {
        if let Some(previous) = self.in_flight.take() {
            log::debug!("Cancelling fetch for ticket {}", previous.ticket.0);
            previous.token.cancel();
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        let token = Cancellation::new();
        self.in_flight = Some(InFlight {
            ticket,
            token: token.clone(),
        });
        self.phase = Phase::Loading;
        self.result = AssetResult::pending();

        let path = self.state.as_ref().map_or("/", |state| state.path.as_str());
        let url = resolve(path);
        log::debug!("Fetching {url} (ticket {})", ticket.0);
        Effect::Fetch { ticket, url, token }
    }

    fn scroll_target(&self) -> Scroll {
        match &self.state {
            Some(state) if !state.hash.is_empty() => Scroll::Anchor(state.hash.clone()),
            _ => Scroll::Top,
        }
    }
}
