//! Classification of user clicks into navigation intents.

use mark_core::is_external;
use serde::{Deserialize, Serialize};

/// A navigation request handled by [`crate::Navigator::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Intent {
    /// A same-site link, relative to the current location.
    InternalLink {
        /// Link target as written.
        href: String,
    },
    /// An in-page `#fragment` link.
    AnchorLink {
        /// Fragment, with or without the leading `#`.
        fragment: String,
    },
    /// A link leaving the site.
    ExternalLink {
        /// Link target.
        href: String,
        /// Browsing context name, `_blank` when unset.
        target: Option<String>,
    },
    /// A click on an image.
    ImageToggle {
        /// Whether the image is currently enlarged.
        active: bool,
    },
    /// The host's history changed outside the navigator (back/forward).
    HistoryRestore,
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Alt / Option.
    pub alt: bool,
    /// Control.
    pub ctrl: bool,
    /// Meta / Command.
    pub meta: bool,
    /// Shift.
    pub shift: bool,
}

impl Modifiers {
    /// Returns true if any modifier is held.
    pub fn any(self) -> bool {
        self.alt || self.ctrl || self.meta || self.shift
    }
}

/// The element a click landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClickTarget {
    /// An `<a>` element (or a descendant of one).
    Anchor {
        /// Raw `href` attribute.
        href: String,
        /// Raw `target` attribute.
        target: Option<String>,
    },
    /// An `<img>` element.
    Image {
        /// Current `active` attribute state.
        active: bool,
    },
    /// Anything else.
    Other,
}

impl ClickTarget {
    /// Chooses what a click landed on, given the `href` and `target` of the
    /// enclosing link (if any) and the `active` state of the clicked image
    /// (if it is one). A link wins over an image inside it.
    pub fn pick(anchor: Option<(String, Option<String>)>, image: Option<bool>) -> Self {
        match (anchor, image) {
            (Some((href, target)), _) => ClickTarget::Anchor { href, target },
            (None, Some(active)) => ClickTarget::Image { active },
            (None, None) => ClickTarget::Other,
        }
    }
}

/// A click as observed by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    /// What was clicked.
    pub target: ClickTarget,
    /// Held modifiers.
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Whether another handler already called `preventDefault`.
    #[serde(default)]
    pub default_prevented: bool,
}

/// Maps a click to an intent.
///
/// Returns `None` when the click should keep its default behavior:
/// modifier clicks, clicks already handled, and clicks on other elements.
pub fn classify(click: &Click) -> Option<Intent> {
    if click.default_prevented || click.modifiers.any() {
        return None;
    }

    match &click.target {
        ClickTarget::Anchor { href, target } => {
            let intent = if is_external(href) {
                Intent::ExternalLink {
                    href: href.clone(),
                    target: target.clone(),
                }
            } else if let Some(fragment) = href.strip_prefix('#') {
                Intent::AnchorLink {
                    fragment: fragment.to_string(),
                }
            } else {
                Intent::InternalLink { href: href.clone() }
            };
            Some(intent)
        }
        ClickTarget::Image { active } => Some(Intent::ImageToggle { active: *active }),
        ClickTarget::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor(href: &str) -> Click {
        Click {
            target: ClickTarget::Anchor {
                href: href.to_string(),
                target: None,
            },
            modifiers: Modifiers::default(),
            default_prevented: false,
        }
    }

    #[test]
    fn linked_image_follows_the_link() {
        let target = ClickTarget::pick(
            Some(("https://ci.example/badge".to_string(), None)),
            Some(false),
        );
        assert_eq!(
            target,
            ClickTarget::Anchor {
                href: "https://ci.example/badge".to_string(),
                target: None,
            }
        );
        assert_eq!(
            ClickTarget::pick(None, Some(true)),
            ClickTarget::Image { active: true }
        );
        assert_eq!(ClickTarget::pick(None, None), ClickTarget::Other);
    }

    #[test]
    fn classifies_links() {
        assert_eq!(
            classify(&anchor("guide/")),
            Some(Intent::InternalLink {
                href: "guide/".into()
            })
        );
        assert_eq!(
            classify(&anchor("#setup")),
            Some(Intent::AnchorLink {
                fragment: "setup".into()
            })
        );
        assert_eq!(
            classify(&anchor("https://x.dev")),
            Some(Intent::ExternalLink {
                href: "https://x.dev".into(),
                target: None
            })
        );
        assert!(matches!(
            classify(&anchor("mailto:a@b.c")),
            Some(Intent::ExternalLink { .. })
        ));
        assert!(matches!(
            classify(&anchor("//cdn.x.dev/a")),
            Some(Intent::ExternalLink { .. })
        ));
    }

    #[test]
    fn modified_or_prevented_clicks_pass_through() {
        let mut click = anchor("guide/");
        click.modifiers.meta = true;
        assert_eq!(classify(&click), None);

        let mut click = anchor("guide/");
        click.default_prevented = true;
        assert_eq!(classify(&click), None);
    }

    #[test]
    fn images_toggle() {
        let click = Click {
            target: ClickTarget::Image { active: true },
            modifiers: Modifiers::default(),
            default_prevented: false,
        };
        assert_eq!(classify(&click), Some(Intent::ImageToggle { active: true }));

        let other = Click {
            target: ClickTarget::Other,
            ..click
        };
        assert_eq!(classify(&other), None);
    }

    #[test]
    fn click_deserializes_with_defaults() {
        let click: Click =
            serde_json::from_str(r##"{"target":{"kind":"anchor","href":"#a","target":null}}"##)
                .expect("valid click");
        assert_eq!(click, anchor("#a"));
    }
}
