//! Site-wide descriptors read once per session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw descriptors as found in the host page.
///
/// Every field is optional; blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteDescriptors {
    /// `document.title`.
    pub title: Option<String>,
    /// `link[rel=icon]` href.
    pub icon: Option<String>,
    /// `link[rel=home]` href.
    pub home: Option<String>,
    /// `meta[name=description]`.
    pub description: Option<String>,
    /// `meta[name=version]`.
    pub version: Option<String>,
    /// `meta[name=creator]`.
    pub creator: Option<String>,
    /// `meta[name=publisher]`.
    pub publisher: Option<String>,
    /// `meta[name=copyright]`.
    pub copyright: Option<String>,
    /// `meta[name=license]`.
    pub license: Option<String>,
    /// `meta[name="license:uri"]`.
    pub license_uri: Option<String>,
    /// Text of `script[type="application/json"]`: a map of section name
    /// to link.
    pub sections: Option<String>,
}

/// A top-level site section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Display name.
    pub name: String,
    /// Link, rebased onto the home link when site-absolute.
    pub link: String,
}

/// Normalized site descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Site title.
    pub title: Option<String>,
    /// Icon URL.
    pub icon: Option<String>,
    /// Home link, always ending in `/`.
    pub home: String,
    /// Site description.
    pub description: Option<String>,
    /// Raw version string.
    pub version: Option<String>,
    /// Creator name or URL.
    pub creator: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Copyright notice.
    pub copyright: Option<String>,
    /// License name.
    pub license: Option<String>,
    /// License URL.
    pub license_uri: Option<String>,
    /// Sections in declaration order. `None` when none are declared.
    pub sections: Option<Vec<Section>>,
}

impl Site {
    /// Normalizes raw descriptors.
    pub fn from_descriptors(raw: SiteDescriptors) -> Self {
        let mut home = non_blank(raw.home).unwrap_or_else(|| "/".to_string());
        if !home.ends_with('/') {
            home.push('/');
        }
        let sections = non_blank(raw.sections).and_then(|json| parse_sections(&json, &home));

        Self {
            title: non_blank(raw.title),
            icon: non_blank(raw.icon),
            home,
            description: non_blank(raw.description),
            version: non_blank(raw.version),
            creator: non_blank(raw.creator),
            publisher: non_blank(raw.publisher),
            copyright: non_blank(raw.copyright),
            license: non_blank(raw.license),
            license_uri: non_blank(raw.license_uri),
            sections,
        }
    }

    /// Version label, `v1.2` for both `1.2` and `v1.2`.
    pub fn version_label(&self) -> Option<String> {
        self.version.as_deref().map(|version| {
            let version = version.strip_prefix('v').unwrap_or(version);
            format!("v{version}")
        })
    }

    /// The creator, when it is a URL to link the logo to.
    pub fn logo_link(&self) -> Option<&str> {
        self.creator.as_deref().filter(|creator| has_scheme(creator))
    }

    /// Footer text from the copyright notice and license name.
    pub fn license_text(&self) -> Option<String> {
        let mut text = String::new();
        if let Some(copyright) = &self.copyright {
            text.push_str(copyright);
        }
        if let Some(license) = &self.license {
            if !text.is_empty() {
                text.push_str(". ");
            }
            text.push_str("This work is licensed under the ");
            text.push_str(license);
        }
        (!text.is_empty()).then_some(text)
    }

    /// Page header title: the document title, else the site description.
    pub fn page_title<'a>(&'a self, document_title: Option<&'a str>) -> Option<&'a str> {
        document_title
            .filter(|title| !title.is_empty())
            .or(self.description.as_deref())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// `^\w+:`
fn has_scheme(value: &str) -> bool {
    value.split_once(':').is_some_and(|(prefix, _)| {
        !prefix.is_empty() && prefix.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}

fn parse_sections(json: &str, home: &str) -> Option<Vec<Section>> {
    let map = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!("Ignoring sections: expected a JSON object");
            return None;
        }
        Err(err) => {
            log::warn!("Ignoring sections: {err}");
            return None;
        }
    };

    let sections: Vec<Section> = map
        .into_iter()
        .filter_map(|(name, link)| match link {
            Value::String(link) => {
                let link = match link.strip_prefix('/') {
                    Some(rest) => format!("{home}{rest}"),
                    None => link,
                };
                Some(Section { name, link })
            }
            _ => None,
        })
        .collect();

    (!sections.is_empty()).then_some(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(raw: SiteDescriptors) -> Site {
        Site::from_descriptors(raw)
    }

    #[test]
    fn home_is_normalized() {
        assert_eq!(site(SiteDescriptors::default()).home, "/");
        let raw = SiteDescriptors {
            home: Some("/docs".into()),
            ..Default::default()
        };
        assert_eq!(site(raw).home, "/docs/");
    }

    #[test]
    fn sections_are_rebased_onto_home() {
        let raw = SiteDescriptors {
            home: Some("/docs/".into()),
            sections: Some(
                r#"{"Guide": "/guide/", "Blog": "https://blog.x.dev", "Bad": 3, "Rel": "api/"}"#
                    .into(),
            ),
            ..Default::default()
        };
        let sections = site(raw).sections.expect("sections");
        let links: Vec<_> = sections
            .iter()
            .map(|s| (s.name.as_str(), s.link.as_str()))
            .collect();
        assert_eq!(
            links,
            [
                ("Guide", "/docs/guide/"),
                ("Blog", "https://blog.x.dev"),
                ("Rel", "api/")
            ]
        );
    }

    #[test]
    fn empty_or_invalid_sections_are_absent() {
        for json in ["{}", r#"{"a": null}"#, "[1]", "{"] {
            let raw = SiteDescriptors {
                sections: Some(json.into()),
                ..Default::default()
            };
            assert_eq!(site(raw).sections, None, "{json}");
        }
    }

    #[test]
    fn version_label_strips_leading_v() {
        for version in ["1.2", "v1.2"] {
            let raw = SiteDescriptors {
                version: Some(version.into()),
                ..Default::default()
            };
            assert_eq!(site(raw).version_label().as_deref(), Some("v1.2"));
        }
        assert_eq!(site(SiteDescriptors::default()).version_label(), None);
    }

    #[test]
    fn license_footer() {
        let both = site(SiteDescriptors {
            copyright: Some("© 2024 Ada".into()),
            license: Some("MIT License".into()),
            ..Default::default()
        });
        assert_eq!(
            both.license_text().as_deref(),
            Some("© 2024 Ada. This work is licensed under the MIT License")
        );

        let copyright_only = site(SiteDescriptors {
            copyright: Some("© Ada".into()),
            ..Default::default()
        });
        assert_eq!(copyright_only.license_text().as_deref(), Some("© Ada"));
        assert_eq!(site(SiteDescriptors::default()).license_text(), None);
    }

    #[test]
    fn logo_links_only_to_urls() {
        let url = site(SiteDescriptors {
            creator: Some("https://ada.dev".into()),
            ..Default::default()
        });
        assert_eq!(url.logo_link(), Some("https://ada.dev"));

        let name = site(SiteDescriptors {
            creator: Some("Ada Lovelace".into()),
            ..Default::default()
        });
        assert_eq!(name.logo_link(), None);
    }

    #[test]
    fn page_title_falls_back_to_description() {
        let s = site(SiteDescriptors {
            description: Some("Docs".into()),
            title: Some("  ".into()),
            ..Default::default()
        });
        assert_eq!(s.title, None);
        assert_eq!(s.page_title(Some("Guide")), Some("Guide"));
        assert_eq!(s.page_title(None), Some("Docs"));
    }

    #[test]
    fn descriptors_deserialize_from_camel_case() {
        let raw: SiteDescriptors =
            serde_json::from_str(r#"{"licenseUri": "https://x.dev/l", "home": "/"}"#)
                .expect("descriptors");
        assert_eq!(raw.license_uri.as_deref(), Some("https://x.dev/l"));
        assert_eq!(raw.title, None);
    }
}
