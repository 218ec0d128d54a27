use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Opaque author identifier, taken from the last path segment of the profile link.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuthorId(pub String);

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Link target addressing one specific post.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permalink(pub String);

impl Permalink {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// What the identity extractor yields for one post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub author: AuthorId,
    pub permalink: Permalink,
}

/// One `<a>` found in a post's byline.
///
/// `markers` holds the class tokens of the link itself and of every ancestor
/// between it and the byline root, so a flair wrapper counts as well.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BylineLink {
    pub href: String,
    pub markers: Vec<String>,
}

impl BylineLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            markers: Vec::new(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn has_any_marker(&self, markers: &[String]) -> bool {
        self.markers.iter().any(|m| markers.iter().any(|s| s == m))
    }
}

/// `(author, zero-based index into that author's permalinks)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NavigationPosition {
    pub author: AuthorId,
    pub position: usize,
}

impl NavigationPosition {
    pub fn new(author: AuthorId, position: usize) -> Self {
        Self { author, position }
    }
}

/// Page coordinates of the pointer event that opened a popover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anchor {
    pub page_x: i32,
    pub page_y: i32,
}

/// Subdomains of the MetaFilter network the navigation runs on by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum KnownSite {
    Www,
    Ask,
    Metatalk,
    Fanfare,
    Projects,
    Music,
    Podcast,
}

/// First label of the page's host name, e.g. `ask` for `ask.metafilter.com`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn from_host(host: &str) -> Self {
        let label = host.split('.').next().unwrap_or_default();
        Self(label.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn known(&self) -> Option<KnownSite> {
        self.0.parse().ok()
    }
}
