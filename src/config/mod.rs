use crate::error::{NavError, NavResult};
use crate::identity::PermalinkPolicy;
use crate::models::{KnownSite, SiteId};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Name of the optional global object a page (or userscript manager) can set
/// to override defaults, e.g. `window.MEFI_NAV = { showOrdinal: false }`.
pub(crate) const CONFIG_GLOBAL: &str = "MEFI_NAV";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NavConfig {
    /// Subdomains the navigation is allowed to run on.
    pub sites: Vec<String>,
    pub post_selector: String,
    /// Relative to a post. Its links are what identity extraction reads.
    pub byline_selector: String,
    pub skip_markers: Vec<String>,
    pub permalink_position: usize,
    pub show_ordinal: bool,
    pub own_post_class: String,
    pub inject_styles: bool,
    pub debug: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            sites: KnownSite::iter().map(|s| s.to_string()).collect(),
            post_selector: ".comments".to_string(),
            byline_selector: ".smallcopy".to_string(),
            skip_markers: vec!["staff".to_string()],
            permalink_position: 1,
            show_ordinal: true,
            own_post_class: "userpost".to_string(),
            inject_styles: true,
            debug: false,
        }
    }
}

impl NavConfig {
    /// Defaults, overridden field by field from `window.MEFI_NAV` when present.
    ///
    /// A malformed override is reported and ignored rather than disabling navigation.
    pub fn load() -> Self {
        match Self::load_from_window() {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Self::default(),
            Err(e) => {
                leptos::logging::warn!("mefi-nav: {e}; using defaults");
                Self::default()
            }
        }
    }

    fn load_from_window() -> NavResult<Option<Self>> {
        let Some(window) = web_sys::window() else {
            return Ok(None);
        };
        let Ok(value) = js_sys::Reflect::get(&window, &CONFIG_GLOBAL.into()) else {
            return Ok(None);
        };
        if value.is_undefined() || value.is_null() {
            return Ok(None);
        }
        if !value.is_object() {
            return Err(NavError::config("expected an object"));
        }

        let json = js_sys::JSON::stringify(&value)
            .map_err(|e| NavError::dom_js("stringify config", e))?;
        let json: String = json.into();
        Self::from_json(&json).map(Some)
    }

    pub fn from_json(json: &str) -> NavResult<Self> {
        serde_json::from_str(json).map_err(NavError::config)
    }

    pub fn is_recognized_site(&self, site: &SiteId) -> bool {
        self.sites.iter().any(|s| s.eq_ignore_ascii_case(site.as_str()))
    }

    pub fn permalink_policy(&self) -> PermalinkPolicy {
        PermalinkPolicy {
            skip_markers: self.skip_markers.clone(),
            permalink_position: self.permalink_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_allows_every_known_site() {
        let cfg = NavConfig::default();
        for host in [
            "www.metafilter.com",
            "ask.metafilter.com",
            "metatalk.metafilter.com",
            "fanfare.metafilter.com",
            "projects.metafilter.com",
            "music.metafilter.com",
            "podcast.metafilter.com",
        ] {
            assert!(cfg.is_recognized_site(&SiteId::from_host(host)), "{host}");
        }
        assert!(!cfg.is_recognized_site(&SiteId::from_host("irl.metafilter.com")));
        assert!(!cfg.is_recognized_site(&SiteId::from_host("localhost")));
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let cfg = NavConfig::from_json(r#"{"showOrdinal": false, "skipMarkers": []}"#)
            .expect("partial config should parse");
        assert!(!cfg.show_ordinal);
        assert!(cfg.skip_markers.is_empty());
        assert_eq!(cfg.post_selector, ".comments");
        assert_eq!(cfg.permalink_position, 1);
    }

    #[test]
    fn test_malformed_override_is_config_error() {
        let err = NavConfig::from_json(r#"{"permalinkPosition": "two"}"#).unwrap_err();
        assert_eq!(err.kind, crate::error::NavErrorKind::Config);
    }

    #[test]
    fn test_permalink_policy_mirrors_config() {
        let cfg = NavConfig {
            skip_markers: vec!["staff".into(), "mod".into()],
            permalink_position: 2,
            ..NavConfig::default()
        };
        let policy = cfg.permalink_policy();
        assert_eq!(policy.skip_markers, vec!["staff".to_string(), "mod".to_string()]);
        assert_eq!(policy.permalink_position, 2);
    }
}
