pub(crate) mod listener;
pub(crate) mod picker;

use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::index::{AuthorIndex, Post};
use crate::models::{Anchor, AuthorId, BylineLink, NavigationPosition, SiteId};
use crate::render::{
    default_stylesheet, render, RenderOptions, ATTR_AUTHOR, ATTR_POSITION, NAV_CLASS, PICKER_ID,
    TRIGGER_CLASS,
};
use self::listener::ListenerHandle;
use self::picker::{location_navigator, Navigator, PickerView, SharedPicker};
use std::rc::Rc;
use wasm_bindgen::JsCast;

/// Set on `<html>` once navigation has been injected.
pub(crate) const READY_ATTR: &str = "data-mefinav";
const STYLE_ID: &str = "mefinav-style";
const VIEWER_COOKIE: &str = "USER_ID";

/// One post element together with the selector for its byline.
#[derive(Clone)]
pub(crate) struct DomPost {
    element: web_sys::Element,
    byline_selector: Rc<str>,
}

impl DomPost {
    fn byline(&self) -> Option<web_sys::Element> {
        self.element.query_selector(&self.byline_selector).ok().flatten()
    }

    fn author_tag(&self) -> Option<String> {
        self.element.get_attribute(ATTR_AUTHOR)
    }
}

impl Post for DomPost {
    fn byline_links(&self) -> Vec<BylineLink> {
        query_byline(&self.element, &self.byline_selector)
    }

    fn tag_author(&self, author: &AuthorId) {
        let _ = self.element.set_attribute(ATTR_AUTHOR, author.as_str());
    }
}

/// Everything that has to stay alive for the navigation to keep working.
pub(crate) struct Session {
    pub index: Rc<AuthorIndex>,
    pub picker: SharedPicker,
    pub rendered: usize,
    triggers: Vec<ListenerHandle>,
}

impl Session {
    /// The page owns the controls from here on.
    pub(crate) fn keep_alive(self) {
        std::mem::forget(self);
    }

    #[cfg(all(test, target_arch = "wasm32"))]
    fn teardown(self) {
        for handle in self.triggers {
            handle.detach();
        }
    }
}

pub(crate) struct PageBinder {
    document: web_sys::Document,
    config: NavConfig,
}

impl PageBinder {
    pub(crate) fn new(config: NavConfig) -> NavResult<Self> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| NavError::dom("no document"))?;
        Ok(Self { document, config })
    }

    pub(crate) fn current_site_identifier(&self) -> SiteId {
        let host = self
            .document
            .location()
            .and_then(|l| l.host().ok())
            .unwrap_or_default();
        SiteId::from_host(&host)
    }

    pub(crate) fn is_recognized_site(&self, site: &SiteId) -> bool {
        self.config.is_recognized_site(site)
    }

    pub(crate) fn viewer_identity(&self) -> NavResult<AuthorId> {
        let cookie = self
            .document
            .dyn_ref::<web_sys::HtmlDocument>()
            .and_then(|d| d.cookie().ok())
            .unwrap_or_default();
        parse_viewer_cookie(&cookie).ok_or_else(NavError::missing_viewer_identity)
    }

    pub(crate) fn query_all_posts(&self) -> Vec<DomPost> {
        let byline_selector: Rc<str> = Rc::from(self.config.byline_selector.as_str());
        query_elements(&self.document, &self.config.post_selector)
            .into_iter()
            .map(|element| DomPost {
                element,
                byline_selector: byline_selector.clone(),
            })
            .collect()
    }

    pub(crate) fn query_posts_by_author(&self, author: &AuthorId) -> Vec<DomPost> {
        self.query_all_posts()
            .into_iter()
            .filter(|p| p.author_tag().as_deref() == Some(author.as_str()))
            .collect()
    }

    pub(crate) fn insert_markup(&self, post: &DomPost, fragment: &str) -> NavResult<bool> {
        let Some(byline) = post.byline() else {
            return Ok(false);
        };
        byline
            .insert_adjacent_html("beforeend", fragment)
            .map_err(|e| NavError::dom_js("insert navigation", e))?;
        Ok(true)
    }

    pub(crate) fn mark_own_post(&self, post: &DomPost) {
        let _ = post.element.class_list().add_1(&self.config.own_post_class);
    }

    /// The single popover container, created on first use.
    pub(crate) fn insert_picker_container(&self) -> NavResult<web_sys::HtmlElement> {
        if let Some(existing) = self.document.get_element_by_id(PICKER_ID) {
            return existing
                .dyn_into::<web_sys::HtmlElement>()
                .map_err(|_| NavError::dom("#picker is not an HTML element"));
        }

        let body = self.document.body().ok_or_else(|| NavError::dom("no body"))?;
        let container = self
            .document
            .create_element("div")
            .map_err(|e| NavError::dom_js("create picker", e))?;
        container.set_id(PICKER_ID);
        body.append_child(&container)
            .map_err(|e| NavError::dom_js("append picker", e))?;
        container
            .dyn_into::<web_sys::HtmlElement>()
            .map_err(|_| NavError::dom("#picker is not an HTML element"))
    }

    pub(crate) fn insert_stylesheet(&self) -> NavResult<()> {
        if self.document.get_element_by_id(STYLE_ID).is_some() {
            return Ok(());
        }
        let body = self.document.body().ok_or_else(|| NavError::dom("no body"))?;
        let style = self
            .document
            .create_element("style")
            .map_err(|e| NavError::dom_js("create style", e))?;
        style.set_id(STYLE_ID);
        style.set_text_content(Some(&default_stylesheet()));
        body.append_child(&style)
            .map_err(|e| NavError::dom_js("append style", e))?;
        Ok(())
    }

    fn is_bound(&self) -> bool {
        self.document
            .document_element()
            .is_some_and(|root| root.has_attribute(READY_ATTR))
    }

    fn mark_bound(&self) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(READY_ATTR, "");
        }
    }

    /// Indexes the page, injects a navigation block into every post of every
    /// multi-post author and wires the triggers. `None` if the page was
    /// already bound.
    pub(crate) fn bind(&self, viewer: &AuthorId, navigate: Navigator) -> NavResult<Option<Session>> {
        if self.is_bound() {
            return Ok(None);
        }

        if self.config.inject_styles {
            self.insert_stylesheet()?;
        }
        let container = self.insert_picker_container()?;

        let posts = self.query_all_posts();
        let index = Rc::new(AuthorIndex::build(&posts, &self.config.permalink_policy()));
        let options = RenderOptions {
            show_ordinal: self.config.show_ordinal,
        };

        let mut rendered = 0;
        for (author, permalinks) in index.iter() {
            for (position, post) in self.query_posts_by_author(author).iter().enumerate() {
                let Some(block) = render(permalinks, author, position, options) else {
                    continue;
                };
                if author == viewer {
                    self.mark_own_post(post);
                }
                if self.insert_markup(post, &block.to_markup())? {
                    rendered += 1;
                }
            }
        }
        self.mark_bound();

        let picker = PickerView::new(index.clone(), container, navigate);
        let triggers = self.attach_triggers(&picker)?;

        if self.config.debug {
            leptos::logging::log!(
                "mefi-nav: {} posts, {} repeat authors, {} blocks",
                posts.len(),
                index.len(),
                rendered
            );
        }

        Ok(Some(Session {
            index,
            picker,
            rendered,
            triggers,
        }))
    }

    fn attach_triggers(&self, picker: &SharedPicker) -> NavResult<Vec<ListenerHandle>> {
        let selector = format!(".{NAV_CLASS} .{TRIGGER_CLASS}");
        let mut handles = Vec::new();

        for trigger in query_elements(&self.document, &selector) {
            let Some(at) = trigger_position(&trigger) else {
                continue;
            };
            let picker = picker.clone();
            let handle = ListenerHandle::attach(&trigger, "click", move |ev: web_sys::MouseEvent| {
                let anchor = Anchor {
                    page_x: ev.page_x(),
                    page_y: ev.page_y(),
                };
                PickerView::open(&picker, &at, anchor);
            })?;
            handles.push(handle);
        }
        Ok(handles)
    }
}

/// Site gate, viewer identity, then [`PageBinder::bind`].
pub(crate) fn init(config: NavConfig) -> NavResult<Option<Session>> {
    let binder = PageBinder::new(config)?;

    let site = binder.current_site_identifier();
    if !binder.is_recognized_site(&site) {
        return Err(NavError::unsupported_site(site.as_str()));
    }
    let viewer = binder.viewer_identity()?;

    binder.bind(&viewer, location_navigator())
}

fn trigger_position(trigger: &web_sys::Element) -> Option<NavigationPosition> {
    let author = trigger.get_attribute(ATTR_AUTHOR)?;
    let position = trigger.get_attribute(ATTR_POSITION)?.parse().ok()?;
    Some(NavigationPosition::new(AuthorId::new(author), position))
}

fn query_elements(root: &web_sys::Document, selector: &str) -> Vec<web_sys::Element> {
    let Ok(nodes) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<web_sys::Element>().ok())
        .collect()
}

/// Links under the post's byline, each with the classes between it and the byline.
pub(crate) fn query_byline(post: &web_sys::Element, byline_selector: &str) -> Vec<BylineLink> {
    let Ok(nodes) = post.query_selector_all(&format!("{byline_selector} a")) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        let Some(link) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) else {
            continue;
        };
        let href = match link.dyn_ref::<web_sys::HtmlAnchorElement>() {
            Some(a) => a.href(),
            None => link.get_attribute("href").unwrap_or_default(),
        };

        let mut markers = Vec::new();
        let mut current = Some(link);
        while let Some(el) = current {
            if el.matches(byline_selector).unwrap_or(false) || el.is_same_node(Some(post.as_ref())) {
                break;
            }
            markers.extend(el.class_name().split_whitespace().map(str::to_string));
            current = el.parent_element();
        }

        out.push(BylineLink { href, markers });
    }
    out
}

/// `USER_ID=<digits>` out of a `document.cookie` string.
pub(crate) fn parse_viewer_cookie(cookie: &str) -> Option<AuthorId> {
    cookie
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == VIEWER_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()))
        .map(AuthorId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_cookie_in_the_middle() {
        let cookie = "session=abc; USER_ID=4242; theme=dark";
        assert_eq!(parse_viewer_cookie(cookie), Some(AuthorId::new("4242")));
    }

    #[test]
    fn test_viewer_cookie_as_last_entry() {
        assert_eq!(parse_viewer_cookie("a=1;USER_ID=7"), Some(AuthorId::new("7")));
    }

    #[test]
    fn test_viewer_cookie_missing_or_malformed() {
        assert_eq!(parse_viewer_cookie(""), None);
        assert_eq!(parse_viewer_cookie("session=abc"), None);
        assert_eq!(parse_viewer_cookie("USER_ID=; x=1"), None);
        assert_eq!(parse_viewer_cookie("USER_ID=12ab;"), None);
        assert_eq!(parse_viewer_cookie("XUSER_ID=12;"), None);
    }
}
