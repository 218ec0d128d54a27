use super::listener::ListenerHandle;
use crate::error::{NavError, NavResult};
use crate::index::AuthorIndex;
use crate::models::{Anchor, NavigationPosition, Permalink};
use crate::picker::PickerController;
use crate::render::{render_picker_items, ATTR_ITEM_POSITION, NAV_CLASS, PICKER_ID};
use leptos::ev;
use leptos::prelude::*;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;

pub(crate) type SharedPicker = Rc<RefCell<PickerView>>;

/// How a chosen permalink is followed. The page uses `location.href`.
pub(crate) type Navigator = Box<dyn Fn(&Permalink)>;

/// DOM side of the picker: the `#picker` container plus every listener the
/// open popover registered.
pub(crate) struct PickerView {
    controller: PickerController,
    index: Rc<AuthorIndex>,
    container: web_sys::HtmlElement,
    navigate: Navigator,
    items: Vec<ListenerHandle>,
    dismissal: Option<WindowListenerHandle>,
}

impl PickerView {
    pub(crate) fn new(
        index: Rc<AuthorIndex>,
        container: web_sys::HtmlElement,
        navigate: Navigator,
    ) -> SharedPicker {
        Rc::new(RefCell::new(Self {
            controller: PickerController::new(),
            index,
            container,
            navigate,
            items: Vec::new(),
            dismissal: None,
        }))
    }

    pub(crate) fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    /// Shows the jump list for `at` at `anchor`, replacing any open one.
    pub(crate) fn open(shared: &SharedPicker, at: &NavigationPosition, anchor: Anchor) {
        let mut view = shared.borrow_mut();
        let index = view.index.clone();
        let Some(items) = view.controller.open(&index, at, anchor).map(|o| o.items()) else {
            return;
        };

        view.detach_items();
        view.container.set_inner_html(&render_picker_items(&items));
        view.show_at(anchor);

        if let Err(e) = view.attach_items(Rc::downgrade(shared)) {
            leptos::logging::warn!("mefi-nav: {e}");
        }
        if view.dismissal.is_none() {
            view.dismissal = Some(dismissal_listener(Rc::downgrade(shared)));
        }
    }

    /// Follows the item at `position`, then tears the popover down.
    pub(crate) fn select(shared: &SharedPicker, position: usize) {
        let target = shared.borrow_mut().controller.select(position);
        let Some(target) = target else {
            return;
        };

        let mut view = shared.borrow_mut();
        (view.navigate)(&target);
        view.close();
    }

    /// Page-wide click. Clicks inside the navigation controls or the picker are ignored.
    pub(crate) fn dismiss_from(shared: &SharedPicker, target: Option<web_sys::Element>) {
        if target.is_some_and(|el| is_inside_navigation(&el)) {
            return;
        }
        let mut view = shared.borrow_mut();
        if view.controller.dismiss() {
            view.close();
        }
    }

    fn show_at(&self, anchor: Anchor) {
        let style = self.container.style();
        let _ = style.set_property("left", &format!("{}px", anchor.page_x));
        let _ = style.set_property("top", &format!("{}px", anchor.page_y));
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("display", "inline");
    }

    fn attach_items(&mut self, shared: Weak<RefCell<PickerView>>) -> NavResult<()> {
        let nodes = self
            .container
            .query_selector_all("li.active")
            .map_err(|e| NavError::dom_js("query picker items", e))?;

        for i in 0..nodes.length() {
            let Some(li) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(position) = li
                .get_attribute(ATTR_ITEM_POSITION)
                .and_then(|p| p.parse::<usize>().ok())
            else {
                continue;
            };

            let shared = shared.clone();
            let handle = ListenerHandle::attach(&li, "click", move |_ev: web_sys::MouseEvent| {
                if let Some(shared) = shared.upgrade() {
                    PickerView::select(&shared, position);
                }
            })?;
            self.items.push(handle);
        }
        Ok(())
    }

    fn detach_items(&mut self) {
        for handle in self.items.drain(..) {
            handle.detach();
        }
    }

    fn close(&mut self) {
        let _ = self.container.style().set_property("display", "none");
        self.detach_items();
        if let Some(handle) = self.dismissal.take() {
            handle.remove();
        }
    }
}

fn dismissal_listener(shared: Weak<RefCell<PickerView>>) -> WindowListenerHandle {
    window_event_listener(ev::click, move |ev: web_sys::MouseEvent| {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let target = ev.target().and_then(|t| t.dyn_into::<web_sys::Element>().ok());
        PickerView::dismiss_from(&shared, target);
    })
}

fn is_inside_navigation(el: &web_sys::Element) -> bool {
    el.closest(&format!(".{NAV_CLASS}, #{PICKER_ID}"))
        .ok()
        .flatten()
        .is_some()
}

pub(crate) fn location_navigator() -> Navigator {
    Box::new(|target: &Permalink| {
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_href(target.as_str());
        }
    })
}
