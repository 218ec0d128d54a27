use crate::models::{AuthorId, NavigationPosition, Permalink};
use crate::picker::PickerItem;

/// Class on the wrapper of every injected navigation block.
pub(crate) const NAV_CLASS: &str = "mefinav";
pub(crate) const TRIGGER_CLASS: &str = "pickerButton";
pub(crate) const PICKER_ID: &str = "picker";

pub(crate) const ATTR_AUTHOR: &str = "data-userid";
pub(crate) const ATTR_POSITION: &str = "data-commentid";
pub(crate) const ATTR_HREF: &str = "data-href";
pub(crate) const ATTR_ITEM_POSITION: &str = "data-position";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_ordinal: bool,
}

/// Navigation controls for one post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavBlock {
    pub previous: Option<Permalink>,
    pub trigger: NavigationPosition,
    pub next: Option<Permalink>,
    /// `(position + 1, len)` when the ordinal label is enabled.
    pub ordinal: Option<(usize, usize)>,
}

/// Builds the controls for `permalinks[position]`; `None` when `position` is out of range.
pub fn render(
    permalinks: &[Permalink],
    author: &AuthorId,
    position: usize,
    options: RenderOptions,
) -> Option<NavBlock> {
    if position >= permalinks.len() {
        return None;
    }

    let previous = position
        .checked_sub(1)
        .and_then(|i| permalinks.get(i))
        .cloned();
    let next = permalinks.get(position + 1).cloned();

    Some(NavBlock {
        previous,
        trigger: NavigationPosition::new(author.clone(), position),
        next,
        ordinal: options
            .show_ordinal
            .then_some((position + 1, permalinks.len())),
    })
}

impl NavBlock {
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str(&format!(r#" <span class="{NAV_CLASS}">Navigation ["#));

        out.push_str(&arrow("navprevious", self.previous.as_ref(), "«"));

        out.push_str(&format!(
            r#"<span class="{TRIGGER_CLASS}" {ATTR_AUTHOR}="{}" {ATTR_POSITION}="{}" title="All posts by this user">≡</span>"#,
            escape_html(self.trigger.author.as_str()),
            self.trigger.position,
        ));

        out.push_str(&arrow("navnext", self.next.as_ref(), "»"));

        if let Some((n, total)) = self.ordinal {
            out.push_str(&format!(r#"<span class="navordinal">{n}/{total}</span>"#));
        }

        out.push_str("]</span>");
        out
    }
}

fn arrow(class: &str, target: Option<&Permalink>, glyph: &str) -> String {
    match target {
        Some(p) => format!(
            r#"<span class="{class}"><a href="{}">{glyph}</a></span>"#,
            escape_html(p.as_str())
        ),
        None => format!(r#"<span class="{class} inactive">{glyph}</span>"#),
    }
}

/// The jump list shown inside the picker container.
pub fn render_picker_items(items: &[PickerItem]) -> String {
    let mut out = String::from("<ul>");
    for item in items {
        let label = item.position + 1;
        match &item.target {
            Some(p) => out.push_str(&format!(
                r#"<li class="active" {ATTR_HREF}="{}" {ATTR_ITEM_POSITION}="{}">{label}</li>"#,
                escape_html(p.as_str()),
                item.position,
            )),
            None => out.push_str(&format!(r#"<li class="current">{label}</li>"#)),
        }
    }
    out.push_str("</ul>");
    out
}

pub(crate) fn default_stylesheet() -> String {
    format!(
        "
.{NAV_CLASS} {{ white-space: nowrap; }}
.{NAV_CLASS} .inactive {{ opacity: 0.4; }}
.{NAV_CLASS} .{TRIGGER_CLASS} {{ cursor: pointer; padding: 0 0.25em; }}
.{NAV_CLASS} .navordinal {{ padding-left: 0.25em; }}
#{PICKER_ID} {{ display: none; position: absolute; z-index: 1000; background: #0063ad; border: 1px solid #ccc; padding: 0.25em 0.5em; }}
#{PICKER_ID} ul {{ list-style: none; margin: 0; padding: 0; }}
#{PICKER_ID} li {{ display: inline-block; padding: 0 0.3em; }}
#{PICKER_ID} li.active {{ cursor: pointer; text-decoration: underline; }}
#{PICKER_ID} li.current {{ font-weight: bold; }}
"
    )
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
