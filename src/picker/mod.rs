use crate::index::AuthorIndex;
use crate::models::{Anchor, AuthorId, NavigationPosition, Permalink};

/// One entry of the jump list. `target` is `None` for the post the list was opened from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerItem {
    pub position: usize,
    pub target: Option<Permalink>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenPopover {
    pub anchor: Anchor,
    pub author: AuthorId,
    pub permalinks: Vec<Permalink>,
    pub active: usize,
}

impl OpenPopover {
    pub fn items(&self) -> Vec<PickerItem> {
        self.permalinks
            .iter()
            .enumerate()
            .map(|(position, p)| PickerItem {
                position,
                target: (position != self.active).then(|| p.clone()),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PopoverState {
    #[default]
    Closed,
    Open(OpenPopover),
}

/// Owns the one popover a page can have open.
#[derive(Clone, Debug, Default)]
pub struct PickerController {
    state: PopoverState,
}

impl PickerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PopoverState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopoverState::Open(_))
    }

    /// Opens the jump list for `at`, replacing whatever was open.
    ///
    /// Unknown authors and out-of-range positions leave the state untouched.
    pub fn open(
        &mut self,
        index: &AuthorIndex,
        at: &NavigationPosition,
        anchor: Anchor,
    ) -> Option<&OpenPopover> {
        let permalinks = index.get(&at.author)?;
        if at.position >= permalinks.len() {
            return None;
        }

        self.state = PopoverState::Open(OpenPopover {
            anchor,
            author: at.author.clone(),
            permalinks: permalinks.to_vec(),
            active: at.position,
        });
        match &self.state {
            PopoverState::Open(open) => Some(open),
            PopoverState::Closed => None,
        }
    }

    /// Resolves a click on the item at `position` to its permalink and closes.
    ///
    /// The inert current item does nothing.
    pub fn select(&mut self, position: usize) -> Option<Permalink> {
        let PopoverState::Open(open) = &self.state else {
            return None;
        };
        if position == open.active {
            return None;
        }
        let target = open.permalinks.get(position).cloned()?;
        self.state = PopoverState::Closed;
        Some(target)
    }

    /// Returns whether a popover was actually closed.
    pub fn dismiss(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = PopoverState::Closed;
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::PermalinkPolicy;
    use crate::index::tests::{thread_abaac, FakePost};

    fn index() -> AuthorIndex {
        let mut posts = thread_abaac();
        posts.push(FakePost::by("B", "/1/t#b2"));
        AuthorIndex::build(&posts, &PermalinkPolicy::default())
    }

    fn at(author: &str, position: usize) -> NavigationPosition {
        NavigationPosition::new(AuthorId::new(author), position)
    }

    #[test]
    fn test_open_lists_n_minus_one_clickable_items() {
        let index = index();
        let mut picker = PickerController::new();
        let anchor = Anchor { page_x: 10, page_y: 20 };
        let open = picker.open(&index, &at("A", 1), anchor).expect("A is indexed");

        assert_eq!(open.anchor, anchor);
        let items = open.items();
        assert_eq!(items.len(), 3);
        assert_eq!(items.iter().filter(|i| i.target.is_some()).count(), 2);
        assert_eq!(items[1].target, None);
        assert_eq!(items[0].target, Some(Permalink::new("/1/t#a1")));
        assert_eq!(items[2].target, Some(Permalink::new("/1/t#a3")));
    }

    #[test]
    fn test_second_open_replaces_first() {
        let index = index();
        let mut picker = PickerController::new();
        picker.open(&index, &at("A", 0), Anchor::default());
        picker.open(&index, &at("B", 1), Anchor { page_x: 5, page_y: 5 });

        let PopoverState::Open(open) = picker.state() else {
            panic!("picker should be open");
        };
        assert_eq!(open.author, AuthorId::new("B"));
        assert_eq!(open.active, 1);
        assert_eq!(open.permalinks.len(), 2);
    }

    #[test]
    fn test_unknown_author_is_a_noop() {
        let index = index();
        let mut picker = PickerController::new();
        assert!(picker.open(&index, &at("C", 0), Anchor::default()).is_none());
        assert!(!picker.is_open());

        picker.open(&index, &at("A", 0), Anchor::default());
        assert!(picker.open(&index, &at("Z", 0), Anchor::default()).is_none());
        assert!(picker.open(&index, &at("A", 9), Anchor::default()).is_none());
        let PopoverState::Open(open) = picker.state() else {
            panic!("previous popover should survive a miss");
        };
        assert_eq!(open.author, AuthorId::new("A"));
    }

    #[test]
    fn test_select_returns_exact_permalink_and_closes() {
        let index = index();
        let mut picker = PickerController::new();
        picker.open(&index, &at("A", 0), Anchor::default());

        assert_eq!(picker.select(2), Some(Permalink::new("/1/t#a3")));
        assert!(!picker.is_open());
        assert_eq!(picker.select(1), None);
    }

    #[test]
    fn test_select_current_item_is_inert() {
        let index = index();
        let mut picker = PickerController::new();
        picker.open(&index, &at("A", 1), Anchor::default());

        assert_eq!(picker.select(1), None);
        assert!(picker.is_open());
        assert_eq!(picker.select(7), None);
        assert!(picker.is_open());
    }

    #[test]
    fn test_dismiss_reports_whether_it_closed() {
        let index = index();
        let mut picker = PickerController::new();
        assert!(!picker.dismiss());
        picker.open(&index, &at("A", 0), Anchor::default());
        assert!(picker.dismiss());
        assert_eq!(picker.state(), &PopoverState::Closed);
    }
}
