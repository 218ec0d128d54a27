use crate::identity::{extract, PermalinkPolicy};
use crate::models::{AuthorId, BylineLink, Permalink};
use std::collections::BTreeMap;

/// A rendered post as the index builder sees it.
///
/// Implemented by the DOM wrapper in `page` and by plain structs in tests.
pub trait Post {
    fn byline_links(&self) -> Vec<BylineLink>;

    /// Records the author on the post so it can be re-selected later.
    fn tag_author(&self, author: &AuthorId);
}

/// Author → that author's permalinks in page order.
///
/// Every entry holds at least two permalinks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorIndex {
    entries: BTreeMap<AuthorId, Vec<Permalink>>,
}

impl AuthorIndex {
    pub fn build<P: Post>(posts: &[P], policy: &PermalinkPolicy) -> Self {
        let mut entries: BTreeMap<AuthorId, Vec<Permalink>> = BTreeMap::new();

        for post in posts {
            let Some(identity) = extract(&post.byline_links(), policy) else {
                continue;
            };
            post.tag_author(&identity.author);
            entries
                .entry(identity.author)
                .or_default()
                .push(identity.permalink);
        }

        entries.retain(|_, permalinks| permalinks.len() > 1);
        Self { entries }
    }

    pub fn get(&self, author: &AuthorId) -> Option<&[Permalink]> {
        self.entries.get(author).map(|v| v.as_slice())
    }

    pub fn contains(&self, author: &AuthorId) -> bool {
        self.entries.contains_key(author)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted by author id.
    pub fn iter(&self) -> impl Iterator<Item = (&AuthorId, &[Permalink])> {
        self.entries.iter().map(|(a, p)| (a, p.as_slice()))
    }
}
