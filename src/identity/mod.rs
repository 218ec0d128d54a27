use crate::models::{AuthorId, BylineLink, Identity, Permalink};

/// Which byline link is the permalink.
///
/// Links carrying any of `skip_markers` (a staff flair, for instance) are not
/// counted; `permalink_position` indexes the links that remain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermalinkPolicy {
    pub skip_markers: Vec<String>,
    pub permalink_position: usize,
}

impl Default for PermalinkPolicy {
    fn default() -> Self {
        Self {
            skip_markers: Vec::new(),
            permalink_position: 1,
        }
    }
}

/// Author and permalink of one post, read from its byline links.
///
/// Returns `None` for deleted or system posts whose byline has no usable links.
pub fn extract(links: &[BylineLink], policy: &PermalinkPolicy) -> Option<Identity> {
    let mut meaningful = links
        .iter()
        .filter(|l| !l.has_any_marker(&policy.skip_markers));

    let author_link = meaningful.next()?;
    let author = author_from_href(&author_link.href)?;

    // `author_link` was position 0.
    let permalink_link = match policy.permalink_position {
        0 => author_link,
        n => meaningful.nth(n - 1)?,
    };
    if permalink_link.href.trim().is_empty() {
        return None;
    }

    Some(Identity {
        author,
        permalink: Permalink::new(permalink_link.href.clone()),
    })
}

/// Last non-empty path segment of a profile link, e.g. `12345` for
/// `https://www.metafilter.com/user/12345`.
pub(crate) fn author_from_href(href: &str) -> Option<AuthorId> {
    let href = href.split(['?', '#']).next().unwrap_or_default();
    let path = match href.split_once("://") {
        Some((_, rest)) => rest.find('/').map(|i| &rest[i..]).unwrap_or_default(),
        None => href,
    };
    let segment = path.rsplit('/').find(|s| !s.is_empty())?;

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    let decoded = decoded.trim();
    if decoded.is_empty() {
        None
    } else {
        Some(AuthorId::new(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byline(hrefs: &[&str]) -> Vec<BylineLink> {
        hrefs.iter().map(|h| BylineLink::new(*h)).collect()
    }

    #[test]
    fn test_extract_author_and_permalink() {
        let links = byline(&[
            "https://www.metafilter.com/user/4242",
            "https://www.metafilter.com/12345/thread#678",
        ]);
        let id = extract(&links, &PermalinkPolicy::default()).expect("should extract");
        assert_eq!(id.author, AuthorId::new("4242"));
        assert_eq!(id.permalink.as_str(), "https://www.metafilter.com/12345/thread#678");
    }

    #[test]
    fn test_empty_byline_is_skipped() {
        assert!(extract(&[], &PermalinkPolicy::default()).is_none());
    }

    #[test]
    fn test_missing_permalink_is_skipped() {
        let links = byline(&["https://www.metafilter.com/user/4242"]);
        assert!(extract(&links, &PermalinkPolicy::default()).is_none());
    }

    #[test]
    fn test_staff_flair_is_not_counted() {
        let links = vec![
            BylineLink::new("https://www.metafilter.com/user/3"),
            BylineLink::new("https://www.metafilter.com/about").with_marker("staff"),
            BylineLink::new("https://www.metafilter.com/1/t#9"),
        ];
        let policy = PermalinkPolicy {
            skip_markers: vec!["staff".to_string()],
            permalink_position: 1,
        };
        let id = extract(&links, &policy).expect("should extract");
        assert_eq!(id.author.as_str(), "3");
        assert_eq!(id.permalink.as_str(), "https://www.metafilter.com/1/t#9");

        // Without the policy the flair link is taken for the permalink.
        let naive = extract(&links, &PermalinkPolicy::default()).expect("should extract");
        assert_eq!(naive.permalink.as_str(), "https://www.metafilter.com/about");
    }

    #[test]
    fn test_permalink_position_is_configurable() {
        let links = byline(&["/user/1", "/favorited/9", "/1/t#9"]);
        let policy = PermalinkPolicy {
            skip_markers: Vec::new(),
            permalink_position: 2,
        };
        let id = extract(&links, &policy).expect("should extract");
        assert_eq!(id.permalink.as_str(), "/1/t#9");
    }

    #[test]
    fn test_author_from_href_variants() {
        assert_eq!(author_from_href("/user/77").map(|a| a.0), Some("77".to_string()));
        assert_eq!(author_from_href("/user/77/").map(|a| a.0), Some("77".to_string()));
        assert_eq!(author_from_href("/user/77?tab=posts").map(|a| a.0), Some("77".to_string()));
        assert_eq!(
            author_from_href("/user/some%20one").map(|a| a.0),
            Some("some one".to_string())
        );
        assert!(author_from_href("").is_none());
        assert!(author_from_href("/").is_none());
        assert!(author_from_href("https://www.metafilter.com").is_none());
        assert!(author_from_href("https://www.metafilter.com/").is_none());
    }
}
