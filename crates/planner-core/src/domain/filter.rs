//! Status filter over the post list.

use std::fmt;
use std::str::FromStr;

use super::post::{Post, Status};
use crate::error::DomainError;

/// Which posts the dashboard list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => post.status() == *status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        StatusFilter::Only(status)
    }
}

/// The subsequence of `posts` accepted by `filter`, in the original order.
pub fn filtered_posts<'a>(posts: &'a [Post], filter: StatusFilter) -> Vec<&'a Post> {
    posts.iter().filter(|post| filter.matches(post)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use proptest::prelude::*;

    use super::*;
    use crate::domain::{PostBody, PostId};

    fn post(id: i64, status: Status) -> Post {
        let mut body = PostBody::new(Utc::now());
        body.set_status(status);
        Post::new(PostId::from_millis(id), body)
    }

    fn status_strategy() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::Idea),
            Just(Status::Perfect),
            Just(Status::ReadyToPost),
        ]
    }

    #[test]
    fn test_filter_single_match() {
        let posts = vec![
            post(3, Status::Idea),
            post(2, Status::ReadyToPost),
            post(1, Status::Perfect),
        ];

        let visible = filtered_posts(&posts, StatusFilter::Only(Status::ReadyToPost));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id().as_str(), "2");
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("All".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Ready to Post".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::ReadyToPost)
        );
        assert!("Archived".parse::<StatusFilter>().is_err());
    }

    proptest! {
        #[test]
        fn prop_all_filter_is_identity(statuses in prop::collection::vec(status_strategy(), 0..20)) {
            let posts: Vec<Post> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| post(i as i64, *s))
                .collect();

            let visible = filtered_posts(&posts, StatusFilter::All);
            prop_assert_eq!(visible.len(), posts.len());
            for (shown, original) in visible.iter().zip(posts.iter()) {
                prop_assert_eq!(*shown, original);
            }
        }

        #[test]
        fn prop_status_filter_keeps_order(
            statuses in prop::collection::vec(status_strategy(), 0..20),
            wanted in status_strategy(),
        ) {
            let posts: Vec<Post> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| post(i as i64, *s))
                .collect();

            let visible = filtered_posts(&posts, StatusFilter::Only(wanted));
            let expected: Vec<&Post> = posts.iter().filter(|p| p.status() == wanted).collect();

            prop_assert!(visible.iter().all(|p| p.status() == wanted));
            prop_assert_eq!(visible, expected);
        }
    }
}
