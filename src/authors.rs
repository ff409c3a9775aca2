use crate::models::PostRecord;
use rustc_hash::FxHashSet;
use tracing::info;

/// Stable sort by the raw `post_author` text, compared byte by byte.
///
/// `"10"` sorts before `"2"`; equal authors keep their input order.
pub fn sort_by_author(mut posts: Vec<PostRecord>) -> Vec<PostRecord> {
    posts.sort_by(|a, b| a.post_author().as_bytes().cmp(b.post_author().as_bytes()));
    posts
}

/// Keeps the first post seen for each distinct `post_author`, in input order.
pub fn dedup_by_author(posts: Vec<PostRecord>) -> Vec<PostRecord> {
    let before = posts.len();
    let mut seen_authors = FxHashSet::default();
    let mut unique = Vec::new();

    for post in posts {
        // Only keep the first occurrence
        if seen_authors.insert(post.post_author().to_string()) {
            unique.push(post);
        }
    }

    info!(posts = before, unique_authors = unique.len(), "Deduplicated by author");
    unique
}
