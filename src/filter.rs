use crate::models::{PostMetaRecord, PostRecord};
use rustc_hash::FxHashSet;
use tracing::info;

/// Set of every `post_id` referenced by postmeta, built once.
pub struct ReferenceIndex<'a> {
    post_ids: FxHashSet<&'a str>,
}

impl<'a> ReferenceIndex<'a> {
    pub fn build(meta: &'a [PostMetaRecord]) -> Self {
        let post_ids: FxHashSet<&str> = meta.iter().map(|m| m.post_id()).collect();
        info!(
            meta_rows = meta.len(),
            referenced_ids = post_ids.len(),
            "Reference index built"
        );
        Self { post_ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.post_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.post_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.post_ids.is_empty()
    }
}

/// Keeps the posts whose `ID` is referenced by at least one postmeta row.
/// Input order is preserved, duplicate IDs included.
pub fn filter_referenced(posts: Vec<PostRecord>, index: &ReferenceIndex<'_>) -> Vec<PostRecord> {
    let before = posts.len();
    let kept: Vec<PostRecord> = posts
        .into_iter()
        .filter(|p| index.contains(p.id()))
        .collect();
    info!(posts = before, kept = kept.len(), "Referential filter applied");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::{meta, post};

    #[test]
    fn keeps_only_referenced_posts() {
        let posts = vec![post("1", "'a'"), post("2", "'b'"), post("3", "'c'")];
        let metas = vec![meta("10", "2")];
        let index = ReferenceIndex::build(&metas);

        let kept = filter_referenced(posts, &index);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id(), "2");
    }

    #[test]
    fn preserves_input_order() {
        let posts = vec![post("5", "'z'"), post("1", "'a'"), post("3", "'m'")];
        let metas = vec![meta("1", "1"), meta("2", "3"), meta("3", "5")];
        let index = ReferenceIndex::build(&metas);

        let ids: Vec<String> = filter_referenced(posts, &index)
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, vec!["5", "1", "3"]);
    }

    #[test]
    fn duplicate_ids_are_not_merged() {
        let posts = vec![post("4", "'a'"), post("4", "'b'")];
        let metas = vec![meta("1", "4"), meta("2", "4")];
        let index = ReferenceIndex::build(&metas);

        assert_eq!(index.len(), 1);
        assert_eq!(filter_referenced(posts, &index).len(), 2);
    }

    #[test]
    fn dangling_references_are_tolerated() {
        let posts = vec![post("1", "'a'")];
        let metas = vec![meta("1", "999")];
        let index = ReferenceIndex::build(&metas);

        assert!(filter_referenced(posts, &index).is_empty());
    }

    #[test]
    fn empty_postmeta_drops_everything() {
        let index = ReferenceIndex::build(&[]);
        assert!(index.is_empty());
        assert!(filter_referenced(vec![post("1", "'a'")], &index).is_empty());
    }

    #[test]
    fn ids_compare_as_raw_text() {
        let posts = vec![post("'7'", "'a'"), post("7", "'b'")];
        let metas = vec![meta("1", "7")];
        let index = ReferenceIndex::build(&metas);

        let kept = filter_referenced(posts, &index);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].post_author(), "'b'");
    }
}
