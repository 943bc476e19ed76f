//! Retroactive repository labelling.
//!
//! When a second repository is ingested into a store that already holds
//! facts, the facts need a repository label and a namespaced file path so
//! the two trees do not collide. These are the only mutations a fact ever
//! sees after it has been added.

use super::inner::StoreInner;
use std::sync::Arc;

impl StoreInner {
    /// Label every fact from `start` on and prefix its file path.
    ///
    /// Facts with an empty file keep it empty. Returns the number of facts
    /// labelled.
    pub(super) fn tag_range(&mut self, start: usize, repo: &str, file_prefix: &str) -> usize {
        if start >= self.facts.len() {
            return 0;
        }

        let facts = Arc::make_mut(&mut self.facts);
        for fact in &mut facts[start..] {
            fact.repo = repo.to_string();
            if !file_prefix.is_empty() && !fact.file.is_empty() {
                fact.file = format!("{file_prefix}{}", fact.file);
            }
        }
        let tagged = facts.len() - start;

        self.reindex_locations();
        tagged
    }

    /// Label facts that are unlabelled (or already carry `repo`), prefixing
    /// their file path unless it already has the prefix.
    ///
    /// Facts labelled with a different repository are left alone, so calling
    /// this twice is a no-op the second time. Returns the number of facts
    /// whose file path changed.
    pub(super) fn tag_untagged(&mut self, repo: &str, file_prefix: &str) -> usize {
        let belongs = |fact_repo: &str| fact_repo.is_empty() || fact_repo == repo;
        let needs_prefix =
            |file: &str| !file_prefix.is_empty() && !file.is_empty() && !file.starts_with(file_prefix);

        let pending = self
            .facts
            .iter()
            .any(|f| belongs(&f.repo) && (f.repo != repo || needs_prefix(&f.file)));
        if !pending {
            return 0;
        }

        let mut renamed = 0;
        for fact in Arc::make_mut(&mut self.facts) {
            if !belongs(&fact.repo) {
                continue;
            }
            fact.repo = repo.to_string();
            if needs_prefix(&fact.file) {
                fact.file = format!("{file_prefix}{}", fact.file);
                renamed += 1;
            }
        }

        self.reindex_locations();
        renamed
    }

    /// Label every fact from `start` on without touching file paths.
    pub(super) fn set_repo_range(&mut self, start: usize, repo: &str) -> usize {
        if start >= self.facts.len() {
            return 0;
        }

        let facts = Arc::make_mut(&mut self.facts);
        for fact in &mut facts[start..] {
            fact.repo = repo.to_string();
        }
        let tagged = facts.len() - start;

        self.reindex_locations();
        tagged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Fact;

    fn two_repo_store() -> StoreInner {
        let mut inner = StoreInner::default();
        inner.add_all([
            Fact::new("module", "api").with_file("api/doc.go", 1),
            Fact::new("module", "web").with_file("web/index.ts", 1),
        ]);
        inner
    }

    #[test]
    fn tag_range_touches_only_the_tail() {
        let mut inner = two_repo_store();
        assert_eq!(inner.tag_range(1, "frontend", "frontend/"), 1);

        assert_eq!(inner.facts[0].repo, "");
        assert_eq!(inner.facts[0].file, "api/doc.go");
        assert_eq!(inner.facts[1].repo, "frontend");
        assert_eq!(inner.facts[1].file, "frontend/web/index.ts");
        assert_eq!(inner.by_file["frontend/web/index.ts"], vec![1]);
        assert!(!inner.by_file.contains_key("web/index.ts"));
        assert_eq!(inner.by_repo["frontend"], vec![1]);
    }

    #[test]
    fn tag_range_past_end_is_a_no_op() {
        let mut inner = two_repo_store();
        assert_eq!(inner.tag_range(2, "x", "x/"), 0);
        assert!(inner.by_repo.is_empty());
    }

    #[test]
    fn tag_range_leaves_empty_files_empty() {
        let mut inner = StoreInner::default();
        inner.add_all([Fact::new("symbol", "floating")]);
        inner.tag_range(0, "backend", "backend/");
        assert_eq!(inner.facts[0].file, "");
        assert_eq!(inner.facts[0].repo, "backend");
    }

    #[test]
    fn tag_untagged_is_idempotent() {
        let mut inner = two_repo_store();
        assert_eq!(inner.tag_untagged("backend", "backend/"), 2);
        assert_eq!(inner.tag_untagged("backend", "backend/"), 0);
        assert_eq!(inner.facts[0].file, "backend/api/doc.go");
    }

    #[test]
    fn tag_untagged_skips_other_repositories() {
        let mut inner = two_repo_store();
        inner.set_repo_range(1, "frontend");

        assert_eq!(inner.tag_untagged("backend", "backend/"), 1);
        assert_eq!(inner.facts[1].repo, "frontend");
        assert_eq!(inner.facts[1].file, "web/index.ts");
        assert_eq!(inner.by_repo["backend"], vec![0]);
    }

    #[test]
    fn tag_untagged_labels_without_counting_prefixed_paths() {
        let mut inner = StoreInner::default();
        inner.add_all([Fact::new("module", "api").with_file("backend/api/doc.go", 1)]);

        assert_eq!(inner.tag_untagged("backend", "backend/"), 0);
        assert_eq!(inner.facts[0].repo, "backend");
        assert_eq!(inner.facts[0].file, "backend/api/doc.go");
    }

    #[test]
    fn set_repo_range_keeps_paths() {
        let mut inner = two_repo_store();
        assert_eq!(inner.set_repo_range(0, "mono"), 2);
        assert_eq!(inner.facts[1].file, "web/index.ts");
        assert_eq!(inner.by_repo["mono"], vec![0, 1]);
    }
}
