// search/mod.rs - Parallel field search
//
// One lookup per (field, value) pair, all polled concurrently and joined
// before merging. A failing lookup contributes nothing. Merged results are
// deduplicated by document id, keeping the first occurrence, so the output
// is ordered by query pair and then by store order.

use futures::future::join_all;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::database::{Document, Repository, Versioned};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("too many search terms: {given} given, at most {max} allowed")]
    TooManyTerms { given: usize, max: usize },

    #[error("no matching {0} found")]
    NoMatches(&'static str),
}

pub async fn search<T: Document>(
    repo: &Repository<T>,
    terms: &[(String, String)],
    max_terms: usize,
) -> Result<Vec<Versioned<T>>, SearchError> {
    if terms.len() > max_terms {
        return Err(SearchError::TooManyTerms {
            given: terms.len(),
            max: max_terms,
        });
    }

    let lookups = terms.iter().map(|(field, value)| async move {
        if !T::SEARCHABLE.contains(&field.as_str()) {
            debug!(collection = T::COLLECTION.as_str(), field = %field, "search skipped: field not searchable");
            return Vec::new();
        }
        match repo.search(field, value).await {
            Ok(found) => found,
            Err(e) => {
                debug!(collection = T::COLLECTION.as_str(), field = %field, value = %value, error = %e, "search lookup failed");
                Vec::new()
            }
        }
    });

    let mut seen = HashSet::new();
    let merged: Vec<Versioned<T>> = join_all(lookups)
        .await
        .into_iter()
        .flatten()
        .filter(|doc| seen.insert(doc.id()))
        .collect();

    if merged.is_empty() {
        return Err(SearchError::NoMatches(T::COLLECTION.as_str()));
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::User;
    use crate::database::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn user(name: &str, email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bio: String::new(),
            avatar: String::new(),
            pronouns: String::new(),
            email: email.to_string(),
            password: "$argon2id$secret".to_string(),
        }
    }

    async fn repo_with(users: &[User]) -> Repository<User> {
        let repo = Repository::new(Arc::new(MemoryStore::new()), Duration::from_millis(200));
        repo.insert_many(users).await.unwrap();
        repo
    }

    fn terms(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(f, v)| (f.to_string(), v.to_string())).collect()
    }

    #[tokio::test]
    async fn same_document_matched_twice_is_returned_once() {
        let alice = user("alice", "alice@x.com");
        let repo = repo_with(&[alice.clone(), user("bob", "bob@x.com")]).await;

        let found = search(&repo, &terms(&[("name", "alice"), ("email", "alice@x.com")]), 16)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, alice.id);
    }

    #[tokio::test]
    async fn results_follow_term_order() {
        let alice = user("alice", "a@x.com");
        let bob = user("bob", "b@x.com");
        let repo = repo_with(&[alice.clone(), bob.clone()]).await;

        let found = search(&repo, &terms(&[("name", "bob"), ("name", "ali")]), 16).await.unwrap();
        let ids: Vec<_> = found.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![bob.id, alice.id]);
    }

    #[tokio::test]
    async fn nothing_matching_is_not_found() {
        let repo = repo_with(&[user("alice", "a@x.com")]).await;
        let err = search(&repo, &terms(&[("name", "zed")]), 16).await.unwrap_err();
        assert_eq!(err, SearchError::NoMatches("users"));

        let err = search(&repo, &[], 16).await.unwrap_err();
        assert_eq!(err, SearchError::NoMatches("users"));
    }

    #[tokio::test]
    async fn failing_lookups_are_skipped() {
        let repo = repo_with(&[user("alice", "a@x.com")]).await;
        // invalid regex and a non-searchable field both contribute nothing
        let found = search(
            &repo,
            &terms(&[("name", "(broken"), ("password", "argon"), ("name", "ALICE")]),
            16,
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn password_hashes_are_not_searchable() {
        let repo = repo_with(&[user("alice", "a@x.com")]).await;
        let err = search(&repo, &terms(&[("password", ".*")]), 16).await.unwrap_err();
        assert_eq!(err, SearchError::NoMatches("users"));
    }

    #[tokio::test]
    async fn fan_out_is_capped() {
        let repo = repo_with(&[user("alice", "a@x.com")]).await;
        let many = terms(&[("name", "a"), ("name", "b"), ("name", "c")]);
        let err = search(&repo, &many, 2).await.unwrap_err();
        assert_eq!(err, SearchError::TooManyTerms { given: 3, max: 2 });
    }
}
