//! In-memory `PostStore` used by the HTTP tests.
//!
//! Mirrors the Postgres behaviour that handlers rely on: store-assigned ids,
//! store-managed timestamps, newest-first ordering and the users join.

use std::collections::{BTreeMap, HashMap};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::post_repo::{NewPost, PostPatch, PostRow, PostStore, PostWithAuthorRow};

#[derive(Default)]
struct Inner {
    next_id: i64,
    last_write: Option<DateTime<Utc>>,
    posts: BTreeMap<i64, PostRow>,
    users: HashMap<Uuid, String>,
}

impl Inner {
    // Strictly increasing, like clock_timestamp() on a single connection.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = match self.last_write {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_write = Some(now);
        now
    }

    fn with_author(&self, post: &PostRow) -> PostWithAuthorRow {
        PostWithAuthorRow {
            post: post.clone(),
            author_name: self.users.get(&post.author_id).cloned(),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPostStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user_id: Uuid, user_name: &str) {
        self.lock().users.insert(user_id, user_name.to_string());
    }

    /// Make every subsequent call fail like a dropped connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("in-memory store poisoned")
    }

    fn check_available(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepoError::Db(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

fn newest_first(a: &PostRow, b: &PostRow) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.post_id.cmp(&a.post_id))
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn list_all(&self) -> RepoResult<Vec<PostWithAuthorRow>> {
        self.check_available()?;
        let inner = self.lock();
        let mut posts: Vec<&PostRow> = inner.posts.values().collect();
        posts.sort_by(|a, b| newest_first(a, b));
        Ok(posts.into_iter().map(|p| inner.with_author(p)).collect())
    }

    async fn get_with_author(&self, post_id: i64) -> RepoResult<Option<PostWithAuthorRow>> {
        self.check_available()?;
        let inner = self.lock();
        Ok(inner.posts.get(&post_id).map(|p| inner.with_author(p)))
    }

    async fn get(&self, post_id: i64) -> RepoResult<Option<PostRow>> {
        self.check_available()?;
        Ok(self.lock().posts.get(&post_id).cloned())
    }

    async fn list_by_author(&self, author_id: Uuid) -> RepoResult<Vec<PostRow>> {
        self.check_available()?;
        let mut posts: Vec<PostRow> = self
            .lock()
            .posts
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(newest_first);
        Ok(posts)
    }

    async fn create(&self, new_post: NewPost) -> RepoResult<PostRow> {
        self.check_available()?;
        let mut inner = self.lock();
        inner.next_id += 1;
        let post_id = inner.next_id;
        let now = inner.tick();

        let row = PostRow {
            post_id,
            title: new_post.title,
            content: new_post.content,
            tags: new_post.tags,
            categories: new_post.categories,
            author_id: new_post.author_id,
            created_at: now,
            updated_at: now,
        };
        inner.posts.insert(post_id, row.clone());
        Ok(row)
    }

    async fn update(&self, post_id: i64, patch: PostPatch) -> RepoResult<Option<PostRow>> {
        self.check_available()?;
        let mut inner = self.lock();
        let now = inner.tick();
        let Some(row) = inner.posts.get_mut(&post_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            row.title = title;
        }
        if let Some(content) = patch.content {
            row.content = content;
        }
        if let Some(tags) = patch.tags {
            row.tags = tags;
        }
        if let Some(categories) = patch.categories {
            row.categories = categories;
        }
        row.updated_at = now;

        Ok(Some(row.clone()))
    }

    async fn delete(&self, post_id: i64) -> RepoResult<bool> {
        self.check_available()?;
        Ok(self.lock().posts.remove(&post_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(author_id: Uuid, title: &str) -> NewPost {
        NewPost {
            title: Some(title.to_string()),
            content: None,
            tags: Vec::new(),
            categories: Vec::new(),
            author_id,
        }
    }

    #[tokio::test]
    async fn list_all_is_newest_first_and_resolves_author_names() {
        let store = InMemoryPostStore::new();
        let alice = Uuid::new_v4();
        store.add_user(alice, "alice");

        store.create(new_post(alice, "first")).await.unwrap();
        store.create(new_post(alice, "second")).await.unwrap();
        store.create(new_post(Uuid::new_v4(), "third")).await.unwrap();

        let rows = store.list_all().await.unwrap();
        let titles: Vec<_> = rows
            .iter()
            .map(|r| r.post.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
        assert_eq!(rows[1].author_name.as_deref(), Some("alice"));
        assert_eq!(rows[0].author_name, None);
    }

    #[tokio::test]
    async fn update_only_touches_fields_in_the_patch() {
        let store = InMemoryPostStore::new();
        let author = Uuid::new_v4();
        let created = store.create(new_post(author, "Hi")).await.unwrap();

        let patch = PostPatch {
            tags: Some(vec!["rust".into()]),
            ..PostPatch::default()
        };
        let updated = store.update(created.post_id, patch).await.unwrap().unwrap();

        assert_eq!(updated.title.as_deref(), Some("Hi"));
        assert_eq!(updated.tags, vec!["rust".to_string()]);
        assert_eq!(updated.author_id, author);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = InMemoryPostStore::new();
        store.set_unavailable(true);
        assert!(store.list_all().await.is_err());
        assert!(store.get(1).await.is_err());
    }
}
