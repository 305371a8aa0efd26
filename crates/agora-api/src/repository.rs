//! Storage seam for the query API.
//!
//! Production deployments put a hosted database behind [`Repository`].
//! [`MemoryRepository`] keeps everything in process.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use agora_board::{Author, Comment, CommentDraft, Post, PostDetail, PostDraft};
use agora_commerce::catalog::{Product, ProductDraft, ProductQuery};
use agora_commerce::{CommentId, PostId, ProductId, UserId};
use chrono::Utc;

use crate::error::RepositoryError;

/// Backend operations the handlers need.
pub trait Repository {
    /// Active products matching the query, newest first.
    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError>;

    fn insert_product(&self, draft: ProductDraft) -> Result<Product, RepositoryError>;

    /// All posts with their authors, newest first.
    fn list_posts(&self) -> Result<Vec<Post>, RepositoryError>;

    fn insert_post(&self, draft: PostDraft) -> Result<Post, RepositoryError>;

    /// A post with its author and comments, or `None` if it does not exist.
    fn find_post(&self, id: &PostId) -> Result<Option<PostDetail>, RepositoryError>;

    fn post_exists(&self, id: &PostId) -> Result<bool, RepositoryError>;

    fn insert_comment(&self, draft: CommentDraft) -> Result<Comment, RepositoryError>;
}

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    users: BTreeMap<UserId, Author>,
}

impl Tables {
    fn author(&self, id: &UserId) -> Option<Author> {
        self.users.get(id).cloned()
    }

    /// Rows are appended, so iterating in reverse and sorting stably
    /// keeps the most recent insert first among equal timestamps.
    fn posts_newest_first(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .rev()
            .map(|p| Post {
                author: self.author(&p.author_id),
                ..p.clone()
            })
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

/// In-process repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so posts and comments can join their profile.
    pub fn insert_author(&self, author: Author) -> Result<(), RepositoryError> {
        self.write()?.users.insert(author.id.clone(), author);
        Ok(())
    }

    /// Insert a fully formed product, e.g. an inactive or back-dated one.
    pub fn seed_product(&self, product: Product) -> Result<(), RepositoryError> {
        self.write()?.products.push(product);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.tables.read().map_err(|_| RepositoryError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.tables.write().map_err(|_| RepositoryError::Poisoned)
    }
}

impl Repository for MemoryRepository {
    fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        Ok(query.apply(&self.read()?.products))
    }

    fn insert_product(&self, draft: ProductDraft) -> Result<Product, RepositoryError> {
        let product = draft.into_product(ProductId::generate(), Utc::now());
        self.write()?.products.push(product.clone());
        Ok(product)
    }

    fn list_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        Ok(self.read()?.posts_newest_first())
    }

    fn insert_post(&self, draft: PostDraft) -> Result<Post, RepositoryError> {
        let mut tables = self.write()?;
        let author = tables.author(&draft.author_id);
        let post = draft.into_post(PostId::generate(), Utc::now(), author);
        tables.posts.push(Post {
            author: None,
            ..post.clone()
        });
        Ok(post)
    }

    fn find_post(&self, id: &PostId) -> Result<Option<PostDetail>, RepositoryError> {
        let tables = self.read()?;
        let Some(post) = tables.posts.iter().find(|p| &p.id == id) else {
            return Ok(None);
        };

        let post = Post {
            author: tables.author(&post.author_id),
            ..post.clone()
        };
        let comments = tables
            .comments
            .iter()
            .rev()
            .filter(|c| &c.post_id == id)
            .map(|c| Comment {
                author: tables.author(&c.author_id),
                ..c.clone()
            })
            .collect();

        Ok(Some(PostDetail::new(post, comments)))
    }

    fn post_exists(&self, id: &PostId) -> Result<bool, RepositoryError> {
        Ok(self.read()?.posts.iter().any(|p| &p.id == id))
    }

    fn insert_comment(&self, draft: CommentDraft) -> Result<Comment, RepositoryError> {
        let mut tables = self.write()?;
        let author = tables.author(&draft.author_id);
        let comment = draft.into_comment(CommentId::generate(), Utc::now(), author);
        tables.comments.push(Comment {
            author: None,
            ..comment.clone()
        });
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_board::{NewComment, NewPost};

    fn repo_with_author() -> MemoryRepository {
        let repo = MemoryRepository::new();
        repo.insert_author(Author::new("u1", "u1@example.com").with_nickname("kim"))
            .unwrap();
        repo
    }

    fn post(repo: &MemoryRepository, title: &str) -> Post {
        let draft = NewPost {
            title: Some(title.to_string()),
            content: Some("body".to_string()),
            author_id: Some(UserId::new("u1")),
        }
        .validate()
        .unwrap();
        repo.insert_post(draft).unwrap()
    }

    #[test]
    fn test_posts_join_author_and_list_newest_first() {
        let repo = repo_with_author();
        let first = post(&repo, "first");
        let second = post(&repo, "second");
        assert_eq!(first.author.as_ref().unwrap().display_name(), "kim");

        let titles: Vec<String> = repo.list_posts().unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert!(repo.post_exists(&second.id).unwrap());
        assert!(!repo.post_exists(&PostId::new("missing")).unwrap());
    }

    #[test]
    fn test_find_post_includes_comments() {
        let repo = repo_with_author();
        let post = post(&repo, "hello");

        for text in ["one", "two"] {
            let draft = NewComment {
                content: Some(text.to_string()),
                post_id: Some(post.id.clone()),
                author_id: Some(UserId::new("u1")),
            }
            .validate()
            .unwrap();
            repo.insert_comment(draft).unwrap();
        }

        let detail = repo.find_post(&post.id).unwrap().unwrap();
        assert_eq!(detail.comments.len(), 2);
        assert_eq!(detail.comments[0].content, "two");
        assert!(detail.comments[0].author.is_some());

        assert!(repo.find_post(&PostId::new("missing")).unwrap().is_none());
    }
}
