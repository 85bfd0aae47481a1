//! In-memory repositories for use case tests.

use std::sync::Mutex;

use chrono::Utc;
use murmur_domain::id::{MicropostId, UserId};
use murmur_domain::pagination::PageRequest;

use crate::domain::repository::{MicropostRepository, RelationshipRepository, UserRepository};
use crate::domain::types::{FollowCounts, Micropost, Rule, User, ValidationErrors};
use crate::error::SocialServiceError;
use crate::usecase::credential::set_password;

/// A non-admin user whose password is `foobar`.
pub fn test_user(email: &str) -> User {
    let now = Utc::now();
    let mut user = User {
        id: UserId::generate(),
        name: "Example User".into(),
        email: email.into(),
        password: None,
        admin: false,
        created_at: now,
        updated_at: now,
    };
    set_password(&mut user, "foobar");
    user
}

pub fn test_admin(email: &str) -> User {
    User {
        admin: true,
        ..test_user(email)
    }
}

pub fn test_post(author: &User, content: &str) -> Micropost {
    let now = Utc::now();
    Micropost {
        id: MicropostId::generate(),
        user_id: author.id,
        content: content.into(),
        created_at: now,
        updated_at: now,
    }
}

fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect()
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockUserRepo {
    pub users: Mutex<Vec<User>>,
    pub destroyed: Mutex<Vec<UserId>>,
}

impl MockUserRepo {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn get(&self, id: UserId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, SocialServiceError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, SocialServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, SocialServiceError> {
        Ok(paginate(&self.users.lock().unwrap(), page))
    }

    async fn create(&self, user: &User) -> Result<(), SocialServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(ValidationErrors::single("email", Rule::Taken).into());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), SocialServiceError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email && u.id != user.id) {
            return Err(ValidationErrors::single("email", Rule::Taken).into());
        }
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(SocialServiceError::UserNotFound),
        }
    }

    async fn destroy_cascade(&self, id: UserId) -> Result<bool, SocialServiceError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        let removed = users.len() != before;
        if removed {
            self.destroyed.lock().unwrap().push(id);
        }
        Ok(removed)
    }
}

// ── Relationships ────────────────────────────────────────────────────────────

/// Edges in insertion order. Listing resolves users through `users`.
#[derive(Default)]
pub struct MockRelationshipRepo {
    pub edges: Mutex<Vec<(UserId, UserId)>>,
    pub users: Vec<User>,
}

impl MockRelationshipRepo {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users.into_iter().collect(),
            ..Default::default()
        }
    }

    fn resolve(&self, ids: Vec<UserId>, page: PageRequest) -> Vec<User> {
        let users: Vec<User> = ids
            .into_iter()
            .filter_map(|id| self.users.iter().find(|u| u.id == id).cloned())
            .collect();
        paginate(&users, page)
    }
}

impl RelationshipRepository for MockRelationshipRepo {
    async fn follow(&self, follower: UserId, followed: UserId) -> Result<bool, SocialServiceError> {
        let mut edges = self.edges.lock().unwrap();
        if edges.contains(&(follower, followed)) {
            return Ok(false);
        }
        edges.push((follower, followed));
        Ok(true)
    }

    async fn unfollow(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError> {
        let mut edges = self.edges.lock().unwrap();
        let before = edges.len();
        edges.retain(|e| *e != (follower, followed));
        Ok(edges.len() != before)
    }

    async fn is_following(
        &self,
        follower: UserId,
        followed: UserId,
    ) -> Result<bool, SocialServiceError> {
        Ok(self.edges.lock().unwrap().contains(&(follower, followed)))
    }

    async fn following(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError> {
        let ids = self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(from, _)| *from == user)
            .map(|(_, to)| *to)
            .collect();
        Ok(self.resolve(ids, page))
    }

    async fn followers(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<User>, SocialServiceError> {
        let ids = self
            .edges
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, to)| *to == user)
            .map(|(from, _)| *from)
            .collect();
        Ok(self.resolve(ids, page))
    }

    async fn counts(&self, user: UserId) -> Result<FollowCounts, SocialServiceError> {
        let edges = self.edges.lock().unwrap();
        Ok(FollowCounts {
            following: edges.iter().filter(|(from, _)| *from == user).count() as u64,
            followers: edges.iter().filter(|(_, to)| *to == user).count() as u64,
        })
    }
}

// ── Microposts ───────────────────────────────────────────────────────────────

/// Posts plus a fixed follow list used by the feed query.
#[derive(Default)]
pub struct MockMicropostRepo {
    pub posts: Mutex<Vec<Micropost>>,
    pub follows: Vec<(UserId, UserId)>,
}

impl MockMicropostRepo {
    pub fn with_posts(posts: impl IntoIterator<Item = Micropost>) -> Self {
        Self {
            posts: Mutex::new(posts.into_iter().collect()),
            ..Default::default()
        }
    }

    fn newest_first(&self, keep: impl Fn(&Micropost) -> bool, page: PageRequest) -> Vec<Micropost> {
        let mut posts: Vec<Micropost> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        paginate(&posts, page)
    }
}

impl MicropostRepository for MockMicropostRepo {
    async fn create(&self, post: &Micropost) -> Result<(), SocialServiceError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MicropostId) -> Result<Option<Micropost>, SocialServiceError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn delete(&self, id: MicropostId) -> Result<bool, SocialServiceError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }

    async fn list_by_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError> {
        Ok(self.newest_first(|p| p.user_id == user, page))
    }

    async fn feed(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<Micropost>, SocialServiceError> {
        let followed: Vec<UserId> = self
            .follows
            .iter()
            .filter(|(from, _)| *from == user)
            .map(|(_, to)| *to)
            .collect();
        Ok(self.newest_first(
            |p| p.user_id == user || followed.contains(&p.user_id),
            page,
        ))
    }
}
