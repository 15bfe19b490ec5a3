//! End-to-end coverage of the HTTP surface over in-memory doubles.
//!
//! These tests exercise routing, extraction, validation, authorization,
//! and error mapping together; persistence behaviour itself is covered by
//! the adapters' own tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};

use backend::domain::cached_users::CachedUserReader;
use backend::domain::comment::{Comment, CommentWithAuthor, NewComment};
use backend::domain::credentials::hash_password;
use backend::domain::feed::{FeedItem, FeedQuery};
use backend::domain::ports::{
    CacheError, CommentRepository, ConflictRule, MailError, Mailer, PostRepository,
    RoleRepository, StoreError, TokenAuthenticator, TokenError, UserCache, UserRepository,
};
use backend::domain::post::{NewPost, Post, PostUpdate};
use backend::domain::registration::{RegistrationConfig, RegistrationService};
use backend::domain::role::{ROLE_ADMIN, ROLE_MODERATOR, ROLE_USER, Role};
use backend::domain::user::{NewUser, User};
use backend::domain::ports::InvitationEmail;
use backend::inbound::http;
use backend::inbound::http::state::HttpState;

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<HashMap<i64, User>>,
    invitations: Mutex<HashMap<String, i64>>,
    follows: Mutex<HashSet<(i64, i64)>>,
    next_id: AtomicI64,
}

impl InMemoryUsers {
    fn seed_active(&self, username: &str, email: &str, password: &str, role_id: i64) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: hash_password(password).expect("hash"),
            is_active: true,
            role_id,
            created_at: Utc::now(),
        };
        self.users.lock().expect("lock").insert(id, user);
        id
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_with_invitation(
        &self,
        user: &NewUser,
        token_hash: &str,
        _ttl: Duration,
    ) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("lock");
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(ConflictRule::DuplicateEmail));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(ConflictRule::DuplicateUsername));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = User {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_active: false,
            role_id: user.role_id,
            created_at: Utc::now(),
        };
        users.insert(id, created.clone());
        self.invitations
            .lock()
            .expect("lock")
            .insert(token_hash.to_owned(), id);
        Ok(created)
    }

    async fn activate(&self, token_hash: &str) -> Result<(), StoreError> {
        let id = self
            .invitations
            .lock()
            .expect("lock")
            .remove(token_hash)
            .ok_or(StoreError::NotFound)?;
        match self.users.lock().expect("lock").get_mut(&id) {
            Some(user) => {
                user.is_active = true;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.users
            .lock()
            .expect("lock")
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.users
            .lock()
            .expect("lock")
            .get(&id)
            .filter(|u| u.is_active)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .lock()
            .expect("lock")
            .values()
            .find(|u| u.email == email && u.is_active)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn follow(&self, user_id: i64, follower_id: i64) -> Result<(), StoreError> {
        if !self.follows.lock().expect("lock").insert((user_id, follower_id)) {
            return Err(StoreError::Conflict(ConflictRule::DuplicateFollow));
        }
        Ok(())
    }

    async fn unfollow(&self, user_id: i64, follower_id: i64) -> Result<(), StoreError> {
        if self.follows.lock().expect("lock").remove(&(user_id, follower_id)) {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

#[derive(Default)]
struct InMemoryPosts {
    posts: Mutex<HashMap<i64, Post>>,
    next_id: AtomicI64,
}

#[async_trait]
impl PostRepository for InMemoryPosts {
    async fn create(&self, post: &NewPost) -> Result<Post, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let created = Post {
            id,
            user_id: post.user_id,
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().expect("lock").insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Post, StoreError> {
        self.posts
            .lock()
            .expect("lock")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, update: &PostUpdate) -> Result<Post, StoreError> {
        let mut posts = self.posts.lock().expect("lock");
        let post = posts.get_mut(&update.id).ok_or(StoreError::NotFound)?;
        if post.version != update.expected_version {
            return Err(StoreError::Conflict(ConflictRule::VersionMismatch));
        }
        post.title = update.title.clone();
        post.content = update.content.clone();
        post.tags = update.tags.clone();
        post.version += 1;
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.posts
            .lock()
            .expect("lock")
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.lock().expect("lock");
        let mut all: Vec<Post> = posts.values().cloned().collect();
        all.sort_by_key(|post| std::cmp::Reverse(post.id));
        Ok(all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn feed(&self, user_id: i64, query: &FeedQuery) -> Result<Vec<FeedItem>, StoreError> {
        let posts = self.posts.lock().expect("lock");
        let mut items: Vec<FeedItem> = posts
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| FeedItem {
                id: p.id,
                user_id: p.user_id,
                author: "author".into(),
                title: p.title.clone(),
                content: p.content.clone(),
                tags: p.tags.clone(),
                version: p.version,
                created_at: p.created_at,
                comment_count: 0,
            })
            .collect();
        items.sort_by_key(|item| std::cmp::Reverse(item.created_at));
        items.truncate(usize::try_from(query.limit).unwrap_or(usize::MAX));
        Ok(items)
    }
}

#[derive(Default)]
struct InMemoryComments {
    comments: Mutex<Vec<CommentWithAuthor>>,
    next_id: AtomicI64,
}

#[async_trait]
impl CommentRepository for InMemoryComments {
    async fn create(&self, comment: &NewComment) -> Result<Comment, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let created = Comment {
            id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content.clone(),
            created_at: Utc::now(),
        };
        self.comments.lock().expect("lock").push(CommentWithAuthor {
            comment: created.clone(),
            author: "author".into(),
        });
        Ok(created)
    }

    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, StoreError> {
        Ok(self
            .comments
            .lock()
            .expect("lock")
            .iter()
            .filter(|c| c.comment.post_id == post_id)
            .cloned()
            .collect())
    }
}

struct FixedRoles;

const USER_ROLE_ID: i64 = 1;
const MODERATOR_ROLE_ID: i64 = 2;
const ADMIN_ROLE_ID: i64 = 3;

fn role(id: i64, name: &str, level: i32) -> Role {
    Role {
        id,
        name: name.into(),
        level,
        description: String::new(),
    }
}

#[async_trait]
impl RoleRepository for FixedRoles {
    async fn find_by_name(&self, name: &str) -> Result<Role, StoreError> {
        match name {
            ROLE_USER => Ok(role(USER_ROLE_ID, ROLE_USER, 1)),
            ROLE_MODERATOR => Ok(role(MODERATOR_ROLE_ID, ROLE_MODERATOR, 2)),
            ROLE_ADMIN => Ok(role(ADMIN_ROLE_ID, ROLE_ADMIN, 3)),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Role, StoreError> {
        match id {
            USER_ROLE_ID => Ok(role(id, ROLE_USER, 1)),
            MODERATOR_ROLE_ID => Ok(role(id, ROLE_MODERATOR, 2)),
            ADMIN_ROLE_ID => Ok(role(id, ROLE_ADMIN, 3)),
            _ => Err(StoreError::NotFound),
        }
    }
}

/// Cache double that always misses, keeping reads on the repository.
struct MissingCache;

#[async_trait]
impl UserCache for MissingCache {
    async fn get(&self, _id: i64) -> Result<Option<User>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _user: &User) -> Result<(), CacheError> {
        Ok(())
    }
}

struct RecordingMailer;

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_invitation(&self, _invitation: &InvitationEmail) -> Result<(), MailError> {
        Ok(())
    }
}

/// Trivially reversible tokens, standing in for the JWT adapter.
struct PlainTokens;

impl TokenAuthenticator for PlainTokens {
    fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        Ok(format!("token-{user_id}"))
    }

    fn validate(&self, token: &str) -> Result<i64, TokenError> {
        token
            .strip_prefix("token-")
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| TokenError::invalid("unknown token"))
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    state: HttpState,
    users: Arc<InMemoryUsers>,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUsers::default());
    let roles = Arc::new(FixedRoles);
    let registration = RegistrationService::new(
        users.clone(),
        roles.clone(),
        Arc::new(RecordingMailer),
        RegistrationConfig {
            invitation_ttl: Duration::from_secs(3600),
            activation_base_url: "https://app.example.com".into(),
        },
    );

    let state = HttpState {
        registration,
        user_reader: CachedUserReader::new(users.clone(), Arc::new(MissingCache)),
        users: users.clone(),
        posts: Arc::new(InMemoryPosts::default()),
        comments: Arc::new(InMemoryComments::default()),
        roles,
        tokens: Arc::new(PlainTokens),
    };

    Harness { state, users }
}

fn bearer(user_id: i64) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer token-{user_id}"))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(http::configure),
        )
        .await
    };
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn registration_returns_created_account_and_activation_token() {
    let h = harness();
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/v1/authentication/user")
        .set_json(json!({
            "username": "frodo",
            "email": "frodo@example.com",
            "password": "secret"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 201);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["user"]["username"], "frodo");
    assert!(body["user"].get("password_hash").is_none());
    assert!(!body["token"].as_str().expect("token").is_empty());
}

#[actix_web::test]
async fn duplicate_email_registration_conflicts() {
    let h = harness();
    let app = app!(h.state);

    for expected_status in [201_u16, 409] {
        let req = test::TestRequest::post()
            .uri("/v1/authentication/user")
            .set_json(json!({
                "username": format!("frodo-{expected_status}"),
                "email": "frodo@example.com",
                "password": "secret"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), expected_status);
    }
}

#[actix_web::test]
async fn accounts_are_invisible_until_activated() {
    let h = harness();
    let app = app!(h.state);
    let viewer = h.users.seed_active("viewer", "viewer@example.com", "pw", USER_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/authentication/user")
        .set_json(json!({
            "username": "frodo",
            "email": "frodo@example.com",
            "password": "secret"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let new_id = body["user"]["id"].as_i64().expect("id");
    let token = body["token"].as_str().expect("token").to_owned();

    let req = test::TestRequest::get()
        .uri(&format!("/v1/users/{new_id}"))
        .insert_header(bearer(viewer))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);

    let req = test::TestRequest::put()
        .uri(&format!("/v1/users/activate/{token}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/users/{new_id}"))
        .insert_header(bearer(viewer))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
}

#[actix_web::test]
async fn unknown_activation_token_is_not_found() {
    let h = harness();
    let app = app!(h.state);

    let req = test::TestRequest::put()
        .uri("/v1/users/activate/not-a-real-token")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn token_issuance_requires_matching_credentials() {
    let h = harness();
    let app = app!(h.state);
    h.users.seed_active("frodo", "frodo@example.com", "secret", USER_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/authentication/token")
        .set_json(json!({ "email": "frodo@example.com", "password": "secret" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status().as_u16(), 201);
    let body: Value = test::read_body_json(res).await;
    assert!(body["token"].as_str().expect("token").starts_with("token-"));

    let req = test::TestRequest::post()
        .uri("/v1/authentication/token")
        .set_json(json!({ "email": "frodo@example.com", "password": "wrong" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri("/v1/authentication/token")
        .set_json(json!({ "email": "nobody@example.com", "password": "secret" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);
}

#[actix_web::test]
async fn protected_routes_reject_missing_or_garbage_tokens() {
    let h = harness();
    let app = app!(h.state);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .set_json(json!({ "title": "t", "content": "c" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header((AUTHORIZATION, "Bearer nonsense"))
        .set_json(json!({ "title": "t", "content": "c" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 401);
}

#[actix_web::test]
async fn stale_version_update_conflicts_without_side_effects() {
    let h = harness();
    let app = app!(h.state);
    let author = h.users.seed_active("author", "author@example.com", "pw", USER_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header(bearer(author))
        .set_json(json!({ "title": "first", "content": "body", "tags": ["rust"] }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = created["id"].as_i64().expect("id");
    assert_eq!(created["version"], 1);

    // First edit advances the version.
    let req = test::TestRequest::patch()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(author))
        .set_json(json!({ "title": "second", "version": 1 }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["version"], 2);

    // Replaying the old version must conflict.
    let req = test::TestRequest::patch()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(author))
        .set_json(json!({ "title": "third", "version": 1 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 409);

    // The conflicting write changed nothing.
    let req = test::TestRequest::get()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(author))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "second");
    assert_eq!(fetched["version"], 2);
}

#[actix_web::test]
async fn update_requires_ownership_or_moderator() {
    let h = harness();
    let app = app!(h.state);
    let author = h.users.seed_active("author", "author@example.com", "pw", USER_ROLE_ID);
    let other = h.users.seed_active("other", "other@example.com", "pw", USER_ROLE_ID);
    let moderator = h
        .users
        .seed_active("mod", "mod@example.com", "pw", MODERATOR_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header(bearer(author))
        .set_json(json!({ "title": "first", "content": "body" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = created["id"].as_i64().expect("id");

    let req = test::TestRequest::patch()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(other))
        .set_json(json!({ "title": "hijacked", "version": 1 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 403);

    let req = test::TestRequest::patch()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(moderator))
        .set_json(json!({ "title": "moderated", "version": 1 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 200);
}

#[actix_web::test]
async fn delete_requires_ownership_or_admin() {
    let h = harness();
    let app = app!(h.state);
    let author = h.users.seed_active("author", "author@example.com", "pw", USER_ROLE_ID);
    let moderator = h
        .users
        .seed_active("mod", "mod@example.com", "pw", MODERATOR_ROLE_ID);
    let admin = h.users.seed_active("admin", "admin@example.com", "pw", ADMIN_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header(bearer(author))
        .set_json(json!({ "title": "first", "content": "body" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = created["id"].as_i64().expect("id");

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(moderator))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);
}

#[actix_web::test]
async fn posts_are_returned_with_their_comments() {
    let h = harness();
    let app = app!(h.state);
    let author = h.users.seed_active("author", "author@example.com", "pw", USER_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header(bearer(author))
        .set_json(json!({ "title": "first", "content": "body" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = created["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri(&format!("/v1/posts/{post_id}/comments"))
        .insert_header(bearer(author))
        .set_json(json!({ "content": "nice one" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);

    let req = test::TestRequest::get()
        .uri(&format!("/v1/posts/{post_id}"))
        .insert_header(bearer(author))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(detail["comments"].as_array().expect("comments").len(), 1);
    assert_eq!(detail["comments"][0]["content"], "nice one");

    let req = test::TestRequest::get()
        .uri(&format!("/v1/posts/{post_id}/comments"))
        .insert_header(bearer(author))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().expect("comments").len(), 1);

    let req = test::TestRequest::get()
        .uri("/v1/posts/999/comments")
        .insert_header(bearer(author))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn feed_rejects_malformed_queries() {
    let h = harness();
    let app = app!(h.state);
    let viewer = h.users.seed_active("viewer", "viewer@example.com", "pw", USER_ROLE_ID);

    for uri in [
        "/v1/users/feed?sort=sideways",
        "/v1/users/feed?limit=0",
        "/v1/users/feed?limit=500",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(viewer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
    }
}

#[actix_web::test]
async fn feed_returns_the_viewers_page() {
    let h = harness();
    let app = app!(h.state);
    let viewer = h.users.seed_active("viewer", "viewer@example.com", "pw", USER_ROLE_ID);

    for n in 0..3 {
        let req = test::TestRequest::post()
            .uri("/v1/posts")
            .insert_header(bearer(viewer))
            .set_json(json!({ "title": format!("post {n}"), "content": "body" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/v1/users/feed?limit=2")
        .insert_header(bearer(viewer))
        .to_request();
    let items: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().expect("items").len(), 2);
}

#[actix_web::test]
async fn posts_listing_pages_newest_first() {
    let h = harness();
    let app = app!(h.state);
    let author = h.users.seed_active("author", "author@example.com", "pw", USER_ROLE_ID);

    for n in 0..3 {
        let req = test::TestRequest::post()
            .uri("/v1/posts")
            .insert_header(bearer(author))
            .set_json(json!({ "title": format!("post {n}"), "content": "body" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/v1/posts?limit=2")
        .insert_header(bearer(author))
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let listed = listed.as_array().expect("posts");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["title"], "post 2");

    let req = test::TestRequest::get()
        .uri("/v1/posts?limit=0")
        .insert_header(bearer(author))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}

#[actix_web::test]
async fn follow_edges_are_unique_and_removable() {
    let h = harness();
    let app = app!(h.state);
    let target = h.users.seed_active("target", "target@example.com", "pw", USER_ROLE_ID);
    let follower = h
        .users
        .seed_active("follower", "follower@example.com", "pw", USER_ROLE_ID);

    let follow_uri = format!("/v1/users/{target}/follow");
    let req = test::TestRequest::put()
        .uri(&follow_uri)
        .insert_header(bearer(follower))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    let req = test::TestRequest::put()
        .uri(&follow_uri)
        .insert_header(bearer(follower))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 409);

    let unfollow_uri = format!("/v1/users/{target}/unfollow");
    let req = test::TestRequest::put()
        .uri(&unfollow_uri)
        .insert_header(bearer(follower))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 204);

    let req = test::TestRequest::put()
        .uri(&unfollow_uri)
        .insert_header(bearer(follower))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn oversized_payloads_are_rejected_before_any_write() {
    let h = harness();
    let app = app!(h.state);
    let author = h.users.seed_active("author", "author@example.com", "pw", USER_ROLE_ID);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header(bearer(author))
        .set_json(json!({
            "title": "x".repeat(101),
            "content": "body"
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri("/v1/posts")
        .insert_header(bearer(author))
        .set_json(json!({
            "title": "ok",
            "content": "body",
            "tags": ["a", "b", "c", "d", "e", "f"]
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}
