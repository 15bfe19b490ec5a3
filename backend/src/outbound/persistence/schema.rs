//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions are the source of truth for query generation and must
//! match the deployed schema exactly. Constraint names matter: unique
//! violations are classified by them in `error_mapping`.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique
    /// constraints (`users_username_key`, `users_email_key`).
    users (id) {
        /// Primary key.
        id -> BigInt,
        /// Unique display handle.
        username -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        /// Argon2 digest; never leaves the persistence layer unredacted.
        password_hash -> Varchar,
        /// Accounts stay invisible to reads until activated.
        is_active -> Bool,
        /// Reference into `roles`.
        role_id -> BigInt,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One-time activation invitations. Only the SHA-256 hex digest of the
    /// token is stored; `user_id` is unique so each account has at most
    /// one unconsumed invitation.
    invitations (token_hash) {
        /// Primary key: hex digest of the one-time token.
        token_hash -> Varchar,
        /// Owning account (unique).
        user_id -> BigInt,
        /// Redemption deadline.
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published posts with a monotonically increasing version stamp.
    posts (id) {
        /// Primary key.
        id -> BigInt,
        /// Owning account.
        user_id -> BigInt,
        /// Post title.
        title -> Varchar,
        /// Post body.
        content -> Text,
        /// Unordered tag set.
        tags -> Array<Text>,
        /// Optimistic concurrency stamp; incremented by exactly 1 per update.
        version -> Integer,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Timestamp of the last successful update.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Comments attached to posts.
    comments (id) {
        /// Primary key.
        id -> BigInt,
        /// Post the comment belongs to.
        post_id -> BigInt,
        /// Authoring account.
        user_id -> BigInt,
        /// Comment body.
        content -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follow edges. The composite primary key (`followers_pkey`) forbids
    /// duplicate edges; self-follows are not structurally prevented.
    followers (user_id, follower_id) {
        /// The account being followed.
        user_id -> BigInt,
        /// The following account.
        follower_id -> BigInt,
        /// Edge creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Read-only role reference data.
    roles (id) {
        /// Primary key.
        id -> BigInt,
        /// Unique role name.
        name -> Varchar,
        /// Numeric privilege level.
        level -> Integer,
        /// Human-readable description.
        description -> Text,
    }
}

diesel::joinable!(comments -> users (user_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(posts -> users (user_id));
diesel::joinable!(invitations -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, invitations, posts, comments, followers, roles);
