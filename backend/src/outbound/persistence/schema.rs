//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// User accounts with cached follow counters.
    users (id) {
        id -> Uuid,
        /// Human-readable display name (max 32 characters).
        display_name -> Varchar,
        /// Cached count of inbound follows; `CHECK (follower_count >= 0)`.
        follower_count -> Int4,
        /// Cached count of outbound follows; `CHECK (following_count >= 0)`.
        following_count -> Int4,
        created_at -> Timestamptz,
        /// Auto-updated by trigger.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges, keyed by `(follower_id, following_id)`.
    follows (follower_id, following_id) {
        follower_id -> Uuid,
        following_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(follows -> users (following_id));

diesel::allow_tables_to_appear_in_same_query!(follows, users);
