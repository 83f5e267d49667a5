//! SQL schema for the Aula SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id    TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    full_name     TEXT,
    role          TEXT NOT NULL,    -- 'student' | 'teacher'
    avatar_url    TEXT,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    created_at    TEXT NOT NULL     -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash  TEXT PRIMARY KEY,   -- SHA-256 hex of the bearer token
    profile_id  TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS password_resets (
    token_hash  TEXT PRIMARY KEY,
    profile_id  TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS weeks (
    week_id        TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    description    TEXT,
    order_index    INTEGER NOT NULL,
    is_locked      INTEGER NOT NULL DEFAULT 0,
    available_from TEXT              -- ISO 8601 UTC or NULL
);

CREATE TABLE IF NOT EXISTS days (
    day_id      TEXT PRIMARY KEY,
    week_id     TEXT NOT NULL REFERENCES weeks(week_id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    description TEXT,
    order_index INTEGER NOT NULL,
    video_url   TEXT,
    rutube_url  TEXT,
    date        TEXT,                -- calendar date, YYYY-MM-DD
    homework    TEXT
);

-- A material references exactly one of a week or a day.
CREATE TABLE IF NOT EXISTS materials (
    material_id TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    kind        TEXT NOT NULL,       -- 'video'|'pdf'|'pptx'|'doc'|'link'|'zip'
    url         TEXT NOT NULL,
    week_id     TEXT REFERENCES weeks(week_id) ON DELETE CASCADE,
    day_id      TEXT REFERENCES days(day_id) ON DELETE CASCADE,
    is_homework INTEGER NOT NULL DEFAULT 0,
    CHECK ((week_id IS NULL) != (day_id IS NULL))
);

-- Completion is row existence, not a flag column.
CREATE TABLE IF NOT EXISTS user_progress (
    profile_id TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    day_id     TEXT NOT NULL REFERENCES days(day_id) ON DELETE CASCADE,
    PRIMARY KEY (profile_id, day_id)
);

CREATE TABLE IF NOT EXISTS live_streams (
    stream_id      TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    date           TEXT NOT NULL,
    video_url      TEXT,
    rutube_url     TEXT,
    description    TEXT,
    topics         TEXT,
    best_questions TEXT,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stream_comments (
    comment_id TEXT PRIMARY KEY,
    stream_id  TEXT NOT NULL REFERENCES live_streams(stream_id) ON DELETE CASCADE,
    author_id  TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    body       TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS library_items (
    item_id     TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    category    TEXT NOT NULL,       -- 'checklist'|'table'|'guide'|'pdf'
    file_url    TEXT NOT NULL,
    description TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS days_week_idx        ON days(week_id);
CREATE INDEX IF NOT EXISTS materials_week_idx   ON materials(week_id);
CREATE INDEX IF NOT EXISTS materials_day_idx    ON materials(day_id);
CREATE INDEX IF NOT EXISTS progress_profile_idx ON user_progress(profile_id);
CREATE INDEX IF NOT EXISTS comments_stream_idx  ON stream_comments(stream_id);
CREATE INDEX IF NOT EXISTS sessions_profile_idx ON sessions(profile_id);

PRAGMA user_version = 1;
";
