//! SQL schema for the Hive SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id      TEXT PRIMARY KEY,
    subject      TEXT NOT NULL UNIQUE,   -- external auth subject
    email        TEXT UNIQUE,            -- NULLs do not collide
    display_name TEXT NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

-- vote_count and answer_count are projections; only the store writes them.
CREATE TABLE IF NOT EXISTS questions (
    question_id     TEXT PRIMARY KEY,
    title           TEXT NOT NULL,
    body            TEXT NOT NULL,
    tags            TEXT NOT NULL,       -- JSON array, author order
    author_id       TEXT NOT NULL REFERENCES users(user_id),
    author_subject  TEXT NOT NULL,
    author_name     TEXT NOT NULL,
    vote_count      INTEGER NOT NULL DEFAULT 0,
    answer_count    INTEGER NOT NULL DEFAULT 0 CHECK (answer_count >= 0),
    ai_draft_answer TEXT,
    created_at      TEXT NOT NULL,       -- fixed-width RFC 3339, sorts lexically
    updated_at      TEXT NOT NULL
);

-- One row per (question, tag); the primary key caps each question's
-- contribution to a tag's count at one.
CREATE TABLE IF NOT EXISTS question_tags (
    question_id TEXT NOT NULL REFERENCES questions(question_id) ON DELETE CASCADE,
    tag         TEXT NOT NULL,
    PRIMARY KEY (question_id, tag)
);

CREATE TABLE IF NOT EXISTS answers (
    answer_id      TEXT PRIMARY KEY,
    question_id    TEXT NOT NULL REFERENCES questions(question_id),
    body           TEXT NOT NULL,
    author_id      TEXT NOT NULL REFERENCES users(user_id),
    author_subject TEXT NOT NULL,
    author_name    TEXT NOT NULL,
    vote_count     INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

-- The ledger. At most one live vote per voter per target.
CREATE TABLE IF NOT EXISTS votes (
    vote_id       TEXT PRIMARY KEY,
    target_type   TEXT NOT NULL CHECK (target_type IN ('question', 'answer')),
    target_id     TEXT NOT NULL,
    voter_subject TEXT NOT NULL,
    value         INTEGER NOT NULL CHECK (value IN (1, -1)),
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    UNIQUE (target_type, target_id, voter_subject)
);

CREATE INDEX IF NOT EXISTS questions_created_idx ON questions(created_at);
CREATE INDEX IF NOT EXISTS questions_votes_idx   ON questions(vote_count, created_at);
CREATE INDEX IF NOT EXISTS questions_answers_idx ON questions(answer_count, created_at);
CREATE INDEX IF NOT EXISTS question_tags_tag_idx ON question_tags(tag);
CREATE INDEX IF NOT EXISTS answers_question_idx  ON answers(question_id, vote_count);
CREATE INDEX IF NOT EXISTS votes_voter_idx       ON votes(voter_subject, target_type);

PRAGMA user_version = 1;
";
