//! Table definitions.
//!
//! Each analysis is stored as its JSON document alongside the columns we
//! sort or filter on. `predicted_at` is microseconds since the Unix epoch.

pub(crate) const CREATE_ANALYSES: &str = r#"
    CREATE TABLE IF NOT EXISTS analyses (
        seq          INTEGER PRIMARY KEY AUTOINCREMENT,
        id           TEXT NOT NULL UNIQUE,
        drug_name    TEXT NOT NULL,
        cid          TEXT NOT NULL,
        document     TEXT NOT NULL,
        predicted_at INTEGER NOT NULL
    )
"#;

pub(crate) const CREATE_ANALYSES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_analyses_predicted_at ON analyses (predicted_at DESC, seq DESC)";
