use std::path::Path;

use rusqlite::Connection;

use super::DatabaseError;

const MIGRATION_V1: &str = "\
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

CREATE TABLE reports (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    test_date TEXT NOT NULL,
    source_file TEXT NOT NULL,
    concentration REAL,
    total_motility REAL,
    progressive_motility REAL,
    morphology REAL,
    volume REAL,
    ph REAL,
    dna_fragmentation REAL,
    base_score INTEGER NOT NULL CHECK (base_score BETWEEN 0 AND 100),
    adjusted_score INTEGER NOT NULL CHECK (adjusted_score BETWEEN 0 AND 100),
    created_at TEXT NOT NULL
);
CREATE INDEX idx_reports_user_date ON reports(user_id, test_date DESC);

CREATE TABLE daily_logs (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    log_date TEXT NOT NULL,
    shape TEXT NOT NULL CHECK (shape IN ('rated', 'checklist')),
    diet_quality TEXT,
    sleep_quality TEXT,
    stress_level TEXT,
    exercise_minutes INTEGER,
    electrolytes INTEGER,
    masturbation_count INTEGER,
    healthy_eating INTEGER,
    no_smoking INTEGER,
    no_alcohol INTEGER,
    exercised INTEGER,
    good_sleep INTEGER,
    loose_underwear INTEGER,
    daily_points INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
CREATE INDEX idx_daily_logs_user_date ON daily_logs(user_id, log_date DESC);

CREATE TABLE recommendations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    report_id TEXT REFERENCES reports(id) ON DELETE CASCADE,
    rank INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    priority TEXT NOT NULL,
    reasoning TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX idx_recommendations_report ON recommendations(report_id);

INSERT INTO schema_version (version) VALUES (1);
";

// Duplicate-upload detection: same file, same user → reject.
const MIGRATION_V2: &str = "\
ALTER TABLE reports ADD COLUMN file_hash TEXT NOT NULL DEFAULT '';
CREATE UNIQUE INDEX idx_reports_user_hash
    ON reports(user_id, file_hash) WHERE file_hash <> '';

INSERT INTO schema_version (version) VALUES (2);
";

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(1, MIGRATION_V1), (2, MIGRATION_V2)];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| DatabaseError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        // reports + daily_logs + recommendations + schema_version
        assert_eq!(count, 4);
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 2);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        // Running migrations again should not error
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn score_range_check_enforced() {
        let conn = open_memory_database().unwrap();
        let result = conn.execute(
            "INSERT INTO reports (id, user_id, test_date, source_file, base_score, adjusted_score, created_at)
             VALUES ('r1', 'u1', '2026-01-01', 'report.pdf', 140, 50, '2026-01-01')",
            [],
        );
        assert!(result.is_err());
    }
}
