//! Report repository: persisted semen-analysis reports.
//!
//! Scores are write-once: there is deliberately no update function
//! here. A corrected report is inserted as a new row.

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{BiomarkerSet, NewReport, StoredReport};

const REPORT_COLUMNS: &str = "id, user_id, test_date, source_file, file_hash,
         concentration, total_motility, progressive_motility, morphology,
         volume, ph, dna_fragmentation, base_score, adjusted_score, created_at";

/// Inserts a new report row. Returns the generated UUID.
pub fn insert_report(conn: &Connection, report: &NewReport) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    let now = Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string();
    let b = &report.biomarkers;

    conn.execute(
        "INSERT INTO reports (id, user_id, test_date, source_file, file_hash,
         concentration, total_motility, progressive_motility, morphology,
         volume, ph, dna_fragmentation, base_score, adjusted_score, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            id.to_string(),
            report.user_id,
            report.test_date.to_string(),
            report.source_file,
            report.file_hash,
            b.concentration,
            b.total_motility,
            b.progressive_motility,
            b.morphology,
            b.volume,
            b.ph,
            b.dna_fragmentation,
            report.base_score as i64,
            report.adjusted_score as i64,
            now,
        ],
    )?;

    Ok(id)
}

/// All reports for a user, newest test date first.
pub fn list_reports(conn: &Connection, user_id: &str) -> Result<Vec<StoredReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports
         WHERE user_id = ?1 ORDER BY test_date DESC, created_at DESC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| Ok(report_row(row)))?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row??)?);
    }
    Ok(reports)
}

/// Single report by id, scoped to the owning user.
pub fn get_report(
    conn: &Connection,
    user_id: &str,
    report_id: &str,
) -> Result<StoredReport, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1 AND user_id = ?2"
    ))?;

    let row = stmt
        .query_row(params![report_id, user_id], |row| Ok(report_row(row)))
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Report".into(),
                id: report_id.into(),
            },
            other => other.into(),
        })?;
    report_from_row(row?)
}

/// Hard-deletes a report (recommendations cascade).
pub fn delete_report(
    conn: &Connection,
    user_id: &str,
    report_id: &str,
) -> Result<(), DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM reports WHERE id = ?1 AND user_id = ?2",
        params![report_id, user_id],
    )?;
    if deleted == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Report".into(),
            id: report_id.into(),
        });
    }
    Ok(())
}

/// Looks up an existing report with the same document hash.
pub fn find_by_hash(
    conn: &Connection,
    user_id: &str,
    file_hash: &str,
) -> Result<Option<Uuid>, DatabaseError> {
    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM reports WHERE user_id = ?1 AND file_hash = ?2",
            params![user_id, file_hash],
            |row| row.get(0),
        )
        .optional()?;
    id.map(|s| Uuid::parse_str(&s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string())))
        .transpose()
}

/// Most recent report for a user, if any.
pub fn latest_report(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<StoredReport>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REPORT_COLUMNS} FROM reports
         WHERE user_id = ?1 ORDER BY test_date DESC, created_at DESC LIMIT 1"
    ))?;

    let mut rows = stmt.query_map(params![user_id], |row| Ok(report_row(row)))?;
    match rows.next() {
        Some(row) => Ok(Some(report_from_row(row??)?)),
        None => Ok(None),
    }
}

/// Date of the user's first report, the start of the tracking window
/// for the consistency metric.
pub fn first_report_date(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<NaiveDate>, DatabaseError> {
    // MIN over an empty set still yields one row, with NULL.
    let date: Option<String> = conn.query_row(
        "SELECT MIN(test_date) FROM reports WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    date.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
    })
    .transpose()
}

pub fn count_reports(conn: &Connection, user_id: &str) -> Result<u32, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM reports WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count as u32)
}

struct ReportRow {
    id: String,
    user_id: String,
    test_date: String,
    source_file: String,
    file_hash: String,
    biomarkers: BiomarkerSet,
    base_score: i64,
    adjusted_score: i64,
    created_at: String,
}

fn report_row(row: &rusqlite::Row<'_>) -> Result<ReportRow, rusqlite::Error> {
    Ok(ReportRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        test_date: row.get(2)?,
        source_file: row.get(3)?,
        file_hash: row.get(4)?,
        biomarkers: BiomarkerSet {
            concentration: row.get(5)?,
            total_motility: row.get(6)?,
            progressive_motility: row.get(7)?,
            morphology: row.get(8)?,
            volume: row.get(9)?,
            ph: row.get(10)?,
            dna_fragmentation: row.get(11)?,
        },
        base_score: row.get(12)?,
        adjusted_score: row.get(13)?,
        created_at: row.get(14)?,
    })
}

fn report_from_row(row: ReportRow) -> Result<StoredReport, DatabaseError> {
    Ok(StoredReport {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: row.user_id,
        test_date: NaiveDate::parse_from_str(&row.test_date, "%Y-%m-%d")
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        source_file: row.source_file,
        file_hash: row.file_hash,
        biomarkers: row.biomarkers,
        base_score: row.base_score as u8,
        adjusted_score: row.adjusted_score as u8,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().expect("in-memory DB")
    }

    fn make_report(user_id: &str, test_date: &str, hash: &str) -> NewReport {
        NewReport {
            user_id: user_id.into(),
            test_date: NaiveDate::parse_from_str(test_date, "%Y-%m-%d").unwrap(),
            source_file: "lab_report.pdf".into(),
            file_hash: hash.into(),
            biomarkers: BiomarkerSet {
                concentration: Some(20.0),
                progressive_motility: Some(35.0),
                volume: Some(3.0),
                ..Default::default()
            },
            base_score: 100,
            adjusted_score: 100,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = test_db();
        let id = insert_report(&conn, &make_report("u1", "2026-02-01", "abc")).unwrap();

        let stored = get_report(&conn, "u1", &id.to_string()).unwrap();
        assert_eq!(stored.biomarkers.concentration, Some(20.0));
        assert!(stored.biomarkers.morphology.is_none());
        assert_eq!(stored.base_score, 100);
        assert_eq!(stored.file_hash, "abc");
    }

    #[test]
    fn get_scoped_to_user() {
        let conn = test_db();
        let id = insert_report(&conn, &make_report("u1", "2026-02-01", "abc")).unwrap();

        let other = get_report(&conn, "u2", &id.to_string());
        assert!(matches!(other, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn list_orders_newest_first() {
        let conn = test_db();
        insert_report(&conn, &make_report("u1", "2026-01-10", "a")).unwrap();
        insert_report(&conn, &make_report("u1", "2026-02-10", "b")).unwrap();
        insert_report(&conn, &make_report("u1", "2026-01-25", "c")).unwrap();

        let reports = list_reports(&conn, "u1").unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].test_date.to_string(), "2026-02-10");
        assert_eq!(reports[2].test_date.to_string(), "2026-01-10");
    }

    #[test]
    fn duplicate_hash_rejected_by_index() {
        let conn = test_db();
        insert_report(&conn, &make_report("u1", "2026-01-10", "samehash")).unwrap();
        let dup = insert_report(&conn, &make_report("u1", "2026-01-11", "samehash"));
        assert!(dup.is_err());
    }

    #[test]
    fn same_hash_different_user_allowed() {
        let conn = test_db();
        insert_report(&conn, &make_report("u1", "2026-01-10", "samehash")).unwrap();
        let other = insert_report(&conn, &make_report("u2", "2026-01-10", "samehash"));
        assert!(other.is_ok());
    }

    #[test]
    fn find_by_hash_hits_and_misses() {
        let conn = test_db();
        let id = insert_report(&conn, &make_report("u1", "2026-01-10", "abc")).unwrap();

        assert_eq!(find_by_hash(&conn, "u1", "abc").unwrap(), Some(id));
        assert_eq!(find_by_hash(&conn, "u1", "zzz").unwrap(), None);
        assert_eq!(find_by_hash(&conn, "u2", "abc").unwrap(), None);
    }

    #[test]
    fn latest_report_picks_newest() {
        let conn = test_db();
        assert!(latest_report(&conn, "u1").unwrap().is_none());

        insert_report(&conn, &make_report("u1", "2026-01-10", "a")).unwrap();
        insert_report(&conn, &make_report("u1", "2026-03-01", "b")).unwrap();

        let latest = latest_report(&conn, "u1").unwrap().unwrap();
        assert_eq!(latest.test_date.to_string(), "2026-03-01");
    }

    #[test]
    fn first_report_date_is_tracking_start() {
        let conn = test_db();
        assert!(first_report_date(&conn, "u1").unwrap().is_none());

        insert_report(&conn, &make_report("u1", "2026-02-10", "a")).unwrap();
        insert_report(&conn, &make_report("u1", "2026-01-05", "b")).unwrap();

        let first = first_report_date(&conn, "u1").unwrap().unwrap();
        assert_eq!(first.to_string(), "2026-01-05");
    }

    #[test]
    fn find_by_hash_surfaces_database_errors() {
        let conn = test_db();
        conn.execute_batch("DROP TABLE reports").unwrap();
        assert!(find_by_hash(&conn, "u1", "abc").is_err());
    }

    #[test]
    fn first_report_date_surfaces_database_errors() {
        let conn = test_db();
        conn.execute_batch("DROP TABLE reports").unwrap();
        assert!(first_report_date(&conn, "u1").is_err());
    }

    #[test]
    fn corrupt_row_is_a_constraint_violation() {
        let conn = test_db();
        conn.execute(
            "INSERT INTO reports (id, user_id, test_date, source_file, file_hash,
             base_score, adjusted_score, created_at)
             VALUES ('not-a-uuid', 'u1', '2026-01-10', 'f.pdf', 'h', 50, 50, 'now')",
            [],
        )
        .unwrap();

        let result = get_report(&conn, "u1", "not-a-uuid");
        assert!(matches!(result, Err(DatabaseError::ConstraintViolation(_))));
    }

    #[test]
    fn delete_nonexistent_returns_not_found() {
        let conn = test_db();
        let result = delete_report(&conn, "u1", "nonexistent-id");
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[test]
    fn delete_removes_row() {
        let conn = test_db();
        let id = insert_report(&conn, &make_report("u1", "2026-01-10", "a")).unwrap();
        delete_report(&conn, "u1", &id.to_string()).unwrap();
        assert_eq!(count_reports(&conn, "u1").unwrap(), 0);
    }
}
