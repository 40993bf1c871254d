//! Recommendation repository: ranked lists attached to reports.

use std::str::FromStr;

use chrono::Local;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{RecommendationCategory, RecommendationPriority};
use crate::models::{Recommendation, RecommendationDraft};

/// Replaces the stored recommendation list for a report with freshly
/// ranked drafts. Runs in a transaction so a refresh never leaves a
/// half-written list.
pub fn replace_for_report(
    conn: &mut Connection,
    user_id: &str,
    report_id: &Uuid,
    drafts: &[RecommendationDraft],
) -> Result<Vec<Recommendation>, DatabaseError> {
    let now = Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string();
    let tx = conn.transaction()?;

    tx.execute(
        "DELETE FROM recommendations WHERE report_id = ?1 AND user_id = ?2",
        params![report_id.to_string(), user_id],
    )?;

    let mut stored = Vec::with_capacity(drafts.len());
    for (i, draft) in drafts.iter().enumerate() {
        let rank = (i + 1) as u32;
        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO recommendations (id, user_id, report_id, rank, title,
             description, category, priority, reasoning, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id.to_string(),
                user_id,
                report_id.to_string(),
                rank,
                draft.title,
                draft.description,
                draft.category.as_str(),
                draft.priority.as_str(),
                draft.reasoning,
                now,
            ],
        )?;
        stored.push(Recommendation {
            id,
            user_id: user_id.to_string(),
            report_id: Some(*report_id),
            rank,
            title: draft.title.clone(),
            description: draft.description.clone(),
            category: draft.category,
            priority: draft.priority,
            reasoning: draft.reasoning.clone(),
            created_at: now.clone(),
        });
    }

    tx.commit()?;
    Ok(stored)
}

/// Ranked recommendations for a report.
pub fn list_for_report(
    conn: &Connection,
    user_id: &str,
    report_id: &Uuid,
) -> Result<Vec<Recommendation>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, report_id, rank, title, description, category,
                priority, reasoning, created_at
         FROM recommendations
         WHERE report_id = ?1 AND user_id = ?2
         ORDER BY rank ASC",
    )?;

    let rows = stmt.query_map(params![report_id.to_string(), user_id], |row| {
        let id: String = row.get(0)?;
        let report_id: Option<String> = row.get(2)?;
        let category: String = row.get(6)?;
        let priority: String = row.get(7)?;
        Ok((
            id,
            row.get::<_, String>(1)?,
            report_id,
            row.get::<_, u32>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
            category,
            priority,
            row.get::<_, String>(8)?,
            row.get::<_, String>(9)?,
        ))
    })?;

    let mut recs = Vec::new();
    for row in rows {
        let (id, user_id, report_id, rank, title, description, category, priority, reasoning, created_at) =
            row?;
        recs.push(Recommendation {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            user_id,
            report_id: report_id.and_then(|s| Uuid::parse_str(&s).ok()),
            rank,
            title,
            description,
            category: RecommendationCategory::from_str(&category)?,
            priority: RecommendationPriority::from_str(&priority)?,
            reasoning,
            created_at,
        });
    }
    Ok(recs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::report::insert_report;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{BiomarkerSet, NewReport};
    use chrono::NaiveDate;

    fn seed_report(conn: &Connection, user_id: &str) -> Uuid {
        insert_report(
            conn,
            &NewReport {
                user_id: user_id.into(),
                test_date: NaiveDate::parse_from_str("2026-02-01", "%Y-%m-%d").unwrap(),
                source_file: "lab.pdf".into(),
                file_hash: format!("hash-{user_id}"),
                biomarkers: BiomarkerSet::default(),
                base_score: 0,
                adjusted_score: 0,
            },
        )
        .unwrap()
    }

    fn drafts(n: usize) -> Vec<RecommendationDraft> {
        (0..n)
            .map(|i| RecommendationDraft {
                title: format!("Recommendation {i}"),
                description: "Do the thing.".into(),
                category: RecommendationCategory::Diet,
                priority: RecommendationPriority::Medium,
                reasoning: "Because.".into(),
            })
            .collect()
    }

    #[test]
    fn replace_assigns_ranks_in_order() {
        let mut conn = open_memory_database().unwrap();
        let report_id = seed_report(&conn, "u1");

        let stored = replace_for_report(&mut conn, "u1", &report_id, &drafts(4)).unwrap();
        assert_eq!(stored.len(), 4);
        assert_eq!(stored[0].rank, 1);
        assert_eq!(stored[3].rank, 4);

        let listed = list_for_report(&conn, "u1", &report_id).unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[0].title, "Recommendation 0");
    }

    #[test]
    fn replace_discards_previous_list() {
        let mut conn = open_memory_database().unwrap();
        let report_id = seed_report(&conn, "u1");

        replace_for_report(&mut conn, "u1", &report_id, &drafts(5)).unwrap();
        replace_for_report(&mut conn, "u1", &report_id, &drafts(3)).unwrap();

        let listed = list_for_report(&conn, "u1", &report_id).unwrap();
        assert_eq!(listed.len(), 3);
    }

    #[test]
    fn list_scoped_to_user() {
        let mut conn = open_memory_database().unwrap();
        let report_id = seed_report(&conn, "u1");
        replace_for_report(&mut conn, "u1", &report_id, &drafts(3)).unwrap();

        assert!(list_for_report(&conn, "u2", &report_id).unwrap().is_empty());
    }

    #[test]
    fn deleting_report_cascades() {
        let mut conn = open_memory_database().unwrap();
        let report_id = seed_report(&conn, "u1");
        replace_for_report(&mut conn, "u1", &report_id, &drafts(3)).unwrap();

        crate::db::repository::report::delete_report(&conn, "u1", &report_id.to_string()).unwrap();

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM recommendations", [], |r| r.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
