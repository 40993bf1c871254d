//! Daily-log repository: one row per lifestyle entry.
//!
//! Rows carry a shape tag (`rated` or `checklist`); the tagged
//! `LifestyleSnapshot` is reconstructed at read time, so consumers
//! never see raw nullable columns.

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::{DietQuality, SleepQuality, StressLevel};
use crate::models::{DailyChecklist, LifestyleSnapshot, RatedHabits, StoredDailyLog};

const LOG_COLUMNS: &str = "id, user_id, log_date, shape,
         diet_quality, sleep_quality, stress_level, exercise_minutes,
         electrolytes, masturbation_count,
         healthy_eating, no_smoking, no_alcohol, exercised, good_sleep,
         loose_underwear, daily_points, created_at";

/// Inserts a daily log. Returns the generated UUID.
pub fn insert_daily_log(
    conn: &Connection,
    user_id: &str,
    log_date: NaiveDate,
    snapshot: &LifestyleSnapshot,
    daily_points: u8,
) -> Result<Uuid, DatabaseError> {
    let id = Uuid::new_v4();
    let now = Local::now().naive_local().format("%Y-%m-%d %H:%M:%S").to_string();

    match snapshot {
        LifestyleSnapshot::Rated(r) => {
            conn.execute(
                "INSERT INTO daily_logs (id, user_id, log_date, shape,
                 diet_quality, sleep_quality, stress_level, exercise_minutes,
                 electrolytes, masturbation_count, daily_points, created_at)
                 VALUES (?1, ?2, ?3, 'rated', ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id.to_string(),
                    user_id,
                    log_date.to_string(),
                    r.diet_quality.map(|v| v.as_str()),
                    r.sleep_quality.map(|v| v.as_str()),
                    r.stress_level.map(|v| v.as_str()),
                    r.exercise_minutes,
                    r.electrolytes as i32,
                    r.masturbation_count,
                    daily_points as i64,
                    now,
                ],
            )?;
        }
        LifestyleSnapshot::Checklist(c) => {
            conn.execute(
                "INSERT INTO daily_logs (id, user_id, log_date, shape,
                 healthy_eating, no_smoking, no_alcohol, exercised, good_sleep,
                 loose_underwear, daily_points, created_at)
                 VALUES (?1, ?2, ?3, 'checklist', ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    id.to_string(),
                    user_id,
                    log_date.to_string(),
                    c.healthy_eating as i32,
                    c.no_smoking as i32,
                    c.no_alcohol as i32,
                    c.exercised as i32,
                    c.good_sleep as i32,
                    c.loose_underwear as i32,
                    daily_points as i64,
                    now,
                ],
            )?;
        }
    }

    Ok(id)
}

/// All logs for a user, newest first.
pub fn list_daily_logs(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<StoredDailyLog>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM daily_logs
         WHERE user_id = ?1 ORDER BY log_date DESC, created_at DESC"
    ))?;

    let rows = stmt.query_map(params![user_id], |row| Ok(log_row(row)))?;

    let mut logs = Vec::new();
    for row in rows {
        logs.push(log_from_row(row??)?);
    }
    Ok(logs)
}

/// Log dates only (newest first), input for the streak walk.
pub fn log_dates(conn: &Connection, user_id: &str) -> Result<Vec<NaiveDate>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT log_date FROM daily_logs WHERE user_id = ?1 ORDER BY log_date DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

    let mut dates = Vec::new();
    for row in rows {
        if let Ok(d) = NaiveDate::parse_from_str(&row?, "%Y-%m-%d") {
            dates.push(d);
        }
    }
    Ok(dates)
}

/// Count of distinct logged days, the numerator of the consistency metric.
pub fn distinct_log_days(conn: &Connection, user_id: &str) -> Result<u32, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT log_date) FROM daily_logs WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count as u32)
}

/// Count of logs on or after the given date (weekly summary).
pub fn count_logs_since(
    conn: &Connection,
    user_id: &str,
    since: NaiveDate,
) -> Result<u32, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM daily_logs WHERE user_id = ?1 AND log_date >= ?2",
        params![user_id, since.to_string()],
        |row| row.get(0),
    )?;
    Ok(count as u32)
}

/// Most recent rated-shape log, the lifestyle context used when a new
/// report is scored. Checklist-shape logs are not usable as report
/// context and are skipped.
pub fn latest_rated_habits(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<RatedHabits>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM daily_logs
         WHERE user_id = ?1 AND shape = 'rated'
         ORDER BY log_date DESC, created_at DESC LIMIT 1"
    ))?;

    let mut rows = stmt.query_map(params![user_id], |row| Ok(log_row(row)))?;
    match rows.next() {
        Some(row) => {
            let log = log_from_row(row??)?;
            match log.snapshot {
                LifestyleSnapshot::Rated(r) => Ok(Some(r)),
                LifestyleSnapshot::Checklist(_) => Ok(None),
            }
        }
        None => Ok(None),
    }
}

/// Most recent log of either shape, as a snapshot for the
/// recommendation request builder.
pub fn latest_snapshot(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<LifestyleSnapshot>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM daily_logs
         WHERE user_id = ?1 ORDER BY log_date DESC, created_at DESC LIMIT 1"
    ))?;

    let mut rows = stmt.query_map(params![user_id], |row| Ok(log_row(row)))?;
    match rows.next() {
        Some(row) => Ok(Some(log_from_row(row??)?.snapshot)),
        None => Ok(None),
    }
}

// Internal row type for daily_logs mapping
struct LogRow {
    id: String,
    user_id: String,
    log_date: String,
    shape: String,
    diet_quality: Option<String>,
    sleep_quality: Option<String>,
    stress_level: Option<String>,
    exercise_minutes: Option<u32>,
    electrolytes: Option<i32>,
    masturbation_count: Option<u32>,
    healthy_eating: Option<i32>,
    no_smoking: Option<i32>,
    no_alcohol: Option<i32>,
    exercised: Option<i32>,
    good_sleep: Option<i32>,
    loose_underwear: Option<i32>,
    daily_points: i64,
    created_at: String,
}

fn log_row(row: &rusqlite::Row<'_>) -> Result<LogRow, rusqlite::Error> {
    Ok(LogRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        log_date: row.get(2)?,
        shape: row.get(3)?,
        diet_quality: row.get(4)?,
        sleep_quality: row.get(5)?,
        stress_level: row.get(6)?,
        exercise_minutes: row.get(7)?,
        electrolytes: row.get(8)?,
        masturbation_count: row.get(9)?,
        healthy_eating: row.get(10)?,
        no_smoking: row.get(11)?,
        no_alcohol: row.get(12)?,
        exercised: row.get(13)?,
        good_sleep: row.get(14)?,
        loose_underwear: row.get(15)?,
        daily_points: row.get(16)?,
        created_at: row.get(17)?,
    })
}

fn log_from_row(row: LogRow) -> Result<StoredDailyLog, DatabaseError> {
    let snapshot = match row.shape.as_str() {
        "rated" => LifestyleSnapshot::Rated(RatedHabits {
            diet_quality: parse_opt::<DietQuality>(row.diet_quality)?,
            sleep_quality: parse_opt::<SleepQuality>(row.sleep_quality)?,
            stress_level: parse_opt::<StressLevel>(row.stress_level)?,
            exercise_minutes: row.exercise_minutes,
            electrolytes: row.electrolytes.unwrap_or(0) != 0,
            masturbation_count: row.masturbation_count,
        }),
        "checklist" => LifestyleSnapshot::Checklist(DailyChecklist {
            healthy_eating: row.healthy_eating.unwrap_or(0) != 0,
            no_smoking: row.no_smoking.unwrap_or(0) != 0,
            no_alcohol: row.no_alcohol.unwrap_or(0) != 0,
            exercised: row.exercised.unwrap_or(0) != 0,
            good_sleep: row.good_sleep.unwrap_or(0) != 0,
            loose_underwear: row.loose_underwear.unwrap_or(0) != 0,
        }),
        other => {
            return Err(DatabaseError::InvalidEnum {
                field: "shape".into(),
                value: other.into(),
            })
        }
    };

    Ok(StoredDailyLog {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        user_id: row.user_id,
        log_date: NaiveDate::parse_from_str(&row.log_date, "%Y-%m-%d").unwrap_or_default(),
        snapshot,
        daily_points: row.daily_points as u8,
        created_at: row.created_at,
    })
}

fn parse_opt<T: FromStr<Err = DatabaseError>>(
    value: Option<String>,
) -> Result<Option<T>, DatabaseError> {
    value.map(|s| T::from_str(&s)).transpose()
}
