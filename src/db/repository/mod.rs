pub mod daily_log;
pub mod recommendation;
pub mod report;

pub use daily_log::{
    count_logs_since, distinct_log_days, insert_daily_log, latest_rated_habits, latest_snapshot,
    list_daily_logs, log_dates,
};
pub use recommendation::{list_for_report, replace_for_report};
pub use report::{
    count_reports, delete_report, find_by_hash, first_report_date, get_report, insert_report,
    latest_report, list_reports,
};
