//! CSV export: report history as RFC-4180 text.

use crate::models::StoredReport;

const HEADER: &str = "test_date,source_file,concentration,total_motility,\
progressive_motility,morphology,volume,ph,dna_fragmentation,base_score,adjusted_score";

/// Renders the user's report history as CSV, newest-first in the order
/// given. Absent biomarkers render as empty cells, not zeros.
pub fn reports_csv(reports: &[StoredReport]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for report in reports {
        let b = &report.biomarkers;
        let row = [
            report.test_date.to_string(),
            escape(&report.source_file),
            opt(b.concentration),
            opt(b.total_motility),
            opt(b.progressive_motility),
            opt(b.morphology),
            opt(b.volume),
            opt(b.ph),
            opt(b.dna_fragmentation),
            report.base_score.to_string(),
            report.adjusted_score.to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

fn opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quote a field when it contains a delimiter, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiomarkerSet;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn report(source_file: &str, concentration: Option<f64>) -> StoredReport {
        StoredReport {
            id: Uuid::new_v4(),
            user_id: "u1".into(),
            test_date: NaiveDate::parse_from_str("2026-02-01", "%Y-%m-%d").unwrap(),
            source_file: source_file.into(),
            file_hash: "h".into(),
            biomarkers: BiomarkerSet {
                concentration,
                volume: Some(3.5),
                ..Default::default()
            },
            base_score: 80,
            adjusted_score: 85,
            created_at: "2026-02-01 10:00:00".into(),
        }
    }

    #[test]
    fn header_plus_one_row_per_report() {
        let csv = reports_csv(&[report("a.pdf", Some(20.0)), report("b.pdf", None)]);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("test_date,source_file,"));
    }

    #[test]
    fn absent_values_are_empty_cells() {
        let csv = reports_csv(&[report("a.pdf", None)]);
        let row = csv.lines().nth(1).unwrap();
        // concentration cell (third column) is empty
        assert!(row.starts_with("2026-02-01,a.pdf,,"));
    }

    #[test]
    fn filenames_with_commas_are_quoted() {
        let csv = reports_csv(&[report("lab, final.pdf", Some(1.0))]);
        assert!(csv.contains("\"lab, final.pdf\""));
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn empty_input_is_header_only() {
        let csv = reports_csv(&[]);
        assert_eq!(csv.lines().count(), 1);
    }
}
