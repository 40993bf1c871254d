//! PDF generation via `printpdf`: a single-page report summary for
//! sharing with a clinician.

use printpdf::*;
use std::io::BufWriter;

use super::ExportError;
use crate::models::{Recommendation, StoredReport};
use crate::scoring::prompt::build_recommendation_request;

/// Renders a report summary PDF. Returns PDF bytes.
pub fn generate_report_pdf(
    report: &StoredReport,
    recommendations: &[Recommendation],
) -> Result<Vec<u8>, ExportError> {
    let title = format!("Semen Analysis Report - {}", report.test_date);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("font load: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(format!("font load: {e}")))?;

    let mut y = Mm(280.0);

    // Title
    layer.use_text(&title, 14.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        format!("Source file: {}", report.source_file),
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    // Scores
    layer.use_text("SCORES:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        format!("  Base score: {} / 100", report.base_score),
        9.0,
        Mm(25.0),
        y,
        &font,
    );
    y -= Mm(4.5);
    layer.use_text(
        format!("  Lifestyle-adjusted score: {} / 100", report.adjusted_score),
        9.0,
        Mm(25.0),
        y,
        &font,
    );
    y -= Mm(8.0);

    // Biomarkers use the same "Not measured" rendering as the prompt builder.
    layer.use_text("MEASURED VALUES:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    let rendered = build_recommendation_request(&report.biomarkers, report.base_score, None);
    for line in &rendered.biomarkers {
        layer.use_text(
            format!("  {}: {}", line.label, line.value),
            9.0,
            Mm(25.0),
            y,
            &font,
        );
        y -= Mm(4.5);
    }
    y -= Mm(4.0);

    // Recommendations
    if !recommendations.is_empty() {
        layer.use_text("RECOMMENDATIONS:", 11.0, Mm(20.0), y, &bold);
        y -= Mm(6.0);
        for rec in recommendations {
            let head = format!(
                "  {}. {} [{} / {}]",
                rec.rank,
                rec.title,
                rec.category.as_str(),
                rec.priority.as_str()
            );
            for line in wrap_text(&head, 80) {
                layer.use_text(&line, 9.0, Mm(25.0), y, &bold);
                y -= Mm(4.5);
            }
            for line in wrap_text(&format!("     {}", rec.description), 80) {
                layer.use_text(&line, 9.0, Mm(25.0), y, &font);
                y -= Mm(4.5);
            }
            y -= Mm(2.0);
        }
    }

    // Disclaimer
    y -= Mm(6.0);
    layer.use_text(
        "Generated by Fertilog. Not a medical diagnosis; discuss results with your physician.",
        8.0,
        Mm(20.0),
        y,
        &font,
    );

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ExportError::Pdf(format!("save: {e}")))?;
    buf.into_inner()
        .map_err(|e| ExportError::Pdf(format!("buffer flush: {e}")))
}

/// Naive word wrap at a character budget.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
