//! Structured semen-analysis parameters as extracted from a lab report.

use serde::{Deserialize, Serialize};

/// One report's biomarkers. Every field is independently optional;
/// labs measure different panels, and the extraction service returns
/// `null` for anything it cannot read. Absence is a first-class state,
/// never defaulted to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomarkerSet {
    /// Sperm concentration, million/mL.
    pub concentration: Option<f64>,
    /// Total motility, %.
    pub total_motility: Option<f64>,
    /// Progressive motility, %.
    pub progressive_motility: Option<f64>,
    /// Normal morphology, %.
    pub morphology: Option<f64>,
    /// Ejaculate volume, mL.
    pub volume: Option<f64>,
    /// Semen pH.
    pub ph: Option<f64>,
    /// DNA fragmentation index, %.
    pub dna_fragmentation: Option<f64>,
}

impl BiomarkerSet {
    /// True when the extraction produced no usable values at all.
    pub fn is_empty(&self) -> bool {
        self.concentration.is_none()
            && self.total_motility.is_none()
            && self.progressive_motility.is_none()
            && self.morphology.is_none()
            && self.volume.is_none()
            && self.ph.is_none()
            && self.dna_fragmentation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(BiomarkerSet::default().is_empty());
    }

    #[test]
    fn single_field_is_not_empty() {
        let b = BiomarkerSet {
            ph: Some(7.4),
            ..Default::default()
        };
        assert!(!b.is_empty());
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let b: BiomarkerSet = serde_json::from_str(r#"{"concentration": 22.5}"#).unwrap();
        assert_eq!(b.concentration, Some(22.5));
        assert!(b.volume.is_none());
    }
}
