//! Base score: maps a report's biomarkers to a 0-100 score,
//! independent of lifestyle.
//!
//! Each present biomarker earns points against its own fixed budget;
//! absent biomarkers contribute neither points nor budget, so the score
//! is "percent of achieved points among applicable budget" and a sparse
//! lab panel is never penalized for what it didn't measure.

use crate::models::BiomarkerSet;

/// Compute the base score from a biomarker set.
///
/// Returns 0 when no field is populated. Total motility is extracted
/// and stored but carries no budget in the current formula.
pub fn compute_base_score(biomarkers: &BiomarkerSet) -> u8 {
    let mut points: u32 = 0;
    let mut budget: u32 = 0;

    // Concentration (million/mL), WHO 6th ed. lower reference 16.
    if let Some(c) = biomarkers.concentration {
        budget += 25;
        points += if c >= 16.0 {
            25
        } else if c >= 10.0 {
            20
        } else if c >= 5.0 {
            15
        } else if c >= 1.0 {
            10
        } else {
            5
        };
    }

    // Progressive motility (%), lower reference 32.
    if let Some(pm) = biomarkers.progressive_motility {
        budget += 25;
        points += if pm >= 32.0 {
            25
        } else if pm >= 25.0 {
            20
        } else if pm >= 15.0 {
            15
        } else if pm >= 5.0 {
            10
        } else {
            5
        };
    }

    // Normal morphology (%), lower reference 4.
    if let Some(m) = biomarkers.morphology {
        budget += 20;
        points += if m >= 4.0 {
            20
        } else if m >= 3.0 {
            15
        } else if m >= 2.0 {
            10
        } else if m >= 1.0 {
            5
        } else {
            2
        };
    }

    // Volume (mL). The middle branch (`>= 1.0 || <= 7.0`) is satisfied
    // by every finite volume, so the 5-point arm is unreachable.
    // Kept verbatim: historical scores depend on it. Flagged for
    // product clarification, do not "fix" here.
    if let Some(v) = biomarkers.volume {
        budget += 15;
        points += if (1.5..=6.0).contains(&v) {
            15
        } else if v >= 1.0 || v <= 7.0 {
            10
        } else {
            5
        };
    }

    // DNA fragmentation index (%), inverted: lower is better.
    if let Some(dfi) = biomarkers.dna_fragmentation {
        budget += 15;
        points += if dfi < 15.0 {
            15
        } else if dfi < 25.0 {
            10
        } else if dfi < 30.0 {
            5
        } else {
            2
        };
    }

    if budget == 0 {
        return 0;
    }
    (100.0 * points as f64 / budget as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_panel() -> BiomarkerSet {
        BiomarkerSet {
            concentration: Some(20.0),
            total_motility: Some(48.0),
            progressive_motility: Some(35.0),
            morphology: Some(5.0),
            volume: Some(3.0),
            ph: Some(7.4),
            dna_fragmentation: Some(10.0),
        }
    }

    #[test]
    fn empty_panel_scores_zero() {
        assert_eq!(compute_base_score(&BiomarkerSet::default()), 0);
    }

    #[test]
    fn optimal_full_panel_scores_100() {
        assert_eq!(compute_base_score(&full_panel()), 100);
    }

    #[test]
    fn total_motility_never_affects_score() {
        let mut with = full_panel();
        let mut without = full_panel();
        with.total_motility = Some(5.0);
        without.total_motility = None;
        assert_eq!(compute_base_score(&with), compute_base_score(&without));
    }

    #[test]
    fn ph_never_affects_score() {
        let mut a = full_panel();
        let mut b = full_panel();
        a.ph = Some(9.9);
        b.ph = None;
        assert_eq!(compute_base_score(&a), compute_base_score(&b));
    }

    #[test]
    fn partial_panel_uses_only_applicable_budget() {
        // Concentration alone at its top tier: 25/25 → 100.
        let b = BiomarkerSet {
            concentration: Some(16.0),
            ..Default::default()
        };
        assert_eq!(compute_base_score(&b), 100);
    }

    #[test]
    fn concentration_tiers() {
        let score = |c: f64| {
            compute_base_score(&BiomarkerSet {
                concentration: Some(c),
                ..Default::default()
            })
        };
        assert_eq!(score(16.0), 100); // 25/25
        assert_eq!(score(10.0), 80); // 20/25
        assert_eq!(score(5.0), 60); // 15/25
        assert_eq!(score(1.0), 40); // 10/25
        assert_eq!(score(0.5), 20); // 5/25
    }

    #[test]
    fn morphology_floor_is_two_points() {
        let b = BiomarkerSet {
            morphology: Some(0.5),
            ..Default::default()
        };
        // 2/20 → 10
        assert_eq!(compute_base_score(&b), 10);
    }

    #[test]
    fn dfi_is_inverted() {
        let score = |dfi: f64| {
            compute_base_score(&BiomarkerSet {
                dna_fragmentation: Some(dfi),
                ..Default::default()
            })
        };
        assert!(score(10.0) > score(20.0));
        assert!(score(20.0) > score(27.0));
        assert_eq!(score(40.0), 13); // 2/15 rounds to 13
    }

    #[test]
    fn volume_middle_branch_catches_everything_outside_ideal() {
        let score = |v: f64| {
            compute_base_score(&BiomarkerSet {
                volume: Some(v),
                ..Default::default()
            })
        };
        assert_eq!(score(3.0), 100); // 15/15, ideal range
        // Both far-low and far-high volumes land in the 10-point arm;
        // the 5-point arm is unreachable for finite input.
        assert_eq!(score(0.2), 67); // 10/15
        assert_eq!(score(9.5), 67); // 10/15
    }

    #[test]
    fn mixed_panel_rounds_ratio() {
        // Concentration 20/25 + morphology 20/20 = 40 of 45 → 88.9 → 89.
        let b = BiomarkerSet {
            concentration: Some(12.0),
            morphology: Some(4.0),
            ..Default::default()
        };
        assert_eq!(compute_base_score(&b), 89);
    }

    #[test]
    fn determinism() {
        let b = full_panel();
        assert_eq!(compute_base_score(&b), compute_base_score(&b));
    }
}
