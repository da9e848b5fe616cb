//! Hydrophobic collapse.
//!
//! Each pass pulls hydrophobic residues toward the trace centroid in proportion
//! to their Kyte-Doolittle score. Hydrophilic residues are never moved and there
//! is no repulsion term, so bond lengths are not preserved. This is a fixed
//! iteration heuristic, not an energy minimizer.

use crate::geometry::{add, scale, sub, BackboneTrace};
use crate::info::constants::{hydropathy, MAX_HYDROPATHY};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementParams {
    pub iterations: usize,
    pub strength: f64,
}

impl Default for RefinementParams {
    fn default() -> Self {
        RefinementParams {
            iterations: 50,
            strength: 0.1,
        }
    }
}

/// Refine `trace` in place against the residues of `sequence`.
///
/// Positions past the end of `sequence` are treated as hydrophilic.
pub fn refine(sequence: &str, trace: &mut BackboneTrace, params: &RefinementParams) {
    let weights: Vec<f64> = sequence
        .chars()
        .map(|c| {
            let score = hydropathy(c);
            if score > 0.0 {
                params.strength * score / MAX_HYDROPATHY
            } else {
                0.0
            }
        })
        .collect();

    for _ in 0..params.iterations {
        let Some(center) = trace.centroid() else {
            return;
        };
        for (pos, &weight) in trace.coords_mut().iter_mut().zip(&weights) {
            if weight > 0.0 {
                *pos = add(*pos, scale(sub(center, *pos), weight));
            }
        }
    }
    debug!(
        "refined {} residues over {} iterations",
        trace.len(),
        params.iterations
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::build_trace;
    use crate::secondary::predict_secondary_structure;

    fn synthesize(seq: &str) -> BackboneTrace {
        let profile = predict_secondary_structure(seq);
        build_trace(seq.len(), profile.labels())
    }

    #[test]
    fn test_hydrophilic_residues_do_not_move() {
        let seq = "DEKRDEKRDEKRDEKR";
        let before = synthesize(seq);
        let mut after = before.clone();
        refine(seq, &mut after, &RefinementParams::default());
        assert_eq!(before, after);
    }

    #[test]
    fn test_hydrophobic_residues_move_toward_center() {
        let seq = "IDIDIDIDIDIDIDID";
        let before = synthesize(seq);
        let mut after = before.clone();
        refine(
            seq,
            &mut after,
            &RefinementParams {
                iterations: 1,
                strength: 0.1,
            },
        );
        let center = before.centroid().unwrap();
        for (i, c) in seq.chars().enumerate() {
            let d_before = crate::geometry::distance(before.coords()[i], center);
            let d_after = crate::geometry::distance(after.coords()[i], center);
            if c == 'I' {
                // isoleucine has the maximum score, so it moves by exactly `strength`
                assert!((d_after - 0.9 * d_before).abs() < 1e-9);
            } else {
                assert_eq!(before.coords()[i], after.coords()[i]);
            }
        }
    }

    #[test]
    fn test_collapse_reduces_radius_of_gyration() {
        let seq = "MVLILAVLFIVAGLLAVWFLIVAM";
        let before = synthesize(seq);
        let mut after = before.clone();
        refine(seq, &mut after, &RefinementParams::default());
        assert!(after.radius_of_gyration().unwrap() < before.radius_of_gyration().unwrap());
    }

    #[test]
    fn test_deterministic() {
        let seq = "MVHLTPEEKSAVTALWGKVNVDEVGG";
        let mut a = synthesize(seq);
        let mut b = synthesize(seq);
        refine(seq, &mut a, &RefinementParams::default());
        refine(seq, &mut b, &RefinementParams::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_trace() {
        let mut trace = BackboneTrace::default();
        refine("", &mut trace, &RefinementParams::default());
        assert!(trace.is_empty());
    }
}
