//! Cα trace construction from secondary structure labels.
//!
//! Residues are placed one at a time from the previous three positions using a
//! bond angle and a torsion per residue (natural extension of reference frame).
//! The first three residues are bootstrapped in the xy-plane.

use crate::confidence::fnv1a;
use crate::secondary::SecondaryStructure;

/// Distance between consecutive Cα atoms.
pub const BOND_LENGTH: f64 = 3.8;

/// Bond angle used for the third bootstrap residue.
const BOOTSTRAP_ANGLE: f64 = 110.0;

/// Helix (bond angle, torsion) in degrees; roughly 100° of turn per residue.
const HELIX_GEOMETRY: (f64, f64) = (91.0, 50.0);

/// Sheet bond angle and torsion magnitude. The torsion sign flips every
/// [`SHEET_FLIP_PERIOD`] residues.
const SHEET_GEOMETRY: (f64, f64) = (120.0, 170.0);
pub const SHEET_FLIP_PERIOD: usize = 8;

#[rustfmt::skip]
const COIL_JITTER: [(f64, f64); 8] = [
    // angle   torsion
    (95.0,   -60.0),
    (105.0,  -120.0),
    (110.0,   75.0),
    (115.0,  160.0),
    (120.0,  -150.0),
    (100.0,   30.0),
    (125.0,  -90.0),
    (108.0,  120.0),
];

pub type Vec3 = [f64; 3];

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

pub fn distance(a: Vec3, b: Vec3) -> f64 {
    norm(sub(a, b))
}

/// Unit vector along `a`. Zero-length input is returned unchanged.
pub fn normalize(a: Vec3) -> Vec3 {
    let n = norm(a);
    if n < f64::EPSILON {
        a
    } else {
        scale(a, 1.0 / n)
    }
}

/// Ordered Cα positions, one per residue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackboneTrace {
    coords: Vec<Vec3>,
}

impl BackboneTrace {
    pub fn new(coords: Vec<Vec3>) -> Self {
        BackboneTrace { coords }
    }

    pub fn coords(&self) -> &[Vec3] {
        &self.coords
    }

    pub fn coords_mut(&mut self) -> &mut [Vec3] {
        &mut self.coords
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn centroid(&self) -> Option<Vec3> {
        if self.coords.is_empty() {
            return None;
        }
        let sum = self.coords.iter().fold([0.0; 3], |acc, &p| add(acc, p));
        Some(scale(sum, 1.0 / self.coords.len() as f64))
    }

    pub fn radius_of_gyration(&self) -> Option<f64> {
        let center = self.centroid()?;
        let msd = self
            .coords
            .iter()
            .map(|&p| dot(sub(p, center), sub(p, center)))
            .sum::<f64>()
            / self.coords.len() as f64;
        Some(msd.sqrt())
    }

    /// Distances between consecutive positions.
    pub fn bond_lengths(&self) -> Vec<f64> {
        self.coords.windows(2).map(|w| distance(w[0], w[1])).collect()
    }
}

impl From<Vec<Vec3>> for BackboneTrace {
    fn from(coords: Vec<Vec3>) -> Self {
        BackboneTrace::new(coords)
    }
}

/// Place `d` so that |d - c| = `bond`, angle(b, c, d) = `angle` and
/// dihedral(a, b, c, d) = `torsion`. Angles in degrees.
fn place_next(a: Vec3, b: Vec3, c: Vec3, bond: f64, angle: f64, torsion: f64) -> Vec3 {
    let (theta, phi) = (angle.to_radians(), torsion.to_radians());
    let bc = normalize(sub(c, b));
    let n = normalize(cross(sub(b, a), bc));
    let m = cross(n, bc);
    let local = [
        -bond * theta.cos(),
        bond * theta.sin() * phi.cos(),
        bond * theta.sin() * phi.sin(),
    ];
    add(
        c,
        add(scale(bc, local[0]), add(scale(m, local[1]), scale(n, local[2]))),
    )
}

/// Jitter slot for residue `index`: FNV-1a over the little-endian index.
fn coil_jitter_index(index: usize) -> usize {
    (fnv1a(&(index as u64).to_le_bytes()) % COIL_JITTER.len() as u64) as usize
}

/// Bond angle and torsion for residue `index` carrying `label`.
fn step_geometry(index: usize, label: SecondaryStructure) -> (f64, f64) {
    match label {
        SecondaryStructure::Helix => HELIX_GEOMETRY,
        SecondaryStructure::Sheet => {
            let (angle, torsion) = SHEET_GEOMETRY;
            if (index / SHEET_FLIP_PERIOD) % 2 == 0 {
                (angle, torsion)
            } else {
                (angle, -torsion)
            }
        }
        SecondaryStructure::Coil => COIL_JITTER[coil_jitter_index(index)],
    }
}

/// Build an `n` residue trace. Labels past the end of `labels` are treated as
/// coil.
pub fn build_trace(n: usize, labels: &[SecondaryStructure]) -> BackboneTrace {
    let mut coords: Vec<Vec3> = Vec::with_capacity(n);
    for i in 0..n {
        let next = match i {
            0 => [0.0, 0.0, 0.0],
            1 => [BOND_LENGTH, 0.0, 0.0],
            2 => {
                let turn = (180.0 - BOOTSTRAP_ANGLE).to_radians();
                add(
                    coords[1],
                    [BOND_LENGTH * turn.cos(), BOND_LENGTH * turn.sin(), 0.0],
                )
            }
            _ => {
                let label = labels.get(i).copied().unwrap_or(SecondaryStructure::Coil);
                let (angle, torsion) = step_geometry(i, label);
                place_next(coords[i - 3], coords[i - 2], coords[i - 1], BOND_LENGTH, angle, torsion)
            }
        };
        coords.push(next);
    }
    BackboneTrace { coords }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secondary::predict_secondary_structure;

    fn assert_bond_lengths(trace: &BackboneTrace) {
        for (i, d) in trace.bond_lengths().iter().enumerate() {
            assert!((d - BOND_LENGTH).abs() < 1e-9, "bond {i} has length {d}");
        }
    }

    fn bond_angle(a: Vec3, b: Vec3, c: Vec3) -> f64 {
        let u = normalize(sub(a, b));
        let v = normalize(sub(c, b));
        dot(u, v).clamp(-1.0, 1.0).acos().to_degrees()
    }

    #[test]
    fn test_small_chains() {
        assert!(build_trace(0, &[]).is_empty());
        assert_eq!(build_trace(1, &[]).coords(), &[[0.0, 0.0, 0.0]]);
        let two = build_trace(2, &[]);
        assert_eq!(two.len(), 2);
        assert_bond_lengths(&two);
        let three = build_trace(3, &[]);
        assert!((bond_angle(three.coords()[0], three.coords()[1], three.coords()[2]) - BOOTSTRAP_ANGLE).abs() < 1e-9);
    }

    #[test]
    fn test_bond_length_invariant_for_all_labels() {
        for label in [
            SecondaryStructure::Helix,
            SecondaryStructure::Sheet,
            SecondaryStructure::Coil,
        ] {
            let labels = vec![label; 40];
            let trace = build_trace(40, &labels);
            assert_eq!(trace.len(), 40);
            assert_bond_lengths(&trace);
        }
    }

    #[test]
    fn test_helix_angles() {
        let labels = vec![SecondaryStructure::Helix; 20];
        let trace = build_trace(20, &labels);
        let c = trace.coords();
        for i in 3..20 {
            assert!((bond_angle(c[i - 2], c[i - 1], c[i]) - HELIX_GEOMETRY.0).abs() < 1e-6);
        }
        // a helix stays compact, an extended strand does not
        let strand = build_trace(20, &vec![SecondaryStructure::Sheet; 20]);
        assert!(trace.radius_of_gyration().unwrap() < strand.radius_of_gyration().unwrap());
    }

    #[test]
    fn test_missing_labels_are_coil() {
        let short = build_trace(12, &[SecondaryStructure::Helix; 4]);
        let mut padded = vec![SecondaryStructure::Helix; 4];
        padded.extend(vec![SecondaryStructure::Coil; 8]);
        assert_eq!(short, build_trace(12, &padded));
    }

    #[test]
    fn test_deterministic_mixed_chain() {
        let profile = predict_secondary_structure("MVHLTPEEKSAVTALWGKVNVDEVGGEALGRLLVVYPWTQRFFESFGDLS");
        let a = build_trace(profile.len(), profile.labels());
        let b = build_trace(profile.len(), profile.labels());
        assert_eq!(a, b);
        assert_bond_lengths(&a);
    }

    #[test]
    fn test_coil_jitter_slots_are_fixed() {
        let slots: Vec<usize> = (0..12).map(coil_jitter_index).collect();
        assert_eq!(slots, vec![5, 4, 7, 6, 1, 0, 3, 2, 5, 4, 7, 6]);
        assert_eq!(step_geometry(0, SecondaryStructure::Coil), COIL_JITTER[5]);
    }

    #[test]
    fn test_centroid() {
        let trace = BackboneTrace::new(vec![[0.0, 0.0, 0.0], [2.0, 4.0, 6.0]]);
        assert_eq!(trace.centroid(), Some([1.0, 2.0, 3.0]));
        assert_eq!(BackboneTrace::default().centroid(), None);
    }
}
