use crate::error::{ensure_tolerance, Result};
use crate::geometry::principal_direction_extent;
use crate::morphology::Neurite;

/// How the principal extents are compared against the tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlatnessMethod {
    /// Flat when any extent is below the tolerance.
    #[default]
    Tolerance,
    /// Flat when the smallest extent divided by the second smallest is
    /// below the tolerance.
    Ratio,
}

impl FlatnessMethod {
    /// `"ratio"` selects [`FlatnessMethod::Ratio`]; every other name,
    /// including unknown ones, behaves like `"tolerance"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ratio" => FlatnessMethod::Ratio,
            _ => FlatnessMethod::Tolerance,
        }
    }
}

impl From<&str> for FlatnessMethod {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

/// Apply `method` to already computed principal extents.
pub fn flatness_from_extents(extents: [f64; 3], tol: f64, method: FlatnessMethod) -> Result<bool> {
    let tol = ensure_tolerance(tol)?;
    Ok(match method {
        FlatnessMethod::Ratio => {
            let mut sorted = extents;
            sorted.sort_by(|a, b| a.total_cmp(b));
            // 0 / 0 is NaN and x / 0 is infinite: neither compares below tol.
            sorted[0] / sorted[1] < tol
        }
        FlatnessMethod::Tolerance => extents.iter().any(|&extent| extent < tol),
    })
}

/// True when the neurite is degenerate along at least one principal direction.
pub fn is_flat(neurite: &Neurite, tol: f64, method: impl Into<FlatnessMethod>) -> Result<bool> {
    let extents = principal_direction_extent(&neurite.points());
    flatness_from_extents(extents, tol, method.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MorphError;
    use crate::morphology::{Neurite, NeuriteType, Sample};

    fn cloud(points: &[(f64, f64, f64)]) -> Neurite {
        let mut neurite = Neurite::new(
            NeuriteType::BasalDendrite,
            vec![Sample::new(points[0].0, points[0].1, points[0].2, 1.0)],
        )
        .unwrap();
        let mut parent = 0;
        for &(x, y, z) in &points[1..] {
            parent = neurite.add_child(parent, vec![Sample::new(x, y, z, 1.0)]).unwrap();
        }
        neurite
    }

    fn box_corners(a: f64, b: f64, c: f64) -> Vec<(f64, f64, f64)> {
        let mut points = Vec::new();
        for &x in &[0.0, a] {
            for &y in &[0.0, b] {
                for &z in &[0.0, c] {
                    points.push((x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn tolerance_mode_on_extents() {
        assert!(flatness_from_extents([10.0, 10.0, 0.001], 0.01, FlatnessMethod::Tolerance).unwrap());
        assert!(!flatness_from_extents([10.0, 10.0, 10.0], 0.01, FlatnessMethod::Tolerance).unwrap());
    }

    #[test]
    fn ratio_mode_on_extents() {
        assert!(flatness_from_extents([3.0, 1.0, 2.0], 0.6, FlatnessMethod::Ratio).unwrap());
        assert!(!flatness_from_extents([3.0, 1.0, 2.0], 0.4, FlatnessMethod::Ratio).unwrap());
    }

    #[test]
    fn ratio_mode_with_zero_extents_is_not_flat() {
        assert!(!flatness_from_extents([0.0, 0.0, 5.0], 0.5, FlatnessMethod::Ratio).unwrap());
    }

    #[test]
    fn thin_slab_is_flat() {
        let neurite = cloud(&box_corners(10.0, 10.0, 0.001));
        assert!(is_flat(&neurite, 0.01, FlatnessMethod::Tolerance).unwrap());
    }

    #[test]
    fn cube_is_not_flat() {
        let neurite = cloud(&box_corners(10.0, 10.0, 10.0));
        assert!(!is_flat(&neurite, 0.01, FlatnessMethod::Tolerance).unwrap());
        assert!(!is_flat(&neurite, 0.5, "ratio").unwrap());
    }

    #[test]
    fn ratio_mode_on_box() {
        let neurite = cloud(&box_corners(1.0, 2.0, 3.0));
        assert!(is_flat(&neurite, 0.6, "ratio").unwrap());
        assert!(!is_flat(&neurite, 0.4, "ratio").unwrap());
    }

    #[test]
    fn unknown_method_names_fall_back_to_tolerance() {
        assert_eq!(FlatnessMethod::from_name("garbage"), FlatnessMethod::Tolerance);
        assert_eq!(FlatnessMethod::from_name("tolerance"), FlatnessMethod::Tolerance);
        assert_eq!(FlatnessMethod::from_name("Ratio"), FlatnessMethod::Tolerance);
        assert_eq!(FlatnessMethod::from_name("ratio"), FlatnessMethod::Ratio);

        let slab = cloud(&box_corners(10.0, 10.0, 0.001));
        assert_eq!(
            is_flat(&slab, 0.01, "garbage").unwrap(),
            is_flat(&slab, 0.01, "tolerance").unwrap()
        );
        let neurite = cloud(&box_corners(1.0, 2.0, 3.0));
        // ratio would say flat at 0.6, tolerance does not
        assert!(!is_flat(&neurite, 0.6, "garbage").unwrap());
    }

    #[test]
    fn invalid_tolerance_is_rejected() {
        let neurite = cloud(&box_corners(1.0, 1.0, 1.0));
        assert!(matches!(
            is_flat(&neurite, f64::NAN, FlatnessMethod::Tolerance),
            Err(MorphError::InvalidTolerance(_))
        ));
    }
}
