//! Blending and dilution arithmetic.
//!
//! Both queries are pure functions of a [`Blend`] and work on full `f64`
//! precision. Rounding for display happens in [`crate::utils::format`].

pub use crate::domain::model::pure_alcohol;
use crate::domain::model::{Blend, DilutionResult, StrengthResult};
use crate::utils::error::{BlendError, Result};

/// Final strength (Cf) of the blend: `LAA * 100 / V`.
///
/// # Errors
///
/// Returns [`BlendError::ZeroVolumeBlend`] when the blend holds no volume;
/// the division is never attempted.
pub fn compute_final_strength(blend: &Blend) -> Result<StrengthResult> {
    let total_volume = blend.total_volume();
    let total_pure_alcohol = blend.total_pure_alcohol();

    if !blend.has_volume() {
        return Err(BlendError::ZeroVolumeBlend);
    }

    let final_strength = total_pure_alcohol * 100.0 / total_volume;
    tracing::debug!(
        total_volume,
        total_pure_alcohol,
        final_strength,
        "computed final strength"
    );

    Ok(StrengthResult {
        final_strength,
        total_pure_alcohol,
        total_volume,
    })
}

/// Water (Va) needed to bring the blend down to `target_strength`.
///
/// The pure alcohol content is held constant, so the blend has to reach
/// `Vf = LAA * 100 / target` liters. A negative `Vf - V` means the target is
/// above the blend's current strength; the result is then clamped to zero and
/// [`DilutionResult::is_reachable`] reports `false`.
///
/// # Errors
///
/// Returns [`BlendError::NonPositiveTarget`] for a target that is zero,
/// negative or not finite.
pub fn compute_water_to_add(blend: &Blend, target_strength: f64) -> Result<DilutionResult> {
    if !target_strength.is_finite() || target_strength <= 0.0 {
        return Err(BlendError::NonPositiveTarget {
            target: target_strength,
        });
    }

    let total_volume = blend.total_volume();
    let total_pure_alcohol = blend.total_pure_alcohol();
    let final_volume_needed = total_pure_alcohol * 100.0 / target_strength;
    let water_to_add = (final_volume_needed - total_volume).max(0.0);

    tracing::debug!(
        total_volume,
        total_pure_alcohol,
        target_strength,
        final_volume_needed,
        water_to_add,
        "computed water to add"
    );

    Ok(DilutionResult {
        water_to_add,
        final_volume_needed,
        total_pure_alcohol,
        total_volume,
        target_strength,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Component;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn blend(rows: &[(&str, f64, f64)]) -> Blend {
        Blend::from_components(
            rows.iter()
                .map(|(n, v, s)| Component::new(*n, *v, *s).unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_single_component_keeps_its_strength() {
        let result = compute_final_strength(&blend(&[("Base alcohol", 1000.0, 96.0)])).unwrap();
        assert_eq!(result.final_strength, 96.0);
        assert_eq!(result.total_pure_alcohol, 960.0);
        assert_eq!(result.total_volume, 1000.0);
    }

    #[test]
    fn test_half_water_halves_strength() {
        let b = blend(&[("Base alcohol", 500.0, 96.0), ("Water", 500.0, 0.0)]);
        let result = compute_final_strength(&b).unwrap();
        assert_relative_eq!(result.total_pure_alcohol, 480.0);
        assert_relative_eq!(result.total_volume, 1000.0);
        assert_relative_eq!(result.final_strength, 48.0);
    }

    #[test]
    fn test_zero_volume_is_reported_not_divided() {
        let b = blend(&[("Water", 0.0, 0.0), ("Base alcohol", 0.0, 96.0)]);
        assert!(matches!(
            compute_final_strength(&b),
            Err(BlendError::ZeroVolumeBlend)
        ));
        assert!(matches!(
            compute_final_strength(&Blend::new()),
            Err(BlendError::ZeroVolumeBlend)
        ));
    }

    #[test]
    fn test_dilution_to_forty_degrees() {
        let result = compute_water_to_add(&blend(&[("Base alcohol", 1000.0, 96.0)]), 40.0).unwrap();
        assert_relative_eq!(result.final_volume_needed, 2400.0);
        assert_relative_eq!(result.water_to_add, 1400.0);
        assert_relative_eq!(result.total_pure_alcohol, 960.0);
        assert!(result.is_reachable());
    }

    #[test]
    fn test_stronger_target_clamps_to_zero() {
        let result = compute_water_to_add(&blend(&[("A", 100.0, 40.0)]), 50.0).unwrap();
        assert_eq!(result.water_to_add, 0.0);
        assert!(!result.is_reachable());
        assert_relative_eq!(result.shortfall().unwrap(), -20.0);
    }

    #[test]
    fn test_target_equal_to_current_strength_needs_no_water() {
        let result = compute_water_to_add(&blend(&[("A", 100.0, 40.0)]), 40.0).unwrap();
        assert_eq!(result.water_to_add, 0.0);
        assert!(result.is_reachable());
    }

    #[test]
    fn test_non_positive_target_rejected() {
        let b = blend(&[("A", 100.0, 40.0)]);
        for target in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                compute_water_to_add(&b, target),
                Err(BlendError::NonPositiveTarget { .. })
            ));
        }
    }

    #[test]
    fn test_dilution_of_empty_blend_is_zero() {
        let result = compute_water_to_add(&Blend::new(), 40.0).unwrap();
        assert_eq!(result.water_to_add, 0.0);
        assert_eq!(result.final_volume_needed, 0.0);
    }

    #[test]
    fn test_diluting_to_own_strength_is_reachable() {
        let b = blend(&[("Heads", 333.3, 37.7), ("Hearts", 123.4, 81.9)]);
        let strength = compute_final_strength(&b).unwrap().final_strength;
        let result = compute_water_to_add(&b, strength).unwrap();
        assert!(result.is_reachable());
        assert_abs_diff_eq!(result.water_to_add, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_largest_volume_stays_finite() {
        use crate::domain::model::MAX_VOLUME_LITERS;
        let result =
            compute_final_strength(&blend(&[("Base alcohol", MAX_VOLUME_LITERS, 96.0)])).unwrap();
        assert_relative_eq!(result.final_strength, 96.0);
    }
}
