//! Built-in kinematic families for external axes.
//!
//! Tracks and positioners are driven by the target's external axis values
//! rather than by its pose. Arm families are supplied by the host
//! application through the [`KinematicFamily`](crate::KinematicFamily)
//! trait.

mod positioner;
mod track;

pub use positioner::PositionerFamily;
pub use track::TrackFamily;

use crate::error::{KinematicsError, Result};
use crate::joint::Joint;
use crate::target::Target;

/// Read one external value per joint starting at `offset`, converted to
/// working units with `convert`.
fn external_values(
    family: &'static str,
    joints: &[Joint],
    target: &Target,
    offset: usize,
    convert: impl Fn(f64, usize) -> f64,
) -> Result<Vec<f64>> {
    let needed = offset + joints.len();
    if target.external.len() < needed {
        return Err(KinematicsError::missing_target_data(
            "external axes",
            format!(
                "{family} needs {needed} external values, target has {}",
                target.external.len()
            ),
        ));
    }
    Ok(target.external[offset..needed]
        .iter()
        .enumerate()
        .map(|(i, &v)| convert(v, i))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{JointKind, JointRange};

    #[test]
    fn reads_from_offset() {
        let joints = vec![Joint::new(JointKind::Prismatic, 0, 6, JointRange::new(0.0, 1.0))];
        let target = Target::external(vec![1.0, 2.0, 3.0]);
        let values = external_values("test", &joints, &target, 2, |v, _| v * 10.0).unwrap();
        assert_eq!(values, vec![30.0]);
    }

    #[test]
    fn too_few_values() {
        let joints = vec![Joint::new(JointKind::Prismatic, 0, 6, JointRange::new(0.0, 1.0))];
        let target = Target::external(vec![1.0]);
        let err = external_values("test", &joints, &target, 1, |v, _| v).unwrap_err();
        assert!(err.to_string().contains("needs 2"));
    }
}
