//! Rotary positioner kinematics.

use std::f64::consts::TAU;

use robots_geometry::{Frame, Point3, UnitQuaternion, Vector3};

use super::external_values;
use crate::error::Result;
use crate::family::KinematicFamily;
use crate::joint::{Joint, JointRange};
use crate::target::Target;

/// Tilt-and-turn workpiece positioner.
///
/// The last axis is the turntable and rotates about its local Z axis; every
/// preceding axis tilts about its local X axis. Axis `i` sits at `(a, 0, d)`
/// from its predecessor. External values are authored in degrees.
///
/// Turntables often allow more than one turn, so the same angle can be
/// reached at several multiples of a full turn. The value nearest the
/// previous solution that stays inside the range is chosen; without a
/// previous solution, the value nearest the requested angle.
#[derive(Debug, Clone, Default)]
pub struct PositionerFamily {
    external_offset: usize,
}

impl PositionerFamily {
    /// A positioner reading its values from the first external axes.
    #[must_use]
    pub const fn new() -> Self {
        Self { external_offset: 0 }
    }

    /// Read values starting at external axis `offset`.
    #[must_use]
    pub const fn with_external_offset(mut self, offset: usize) -> Self {
        self.external_offset = offset;
        self
    }
}

/// Pick `value + k * TAU` inside `range` closest to `reference`.
///
/// Returns `value` unchanged if no full-turn equivalent fits. The turn
/// count is computed directly, so the cost does not depend on the width
/// of the range or the size of `value`.
fn nearest_turn(value: f64, range: &JointRange, reference: f64) -> f64 {
    let first = ((range.min - value) / TAU).ceil();
    let last = ((range.max - value) / TAU).floor();
    if !first.is_finite() || !last.is_finite() || !reference.is_finite() || first > last {
        return value;
    }

    // rounding may land one turn off; check the neighbours too
    let k = ((reference - value) / TAU).round().clamp(first, last);
    [k - 1.0, k, k + 1.0]
        .into_iter()
        .filter(|k| (first..=last).contains(k))
        .map(|k| value + k * TAU)
        .filter(|candidate| candidate.is_finite() && range.contains(*candidate))
        .min_by(|a, b| (a - reference).abs().total_cmp(&(b - reference).abs()))
        .unwrap_or(value)
}

impl KinematicFamily for PositionerFamily {
    fn name(&self) -> &'static str {
        "positioner"
    }

    fn solve_joints(
        &self,
        joints: &[Joint],
        target: &Target,
        previous: Option<&[f64]>,
    ) -> Result<Vec<f64>> {
        let raw = external_values(self.name(), joints, target, self.external_offset, |v, i| {
            self.degree_to_radian(v, i)
        })?;
        Ok(joints
            .iter()
            .zip(raw)
            .enumerate()
            .map(|(i, (joint, value))| {
                let reference = previous
                    .and_then(|p| p.get(i).copied())
                    .unwrap_or(value);
                nearest_turn(value, &joint.range, reference)
            })
            .collect())
    }

    fn solve_frames(&self, joints: &[Joint], values: &[f64], _target: &Target) -> Result<Vec<Frame>> {
        let last = joints.len().saturating_sub(1);
        let mut current = Frame::world();
        Ok(joints
            .iter()
            .zip(values)
            .map(|(joint, &value)| {
                let axis = if joint.index == last {
                    Vector3::z_axis()
                } else {
                    Vector3::x_axis()
                };
                let step = Frame::new(
                    Point3::new(joint.a, 0.0, joint.d),
                    UnitQuaternion::from_axis_angle(&axis, value),
                );
                current = current.compose(&step);
                current
            })
            .collect())
    }
}
