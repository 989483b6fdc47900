//! The per-hardware-family solving strategy.

use std::fmt;

use robots_geometry::{deg_to_rad, rad_to_deg, Frame};

use crate::error::Result;
use crate::joint::Joint;
use crate::target::Target;

/// Family-specific kinematics plugged into a [`Mechanism`](crate::Mechanism).
///
/// The engine owns the chain bookkeeping (range checks, base placement,
/// display meshes). A family supplies only the equations: how a target maps
/// to joint values and how joint values map to link frames.
///
/// Implementations must be deterministic: given the same inputs they must
/// return the same outputs, and with no previous solution they must pick a
/// fixed default branch.
pub trait KinematicFamily: fmt::Debug + Send + Sync {
    /// Short family name used in error messages.
    fn name(&self) -> &'static str;

    /// Compute one value per joint for `target`.
    ///
    /// When a target admits several configurations, `previous` (same length
    /// as `joints`, already checked by the engine) selects the branch closest
    /// to the last solution.
    ///
    /// # Errors
    ///
    /// Returns an error if the target lacks data this family needs.
    fn solve_joints(
        &self,
        joints: &[Joint],
        target: &Target,
        previous: Option<&[f64]>,
    ) -> Result<Vec<f64>>;

    /// Compute one frame per joint, relative to the mechanism base.
    ///
    /// Frame `i` is the pose of joint `i` with the base at the world origin.
    /// A tool on `target` is composed onto the last frame here, if the family
    /// models one.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` cannot be placed.
    fn solve_frames(&self, joints: &[Joint], values: &[f64], target: &Target) -> Result<Vec<Frame>>;

    /// Convert a value authored in degrees to working units for joint `index`.
    fn degree_to_radian(&self, degree: f64, _index: usize) -> f64 {
        deg_to_rad(degree)
    }

    /// Convert a working-unit value of joint `index` back to degrees.
    fn radian_to_degree(&self, radian: f64, _index: usize) -> f64 {
        rad_to_deg(radian)
    }

    /// The un-posed configuration; the value nearest zero inside each range.
    fn home_values(&self, joints: &[Joint]) -> Vec<f64> {
        joints.iter().map(|j| j.range.clamp(0.0)).collect()
    }

    /// Establish start state once, after ranges are converted.
    ///
    /// Returns the base-relative joint frames at [`home_values`], which
    /// become each joint's `local_frame`. Families with internal state (a
    /// preferred branch, for example) initialise it here.
    ///
    /// [`home_values`]: KinematicFamily::home_values
    ///
    /// # Errors
    ///
    /// Returns an error if the home configuration cannot be placed.
    fn start_state(&mut self, joints: &[Joint]) -> Result<Vec<Frame>> {
        let home = self.home_values(joints);
        let target = Target::joints(home.clone());
        self.solve_frames(joints, &home, &target)
    }
}
