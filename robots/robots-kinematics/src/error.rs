//! Error types for mechanism construction and solving.
//!
//! Joint range violations are deliberately not errors: they are reported
//! as messages on the [`KinematicSolution`](crate::KinematicSolution) so a
//! caller can still display an out-of-range configuration.

use thiserror::Error;

/// Fatal errors raised while building a mechanism or solving a target.
#[derive(Debug, Error)]
pub enum KinematicsError {
    /// A mechanism needs at least one joint.
    #[error("mechanism {model} has no joints")]
    NoJoints {
        /// Model name of the mechanism.
        model: String,
    },

    /// The base frame, or the frame it is placed under, holds `NaN` or
    /// infinite values.
    #[error("base frame of {model} is not finite")]
    NonFiniteBase {
        /// Model name of the mechanism.
        model: String,
    },

    /// A joint's stored index does not match its position in the chain.
    #[error("joint at position {position} declares index {index}")]
    JointIndexMismatch {
        /// Position in the chain.
        position: usize,
        /// Index stored on the joint.
        index: usize,
    },

    /// A joint range is empty or not finite.
    #[error("invalid range for axis {number}: [{min}, {max}]")]
    InvalidRange {
        /// External axis number (1-based).
        number: usize,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The previous joint values do not match the chain length.
    #[error("expected {expected} previous joint values, got {actual}")]
    PreviousJointsLength {
        /// Joint count of the mechanism.
        expected: usize,
        /// Length of the supplied array.
        actual: usize,
    },

    /// The target lacks data the kinematic family needs.
    #[error("target is missing {field}: {message}")]
    MissingTargetData {
        /// What is missing.
        field: &'static str,
        /// Description of the requirement.
        message: String,
    },

    /// The kinematic family cannot handle this kind of target.
    #[error("{family} kinematics cannot solve {target} targets")]
    UnsupportedTarget {
        /// Family name.
        family: &'static str,
        /// Target description.
        target: &'static str,
    },

    /// A kinematic family produced output of the wrong size.
    #[error("{family} produced {actual} {what}, expected {expected}")]
    FamilyOutputLength {
        /// Family name.
        family: &'static str,
        /// What was produced (joint values or frames).
        what: &'static str,
        /// Expected count.
        expected: usize,
        /// Actual count.
        actual: usize,
    },

    /// A kinematic family produced `NaN` or infinite values.
    #[error("{family} produced non-finite {what}")]
    NonFinite {
        /// Family name.
        family: &'static str,
        /// What was non-finite.
        what: &'static str,
    },
}

impl KinematicsError {
    /// Create a missing target data error.
    pub fn missing_target_data(field: &'static str, message: impl Into<String>) -> Self {
        Self::MissingTargetData {
            field,
            message: message.into(),
        }
    }

    /// Create a non-finite base error.
    pub fn non_finite_base(model: impl Into<String>) -> Self {
        Self::NonFiniteBase {
            model: model.into(),
        }
    }

    /// Create a no-joints error.
    pub fn no_joints(model: impl Into<String>) -> Self {
        Self::NoJoints {
            model: model.into(),
        }
    }
}

/// Result type for kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_length_display() {
        let err = KinematicsError::PreviousJointsLength {
            expected: 6,
            actual: 5,
        };
        assert!(err.to_string().contains('6'));
        assert!(err.to_string().contains('5'));
    }

    #[test]
    fn missing_target_data_display() {
        let err = KinematicsError::missing_target_data("external axes", "track needs 1 value");
        assert!(err.to_string().contains("external axes"));
        assert!(err.to_string().contains("track needs 1 value"));
    }
}
