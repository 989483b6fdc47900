//! Motion targets passed to a solve call.

use robots_geometry::{Frame, TriangleMesh};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a target asks the main chain to reach.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TargetPose {
    /// Explicit joint values in radians (or length units for prismatic joints).
    Joints(Vec<f64>),
    /// A tool-center-point pose relative to the mechanism base.
    Frame(Frame),
}

/// Tool attached to the last link of a chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tool {
    /// Tool name.
    pub name: String,
    /// Tool center point relative to the flange.
    pub tcp: Frame,
    /// Display geometry relative to the flange.
    pub mesh: TriangleMesh,
}

impl Tool {
    /// A tool with no offset and no geometry.
    #[must_use]
    pub fn flange() -> Self {
        Self {
            name: "flange".to_string(),
            tcp: Frame::world(),
            mesh: TriangleMesh::new(),
        }
    }
}

/// A motion goal for one solve call.
///
/// External axis values drive positioners and tracks. They are authored in
/// the mechanism's display units (degrees for revolute axes, length for
/// prismatic ones) and converted by the kinematic family.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Target {
    /// Goal for the main chain.
    pub pose: TargetPose,
    /// Tool composed onto the last link, if any.
    pub tool: Option<Tool>,
    /// External axis values in display units.
    pub external: Vec<f64>,
}

impl Target {
    /// A joint-space target.
    #[must_use]
    pub fn joints(values: Vec<f64>) -> Self {
        Self {
            pose: TargetPose::Joints(values),
            tool: None,
            external: Vec::new(),
        }
    }

    /// A Cartesian target.
    #[must_use]
    pub fn frame(frame: Frame) -> Self {
        Self {
            pose: TargetPose::Frame(frame),
            tool: None,
            external: Vec::new(),
        }
    }

    /// A target that only drives external axes.
    #[must_use]
    pub fn external(values: Vec<f64>) -> Self {
        Self {
            pose: TargetPose::Joints(Vec::new()),
            tool: None,
            external: values,
        }
    }

    /// Attach a tool.
    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Set external axis values.
    #[must_use]
    pub fn with_external(mut self, values: Vec<f64>) -> Self {
        self.external = values;
        self
    }

    /// The tool center point offset, or the flange if no tool is attached.
    #[must_use]
    pub fn tcp(&self) -> Frame {
        self.tool.as_ref().map_or_else(Frame::world, |t| t.tcp)
    }
}
