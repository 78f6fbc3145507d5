//! Projection-mode config sections.

use serde::{Deserialize, Serialize};

/// Plain xyz triple used for projector position/rotation and eyepoints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Cylindrical/radial wrap parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CylindricalParams {
    pub axis: String,
    pub radius: f64,
    pub height: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Default for CylindricalParams {
    fn default() -> Self {
        Self {
            axis: "y".to_string(),
            radius: 100.0,
            height: 1000.0,
            start_angle: 0.0,
            end_angle: 90.0,
        }
    }
}

/// Row-major 4x4 projection matrix keyed `m00..m33` on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionMatrix {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m03: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
    pub m13: f64,
    pub m20: f64,
    pub m21: f64,
    pub m22: f64,
    pub m23: f64,
    pub m30: f64,
    pub m31: f64,
    pub m32: f64,
    pub m33: f64,
}

impl ProjectionMatrix {
    /// The identity matrix (diagonal 1, everything else 0).
    pub fn identity() -> Self {
        Self {
            m00: 1.0,
            m11: 1.0,
            m22: 1.0,
            m33: 1.0,
            ..Self::default()
        }
    }

    /// Reads entry (row, col); rows and columns outside 0..4 return 0.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        match (row, col) {
            (0, 0) => self.m00,
            (0, 1) => self.m01,
            (0, 2) => self.m02,
            (0, 3) => self.m03,
            (1, 0) => self.m10,
            (1, 1) => self.m11,
            (1, 2) => self.m12,
            (1, 3) => self.m13,
            (2, 0) => self.m20,
            (2, 1) => self.m21,
            (2, 2) => self.m22,
            (2, 3) => self.m23,
            (3, 0) => self.m30,
            (3, 1) => self.m31,
            (3, 2) => self.m32,
            (3, 3) => self.m33,
            _ => 0.0,
        }
    }

    /// All sixteen entries in row-major order.
    pub fn entries(&self) -> [f64; 16] {
        [
            self.m00, self.m01, self.m02, self.m03, self.m10, self.m11, self.m12, self.m13,
            self.m20, self.m21, self.m22, self.m23, self.m30, self.m31, self.m32, self.m33,
        ]
    }
}
