//! Parallel transport frames along a sampled centreline.
//!
//! Frames are propagated by rotating the previous frame onto the next
//! tangent, so cross-sections do not twist the way Frenet frames do at
//! inflection points.

use glam::{DQuat, DVec3};

/// Orthonormal frame at a point on the curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: DVec3,
    pub normal: DVec3,
    /// `tangent × normal`
    pub binormal: DVec3,
}

impl Frame {
    /// Frame with an arbitrary normal perpendicular to `tangent`.
    pub fn from_tangent(tangent: DVec3) -> Self {
        let tangent = tangent.try_normalize().unwrap_or(DVec3::X);
        let normal = perpendicular(tangent);
        Self {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }

    /// Rotates this frame so its tangent becomes `tangent`.
    fn transport(&self, tangent: DVec3) -> Self {
        let tangent = tangent.try_normalize().unwrap_or(self.tangent);
        let rotation = DQuat::from_rotation_arc(self.tangent, tangent);
        let normal = (rotation * self.normal).normalize_or_zero();
        let normal = if normal == DVec3::ZERO { perpendicular(tangent) } else { normal };
        Self {
            tangent,
            normal,
            binormal: tangent.cross(normal),
        }
    }
}

/// Unit vector perpendicular to `v`, built from the least aligned axis.
fn perpendicular(v: DVec3) -> DVec3 {
    let a = v.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        DVec3::X
    } else if a.y <= a.z {
        DVec3::Y
    } else {
        DVec3::Z
    };
    v.cross(axis).try_normalize().unwrap_or(DVec3::Y)
}

/// One frame per point. Interior tangents average the adjacent segment
/// directions; repeated points reuse the previous tangent.
pub fn parallel_transport_frames(points: &[DVec3]) -> Vec<Frame> {
    if points.len() < 2 {
        return Vec::new();
    }

    let first = points
        .windows(2)
        .find_map(|w| (w[1] - w[0]).try_normalize())
        .unwrap_or(DVec3::X);
    let mut frames = Vec::with_capacity(points.len());
    frames.push(Frame::from_tangent(first));

    for i in 1..points.len() {
        let prev = frames[i - 1];
        let incoming = points[i] - points[i - 1];
        let direction = match points.get(i + 1) {
            Some(next) => incoming.normalize_or_zero() + (*next - points[i]).normalize_or_zero(),
            None => incoming,
        };
        frames.push(prev.transport(direction));
    }

    frames
}
