use glam::Vec3;
use serde::{Deserialize, Serialize};
use utils::consts::DEFAULT_SPLINE;
use utils::math::Loc;

use crate::bezier::{cubic_pos, cubic_velocity};
use crate::{CurveError, CurveResult};

/// Defines how the two handles around a joint of a spline are constrained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlPointMode {
    /// The handles move independently.
    Free,
    /// The handles point in opposite directions but keep their own length.
    #[default]
    Aligned,
    /// The handles point in opposite directions and have the same length.
    Mirrored,
}

/// A composite cubic Bézier spline. Every consecutive group of four control points forms one
/// segment, and segments share their joint point, so there are always 3k+1 points for k >= 1
/// segments. Each joint (including the two ends) has a [`ControlPointMode`], the mode of control
/// point `i` is stored at `(i + 1) / 3`.
///
/// Extending the spline at its start (t = 0) shifts every existing control point index by 3.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    points: Vec<Vec3>,
    modes: Vec<ControlPointMode>,
}

impl Default for Spline {
    fn default() -> Self {
        Self {
            points: DEFAULT_SPLINE.to_vec(),
            modes: vec![ControlPointMode::Aligned; 2],
        }
    }
}

impl Spline {
    /// Creates a one segment spline with four evenly spaced points on the line from `start` to
    /// `end`.
    pub fn straight(start: Vec3, end: Vec3) -> Self {
        let step = (end - start) / 3.0;
        Self {
            points: vec![start, start + step, start + step * 2.0, end],
            modes: vec![ControlPointMode::Aligned; 2],
        }
    }

    /// Creates a spline from raw parts, checking the point and mode counts.
    pub fn from_parts(points: Vec<Vec3>, modes: Vec<ControlPointMode>) -> CurveResult<Self> {
        if points.len() < 4 || points.len() % 3 != 1 {
            return Err(CurveError::InvalidPointCount(points.len()));
        }
        let expected = (points.len() - 1) / 3 + 1;
        if modes.len() != expected {
            return Err(CurveError::ModeCountMismatch {
                expected,
                found: modes.len(),
            });
        }
        Ok(Self { points, modes })
    }

    pub fn segment_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn modes(&self) -> &[ControlPointMode] {
        &self.modes
    }

    pub fn point(&self, index: usize) -> CurveResult<Vec3> {
        self.points
            .get(index)
            .copied()
            .ok_or(CurveError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
    }

    pub fn first(&self) -> Vec3 {
        self.points[0]
    }

    pub fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.points.len() - 1
    }

    /// Maps a global t onto the index of the first point of a segment and the local parameter
    /// within that segment. t >= 1 maps to the end of the last segment.
    fn locate(&self, t: f32) -> (usize, f32) {
        if t >= 1.0 {
            return (self.points.len() - 4, 1.0);
        }
        let t = t.clamp(0.0, 1.0) * self.segment_count() as f32;
        let i = t as usize;
        (i * 3, t - i as f32)
    }

    /// Evaluates the position of the spline at t in [0, 1].
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let (i, u) = self.locate(t);
        cubic_pos(&self.points[i..i + 4], u)
    }

    /// The first derivative of the spline with respect to the local segment parameter.
    pub fn velocity(&self, t: f32) -> Vec3 {
        let (i, u) = self.locate(t);
        cubic_velocity(&self.points[i..i + 4], u)
    }

    /// The normalized direction of the spline at t. Coincident control points give a zero
    /// velocity, in which case the zero vector is returned.
    pub fn tangent(&self, t: f32) -> Vec3 {
        self.velocity(t).normalize_or_zero()
    }

    /// The position of the spline at t together with its direction in the xz plane.
    pub fn loc(&self, t: f32) -> Loc {
        Loc::new(self.evaluate(t), self.tangent(t).into())
    }

    /// Moves a control point. Moving a joint drags its handles along by the same offset, after
    /// which the constraint of the joint's mode is enforced.
    pub fn set_control_point(&mut self, index: usize, point: Vec3) -> CurveResult<()> {
        let old = self.point(index)?;
        if index % 3 == 0 {
            let delta = point - old;
            if index > 0 {
                self.points[index - 1] += delta;
            }
            if index + 1 < self.points.len() {
                self.points[index + 1] += delta;
            }
        }
        self.points[index] = point;
        self.enforce_mode(index);
        Ok(())
    }

    pub fn mode(&self, index: usize) -> CurveResult<ControlPointMode> {
        self.point(index)?;
        Ok(self.modes[(index + 1) / 3])
    }

    pub fn set_mode(&mut self, index: usize, mode: ControlPointMode) -> CurveResult<()> {
        self.point(index)?;
        self.modes[(index + 1) / 3] = mode;
        self.enforce_mode(index);
        Ok(())
    }

    /// Adds a segment of three new points continuing the spline along its end direction, with
    /// `spacing` between consecutive points. The new joint inherits the mode of its neighbour.
    pub fn append_segment(&mut self, at_positive: bool, spacing: f32) {
        if at_positive {
            let start = self.first();
            let dir = self.tangent(0.0);
            let mut points: Vec<Vec3> = [3.0, 2.0, 1.0]
                .map(|k| start - dir * (spacing * k))
                .to_vec();
            points.append(&mut self.points);
            self.points = points;
            self.modes.insert(0, self.modes[0]);
            self.enforce_mode(4);
        } else {
            let end = self.last();
            let dir = self.tangent(1.0);
            self.points
                .extend([1.0, 2.0, 3.0].map(|k| end + dir * (spacing * k)));
            self.modes.push(self.modes[self.modes.len() - 1]);
            self.enforce_mode(self.points.len() - 5);
        }
    }

    /// Removes the segment at the given end. Returns false and leaves the spline unchanged if only
    /// one segment remains.
    pub fn remove_segment(&mut self, at_positive: bool) -> bool {
        if self.points.len() <= 4 {
            return false;
        }
        if at_positive {
            self.points.drain(0..3);
            self.modes.remove(0);
        } else {
            self.points.truncate(self.points.len() - 3);
            self.modes.pop();
        }
        true
    }

    /// Re-derives the handle opposite of `index` around its joint such that the joint's mode holds.
    /// The handle on the side of `index` is kept fixed. End joints are never constrained.
    fn enforce_mode(&mut self, index: usize) {
        let mode_index = (index + 1) / 3;
        let mode = self.modes[mode_index];
        if mode == ControlPointMode::Free || mode_index == 0 || mode_index == self.modes.len() - 1
        {
            return;
        }

        let middle_index = mode_index * 3;
        let (fixed_index, enforced_index) = if index <= middle_index {
            (middle_index - 1, middle_index + 1)
        } else {
            (middle_index + 1, middle_index - 1)
        };

        let middle = self.points[middle_index];
        let mut enforced_tangent = middle - self.points[fixed_index];
        if mode == ControlPointMode::Aligned {
            let length = middle.distance(self.points[enforced_index]);
            enforced_tangent = enforced_tangent.normalize_or_zero() * length;
        }
        self.points[enforced_index] = middle + enforced_tangent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utils::math::approx_eq;

    fn two_segment(mode: ControlPointMode) -> Spline {
        Spline::from_parts(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(6.0, 0.0, 0.0),
            ],
            vec![ControlPointMode::Aligned, mode, ControlPointMode::Aligned],
        )
        .unwrap()
    }

    #[test]
    fn default_spline() {
        let spline = Spline::default();
        assert_eq!(spline.point_count(), 4);
        assert_eq!(spline.segment_count(), 1);
        assert_eq!(spline.first(), Vec3::new(-1.5, 0.0, 0.0));
        assert_eq!(spline.modes(), &[ControlPointMode::Aligned; 2]);
    }

    #[test]
    fn from_parts_rejects_bad_counts() {
        assert_eq!(
            Spline::from_parts(vec![Vec3::ZERO; 5], vec![ControlPointMode::Free; 2]),
            Err(CurveError::InvalidPointCount(5))
        );
        assert_eq!(
            Spline::from_parts(vec![Vec3::ZERO; 1], vec![]),
            Err(CurveError::InvalidPointCount(1))
        );
        assert_eq!(
            Spline::from_parts(vec![Vec3::ZERO; 7], vec![ControlPointMode::Free; 2]),
            Err(CurveError::ModeCountMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn evaluate_maps_global_t_onto_segments() {
        let spline = two_segment(ControlPointMode::Free);
        assert!(approx_eq(spline.evaluate(0.0), Vec3::ZERO));
        assert!(approx_eq(spline.evaluate(0.5), Vec3::new(3.0, 0.0, 0.0)));
        assert!(approx_eq(spline.evaluate(0.25), Vec3::new(1.5, 0.0, 0.0)));
        assert!(approx_eq(spline.evaluate(1.0), Vec3::new(6.0, 0.0, 0.0)));
        // out of range parameters are clamped
        assert!(approx_eq(spline.evaluate(-2.0), Vec3::ZERO));
        assert!(approx_eq(spline.evaluate(7.0), Vec3::new(6.0, 0.0, 0.0)));
        assert!(approx_eq(spline.tangent(1.0), Vec3::X));
    }

    #[test]
    fn straight_spline() {
        let spline = Spline::straight(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!(approx_eq(spline.evaluate(0.5), Vec3::new(5.0, 0.0, 0.0)));
        assert!(approx_eq(spline.tangent(0.0), Vec3::X));
        assert!(approx_eq(*spline.loc(0.3).dir, Vec3::X));
    }

    #[test]
    fn moving_a_joint_drags_its_handles() {
        let mut spline = two_segment(ControlPointMode::Free);
        spline
            .set_control_point(3, Vec3::new(3.0, 0.0, 2.0))
            .unwrap();
        assert_eq!(spline.points()[2], Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(spline.points()[4], Vec3::new(4.0, 0.0, 2.0));
        assert_eq!(spline.points()[1], Vec3::new(1.0, 0.0, 0.0));

        // an end point only has one handle
        spline.set_control_point(0, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert_eq!(spline.points()[1], Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn index_out_of_range_is_rejected_without_mutation() {
        let mut spline = Spline::default();
        let before = spline.clone();
        assert_eq!(
            spline.set_control_point(4, Vec3::ONE),
            Err(CurveError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(spline, before);
        assert!(spline.set_mode(9, ControlPointMode::Free).is_err());
    }

    #[test]
    fn aligned_joint_keeps_handle_lengths() {
        let mut spline = two_segment(ControlPointMode::Aligned);
        spline
            .set_control_point(2, Vec3::new(2.0, 0.0, -1.0))
            .unwrap();
        let points = spline.points();
        let before = points[3] - points[2];
        let after = points[4] - points[3];
        assert!(before.normalize().abs_diff_eq(after.normalize(), 1e-5));
        assert!((after.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn mirrored_joint_mirrors_handles() {
        let mut spline = two_segment(ControlPointMode::Mirrored);
        spline
            .set_control_point(4, Vec3::new(5.0, 1.0, 2.0))
            .unwrap();
        let points = spline.points();
        let before = points[3] - points[2];
        let after = points[4] - points[3];
        assert!(before.abs_diff_eq(after, 1e-5));
    }

    #[test]
    fn changing_the_mode_enforces_it() {
        let mut spline = two_segment(ControlPointMode::Free);
        spline
            .set_control_point(4, Vec3::new(3.0, 0.0, 3.0))
            .unwrap();
        spline.set_mode(2, ControlPointMode::Mirrored).unwrap();
        let points = spline.points();
        assert!((points[3] - points[2]).abs_diff_eq(points[4] - points[3], 1e-5));
        assert_eq!(spline.mode(3).unwrap(), ControlPointMode::Mirrored);
    }

    #[test]
    fn append_and_remove_keep_the_point_count_invariant() {
        let mut spline = Spline::straight(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0));
        let ops = [true, false, false, true, false];
        for &at_positive in ops.iter() {
            spline.append_segment(at_positive, 2.0);
            assert_eq!(spline.point_count() % 3, 1);
            assert_eq!(spline.modes().len(), spline.segment_count() + 1);
        }
        assert_eq!(spline.segment_count(), 6);
        for &at_positive in ops.iter().chain(ops.iter()) {
            spline.remove_segment(at_positive);
            assert_eq!(spline.point_count() % 3, 1);
            assert!(spline.point_count() >= 4);
            assert_eq!(spline.modes().len(), spline.segment_count() + 1);
        }
        assert_eq!(spline.segment_count(), 1);
        assert!(!spline.remove_segment(true));
        assert_eq!(spline.point_count(), 4);
    }

    #[test]
    fn appended_points_continue_the_end_direction() {
        let mut spline = Spline::straight(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0));
        spline.append_segment(false, 2.0);
        assert!(approx_eq(spline.last(), Vec3::new(9.0, 0.0, 0.0)));

        spline.append_segment(true, 1.0);
        assert!(approx_eq(spline.first(), Vec3::new(-3.0, 0.0, 0.0)));
        // the old start is renumbered
        assert!(approx_eq(spline.points()[3], Vec3::ZERO));
        assert!(approx_eq(spline.tangent(0.0), Vec3::X));
    }
}
