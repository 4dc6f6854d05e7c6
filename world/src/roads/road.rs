use curves::Spline;
use utils::id::UniqueId;
use world_api::{Port, RemoteRef, RoadEnd, RoadParams, SnapPoint};

use super::Connectable;

/// A road is a spline in world space together with the parameters of its cross section. Its two
/// ends are polar endpoints, the positive end at the start of the spline and the negative end at
/// its end.
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    unique_id: UniqueId,
    spline: Spline,
    params: RoadParams,
    positive: Option<RemoteRef>,
    negative: Option<RemoteRef>,
}

impl Road {
    pub fn new(unique_id: UniqueId, spline: Spline, params: RoadParams) -> Self {
        Self {
            unique_id,
            spline,
            params: params.clamped(),
            positive: None,
            negative: None,
        }
    }

    pub fn spline(&self) -> &Spline {
        &self.spline
    }

    pub fn spline_mut(&mut self) -> &mut Spline {
        &mut self.spline
    }

    pub fn params(&self) -> &RoadParams {
        &self.params
    }

    pub fn set_params(&mut self, params: RoadParams) {
        self.params = params.clamped();
    }

    /// Index of the control point at the given end.
    pub fn end_index(&self, end: RoadEnd) -> usize {
        match end {
            RoadEnd::Positive => 0,
            RoadEnd::Negative => self.spline.last_index(),
        }
    }

    /// Index of the handle next to the control point at the given end.
    pub fn adjacent_index(&self, end: RoadEnd) -> usize {
        match end {
            RoadEnd::Positive => 1,
            RoadEnd::Negative => self.spline.last_index() - 1,
        }
    }

    /// Returns the end at the given control point index, if it is one of the two ends.
    pub fn end_at(&self, index: usize) -> Option<RoadEnd> {
        if index == 0 {
            Some(RoadEnd::Positive)
        } else if index == self.spline.last_index() {
            Some(RoadEnd::Negative)
        } else {
            None
        }
    }

    /// The endpoint at the given end. Its forward points away from the road.
    pub fn end_snap_point(&self, end: RoadEnd) -> SnapPoint {
        let (pos, forward) = match end {
            RoadEnd::Positive => (self.spline.first(), -self.spline.tangent(0.0)),
            RoadEnd::Negative => (self.spline.last(), self.spline.tangent(1.0)),
        };
        SnapPoint::new(pos, forward.into(), end.polarity(), self.params.width)
    }

    pub fn connection_at(&self, end: RoadEnd) -> Option<&RemoteRef> {
        match end {
            RoadEnd::Positive => self.positive.as_ref(),
            RoadEnd::Negative => self.negative.as_ref(),
        }
    }
}

impl Connectable for Road {
    fn unique_id(&self) -> &UniqueId {
        &self.unique_id
    }

    fn ports(&self) -> Vec<Port> {
        vec![RoadEnd::Positive.into(), RoadEnd::Negative.into()]
    }

    fn snap_point(&self, port: Port) -> Option<SnapPoint> {
        match port {
            Port::End(end) => Some(self.end_snap_point(end)),
            Port::Slot(_) => None,
        }
    }

    fn remote(&self, port: Port) -> Option<&RemoteRef> {
        match port {
            Port::End(end) => self.connection_at(end),
            Port::Slot(_) => None,
        }
    }

    fn set_remote(&mut self, port: Port, remote: Option<RemoteRef>) -> bool {
        match port {
            Port::End(RoadEnd::Positive) => self.positive = remote,
            Port::End(RoadEnd::Negative) => self.negative = remote,
            Port::Slot(_) => return false,
        }
        true
    }
}
