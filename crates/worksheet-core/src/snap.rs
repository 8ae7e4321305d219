//! Angle snapping and alignment guides.

use kurbo::Rect;

/// Angle snap increment in degrees.
pub const ANGLE_SNAP_INCREMENT: f64 = 15.0;

/// Snap an angle to the nearest increment.
/// Returns the snapped angle in degrees (0-360).
pub fn snap_angle(angle_degrees: f64, increment: f64) -> f64 {
    let snapped = (angle_degrees / increment).round() * increment;
    snapped.rem_euclid(360.0)
}

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideAxis {
    /// A vertical line at some x.
    Vertical,
    /// A horizontal line at some y.
    Horizontal,
}

/// Which feature of the moving box lines up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideKind {
    /// Left or top edge.
    Start,
    /// Horizontal or vertical center.
    Center,
    /// Right or bottom edge.
    End,
}

/// A candidate alignment between the moving selection and another element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentGuide {
    pub axis: GuideAxis,
    /// Coordinate of the guide line on the other element.
    pub position: f64,
    pub kind: GuideKind,
    /// Remaining gap between the moving feature and the guide.
    pub distance: f64,
}

fn features(lo: f64, hi: f64) -> [(GuideKind, f64); 3] {
    [
        (GuideKind::Start, lo),
        (GuideKind::Center, (lo + hi) / 2.0),
        (GuideKind::End, hi),
    ]
}

/// Guides between `moving` and each of `others` within `threshold`.
///
/// At most one guide is reported per axis and position; the closest wins.
/// Results are ordered by distance.
pub fn alignment_guides(moving: Rect, others: &[Rect], threshold: f64) -> Vec<AlignmentGuide> {
    let mut guides: Vec<AlignmentGuide> = Vec::new();
    let mut consider = |axis: GuideAxis, ours: [(GuideKind, f64); 3], theirs: [(GuideKind, f64); 3]| {
        for (kind, value) in ours {
            for (_, target) in theirs {
                let distance = (value - target).abs();
                if distance > threshold {
                    continue;
                }
                let existing = guides
                    .iter_mut()
                    .find(|g| g.axis == axis && (g.position - target).abs() < f64::EPSILON);
                match existing {
                    Some(g) if g.distance <= distance => {}
                    Some(g) => {
                        g.kind = kind;
                        g.distance = distance;
                    }
                    None => guides.push(AlignmentGuide {
                        axis,
                        position: target,
                        kind,
                        distance,
                    }),
                }
            }
        }
    };

    let moving = moving.abs();
    for other in others.iter().map(|r| r.abs()) {
        consider(
            GuideAxis::Vertical,
            features(moving.x0, moving.x1),
            features(other.x0, other.x1),
        );
        consider(
            GuideAxis::Horizontal,
            features(moving.y0, moving.y1),
            features(other.y0, other.y1),
        );
    }
    guides.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    guides
}
