//! Orthogonal routing of relationship paths.
//!
//! A path leaves the source from the side facing the target, steps out by the
//! routing margin, bends at most twice, and enters the target from the facing
//! side. All coordinates are absolute diagram coordinates.

use crate::{
    geometry::{Bounds, Point},
    relationship::Direction,
};

/// Default distance a path steps away from an element before bending.
pub const DEFAULT_ROUTING_MARGIN: f32 = 20.0;

/// A routed path and the sides it attaches to.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub source_direction: Direction,
    pub target_direction: Direction,
    pub path: Vec<Point>,
}

/// Midpoint of the side of `bounds` facing `direction`.
pub fn side_midpoint(bounds: Bounds, direction: Direction) -> Point {
    let center = bounds.center();
    match direction {
        Direction::Up => center.with_y(bounds.min_y()),
        Direction::Right => center.with_x(bounds.max_x()),
        Direction::Down => center.with_y(bounds.max_y()),
        Direction::Left => center.with_x(bounds.min_x()),
    }
}

fn step(point: Point, direction: Direction, distance: f32) -> Point {
    match direction {
        Direction::Up => point.with_y(point.y() - distance),
        Direction::Right => point.with_x(point.x() + distance),
        Direction::Down => point.with_y(point.y() + distance),
        Direction::Left => point.with_x(point.x() - distance),
    }
}

/// Picks the facing sides of two rectangles.
///
/// The dominant axis of the center-to-center vector decides between a
/// horizontal and a vertical connection.
pub fn facing_directions(source: Bounds, target: Bounds) -> (Direction, Direction) {
    let delta = target.center().sub_point(source.center());
    let source_direction = if delta.x().abs() >= delta.y().abs() {
        if delta.x() >= 0.0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if delta.y() >= 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    (source_direction, source_direction.opposite())
}

/// Routes an orthogonal path between two absolute rectangles.
///
/// # Examples
///
/// ```
/// # use trellis_core::geometry::{Bounds, Point};
/// # use trellis_core::relationship::Direction;
/// # use trellis_core::routing::route;
/// let a = Bounds::new(0.0, 0.0, 100.0, 50.0);
/// let b = Bounds::new(300.0, 0.0, 100.0, 50.0);
///
/// let route = route(a, b, 20.0);
/// assert_eq!(route.source_direction, Direction::Right);
/// assert_eq!(route.path, vec![Point::new(100.0, 25.0), Point::new(300.0, 25.0)]);
/// ```
pub fn route(source: Bounds, target: Bounds, margin: f32) -> Route {
    let (source_direction, target_direction) = facing_directions(source, target);

    let start = side_midpoint(source, source_direction);
    let end = side_midpoint(target, target_direction);
    let start_stub = step(start, source_direction, margin);
    let end_stub = step(end, target_direction, margin);

    let mut points = vec![start, start_stub];
    if source_direction.is_horizontal() {
        let mid_x = (start_stub.x() + end_stub.x()) / 2.0;
        points.push(start_stub.with_x(mid_x));
        points.push(end_stub.with_x(mid_x));
    } else {
        let mid_y = (start_stub.y() + end_stub.y()) / 2.0;
        points.push(start_stub.with_y(mid_y));
        points.push(end_stub.with_y(mid_y));
    }
    points.push(end_stub);
    points.push(end);

    Route {
        source_direction,
        target_direction,
        path: simplify(points),
    }
}

/// Removes consecutive duplicates and points lying strictly on a straight
/// run between their neighbours.
fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if out.last() == Some(&point) {
            continue;
        }
        let redundant = match out.as_slice() {
            [.., a, b] => is_pass_through(*a, *b, point),
            _ => false,
        };
        if redundant {
            out.pop();
        }
        out.push(point);
    }
    out
}

fn is_pass_through(a: Point, b: Point, c: Point) -> bool {
    let ab = b.sub_point(a);
    let bc = c.sub_point(b);
    let same_line = (a.x() == b.x() && b.x() == c.x()) || (a.y() == b.y() && b.y() == c.y());
    same_line && ab.x() * bc.x() + ab.y() * bc.y() >= 0.0
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geometry::Insets;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -500.0f32..500.0,
            -500.0f32..500.0,
            1.0f32..200.0,
            1.0f32..200.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new(x, y, w, h))
    }

    /// Every path point lies in the union of both rectangles expanded by the margin.
    fn check_path_within_margin(
        source: Bounds,
        target: Bounds,
        margin: f32,
    ) -> Result<(), TestCaseError> {
        let route = route(source, target, margin);
        let region = source
            .merge(&target)
            .add_padding(Insets::uniform(margin + 0.01));

        prop_assert!(route.path.len() >= 2);
        for point in &route.path {
            prop_assert!(region.contains_point(*point), "{point:?} outside {region:?}");
        }
        Ok(())
    }

    /// Consecutive path points differ and every segment is axis-aligned.
    fn check_path_is_orthogonal(source: Bounds, target: Bounds) -> Result<(), TestCaseError> {
        let route = route(source, target, DEFAULT_ROUTING_MARGIN);
        for pair in route.path.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
            prop_assert!(pair[0].x() == pair[1].x() || pair[0].y() == pair[1].y());
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn path_within_margin(
            source in bounds_strategy(),
            target in bounds_strategy(),
            margin in 0.0f32..50.0,
        ) {
            check_path_within_margin(source, target, margin)?;
        }

        #[test]
        fn path_is_orthogonal(source in bounds_strategy(), target in bounds_strategy()) {
            check_path_is_orthogonal(source, target)?;
        }
    }
}
