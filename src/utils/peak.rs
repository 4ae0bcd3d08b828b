use crate::float::Float;

struct Point<T: Float> {
    x: T,
    y: T,
}

/// Find the first index (ignoring index 0) where `arr` drops below `threshold`,
/// then walk forward while the values keep decreasing so the returned index
/// sits at the bottom of that dip.
pub fn find_dip<T: Float>(arr: &[T], threshold: T) -> Option<usize> {
    let start = arr
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, &val)| val < threshold)
        .map(|(idx, _)| idx)?;

    let mut idx = start;
    while idx + 1 < arr.len() && arr[idx + 1] < arr[idx] {
        idx += 1;
    }
    Some(idx)
}

/// Refine the location of the extremum at `idx` and return `(position, value)`.
/// The correction is skipped at the edges of `data` and when the three
/// points are collinear.
pub fn correct_dip<T: Float>(idx: usize, data: &[T]) -> (T, T) {
    let unrefined = (T::from_usize(idx).unwrap(), data[idx]);
    if idx == 0 || idx + 1 >= data.len() {
        return unrefined;
    }
    let (left, center, right) = (data[idx - 1], data[idx], data[idx + 1]);
    if T::from_f64(2.0).unwrap() * center - left - right == T::zero() {
        return unrefined;
    }
    let point = quadratic_interpolation(
        Point {
            x: T::from_usize(idx - 1).unwrap(),
            y: left,
        },
        Point {
            x: unrefined.0,
            y: center,
        },
        Point {
            x: T::from_usize(idx + 1).unwrap(),
            y: right,
        },
    );
    (point.x, point.y)
}

/// Vertex of the parabola through three equally spaced points.
fn quadratic_interpolation<T: Float>(
    left: Point<T>,
    center: Point<T>,
    right: Point<T>,
) -> Point<T> {
    let shift = T::from_f64(0.5).unwrap() * (right.y - left.y)
        / (T::from_f64(2.0).unwrap() * center.y - left.y - right.y);
    let x = center.x + shift;
    let y = center.y + T::from_f64(0.25).unwrap() * (right.y - left.y) * shift;
    Point { x, y }
}
