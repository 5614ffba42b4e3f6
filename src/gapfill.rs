use serde::Serialize;

/// One point of the line series the chart renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinePoint {
    pub time: i64,
    pub value: f64,
}

/// Flat-forward fill: synthesize a point at every missing interval
/// boundary between adjacent inputs, carrying the earlier point's value.
/// Not interpolation — the line stays flat until the next real point.
///
/// Input is sorted defensively. Fewer than two points come back unchanged;
/// first and last points are always preserved verbatim.
pub fn fill_gaps(mut points: Vec<LinePoint>, interval: i64) -> Vec<LinePoint> {
    if points.len() < 2 {
        return points;
    }
    points.sort_by_key(|p| p.time);

    let mut filled = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        filled.push(current);

        let missing = (next.time - current.time) / interval - 1;
        for j in 1..=missing {
            filled.push(LinePoint {
                time: current.time + j * interval,
                value: current.value,
            });
        }
    }
    filled.push(points[points.len() - 1]);

    filled
}
