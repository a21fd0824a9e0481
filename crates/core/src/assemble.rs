//! Hierarchy row assembly.
//!
//! Turns a fully built hierarchy into one multi-column row per point: the
//! formatted point coordinate, one centroid column per level walked finest
//! to coarsest, and a closing sentinel column.

use crate::hierarchy::Hierarchy;
use crate::points::{Point, PointSet};

/// Literal marker appended as the last column of every row.
pub const ROW_SENTINEL: &str = "*";

/// Formats a coordinate pair with the given decimal accuracy, joining
/// latitude and longitude with `separator`.
pub fn format_coordinate(point: Point, accuracy: usize, separator: &str) -> String {
    format!(
        "{lat:.acc$}{sep}{lon:.acc$}",
        lat = point.lat,
        lon = point.lon,
        sep = separator,
        acc = accuracy
    )
}

/// Assembles one output row per point, in original input order.
///
/// Each row has `levels + 2` columns: the point itself, its centroid at
/// every level from finest to coarsest, and the sentinel terminator.
pub fn assemble_rows(
    points: &PointSet,
    hierarchy: &Hierarchy,
    accuracy: usize,
    separator: &str,
) -> Vec<Vec<String>> {
    let levels: Vec<_> = hierarchy.levels_fine_to_coarse().collect();

    (0..points.len())
        .map(|point_id| {
            let mut row = Vec::with_capacity(levels.len() + 2);
            row.push(format_coordinate(points[point_id], accuracy, separator));
            for level in &levels {
                row.push(format_coordinate(
                    level.centroid_of(point_id),
                    accuracy,
                    separator,
                ));
            }
            row.push(ROW_SENTINEL.to_string());
            row
        })
        .collect()
}
