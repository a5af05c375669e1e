//! Motion regions traced from a binary mask.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use serde::Serialize;

/// Axis-aligned bounding box in pixel coordinates. Sizes are inclusive of
/// both edge pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One connected patch of motion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionRegion {
    /// Polygon area enclosed by the traced contour.
    pub area: f64,

    pub bounds: BoundingBox,

    /// Centroid from the contour moments. `None` when the contour encloses
    /// no area (a line or a single pixel).
    pub centroid: Option<(i32, i32)>,
}

impl MotionRegion {
    /// Build a region from a closed contour. Returns `None` for an empty
    /// point list.
    pub fn from_contour(points: &[Point<i32>]) -> Option<Self> {
        let first = points.first()?;

        let (mut min_x, mut min_y) = (first.x, first.y);
        let (mut max_x, mut max_y) = (first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        // Green's theorem over the polygon: twice the signed area plus the
        // first-order moments.
        let mut area2 = 0.0_f64;
        let mut m10_6 = 0.0_f64;
        let mut m01_6 = 0.0_f64;
        for (i, p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            let (px, py) = (p.x as f64, p.y as f64);
            let (qx, qy) = (q.x as f64, q.y as f64);
            let cross = px * qy - qx * py;
            area2 += cross;
            m10_6 += (px + qx) * cross;
            m01_6 += (py + qy) * cross;
        }

        let m00 = area2 / 2.0;
        let centroid = if m00 != 0.0 {
            let cx = m10_6 / 6.0 / m00;
            let cy = m01_6 / 6.0 / m00;
            Some((cx as i32, cy as i32))
        } else {
            None
        };

        Some(Self {
            area: m00.abs(),
            bounds: BoundingBox {
                x: min_x.max(0) as u32,
                y: min_y.max(0) as u32,
                width: (max_x - min_x + 1) as u32,
                height: (max_y - min_y + 1) as u32,
            },
            centroid,
        })
    }

    /// Whether this region is large enough to count as motion.
    pub fn is_significant(&self, min_area: f64) -> bool {
        self.area >= min_area
    }
}

/// Trace the outermost contours of `mask` (nonzero = foreground).
///
/// Contours nested inside holes of another region are not reported.
pub fn external_regions(mask: &GrayImage) -> Vec<MotionRegion> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| MotionRegion::from_contour(&c.points))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rect_contour(x: i32, y: i32, w: i32, h: i32) -> Vec<Point<i32>> {
        vec![
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ]
    }

    #[test]
    fn rectangle_area_and_centroid() {
        let region = MotionRegion::from_contour(&rect_contour(0, 0, 35, 20)).unwrap();
        assert_eq!(region.area, 700.0);
        assert_eq!(region.centroid, Some((17, 10)));
        assert_eq!(region.bounds.width, 36);
        assert_eq!(region.bounds.height, 21);
    }

    #[test]
    fn winding_direction_does_not_change_area() {
        let mut points = rect_contour(10, 10, 20, 30);
        let forward = MotionRegion::from_contour(&points).unwrap();
        points.reverse();
        let backward = MotionRegion::from_contour(&points).unwrap();
        assert_eq!(forward.area, backward.area);
        assert_eq!(forward.centroid, backward.centroid);
    }

    #[test]
    fn area_threshold_is_inclusive() {
        let at_floor = MotionRegion::from_contour(&rect_contour(0, 0, 35, 20)).unwrap();
        let below_floor = MotionRegion::from_contour(&rect_contour(0, 0, 699, 1)).unwrap();
        assert_eq!(below_floor.area, 699.0);
        assert!(at_floor.is_significant(700.0));
        assert!(!below_floor.is_significant(700.0));
    }

    #[test]
    fn degenerate_contour_has_no_centroid() {
        let line = vec![Point::new(3, 4), Point::new(9, 4)];
        let region = MotionRegion::from_contour(&line).unwrap();
        assert_eq!(region.area, 0.0);
        assert_eq!(region.centroid, None);
        assert_eq!(region.bounds.y, 4);
        assert!(MotionRegion::from_contour(&[]).is_none());
    }

    #[test]
    fn nested_blob_is_not_reported() {
        // Hollow square with a dot in its hole.
        let mut mask = GrayImage::new(40, 40);
        for i in 5..35 {
            for t in 0..3 {
                mask.put_pixel(i, 5 + t, Luma([255]));
                mask.put_pixel(i, 32 + t, Luma([255]));
                mask.put_pixel(5 + t, i, Luma([255]));
                mask.put_pixel(32 + t, i, Luma([255]));
            }
        }
        for x in 18..22 {
            for y in 18..22 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        let regions = external_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bounds.x, 5);
        assert_eq!(regions[0].bounds.y, 5);
    }

    #[test]
    fn empty_mask_has_no_regions() {
        assert!(external_regions(&GrayImage::new(16, 16)).is_empty());
    }
}
