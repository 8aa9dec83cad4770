//! Screen-space projection of surviving node coordinates
//!
//! Longitude maps linearly onto `[0, width]`, latitude onto `[height, 0]`
//! so that increasing screen Y moves south.

use crate::core::error::{Axis, Error, Result};

pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;

/// Pixel canvas the coordinates are normalized into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
        }
    }
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOption(format!(
                    "canvas {name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Min/max extent of a set of (lon, lat) points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    /// Returns `None` for an empty point set
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (lon, lat) = iter.next()?;
        let mut bbox = Self {
            lon_min: lon,
            lon_max: lon,
            lat_min: lat,
            lat_max: lat,
        };
        for (lon, lat) in iter {
            bbox.lon_min = bbox.lon_min.min(lon);
            bbox.lon_max = bbox.lon_max.max(lon);
            bbox.lat_min = bbox.lat_min.min(lat);
            bbox.lat_max = bbox.lat_max.max(lat);
        }
        Some(bbox)
    }

    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Fails if either axis has zero or non-finite extent, longitude first
    pub fn ensure_non_degenerate(&self) -> Result<()> {
        let axes = [
            (Axis::Longitude, self.lon_span(), self.lon_min),
            (Axis::Latitude, self.lat_span(), self.lat_min),
        ];
        for (axis, span, min) in axes {
            if span == 0.0 {
                return Err(Error::DegenerateRange { axis, value: min });
            }
            if !span.is_finite() {
                return Err(Error::UnboundedRange { axis, span });
            }
        }
        Ok(())
    }
}

/// Project (lon, lat) points onto the canvas, returning (POS_X, POS_Y)
pub fn project(coords: &[(f64, f64)], canvas: &Canvas) -> Result<(Vec<f64>, Vec<f64>)> {
    canvas.validate()?;

    // min/max skip NaN, so the bounding box alone cannot catch it
    for &(lon, lat) in coords {
        for (axis, value) in [(Axis::Longitude, lon), (Axis::Latitude, lat)] {
            if !value.is_finite() {
                return Err(Error::UnboundedRange { axis, span: value });
            }
        }
    }

    let Some(bbox) = BoundingBox::from_points(coords.iter().copied()) else {
        return Ok((Vec::new(), Vec::new()));
    };
    bbox.ensure_non_degenerate()?;

    let lon_span = bbox.lon_span();
    let lat_span = bbox.lat_span();

    let pos_x = coords
        .iter()
        .map(|&(lon, _)| (lon - bbox.lon_min) / lon_span * canvas.width)
        .collect();
    let pos_y = coords
        .iter()
        .map(|&(_, lat)| (bbox.lat_max - lat) / lat_span * canvas.height)
        .collect();

    Ok((pos_x, pos_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_canvas_edges() {
        let coords = [(-71.6, -16.5), (-71.4, -16.3)];
        let (xs, ys) = project(&coords, &Canvas::default()).unwrap();

        assert_eq!(xs, vec![0.0, 1200.0]);
        // South-west corner sits at the bottom of the canvas
        assert_eq!(ys, vec![800.0, 0.0]);
    }

    #[test]
    fn test_midpoint_projects_to_center() {
        let coords = [(0.0, 0.0), (2.0, 2.0), (1.0, 1.0)];
        let (xs, ys) = project(&coords, &Canvas::new(100.0, 50.0).unwrap()).unwrap();

        assert!((xs[2] - 50.0).abs() < 1e-9);
        assert!((ys[2] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_longitude_span_is_rejected() {
        let coords = [(5.0, 1.0), (5.0, 2.0)];
        let err = project(&coords, &Canvas::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateRange {
                axis: Axis::Longitude,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_latitude_span_is_rejected() {
        let coords = [(1.0, 7.0), (2.0, 7.0)];
        let err = project(&coords, &Canvas::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::DegenerateRange {
                axis: Axis::Latitude,
                ..
            }
        ));
    }

    #[test]
    fn test_overflowing_longitude_span_is_rejected() {
        let coords = [(-1.7e308, 0.0), (1.7e308, 1.0), (0.0, 2.0)];
        let err = project(&coords, &Canvas::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnboundedRange {
                axis: Axis::Longitude,
                ..
            }
        ));
    }

    #[test]
    fn test_nan_coordinate_is_rejected() {
        let coords = [(0.0, 0.0), (1.0, f64::NAN), (2.0, 2.0)];
        let err = project(&coords, &Canvas::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::UnboundedRange {
                axis: Axis::Latitude,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_input_projects_to_nothing() {
        let (xs, ys) = project(&[], &Canvas::default()).unwrap();
        assert!(xs.is_empty() && ys.is_empty());
    }

    #[test]
    fn test_invalid_canvas() {
        assert!(Canvas::new(0.0, 800.0).is_err());
        assert!(Canvas::new(1200.0, f64::NAN).is_err());
        assert!(Canvas::new(-1.0, 1.0).is_err());
    }

    #[test]
    fn test_bounding_box_tracks_extremes() {
        let bbox = BoundingBox::from_points([(3.0, -1.0), (-2.0, 4.0), (0.5, 0.5)]).unwrap();
        assert_eq!(bbox.lon_min, -2.0);
        assert_eq!(bbox.lon_max, 3.0);
        assert_eq!(bbox.lat_min, -1.0);
        assert_eq!(bbox.lat_max, 4.0);
    }
}
