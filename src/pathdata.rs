// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use kurbo::ParamCurveExtrema;

use crate::geom::{Rect, Transform};

/// A path's absolute segment.
///
/// Can contain only `M`, `L`, `C`, `Q`, `A` and `Z` segments.
/// All other SVG path commands are converted into these on parsing.
/// The same command letters are understood by the Android path-data
/// grammar, so arcs are preserved and not flattened on the happy path.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub enum PathSegment {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CurveTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    QuadTo {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    ArcTo {
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    ClosePath,
}

/// A path data container.
///
/// All segments are in absolute coordinates.
#[derive(Clone, Default, Debug)]
pub struct PathData(pub Vec<PathSegment>);

impl PathData {
    /// Creates a new path.
    #[inline]
    pub fn new() -> Self {
        PathData(Vec::new())
    }

    /// Creates a new path with a specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        PathData(Vec::with_capacity(capacity))
    }

    /// Pushes a MoveTo segment to the path.
    #[inline]
    pub fn push_move_to(&mut self, x: f64, y: f64) {
        self.push(PathSegment::MoveTo { x, y });
    }

    /// Pushes a LineTo segment to the path.
    #[inline]
    pub fn push_line_to(&mut self, x: f64, y: f64) {
        self.push(PathSegment::LineTo { x, y });
    }

    /// Pushes a CurveTo segment to the path.
    #[inline]
    pub fn push_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.push(PathSegment::CurveTo { x1, y1, x2, y2, x, y });
    }

    /// Pushes a QuadTo segment to the path.
    #[inline]
    pub fn push_quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.push(PathSegment::QuadTo { x1, y1, x, y });
    }

    /// Pushes an ArcTo segment to the path.
    #[inline]
    pub fn push_arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    ) {
        self.push(PathSegment::ArcTo {
            rx,
            ry,
            x_axis_rotation,
            large_arc,
            sweep,
            x,
            y,
        });
    }

    /// Pushes a ClosePath segment to the path.
    #[inline]
    pub fn push_close_path(&mut self) {
        self.push(PathSegment::ClosePath);
    }

    /// Applies the transform to the path.
    ///
    /// A pure translation moves segments as is. Any other transform
    /// first converts arcs into cubic curves, because an elliptical arc
    /// does not survive a general affine map.
    pub fn transform(&mut self, ts: Transform) {
        if ts.is_default() {
            return;
        }

        let has_arcs = self
            .iter()
            .any(|seg| matches!(seg, PathSegment::ArcTo { .. }));
        if has_arcs && !ts.is_translate() {
            self.convert_arcs_to_curves();
        }

        for seg in self.0.iter_mut() {
            match seg {
                PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => {
                    ts.apply_to(x, y);
                }
                PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                    ts.apply_to(x1, y1);
                    ts.apply_to(x2, y2);
                    ts.apply_to(x, y);
                }
                PathSegment::QuadTo { x1, y1, x, y } => {
                    ts.apply_to(x1, y1);
                    ts.apply_to(x, y);
                }
                PathSegment::ArcTo { x, y, .. } => {
                    // Only reachable for translations. Radii are unchanged.
                    ts.apply_to(x, y);
                }
                PathSegment::ClosePath => {}
            }
        }
    }

    /// Calculates path's bounding box.
    ///
    /// This operation is expensive.
    pub fn bbox(&self) -> Option<Rect> {
        let path;
        let segments = if self
            .iter()
            .any(|seg| matches!(seg, PathSegment::ArcTo { .. }))
        {
            let mut p = self.clone();
            p.convert_arcs_to_curves();
            path = p;
            &path.0
        } else {
            &self.0
        };

        if segments.is_empty() {
            return None;
        }

        let mut prev_x = 0.0;
        let mut prev_y = 0.0;
        let mut minx = 0.0;
        let mut miny = 0.0;
        let mut maxx = 0.0;
        let mut maxy = 0.0;

        if let PathSegment::MoveTo { x, y } = segments[0] {
            prev_x = x;
            prev_y = y;
            minx = x;
            miny = y;
            maxx = x;
            maxy = y;
        }

        for seg in segments.iter().cloned() {
            match seg {
                PathSegment::MoveTo { x, y } | PathSegment::LineTo { x, y } => {
                    prev_x = x;
                    prev_y = y;

                    if x > maxx {
                        maxx = x;
                    } else if x < minx {
                        minx = x;
                    }

                    if y > maxy {
                        maxy = y;
                    } else if y < miny {
                        miny = y;
                    }
                }
                PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                    let curve = kurbo::CubicBez::new(
                        kurbo::Point::new(prev_x, prev_y),
                        kurbo::Point::new(x1, y1),
                        kurbo::Point::new(x2, y2),
                        kurbo::Point::new(x, y),
                    );
                    let r = curve.bounding_box();

                    if r.x0 < minx {
                        minx = r.x0;
                    }
                    if r.x1 > maxx {
                        maxx = r.x1;
                    }
                    if r.y0 < miny {
                        miny = r.y0;
                    }
                    if r.y1 > maxy {
                        maxy = r.y1;
                    }

                    prev_x = x;
                    prev_y = y;
                }
                PathSegment::QuadTo { x1, y1, x, y } => {
                    let curve = kurbo::QuadBez::new(
                        kurbo::Point::new(prev_x, prev_y),
                        kurbo::Point::new(x1, y1),
                        kurbo::Point::new(x, y),
                    );
                    let r = curve.bounding_box();

                    if r.x0 < minx {
                        minx = r.x0;
                    }
                    if r.x1 > maxx {
                        maxx = r.x1;
                    }
                    if r.y0 < miny {
                        miny = r.y0;
                    }
                    if r.y1 > maxy {
                        maxy = r.y1;
                    }

                    prev_x = x;
                    prev_y = y;
                }
                PathSegment::ArcTo { .. } | PathSegment::ClosePath => {}
            }
        }

        let bbox = Rect::new(minx, miny, maxx - minx, maxy - miny);
        if bbox.width.is_finite() && bbox.height.is_finite() {
            Some(bbox)
        } else {
            None
        }
    }

    /// Converts all arc segments into cubic curves.
    fn convert_arcs_to_curves(&mut self) {
        let mut new_path = PathData::with_capacity(self.len());
        let mut prev_x = 0.0;
        let mut prev_y = 0.0;

        for seg in self.0.iter().cloned() {
            match seg {
                PathSegment::ArcTo {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    let svg_arc = kurbo::SvgArc {
                        from: kurbo::Point::new(prev_x, prev_y),
                        to: kurbo::Point::new(x, y),
                        radii: kurbo::Vec2::new(rx, ry),
                        x_rotation: x_axis_rotation.to_radians(),
                        large_arc,
                        sweep,
                    };

                    match kurbo::Arc::from_svg_arc(&svg_arc) {
                        Some(arc) => {
                            arc.to_cubic_beziers(0.1, |p1, p2, p| {
                                new_path.push_curve_to(p1.x, p1.y, p2.x, p2.y, p.x, p.y);
                            });
                        }
                        None => {
                            new_path.push_line_to(x, y);
                        }
                    }

                    prev_x = x;
                    prev_y = y;
                }
                seg => {
                    match seg {
                        PathSegment::MoveTo { x, y }
                        | PathSegment::LineTo { x, y }
                        | PathSegment::CurveTo { x, y, .. }
                        | PathSegment::QuadTo { x, y, .. } => {
                            prev_x = x;
                            prev_y = y;
                        }
                        _ => {}
                    }

                    new_path.push(seg);
                }
            }
        }

        *self = new_path;
    }
}

impl std::ops::Deref for PathData {
    type Target = Vec<PathSegment>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::DerefMut for PathData {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Parses an SVG `d` attribute into absolute, explicit segments.
///
/// Implicit commands, relative coordinates and `H`/`V`/`S`/`T` shorthands
/// are resolved here. Stops at the first invalid segment, keeping
/// everything parsed so far.
pub(crate) fn parse_path(text: &str) -> PathData {
    // Previous MoveTo coordinates.
    let mut prev_mx = 0.0;
    let mut prev_my = 0.0;

    // Previous SmoothQuadratic control point.
    let mut prev_tx = 0.0;
    let mut prev_ty = 0.0;

    // Previous coordinates.
    let mut prev_x = 0.0;
    let mut prev_y = 0.0;

    let mut prev_seg = svgtypes::PathSegment::MoveTo {
        abs: true,
        x: 0.0,
        y: 0.0,
    };

    let mut path = PathData::with_capacity(32);

    for segment in svgtypes::PathParser::from(text) {
        let segment = match segment {
            Ok(v) => v,
            Err(_) => break,
        };

        match segment {
            svgtypes::PathSegment::MoveTo { abs, mut x, mut y } => {
                if !abs {
                    // A relative 'm' is relative to the end of the previous
                    // subpath, not to the start of the document.
                    if let Some(PathSegment::ClosePath) = path.last() {
                        x += prev_mx;
                        y += prev_my;
                    } else {
                        x += prev_x;
                        y += prev_y;
                    }
                }

                path.push_move_to(x, y);
                prev_seg = segment;
            }
            svgtypes::PathSegment::LineTo { abs, mut x, mut y } => {
                if !abs {
                    x += prev_x;
                    y += prev_y;
                }

                path.push_line_to(x, y);
                prev_seg = segment;
            }
            svgtypes::PathSegment::HorizontalLineTo { abs, mut x } => {
                if !abs {
                    x += prev_x;
                }

                path.push_line_to(x, prev_y);
                prev_seg = segment;
            }
            svgtypes::PathSegment::VerticalLineTo { abs, mut y } => {
                if !abs {
                    y += prev_y;
                }

                path.push_line_to(prev_x, y);
                prev_seg = segment;
            }
            svgtypes::PathSegment::CurveTo {
                abs,
                mut x1,
                mut y1,
                mut x2,
                mut y2,
                mut x,
                mut y,
            } => {
                if !abs {
                    x1 += prev_x;
                    y1 += prev_y;
                    x2 += prev_x;
                    y2 += prev_y;
                    x += prev_x;
                    y += prev_y;
                }

                path.push_curve_to(x1, y1, x2, y2, x, y);

                // Remember as absolute.
                prev_seg = svgtypes::PathSegment::CurveTo {
                    abs: true,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                };
            }
            svgtypes::PathSegment::SmoothCurveTo {
                abs,
                mut x2,
                mut y2,
                mut x,
                mut y,
            } => {
                // 'The first control point is assumed to be the reflection
                // of the second control point on the previous command
                // relative to the current point.'
                let (x1, y1) = match prev_seg {
                    svgtypes::PathSegment::CurveTo { x2, y2, x, y, .. }
                    | svgtypes::PathSegment::SmoothCurveTo { x2, y2, x, y, .. } => {
                        (x * 2.0 - x2, y * 2.0 - y2)
                    }
                    _ => (prev_x, prev_y),
                };

                if !abs {
                    x2 += prev_x;
                    y2 += prev_y;
                    x += prev_x;
                    y += prev_y;
                }

                path.push_curve_to(x1, y1, x2, y2, x, y);

                // Remember as absolute.
                prev_seg = svgtypes::PathSegment::SmoothCurveTo { abs: true, x2, y2, x, y };
            }
            svgtypes::PathSegment::Quadratic {
                abs,
                mut x1,
                mut y1,
                mut x,
                mut y,
            } => {
                if !abs {
                    x1 += prev_x;
                    y1 += prev_y;
                    x += prev_x;
                    y += prev_y;
                }

                path.push_quad_to(x1, y1, x, y);

                // Remember as absolute.
                prev_seg = svgtypes::PathSegment::Quadratic { abs: true, x1, y1, x, y };
            }
            svgtypes::PathSegment::SmoothQuadratic { abs, mut x, mut y } => {
                // 'The control point is assumed to be the reflection of
                // the control point on the previous command relative to
                // the current point.'
                let (x1, y1) = match prev_seg {
                    svgtypes::PathSegment::Quadratic { x1, y1, x, y, .. } => {
                        (x * 2.0 - x1, y * 2.0 - y1)
                    }
                    svgtypes::PathSegment::SmoothQuadratic { x, y, .. } => {
                        (x * 2.0 - prev_tx, y * 2.0 - prev_ty)
                    }
                    _ => (prev_x, prev_y),
                };

                prev_tx = x1;
                prev_ty = y1;

                if !abs {
                    x += prev_x;
                    y += prev_y;
                }

                path.push_quad_to(x1, y1, x, y);

                // Remember as absolute.
                prev_seg = svgtypes::PathSegment::SmoothQuadratic { abs: true, x, y };
            }
            svgtypes::PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                mut x,
                mut y,
            } => {
                if !abs {
                    x += prev_x;
                    y += prev_y;
                }

                path.push_arc_to(rx, ry, x_axis_rotation, large_arc, sweep, x, y);
                prev_seg = segment;
            }
            svgtypes::PathSegment::ClosePath { .. } => {
                if let Some(PathSegment::ClosePath) = path.last() {
                    // Do not add sequential ClosePath segments.
                } else {
                    path.push_close_path();
                }

                prev_seg = segment;
            }
        }

        // Remember last position.
        if let Some(seg) = path.last() {
            match *seg {
                PathSegment::MoveTo { x, y } => {
                    prev_x = x;
                    prev_y = y;
                    prev_mx = x;
                    prev_my = y;
                }
                PathSegment::LineTo { x, y }
                | PathSegment::CurveTo { x, y, .. }
                | PathSegment::QuadTo { x, y, .. }
                | PathSegment::ArcTo { x, y, .. } => {
                    prev_x = x;
                    prev_y = y;
                }
                PathSegment::ClosePath => {
                    // ClosePath moves the pen back to the subpath start.
                    prev_x = prev_mx;
                    prev_y = prev_my;
                }
            }
        }
    }

    // A path must start with a MoveTo, otherwise it's invalid.
    if matches!(path.first(), Some(PathSegment::MoveTo { .. })) {
        path
    } else {
        PathData::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg_end(seg: &PathSegment) -> Option<(f64, f64)> {
        match *seg {
            PathSegment::MoveTo { x, y }
            | PathSegment::LineTo { x, y }
            | PathSegment::CurveTo { x, y, .. }
            | PathSegment::QuadTo { x, y, .. }
            | PathSegment::ArcTo { x, y, .. } => Some((x, y)),
            PathSegment::ClosePath => None,
        }
    }

    #[test]
    fn relative_to_absolute() {
        let path = parse_path("m 10 20 l 10 0 v 5 h -10 z");
        let ends: Vec<_> = path.iter().filter_map(seg_end).collect();
        assert_eq!(ends, vec![(10.0, 20.0), (20.0, 20.0), (20.0, 25.0), (10.0, 25.0)]);
        assert!(matches!(path.last(), Some(PathSegment::ClosePath)));
    }

    #[test]
    fn smooth_curve_reflection() {
        let path = parse_path("M 0 0 C 10 0 20 10 30 10 S 50 20 60 20");
        match path[2] {
            PathSegment::CurveTo { x1, y1, .. } => {
                assert_eq!((x1, y1), (40.0, 10.0));
            }
            _ => panic!("expected a CurveTo"),
        }
    }

    #[test]
    fn must_start_with_move_to() {
        assert!(parse_path("L 10 10").is_empty());
    }

    #[test]
    fn translate_keeps_arcs() {
        let mut path = parse_path("M 0 0 A 5 5 0 0 1 10 0");
        path.transform(Transform::new_translate(2.0, 3.0));
        match path[1] {
            PathSegment::ArcTo { rx, ry, x, y, .. } => {
                assert_eq!((rx, ry), (5.0, 5.0));
                assert_eq!((x, y), (12.0, 3.0));
            }
            _ => panic!("expected an ArcTo"),
        }
    }

    #[test]
    fn scale_flattens_arcs() {
        let mut path = parse_path("M 0 0 A 5 5 0 0 1 10 0");
        path.transform(Transform::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0));
        assert!(!path
            .iter()
            .any(|seg| matches!(seg, PathSegment::ArcTo { .. })));
        if let Some((x, y)) = path.last().and_then(seg_end) {
            assert!((x - 20.0).abs() < 1e-6);
            assert!(y.abs() < 1e-6);
        } else {
            panic!("expected a final coordinate");
        }
    }

    #[test]
    fn line_bbox() {
        let path = parse_path("M 10 10 L 30 40");
        let bbox = path.bbox().unwrap();
        assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (10.0, 10.0, 20.0, 30.0));
    }
}
