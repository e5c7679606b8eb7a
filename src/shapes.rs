// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::Length;

use crate::converter::{resolve_length, State, WarningKind};
use crate::pathdata::{self, PathData};
use crate::svgtree::{AId, EId, SvgNode};
use crate::IsValidLength;

pub(crate) fn convert(node: SvgNode, state: &mut State) -> Option<PathData> {
    match node.tag_name()? {
        EId::Rect => convert_rect(node, state),
        EId::Circle => convert_circle(node, state),
        EId::Ellipse => convert_ellipse(node, state),
        EId::Line => convert_line(node, state),
        EId::Polyline => convert_polyline(node, state),
        EId::Polygon => convert_polygon(node, state),
        EId::Path => convert_path(node, state),
        _ => None,
    }
}

fn convert_path(node: SvgNode, state: &mut State) -> Option<PathData> {
    let text = match node.attribute_str(AId::D) {
        Some(v) => v,
        None => {
            state.warn(
                WarningKind::MalformedAttribute,
                "path",
                format!("'{}' has no 'd' attribute. Skipped.", node.element_id()),
            );
            return None;
        }
    };

    let path = pathdata::parse_path(text);

    // A path with just a MoveTo draws nothing.
    if path.len() < 2 {
        state.warn(
            WarningKind::MalformedAttribute,
            "path",
            format!("'{}' has an invalid 'd' value. Skipped.", node.element_id()),
        );
        return None;
    }

    Some(path)
}

fn convert_rect(node: SvgNode, state: &mut State) -> Option<PathData> {
    // 'width' and 'height' attributes must be positive and non-zero.
    let width = resolve_length(node, AId::Width, state, 0.0);
    let height = resolve_length(node, AId::Height, state, 0.0);
    if !width.is_valid_length() {
        state.warn(
            WarningKind::MalformedAttribute,
            "rect",
            format!("'{}' has an invalid 'width' value. Skipped.", node.element_id()),
        );
        return None;
    }
    if !height.is_valid_length() {
        state.warn(
            WarningKind::MalformedAttribute,
            "rect",
            format!("'{}' has an invalid 'height' value. Skipped.", node.element_id()),
        );
        return None;
    }

    let x = resolve_length(node, AId::X, state, 0.0);
    let y = resolve_length(node, AId::Y, state, 0.0);

    let (mut rx, mut ry) = resolve_rx_ry(node, state);

    // Clamp rx/ry to the half of the width/height.
    //
    // Should be done only after resolving.
    if rx > width / 2.0 {
        rx = width / 2.0;
    }
    if ry > height / 2.0 {
        ry = height / 2.0;
    }

    // Conversion according to https://www.w3.org/TR/SVG11/shapes.html#RectElement
    let path = if !rx.is_valid_length() {
        let mut p = PathData::with_capacity(5);
        p.push_move_to(x, y);
        p.push_line_to(x + width, y);
        p.push_line_to(x + width, y + height);
        p.push_line_to(x, y + height);
        p.push_close_path();
        p
    } else {
        let mut p = PathData::with_capacity(10);
        p.push_move_to(x + rx, y);

        p.push_line_to(x + width - rx, y);
        p.push_arc_to(rx, ry, 0.0, false, true, x + width, y + ry);

        p.push_line_to(x + width, y + height - ry);
        p.push_arc_to(rx, ry, 0.0, false, true, x + width - rx, y + height);

        p.push_line_to(x + rx, y + height);
        p.push_arc_to(rx, ry, 0.0, false, true, x, y + height - ry);

        p.push_line_to(x, y + ry);
        p.push_arc_to(rx, ry, 0.0, false, true, x + rx, y);

        p.push_close_path();

        p
    };

    Some(path)
}

fn resolve_rx_ry(node: SvgNode, state: &State) -> (f64, f64) {
    let mut rx_opt = node.attribute::<Length>(AId::Rx);
    let mut ry_opt = node.attribute::<Length>(AId::Ry);

    // Remove negative values first.
    if let Some(v) = rx_opt {
        if v.number.is_sign_negative() {
            rx_opt = None;
        }
    }
    if let Some(v) = ry_opt {
        if v.number.is_sign_negative() {
            ry_opt = None;
        }
    }

    // Resolve.
    match (rx_opt, ry_opt) {
        (None, None) => (0.0, 0.0),
        (Some(_), None) => {
            let rx = resolve_length(node, AId::Rx, state, 0.0);
            (rx, rx)
        }
        (None, Some(_)) => {
            let ry = resolve_length(node, AId::Ry, state, 0.0);
            (ry, ry)
        }
        (Some(_), Some(_)) => (
            resolve_length(node, AId::Rx, state, 0.0),
            resolve_length(node, AId::Ry, state, 0.0),
        ),
    }
}

fn convert_circle(node: SvgNode, state: &mut State) -> Option<PathData> {
    let cx = resolve_length(node, AId::Cx, state, 0.0);
    let cy = resolve_length(node, AId::Cy, state, 0.0);
    let r = resolve_length(node, AId::R, state, 0.0);

    if !r.is_valid_length() {
        state.warn(
            WarningKind::MalformedAttribute,
            "circle",
            format!("'{}' has an invalid 'r' value. Skipped.", node.element_id()),
        );
        return None;
    }

    Some(ellipse_to_path(cx, cy, r, r))
}

fn convert_ellipse(node: SvgNode, state: &mut State) -> Option<PathData> {
    let cx = resolve_length(node, AId::Cx, state, 0.0);
    let cy = resolve_length(node, AId::Cy, state, 0.0);
    let (rx, ry) = resolve_rx_ry(node, state);

    if !rx.is_valid_length() {
        state.warn(
            WarningKind::MalformedAttribute,
            "ellipse",
            format!("'{}' has an invalid 'rx' value. Skipped.", node.element_id()),
        );
        return None;
    }

    if !ry.is_valid_length() {
        state.warn(
            WarningKind::MalformedAttribute,
            "ellipse",
            format!("'{}' has an invalid 'ry' value. Skipped.", node.element_id()),
        );
        return None;
    }

    Some(ellipse_to_path(cx, cy, rx, ry))
}

/// Builds a closed two-arc loop.
fn ellipse_to_path(cx: f64, cy: f64, rx: f64, ry: f64) -> PathData {
    let mut p = PathData::with_capacity(4);
    p.push_move_to(cx - rx, cy);
    p.push_arc_to(rx, ry, 0.0, true, false, cx + rx, cy);
    p.push_arc_to(rx, ry, 0.0, true, false, cx - rx, cy);
    p.push_close_path();
    p
}

fn convert_line(node: SvgNode, state: &mut State) -> Option<PathData> {
    let x1 = resolve_length(node, AId::X1, state, 0.0);
    let y1 = resolve_length(node, AId::Y1, state, 0.0);
    let x2 = resolve_length(node, AId::X2, state, 0.0);
    let y2 = resolve_length(node, AId::Y2, state, 0.0);

    let mut path = PathData::with_capacity(2);
    path.push_move_to(x1, y1);
    path.push_line_to(x2, y2);
    Some(path)
}

fn convert_polyline(node: SvgNode, state: &mut State) -> Option<PathData> {
    points_to_path(node, "polyline", state)
}

fn convert_polygon(node: SvgNode, state: &mut State) -> Option<PathData> {
    if let Some(mut path) = points_to_path(node, "polygon", state) {
        path.push_close_path();
        Some(path)
    } else {
        None
    }
}

fn points_to_path(node: SvgNode, eid: &str, state: &mut State) -> Option<PathData> {
    use svgtypes::PointsParser;

    let mut path = PathData::new();
    match node.attribute_str(AId::Points) {
        Some(text) => {
            for (x, y) in PointsParser::from(text) {
                if path.is_empty() {
                    path.push_move_to(x, y);
                } else {
                    path.push_line_to(x, y);
                }
            }
        }
        _ => {
            state.warn(
                WarningKind::MalformedAttribute,
                eid,
                format!("'{}' has no 'points' value. Skipped.", node.element_id()),
            );
            return None;
        }
    }

    // 'polyline' and 'polygon' elements must contain at least 2 points.
    if path.len() < 2 {
        state.warn(
            WarningKind::MalformedAttribute,
            eid,
            format!("'{}' has less than 2 points. Skipped.", node.element_id()),
        );
        return None;
    }

    Some(path)
}
