// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::str::FromStr;

use svgtypes::{Length, LengthUnit as Unit};

use crate::converter::{State, WarningKind};
use crate::geom::{f64_bound, Rect, Transform};
use crate::numbers::{NormalizedValue, Opacity};
use crate::style::{Color, Paint, SvgColorExt};
use crate::svgtree::{AId, EId, EnumFromStr, SvgNode};
use crate::IsValidLength;

/// A spread method.
///
/// `spreadMethod` attribute in the SVG,
/// `android:tileMode` in the output.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

impl_enum_default!(SpreadMethod, Pad);

impl_enum_from_str!(SpreadMethod,
    "pad"       => SpreadMethod::Pad,
    "reflect"   => SpreadMethod::Reflect,
    "repeat"    => SpreadMethod::Repeat
);

/// An alias to `NormalizedValue`.
pub type StopOffset = NormalizedValue;

/// Gradient's stop element.
///
/// `stop` element in the SVG, `item` in the output.
#[derive(Clone, Copy, Debug)]
pub struct Stop {
    /// Gradient stop offset.
    ///
    /// `offset` in SVG.
    pub offset: StopOffset,

    /// Gradient stop color.
    ///
    /// `stop-color` in SVG.
    pub color: Color,

    /// Gradient stop opacity.
    ///
    /// `stop-opacity` in SVG.
    pub opacity: Opacity,
}

/// A generic gradient.
#[derive(Clone, Debug)]
pub struct BaseGradient {
    /// Gradient spreading method.
    ///
    /// `spreadMethod` in SVG.
    pub spread_method: SpreadMethod,

    /// A list of `stop` elements.
    ///
    /// Offsets are in 0..1, ascending.
    pub stops: Vec<Stop>,
}

/// A linear gradient.
///
/// `linearGradient` element in SVG. The geometry is resolved into
/// viewport coordinates.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct LinearGradient {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,

    /// Base gradient data.
    pub base: BaseGradient,
}

impl std::ops::Deref for LinearGradient {
    type Target = BaseGradient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

/// A radial gradient.
///
/// `radialGradient` element in SVG. The geometry is resolved into
/// viewport coordinates.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct RadialGradient {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,

    /// Base gradient data.
    pub base: BaseGradient,
}

impl std::ops::Deref for RadialGradient {
    type Target = BaseGradient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Units {
    ObjectBoundingBox,
    UserSpaceOnUse,
}

pub(crate) enum ServerOrColor {
    Server(Paint),
    Color { color: Color, opacity: Opacity },
}

pub(crate) fn convert(
    node: SvgNode,
    bbox: Option<Rect>,
    state: &mut State,
) -> Option<ServerOrColor> {
    let stops = convert_stops(find_gradient_with_stops(node, state)?);
    if stops.is_empty() {
        return None;
    }

    // 'If one stop is defined, then paint with the solid color fill using
    // the color defined for that gradient stop.'
    if stops.len() == 1 {
        return stops_to_color(&stops);
    }

    match node.tag_name() {
        Some(EId::LinearGradient) => convert_linear(node, stops, bbox, state),
        Some(EId::RadialGradient) => convert_radial(node, stops, bbox, state),
        _ => None,
    }
}

#[inline(never)]
fn convert_linear(
    node: SvgNode,
    stops: Vec<Stop>,
    bbox: Option<Rect>,
    state: &mut State,
) -> Option<ServerOrColor> {
    let units = convert_units(node, state);
    let reference = reference_box(units, bbox, state)?;

    let x1 = resolve_number(node, AId::X1, Length::zero(), units, reference.x, reference.width, state);
    let y1 = resolve_number(node, AId::Y1, Length::zero(), units, reference.y, reference.height, state);
    let x2 = resolve_number(
        node,
        AId::X2,
        Length::new(100.0, Unit::Percent),
        units,
        reference.x,
        reference.width,
        state,
    );
    let y2 = resolve_number(node, AId::Y2, Length::zero(), units, reference.y, reference.height, state);

    let ts: Transform = resolve_attr(node, AId::GradientTransform, state)
        .and_then(|n| n.attribute(AId::GradientTransform))
        .unwrap_or_default();
    let (x1, y1) = ts.apply(x1, y1);
    let (x2, y2) = ts.apply(x2, y2);

    Some(ServerOrColor::Server(Paint::LinearGradient(LinearGradient {
        x1,
        y1,
        x2,
        y2,
        base: BaseGradient {
            spread_method: convert_spread_method(node, state),
            stops,
        },
    })))
}

#[inline(never)]
fn convert_radial(
    node: SvgNode,
    stops: Vec<Stop>,
    bbox: Option<Rect>,
    state: &mut State,
) -> Option<ServerOrColor> {
    let units = convert_units(node, state);
    let reference = reference_box(units, bbox, state)?;
    let r_reference = reference.width.min(reference.height);

    let half = Length::new(50.0, Unit::Percent);
    let r = resolve_number(node, AId::R, half, units, 0.0, r_reference, state);

    // 'A value of zero will cause the area to be painted as a single color
    // using the color and opacity of the last gradient stop.'
    if !r.is_valid_length() {
        let stop = stops.last()?;
        return Some(ServerOrColor::Color {
            color: stop.color,
            opacity: stop.opacity,
        });
    }

    let cx = resolve_number(node, AId::Cx, half, units, reference.x, reference.width, state);
    let cy = resolve_number(node, AId::Cy, half, units, reference.y, reference.height, state);

    let ts: Transform = resolve_attr(node, AId::GradientTransform, state)
        .and_then(|n| n.attribute(AId::GradientTransform))
        .unwrap_or_default();
    let (cx, cy) = ts.apply(cx, cy);
    let r = r * ts.get_scale().0;

    Some(ServerOrColor::Server(Paint::RadialGradient(RadialGradient {
        cx,
        cy,
        r,
        base: BaseGradient {
            spread_method: convert_spread_method(node, state),
            stops,
        },
    })))
}

/// Resolves the box gradient coordinates are relative to.
///
/// For `objectBoundingBox` this is the referencing shape's bbox,
/// and a shape without one cannot be painted with such a gradient.
fn reference_box(units: Units, bbox: Option<Rect>, state: &State) -> Option<Rect> {
    match units {
        Units::UserSpaceOnUse => Some(state.view_box),
        Units::ObjectBoundingBox => bbox.filter(|b| b.is_valid()),
    }
}

fn convert_units(node: SvgNode, state: &State) -> Units {
    match resolve_attr(node, AId::GradientUnits, state)
        .and_then(|n| n.attribute_str(AId::GradientUnits))
    {
        Some("userSpaceOnUse") => Units::UserSpaceOnUse,
        _ => Units::ObjectBoundingBox,
    }
}

fn convert_spread_method(node: SvgNode, state: &mut State) -> SpreadMethod {
    let value = match resolve_attr(node, AId::SpreadMethod, state)
        .and_then(|n| n.attribute_str(AId::SpreadMethod))
    {
        Some(v) => v,
        None => return SpreadMethod::default(),
    };

    match SpreadMethod::enum_from_str(value) {
        Some(v) => v,
        None => {
            state.warn(
                WarningKind::MalformedAttribute,
                node.tag_name_str(),
                format!(
                    "'{}' is not a known 'spreadMethod'. Falling back to 'pad'.",
                    value
                ),
            );
            SpreadMethod::Pad
        }
    }
}

/// Resolves a gradient coordinate into viewport units.
///
/// `offset`/`reference` describe the axis the value is measured along:
/// the bbox side for `objectBoundingBox` units, the viewport side
/// otherwise.
fn resolve_number(
    node: SvgNode,
    aid: AId,
    def: Length,
    units: Units,
    offset: f64,
    reference: f64,
    state: &State,
) -> f64 {
    let length = resolve_attr(node, aid, state)
        .and_then(|n| n.attribute::<Length>(aid))
        .unwrap_or(def);

    match units {
        Units::UserSpaceOnUse => match length.unit {
            Unit::Percent => length.number / 100.0 * reference,
            _ => length.number,
        },
        Units::ObjectBoundingBox => {
            // Fractions and percentages mean the same thing here.
            let fraction = match length.unit {
                Unit::Percent => length.number / 100.0,
                _ => length.number,
            };
            offset + fraction * reference
        }
    }
}

/// Finds a node with the requested attribute, following `xlink:href`
/// references between gradients.
fn resolve_attr<'a, 'input: 'a>(
    node: SvgNode<'a, 'input>,
    aid: AId,
    state: &State<'a, 'input>,
) -> Option<SvgNode<'a, 'input>> {
    let mut curr = node;
    // The depth limit also breaks reference cycles.
    for _ in 0..8 {
        if curr.has_attribute(aid) {
            return Some(curr);
        }

        curr = next_href(curr, state)?;
    }

    None
}

/// Finds the gradient in the `xlink:href` chain that carries stops.
fn find_gradient_with_stops<'a, 'input: 'a>(
    node: SvgNode<'a, 'input>,
    state: &State<'a, 'input>,
) -> Option<SvgNode<'a, 'input>> {
    let mut curr = node;
    for _ in 0..8 {
        if curr
            .children()
            .any(|c| c.tag_name() == Some(EId::Stop))
        {
            return Some(curr);
        }

        curr = next_href(curr, state)?;
    }

    None
}

fn next_href<'a, 'input: 'a>(
    node: SvgNode<'a, 'input>,
    state: &State<'a, 'input>,
) -> Option<SvgNode<'a, 'input>> {
    let value = node.attribute_str(AId::Href)?;
    let id = svgtypes::IRI::from_str(value).ok()?.0;
    state.gradients.get(id).copied()
}

fn convert_stops(grad: SvgNode) -> Vec<Stop> {
    let mut stops = Vec::new();

    for stop in grad.children() {
        if stop.tag_name() != Some(EId::Stop) {
            log::warn!("Invalid gradient child: '{}'.", stop.tag_name_str());
            continue;
        }

        // `offset` can be either a number or a percentage.
        let offset = stop
            .attribute::<Length>(AId::Offset)
            .unwrap_or_else(Length::zero);
        let offset = match offset.unit {
            Unit::Percent => offset.number / 100.0,
            _ => offset.number,
        };
        let offset = f64_bound(0.0, offset, 1.0);

        let color = stop
            .attribute::<svgtypes::Color>(AId::StopColor)
            .unwrap_or_else(svgtypes::Color::black);
        let (color, alpha) = color.split_alpha();

        let stop_opacity = stop
            .attribute::<f64>(AId::StopOpacity)
            .map(Opacity::new)
            .unwrap_or_default();

        stops.push(Stop {
            offset: StopOffset::new(offset),
            color,
            opacity: alpha * stop_opacity,
        });
    }

    // Stops must be in ascending order. A stable sort keeps the
    // declaration order for equal offsets.
    stops.sort_by(|a, b| {
        a.offset
            .value()
            .partial_cmp(&b.offset.value())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    stops
}

fn stops_to_color(stops: &[Stop]) -> Option<ServerOrColor> {
    let stop = stops.first()?;
    Some(ServerOrColor::Color {
        color: stop.color,
        opacity: stop.opacity,
    })
}
