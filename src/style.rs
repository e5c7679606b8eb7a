// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::converter::{self, State, WarningKind};
use crate::geom::Rect;
use crate::numbers::Opacity;
use crate::paint_server::{self, LinearGradient, RadialGradient, ServerOrColor};
use crate::svgtree::{AId, EId, SvgNode};
use crate::IsValidLength;

/// A line cap.
///
/// `stroke-linecap` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl_enum_default!(LineCap, Butt);

impl_enum_from_str!(LineCap,
    "butt"      => LineCap::Butt,
    "round"     => LineCap::Round,
    "square"    => LineCap::Square
);

/// A line join.
///
/// `stroke-linejoin` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl_enum_default!(LineJoin, Miter);

impl_enum_from_str!(LineJoin,
    "miter" => LineJoin::Miter,
    "round" => LineJoin::Round,
    "bevel" => LineJoin::Bevel
);

/// A fill rule.
///
/// `fill-rule` attribute in the SVG.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl_enum_default!(FillRule, NonZero);

impl_enum_from_str!(FillRule,
    "nonzero" => FillRule::NonZero,
    "evenodd" => FillRule::EvenOdd
);

/// A 8-bit RGB color.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// Constructs a new `Color` from RGB values.
    #[inline]
    pub fn new_rgb(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue }
    }

    /// Constructs a new `Color` set to black.
    #[inline]
    pub fn black() -> Color {
        Color::new_rgb(0, 0, 0)
    }
}

pub(crate) trait SvgColorExt {
    fn split_alpha(self) -> (Color, Opacity);
}

impl SvgColorExt for svgtypes::Color {
    fn split_alpha(self) -> (Color, Opacity) {
        (
            Color::new_rgb(self.red, self.green, self.blue),
            Opacity::new(f64::from(self.alpha) / 255.0),
        )
    }
}

/// A paint style.
///
/// `paint` value type in the SVG. Gradients are fully resolved here:
/// geometry is in viewport units and stops are normalized.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Paint {
    Color(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
}

impl Paint {
    /// Checks if the paint is a gradient.
    #[inline]
    pub fn is_gradient(&self) -> bool {
        !matches!(self, Paint::Color(_))
    }
}

/// A fill style.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Fill {
    pub paint: Paint,
    pub opacity: Opacity,
    pub rule: FillRule,
}

impl Default for Fill {
    fn default() -> Self {
        Fill {
            paint: Paint::Color(Color::black()),
            opacity: Opacity::default(),
            rule: FillRule::default(),
        }
    }
}

/// A stroke style.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub struct Stroke {
    pub paint: Paint,
    pub opacity: Opacity,
    pub width: f64,
    pub linecap: LineCap,
    pub linejoin: LineJoin,
    pub miterlimit: f64,
}

pub(crate) fn resolve_fill(
    node: SvgNode,
    tag: EId,
    bbox: Option<Rect>,
    state: &mut State,
) -> Option<Fill> {
    let mut sub_opacity = Opacity::default();
    let paint = if let Some(n) = node.find_node_with_attribute(AId::Fill) {
        convert_paint(n, AId::Fill, bbox, state, &mut sub_opacity)?
    } else {
        // `line` and `polyline` exist to be stroked. An unset fill on them
        // stays unset instead of the usual black.
        if matches!(tag, EId::Line | EId::Polyline) {
            return None;
        }

        Paint::Color(Color::black())
    };

    let fill_opacity = node
        .find_attribute::<f64>(AId::FillOpacity)
        .map(Opacity::new)
        .unwrap_or_default();

    Some(Fill {
        paint,
        opacity: sub_opacity * fill_opacity * element_opacity(node),
        rule: node.find_attribute(AId::FillRule).unwrap_or_default(),
    })
}

pub(crate) fn resolve_stroke(
    node: SvgNode,
    bbox: Option<Rect>,
    state: &mut State,
) -> Option<Stroke> {
    let mut sub_opacity = Opacity::default();
    let paint = if let Some(n) = node.find_node_with_attribute(AId::Stroke) {
        convert_paint(n, AId::Stroke, bbox, state, &mut sub_opacity)?
    } else {
        return None;
    };

    let width = converter::resolve_length(node, AId::StrokeWidth, state, 1.0);
    if !width.is_valid_length() {
        state.warn(
            WarningKind::MalformedAttribute,
            node.tag_name_str(),
            format!(
                "'{}' has an invalid 'stroke-width' value. Stroke ignored.",
                node.element_id()
            ),
        );
        return None;
    }

    // Must be bigger than 1.
    let miterlimit = node.find_attribute(AId::StrokeMiterlimit).unwrap_or(4.0);
    let miterlimit = if miterlimit < 1.0 { 1.0 } else { miterlimit };

    let stroke_opacity = node
        .find_attribute::<f64>(AId::StrokeOpacity)
        .map(Opacity::new)
        .unwrap_or_default();

    Some(Stroke {
        paint,
        opacity: sub_opacity * stroke_opacity * element_opacity(node),
        width,
        linecap: node.find_attribute(AId::StrokeLinecap).unwrap_or_default(),
        linejoin: node.find_attribute(AId::StrokeLinejoin).unwrap_or_default(),
        miterlimit,
    })
}

/// Returns the element's own `opacity`.
///
/// `opacity` is not an inherited property, so only the element itself
/// is checked.
fn element_opacity(node: SvgNode) -> Opacity {
    node.attribute::<f64>(AId::Opacity)
        .map(Opacity::new)
        .unwrap_or_default()
}

fn convert_paint(
    node: SvgNode,
    aid: AId,
    bbox: Option<Rect>,
    state: &mut State,
    opacity: &mut Opacity,
) -> Option<Paint> {
    match node.attribute::<svgtypes::Paint>(aid)? {
        svgtypes::Paint::None => None,
        // There is no context element to resolve against.
        svgtypes::Paint::ContextFill | svgtypes::Paint::ContextStroke => None,
        svgtypes::Paint::Inherit => {
            // `find_node_with_attribute` already resolved inheritance,
            // so an explicit `inherit` must look further up.
            if let Some(n) = node.ancestors().skip(1).find(|n| n.has_attribute(aid)) {
                convert_paint(n, aid, bbox, state, opacity)
            } else {
                Some(Paint::Color(Color::black()))
            }
        }
        svgtypes::Paint::CurrentColor => {
            let svg_color: svgtypes::Color = node
                .find_attribute(AId::Color)
                .unwrap_or_else(svgtypes::Color::black);
            let (color, alpha) = svg_color.split_alpha();
            *opacity = alpha;
            Some(Paint::Color(color))
        }
        svgtypes::Paint::Color(svg_color) => {
            let (color, alpha) = svg_color.split_alpha();
            *opacity = alpha;
            Some(Paint::Color(color))
        }
        svgtypes::Paint::FuncIRI(func_iri, fallback) => {
            if let Some(link) = state.gradients.get(func_iri).copied() {
                match paint_server::convert(link, bbox, state) {
                    Some(ServerOrColor::Server(paint)) => Some(paint),
                    Some(ServerOrColor::Color { color, opacity: so }) => {
                        *opacity = so;
                        Some(Paint::Color(color))
                    }
                    None => {
                        state.warn(
                            WarningKind::UnresolvedReference,
                            node.tag_name_str(),
                            format!(
                                "gradient '#{}' cannot be resolved. \
                                 Fallback will be used instead.",
                                func_iri
                            ),
                        );
                        from_fallback(node, fallback, opacity)
                    }
                }
            } else {
                state.warn(
                    WarningKind::UnresolvedReference,
                    node.tag_name_str(),
                    format!(
                        "reference '#{}' does not name a gradient. \
                         Fallback will be used instead.",
                        func_iri
                    ),
                );
                from_fallback(node, fallback, opacity)
            }
        }
    }
}

fn from_fallback(
    node: SvgNode,
    fallback: Option<svgtypes::PaintFallback>,
    opacity: &mut Opacity,
) -> Option<Paint> {
    match fallback {
        None => Some(Paint::Color(Color::black())),
        Some(svgtypes::PaintFallback::None) => None,
        Some(svgtypes::PaintFallback::CurrentColor) => {
            let svg_color: svgtypes::Color = node
                .find_attribute(AId::Color)
                .unwrap_or_else(svgtypes::Color::black);
            let (color, alpha) = svg_color.split_alpha();
            *opacity = alpha;
            Some(Paint::Color(color))
        }
        Some(svgtypes::PaintFallback::Color(svg_color)) => {
            let (color, alpha) = svg_color.split_alpha();
            *opacity = alpha;
            Some(Paint::Color(color))
        }
    }
}
