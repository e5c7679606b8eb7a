// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A thin typed layer on top of `roxmltree`.
//!
//! Provides element/attribute id enums for the SVG subset we understand
//! and attribute access that is aware of the inline `style` attribute
//! and of property inheritance.

use std::fmt;
use std::str::FromStr;

use crate::geom::Transform;

const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// A list of all SVG elements recognized by the converter.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EId {
    Circle,
    ClipPath,
    Defs,
    Desc,
    Ellipse,
    Filter,
    G,
    Image,
    Line,
    LinearGradient,
    Mask,
    Metadata,
    Path,
    Polygon,
    Polyline,
    RadialGradient,
    Rect,
    Stop,
    Style,
    Svg,
    Text,
    Title,
}

impl EId {
    pub fn from_str(text: &str) -> Option<EId> {
        match text {
            "circle" => Some(EId::Circle),
            "clipPath" => Some(EId::ClipPath),
            "defs" => Some(EId::Defs),
            "desc" => Some(EId::Desc),
            "ellipse" => Some(EId::Ellipse),
            "filter" => Some(EId::Filter),
            "g" => Some(EId::G),
            "image" => Some(EId::Image),
            "line" => Some(EId::Line),
            "linearGradient" => Some(EId::LinearGradient),
            "mask" => Some(EId::Mask),
            "metadata" => Some(EId::Metadata),
            "path" => Some(EId::Path),
            "polygon" => Some(EId::Polygon),
            "polyline" => Some(EId::Polyline),
            "radialGradient" => Some(EId::RadialGradient),
            "rect" => Some(EId::Rect),
            "stop" => Some(EId::Stop),
            "style" => Some(EId::Style),
            "svg" => Some(EId::Svg),
            "text" => Some(EId::Text),
            "title" => Some(EId::Title),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            EId::Circle => "circle",
            EId::ClipPath => "clipPath",
            EId::Defs => "defs",
            EId::Desc => "desc",
            EId::Ellipse => "ellipse",
            EId::Filter => "filter",
            EId::G => "g",
            EId::Image => "image",
            EId::Line => "line",
            EId::LinearGradient => "linearGradient",
            EId::Mask => "mask",
            EId::Metadata => "metadata",
            EId::Path => "path",
            EId::Polygon => "polygon",
            EId::Polyline => "polyline",
            EId::RadialGradient => "radialGradient",
            EId::Rect => "rect",
            EId::Stop => "stop",
            EId::Style => "style",
            EId::Svg => "svg",
            EId::Text => "text",
            EId::Title => "title",
        }
    }

    /// Checks if this is a gradient element.
    pub fn is_gradient(self) -> bool {
        matches!(self, EId::LinearGradient | EId::RadialGradient)
    }

    /// Checks if this is a shape element that can be converted into a path.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            EId::Circle
                | EId::Ellipse
                | EId::Line
                | EId::Path
                | EId::Polygon
                | EId::Polyline
                | EId::Rect
        )
    }
}

impl fmt::Display for EId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// A list of all SVG attributes recognized by the converter.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AId {
    Color,
    Cx,
    Cy,
    D,
    Fill,
    FillOpacity,
    FillRule,
    GradientTransform,
    GradientUnits,
    Height,
    Href,
    Id,
    Offset,
    Opacity,
    Points,
    R,
    Rx,
    Ry,
    SpreadMethod,
    StopColor,
    StopOpacity,
    Stroke,
    StrokeLinecap,
    StrokeLinejoin,
    StrokeMiterlimit,
    StrokeOpacity,
    StrokeWidth,
    Style,
    Transform,
    ViewBox,
    Width,
    X,
    X1,
    X2,
    Y,
    Y1,
    Y2,
}

impl AId {
    pub fn from_str(text: &str) -> Option<AId> {
        match text {
            "color" => Some(AId::Color),
            "cx" => Some(AId::Cx),
            "cy" => Some(AId::Cy),
            "d" => Some(AId::D),
            "fill" => Some(AId::Fill),
            "fill-opacity" => Some(AId::FillOpacity),
            "fill-rule" => Some(AId::FillRule),
            "gradientTransform" => Some(AId::GradientTransform),
            "gradientUnits" => Some(AId::GradientUnits),
            "height" => Some(AId::Height),
            "href" => Some(AId::Href),
            "id" => Some(AId::Id),
            "offset" => Some(AId::Offset),
            "opacity" => Some(AId::Opacity),
            "points" => Some(AId::Points),
            "r" => Some(AId::R),
            "rx" => Some(AId::Rx),
            "ry" => Some(AId::Ry),
            "spreadMethod" => Some(AId::SpreadMethod),
            "stop-color" => Some(AId::StopColor),
            "stop-opacity" => Some(AId::StopOpacity),
            "stroke" => Some(AId::Stroke),
            "stroke-linecap" => Some(AId::StrokeLinecap),
            "stroke-linejoin" => Some(AId::StrokeLinejoin),
            "stroke-miterlimit" => Some(AId::StrokeMiterlimit),
            "stroke-opacity" => Some(AId::StrokeOpacity),
            "stroke-width" => Some(AId::StrokeWidth),
            "style" => Some(AId::Style),
            "transform" => Some(AId::Transform),
            "viewBox" => Some(AId::ViewBox),
            "width" => Some(AId::Width),
            "x" => Some(AId::X),
            "x1" => Some(AId::X1),
            "x2" => Some(AId::X2),
            "y" => Some(AId::Y),
            "y1" => Some(AId::Y1),
            "y2" => Some(AId::Y2),
            _ => None,
        }
    }

    pub fn to_str(self) -> &'static str {
        match self {
            AId::Color => "color",
            AId::Cx => "cx",
            AId::Cy => "cy",
            AId::D => "d",
            AId::Fill => "fill",
            AId::FillOpacity => "fill-opacity",
            AId::FillRule => "fill-rule",
            AId::GradientTransform => "gradientTransform",
            AId::GradientUnits => "gradientUnits",
            AId::Height => "height",
            AId::Href => "href",
            AId::Id => "id",
            AId::Offset => "offset",
            AId::Opacity => "opacity",
            AId::Points => "points",
            AId::R => "r",
            AId::Rx => "rx",
            AId::Ry => "ry",
            AId::SpreadMethod => "spreadMethod",
            AId::StopColor => "stop-color",
            AId::StopOpacity => "stop-opacity",
            AId::Stroke => "stroke",
            AId::StrokeLinecap => "stroke-linecap",
            AId::StrokeLinejoin => "stroke-linejoin",
            AId::StrokeMiterlimit => "stroke-miterlimit",
            AId::StrokeOpacity => "stroke-opacity",
            AId::StrokeWidth => "stroke-width",
            AId::Style => "style",
            AId::Transform => "transform",
            AId::ViewBox => "viewBox",
            AId::Width => "width",
            AId::X => "x",
            AId::X1 => "x1",
            AId::X2 => "x2",
            AId::Y => "y",
            AId::Y1 => "y1",
            AId::Y2 => "y2",
        }
    }

    /// Checks if the current attribute is a presentation attribute.
    ///
    /// Only presentation attributes can be set via the `style` attribute.
    fn is_presentation(self) -> bool {
        matches!(
            self,
            AId::Color
                | AId::Fill
                | AId::FillOpacity
                | AId::FillRule
                | AId::Opacity
                | AId::StopColor
                | AId::StopOpacity
                | AId::Stroke
                | AId::StrokeLinecap
                | AId::StrokeLinejoin
                | AId::StrokeMiterlimit
                | AId::StrokeOpacity
                | AId::StrokeWidth
                | AId::Transform
        )
    }

    /// Checks if the current attribute is inheritable.
    fn is_inheritable(self) -> bool {
        self.is_presentation()
            && !matches!(
                self,
                AId::Opacity | AId::StopColor | AId::StopOpacity | AId::Transform
            )
    }
}

impl fmt::Display for AId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// An SVG element wrapper.
#[derive(Clone, Copy, Debug)]
pub struct SvgNode<'a, 'input: 'a>(pub roxmltree::Node<'a, 'input>);

impl<'a, 'input: 'a> SvgNode<'a, 'input> {
    /// Returns the element's tag id, if recognized.
    pub fn tag_name(&self) -> Option<EId> {
        EId::from_str(self.0.tag_name().name())
    }

    /// Returns the element's raw tag name.
    pub fn tag_name_str(&self) -> &'a str {
        self.0.tag_name().name()
    }

    /// Returns the element's `id` attribute value or an empty string.
    pub fn element_id(&self) -> &'a str {
        self.0.attribute("id").unwrap_or("")
    }

    pub fn has_element_id(&self) -> bool {
        !self.element_id().is_empty()
    }

    /// Returns the unparsed attribute value.
    ///
    /// A declaration inside the `style` attribute has precedence over
    /// the presentation attribute with the same name.
    pub fn attribute_str(&self, aid: AId) -> Option<&'a str> {
        if aid.is_presentation() {
            if let Some(style) = self.0.attribute("style") {
                for declaration in simplecss::DeclarationTokenizer::from(style) {
                    if AId::from_str(declaration.name) == Some(aid) {
                        return Some(declaration.value);
                    }
                }
            }
        }

        if aid == AId::Href {
            // `xlink:href` is still far more common than plain `href`.
            self.0
                .attribute((XLINK_NS, "href"))
                .or_else(|| self.0.attribute("href"))
        } else {
            self.0.attribute(aid.to_str())
        }
    }

    pub fn has_attribute(&self, aid: AId) -> bool {
        self.attribute_str(aid).is_some()
    }

    /// Returns the parsed attribute value.
    pub fn attribute<T: FromValue<'a, 'input>>(&self, aid: AId) -> Option<T> {
        let value = self.attribute_str(aid)?;
        match T::parse(*self, aid, value) {
            Some(v) => Some(v),
            None => {
                log::warn!("Failed to parse '{}' value: '{}'.", aid, value);
                None
            }
        }
    }

    /// Returns the closest ancestor (including self) that has the attribute.
    ///
    /// Non-inheritable attributes are only looked up on the element itself.
    pub fn find_node_with_attribute(&self, aid: AId) -> Option<SvgNode<'a, 'input>> {
        if aid.is_inheritable() {
            self.ancestors().find(|n| n.has_attribute(aid))
        } else if self.has_attribute(aid) {
            Some(*self)
        } else {
            None
        }
    }

    /// Returns the parsed attribute value, resolving inheritance.
    pub fn find_attribute<T: FromValue<'a, 'input>>(&self, aid: AId) -> Option<T> {
        self.find_node_with_attribute(aid)?.attribute(aid)
    }

    /// Returns an iterator over the ancestor elements, including self,
    /// up to the root `svg` element.
    pub fn ancestors(&self) -> impl Iterator<Item = SvgNode<'a, 'input>> {
        self.0
            .ancestors()
            .filter(|n| n.is_element())
            .map(SvgNode)
    }

    /// Returns an iterator over the child elements.
    pub fn children(&self) -> impl Iterator<Item = SvgNode<'a, 'input>> {
        self.0
            .children()
            .filter(|n| n.is_element())
            .map(SvgNode)
    }
}

/// A trait for parsing enum variants from string.
pub trait EnumFromStr: Sized {
    /// Parses an enum variant from string.
    fn enum_from_str(text: &str) -> Option<Self>;
}

/// A trait for parsing attribute values.
pub trait FromValue<'a, 'input: 'a>: Sized {
    /// Parses an attribute value.
    ///
    /// When `None` is returned, the value will be logged as a parsing failure.
    fn parse(node: SvgNode<'a, 'input>, aid: AId, value: &'a str) -> Option<Self>;
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for &'a str {
    #[inline]
    fn parse(_: SvgNode, _: AId, value: &'a str) -> Option<Self> {
        Some(value)
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for f64 {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        svgtypes::Number::from_str(value).ok().map(|v| v.0)
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for svgtypes::Length {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        svgtypes::Length::from_str(value).ok()
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for svgtypes::Color {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        svgtypes::Color::from_str(value).ok()
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for svgtypes::ViewBox {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        svgtypes::ViewBox::from_str(value).ok()
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for svgtypes::Paint<'a> {
    fn parse(_: SvgNode, _: AId, value: &'a str) -> Option<Self> {
        svgtypes::Paint::from_str(value).ok()
    }
}

impl<'a, 'input: 'a> FromValue<'a, 'input> for Transform {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        let ts = svgtypes::Transform::from_str(value).ok()?;

        let ts = Transform::from(ts);
        if ts.a.is_finite()
            && ts.b.is_finite()
            && ts.c.is_finite()
            && ts.d.is_finite()
            && ts.e.is_finite()
            && ts.f.is_finite()
        {
            Some(ts)
        } else {
            Some(Transform::default())
        }
    }
}

impl<'a, 'input: 'a, T: EnumFromStr> FromValue<'a, 'input> for T {
    fn parse(_: SvgNode, _: AId, value: &str) -> Option<Self> {
        T::enum_from_str(value)
    }
}
