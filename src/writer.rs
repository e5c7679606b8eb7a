// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt::{self, Display};

use xmlwriter::XmlWriter;

use crate::numbers::Opacity;
use crate::paint_server::{SpreadMethod, Stop};
use crate::pathdata::{PathData, PathSegment};
use crate::style::{Color, FillRule, LineCap, LineJoin, Paint};
use crate::tree::{Group, Node, Path, Tree};
use crate::XmlOptions;

const ANDROID_NS: &str = "http://schemas.android.com/apk/res/android";
const AAPT_NS: &str = "http://schemas.android.com/aapt";

pub(crate) fn convert(tree: &Tree, opt: &XmlOptions) -> String {
    let mut xml = XmlWriter::new(*opt);

    xml.start_element("vector");
    xml.write_attribute("xmlns:android", ANDROID_NS);
    if tree.has_gradients() {
        xml.write_attribute("xmlns:aapt", AAPT_NS);
    }
    xml.write_attribute_fmt("android:width", format_args!("{}dp", Num(tree.width)));
    xml.write_attribute_fmt("android:height", format_args!("{}dp", Num(tree.height)));
    xml.write_attribute("android:viewportWidth", &Num(tree.viewport_width));
    xml.write_attribute("android:viewportHeight", &Num(tree.viewport_height));

    conv_elements(&tree.children, &mut xml);

    xml.end_document()
}

fn conv_elements(nodes: &[Node], xml: &mut XmlWriter) {
    for node in nodes {
        match node {
            Node::Path(path) => conv_path(path, xml),
            Node::Group(group) => conv_group(group, xml),
        }
    }
}

fn conv_group(group: &Group, xml: &mut XmlWriter) {
    xml.start_element("group");
    if let Some(ref name) = group.name {
        xml.write_attribute("android:name", name);
    }

    conv_elements(&group.children, xml);

    xml.end_element();
}

fn conv_path(path: &Path, xml: &mut XmlWriter) {
    xml.start_element("path");
    xml.write_attribute("android:pathData", &PathDataRef(&path.data));

    if let Some(ref fill) = path.fill {
        match fill.paint {
            Paint::Color(color) => {
                xml.write_attribute(
                    "android:fillColor",
                    &ColorRef(color, fill.opacity.to_u8()),
                );
            }
            _ => {
                // The gradient itself is written as a child element.
                if fill.opacity != Opacity::default() {
                    xml.write_attribute("android:fillAlpha", &Num(fill.opacity.value()));
                }
            }
        }

        if fill.rule == FillRule::EvenOdd {
            xml.write_attribute("android:fillType", "evenOdd");
        }
    }

    if let Some(ref stroke) = path.stroke {
        match stroke.paint {
            Paint::Color(color) => {
                xml.write_attribute(
                    "android:strokeColor",
                    &ColorRef(color, stroke.opacity.to_u8()),
                );
            }
            _ => {
                if stroke.opacity != Opacity::default() {
                    xml.write_attribute("android:strokeAlpha", &Num(stroke.opacity.value()));
                }
            }
        }

        xml.write_attribute("android:strokeWidth", &Num(stroke.width));

        match stroke.linecap {
            LineCap::Butt => {}
            LineCap::Round => xml.write_attribute("android:strokeLineCap", "round"),
            LineCap::Square => xml.write_attribute("android:strokeLineCap", "square"),
        }

        match stroke.linejoin {
            LineJoin::Miter => {}
            LineJoin::Round => xml.write_attribute("android:strokeLineJoin", "round"),
            LineJoin::Bevel => xml.write_attribute("android:strokeLineJoin", "bevel"),
        }

        if stroke.miterlimit != 4.0 {
            xml.write_attribute("android:strokeMiterLimit", &Num(stroke.miterlimit));
        }
    }

    if let Some(ref fill) = path.fill {
        conv_gradient(&fill.paint, "android:fillColor", xml);
    }
    if let Some(ref stroke) = path.stroke {
        conv_gradient(&stroke.paint, "android:strokeColor", xml);
    }

    xml.end_element();
}

/// Writes a gradient paint as an `aapt:attr` child element.
fn conv_gradient(paint: &Paint, attr_name: &str, xml: &mut XmlWriter) {
    match paint {
        Paint::Color(_) => {}
        Paint::LinearGradient(ref lg) => {
            start_gradient(attr_name, xml);
            xml.write_attribute("android:type", "linear");
            xml.write_attribute("android:startX", &Num(lg.x1));
            xml.write_attribute("android:startY", &Num(lg.y1));
            xml.write_attribute("android:endX", &Num(lg.x2));
            xml.write_attribute("android:endY", &Num(lg.y2));
            conv_base_gradient(lg.spread_method, &lg.stops, xml);
        }
        Paint::RadialGradient(ref rg) => {
            start_gradient(attr_name, xml);
            xml.write_attribute("android:type", "radial");
            xml.write_attribute("android:centerX", &Num(rg.cx));
            xml.write_attribute("android:centerY", &Num(rg.cy));
            xml.write_attribute("android:gradientRadius", &Num(rg.r));
            conv_base_gradient(rg.spread_method, &rg.stops, xml);
        }
    }
}

fn start_gradient(attr_name: &str, xml: &mut XmlWriter) {
    xml.start_element("aapt:attr");
    xml.write_attribute("name", attr_name);
    xml.start_element("gradient");
}

fn conv_base_gradient(spread_method: SpreadMethod, stops: &[Stop], xml: &mut XmlWriter) {
    match spread_method {
        SpreadMethod::Pad => {} // `clamp` is the default
        SpreadMethod::Reflect => xml.write_attribute("android:tileMode", "mirror"),
        SpreadMethod::Repeat => xml.write_attribute("android:tileMode", "repeat"),
    }

    for stop in stops {
        xml.start_element("item");
        xml.write_attribute("android:offset", &Num(stop.offset.value()));
        xml.write_attribute("android:color", &ColorRef(stop.color, stop.opacity.to_u8()));
        xml.end_element();
    }

    xml.end_element(); // gradient
    xml.end_element(); // aapt:attr
}

/// A number rounded to 4 decimal places for writing.
///
/// Fixed precision keeps the output byte-identical between runs and
/// platforms.
struct Num(f64);

impl Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = (self.0 * 10_000.0).round() / 10_000.0;
        // `-0` would be noise.
        let n = if n == 0.0 { 0.0 } else { n };
        write!(f, "{}", n)
    }
}

/// An `#AARRGGBB` color for writing.
struct ColorRef(Color, u8);

impl Display for ColorRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#{:02X}{:02X}{:02X}{:02X}",
            self.1, self.0.red, self.0.green, self.0.blue
        )
    }
}

struct PathDataRef<'a>(&'a PathData);

impl Display for PathDataRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }

            match *seg {
                PathSegment::MoveTo { x, y } => {
                    write!(f, "M {} {}", Num(x), Num(y))?;
                }
                PathSegment::LineTo { x, y } => {
                    write!(f, "L {} {}", Num(x), Num(y))?;
                }
                PathSegment::CurveTo { x1, y1, x2, y2, x, y } => {
                    write!(
                        f,
                        "C {} {} {} {} {} {}",
                        Num(x1),
                        Num(y1),
                        Num(x2),
                        Num(y2),
                        Num(x),
                        Num(y)
                    )?;
                }
                PathSegment::QuadTo { x1, y1, x, y } => {
                    write!(f, "Q {} {} {} {}", Num(x1), Num(y1), Num(x), Num(y))?;
                }
                PathSegment::ArcTo {
                    rx,
                    ry,
                    x_axis_rotation,
                    large_arc,
                    sweep,
                    x,
                    y,
                } => {
                    write!(
                        f,
                        "A {} {} {} {} {} {} {}",
                        Num(rx),
                        Num(ry),
                        Num(x_axis_rotation),
                        large_arc as u8,
                        sweep as u8,
                        Num(x),
                        Num(y)
                    )?;
                }
                PathSegment::ClosePath => {
                    write!(f, "Z")?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formatting() {
        assert_eq!(Num(24.0).to_string(), "24");
        assert_eq!(Num(10.5).to_string(), "10.5");
        assert_eq!(Num(0.123456).to_string(), "0.1235");
        assert_eq!(Num(-0.00001).to_string(), "0");
    }

    #[test]
    fn color_formatting() {
        assert_eq!(ColorRef(Color::new_rgb(255, 0, 127), 255).to_string(), "#FFFF007F");
        assert_eq!(ColorRef(Color::black(), 128).to_string(), "#80000000");
    }
}
