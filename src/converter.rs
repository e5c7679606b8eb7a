// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::fmt;

use svgtypes::LengthUnit as Unit;

use crate::geom::{FuzzyZero, Rect, Transform};
use crate::svgtree::{AId, EId, SvgNode};
use crate::tree::{Group, Node, Path, Tree};
use crate::{shapes, style, Error, Options};

/// A kind of a recoverable conversion problem.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WarningKind {
    /// A recognized but unconvertible element, or an unknown element.
    UnsupportedElement,

    /// A shape with invalid or out-of-range attributes.
    MalformedAttribute,

    /// A `url(#id)` reference without a matching gradient definition.
    UnresolvedReference,
}

/// A recoverable conversion problem.
///
/// Warnings never abort a conversion. The affected element is skipped
/// or degraded and the document walk continues.
#[derive(Clone, Debug)]
pub struct Warning {
    /// The problem kind.
    pub kind: WarningKind,

    /// The tag name of the element that triggered the warning.
    pub element: String,

    /// A human-readable explanation.
    pub details: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>: {}", self.element, self.details)
    }
}

pub(crate) struct State<'a, 'input: 'a> {
    /// The viewport rect of the root SVG element.
    pub view_box: Rect,
    /// Gradient definitions by id, collected once per document.
    pub gradients: HashMap<&'a str, SvgNode<'a, 'input>>,
    pub warnings: Vec<Warning>,
}

impl State<'_, '_> {
    pub fn warn(&mut self, kind: WarningKind, element: &str, details: String) {
        log::warn!("<{}>: {}", element, details);
        self.warnings.push(Warning {
            kind,
            element: element.to_string(),
            details,
        });
    }
}

/// Converts a parsed document into a `Tree`.
pub(crate) fn convert_doc(doc: &roxmltree::Document, opt: &Options) -> Result<Tree, Error> {
    let root = SvgNode(doc.root_element());
    if root.tag_name() != Some(EId::Svg) {
        return Err(Error::NotAnSvg);
    }

    let view_box = resolve_view_box(root, opt);
    if !view_box.is_valid() {
        return Err(Error::InvalidSize);
    }

    let (width, height) = resolve_size(root, view_box);
    if !(width > 0.0 && height > 0.0) {
        return Err(Error::InvalidSize);
    }

    let mut gradients = HashMap::new();
    for node in doc.root().descendants().filter(|n| n.is_element()).map(SvgNode) {
        if let Some(tag) = node.tag_name() {
            if tag.is_gradient() && node.has_element_id() {
                gradients.entry(node.element_id()).or_insert(node);
            }
        }
    }

    let mut state = State {
        view_box,
        gradients,
        warnings: Vec::new(),
    };

    // Android has no viewport offset, so a viewBox origin becomes
    // a translation of the whole content.
    let mut root_ts = Transform::default();
    if !view_box.x.is_fuzzy_zero() || !view_box.y.is_fuzzy_zero() {
        root_ts = Transform::new_translate(-view_box.x, -view_box.y);
    }

    let mut children = Vec::new();
    convert_children(root, root_ts, &mut state, &mut children);

    Ok(Tree {
        width,
        height,
        viewport_width: view_box.width,
        viewport_height: view_box.height,
        children,
        warnings: state.warnings,
    })
}

/// Resolves the viewport: the `viewBox` when present, the root size
/// otherwise, the default size as the last resort.
fn resolve_view_box(root: SvgNode, opt: &Options) -> Rect {
    if let Some(vb) = root.attribute::<svgtypes::ViewBox>(AId::ViewBox) {
        return Rect::new(vb.x, vb.y, vb.w, vb.h);
    }

    let width = root_length(root, AId::Width, opt.default_width);
    let height = root_length(root, AId::Height, opt.default_height);
    Rect::new(0.0, 0.0, width, height)
}

/// Resolves the canvas size in dp, which mirrors the root `width`/`height`
/// and falls back to the viewport size.
fn resolve_size(root: SvgNode, view_box: Rect) -> (f64, f64) {
    (
        root_length(root, AId::Width, view_box.width),
        root_length(root, AId::Height, view_box.height),
    )
}

fn root_length(root: SvgNode, aid: AId, def: f64) -> f64 {
    match root.attribute::<svgtypes::Length>(aid) {
        // A percentage root size has nothing to resolve against.
        Some(length) if length.unit != Unit::Percent => length.number,
        _ => def,
    }
}

pub(crate) fn convert_children(
    parent: SvgNode,
    ts: Transform,
    state: &mut State,
    out: &mut Vec<Node>,
) {
    for node in parent.children() {
        convert_element(node, ts, state, out);
    }
}

fn convert_element(node: SvgNode, ts: Transform, state: &mut State, out: &mut Vec<Node>) {
    let tag = match node.tag_name() {
        Some(v) => v,
        None => {
            state.warn(
                WarningKind::UnsupportedElement,
                node.tag_name_str(),
                "is not a known SVG element. Skipped.".to_string(),
            );
            return;
        }
    };

    match tag {
        EId::G => {
            convert_group(node, ts, state, out);
        }
        tag if tag.is_shape() => {
            convert_shape(node, tag, ts, state, out);
        }
        EId::Text | EId::ClipPath | EId::Mask | EId::Filter | EId::Image | EId::Svg => {
            state.warn(
                WarningKind::UnsupportedElement,
                tag.to_str(),
                "is not supported. Skipped.".to_string(),
            );
        }
        EId::Style => {
            state.warn(
                WarningKind::UnsupportedElement,
                tag.to_str(),
                "CSS style sheets are not supported. Skipped.".to_string(),
            );
        }
        // Non-rendering elements. Gradients were collected beforehand.
        EId::Defs
        | EId::Title
        | EId::Desc
        | EId::Metadata
        | EId::LinearGradient
        | EId::RadialGradient
        | EId::Stop => {}
        _ => {}
    }
}

fn convert_shape(node: SvgNode, tag: EId, ts: Transform, state: &mut State, out: &mut Vec<Node>) {
    let mut path = match shapes::convert(node, state) {
        Some(v) => v,
        None => return,
    };

    let mut ts = ts;
    if let Some(own) = node.attribute::<Transform>(AId::Transform) {
        ts.append(&own);
    }
    if !ts.is_default() {
        path.transform(ts);
    }

    let bbox = path.bbox();
    let fill = style::resolve_fill(node, tag, bbox, state);
    let stroke = style::resolve_stroke(node, bbox, state);

    out.push(Node::Path(Path {
        data: path,
        fill,
        stroke,
    }));
}

fn convert_group(node: SvgNode, ts: Transform, state: &mut State, out: &mut Vec<Node>) {
    let own: Transform = node.attribute(AId::Transform).unwrap_or_default();
    let mut new_ts = ts;
    new_ts.append(&own);

    if own.is_default() {
        // Nothing to carry, flatten the group away.
        convert_children(node, new_ts, state, out);
        return;
    }

    let mut children = Vec::new();
    convert_children(node, new_ts, state, &mut children);
    if children.is_empty() {
        return;
    }

    let name = if node.has_element_id() {
        Some(node.element_id().to_string())
    } else {
        None
    };

    out.push(Node::Group(Group { name, children }));
}

/// Resolves a length attribute into user units.
///
/// Percentages are resolved against the viewport side matching the
/// attribute's axis.
pub(crate) fn resolve_length(node: SvgNode, aid: AId, state: &State, def: f64) -> f64 {
    match node.find_attribute::<svgtypes::Length>(aid) {
        Some(length) => match length.unit {
            Unit::Percent => {
                let reference = match aid {
                    AId::X | AId::X1 | AId::X2 | AId::Cx | AId::Rx | AId::Width => {
                        state.view_box.width
                    }
                    AId::Y | AId::Y1 | AId::Y2 | AId::Cy | AId::Ry | AId::Height => {
                        state.view_box.height
                    }
                    _ => state.view_box.width.min(state.view_box.height),
                };
                length.number / 100.0 * reference
            }
            // Font-relative and physical units are passed through as
            // user units, like the rest of this converter does.
            _ => length.number,
        },
        None => def,
    }
}
