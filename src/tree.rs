// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::pathdata::PathData;
use crate::style::{Fill, Stroke};
use crate::{converter, writer, Error, Options, Warning, XmlOptions};

/// A vector drawable document.
///
/// The result of a conversion: everything is resolved and ready to be
/// serialized.
#[derive(Clone, Debug)]
pub struct Tree {
    /// The canvas width in dp.
    pub width: f64,

    /// The canvas height in dp.
    pub height: f64,

    /// The viewport width.
    pub viewport_width: f64,

    /// The viewport height.
    pub viewport_height: f64,

    /// Top-level nodes in source document order.
    pub children: Vec<Node>,

    /// Warnings accumulated during the conversion.
    pub warnings: Vec<Warning>,
}

impl Tree {
    /// Parses an SVG document and converts it into a `Tree`.
    ///
    /// # Errors
    ///
    /// - When the text is not well-formed XML.
    /// - When the root element is not `svg`.
    /// - When the document size cannot be resolved to a positive value.
    pub fn from_str(text: &str, opt: &Options) -> Result<Self, Error> {
        let doc = roxmltree::Document::parse(text)?;
        converter::convert_doc(&doc, opt)
    }

    /// Serializes the tree into an Android Vector Drawable XML string.
    ///
    /// The output is deterministic: a fixed attribute order per element
    /// and numbers rounded to 4 decimal places.
    pub fn to_string(&self, opt: &XmlOptions) -> String {
        writer::convert(self, opt)
    }

    /// Checks whether any node is painted with a gradient.
    pub fn has_gradients(&self) -> bool {
        has_gradients(&self.children)
    }
}

fn has_gradients(nodes: &[Node]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Path(path) => {
            path.fill.as_ref().map_or(false, |f| f.paint.is_gradient())
                || path.stroke.as_ref().map_or(false, |s| s.paint.is_gradient())
        }
        Node::Group(group) => has_gradients(&group.children),
    })
}

/// A drawable node.
#[allow(missing_docs)]
#[derive(Clone, Debug)]
pub enum Node {
    Path(Path),
    Group(Group),
}

/// A `path` output element.
#[derive(Clone, Debug)]
pub struct Path {
    /// The path geometry. Transforms are already applied.
    pub data: PathData,

    /// The fill paint. `None` means no fill.
    pub fill: Option<Fill>,

    /// The stroke paint. `None` means no stroke.
    pub stroke: Option<Stroke>,
}

/// A `group` output element.
///
/// Produced only for source groups that carry a non-identity transform;
/// other groups are flattened away.
#[derive(Clone, Debug)]
pub struct Group {
    /// The source element's id, if any.
    pub name: Option<String>,

    /// Child nodes in source document order.
    pub children: Vec<Node>,
}
