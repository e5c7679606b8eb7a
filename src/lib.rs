// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svg2avd` converts an [SVG] document into an [Android Vector Drawable].

## Purpose

Android cannot display SVG files directly. Its own vector format understands
a similar, but much smaller vocabulary: a `vector` root, `path` and `group`
elements and gradients embedded via `aapt:attr`. This crate performs the
structural conversion between the two: shape geometry is rewritten as
Android path data, inline styles and presentation attributes are resolved
into concrete paints, group transforms are composed and baked into the
geometry, and gradient definitions are re-encoded as `gradient` elements.

The conversion is a pure function from text to text. The library never
touches the file system; the bundled CLI is a thin shell around
[`convert`].

## Key properties of the output

- Only `path` and `group` elements. All shapes (`rect`, `circle`,
  `ellipse`, `line`, `polyline`, `polygon`) become paths.
- All path segments are absolute with explicit commands.
- All colors are normalized to `#AARRGGBB`.
- Transforms are resolved. Group and element transforms are composed and
  applied to the emitted geometry.
- Deterministic serialization. Converting the same document twice produces
  byte-identical output.

## Limitations

- `text`, `clipPath`, `mask`, `filter` and `image` elements are not
  converted. They are skipped with a recorded [`Warning`].
- CSS support is limited to the inline `style` attribute.
- Scripting and animation are not supported and not planned.

[SVG]: https://en.wikipedia.org/wiki/Scalable_Vector_Graphics
[Android Vector Drawable]: https://developer.android.com/develop/ui/views/graphics/vector-drawable-resources
*/

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

macro_rules! impl_enum_default {
    ($name:ident, $def_value:ident) => {
        impl Default for $name {
            #[inline]
            fn default() -> Self {
                $name::$def_value
            }
        }
    };
}

macro_rules! impl_enum_from_str {
    ($name:ident, $($string:pat => $result:expr),+) => {
        impl crate::svgtree::EnumFromStr for $name {
            fn enum_from_str(s: &str) -> Option<Self> {
                match s {
                    $($string => Some($result)),+,
                    _ => None,
                }
            }
        }
    };
}

mod converter;
mod error;
mod geom;
mod numbers;
mod paint_server;
mod pathdata;
mod shapes;
mod style;
mod svgtree;
mod tree;
mod writer;

pub use xmlwriter::Indent as XmlIndent;
pub use xmlwriter::Options as XmlOptions;

pub use crate::converter::{Warning, WarningKind};
pub use crate::error::Error;
pub use crate::geom::{Rect, Transform};
pub use crate::numbers::{NormalizedValue, Opacity};
pub use crate::paint_server::{
    BaseGradient, LinearGradient, RadialGradient, SpreadMethod, Stop, StopOffset,
};
pub use crate::pathdata::{PathData, PathSegment};
pub use crate::style::{Color, Fill, FillRule, LineCap, LineJoin, Paint, Stroke};
pub use crate::tree::{Group, Node, Path, Tree};

/// Checks that the current number is > 0.
pub trait IsValidLength {
    /// Checks that the current number is > 0.
    fn is_valid_length(&self) -> bool;
}

impl IsValidLength for f64 {
    #[inline]
    fn is_valid_length(&self) -> bool {
        *self > 0.0
    }
}

/// Processing options.
#[derive(Clone, Debug)]
pub struct Options {
    /// The default canvas width in px.
    ///
    /// Used when the document provides neither a usable `width`
    /// nor a `viewBox`.
    ///
    /// Default: 24.0
    pub default_width: f64,

    /// The default canvas height in px.
    ///
    /// Default: 24.0
    pub default_height: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            default_width: 24.0,
            default_height: 24.0,
        }
    }
}

/// Converts an SVG document into an Android Vector Drawable document.
///
/// This is a shorthand for [`Tree::from_str`] followed by
/// [`Tree::to_string`] with default serialization options.
///
/// Returns the serialized XML and the list of warnings accumulated while
/// walking the document. Warnings never abort the conversion; a parsing
/// failure or an invalid root does.
pub fn convert(text: &str, opt: &Options) -> Result<(String, Vec<Warning>), Error> {
    let tree = Tree::from_str(text, opt)?;
    let xml = tree.to_string(&XmlOptions::default());
    Ok((xml, tree.warnings))
}
