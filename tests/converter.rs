use svg2avd::{convert, Error, Options, WarningKind};

fn convert_ok(svg: &str) -> (String, Vec<svg2avd::Warning>) {
    convert(svg, &Options::default()).unwrap()
}

fn convert_clean(svg: &str) -> String {
    let (xml, warnings) = convert_ok(svg);
    assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    xml
}

#[test]
fn idempotence() {
    let svg = "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
               <rect x='1' y='2' width='10' height='5'/>\
               <circle cx='12' cy='12' r='10'/>\
               </svg>";
    let (xml1, _) = convert_ok(svg);
    let (xml2, _) = convert_ok(svg);
    assert_eq!(xml1, xml2);
}

#[test]
fn minimal_rect() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect x='1' y='2' width='10' height='5'/>\
         </svg>",
    );
    assert!(xml.contains("android:width=\"24dp\""));
    assert!(xml.contains("android:height=\"24dp\""));
    assert!(xml.contains("android:viewportWidth=\"24\""));
    assert!(xml.contains("android:viewportHeight=\"24\""));
    assert!(xml.contains("android:pathData=\"M 1 2 L 11 2 L 11 7 L 1 7 Z\""));
    // The SVG fill default is black.
    assert!(xml.contains("android:fillColor=\"#FF000000\""));
    // No gradients, no aapt namespace.
    assert!(!xml.contains("xmlns:aapt"));
}

#[test]
fn rounded_rect_uses_arcs() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect x='0' y='0' width='10' height='10' rx='2'/>\
         </svg>",
    );
    assert!(xml.contains(
        "android:pathData=\"M 2 0 L 8 0 A 2 2 0 0 1 10 2 L 10 8 A 2 2 0 0 1 8 10 \
         L 2 10 A 2 2 0 0 1 0 8 L 0 2 A 2 2 0 0 1 2 0 Z\""
    ));
}

#[test]
fn circle_as_two_arcs() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <circle cx='12' cy='12' r='10'/>\
         </svg>",
    );
    assert!(xml.contains(
        "android:pathData=\"M 2 12 A 10 10 0 1 0 22 12 A 10 10 0 1 0 2 12 Z\""
    ));
}

#[test]
fn ellipse_as_two_arcs() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <ellipse cx='12' cy='12' rx='8' ry='4'/>\
         </svg>",
    );
    assert!(xml.contains(
        "android:pathData=\"M 4 12 A 8 4 0 1 0 20 12 A 8 4 0 1 0 4 12 Z\""
    ));
}

#[test]
fn line_is_open_and_unfilled() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <line x1='0' y1='0' x2='10' y2='10' stroke='black'/>\
         </svg>",
    );
    assert!(xml.contains("android:pathData=\"M 0 0 L 10 10\""));
    assert!(xml.contains("android:strokeColor=\"#FF000000\""));
    assert!(xml.contains("android:strokeWidth=\"1\""));
    assert!(!xml.contains("android:fillColor"));
}

#[test]
fn polygon_closes_polyline_does_not() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <polygon points='0,0 10,0 10,10'/>\
         <polyline points='0,0 10,0 10,10' stroke='black'/>\
         </svg>",
    );
    assert!(xml.contains("android:pathData=\"M 0 0 L 10 0 L 10 10 Z\""));
    assert!(xml.contains("android:pathData=\"M 0 0 L 10 0 L 10 10\""));
}

#[test]
fn path_data_is_normalized() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <path d='m 10 10 h 10 v 10 z'/>\
         </svg>",
    );
    assert!(xml.contains("android:pathData=\"M 10 10 L 20 10 L 20 20 Z\""));
}

#[test]
fn group_transform_offsets_geometry() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <g transform='translate(10,10)'><rect x='0' y='0' width='5' height='5'/></g>\
         </svg>",
    );
    assert!(xml.contains("<group>"));
    assert!(xml.contains("android:pathData=\"M 10 10 L 15 10 L 15 15 L 10 15 Z\""));
}

#[test]
fn identity_group_is_flattened() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <g><rect x='0' y='0' width='5' height='5'/></g>\
         </svg>",
    );
    assert!(!xml.contains("<group"));
    assert!(xml.contains("android:pathData=\"M 0 0 L 5 0 L 5 5 L 0 5 Z\""));
}

#[test]
fn nested_group_transforms_compose() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <g transform='translate(10,0)'>\
         <g transform='translate(0,5)'>\
         <rect x='0' y='0' width='2' height='2'/>\
         </g></g>\
         </svg>",
    );
    assert!(xml.contains("android:pathData=\"M 10 5 L 12 5 L 12 7 L 10 7 Z\""));
}

#[test]
fn named_group_keeps_its_id() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <g id='wheel' transform='translate(1,1)'><rect width='2' height='2'/></g>\
         </svg>",
    );
    assert!(xml.contains("android:name=\"wheel\""));
}

#[test]
fn element_transform_is_baked() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect x='0' y='0' width='4' height='4' transform='translate(3 4)'/>\
         </svg>",
    );
    assert!(xml.contains("android:pathData=\"M 3 4 L 7 4 L 7 8 L 3 8 Z\""));
}

#[test]
fn view_box_origin_becomes_translation() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='10 10 24 24'>\
         <rect x='10' y='10' width='24' height='24'/>\
         </svg>",
    );
    assert!(xml.contains("android:viewportWidth=\"24\""));
    assert!(xml.contains("android:pathData=\"M 0 0 L 24 0 L 24 24 L 0 24 Z\""));
}

#[test]
fn style_attribute_wins_over_presentation() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect width='5' height='5' fill='#00ff00' style='fill:#ff0000'/>\
         </svg>",
    );
    assert!(xml.contains("android:fillColor=\"#FFFF0000\""));
}

#[test]
fn colors_are_normalized_to_argb() {
    for fill in &["#f00", "#ff0000", "rgb(255, 0, 0)", "red"] {
        let xml = convert_clean(&format!(
            "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
             <rect width='5' height='5' fill='{}'/>\
             </svg>",
            fill
        ));
        assert!(
            xml.contains("android:fillColor=\"#FFFF0000\""),
            "fill '{}' was not normalized",
            fill
        );
    }
}

#[test]
fn fill_opacity_is_folded_into_alpha() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect width='5' height='5' fill='#000000' fill-opacity='0.5'/>\
         </svg>",
    );
    assert!(xml.contains("android:fillColor=\"#80000000\""));
}

#[test]
fn group_fill_is_inherited() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <g fill='#0000ff'><rect width='5' height='5'/></g>\
         </svg>",
    );
    assert!(xml.contains("android:fillColor=\"#FF0000FF\""));
}

#[test]
fn fill_rule_maps_to_fill_type() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <path d='M 0 0 L 10 0 L 10 10 Z' fill-rule='evenodd'/>\
         </svg>",
    );
    assert!(xml.contains("android:fillType=\"evenOdd\""));
}

#[test]
fn stroke_attributes_are_carried() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <path d='M 0 0 L 10 10' stroke='#102030' stroke-width='2.5' \
         stroke-linecap='round' stroke-linejoin='bevel'/>\
         </svg>",
    );
    assert!(xml.contains("android:strokeColor=\"#FF102030\""));
    assert!(xml.contains("android:strokeWidth=\"2.5\""));
    assert!(xml.contains("android:strokeLineCap=\"round\""));
    assert!(xml.contains("android:strokeLineJoin=\"bevel\""));
}

#[test]
fn linear_gradient_in_user_space() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <defs>\
         <linearGradient id='lg' gradientUnits='userSpaceOnUse' \
         x1='0' y1='0' x2='24' y2='0'>\
         <stop offset='0' stop-color='#ff0000'/>\
         <stop offset='1' stop-color='#00ff00'/>\
         </linearGradient>\
         </defs>\
         <rect width='24' height='24' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    assert!(xml.contains("xmlns:aapt=\"http://schemas.android.com/aapt\""));
    assert!(xml.contains("<aapt:attr"));
    assert!(xml.contains("name=\"android:fillColor\""));
    assert!(xml.contains("android:type=\"linear\""));
    assert!(xml.contains("android:startX=\"0\""));
    assert!(xml.contains("android:endX=\"24\""));
    assert!(xml.contains("android:offset=\"0\""));
    assert!(xml.contains("android:color=\"#FFFF0000\""));
    assert!(xml.contains("android:offset=\"1\""));
    assert!(xml.contains("android:color=\"#FF00FF00\""));
}

#[test]
fn gradient_stops_are_sorted_by_offset() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <linearGradient id='lg' gradientUnits='userSpaceOnUse' x2='24'>\
         <stop offset='1' stop-color='#00ff00'/>\
         <stop offset='0' stop-color='#ff0000'/>\
         </linearGradient>\
         <rect width='24' height='24' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    let first = xml.find("#FFFF0000").unwrap();
    let second = xml.find("#FF00FF00").unwrap();
    assert!(first < second, "stops are not in ascending offset order");
}

#[test]
fn gradient_resolves_against_bounding_box() {
    // The default gradient units are objectBoundingBox with
    // x1=0% y1=0% x2=100% y2=0%.
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 64 64'>\
         <linearGradient id='lg'>\
         <stop offset='0' stop-color='#fff'/>\
         <stop offset='1' stop-color='#000'/>\
         </linearGradient>\
         <rect x='10' y='10' width='20' height='10' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    assert!(xml.contains("android:startX=\"10\""));
    assert!(xml.contains("android:startY=\"10\""));
    assert!(xml.contains("android:endX=\"30\""));
    assert!(xml.contains("android:endY=\"10\""));
}

#[test]
fn radial_gradient_geometry() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <radialGradient id='rg' gradientUnits='userSpaceOnUse' \
         cx='12' cy='12' r='10'>\
         <stop offset='0' stop-color='#fff'/>\
         <stop offset='1' stop-color='#000'/>\
         </radialGradient>\
         <circle cx='12' cy='12' r='10' fill='url(#rg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    assert!(xml.contains("android:type=\"radial\""));
    assert!(xml.contains("android:centerX=\"12\""));
    assert!(xml.contains("android:centerY=\"12\""));
    assert!(xml.contains("android:gradientRadius=\"10\""));
}

#[test]
fn spread_method_maps_to_tile_mode() {
    let (xml, _) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <linearGradient id='lg' gradientUnits='userSpaceOnUse' x2='24' \
         spreadMethod='reflect'>\
         <stop offset='0' stop-color='#fff'/>\
         <stop offset='1' stop-color='#000'/>\
         </linearGradient>\
         <rect width='24' height='24' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(xml.contains("android:tileMode=\"mirror\""));
}

#[test]
fn stop_opacity_is_folded_into_stop_color() {
    let (xml, _) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <linearGradient id='lg' gradientUnits='userSpaceOnUse' x2='24'>\
         <stop offset='0' stop-color='#ffffff' stop-opacity='0.5'/>\
         <stop offset='1' stop-color='#000000'/>\
         </linearGradient>\
         <rect width='24' height='24' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(xml.contains("android:color=\"#80FFFFFF\""));
}

#[test]
fn gradient_stops_are_inherited_via_href() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' \
         xmlns:xlink='http://www.w3.org/1999/xlink' viewBox='0 0 24 24'>\
         <linearGradient id='base'>\
         <stop offset='0' stop-color='#ff0000'/>\
         <stop offset='1' stop-color='#0000ff'/>\
         </linearGradient>\
         <linearGradient id='lg' xlink:href='#base' \
         gradientUnits='userSpaceOnUse' x2='24'/>\
         <rect width='24' height='24' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    assert!(xml.contains("android:color=\"#FFFF0000\""));
    assert!(xml.contains("android:color=\"#FF0000FF\""));
}

#[test]
fn stroke_gradient_uses_stroke_color_attr() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <linearGradient id='lg' gradientUnits='userSpaceOnUse' x2='24'>\
         <stop offset='0' stop-color='#fff'/>\
         <stop offset='1' stop-color='#000'/>\
         </linearGradient>\
         <path d='M 0 0 L 24 24' stroke='url(#lg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    assert!(xml.contains("name=\"android:strokeColor\""));
}

#[test]
fn single_stop_gradient_degrades_to_solid() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <linearGradient id='lg'><stop offset='0' stop-color='#00ff00'/></linearGradient>\
         <rect width='5' height='5' fill='url(#lg)'/>\
         </svg>",
    );
    assert!(warnings.is_empty());
    assert!(xml.contains("android:fillColor=\"#FF00FF00\""));
    assert!(!xml.contains("aapt"));
}

#[test]
fn unsupported_element_is_skipped_with_one_warning() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <text x='0' y='0'>hello</text>\
         <rect width='5' height='5'/>\
         </svg>",
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::UnsupportedElement);
    assert_eq!(warnings[0].element, "text");
    assert!(xml.contains("<path"));
    assert!(!xml.contains("hello"));
}

#[test]
fn unknown_element_is_skipped_with_a_warning() {
    let (_, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <blink/>\
         </svg>",
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::UnsupportedElement);
    assert_eq!(warnings[0].element, "blink");
}

#[test]
fn negative_rect_width_is_skipped_with_a_warning() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect width='-5' height='5'/>\
         </svg>",
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::MalformedAttribute);
    assert!(!xml.contains("<path"));
}

#[test]
fn negative_circle_radius_is_skipped_with_a_warning() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <circle cx='5' cy='5' r='-1'/>\
         </svg>",
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::MalformedAttribute);
    assert!(!xml.contains("<path"));
}

#[test]
fn unresolved_gradient_falls_back_to_black() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect width='5' height='5' fill='url(#missing)'/>\
         </svg>",
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::UnresolvedReference);
    assert!(xml.contains("android:fillColor=\"#FF000000\""));
}

#[test]
fn unresolved_gradient_with_fallback_color() {
    let (xml, warnings) = convert_ok(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 24 24'>\
         <rect width='5' height='5' fill='url(#missing) #00ff00'/>\
         </svg>",
    );
    assert_eq!(warnings.len(), 1);
    assert!(xml.contains("android:fillColor=\"#FF00FF00\""));
}

#[test]
fn malformed_xml_is_a_parse_error() {
    let result = convert(
        "<svg xmlns='http://www.w3.org/2000/svg'><rect",
        &Options::default(),
    );
    assert!(matches!(result, Err(Error::ParsingFailed(_))));
}

#[test]
fn non_svg_root_is_rejected() {
    let result = convert("<html xmlns='x'></html>", &Options::default());
    assert!(matches!(result, Err(Error::NotAnSvg)));
}

#[test]
fn zero_size_is_rejected() {
    let result = convert(
        "<svg xmlns='http://www.w3.org/2000/svg' width='0' height='10'/>",
        &Options::default(),
    );
    assert!(matches!(result, Err(Error::InvalidSize)));
}

#[test]
fn px_size_is_converted_to_dp() {
    let xml = convert_clean(
        "<svg xmlns='http://www.w3.org/2000/svg' width='48px' height='48px'>\
         <rect width='5' height='5'/>\
         </svg>",
    );
    assert!(xml.contains("android:width=\"48dp\""));
    assert!(xml.contains("android:viewportWidth=\"48\""));
}

#[test]
fn default_size_applies_without_width_and_view_box() {
    let xml = convert_clean("<svg xmlns='http://www.w3.org/2000/svg'><rect width='5' height='5'/></svg>");
    assert!(xml.contains("android:width=\"24dp\""));
    assert!(xml.contains("android:viewportWidth=\"24\""));
}
