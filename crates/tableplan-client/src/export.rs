//! Flat rendering of a scene document into export artifacts.
//!
//! Two artifacts leave the editor: a small PNG thumbnail for scene lists
//! and a single-page SVG document for printing. Both are produced from the
//! serialized document, independent of any interactive drawing surface.

use kurbo::{Point, Rect};
use png::{BitDepth, ColorType, Encoder};
use tableplan_core::element::{Color, Element, ElementKind};
use tableplan_core::scene::SceneDocument;
use tableplan_core::snap::{SCENE_HEIGHT, SCENE_WIDTH};
use thiserror::Error;

/// Thumbnail raster scale relative to scene units.
const THUMBNAIL_SCALE: f64 = 0.2;

/// Stroke width used for SVG outlines.
const SVG_STROKE_WIDTH: f64 = 2.0;
/// Font size for element captions in the SVG document.
const SVG_CAPTION_SIZE: f64 = 12.0;

/// Export rendering errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("png encoding error: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Render the scene to a small flat PNG (RGBA, white background).
///
/// Elements are drawn back to front as solid footprints; fully
/// transparent fills (text labels) leave no mark.
pub fn render_thumbnail(document: &SceneDocument) -> Result<Vec<u8>, ExportError> {
    let width = (SCENE_WIDTH * THUMBNAIL_SCALE) as u32;
    let height = (SCENE_HEIGHT * THUMBNAIL_SCALE) as u32;
    let mut pixels = vec![255u8; (width * height * 4) as usize];

    for element in &document.elements {
        let fill = element.style.fill;
        if fill.a == 0 {
            continue;
        }
        let bbox = rotated_bounds(element);
        let x0 = ((bbox.x0 * THUMBNAIL_SCALE).floor().max(0.0)) as u32;
        let y0 = ((bbox.y0 * THUMBNAIL_SCALE).floor().max(0.0)) as u32;
        let x1 = ((bbox.x1 * THUMBNAIL_SCALE).ceil() as u32).min(width);
        let y1 = ((bbox.y1 * THUMBNAIL_SCALE).ceil() as u32).min(height);

        for py in y0..y1 {
            for px in x0..x1 {
                let scene_point = Point::new(
                    (px as f64 + 0.5) / THUMBNAIL_SCALE,
                    (py as f64 + 0.5) / THUMBNAIL_SCALE,
                );
                if element.hit_test(scene_point, 0.0) {
                    blend_pixel(&mut pixels, width, px, py, fill);
                }
            }
        }
    }

    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, width, height);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
    }
    Ok(out)
}

/// Render the scene to a single-page SVG document.
pub fn render_svg(document: &SceneDocument) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{SCENE_WIDTH}\" \
         height=\"{SCENE_HEIGHT}\" viewBox=\"0 0 {SCENE_WIDTH} {SCENE_HEIGHT}\">\n",
    ));
    svg.push_str(&format!(
        "  <rect width=\"{SCENE_WIDTH}\" height=\"{SCENE_HEIGHT}\" fill=\"#ffffff\"/>\n",
    ));

    for element in &document.elements {
        push_element_svg(&mut svg, element);
    }

    svg.push_str("</svg>\n");
    svg
}

fn push_element_svg(svg: &mut String, element: &Element) {
    let bounds = element.bounds();
    let center = element.center();
    let fill = element.style.fill;
    let stroke = element.style.stroke;

    match &element.kind {
        ElementKind::RoundTable { radius, .. } => {
            svg.push_str(&format!(
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" \
                 stroke-width=\"{SVG_STROKE_WIDTH}\"/>\n",
                center.x,
                center.y,
                radius,
                fill.to_hex(),
                stroke.to_hex(),
            ));
        }
        ElementKind::Label { text, font_size } => {
            for (i, line) in text.lines().enumerate() {
                let y = bounds.y0 + font_size * 1.2 * (i as f64 + 1.0);
                svg.push_str(&format!(
                    "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>\n",
                    bounds.x0,
                    y,
                    font_size,
                    stroke.to_hex(),
                    xml_escape(line),
                ));
            }
            return;
        }
        _ => {
            let transform = if element.rotation != 0.0 {
                format!(
                    " transform=\"rotate({} {} {})\"",
                    element.rotation, center.x, center.y
                )
            } else {
                String::new()
            };
            svg.push_str(&format!(
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" \
                 stroke=\"{}\" stroke-width=\"{SVG_STROKE_WIDTH}\"{}/>\n",
                bounds.x0,
                bounds.y0,
                bounds.width(),
                bounds.height(),
                fill.to_hex(),
                stroke.to_hex(),
                transform,
            ));
        }
    }

    if !element.style.label.is_empty() {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"{SVG_CAPTION_SIZE}\" \
             text-anchor=\"middle\" fill=\"{}\">{}</text>\n",
            center.x,
            center.y + SVG_CAPTION_SIZE / 2.0,
            element.style.stroke.to_hex(),
            xml_escape(&element.style.label),
        ));
    }
}

/// Axis-aligned box enclosing the element after rotation.
fn rotated_bounds(element: &Element) -> Rect {
    let b = element.bounds();
    if element.rotation == 0.0 {
        return b;
    }
    let c = element.center();
    let (sin, cos) = element.rotation.to_radians().sin_cos();
    let corners = [(b.x0, b.y0), (b.x1, b.y0), (b.x1, b.y1), (b.x0, b.y1)];
    let mut out: Option<Rect> = None;
    for (x, y) in corners {
        let dx = x - c.x;
        let dy = y - c.y;
        let p = Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos);
        out = Some(match out {
            Some(r) => r.union_pt(p),
            None => Rect::from_points(p, p),
        });
    }
    out.unwrap_or(b)
}

fn blend_pixel(pixels: &mut [u8], width: u32, x: u32, y: u32, color: Color) {
    let idx = ((y * width + x) * 4) as usize;
    let a = color.a as u32;
    let inv = 255 - a;
    for (offset, src) in [color.r, color.g, color.b].into_iter().enumerate() {
        let dst = pixels[idx + offset] as u32;
        pixels[idx + offset] = ((src as u32 * a + dst * inv) / 255) as u8;
    }
    pixels[idx + 3] = 255;
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableplan_core::element::ElementType;
    use tableplan_core::scene::SceneGraph;

    fn sample_document() -> SceneDocument {
        let mut scene = SceneGraph::new();
        scene.create_element(ElementType::RoundTable, Point::new(100.0, 100.0));
        let stage = scene.create_element(ElementType::Stage, Point::new(400.0, 200.0));
        scene.update_geometry(
            stage,
            tableplan_core::scene::GeometryPatch::rotation(30.0),
        );
        scene.create_element(ElementType::Label, Point::new(600.0, 100.0));
        scene.to_document()
    }

    #[test]
    fn test_thumbnail_dimensions_and_content() {
        let bytes = render_thumbnail(&sample_document()).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(&bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        assert_eq!(info.width, 400);
        assert_eq!(info.height, 240);

        // Center of the round table: scene (160,160) -> pixel (32,32)
        let idx = (32 * 400 + 32) * 4;
        assert_eq!(&buf[idx..idx + 4], &[0xde, 0xb8, 0x87, 0xff]);

        // Top-left corner stays background white
        assert_eq!(&buf[0..4], &[0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_empty_scene_thumbnail_is_blank() {
        let bytes = render_thumbnail(&SceneDocument::default()).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_svg_structure() {
        let svg = render_svg(&sample_document());
        assert!(svg.starts_with("<svg "));
        assert!(svg.ends_with("</svg>\n"));
        assert!(svg.contains("<circle "));
        assert!(svg.contains("rotate(30 "));
        assert!(svg.contains("<text "));
    }

    #[test]
    fn test_svg_escapes_label_text() {
        let mut scene = SceneGraph::new();
        let id = scene.create_element(ElementType::Label, Point::new(100.0, 100.0));
        let mut editor = tableplan_core::EditorState::from_scene(scene);
        editor.apply(tableplan_core::Command::SetLabel {
            id,
            text: "Bride & Groom <3".to_string(),
        });
        let svg = render_svg(&editor.scene.to_document());
        assert!(svg.contains("Bride &amp; Groom &lt;3"));
        assert!(!svg.contains("& Groom <3"));
    }

    #[test]
    fn test_rotated_bounds_cover_rotation() {
        let mut el = Element::new(ElementType::RectTable, Point::new(100.0, 100.0));
        el.set_rotation(90.0);
        let b = rotated_bounds(&el);
        // 120x60 rotated a quarter turn: the box is 60x120 around the center
        assert!((b.width() - 60.0).abs() < 1e-9);
        assert!((b.height() - 120.0).abs() < 1e-9);
    }
}
