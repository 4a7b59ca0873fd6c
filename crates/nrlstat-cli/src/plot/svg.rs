use std::fmt::{self, Write as _};

use super::scene::{Anchor, Color, Scene, Shape};

/// Renders a scene as a standalone SVG document.
pub(crate) fn render(scene: &Scene) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height,
    )?;
    writeln!(
        &mut svg,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        scene.width,
        scene.height,
        Color::WHITE
    )?;
    for shape in &scene.shapes {
        write_shape(&mut svg, shape)?;
    }
    writeln!(&mut svg, "</svg>")?;
    Ok(svg)
}

fn write_shape(svg: &mut String, shape: &Shape) -> fmt::Result {
    match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            let fill = fill.map_or_else(|| "none".to_owned(), |c| c.to_string());
            write!(
                svg,
                r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{fill}""#
            )?;
            if let Some(stroke) = stroke {
                write!(svg, r#" stroke="{stroke}" stroke-width="1""#)?;
            }
            writeln!(svg, "/>")
        }
        Shape::Line {
            from,
            to,
            color,
            width,
            dashed,
        } => {
            write!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{color}" stroke-width="{width}""#,
                from.0, from.1, to.0, to.1
            )?;
            if *dashed {
                write!(svg, r#" stroke-dasharray="6,4""#)?;
            }
            writeln!(svg, "/>")
        }
        Shape::Circle {
            center,
            radius,
            fill,
        } => writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}" fill="{fill}" fill-opacity="0.8"/>"#,
            center.0, center.1
        ),
        Shape::Text {
            at,
            text,
            size,
            anchor,
            bold,
        } => {
            let anchor = match anchor {
                Anchor::Start => "start",
                Anchor::Middle => "middle",
                Anchor::End => "end",
            };
            let weight = if *bold { "bold" } else { "normal" };
            writeln!(
                svg,
                r#"<text x="{:.2}" y="{:.2}" font-family="sans-serif" font-size="{size}" font-weight="{weight}" text-anchor="{anchor}">{}</text>"#,
                at.0,
                at.1,
                escape(text)
            )
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_document() {
        let mut scene = Scene::new(200, 100);
        scene.rect(10.0, 20.0, 30.0, 40.0, Color(0x1f, 0x77, 0xb4), None);
        scene.dashed_line((0.0, 50.0), (200.0, 50.0), Color::REFERENCE, 2.0);
        scene.text((100.0, 90.0), "A<B & C", 12.0, Anchor::Middle);

        let svg = render(&scene).unwrap();
        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r##"<rect x="10.00" y="20.00" width="30.00" height="40.00" fill="#1f77b4"/>"##));
        assert!(svg.contains(r#"stroke-dasharray="6,4""#));
        assert!(svg.contains(">A&lt;B &amp; C</text>"));
    }

    #[test]
    fn test_frame_has_no_fill() {
        let mut scene = Scene::new(10, 10);
        scene.frame(1.0, 1.0, 8.0, 8.0, Color::AXIS);
        let svg = render(&scene).unwrap();
        assert!(svg.contains(r##"fill="none" stroke="#444444""##));
    }
}
