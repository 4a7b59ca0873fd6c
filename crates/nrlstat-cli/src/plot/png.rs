//! Raster backend. Text is not drawn; labels live in the SVG output.

use image::{Rgba, RgbaImage};

use super::scene::{Color, Scene, Shape};

const DASH_ON: f64 = 6.0;
const DASH_PERIOD: f64 = 10.0;

fn pixel(color: Color) -> Rgba<u8> {
    Rgba([color.0, color.1, color.2, 0xff])
}

/// Rasterizes a scene onto a white canvas of the scene's size.
pub(crate) fn rasterize(scene: &Scene) -> RgbaImage {
    let mut canvas = Canvas {
        image: RgbaImage::from_pixel(scene.width, scene.height, pixel(Color::WHITE)),
    };
    for shape in &scene.shapes {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                if let Some(fill) = fill {
                    canvas.fill_rect(*x, *y, *width, *height, *fill);
                }
                if let Some(stroke) = stroke {
                    let (x1, y1) = (x + width, y + height);
                    for (from, to) in [
                        ((*x, *y), (x1, *y)),
                        ((x1, *y), (x1, y1)),
                        ((x1, y1), (*x, y1)),
                        ((*x, y1), (*x, *y)),
                    ] {
                        canvas.line(from, to, *stroke, 1.0, false);
                    }
                }
            }
            Shape::Line {
                from,
                to,
                color,
                width,
                dashed,
            } => canvas.line(*from, *to, *color, *width, *dashed),
            Shape::Circle {
                center,
                radius,
                fill,
            } => canvas.fill_circle(*center, *radius, *fill),
            Shape::Text { .. } => {}
        }
    }
    canvas.image
}

struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.image.width() && y < self.image.height() {
            self.image.put_pixel(x, y, pixel(color));
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let (x0, x1) = (x.round() as i64, (x + width).round() as i64);
        let (y0, y1) = (y.round() as i64, (y + height).round() as i64);
        for py in y0.min(y1)..y0.max(y1) {
            for px in x0.min(x1)..x0.max(x1) {
                self.put(px, py, color);
            }
        }
    }

    /// Stamps a square brush of side `width` along the segment.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64, dashed: bool) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = dx.hypot(dy);
        let steps = (length * 2.0).ceil().max(1.0) as u64;
        let half = (width.max(1.0) / 2.0).floor() as i64;
        for step in 0..=steps {
            #[expect(clippy::cast_precision_loss)]
            let t = step as f64 / steps as f64;
            if dashed && (t * length) % DASH_PERIOD >= DASH_ON {
                continue;
            }
            let x = (from.0 + t * dx).round() as i64;
            let y = (from.1 + t * dy).round() as i64;
            for oy in -half..=half {
                for ox in -half..=half {
                    self.put(x + ox, y + oy, color);
                }
            }
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    fn fill_circle(&mut self, center: (f64, f64), radius: f64, color: Color) {
        let (cx, cy) = center;
        let (x0, x1) = ((cx - radius).floor() as i64, (cx + radius).ceil() as i64);
        let (y0, y1) = ((cy - radius).floor() as i64, (cy + radius).ceil() as i64);
        for py in y0..=y1 {
            for px in x0..=x1 {
                #[expect(clippy::cast_precision_loss)]
                let (fx, fy) = (px as f64 - cx, py as f64 - cy);
                if fx * fx + fy * fy <= radius * radius {
                    self.put(px, py, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_white() {
        let image = rasterize(&Scene::new(20, 10));
        assert_eq!(image.dimensions(), (20, 10));
        assert!(image.pixels().all(|p| *p == pixel(Color::WHITE)));
    }

    #[test]
    fn test_rect_fill_and_clipping() {
        let red = Color(0xff, 0, 0);
        let mut scene = Scene::new(10, 10);
        scene.rect(2.0, 2.0, 3.0, 3.0, red, None);
        scene.rect(8.0, 8.0, 10.0, 10.0, red, None);
        let image = rasterize(&scene);
        assert_eq!(*image.get_pixel(3, 3), pixel(red));
        assert_eq!(*image.get_pixel(5, 5), pixel(Color::WHITE));
        assert_eq!(*image.get_pixel(9, 9), pixel(red));
    }

    #[test]
    fn test_dashed_line_has_gaps() {
        let mut scene = Scene::new(40, 5);
        scene.dashed_line((0.0, 2.0), (39.0, 2.0), Color::BLACK, 1.0);
        let image = rasterize(&scene);
        assert_eq!(*image.get_pixel(2, 2), pixel(Color::BLACK));
        assert_eq!(*image.get_pixel(8, 2), pixel(Color::WHITE));
        assert_eq!(*image.get_pixel(12, 2), pixel(Color::BLACK));
    }

    #[test]
    fn test_circle_and_text() {
        let blue = Color(0, 0, 0xff);
        let mut scene = Scene::new(20, 20);
        scene.circle((10.0, 10.0), 3.0, blue);
        scene.title((10.0, 2.0), "ignored");
        let image = rasterize(&scene);
        assert_eq!(*image.get_pixel(10, 10), pixel(blue));
        assert_eq!(*image.get_pixel(10, 14), pixel(Color::WHITE));
        assert_eq!(*image.get_pixel(10, 2), pixel(Color::WHITE));
    }
}
