//! SVG-to-PNG rasterization using resvg.

use std::sync::Arc;

use resvg::tiny_skia;
use resvg::usvg;

use super::ExportOptions;
use crate::defaults;
use crate::errors::RenderError;

fn rasterize_error(message: impl Into<String>) -> RenderError {
    RenderError::Rasterize {
        message: message.into(),
    }
}

/// Rasterizes an SVG document to PNG bytes.
///
/// Without a target width the document's intrinsic size is used at 1:1.
/// The background is filled white unless `options.transparent` is set.
pub fn rasterize(svg: &str, options: &ExportOptions) -> Result<Vec<u8>, RenderError> {
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();

    let usvg_opts = usvg::Options {
        font_family: defaults::FONT_FAMILY.to_string(),
        fontdb: Arc::new(fontdb),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &usvg_opts)
        .map_err(|e| rasterize_error(format!("failed to parse SVG: {e}")))?;

    let size = tree.size();
    let (svg_w, svg_h) = (size.width(), size.height());

    let (px_w, px_h) = match options.width {
        Some(w) => {
            let scale = w as f32 / svg_w;
            (w, (svg_h * scale).ceil() as u32)
        }
        None => (svg_w.ceil() as u32, svg_h.ceil() as u32),
    };

    if px_w == 0 || px_h == 0 {
        return Err(rasterize_error("computed image dimensions are zero"));
    }

    let mut pixmap = tiny_skia::Pixmap::new(px_w, px_h)
        .ok_or_else(|| rasterize_error("failed to allocate pixmap"))?;
    if !options.transparent {
        pixmap.fill(tiny_skia::Color::WHITE);
    }

    let transform = tiny_skia::Transform::from_scale(px_w as f32 / svg_w, px_h as f32 / svg_h);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| rasterize_error(format!("failed to encode PNG: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20" viewBox="0 0 40 20"><rect x="0" y="0" width="10" height="10" fill="rgb(255,0,0)"/></svg>"#;

    #[test]
    fn intrinsic_size_is_kept() {
        let png = rasterize(SQUARE, &ExportOptions::default()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let pixmap = tiny_skia::Pixmap::decode_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 20));
    }

    #[test]
    fn width_scales_height() {
        let png = rasterize(SQUARE, &ExportOptions::default().with_width(80)).unwrap();
        let pixmap = tiny_skia::Pixmap::decode_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (80, 40));
    }

    #[test]
    fn transparent_leaves_background_clear() {
        let png = rasterize(SQUARE, &ExportOptions::default().transparent()).unwrap();
        let pixmap = tiny_skia::Pixmap::decode_png(&png).unwrap();
        let corner = pixmap.pixel(39, 19).unwrap();
        assert_eq!(corner.alpha(), 0);
    }

    #[test]
    fn garbage_is_a_rasterize_error() {
        let err = rasterize("not svg", &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Rasterize { .. }));
    }
}
