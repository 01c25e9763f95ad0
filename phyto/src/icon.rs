//! Procedurally drawn leaf icon used for the favicon, the touch icon and the
//! manifest icons.

use crate::scene::{DrawOp, Path, Point, Rgb, Scene};
use crate::PhytoError;

/// Sizes emitted for the page: two favicons, the touch icon and a splash size.
pub const ICON_SIZES: [u32; 4] = [16, 32, 180, 512];

pub const FAVICON_SIZES: [u32; 2] = [16, 32];
pub const TOUCH_ICON_SIZE: u32 = 180;

const BACKGROUND: Rgb = Rgb::WHITE;
const HALO: Rgb = Rgb::new(0xe8, 0xf4, 0xee);
const LEAF: Rgb = Rgb::new(0x2e, 0x8b, 0x57);
const VEIN: Rgb = Rgb::WHITE;

pub fn leaf_icon(width: u32, height: u32) -> Result<Scene, PhytoError> {
    if width == 0 || height == 0 {
        return Err(PhytoError::InvalidSize(width, height));
    }
    let w = width as f64;
    let h = height as f64;
    let mut scene = Scene::new(width, height);

    scene.push(DrawOp::FillRect {
        x: 0.0,
        y: 0.0,
        w,
        h,
        color: BACKGROUND,
    });
    scene.push(DrawOp::FillCircle {
        center: Point::new(w / 2.0, h / 2.0),
        radius: w.min(h) * 0.45,
        color: HALO,
    });

    let body = Path::new()
        .move_to(w * 0.25, h * 0.65)
        .quad_to(w * 0.20, h * 0.30, w * 0.55, h * 0.25)
        .quad_to(w * 0.85, h * 0.35, w * 0.75, h * 0.70)
        .quad_to(w * 0.55, h * 0.85, w * 0.25, h * 0.65)
        .close();
    scene.push(DrawOp::FillPath {
        path: body,
        color: LEAF,
    });

    let vein = Path::new()
        .move_to(w * 0.35, h * 0.60)
        .quad_to(w * 0.48, h * 0.45, w * 0.62, h * 0.40);
    scene.push(DrawOp::StrokePath {
        path: vein,
        color: VEIN,
        width: (w * 0.04).max(1.0),
    });

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(leaf_icon(0, 16), Err(PhytoError::InvalidSize(0, 16))));
    }

    #[test]
    fn layers_scale_with_size() {
        let scene = leaf_icon(512, 512).unwrap();
        assert_eq!(scene.ops().len(), 4);
        match &scene.ops()[1] {
            DrawOp::FillCircle { center, radius, color } => {
                assert_eq!(*center, Point::new(256.0, 256.0));
                assert!((radius - 230.4).abs() < 1e-9);
                assert_eq!(*color, HALO);
            }
            other => panic!("unexpected op {other:?}"),
        }
        match &scene.ops()[3] {
            DrawOp::StrokePath { width, .. } => assert!((width - 20.48).abs() < 1e-9),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn vein_width_never_drops_below_one_pixel() {
        let scene = leaf_icon(16, 16).unwrap();
        let width = scene
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::StrokePath { width, .. } => Some(*width),
                _ => None,
            })
            .unwrap();
        assert_eq!(width, 1.0);
    }

    #[test]
    fn leaf_outline_is_closed_and_inside_the_icon() {
        let scene = leaf_icon(180, 180).unwrap();
        let body = scene
            .ops()
            .iter()
            .find_map(|op| match op {
                DrawOp::FillPath { path, .. } => Some(path.flatten(0.25)),
                _ => None,
            })
            .unwrap();
        assert_eq!(body.len(), 1);
        let outline = &body[0];
        assert_eq!(outline.first(), outline.last());
        assert!(outline
            .iter()
            .all(|p| (0.0..=180.0).contains(&p.x) && (0.0..=180.0).contains(&p.y)));
    }

    #[test]
    fn non_square_surfaces_use_the_short_side_for_the_halo() {
        let scene = leaf_icon(200, 100).unwrap();
        match &scene.ops()[1] {
            DrawOp::FillCircle { radius, .. } => assert!((radius - 45.0).abs() < 1e-9),
            other => panic!("unexpected op {other:?}"),
        }
    }
}
