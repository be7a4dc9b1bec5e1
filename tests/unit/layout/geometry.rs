use super::*;
use crate::layout::scale::ScaleInput;

fn scale(cwidth: u32, cheight: u32, small_w: u32, small_h: u32) -> ScaleContext {
    ScaleContext::from_input(&ScaleInput {
        cwidth,
        cheight,
        small_w,
        small_h,
    })
    .unwrap()
}

fn placement(w: f64, h: f64, left: f64, top: f64, angle: f64) -> Placement {
    Placement {
        hi_width: w,
        hi_height: h,
        hi_left: left,
        hi_top: top,
        angle,
    }
}

#[test]
fn landscape_800x600_doubles_everything() {
    let g = DeviceGeometry::from_placement(
        &placement(100.0, 100.0, 10.0, 10.0, 0.0),
        &scale(800, 600, 400, 300),
    );
    assert_eq!(
        g,
        DeviceGeometry {
            width: 200,
            height: 200,
            left: 20,
            top: 20,
            angle: 0.0
        }
    );
}

#[test]
fn wide_canvas_stretches_left_only() {
    let g = DeviceGeometry::from_placement(
        &placement(100.0, 100.0, 10.0, 10.0, 0.0),
        &scale(1600, 600, 400, 300),
    );
    assert_eq!(g.width, 200);
    assert_eq!(g.height, 200);
    assert_eq!(g.left, 40);
    assert_eq!(g.top, 20);
}

#[test]
fn lengths_truncate_toward_zero() {
    let s = scale(3, 3, 2, 2);
    let g = DeviceGeometry::from_placement(&placement(3.0, 1.0, -3.0, 5.0, 0.0), &s);
    assert_eq!(g.width, 4); // 4.5
    assert_eq!(g.height, 1); // 1.5
    assert_eq!(g.left, -4); // -4.5
    assert_eq!(g.top, 7); // 7.5
}

#[test]
fn angle_is_degrees_without_wrapping() {
    let s = scale(10, 10, 10, 10);
    let g = DeviceGeometry::from_placement(&placement(1.0, 1.0, 0.0, 0.0, std::f64::consts::PI), &s);
    assert!((g.angle - 180.0).abs() < 1e-9);

    let g = DeviceGeometry::from_placement(
        &placement(1.0, 1.0, 0.0, 0.0, 3.0 * std::f64::consts::PI),
        &s,
    );
    assert!((g.angle - 540.0).abs() < 1e-9);

    let g = DeviceGeometry::from_placement(&placement(1.0, 1.0, 0.0, 0.0, -0.5), &s);
    assert!(g.angle < 0.0);
}

#[test]
fn geometry_is_pure() {
    let s = scale(1455, 1800, 291, 360);
    let p = placement(145.0, 180.0, 12.5, 7.25, 0.3);
    let a = DeviceGeometry::from_placement(&p, &s);
    let b = DeviceGeometry::from_placement(&p, &s);
    assert_eq!(a, b);
}

#[test]
fn size_rejects_empty_sides() {
    let s = scale(10, 10, 10, 10);
    assert_eq!(
        DeviceGeometry::from_placement(&placement(2.0, 3.0, 0.0, 0.0, 0.0), &s).size(),
        Some((2, 3))
    );
    assert_eq!(
        DeviceGeometry::from_placement(&placement(0.5, 3.0, 0.0, 0.0, 0.0), &s).size(),
        None
    );
    assert_eq!(
        DeviceGeometry::from_placement(&placement(-2.0, 3.0, 0.0, 0.0, 0.0), &s).size(),
        None
    );
}
