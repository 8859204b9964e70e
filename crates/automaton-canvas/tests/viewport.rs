//! Pan and pinch gestures over the diagram viewport

use automaton_canvas::core::{Point, ViewportConfig};
use automaton_canvas::viewport::{ViewTransform, ViewportController};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn pinch(distance: f64) -> [Point; 2] {
    [Point::ORIGIN, Point::new(distance, 0.0)]
}

fn unit_scale() -> ViewportController {
    ViewportController::new(ViewportConfig {
        initial_scale: 1.0,
        ..ViewportConfig::default()
    })
}

#[test]
fn test_pinch_in_by_half_zooms_out() {
    let mut controller = unit_scale();
    controller.on_move(&pinch(200.0), Point::ORIGIN);
    assert!(close(controller.transform().scale, 1.0));
    controller.on_move(&pinch(100.0), Point::ORIGIN);
    assert!(close(controller.transform().scale, 1.6));
    assert_eq!(controller.session().initial_pinch_distance, Some(200.0));
}

#[test]
fn test_pinch_is_relative_to_committed_scale() {
    let mut controller = ViewportController::default();
    controller.on_move(&pinch(300.0), Point::ORIGIN);
    controller.on_move(&pinch(400.0), Point::ORIGIN);
    assert!(close(controller.transform().scale, 1.3 / 1.6));
    controller.on_release();

    controller.on_move(&pinch(50.0), Point::ORIGIN);
    controller.on_move(&pinch(150.0), Point::ORIGIN);
    assert!(close(controller.transform().scale, 1.3 / 1.6 / 1.6));
}

#[test]
fn test_drag_moves_against_finger() {
    let mut controller = unit_scale();
    controller.on_move(&[Point::new(5.0, 5.0)], Point::new(30.0, -12.0));
    let transform = controller.transform();
    assert!(close(transform.translate_x, -30.0));
    assert!(close(transform.translate_y, 12.0));

    // deltas are cumulative for the gesture, not per frame
    controller.on_move(&[Point::new(5.0, 5.0)], Point::new(40.0, -12.0));
    assert!(close(controller.transform().translate_x, -40.0));
    controller.on_release();
    assert_eq!(controller.session().committed_translate, Point::new(-40.0, 12.0));

    controller.on_move(&[Point::ORIGIN], Point::new(10.0, 0.0));
    assert!(close(controller.transform().translate_x, -50.0));
}

#[test]
fn test_lifting_a_finger_keeps_the_zoom() {
    let mut controller = unit_scale();
    controller.on_move(&pinch(200.0), Point::ORIGIN);
    controller.on_move(&pinch(100.0), Point::ORIGIN);
    let zoomed = controller.transform().scale;

    controller.on_move(&[Point::ORIGIN], Point::new(1.0, 1.0));
    assert!(close(controller.transform().scale, zoomed));
    assert_eq!(controller.session().initial_pinch_distance, None);
    assert!(close(controller.session().committed_scale, zoomed));

    // a second finger lands at a new distance: no jump
    controller.on_move(&pinch(60.0), Point::new(1.0, 1.0));
    assert!(close(controller.transform().scale, zoomed));
    assert_eq!(controller.session().initial_pinch_distance, Some(60.0));
}

#[test]
fn test_release_commits_the_transform() {
    let mut controller = ViewportController::default();
    controller.on_move(&pinch(100.0), Point::new(3.0, 4.0));
    controller.on_move(&pinch(100.0 + 100.0), Point::new(3.0, 4.0));
    controller.on_release();
    let session = controller.session();
    assert_eq!(session.committed_scale, controller.transform().scale);
    assert_eq!(session.committed_translate, controller.transform().translate());
    assert_eq!(session.initial_pinch_distance, None);
}

#[test]
fn test_view_box_centres_on_translate() {
    let transform = ViewTransform {
        scale: 2.0,
        translate_x: 10.0,
        translate_y: -5.0,
    };
    let [x, y, w, h] = transform.view_box(300.0, 200.0).unwrap();
    assert!(close(x, -300.0 + 20.0));
    assert!(close(y, -200.0 - 10.0));
    assert!(close(w, 600.0));
    assert!(close(h, 400.0));
}

#[test]
fn test_thumbnail_starts_zoomed_out() {
    let config = ViewportConfig::default();
    let thumbnail = ViewportController::thumbnail(config);
    let [_, _, w, _] = thumbnail.view_box(100.0, 100.0).unwrap();
    assert!(close(w, 100.0 * config.gallery_scale));
}

#[test]
fn test_config_from_partial_json() {
    let config = ViewportConfig::from_json(r#"{"pinchBase": 2.0}"#).unwrap();
    assert_eq!(config.pinch_base, 2.0);
    assert_eq!(config.initial_scale, ViewportConfig::default().initial_scale);

    let mut controller = ViewportController::new(config);
    controller.on_move(&pinch(200.0), Point::ORIGIN);
    controller.on_move(&pinch(100.0), Point::ORIGIN);
    assert!(close(controller.transform().scale, 1.3 * 2.0));
}

#[test]
fn test_transform_serializes_camel_case() {
    let json = serde_json::to_string(&ViewTransform::new(1.5)).unwrap();
    assert_eq!(json, r#"{"scale":1.5,"translateX":0.0,"translateY":0.0}"#);
}
