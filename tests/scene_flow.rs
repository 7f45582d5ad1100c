use approx::assert_relative_eq;
use std::ops::ControlFlow;
use tiranga3d::camera::{HOME_POSITION, HOME_TARGET};
use tiranga3d::clock::{run_frames, ManualClock};
use tiranga3d::hoist::{MessagePose, HOISTED_Y, LOWERED_Y};
use tiranga3d::state::AppState;
use tiranga3d::terminal::TerminalHost;
use tiranga3d::wave::wave_offset;
use tiranga3d::widget::FlagWidget;
use tiranga3d::{Error, HoistState, SceneRenderer, Settings, Viewport};

const FRAME: f64 = 1.0 / 60.0;

fn settings() -> Settings {
    Settings {
        seed: Some(2024),
        shadow_map_size: 16,
        ..Settings::default()
    }
}

fn renderer() -> SceneRenderer {
    SceneRenderer::new(Viewport::new(48, 32), &settings()).unwrap()
}

/// Advances at display rate, one sixtieth of a second per frame
fn advance(renderer: &mut SceneRenderer, seconds: f64) {
    let mut clock = ManualClock::new(FRAME);
    let mut frames = (seconds / FRAME).round() as usize;
    run_frames(&mut clock, |dt| {
        if frames == 0 {
            return ControlFlow::Break(());
        }
        renderer.update(dt);
        frames -= 1;
        ControlFlow::Continue(())
    });
}

#[test]
fn hoist_reaches_the_top_with_message() {
    let mut renderer = renderer();
    assert!(renderer.hoist());
    assert_eq!(renderer.hoist_state(), HoistState::Hoisting);

    advance(&mut renderer, 2.0);
    let y = renderer.cloth_transform().position.y;
    assert!(y > LOWERED_Y && y < HOISTED_Y);
    assert!(!renderer.message_visible());

    advance(&mut renderer, 2.0);
    assert_eq!(renderer.hoist_state(), HoistState::Hoisted);
    assert_eq!(renderer.cloth_transform().position.y, HOISTED_Y);
    assert_eq!(renderer.cloth_transform().rotation.y, 0.0);
    assert!(renderer.message_visible());

    advance(&mut renderer, 1.5);
    assert_eq!(renderer.message_pose(), MessagePose::SHOWN);
}

#[test]
fn second_hoist_is_ignored() {
    let mut renderer = renderer();
    assert!(renderer.hoist());
    advance(&mut renderer, 1.0);
    assert!(!renderer.hoist());
    advance(&mut renderer, 3.0);
    assert_eq!(renderer.hoist_state(), HoistState::Hoisted);
    assert_eq!(renderer.cloth_transform().position.y, HOISTED_Y);
}

#[test]
fn reset_lowers_and_hides() {
    let mut renderer = renderer();
    renderer.hoist();
    advance(&mut renderer, 4.0);
    assert!(renderer.reset());
    assert!(!renderer.message_visible());
    assert_eq!(renderer.hoist_state(), HoistState::Lowering);

    advance(&mut renderer, 2.0);
    assert_eq!(renderer.hoist_state(), HoistState::Lowered);
    assert_eq!(renderer.cloth_transform().position.y, LOWERED_Y);
    assert_eq!(renderer.cloth_transform().rotation.y, 0.0);
    assert!(!renderer.message_visible());

    assert!(renderer.hoist());
}

#[test]
fn reset_while_lowered_does_nothing() {
    let mut renderer = renderer();
    assert!(!renderer.reset());
    advance(&mut renderer, 1.0);
    assert_eq!(renderer.hoist_state(), HoistState::Lowered);
    assert_eq!(renderer.cloth_transform().position.y, LOWERED_Y);
}

#[test]
fn camera_view_returns_home() {
    let mut renderer = renderer();
    renderer.orbit(40.0, -12.0);
    renderer.zoom(-3.0);
    renderer.pan(6.0, 4.0);
    advance(&mut renderer, 2.0);
    assert!(renderer.camera().position.distance(HOME_POSITION) > 0.1);

    renderer.reset_camera_view();
    advance(&mut renderer, 1.5);
    assert_eq!(renderer.camera().position, HOME_POSITION);
    assert_eq!(renderer.camera().target, HOME_TARGET);
    assert!(!renderer.controls().is_transitioning());

    // Nothing left to damp, so the camera stays put
    advance(&mut renderer, 1.0);
    assert_eq!(renderer.camera().position, HOME_POSITION);
}

#[test]
fn animations_finish_on_their_last_frame() {
    let mut renderer = renderer();
    renderer.hoist();
    for _ in 0..240 {
        renderer.update(FRAME);
    }
    assert_eq!(renderer.hoist_state(), HoistState::Hoisted);
    assert_eq!(renderer.cloth_transform().position.y, HOISTED_Y);
    assert!(renderer.message_visible());

    renderer.reset();
    for _ in 0..120 {
        renderer.update(FRAME);
    }
    assert_eq!(renderer.hoist_state(), HoistState::Lowered);
    assert_eq!(renderer.cloth_transform().position.y, LOWERED_Y);
    assert_eq!(renderer.cloth_transform().rotation.y, 0.0);

    renderer.orbit(25.0, 5.0);
    renderer.reset_camera_view();
    for _ in 0..90 {
        renderer.update(FRAME);
    }
    assert_eq!(renderer.camera().position, HOME_POSITION);
    assert!(!renderer.controls().is_transitioning());
}

#[test]
fn resize_updates_aspect_and_surface() {
    let mut renderer = renderer();
    renderer.resize(Viewport::new(120, 40));
    assert_relative_eq!(renderer.camera().aspect, 3.0);
    assert_eq!(renderer.framebuffer().width(), 120);
    assert_eq!(renderer.framebuffer().height(), 40);
    renderer.render();
    assert_eq!(renderer.framebuffer().pixels().len(), 120 * 40);
}

#[test]
fn missing_surface_is_an_error() {
    let err = SceneRenderer::new(Viewport::new(0, 0), &settings()).err();
    assert!(matches!(err, Some(Error::SurfaceUnavailable { .. })));
}

#[test]
fn same_seed_same_cloth() {
    let a = renderer();
    let b = renderer();
    assert_eq!(
        a.scene().cloth.rest_positions(),
        b.scene().cloth.rest_positions()
    );
}

#[test]
fn cloth_follows_the_wave() {
    let mut renderer = renderer();
    advance(&mut renderer, 1.0);
    let cloth = &renderer.scene().cloth;
    for (rest, moved) in cloth.rest_positions().iter().zip(&cloth.mesh().positions) {
        let expected = rest.z + wave_offset(rest.x, rest.y, renderer.elapsed());
        assert_relative_eq!(moved.z, expected, epsilon = 1e-12);
    }
}

#[test]
fn teardown_freezes_the_scene() {
    let mut renderer = renderer();
    renderer.hoist();
    advance(&mut renderer, 1.0);
    let y = renderer.cloth_transform().position.y;
    renderer.teardown();
    advance(&mut renderer, 3.0);
    assert_eq!(renderer.cloth_transform().position.y, y);
    assert_relative_eq!(renderer.elapsed(), 1.0, epsilon = 1e-9);
    assert!(!renderer.reset());
}

#[test]
fn full_frame_reaches_the_terminal() {
    let mut host = TerminalHost::buffered(40, 12);
    let mut renderer = SceneRenderer::new(host.viewport(), &settings()).unwrap();
    let widget = FlagWidget::new();
    let state = AppState::default();

    assert!(renderer.frame(FRAME));
    host.present(&widget.compose(&renderer, &state)).unwrap();
    let text = String::from_utf8(host.snapshot().unwrap().to_vec()).unwrap();
    assert_eq!(text.lines().count(), 12);
    assert!(text.lines().next().unwrap().contains("Hoist the Flag"));
}
