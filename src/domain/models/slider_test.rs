use super::slider_percentage;
use super::ContainerBounds;
use super::PointerInput;
use super::Slider;

fn bounds() -> ContainerBounds {
    return ContainerBounds {
        left: 100.0,
        width: 400.0,
    };
}

fn mounted() -> Slider {
    let mut slider = Slider::default();
    slider.mount(bounds());
    return slider;
}

#[test]
fn it_computes_percentages_inside_the_container() {
    assert_eq!(slider_percentage(100.0, bounds()), Some(0.0));
    assert_eq!(slider_percentage(200.0, bounds()), Some(25.0));
    assert_eq!(slider_percentage(500.0, bounds()), Some(100.0));
}

#[test]
fn it_clamps_pointers_outside_the_container() {
    for x in [-10_000.0, -1.0, 0.0, 99.999] {
        assert_eq!(slider_percentage(x, bounds()), Some(0.0));
    }
    for x in [500.001, 501.0, 10_000.0] {
        assert_eq!(slider_percentage(x, bounds()), Some(100.0));
    }
}

#[test]
fn it_ignores_unmeasurable_containers() {
    let empty = ContainerBounds {
        left: 0.0,
        width: 0.0,
    };
    assert_eq!(slider_percentage(10.0, empty), None);
}

#[test]
fn it_starts_at_the_initial_position() {
    let slider = Slider::default();
    assert_eq!(slider.position(), 50.0);
    assert!(!slider.is_dragging());
    assert_eq!(slider.container_width(), None);

    assert_eq!(Slider::new(140.0).position(), 100.0);
}

#[test]
fn it_keeps_the_press_position_after_an_immediate_release() {
    let mut slider = mounted();
    slider.handle(PointerInput::MouseDown(400.0));
    slider.handle(PointerInput::MouseUp);

    assert_eq!(slider.position(), 75.0);
    assert!(!slider.is_dragging());
}

#[test]
fn it_tracks_moves_while_dragging() {
    let mut slider = mounted();
    slider.handle(PointerInput::TouchStart(200.0));
    assert!(slider.is_dragging());
    assert_eq!(slider.position(), 25.0);

    slider.handle(PointerInput::TouchMove(300.0));
    assert_eq!(slider.position(), 50.0);

    slider.handle(PointerInput::TouchMove(900.0));
    assert_eq!(slider.position(), 100.0);

    slider.handle(PointerInput::TouchEnd);
    slider.handle(PointerInput::TouchMove(100.0));
    assert_eq!(slider.position(), 100.0);
}

#[test]
fn it_stops_tracking_when_the_pointer_leaves() {
    let mut slider = mounted();
    slider.handle(PointerInput::MouseDown(300.0));
    slider.handle(PointerInput::MouseLeave);
    slider.handle(PointerInput::MouseMove(120.0));

    assert_eq!(slider.position(), 50.0);
}

#[test]
fn it_ignores_moves_without_a_press() {
    let mut slider = mounted();
    slider.handle(PointerInput::MouseMove(120.0));
    assert_eq!(slider.position(), 50.0);
}

#[test]
fn it_is_a_noop_before_mount() {
    let mut slider = Slider::default();
    slider.handle(PointerInput::MouseDown(120.0));

    assert!(slider.is_dragging());
    assert_eq!(slider.position(), 50.0);

    slider.resize(bounds());
    assert_eq!(slider.container_width(), None);
}

#[test]
fn it_remeasures_on_resize() {
    let mut slider = mounted();
    assert_eq!(slider.container_width(), Some(400.0));

    slider.resize(ContainerBounds {
        left: 0.0,
        width: 800.0,
    });
    assert_eq!(slider.container_width(), Some(800.0));

    slider.handle(PointerInput::MouseDown(200.0));
    assert_eq!(slider.position(), 25.0);
}
