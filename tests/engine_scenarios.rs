use std::cell::RefCell;
use std::rc::Rc;

use ringloop::{
    CarouselEngine, EngineConfig, FixedMeasure, Metrics, RingloopError,
};

/// Capture engine debug logs in test output; repeat calls are fine.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn engine(n: usize) -> CarouselEngine<String> {
    init_logging();
    let items = (0..n).map(|i| format!("media-{i}")).collect();
    CarouselEngine::new(
        items,
        Box::new(FixedMeasure(Metrics {
            item_extent: 320.0,
            gap: 16.0,
        })),
        EngineConfig::default(),
    )
    .unwrap()
}

/// Drive the engine until no deferred work remains.
fn settle_all(e: &mut CarouselEngine<String>) {
    while let Some(deadline) = e.next_deadline() {
        e.advance_to(deadline);
    }
}

#[derive(Default)]
struct Recorded {
    settles: Vec<(usize, usize, String)>, // (logical, display, item)
    frames: Vec<(usize, bool)>,           // (display, animate)
}

fn record(e: &mut CarouselEngine<String>) -> Rc<RefCell<Recorded>> {
    let rec = Rc::new(RefCell::new(Recorded::default()));

    let r = rec.clone();
    e.on_settle(move |ev| {
        r.borrow_mut()
            .settles
            .push((ev.logical_index, ev.display_index, ev.item.clone()));
    });
    let r = rec.clone();
    e.on_frame(move |ev| {
        r.borrow_mut().frames.push((ev.display_index, ev.animate));
    });
    rec
}

#[test]
fn scenario_a_next_moves_one_display_slot() {
    let mut e = engine(5);
    let rec = record(&mut e);

    assert_eq!(e.display_index(), 1);
    assert!(e.next(0).unwrap());
    assert_eq!(e.display_index(), 2);
    assert!(e.in_transition());

    settle_all(&mut e);
    assert!(!e.in_transition());

    let rec = rec.borrow();
    assert_eq!(rec.frames, vec![(2, true)]);
    assert_eq!(rec.settles, vec![(1, 2, "media-1".to_owned())]);
}

#[test]
fn scenario_b_goto_takes_the_wrap_shortcut() {
    let mut e = engine(5);
    let rec = record(&mut e);

    // Direct distance 4 vs wrap distance 1: one backward step.
    assert!(e.goto(0, 4).unwrap());
    assert_eq!(e.display_index(), 0); // tail clone, pre-correction

    settle_all(&mut e);
    assert_eq!(e.current_logical_index(), 4);
    assert_eq!(e.display_index(), 5);

    let rec = rec.borrow();
    assert_eq!(rec.settles.len(), 1);
    assert_eq!(rec.settles[0].0, 4);
    // One animated mutation, then the silent correction.
    assert_eq!(rec.frames, vec![(0, true), (5, false)]);
}

#[test]
fn scenario_c_shadow_correction_is_silent_and_invisible() {
    let mut e = engine(5);
    e.goto(0, 4).unwrap();
    settle_all(&mut e);

    let rec = record(&mut e);
    assert!(e.next(1_000).unwrap());
    assert_eq!(e.display_index(), 6); // N + C, shadow region
    assert_eq!(e.current_logical_index(), 0);

    // Before the settle deadline the index still points at the clone.
    e.advance_to(1_000 + 300);
    assert_eq!(e.display_index(), 6);

    e.advance_to(1_000 + 600);
    assert_eq!(e.display_index(), 1); // display C, logical 0
    assert!(!e.in_transition());

    let rec = rec.borrow();
    assert_eq!(rec.settles, vec![(0, 6, "media-0".to_owned())]);
    assert_eq!(rec.frames, vec![(6, true), (1, false)]);
}

#[test]
fn scenario_d_new_goto_supersedes_multi_step_run() {
    let mut e = engine(7);
    let rec = record(&mut e);

    assert!(e.goto(0, 3).unwrap()); // three forward steps
    e.advance_to(120); // second step applied

    assert!(e.goto(150, 6).unwrap()); // supersedes mid-flight
    settle_all(&mut e);

    let rec = rec.borrow();
    assert_eq!(rec.settles.len(), 1, "only the new request settles");
    assert_eq!(rec.settles[0].0, 6);
    assert_eq!(e.current_logical_index(), 6);
    assert!(!e.in_transition());
}

#[test]
fn scenario_e_zero_items_is_a_configuration_error() {
    let r = CarouselEngine::<String>::new(
        Vec::new(),
        Box::new(FixedMeasure::default()),
        EngineConfig::default(),
    );
    let err = r.err().expect("expected configuration error");
    assert!(matches!(err, RingloopError::Configuration(_)));
    assert!(err.to_string().contains("at least one item"));
}

#[test]
fn goto_current_index_is_idempotent() {
    let mut e = engine(5);
    let rec = record(&mut e);

    assert!(!e.goto(0, 0).unwrap());
    assert_eq!(e.next_deadline(), None);
    settle_all(&mut e);

    let rec = rec.borrow();
    assert!(rec.settles.is_empty());
    assert!(rec.frames.is_empty());
}

#[test]
fn exactly_one_settle_per_multi_step_request() {
    let mut e = engine(9);
    let rec = record(&mut e);

    assert!(e.goto(0, 4).unwrap()); // four forward steps
    settle_all(&mut e);

    let rec = rec.borrow();
    assert_eq!(rec.settles.len(), 1);
    assert_eq!(rec.settles[0].0, 4);
    let animated = rec.frames.iter().filter(|(_, a)| *a).count();
    assert_eq!(animated, 4);
}

#[test]
fn requests_are_rejected_while_a_single_step_settles() {
    let mut e = engine(5);
    let rec = record(&mut e);

    assert!(e.next(0).unwrap());
    assert!(!e.next(100).unwrap());
    assert!(!e.prev(200).unwrap());
    assert!(!e.goto(300, 3).unwrap());

    settle_all(&mut e);
    assert_eq!(e.current_logical_index(), 1);
    assert_eq!(rec.borrow().settles.len(), 1);
}

#[test]
fn dispose_cancels_pending_sequences() {
    let mut e = engine(7);
    let rec = record(&mut e);

    assert!(e.goto(0, 3).unwrap());
    e.dispose();
    e.advance_to(100_000);

    // Only the synchronous first mutation was observed; nothing settled.
    let rec = rec.borrow();
    assert!(rec.settles.is_empty());
    assert_eq!(rec.frames, vec![(2, true)]);
}

#[test]
fn resize_reposition_is_not_animated() {
    struct GrowingMeasure {
        calls: u32,
    }
    impl ringloop::Measure for GrowingMeasure {
        fn measure(&mut self) -> Metrics {
            let n = self.calls;
            self.calls += 1;
            Metrics {
                item_extent: 300.0 + f64::from(n) * 100.0,
                gap: 0.0,
            }
        }
    }

    init_logging();
    let items = (0..3).map(|i| format!("media-{i}")).collect();
    let mut e = CarouselEngine::new(
        items,
        Box::new(GrowingMeasure { calls: 0 }),
        EngineConfig::default(),
    )
    .unwrap();
    let rec = record(&mut e);

    // Burst of resize signals collapses to one re-measure.
    e.signal_layout_changed(0);
    e.signal_layout_changed(50);
    e.signal_layout_changed(90);
    settle_all(&mut e);

    let rec = rec.borrow();
    assert_eq!(rec.frames, vec![(1, false)]);
    assert_eq!(rec.settles.len(), 0);
    assert_eq!(e.offset_px(), 400.0); // second measure: extent 400, display 1
}

#[test]
fn full_loop_forward_returns_to_start() {
    let mut e = engine(4);
    let rec = record(&mut e);

    let mut now = 0;
    for _ in 0..4 {
        assert!(e.next(now).unwrap());
        settle_all(&mut e);
        now += 1_000;
    }

    assert_eq!(e.current_logical_index(), 0);
    let rec = rec.borrow();
    let logicals: Vec<usize> = rec.settles.iter().map(|s| s.0).collect();
    assert_eq!(logicals, vec![1, 2, 3, 0]);
}
