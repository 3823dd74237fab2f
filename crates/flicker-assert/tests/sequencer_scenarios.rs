//! End-to-end sequencer scenarios.
//!
//! # Scenarios Verified
//!
//! 1. Single visible window matches `isVisible`
//! 2. `isInvisible then isVisible` splits at the first visible snapshot
//! 3. `isInvisible` fails at index 0 when the window starts visible
//! 4. Split halves cover the display without overlap
//! 5. Non-monotonic capture is rejected at ingestion
//! 6. A segment that never stops holding never hands over to the next
//! 7. Skipping an intermediate state fails where the skip happens
//!
//! Plus purity (idempotent verdicts), the empty-trace property, and the
//! tracing contract of the sequencer.
//!
//! # Running
//!
//! ```sh
//! cargo test -p flicker-assert --test sequencer_scenarios
//! ```

use std::sync::{Arc, Mutex};

use flicker_assert::{AssertionChain, Predicate, Verdict};
use flicker_core::{ComponentId, Rect, Region, Snapshot, StateTrace, Surface, Timestamp};
use proptest::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Helpers
// ============================================================================

fn w() -> ComponentId {
    ComponentId::new("com.example", "com.example.W")
}

fn window_snapshot(ts: u64, visible: bool) -> Snapshot {
    Snapshot::builder(ts)
        .window(w(), visible, Rect::new(0, 0, 100, 100))
        .build()
        .expect("valid snapshot")
}

fn trace_of(visibility: &[bool]) -> StateTrace {
    StateTrace::ingest(
        visibility
            .iter()
            .enumerate()
            .map(|(i, &v)| window_snapshot(i as u64, v)),
    )
    .expect("ordered trace")
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_1_visible_window_matches() {
    let trace = trace_of(&[true]);
    let chain = AssertionChain::windows().is_visible(w());
    assert_eq!(chain.evaluate(&trace), Verdict::Matched);
}

#[test]
fn scenario_2_invisible_then_visible_splits_at_one() {
    let trace = trace_of(&[false, true]);
    let chain = AssertionChain::windows()
        .is_invisible(w())
        .then()
        .is_visible(w());
    assert!(chain.evaluate(&trace).is_matched());
    assert_eq!(chain.split_points(&trace), Ok(vec![1]));
}

#[test]
fn scenario_3_invisible_fails_at_index_zero() {
    let trace = trace_of(&[true, true]);
    let chain = AssertionChain::windows().is_invisible(w());
    let verdict = chain.evaluate(&trace);
    let failure = verdict.failure().expect("chain must fail");
    assert_eq!(failure.segment, 0);
    assert_eq!(failure.snapshot_index, Some(0));
    assert_eq!(failure.timestamp, Some(Timestamp(0)));
    assert!(failure.expected.starts_with("isInvisible("));
}

#[test]
fn scenario_4_split_halves_cover_display() {
    let display = Region::from_rect(Rect::new(0, 0, 100, 100)).unwrap();
    let a = Region::from_rect(Rect::new(0, 0, 50, 100)).unwrap();
    let b = Region::from_rect(Rect::new(50, 0, 50, 100)).unwrap();
    assert!(a.plus(&b).covers_exactly(&display));
    assert!(a.not_overlaps(&b));

    let left = ComponentId::new("com.example", "com.example.Left");
    let right = ComponentId::new("com.example", "com.example.Right");
    let trace = StateTrace::ingest([Snapshot::builder(0)
        .layer(left.clone(), true, a)
        .layer(right.clone(), true, b)
        .build()
        .unwrap()])
    .unwrap();
    let chain = AssertionChain::layers()
        .same_size(left.clone(), right.clone())
        .not_overlaps(left.clone(), right.clone())
        .union_covers_exactly(vec![left, right], display);
    assert!(chain.evaluate(&trace).is_matched());
}

#[test]
fn scenario_5_unordered_capture_is_rejected() {
    let err = StateTrace::ingest([window_snapshot(5, true), window_snapshot(3, true)])
        .expect_err("timestamps go backwards");
    assert_eq!(err.index, 1);
    assert_eq!(err.previous, Timestamp(5));
    assert_eq!(err.timestamp, Timestamp(3));
}

#[test]
fn scenario_6_segment_that_keeps_holding_fails() {
    let trace = StateTrace::ingest([
        window_snapshot(0, false),
        window_snapshot(1, true),
        window_snapshot(2, true),
    ])
    .unwrap();
    let chain = AssertionChain::windows().contains(w()).then().is_visible(w());
    let failure = chain.evaluate(&trace).failure().cloned().expect("never splits");
    assert_eq!(failure.segment, 1);
    assert_eq!(failure.snapshot_index, None);
    assert!(chain.split_points(&trace).is_err());
}

fn fullscreen_to_split(skip_intermediate: bool) -> (StateTrace, AssertionChain) {
    let main = ComponentId::new("com.example", "com.example.Main");
    let secondary = ComponentId::new("com.example", "com.example.Secondary");
    let full = Rect::new(0, 0, 100, 100);
    let left = Rect::new(0, 0, 50, 100);
    let right = Rect::new(50, 0, 50, 100);
    let display = Region::from_rect(full).unwrap();

    let frame = |ts: u64, main_bounds: Rect, secondary_visible: Option<bool>| {
        let builder = Snapshot::builder(ts).layer_rect(main.clone(), true, main_bounds).unwrap();
        let builder = match secondary_visible {
            Some(visible) => builder.layer_rect(secondary.clone(), visible, right).unwrap(),
            None => builder,
        };
        builder.build().unwrap()
    };
    let middle = if skip_intermediate {
        frame(1, full, None)
    } else {
        frame(1, left, Some(false))
    };
    let trace = StateTrace::ingest([frame(0, full, None), middle, frame(2, left, Some(true))])
        .unwrap();
    let chain = AssertionChain::layers()
        .covers_exactly(main.clone(), display.clone())
        .then()
        .is_invisible(secondary.clone())
        .then()
        .union_covers_exactly(vec![main, secondary], display);
    (trace, chain)
}

#[test]
fn scenario_7_skipped_intermediate_state_fails() {
    let (trace, chain) = fullscreen_to_split(false);
    assert_eq!(chain.split_points(&trace), Ok(vec![1, 2]));

    let (trace, chain) = fullscreen_to_split(true);
    let failure = chain.evaluate(&trace).failure().cloned().expect("split was skipped");
    assert_eq!(failure.segment, 0);
    assert_eq!(failure.snapshot_index, Some(2));
    assert_eq!(failure.timestamp, Some(Timestamp(2)));
    assert!(failure.expected.starts_with("coversExactly("));
}

#[test]
fn empty_chain_matches_even_empty_trace() {
    let chain = AssertionChain::layers();
    assert!(chain.evaluate(&StateTrace::empty()).is_matched());
    assert!(chain.evaluate(&trace_of(&[true, false])).is_matched());
}

#[test]
fn named_conjunction_failure_names_the_block() {
    let display = Region::from_rect(Rect::new(0, 0, 200, 200)).unwrap();
    let chain = AssertionChain::windows().invoke(
        "startsInFullscreen",
        vec![Predicate::CoversExactly {
            surface: Surface::Window,
            component: w(),
            expected: display,
        }],
    );
    let verdict = chain.evaluate(&trace_of(&[true]));
    let failure = verdict.failure().expect("100x100 does not cover 200x200");
    assert!(failure.expected.starts_with("startsInFullscreen: coversExactly("));
}

#[test]
fn chains_evaluate_concurrently_over_shared_trace() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateTrace>();
    assert_send_sync::<AssertionChain>();

    let trace = trace_of(&[false, false, true, true]);
    let chains = [
        AssertionChain::windows().is_invisible(w()).then().is_visible(w()),
        AssertionChain::windows().contains(w()),
        AssertionChain::windows().is_visible(w()),
    ];
    let shared = &trace;
    let verdicts: Vec<Verdict> = std::thread::scope(|scope| {
        let handles: Vec<_> = chains
            .iter()
            .map(|chain| scope.spawn(move || chain.evaluate(shared)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let expected: Vec<Verdict> = chains.iter().map(|c| c.evaluate(&trace)).collect();
    assert_eq!(verdicts, expected);
    assert!(verdicts[0].is_matched());
    assert!(!verdicts[2].is_matched());
}

// ============================================================================
// Properties
// ============================================================================

fn chain_strategy() -> impl Strategy<Value = AssertionChain> {
    prop::collection::vec((any::<bool>(), any::<bool>()), 1..5).prop_map(|steps| {
        steps
            .into_iter()
            .fold(AssertionChain::windows(), |chain, (visible, then)| {
                let chain = if then { chain.then() } else { chain };
                if visible {
                    chain.is_visible(w())
                } else {
                    chain.is_invisible(w())
                }
            })
    })
}

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        visibility in prop::collection::vec(any::<bool>(), 0..12),
        chain in chain_strategy(),
    ) {
        let trace = trace_of(&visibility);
        let first = chain.evaluate(&trace);
        let second = chain.evaluate(&trace);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_trivial_chain_fails_on_empty_trace(chain in chain_strategy()) {
        let verdict = chain.evaluate(&StateTrace::empty());
        prop_assert!(!verdict.is_matched());
        let failure = verdict.failure().cloned().unwrap();
        prop_assert_eq!(failure.segment, 0);
        prop_assert_eq!(failure.snapshot_index, None);
    }

    #[test]
    fn split_points_are_increasing_and_in_range(
        visibility in prop::collection::vec(any::<bool>(), 1..12),
        chain in chain_strategy(),
    ) {
        let trace = trace_of(&visibility);
        if let Ok(splits) = chain.split_points(&trace) {
            prop_assert_eq!(splits.len() + 1, chain.segment_count());
            let mut prev = 0usize;
            for split in splits {
                prop_assert!(split > prev);
                prop_assert!(split < trace.len());
                prev = split;
            }
        }
    }

    #[test]
    fn failure_index_is_inside_trace(
        visibility in prop::collection::vec(any::<bool>(), 1..12),
        chain in chain_strategy(),
    ) {
        let trace = trace_of(&visibility);
        if let Verdict::Failed(failure) = chain.evaluate(&trace) {
            prop_assert!(failure.segment < chain.segment_count());
            if let Some(index) = failure.snapshot_index {
                prop_assert!(index < trace.len());
            }
        }
    }
}

// ============================================================================
// Tracing contract
// ============================================================================

#[derive(Default)]
struct Captured {
    spans: Vec<String>,
    warnings: usize,
}

struct CaptureLayer(Arc<Mutex<Captured>>);

impl<S> tracing_subscriber::Layer<S> for CaptureLayer
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.0
            .lock()
            .unwrap()
            .spans
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.lock().unwrap().warnings += 1;
        }
    }
}

#[test]
fn failed_chain_emits_span_and_warning() {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(Arc::clone(&captured)));
    let trace = trace_of(&[true]);
    let chain = AssertionChain::windows().is_invisible(w());

    let verdict = tracing::subscriber::with_default(subscriber, || chain.evaluate(&trace));

    assert!(!verdict.is_matched());
    let captured = captured.lock().unwrap();
    assert!(captured.spans.iter().any(|s| s == "flicker.sequence"));
    assert_eq!(captured.warnings, 1);
}
