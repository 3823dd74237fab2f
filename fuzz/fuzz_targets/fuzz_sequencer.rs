#![no_main]

use arbitrary::Arbitrary;
use flicker_assert::{AssertionChain, Verdict};
use flicker_core::{ComponentId, Rect, Snapshot, StateTrace};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Check {
    Visible,
    Invisible,
    Contains,
    Absent,
}

#[derive(Debug, Arbitrary)]
struct Step {
    /// Start a new segment before this check.
    then: bool,
    check: Check,
}

#[derive(Debug, Arbitrary)]
struct Input {
    /// Per snapshot: `None` = absent, `Some(v)` = present with visibility `v`.
    frames: Vec<Option<bool>>,
    steps: Vec<Step>,
}

fn app() -> ComponentId {
    ComponentId::new("pkg", "pkg.App")
}

fuzz_target!(|input: Input| {
    let snapshots = input.frames.iter().take(64).enumerate().map(|(i, frame)| {
        let builder = Snapshot::builder(i as u64);
        let builder = match frame {
            Some(visible) => builder.window(app(), *visible, Rect::new(0, 0, 8, 8)),
            None => builder,
        };
        builder.build().expect("valid geometry")
    });
    let trace = StateTrace::ingest(snapshots).expect("ordered");

    let chain = input
        .steps
        .iter()
        .take(8)
        .fold(AssertionChain::windows(), |chain, step| {
            let chain = if step.then { chain.then() } else { chain };
            match step.check {
                Check::Visible => chain.is_visible(app()),
                Check::Invisible => chain.is_invisible(app()),
                Check::Contains => chain.contains(app()),
                Check::Absent => chain.not_contains(app()),
            }
        });

    let verdict = chain.evaluate(&trace);
    assert_eq!(verdict, chain.evaluate(&trace), "evaluation must be pure");

    match verdict {
        Verdict::Matched => {
            let splits = chain.split_points(&trace).expect("matched chain splits");
            assert_eq!(splits.len() + 1, chain.segment_count().max(1));
            assert!(splits.windows(2).all(|w| w[0] < w[1]));
            assert!(splits.iter().all(|&s| s > 0 && s < trace.len()));
        }
        Verdict::Failed(failure) => {
            assert!(failure.segment < chain.segment_count().max(1));
            if let Some(index) = failure.snapshot_index {
                assert!(index < trace.len());
            }
            if trace.is_empty() {
                assert_eq!(failure.snapshot_index, None);
            }
        }
    }
});
