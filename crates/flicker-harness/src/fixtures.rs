#![forbid(unsafe_code)]

//! Synthetic open-trampoline captures.
//!
//! Produces the snapshot sequence a healthy device records for the
//! open-trampoline transition, plus regressed variants, so the harness can
//! be exercised without a device. `seed-fixture` writes them to disk in the
//! capture file format.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use flicker_core::{Rect, Snapshot};
use tracing::info;

use crate::capture::{RecordedCapture, SessionId};
use crate::error::Result;
use crate::trampoline::{MAIN_ACTIVITY, SECONDARY_ACTIVITY, TRAMPOLINE_ACTIVITY};

/// One frame at 60 Hz.
pub const FRAME_NANOS: u64 = 16_666_667;

/// Portrait phone display used when none is given.
pub const DEFAULT_DISPLAY: Rect = Rect::new(0, 0, 1080, 2400);

/// Which recording to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TrampolineVariant {
    /// Healthy transition ending in an even split.
    #[default]
    Clean,
    /// The trampoline layer draws for one frame.
    TrampolineFlash,
    /// The final secondary layer stops short of the display edge.
    LayerSplitGap,
}

/// Snapshots for the open-trampoline transition on `display`.
///
/// Frames: main fullscreen; trampoline window added (never drawn); main
/// resized to the left half with the secondary added invisible; split with
/// trampoline gone (twice).
pub fn trampoline_snapshots(display: Rect, variant: TrampolineVariant) -> Result<Vec<Snapshot>> {
    let half = display.width / 2;
    let left = Rect::new(display.x, display.y, half, display.height);
    let right = Rect::new(display.x + half, display.y, display.width - half, display.height);
    let frame = |i: u64| Snapshot::builder(i * FRAME_NANOS).display(display);

    let launched = frame(0)
        .window(MAIN_ACTIVITY, true, display)
        .layer_rect(MAIN_ACTIVITY, true, display)?
        .build()?;

    let trampoline = frame(1)
        .window(MAIN_ACTIVITY, true, display)
        .window(TRAMPOLINE_ACTIVITY, false, display)
        .layer_rect(MAIN_ACTIVITY, true, display)?
        .layer_rect(
            TRAMPOLINE_ACTIVITY,
            variant == TrampolineVariant::TrampolineFlash,
            display,
        )?
        .build()?;

    let secondary_added = frame(2)
        .window(MAIN_ACTIVITY, true, left)
        .window(TRAMPOLINE_ACTIVITY, false, display)
        .window(SECONDARY_ACTIVITY, false, right)
        .layer_rect(MAIN_ACTIVITY, true, left)?
        .layer_rect(SECONDARY_ACTIVITY, false, right)?
        .build()?;

    let split = |i: u64, secondary_layer: Rect| -> Result<Snapshot> {
        Ok(frame(i)
            .window(MAIN_ACTIVITY, true, left)
            .window(SECONDARY_ACTIVITY, true, right)
            .layer_rect(MAIN_ACTIVITY, true, left)?
            .layer_rect(SECONDARY_ACTIVITY, true, secondary_layer)?
            .build()?)
    };
    let final_layer = match variant {
        TrampolineVariant::LayerSplitGap => {
            Rect::new(right.x, right.y, right.width - 8, right.height)
        }
        _ => right,
    };

    Ok(vec![
        launched,
        trampoline,
        secondary_added,
        split(3, right)?,
        split(4, final_layer)?,
    ])
}

#[derive(Debug, Clone, Args)]
pub struct SeedFixtureArgs {
    /// Capture file to write.
    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = TrampolineVariant::Clean)]
    pub variant: TrampolineVariant,

    #[arg(long, default_value = "fixture")]
    pub session: String,

    #[arg(long, default_value_t = 1080)]
    pub width: i32,

    #[arg(long, default_value_t = 2400)]
    pub height: i32,
}

pub fn run_seed_fixture(args: SeedFixtureArgs) -> Result<()> {
    let display = Rect::new(0, 0, args.width, args.height);
    let snapshots = trampoline_snapshots(display, args.variant)?;
    RecordedCapture::write(&args.out, &SessionId::new(args.session), &snapshots)?;
    info!(
        path = %args.out.display(),
        variant = ?args.variant,
        snapshots = snapshots.len(),
        "wrote fixture capture"
    );
    println!("{}", args.out.display());
    Ok(())
}
