pub mod check;
pub mod config;
pub mod replay;
pub mod run;
pub mod simulate;

use std::io::BufRead;
use std::sync::atomic::Ordering;

use jumpcam_motion_core::{ControlLoop, FrameSource, InputSink, Presenter, RunSummary};

/// Run the control loop on a blocking thread until the source ends or the
/// user quits with Ctrl+C or `q` + Enter.
pub async fn drive(
    mut control: ControlLoop,
    mut source: Box<dyn FrameSource>,
    mut sink: Box<dyn InputSink>,
    mut presenter: Box<dyn Presenter>,
    interactive: bool,
) -> anyhow::Result<RunSummary> {
    let stop_flag = control.stop_flag();

    let ctrl_c_flag = stop_flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl+C received, stopping");
            ctrl_c_flag.store(true, Ordering::SeqCst);
        }
    });

    if interactive {
        let stdin_flag = stop_flag.clone();
        // A plain thread: a pending stdin read must not hold up runtime shutdown.
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().eq_ignore_ascii_case("q") {
                    tracing::info!("Quit requested from stdin");
                    stdin_flag.store(true, Ordering::SeqCst);
                    break;
                }
            }
        });
    }

    let summary = tokio::task::spawn_blocking(move || {
        control.run(source.as_mut(), sink.as_mut(), presenter.as_mut())
    })
    .await??;

    Ok(summary)
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("Session summary");
    println!("{}", "=".repeat(40));
    println!("  Frames processed: {}", summary.frames_processed);
    println!("  Key presses:      {}", summary.key_presses);
    println!("  Key releases:     {}", summary.key_releases);
    println!("  Average FPS:      {:.1}", summary.average_fps);
    println!("  Ended by:         {:?}", summary.end_reason);
}
