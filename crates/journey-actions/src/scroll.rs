//! Incremental scroll simulation.

use page_port::PagePort;
use siteflow_core_types::DriveError;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::policy::{ScrollPacing, SettlePolicy};

/// Walk the viewport to the bottom of the page in fixed steps, then snap to
/// the exact target and let lazy-loaded content settle.
///
/// Best-effort by contract: a failing port call abandons the scroll with a
/// warning instead of failing the journey.
///
/// The target offset is read once before the loop. If content grows while
/// the scroll is in flight (lazy loading), the stale target is used and the
/// final snap may land short of the true bottom; known limitation.
pub async fn scroll_to_bottom(page: &dyn PagePort, pacing: &ScrollPacing, policy: &SettlePolicy) {
    let (start, target) = match read_geometry(page).await {
        Ok(geometry) => geometry,
        Err(err) => {
            warn!(error = %err, "could not read scroll geometry, skipping scroll");
            return;
        }
    };

    debug!(start, target, step = pacing.effective_step(), "starting stepped scroll");

    let step = pacing.effective_step();
    let mut position = start;
    while position <= target {
        if let Err(err) = page.set_scroll_position(position).await {
            warn!(error = %err, position, "scroll step failed, abandoning scroll");
            return;
        }
        sleep(pacing.step_delay()).await;
        position += step;
    }

    // The last step overshoots whenever the step size does not divide the
    // distance; force the exact target regardless.
    if let Err(err) = page.set_scroll_position(target).await {
        warn!(error = %err, target, "final scroll snap failed");
        return;
    }

    sleep(policy.scroll_settle()).await;
    debug!(target, "scroll to bottom complete");
}

async fn read_geometry(page: &dyn PagePort) -> Result<(i64, i64), DriveError> {
    let current = page.scroll_position().await?;
    let content = page.content_height().await?;
    let viewport = page.viewport_height().await?;
    Ok((current, (content - viewport).max(0)))
}
