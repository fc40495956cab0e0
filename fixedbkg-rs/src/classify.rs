use skyreg::{Region, filter_points};
use tracing::debug;

/// Keep the events that fall inside the exclusion region, i.e. the background.
///
/// Membership is tested in parallel; the output keeps the input order.
pub fn classify_events(events: &[(f64, f64)], exclusion: &Region) -> Vec<(f64, f64)> {
    let background = filter_points(exclusion, events);
    debug!(
        "Classified {} events: {} background, {} excluded",
        events.len(),
        background.len(),
        events.len() - background.len()
    );
    background
}
