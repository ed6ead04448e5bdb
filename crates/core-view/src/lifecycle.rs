use crate::{PaneId, ResultsView, TabHost};
use tracing::{debug, trace, warn};

/// What `ensure_singleton` did, for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LifecycleReport {
    pub closed: Vec<PaneId>,
    pub origin_was_results: bool,
    pub focus_restored: bool,
}

/// Close any results view in the current tab so a new one can take its place.
/// No-op when none exists.
pub fn ensure_singleton<H>(host: &mut H) -> LifecycleReport
where
    H: TabHost + ResultsView + ?Sized,
{
    let origin = host.current_pane();
    let results: Vec<PaneId> = host
        .panes()
        .into_iter()
        .filter_map(|p| {
            let handle = p.results_handle()?;
            trace!(target: "view.lifecycle", pane = %p.id, number = handle.number, "results_view_found");
            Some(p.id)
        })
        .collect();

    if results.is_empty() {
        trace!(target: "view.lifecycle", %origin, "no_results_view");
        return LifecycleReport::default();
    }
    if results.len() > 1 {
        warn!(
            target: "view.lifecycle",
            count = results.len(),
            "multiple_results_views_closing_all"
        );
    }

    let origin_was_results = results.contains(&origin);
    for pane in &results {
        host.close(*pane);
        debug!(target: "view.lifecycle", pane = %pane, "results_view_closed");
    }
    let focus_restored = !origin_was_results;
    if focus_restored {
        host.focus(origin);
    }
    LifecycleReport {
        closed: results,
        origin_was_results,
        focus_restored,
    }
}
