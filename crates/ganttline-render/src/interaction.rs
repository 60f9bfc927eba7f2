//! Pointer events from the rendered chart, routed into UI state changes
//! and host commands.

use crate::rows::Row;
use crate::scene::{ChartScene, HitTarget};
use ganttline_core::{Host, HostCommand, Hover, Point, UiState, ZoomWindow};
use tracing::{debug, trace};

/// Pointer or slider event, addressed by row index in the scene it was
/// raised against
#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    GroupHeaderClick { row: usize },
    /// Primary click on a bar
    BarClick { row: usize },
    /// Secondary click on a bar, in viewport coordinates
    BarContextMenu { row: usize, client: Point },
    BarPointerOver { row: usize, client: Point },
    BarPointerOut,
    /// Range slider moved; handles in 0..=100
    ZoomChange { start_percent: u8, end_percent: u8 },
}

impl ChartEvent {
    /// Event raised by clicking a hit target; `context` carries the
    /// viewport position for secondary clicks.
    ///
    /// Secondary clicks on group headers raise nothing.
    pub fn for_click(target: &HitTarget, context: Option<Point>) -> Option<Self> {
        match (target, context) {
            (HitTarget::GroupHeader { row, .. }, None) => Some(Self::GroupHeaderClick { row: *row }),
            (HitTarget::GroupHeader { .. }, Some(_)) => None,
            (HitTarget::Bar { row, .. }, None) => Some(Self::BarClick { row: *row }),
            (HitTarget::Bar { row, .. }, Some(client)) => Some(Self::BarContextMenu { row: *row, client }),
        }
    }
}

/// Result of routing one event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RouteOutcome {
    /// UI state changed; the caller should lay out again
    pub needs_layout: bool,
    /// Commands handed to the host, in order
    pub commands: Vec<HostCommand>,
    /// The platform context menu must not open
    pub suppress_default_menu: bool,
}

/// Apply `event` to `ui` and forward host requests.
///
/// Host calls are fire-and-forget. Without a host, or without the matching
/// capability, selection and context-menu events are no-ops.
pub fn route(event: &ChartEvent, scene: &ChartScene, ui: &mut UiState, host: Option<&dyn Host>) -> RouteOutcome {
    let mut outcome = RouteOutcome::default();

    match event {
        ChartEvent::GroupHeaderClick { row } => {
            if let Some(Row::Group { key, .. }) = scene.rows.get(*row) {
                let collapsed = ui.collapse.toggle(key);
                // Row indices shift, so a stale hover would point at the wrong task
                ui.hover = None;
                outcome.needs_layout = true;
                debug!(group = %key, collapsed, "toggled group");
            }
        }

        ChartEvent::BarClick { row } => {
            let Some(host) = host.filter(|h| h.can_select()) else {
                trace!(row, "bar click without selection capability");
                return outcome;
            };
            let Some(identity) = scene.task_on_row(*row).and_then(|task| task.identity.clone()) else {
                trace!(row, "bar click on task without identity");
                return outcome;
            };
            let command = HostCommand::Select {
                identity,
                additive: false,
            };
            host.dispatch(command.clone());
            outcome.commands.push(command);
        }

        ChartEvent::BarContextMenu { row, client } => {
            let Some(host) = host.filter(|h| h.can_launch_context_menu()) else {
                return outcome;
            };
            if scene.bar_on_row(*row).is_none() {
                return outcome;
            }
            outcome.suppress_default_menu = true;
            // The menu carries a fresh selection id only; no task identity is attached
            if let Some(selection_id) = host.create_selection_id() {
                let command = HostCommand::LaunchContextMenu {
                    selection_id,
                    position: *client,
                };
                host.dispatch(command.clone());
                outcome.commands.push(command);
            }
        }

        ChartEvent::BarPointerOver { row, client } => {
            if scene.bar_on_row(*row).is_some() {
                ui.hover = Some(Hover {
                    row: *row,
                    pointer: *client,
                });
                outcome.needs_layout = true;
            }
        }

        ChartEvent::BarPointerOut => {
            outcome.needs_layout = ui.hover.take().is_some();
        }

        ChartEvent::ZoomChange {
            start_percent,
            end_percent,
        } => match ZoomWindow::from_percent(*start_percent, *end_percent) {
            Ok(zoom) => {
                if zoom != ui.zoom {
                    ui.zoom = zoom;
                    outcome.needs_layout = true;
                    debug!(start = zoom.start(), end = zoom.end(), "zoom changed");
                }
            }
            Err(err) => debug!(%err, "ignored zoom change"),
        },
    }

    outcome
}
