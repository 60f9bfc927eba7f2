//! Capabilities the surrounding host lends to the chart.
//!
//! The engine never waits on the host: every request is a `HostCommand`
//! handed to `Host::dispatch` and forgotten.

use crate::{Identity, Point, SelectionId};
use std::cell::Cell;
use std::sync::mpsc::Sender;
use tracing::trace;

/// Request sent from the interaction router to the host
#[derive(Clone, Debug, PartialEq)]
pub enum HostCommand {
    /// Replace (or extend, when `additive`) the host selection
    Select { identity: Identity, additive: bool },
    /// Open the host context menu at a viewport position
    LaunchContextMenu {
        selection_id: SelectionId,
        position: Point,
    },
}

/// Host capability set.
///
/// A host may lack either capability; the router checks before dispatching.
pub trait Host {
    /// A selection manager is available
    fn can_select(&self) -> bool;

    /// A context-menu launcher is available
    fn can_launch_context_menu(&self) -> bool;

    /// Mint a fresh selection id, if the host has a factory for them
    fn create_selection_id(&self) -> Option<SelectionId>;

    /// Fire-and-forget delivery of a command
    fn dispatch(&self, command: HostCommand);
}

/// Host that forwards commands over a channel to whoever owns the receiver
#[derive(Debug)]
pub struct ChannelHost {
    sender: Sender<HostCommand>,
    select: bool,
    context_menu: bool,
    next_selection: Cell<u64>,
}

impl ChannelHost {
    /// Host with both capabilities
    pub fn new(sender: Sender<HostCommand>) -> Self {
        Self {
            sender,
            select: true,
            context_menu: true,
            next_selection: Cell::new(0),
        }
    }

    /// Drop the selection capability
    pub fn without_selection(mut self) -> Self {
        self.select = false;
        self
    }

    /// Drop the context-menu capability
    pub fn without_context_menu(mut self) -> Self {
        self.context_menu = false;
        self
    }
}

impl Host for ChannelHost {
    fn can_select(&self) -> bool {
        self.select
    }

    fn can_launch_context_menu(&self) -> bool {
        self.context_menu
    }

    fn create_selection_id(&self) -> Option<SelectionId> {
        let n = self.next_selection.get();
        self.next_selection.set(n + 1);
        Some(SelectionId::new(format!("selection-{}", n)))
    }

    fn dispatch(&self, command: HostCommand) {
        if self.sender.send(command).is_err() {
            trace!("host receiver dropped; command discarded");
        }
    }
}
