// ── Operator session ──
//
// Everything one operator session owns: both caches, the selection and the
// load status. Passed explicitly to every orchestrator action; nothing here
// is process-global.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::model::ConnectionView;
use crate::selection::Selection;
use crate::store::{GatewayRegistry, VpnDirectory};

/// Progress of the initial (or an explicit) load of both caches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Loading => f.write_str("Loading"),
            Self::Ready => f.write_str("Ready"),
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

pub struct Session {
    directory: VpnDirectory,
    registry: GatewayRegistry,
    selection: Selection,
    load_state: watch::Sender<LoadState>,
}

impl Session {
    pub fn new() -> Self {
        let (load_state, _) = watch::channel(LoadState::Idle);
        Self {
            directory: VpnDirectory::new(),
            registry: GatewayRegistry::new(),
            selection: Selection::new(),
            load_state,
        }
    }

    pub fn directory(&self) -> &VpnDirectory {
        &self.directory
    }

    pub fn registry(&self) -> &GatewayRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state.borrow().clone()
    }

    pub fn subscribe_load_state(&self) -> watch::Receiver<LoadState> {
        self.load_state.subscribe()
    }

    /// The view of the selected connection, once fetched.
    pub fn view(&self) -> Option<Arc<ConnectionView>> {
        self.selection.current().view
    }

    pub(crate) fn set_load_state(&self, state: LoadState) {
        self.load_state.send_replace(state);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
