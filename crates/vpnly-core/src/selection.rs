// ── Selection & detail state machine ──
//
// Three states: nothing selected, a connection selected (summary), and a
// connection selected with its detail expanded. Transitions are pure
// functions on `SelectionState`; `Selection` wraps them in a `watch`
// channel together with the currently displayed view and a generation
// counter used to drop results of superseded actions.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::model::{ConnectionView, ResourceId};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(ResourceId),
    DetailExpanded(ResourceId),
}

impl SelectionState {
    /// Expand `id`, or collapse it if it is the one already expanded.
    pub fn toggle_detail(&self, id: ResourceId) -> Self {
        match self {
            Self::DetailExpanded(current) if *current == id => Self::Selected(id),
            _ => Self::DetailExpanded(id),
        }
    }

    pub fn selected_id(&self) -> Option<&ResourceId> {
        match self {
            Self::Idle => None,
            Self::Selected(id) | Self::DetailExpanded(id) => Some(id),
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::DetailExpanded(_))
    }
}

/// What the operator currently sees.
#[derive(Debug, Clone, Default)]
pub struct SelectionSnapshot {
    pub state: SelectionState,
    /// The last view fetched for the selected id. `None` while the first
    /// fetch for a new selection is in flight.
    pub view: Option<Arc<ConnectionView>>,
    /// Bumped on every operator transition.
    pub generation: u64,
}

pub struct Selection {
    tx: watch::Sender<SelectionSnapshot>,
}

impl Selection {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SelectionSnapshot::default());
        Self { tx }
    }

    pub fn current(&self) -> SelectionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> SelectionState {
        self.tx.borrow().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SelectionSnapshot> {
        self.tx.subscribe()
    }

    /// Enter `Selected(id)` from any state, collapsing open detail. Returns
    /// the generation the follow-up fetch must present to apply its result.
    pub(crate) fn begin_select(&self, id: &ResourceId) -> u64 {
        self.transition(|_| SelectionState::Selected(id.clone()))
    }

    /// Toggle detail for `id`. Returns the new state and its generation.
    pub(crate) fn begin_toggle(&self, id: &ResourceId) -> (SelectionState, u64) {
        let generation = self.transition(|state| state.toggle_detail(id.clone()));
        (self.state(), generation)
    }

    /// Publish a fetched view if no later transition happened and the view
    /// still matches the selection.
    pub(crate) fn apply_view(&self, generation: u64, view: Arc<ConnectionView>) -> bool {
        self.tx.send_if_modified(|snap| {
            if snap.generation != generation || snap.state.selected_id() != Some(view.id()) {
                return false;
            }
            snap.view = Some(view);
            true
        })
    }

    /// Replace the displayed view after a mutation refresh, whatever the
    /// generation, provided the same connection is still selected.
    pub(crate) fn refresh_view(&self, view: Arc<ConnectionView>) -> bool {
        self.tx.send_if_modified(|snap| {
            if snap.state.selected_id() != Some(view.id()) {
                return false;
            }
            snap.view = Some(view);
            true
        })
    }

    /// A detail expansion failed: fall back to the summary.
    pub(crate) fn revert_expand(&self, generation: u64) {
        self.tx.send_if_modified(|snap| {
            if snap.generation != generation {
                return false;
            }
            match &snap.state {
                SelectionState::DetailExpanded(id) => {
                    snap.state = SelectionState::Selected(id.clone());
                    true
                }
                _ => false,
            }
        });
    }

    /// The selected connection vanished: return to `Idle`.
    pub(crate) fn clear(&self, generation: u64) {
        self.tx.send_if_modified(|snap| {
            if snap.generation != generation {
                return false;
            }
            snap.state = SelectionState::Idle;
            snap.view = None;
            true
        });
    }

    fn transition(&self, next: impl FnOnce(&SelectionState) -> SelectionState) -> u64 {
        let mut generation = 0;
        self.tx.send_modify(|snap| {
            let state = next(&snap.state);
            if state.selected_id() != snap.state.selected_id() {
                snap.view = None;
            }
            debug!(from = ?snap.state, to = ?state, "selection transition");
            snap.state = state;
            snap.generation += 1;
            generation = snap.generation;
        });
        generation
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{IkeSettings, ResolvedPeer, VpnConnection, VpnState};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> ResourceId {
        ResourceId::new(s)
    }

    fn view(vpn: &str) -> Arc<ConnectionView> {
        let connection = VpnConnection {
            id: id(vpn),
            state: VpnState::Available,
            display_name: "unnamed".into(),
            peer_gateway_id: id("cgw-1"),
            gateway_ip: "198.51.100.1".into(),
            transit_gateway_id: None,
            tunnels: vec![],
            ike: IkeSettings {
                version: "ikev2".into(),
                encryption_algorithm: "AES256".into(),
                authentication_algorithm: "SHA2-256".into(),
                dh_group: 14,
                lifetime_seconds: 28800,
            },
        };
        Arc::new(ConnectionView::new(
            Arc::new(connection),
            ResolvedPeer::unknown(id("cgw-1")),
        ))
    }

    #[test]
    fn toggle_round_trip_returns_to_selected() {
        let selected = SelectionState::Selected(id("vpn-1"));
        let expanded = selected.toggle_detail(id("vpn-1"));
        assert_eq!(expanded, SelectionState::DetailExpanded(id("vpn-1")));
        assert_eq!(expanded.toggle_detail(id("vpn-1")), selected);
    }

    #[test]
    fn selecting_collapses_detail() {
        let selection = Selection::new();
        selection.begin_toggle(&id("vpn-1"));
        assert!(selection.state().is_expanded());
        selection.begin_select(&id("vpn-1"));
        assert_eq!(selection.state(), SelectionState::Selected(id("vpn-1")));
        selection.begin_toggle(&id("vpn-1"));
        selection.begin_select(&id("vpn-2"));
        assert_eq!(selection.state(), SelectionState::Selected(id("vpn-2")));
    }

    #[test]
    fn toggling_another_id_expands_it() {
        let expanded = SelectionState::DetailExpanded(id("vpn-1"));
        assert_eq!(
            expanded.toggle_detail(id("vpn-2")),
            SelectionState::DetailExpanded(id("vpn-2"))
        );
        assert_eq!(
            SelectionState::Idle.toggle_detail(id("vpn-3")),
            SelectionState::DetailExpanded(id("vpn-3"))
        );
    }

    #[test]
    fn stale_generation_is_not_applied() {
        let selection = Selection::new();
        let first = selection.begin_select(&id("vpn-a"));
        let _second = selection.begin_select(&id("vpn-b"));
        assert!(!selection.apply_view(first, view("vpn-a")));
        assert!(selection.current().view.is_none());
        assert_eq!(selection.state(), SelectionState::Selected(id("vpn-b")));
    }

    #[test]
    fn switching_selection_discards_view() {
        let selection = Selection::new();
        let generation = selection.begin_select(&id("vpn-a"));
        assert!(selection.apply_view(generation, view("vpn-a")));
        selection.begin_select(&id("vpn-b"));
        assert!(selection.current().view.is_none());
    }

    #[test]
    fn collapse_keeps_view() {
        let selection = Selection::new();
        let generation = selection.begin_select(&id("vpn-a"));
        selection.apply_view(generation, view("vpn-a"));
        selection.begin_toggle(&id("vpn-a"));
        let (state, _) = selection.begin_toggle(&id("vpn-a"));
        assert_eq!(state, SelectionState::Selected(id("vpn-a")));
        assert!(selection.current().view.is_some());
    }

    #[test]
    fn revert_expand_only_for_current_generation() {
        let selection = Selection::new();
        let (_, generation) = selection.begin_toggle(&id("vpn-a"));
        selection.revert_expand(generation - 1);
        assert!(selection.state().is_expanded());
        selection.revert_expand(generation);
        assert_eq!(selection.state(), SelectionState::Selected(id("vpn-a")));
    }

    #[test]
    fn refresh_view_ignores_other_connections() {
        let selection = Selection::new();
        selection.begin_select(&id("vpn-a"));
        assert!(!selection.refresh_view(view("vpn-b")));
        assert!(selection.refresh_view(view("vpn-a")));
    }
}
