//! Drag actions and the rules choosing the action of a drop.

use crate::host::FileClassifier;
use crate::wire::SelectionListItem;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// What a drop does with the dragged items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragAction {
    Move,
    Copy,
    Link,
    /// Let the user choose on drop.
    Ask,
}

impl DragAction {
    pub fn flag(self) -> DragActions {
        match self {
            DragAction::Move => DragActions::MOVE,
            DragAction::Copy => DragActions::COPY,
            DragAction::Link => DragActions::LINK,
            DragAction::Ask => DragActions::ASK,
        }
    }
}

bitflags! {
    /// Set of actions a drag source permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DragActions: u8 {
        const MOVE = 1 << 0;
        const COPY = 1 << 1;
        const LINK = 1 << 2;
        const ASK = 1 << 3;
    }
}

impl DragActions {
    pub fn permits(self, action: DragAction) -> bool {
        self.contains(action.flag())
    }
}

/// Everything needed to pick the action for dropping icons on a target.
#[derive(Debug, Clone, Copy)]
pub struct DropQuery<'a> {
    pub actions: DragActions,
    pub suggested: DragAction,
    /// Uri the items would land in. `None` if there is no valid target.
    pub target_uri: Option<&'a str>,
    pub items: &'a [SelectionListItem],
}

/// Pick the action for dropping icon list items. Returns `None` when there
/// is no target.
pub fn resolve(query: &DropQuery<'_>, classifier: &dyn FileClassifier) -> Option<DragAction> {
    let target = query.target_uri?;
    let actions = query.actions;
    let suggested = query.suggested;

    if !actions.intersects(DragActions::MOVE | DragActions::COPY) {
        return Some(suggested);
    }
    match suggested {
        DragAction::Ask | DragAction::Link => return Some(suggested),
        DragAction::Move | DragAction::Copy => {}
    }

    if classifier.is_trash(target) {
        return Some(if actions.permits(DragAction::Move) {
            DragAction::Move
        } else {
            suggested
        });
    }

    let Some(first) = query.items.first() else {
        return Some(suggested);
    };

    let forced = if query.items.iter().any(|item| classifier.is_launcher(&item.uri)) {
        DragAction::Move
    } else if classifier.is_desktop_directory(target) && classifier.is_in_desktop(&first.uri) {
        DragAction::Move
    } else if classifier.is_archive(target) {
        DragAction::Copy
    } else {
        let same_fs = classifier.same_filesystem(&first.uri, target);
        let deletable = classifier.is_deletable(&first.uri);
        let parent_is_target = classifier
            .parent_uri(&first.uri)
            .is_some_and(|parent| uris_equal(&parent, target));
        if (same_fs && deletable) || parent_is_target || classifier.is_in_trash(&first.uri) {
            DragAction::Move
        } else {
            DragAction::Copy
        }
    };
    Some(permitted_or_fallback(forced, actions, suggested))
}

/// A forced move the source forbids becomes a copy when that is allowed;
/// anything else forbidden falls back to the suggestion.
fn permitted_or_fallback(
    forced: DragAction,
    actions: DragActions,
    suggested: DragAction,
) -> DragAction {
    if actions.permits(forced) {
        forced
    } else if forced == DragAction::Move && actions.permits(DragAction::Copy) {
        DragAction::Copy
    } else {
        suggested
    }
}

fn uris_equal(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

/// Action for a uri list drop.
pub fn default_action_for_uri_list(
    actions: DragActions,
    suggested: DragAction,
    target_uri: &str,
    classifier: &dyn FileClassifier,
) -> DragAction {
    if classifier.is_trash(target_uri) && actions.permits(DragAction::Move) {
        DragAction::Move
    } else {
        suggested
    }
}

/// Action for a browser url drop: urls are linked rather than copied when
/// the source allows more than copying, and never moved.
pub fn default_action_for_netscape_url(actions: DragActions, suggested: DragAction) -> DragAction {
    match suggested {
        DragAction::Copy if actions != DragActions::COPY => DragAction::Link,
        DragAction::Move => DragAction::Copy,
        other => other,
    }
}
