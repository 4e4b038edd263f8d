//! Interfaces to the collaborators a container talks to: the file manager
//! that owns the files, and the toolkit that runs drag and drop.

use crate::dnd::action::{DragAction, DragActions};
use crate::icon::IconData;
use crate::input::MouseButton;
use crate::wire::DragTarget;
use kurbo::Point;
use std::cmp::Ordering;

/// Answers questions about uris. Used when resolving drop actions.
pub trait FileClassifier {
    fn is_trash(&self, uri: &str) -> bool;

    /// Whether the uri lies inside the trash.
    fn is_in_trash(&self, uri: &str) -> bool;

    /// Whether the uri names the desktop directory itself.
    fn is_desktop_directory(&self, uri: &str) -> bool;

    /// The real directory behind the desktop.
    fn desktop_directory_uri(&self) -> Option<String>;

    fn is_archive(&self, uri: &str) -> bool;

    /// Launchers and other special links.
    fn is_launcher(&self, uri: &str) -> bool;

    /// Whether the uri is an item shown on the desktop.
    fn is_in_desktop(&self, uri: &str) -> bool;

    fn same_filesystem(&self, a: &str, b: &str) -> bool;

    fn is_deletable(&self, uri: &str) -> bool;

    fn parent_uri(&self, uri: &str) -> Option<String>;
}

/// Queries and hooks a container's owner provides.
pub trait ContainerDelegate: FileClassifier {
    /// Display order in auto layout.
    fn compare_icons(&self, a: &IconData, b: &IconData) -> Ordering {
        a.label.cmp(&b.label).then_with(|| a.uri.cmp(&b.uri))
    }

    /// Position saved for an icon in manual layout, with its scale.
    fn get_stored_icon_position(&self, _data: &IconData) -> Option<(Point, f64)> {
        None
    }

    /// Uri of the directory the container shows.
    fn container_uri(&self) -> Option<String>;

    /// Uri a drop onto the icon would land in. `None` if the icon is not a
    /// drop target.
    fn get_icon_drop_target_uri(&self, data: &IconData) -> Option<String> {
        Some(data.uri.clone())
    }

    /// Whether the dragged item can be dropped on the icon.
    fn can_accept_item(&self, target: &IconData, item_uri: &str) -> bool;

    /// Whether files can be dropped into the container.
    fn can_accept_files(&self) -> bool {
        true
    }

    /// Let the user pick an action for an ask drop. `None` cancels.
    fn ask_drop_action(&mut self, _allowed: DragActions, _point: Point) -> Option<DragAction> {
        None
    }

    fn start_rename(&mut self, _data: &IconData) {}

    fn end_rename(&mut self) {}

    /// Accessibility notification for selection changes.
    fn selection_changed_notify(&mut self) {}
}

/// Toolkit side of a drag started by the container.
pub trait DragSource {
    fn begin_drag(
        &mut self,
        targets: &[DragTarget],
        actions: DragActions,
        button: MouseButton,
        hotspot: Point,
    );
}

/// Toolkit side of a drag over the container.
pub trait DropContext {
    fn actions(&self) -> DragActions;

    fn suggested_action(&self) -> DragAction;

    /// Action chosen by the drag's final negotiation.
    fn selected_action(&self) -> DragAction {
        self.suggested_action()
    }

    /// MIME types offered by the source.
    fn targets(&self) -> Vec<String>;

    /// Ask the source for data. It arrives through the container's
    /// `drag_data_received`.
    fn request_data(&mut self, target: DragTarget);

    /// Report the action a drop would perform, `None` to refuse.
    fn status(&mut self, action: Option<DragAction>);

    /// Complete the drop.
    fn finish(&mut self, success: bool);

    /// Tell the source where to save a direct save drop.
    fn set_direct_save_uri(&mut self, uri: &str);

    /// File name proposed by a direct save source.
    fn direct_save_filename(&self) -> Option<String> {
        None
    }

    /// Whether the drag started from the same container.
    fn is_self_drag(&self) -> bool {
        false
    }
}

/// [`FileClassifier`] that judges uris by their shape alone: schemes, path
/// prefixes and file names.
#[derive(Debug, Clone, Default)]
pub struct UriClassifier {
    desktop_uri: Option<String>,
}

impl UriClassifier {
    pub fn new() -> Self {
        Self {
            desktop_uri: default_desktop_uri(),
        }
    }

    pub fn with_desktop_uri(desktop_uri: impl Into<String>) -> Self {
        Self {
            desktop_uri: Some(desktop_uri.into()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_desktop_uri() -> Option<String> {
    let dir = dirs::desktop_dir()?;
    url::Url::from_directory_path(dir)
        .ok()
        .map(|url| url.as_str().trim_end_matches('/').to_string())
}

#[cfg(target_arch = "wasm32")]
fn default_desktop_uri() -> Option<String> {
    None
}

fn scheme(uri: &str) -> Option<&str> {
    uri.split_once(':').map(|(scheme, _)| scheme)
}

impl FileClassifier for UriClassifier {
    fn is_trash(&self, uri: &str) -> bool {
        uri.trim_end_matches('/') == "trash:"
    }

    fn is_in_trash(&self, uri: &str) -> bool {
        scheme(uri) == Some("trash")
    }

    fn is_desktop_directory(&self, uri: &str) -> bool {
        let uri = uri.trim_end_matches('/');
        uri == "x-nautilus-desktop:" || self.desktop_uri.as_deref() == Some(uri)
    }

    fn desktop_directory_uri(&self) -> Option<String> {
        self.desktop_uri.clone()
    }

    fn is_archive(&self, uri: &str) -> bool {
        scheme(uri) == Some("archive")
    }

    fn is_launcher(&self, uri: &str) -> bool {
        uri.ends_with(".desktop")
    }

    fn is_in_desktop(&self, uri: &str) -> bool {
        self.parent_uri(uri)
            .is_some_and(|parent| self.is_desktop_directory(&parent))
    }

    fn same_filesystem(&self, a: &str, b: &str) -> bool {
        scheme(a).is_some() && scheme(a) == scheme(b)
    }

    fn is_deletable(&self, uri: &str) -> bool {
        matches!(scheme(uri), Some("file") | Some("trash"))
    }

    fn parent_uri(&self, uri: &str) -> Option<String> {
        let trimmed = uri.trim_end_matches('/');
        let (parent, name) = trimmed.rsplit_once('/')?;
        if name.is_empty() || parent.ends_with(':') || parent.ends_with(":/") {
            return None;
        }
        if parent.ends_with("//") {
            return Some(format!("{parent}/"));
        }
        Some(parent.to_string())
    }
}
