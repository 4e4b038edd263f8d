//! Headless container owner: a delegate backed by uri shapes and the layout
//! report printed by the binary.

use iconfield_core::host::{ContainerDelegate, FileClassifier, UriClassifier};
use iconfield_core::{Container, ContainerConfig, ContainerEvent, ContainerResult, IconData, IconId};
use kurbo::{Point, Size};
use serde::Serialize;
use std::collections::HashMap;

/// Delegate for a container showing one directory.
pub struct ShellDelegate {
    classifier: UriClassifier,
    directory_uri: Option<String>,
    /// Positions reported by the container, by uri.
    stored: HashMap<String, (Point, f64)>,
}

impl ShellDelegate {
    pub fn new(directory_uri: Option<String>) -> Self {
        Self {
            classifier: UriClassifier::new(),
            directory_uri,
            stored: HashMap::new(),
        }
    }

    fn store(&mut self, uri: String, position: Point, scale: f64) {
        self.stored.insert(uri, (position, scale));
    }
}

impl FileClassifier for ShellDelegate {
    fn is_trash(&self, uri: &str) -> bool {
        self.classifier.is_trash(uri)
    }

    fn is_in_trash(&self, uri: &str) -> bool {
        self.classifier.is_in_trash(uri)
    }

    fn is_desktop_directory(&self, uri: &str) -> bool {
        self.classifier.is_desktop_directory(uri)
    }

    fn desktop_directory_uri(&self) -> Option<String> {
        self.classifier.desktop_directory_uri()
    }

    fn is_archive(&self, uri: &str) -> bool {
        self.classifier.is_archive(uri)
    }

    fn is_launcher(&self, uri: &str) -> bool {
        self.classifier.is_launcher(uri)
    }

    fn is_in_desktop(&self, uri: &str) -> bool {
        self.classifier.is_in_desktop(uri)
    }

    fn same_filesystem(&self, a: &str, b: &str) -> bool {
        self.classifier.same_filesystem(a, b)
    }

    fn is_deletable(&self, uri: &str) -> bool {
        self.classifier.is_deletable(uri)
    }

    fn parent_uri(&self, uri: &str) -> Option<String> {
        self.classifier.parent_uri(uri)
    }
}

impl ContainerDelegate for ShellDelegate {
    fn get_stored_icon_position(&self, data: &IconData) -> Option<(Point, f64)> {
        self.stored.get(&data.uri).copied()
    }

    fn container_uri(&self) -> Option<String> {
        self.directory_uri.clone()
    }

    fn can_accept_item(&self, target: &IconData, item_uri: &str) -> bool {
        target.uri != item_uri
    }
}

/// One laid out icon, as printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedIcon {
    pub uri: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Lay out `uris` in a container of the given size.
pub fn lay_out(
    config: &ContainerConfig,
    size: Size,
    directory_uri: Option<String>,
    uris: &[String],
) -> ContainerResult<Vec<PlacedIcon>> {
    let mut container = Container::new(config, ShellDelegate::new(directory_uri), size);
    for uri in uris {
        container.add(IconData::from_uri(uri.as_str()))?;
    }
    container.process_idle();

    for event in container.take_events() {
        if let ContainerEvent::IconPositionChanged { uri, position, .. } = event {
            container
                .delegate_mut()
                .store(uri, Point::new(position.x, position.y), position.scale);
        }
    }
    log::debug!("Stored {} positions", container.delegate().stored.len());

    Ok(container
        .icons()
        .iter()
        .filter_map(|&id| placed(&container, id))
        .collect())
}

fn placed(container: &Container<ShellDelegate>, id: IconId) -> Option<PlacedIcon> {
    let icon = container.icon(id)?;
    let bounds = icon.layout_bounds(container.label_position());
    Some(PlacedIcon {
        uri: icon.uri().to_string(),
        x: bounds.x0,
        y: bounds.y0,
        width: bounds.width(),
        height: bounds.height(),
        scale: icon.scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| format!("file:///srv/share/{name}")).collect()
    }

    #[test]
    fn test_lay_out_places_every_icon() {
        let placed = lay_out(
            &ContainerConfig::default(),
            Size::new(640.0, 480.0),
            Some("file:///srv/share".to_string()),
            &uris(&["b", "a", "c"]),
        )
        .unwrap();
        let names: Vec<&str> = placed.iter().map(|icon| icon.uri.as_str()).collect();
        assert_eq!(
            names,
            vec!["file:///srv/share/a", "file:///srv/share/b", "file:///srv/share/c"]
        );
        assert!(placed.windows(2).all(|pair| pair[0].x < pair[1].x));
    }

    #[test]
    fn test_lay_out_rejects_duplicates() {
        let result = lay_out(
            &ContainerConfig::default(),
            Size::new(640.0, 480.0),
            None,
            &uris(&["a", "a"]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_manual_layout_fills_free_spots() {
        let config = ContainerConfig {
            auto_layout: false,
            ..ContainerConfig::default()
        };
        let placed = lay_out(&config, Size::new(640.0, 480.0), None, &uris(&["a", "b"])).unwrap();
        assert_eq!(placed.len(), 2);
        let rect = |icon: &PlacedIcon| {
            kurbo::Rect::new(icon.x, icon.y, icon.x + icon.width, icon.y + icon.height)
        };
        assert!(rect(&placed[0]).intersect(rect(&placed[1])).area() <= 0.0);
    }
}
