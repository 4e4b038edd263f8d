//! Icon storage for a container.

use crate::error::ContainerError;
use crate::icon::{Icon, IconId, LabelPosition};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// The icons of a container, keyed by id, with their stacking order and a
/// uri index.
#[derive(Debug, Clone, Default)]
pub struct IconCanvas {
    /// All icons, keyed by ID.
    icons: HashMap<IconId, Icon>,
    /// Stacking order (back to front). Also the insertion order.
    z_order: Vec<IconId>,
    /// Lookup by payload uri.
    by_uri: HashMap<String, IconId>,
}

impl IconCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an icon. Fails if an icon with the same uri exists.
    pub fn add_icon(&mut self, icon: Icon) -> Result<IconId, ContainerError> {
        if self.by_uri.contains_key(icon.uri()) {
            return Err(ContainerError::DuplicateIcon(icon.uri().to_string()));
        }
        let id = IconId::new();
        self.by_uri.insert(icon.uri().to_string(), id);
        self.z_order.push(id);
        self.icons.insert(id, icon);
        Ok(id)
    }

    /// Remove an icon.
    pub fn remove_icon(&mut self, id: IconId) -> Option<Icon> {
        let icon = self.icons.remove(&id)?;
        self.z_order.retain(|&other| other != id);
        self.by_uri.remove(icon.uri());
        Some(icon)
    }

    /// Remove every icon.
    pub fn clear(&mut self) {
        self.icons.clear();
        self.z_order.clear();
        self.by_uri.clear();
    }

    pub fn get(&self, id: IconId) -> Option<&Icon> {
        self.icons.get(&id)
    }

    pub fn get_mut(&mut self, id: IconId) -> Option<&mut Icon> {
        self.icons.get_mut(&id)
    }

    pub fn contains(&self, id: IconId) -> bool {
        self.icons.contains_key(&id)
    }

    /// Find an icon by its payload uri.
    pub fn icon_by_uri(&self, uri: &str) -> Option<IconId> {
        self.by_uri.get(uri).copied()
    }

    /// Icon ids in stacking order (back to front).
    pub fn ids(&self) -> &[IconId] {
        &self.z_order
    }

    /// Icons in stacking order (back to front).
    pub fn icons_ordered(&self) -> impl Iterator<Item = (IconId, &Icon)> {
        self.z_order
            .iter()
            .filter_map(|&id| self.icons.get(&id).map(|icon| (id, icon)))
    }

    /// Bring an icon to the front.
    pub fn raise(&mut self, id: IconId) {
        if self.icons.contains_key(&id) {
            self.z_order.retain(|&other| other != id);
            self.z_order.push(id);
        }
    }

    /// Union of the bounds of every positioned icon.
    pub fn bounds(&self, label_position: LabelPosition, entire: bool) -> Option<Rect> {
        self.icons
            .values()
            .filter(|icon| icon.is_positioned())
            .map(|icon| {
                if entire {
                    icon.entire_bounds(label_position)
                } else {
                    icon.layout_bounds(label_position)
                }
            })
            .reduce(|a, b| a.union(b))
    }

    /// The topmost icon under a canvas point.
    pub fn icon_at_point(&self, point: Point, label_position: LabelPosition) -> Option<IconId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.icons
                .get(id)
                .is_some_and(|icon| icon.hit(point, label_position))
        })
    }

    /// Icons whose image or label touches a canvas rectangle.
    pub fn icons_in_rect(&self, rect: Rect, label_position: LabelPosition) -> Vec<IconId> {
        self.icons_ordered()
            .filter(|(_, icon)| icon.intersects(rect, label_position))
            .map(|(id, _)| id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }
}
