//! Destination side of a drag: negotiated data, the drop target icon and
//! the drop itself.

use crate::icon::IconId;
use crate::wire::{self, DragTarget, SelectionListItem};
use kurbo::{Point, Rect};

/// Reply of a direct save source after writing the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectSaveReply {
    /// The source saved the file.
    Success,
    /// The source could not save; ask for the raw data instead.
    Fallback,
    Error,
}

impl DirectSaveReply {
    pub fn parse(data: &[u8]) -> Self {
        match data {
            [b'S', ..] => DirectSaveReply::Success,
            [b'F', ..] => DirectSaveReply::Fallback,
            _ => DirectSaveReply::Error,
        }
    }
}

/// State of one drag over the container.
#[derive(Debug, Clone, Default)]
pub struct DropSession {
    /// The data type has been negotiated.
    pub got_data_type: bool,
    pub data_type: Option<DragTarget>,
    /// Decoded icon list.
    pub items: Vec<SelectionListItem>,
    /// Raw selection data as received.
    pub data: Option<Vec<u8>>,
    /// A data request is in flight.
    pub waiting_for_data: bool,
    pub drop_occurred: bool,
    /// Icon under the pointer that accepts the drop.
    pub target_icon: Option<IconId>,
    /// Outline of the dragged icons, in widget pixels.
    pub shadow: Vec<Rect>,
    pub direct_save_uri: Option<String>,
    /// Last pointer position over the container, in widget pixels.
    pub pointer: Point,
}

impl DropSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the negotiated type. Returns true if its data should be
    /// requested now.
    pub fn set_data_type(&mut self, target: DragTarget) -> bool {
        self.got_data_type = true;
        self.data_type = Some(target);
        if target.prefetch() && self.data.is_none() && !self.waiting_for_data {
            self.waiting_for_data = true;
            return true;
        }
        false
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Store data from the source. Icon lists are decoded right away.
    pub fn receive_data(&mut self, data: &[u8]) {
        self.waiting_for_data = false;
        if self.data_type == Some(DragTarget::IconList) {
            self.items = wire::decode(data);
        }
        self.data = Some(data.to_vec());
    }

    /// Mark the drop. Returns false if a drop is already pending, which the
    /// toolkit never does.
    pub fn mark_drop(&mut self) -> bool {
        if self.drop_occurred {
            debug_assert!(false, "drop while another drop is pending");
            log::error!("Ignoring drop while another drop is pending");
            return false;
        }
        self.drop_occurred = true;
        true
    }

    /// Track the pointer and move the outline of the dragged icons with it.
    /// Items carry offsets relative to the pointer.
    pub fn update_shadow(&mut self, pointer: Point) {
        self.pointer = pointer;
        self.shadow = self
            .items
            .iter()
            .filter_map(|item| item.rect)
            .map(|rect| {
                Rect::from_origin_size(
                    (pointer.x + f64::from(rect.x), pointer.y + f64::from(rect.y)),
                    (f64::from(rect.width), f64::from(rect.height)),
                )
            })
            .collect();
    }

    /// Whether every dragged item comes from the given uris.
    pub fn items_are_local(&self, contains: impl Fn(&str) -> bool) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| contains(&item.uri))
    }

    /// Forget a removed icon.
    pub fn forget(&mut self, id: IconId) {
        if self.target_icon == Some(id) {
            self.target_icon = None;
        }
    }

    /// Free everything about the drag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
