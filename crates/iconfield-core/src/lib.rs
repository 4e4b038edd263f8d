//! Iconfield Core Library
//!
//! Platform-agnostic layout, selection and drag-and-drop logic for a field of
//! file icons.

pub mod canvas;
pub mod config;
pub mod container;
pub mod dnd;
pub mod error;
pub mod host;
pub mod icon;
pub mod input;
pub mod layout;
pub mod navigation;
pub mod selection;
pub mod timer;
pub mod viewport;
pub mod wire;

pub use canvas::IconCanvas;
pub use config::ContainerConfig;
pub use container::{Container, ContainerEvent, StoredPosition};
pub use dnd::{DragAction, DragActions};
pub use error::{ConfigError, ConfigResult, ContainerError, ContainerResult};
pub use host::{ContainerDelegate, DragSource, DropContext, FileClassifier, UriClassifier};
pub use icon::{Icon, IconData, IconId, IconMetrics, LabelPosition};
pub use input::{Key, Modifiers, MouseButton, PointerEvent};
pub use layout::LayoutMode;
pub use selection::SelectionModel;
pub use viewport::{Viewport, ZoomLevel};
pub use wire::{DragTarget, SelectionListItem};
