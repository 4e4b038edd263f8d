//! Destination side of drag and drop: negotiation, highlighting, the drop
//! and its execution.

use super::{Container, ContainerEvent};
use crate::dnd::action::{
    self, DragAction, DragActions, DropQuery, default_action_for_netscape_url,
    default_action_for_uri_list,
};
use crate::dnd::autoscroll::{Autoscroll, in_margin};
use crate::dnd::target::DirectSaveReply;
use crate::host::{ContainerDelegate, DropContext};
use crate::icon::IconId;
use crate::timer::Instant;
use crate::wire::{self, DragTarget, SelectionListItem};
use kurbo::{Point, Rect, Vec2};

impl<D: ContainerDelegate> Container<D> {
    /// Icon highlighted as the drop target.
    pub fn drop_target_icon(&self) -> Option<IconId> {
        self.drop.target_icon
    }

    /// Outline of the icons being dragged over the container, in widget
    /// pixels.
    pub fn drop_shadow(&self) -> &[Rect] {
        &self.drop.shadow
    }

    /// The pointer moved over the container during a drag.
    pub fn drag_motion(&mut self, ctx: &mut impl DropContext, position: Point, now: Instant) {
        if !self.drop.got_data_type {
            self.negotiate(ctx);
        }
        self.drop.update_shadow(position);
        self.update_drop_target(ctx.is_self_drag());

        if in_margin(position, self.viewport.size) {
            if self.autoscroll.is_none() {
                self.autoscroll = Some(Autoscroll::start(now));
            }
        } else {
            self.stop_autoscroll();
        }

        let action = self.drop_action(&*ctx);
        ctx.status(action);
    }

    /// The pointer left the container without dropping.
    pub fn drag_leave(&mut self) {
        self.stop_autoscroll();
        self.set_drop_target(None);
        if self.drop.drop_occurred {
            self.drop.shadow.clear();
        } else {
            self.drop.reset();
        }
    }

    /// The user dropped. Returns false if the drop was refused right away.
    pub fn drag_drop(&mut self, ctx: &mut impl DropContext, position: Point) -> bool {
        if !self.drop.mark_drop() {
            return false;
        }
        self.drop.pointer = position;
        if !self.drop.got_data_type {
            self.negotiate(ctx);
        }
        let Some(data_type) = self.drop.data_type else {
            log::debug!("Drop with no supported target");
            self.finish_drop(ctx, false);
            return false;
        };
        log::debug!("Drop of {:?} at {:?}", data_type, position);

        match data_type {
            DragTarget::RootWindowDrop => {
                self.finish_drop(ctx, false);
            }
            DragTarget::DirectSave => {
                let uri = self.direct_save_uri(&*ctx);
                let Some(uri) = uri else {
                    log::warn!("Direct save drop without a file name or target");
                    self.finish_drop(ctx, false);
                    return false;
                };
                ctx.set_direct_save_uri(&uri);
                self.drop.direct_save_uri = Some(uri);
                self.drop.waiting_for_data = true;
                ctx.request_data(DragTarget::DirectSave);
            }
            _ if self.drop.has_data() => self.execute_drop(ctx),
            _ => {
                if !self.drop.waiting_for_data {
                    self.drop.waiting_for_data = true;
                    ctx.request_data(data_type);
                }
            }
        }
        true
    }

    /// Data requested from the source arrived.
    pub fn drag_data_received(&mut self, ctx: &mut impl DropContext, data: &[u8]) {
        if self.drop.data_type == Some(DragTarget::DirectSave) && self.drop.drop_occurred {
            self.drop.waiting_for_data = false;
            match DirectSaveReply::parse(data) {
                DirectSaveReply::Success => self.finish_drop(ctx, true),
                DirectSaveReply::Fallback => {
                    log::debug!("Direct save fell back to raw data");
                    self.drop.data_type = Some(DragTarget::Raw);
                    self.drop.waiting_for_data = true;
                    ctx.request_data(DragTarget::Raw);
                }
                DirectSaveReply::Error => {
                    log::warn!("Direct save source reported an error");
                    self.finish_drop(ctx, false);
                }
            }
            return;
        }

        self.drop.receive_data(data);
        if self.drop.drop_occurred {
            self.execute_drop(ctx);
        } else {
            // Knowing the items changes the shadow, the target and the action.
            let pointer = self.drop.pointer;
            self.drop.update_shadow(pointer);
            self.update_drop_target(ctx.is_self_drag());
            let action = self.drop_action(&*ctx);
            ctx.status(action);
        }
    }

    fn negotiate(&mut self, ctx: &mut impl DropContext) {
        let Some(target) = DragTarget::negotiate(&ctx.targets(), self.is_desktop) else {
            return;
        };
        log::debug!("Negotiated drop target {:?}", target);
        if self.drop.set_data_type(target) {
            ctx.request_data(target);
        }
    }

    /// Uris being dragged, when the data says.
    fn dragged_uris(&self) -> Vec<String> {
        match (self.drop.data_type, self.drop.data.as_deref()) {
            (Some(DragTarget::IconList), _) => {
                self.drop.items.iter().map(|item| item.uri.clone()).collect()
            }
            (Some(DragTarget::UriList), Some(data)) => wire::parse_uri_list(data),
            _ => Vec::new(),
        }
    }

    fn update_drop_target(&mut self, self_drag: bool) {
        let point = self.viewport.widget_to_canvas(self.drop.pointer);
        let target = self.find_drop_target(point, self_drag);
        self.set_drop_target(target);
    }

    /// The icon under a canvas point that accepts every dragged item. Icons
    /// of the selection being dragged are never targets.
    fn find_drop_target(&self, point: Point, self_drag: bool) -> Option<IconId> {
        let id = self.canvas.icon_at_point(point, self.label_position)?;
        let icon = self.canvas.get(id)?;
        if self_drag && icon.selected {
            return None;
        }
        self.delegate.get_icon_drop_target_uri(&icon.data)?;
        let accepts = self.dragged_uris().iter().all(|uri| {
            uri != icon.uri() && self.delegate.can_accept_item(&icon.data, uri)
        });
        accepts.then_some(id)
    }

    fn set_drop_target(&mut self, target: Option<IconId>) {
        if self.drop.target_icon != target {
            self.drop.target_icon = target;
            self.events.push(ContainerEvent::DropTargetChanged(target));
        }
    }

    /// Uri the drop lands in: the target icon's, else the container's.
    fn drop_target_uri(&self) -> Option<String> {
        match self.drop.target_icon.and_then(|id| self.canvas.get(id)) {
            Some(icon) => self.delegate.get_icon_drop_target_uri(&icon.data),
            None if self.delegate.can_accept_files() => self.delegate.container_uri(),
            None => None,
        }
    }

    /// The desktop view stands for the real desktop directory.
    fn rewrite_desktop_uri(&self, uri: String) -> String {
        if self.delegate.is_desktop_directory(&uri) {
            self.delegate.desktop_directory_uri().unwrap_or(uri)
        } else {
            uri
        }
    }

    /// Action a drop would perform now. `None` refuses it.
    fn drop_action(&self, ctx: &impl DropContext) -> Option<DragAction> {
        let data_type = self.drop.data_type?;
        let actions = ctx.actions();
        let suggested = ctx.suggested_action();
        if data_type == DragTarget::RootWindowDrop {
            return Some(suggested);
        }
        let target = self.drop_target_uri()?;
        match data_type {
            DragTarget::IconList => {
                if !self.drop.has_data() {
                    return None;
                }
                let query = DropQuery {
                    actions,
                    suggested,
                    target_uri: Some(&target),
                    items: &self.drop.items,
                };
                action::resolve(&query, &self.delegate)
            }
            DragTarget::UriList => Some(default_action_for_uri_list(
                actions,
                suggested,
                &target,
                &self.delegate,
            )),
            DragTarget::NetscapeUrl => Some(default_action_for_netscape_url(actions, suggested)),
            _ => Some(DragAction::Copy),
        }
    }

    fn direct_save_uri(&self, ctx: &impl DropContext) -> Option<String> {
        let filename = ctx.direct_save_filename().filter(|name| !name.is_empty())?;
        let directory = self.rewrite_desktop_uri(self.drop_target_uri()?);
        Some(format!("{}/{}", directory.trim_end_matches('/'), filename))
    }

    /// Action chosen for the drop, asking the delegate for ask drops.
    fn chosen_action(
        &mut self,
        ctx: &impl DropContext,
        allowed: DragActions,
        point: Point,
    ) -> Option<DragAction> {
        match ctx.selected_action() {
            DragAction::Ask => self.delegate.ask_drop_action(allowed, point),
            action => Some(action),
        }
    }

    fn execute_drop(&mut self, ctx: &mut impl DropContext) {
        let point = self.viewport.widget_to_canvas(self.drop.pointer);
        let success = match self.drop.data_type {
            Some(DragTarget::IconList) => self.drop_icon_list(&*ctx, point),
            Some(data_type) => self.drop_data(&*ctx, data_type, point),
            None => false,
        };
        self.finish_drop(ctx, success);
    }

    fn drop_icon_list(&mut self, ctx: &impl DropContext, point: Point) -> bool {
        let all_ours = self
            .drop
            .items_are_local(|uri| self.canvas.icon_by_uri(uri).is_some());
        let items = std::mem::take(&mut self.drop.items);
        if items.is_empty() {
            return false;
        }
        let Some(target_uri) = self.drop_target_uri() else {
            return false;
        };

        let allowed = if items.iter().any(|item| self.delegate.is_launcher(&item.uri)) {
            DragActions::MOVE
        } else {
            DragActions::MOVE | DragActions::COPY | DragActions::LINK
        };
        let Some(action) = self.chosen_action(ctx, allowed, point) else {
            return false;
        };

        let on_background = self.drop.target_icon.is_none();
        let local = on_background && action == DragAction::Move && all_ours;
        if local {
            if !self.auto_layout {
                self.move_dropped_icons(&items, point);
            }
            return true;
        }

        let positions = items
            .iter()
            .map(|item| on_background.then(|| self.dropped_item_position(item, point)).flatten())
            .collect();
        let target_uri = self.rewrite_desktop_uri(target_uri);
        self.events.push(ContainerEvent::MoveCopyItems {
            uris: items.into_iter().map(|item| item.uri).collect(),
            positions,
            target_uri,
            action,
            point,
        });
        true
    }

    /// Where a dropped item lands, as a left-to-right canvas position.
    fn dropped_item_position(&self, item: &SelectionListItem, point: Point) -> Option<Point> {
        let rect = item.rect?;
        let ppu = self.viewport.pixels_per_unit();
        let origin = point + Vec2::new(f64::from(rect.x) / ppu, f64::from(rect.y) / ppu);
        let width = f64::from(rect.width) / ppu;
        Some(Point::new(
            crate::layout::ltr_x(&self.layout_params(), origin.x, width),
            origin.y,
        ))
    }

    /// Move icons dragged within the container to where they were dropped.
    fn move_dropped_icons(&mut self, items: &[SelectionListItem], point: Point) {
        let ppu = self.viewport.pixels_per_unit();
        let snap = self.keep_aligned;
        let mut moved = Vec::new();
        for item in items {
            let (Some(id), Some(rect)) = (self.canvas.icon_by_uri(&item.uri), item.rect) else {
                continue;
            };
            let Some(scale) = self.canvas.get(id).map(|icon| icon.scale) else {
                continue;
            };
            let position = point + Vec2::new(f64::from(rect.x) / ppu, f64::from(rect.y) / ppu);
            if self.move_icon(id, position, scale, true, snap, true).is_ok() {
                moved.push(id);
            }
        }
        log::debug!("Moved {} dropped icons", moved.len());
        self.set_selection(&moved);
        self.events.push(ContainerEvent::LayoutChanged);
    }

    fn drop_data(&mut self, ctx: &impl DropContext, data_type: DragTarget, point: Point) -> bool {
        let Some(data) = self.drop.data.take() else {
            return false;
        };
        let Some(target_uri) = self
            .drop_target_uri()
            .map(|uri| self.rewrite_desktop_uri(uri))
        else {
            return false;
        };
        let allowed = DragActions::MOVE | DragActions::COPY | DragActions::LINK;
        let Some(action) = self.chosen_action(ctx, allowed, point) else {
            return false;
        };

        let event = match data_type {
            DragTarget::UriList => {
                let uris = wire::parse_uri_list(&data);
                if uris.is_empty() {
                    return false;
                }
                ContainerEvent::HandleUriList { uris, target_uri, action, point }
            }
            DragTarget::NetscapeUrl => {
                let text = String::from_utf8_lossy(&data);
                let first_line = text.lines().next().map(str::trim);
                let Some(url) = first_line.filter(|url| !url.is_empty()) else {
                    return false;
                };
                ContainerEvent::HandleNetscapeUrl {
                    url: url.to_string(),
                    target_uri,
                    action,
                    point,
                }
            }
            DragTarget::Text => ContainerEvent::HandleText {
                text: String::from_utf8_lossy(&data).into_owned(),
                target_uri,
                action,
                point,
            },
            DragTarget::Raw => ContainerEvent::HandleRaw {
                data,
                target_uri,
                direct_save_uri: self.drop.direct_save_uri.clone(),
                action,
                point,
            },
            DragTarget::IconList | DragTarget::DirectSave | DragTarget::RootWindowDrop => {
                return false;
            }
        };
        self.events.push(event);
        true
    }

    /// Report the outcome and free everything about the drag.
    fn finish_drop(&mut self, ctx: &mut impl DropContext, success: bool) {
        log::debug!("Drop finished, success: {}", success);
        ctx.finish(success);
        self.stop_autoscroll();
        self.set_drop_target(None);
        self.drop.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{MockDrop, TestDelegate, container, populated};
    use super::*;
    use crate::dnd::autoscroll::AUTOSCROLL_INITIAL_DELAY;
    use crate::config::ContainerConfig;
    use crate::icon::{IconData, LabelPosition};
    use crate::layout::LayoutMode;
    use crate::timer::Duration;
    use crate::wire::ItemRect;

    fn center(container: &Container<TestDelegate>, id: IconId) -> Point {
        let rect = container.icon(id).unwrap().image_rect(LabelPosition::Under);
        container.viewport().canvas_to_widget(rect.center())
    }

    fn manual() -> ContainerConfig {
        ContainerConfig {
            auto_layout: false,
            ..ContainerConfig::default()
        }
    }

    const BACKGROUND: Point = Point::new(500.0, 400.0);

    fn icon_list(items: &[SelectionListItem]) -> Vec<u8> {
        wire::encode(items)
    }

    #[test]
    fn test_icon_list_is_requested_once() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::UriList, DragTarget::IconList]);
        let now = Instant::now();
        container.drag_motion(&mut ctx, BACKGROUND, now);
        container.drag_motion(&mut ctx, BACKGROUND, now);
        assert_eq!(ctx.requested, vec![DragTarget::IconList]);
        // No action until the items are known.
        assert_eq!(ctx.statuses, vec![None, None]);

        // Another filesystem: copy.
        let data = icon_list(&[SelectionListItem::new("sftp://host/photo.jpg")]);
        container.drag_data_received(&mut ctx, &data);
        assert_eq!(ctx.statuses.last(), Some(&Some(DragAction::Copy)));

        let data = icon_list(&[SelectionListItem::new("file:///home/other/photo.jpg")]);
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        container.drag_leave();
        container.drag_motion(&mut ctx, BACKGROUND, now);
        container.drag_data_received(&mut ctx, &data);
        // Same filesystem and deletable: move.
        assert_eq!(ctx.statuses.last(), Some(&Some(DragAction::Move)));
    }

    #[test]
    fn test_unsupported_drag_is_refused() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[]);
        ctx.targets = vec!["image/png".to_string()];
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        assert_eq!(ctx.statuses, vec![None]);
        assert!(!container.drag_drop(&mut ctx, BACKGROUND));
        assert_eq!(ctx.finished, vec![false]);
    }

    #[test]
    fn test_uri_list_drop_on_folder() {
        let (mut container, ids) = populated(ContainerConfig::default(), &["folder", "notes.txt"]);
        let mut ctx = MockDrop::offering(&[DragTarget::UriList]);
        let at = center(&container, ids[0]);
        let now = Instant::now();
        container.drag_motion(&mut ctx, at, now);
        container.drag_data_received(&mut ctx, b"file:///tmp/a.txt\r\nfile:///tmp/b.txt\r\n");
        assert_eq!(container.drop_target_icon(), Some(ids[0]));
        assert_eq!(ctx.statuses.last(), Some(&Some(DragAction::Copy)));

        assert!(container.drag_drop(&mut ctx, at));
        assert_eq!(ctx.finished, vec![true]);
        assert_eq!(container.drop_target_icon(), None);
        let events = container.take_events();
        assert_eq!(
            events,
            vec![
                ContainerEvent::DropTargetChanged(Some(ids[0])),
                ContainerEvent::HandleUriList {
                    uris: vec!["file:///tmp/a.txt".to_string(), "file:///tmp/b.txt".to_string()],
                    target_uri: "file:///home/user/folder".to_string(),
                    action: DragAction::Copy,
                    point: container.viewport().widget_to_canvas(at),
                },
                ContainerEvent::DropTargetChanged(None),
            ]
        );
    }

    #[test]
    fn test_icons_refusing_items_are_not_targets() {
        let (mut container, ids) = populated(ContainerConfig::default(), &["folder", "locked"]);
        container.delegate_mut().refuse.push("file:///home/user/locked".to_string());
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        let now = Instant::now();
        let at = center(&container, ids[1]);
        container.drag_motion(&mut ctx, at, now);
        let data = icon_list(&[SelectionListItem::new("file:///tmp/x")]);
        container.drag_data_received(&mut ctx, &data);
        assert_eq!(container.drop_target_icon(), None);

        // A folder cannot take itself.
        let at = center(&container, ids[0]);
        container.drag_leave();
        container.drag_motion(&mut ctx, at, now);
        let data = icon_list(&[SelectionListItem::new("file:///home/user/folder")]);
        container.drag_data_received(&mut ctx, &data);
        assert_eq!(container.drop_target_icon(), None);
    }

    #[test]
    fn test_selected_icons_are_not_targets_of_self_drag() {
        let (mut container, ids) = populated(ContainerConfig::default(), &["folder", "other"]);
        container.set_selection(&[ids[0]]);
        let mut ctx = MockDrop::offering(&[DragTarget::UriList]);
        ctx.self_drag = true;
        container.drag_motion(&mut ctx, center(&container, ids[0]), Instant::now());
        assert_eq!(container.drop_target_icon(), None);
        let at = center(&container, ids[1]);
        container.drag_motion(&mut ctx, at, Instant::now());
        assert_eq!(container.drop_target_icon(), Some(ids[1]));
    }

    #[test]
    fn test_local_move_in_manual_layout() {
        let mut container = container(manual());
        let a = container
            .add_at(IconData::from_uri("file:///home/user/a"), Point::new(100.0, 100.0), false)
            .unwrap();
        let b = container
            .add_at(IconData::from_uri("file:///home/user/b"), Point::new(300.0, 100.0), false)
            .unwrap();
        container.process_idle();
        container.set_selection(&[b]);
        container.take_events();

        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        ctx.self_drag = true;
        ctx.suggested = DragAction::Move;
        let data = icon_list(&[SelectionListItem::with_rect(
            "file:///home/user/a",
            ItemRect::new(-10, -20, 64, 70),
        )]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(&mut ctx, &data);
        assert_eq!(ctx.statuses.last(), Some(&Some(DragAction::Move)));
        assert!(container.drag_drop(&mut ctx, BACKGROUND));

        assert_eq!(ctx.finished, vec![true]);
        assert_eq!(container.icon(a).unwrap().origin(), Point::new(490.0, 380.0));
        assert_eq!(container.selection(), vec![a]);
        let events = container.take_events();
        assert!(events.contains(&ContainerEvent::LayoutChanged));
        assert!(!events.iter().any(|event| matches!(event, ContainerEvent::MoveCopyItems { .. })));
        // Drag data is gone after a self drop.
        assert!(container.drop_shadow().is_empty());
        assert_eq!(container.drop_target_icon(), None);
    }

    #[test]
    fn test_move_with_foreign_items_is_not_local() {
        let mut container = container(manual());
        let a = container
            .add_at(IconData::from_uri("file:///home/user/a"), Point::new(100.0, 100.0), false)
            .unwrap();
        container.process_idle();
        container.take_events();

        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        ctx.suggested = DragAction::Move;
        let data = icon_list(&[
            SelectionListItem::with_rect("file:///home/user/a", ItemRect::new(0, 0, 64, 70)),
            SelectionListItem::with_rect("file:///home/other/z", ItemRect::new(80, 0, 64, 70)),
        ]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(&mut ctx, &data);
        assert!(container.drag_drop(&mut ctx, BACKGROUND));

        assert_eq!(ctx.finished, vec![true]);
        assert_eq!(container.icon(a).unwrap().origin(), Point::new(100.0, 100.0));
        let events = container.take_events();
        let Some(ContainerEvent::MoveCopyItems { uris, action, .. }) = events.last() else {
            panic!("expected move/copy, got {events:?}");
        };
        assert_eq!(uris.len(), 2);
        assert_eq!(*action, DragAction::Move);
    }

    #[test]
    fn test_local_move_in_auto_layout_keeps_positions() {
        let (mut container, ids) = populated(ContainerConfig::default(), &["a", "b"]);
        let origin = container.icon(ids[0]).unwrap().origin();
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        ctx.self_drag = true;
        ctx.suggested = DragAction::Move;
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(
            &mut ctx,
            &icon_list(&[SelectionListItem::with_rect(
                "file:///home/user/a",
                ItemRect::new(0, 0, 64, 70),
            )]),
        );
        container.drag_drop(&mut ctx, BACKGROUND);
        assert_eq!(ctx.finished, vec![true]);
        assert_eq!(container.icon(ids[0]).unwrap().origin(), origin);
    }

    #[test]
    fn test_external_drop_emits_move_copy_with_positions() {
        let (mut container, _) = populated(
            ContainerConfig {
                layout_mode: LayoutMode::RightLeftTopBottom,
                ..ContainerConfig::default()
            },
            &["a"],
        );
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        let data = icon_list(&[
            SelectionListItem::with_rect("file:///mnt/usb/x", ItemRect::new(-10, -20, 64, 70)),
            SelectionListItem::new("file:///mnt/usb/y"),
        ]);
        let at = Point::new(100.0, 400.0);
        container.drag_motion(&mut ctx, at, Instant::now());
        container.drag_data_received(&mut ctx, &data);
        container.drag_drop(&mut ctx, at);

        let events = container.take_events();
        let Some(ContainerEvent::MoveCopyItems {
            uris,
            positions,
            target_uri,
            action,
            point,
        }) = events.last()
        else {
            panic!("expected move/copy, got {events:?}");
        };
        assert_eq!(uris, &vec!["file:///mnt/usb/x".to_string(), "file:///mnt/usb/y".to_string()]);
        assert_eq!(target_uri, "file:///home/user");
        assert_eq!(*action, DragAction::Copy);
        assert_eq!(*point, at);
        // Mirrored: 800 - 90 - 64.
        assert_eq!(positions, &vec![Some(Point::new(646.0, 380.0)), None]);
    }

    #[test]
    fn test_drop_on_icon_has_no_positions() {
        let (mut container, ids) = populated(ContainerConfig::default(), &["folder"]);
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        let at = center(&container, ids[0]);
        container.drag_motion(&mut ctx, at, Instant::now());
        container.drag_data_received(
            &mut ctx,
            &icon_list(&[SelectionListItem::with_rect(
                "file:///mnt/usb/x",
                ItemRect::new(0, 0, 10, 10),
            )]),
        );
        container.drag_drop(&mut ctx, at);
        let events = container.take_events();
        assert!(events.iter().any(|event| matches!(
            event,
            ContainerEvent::MoveCopyItems { positions, target_uri, .. }
                if positions == &vec![None] && target_uri == "file:///home/user/folder"
        )));
    }

    #[test]
    fn test_ask_drop_uses_delegate_answer() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let data = icon_list(&[SelectionListItem::new("file:///mnt/usb/x")]);

        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        ctx.selected = Some(DragAction::Ask);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(&mut ctx, &data);
        container.drag_drop(&mut ctx, BACKGROUND);
        assert_eq!(ctx.finished, vec![false]);

        container.delegate_mut().ask_answer = Some(DragAction::Link);
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        ctx.selected = Some(DragAction::Ask);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(&mut ctx, &data);
        container.drag_drop(&mut ctx, BACKGROUND);
        assert_eq!(ctx.finished, vec![true]);
        assert!(container.take_events().iter().any(|event| matches!(
            event,
            ContainerEvent::MoveCopyItems { action: DragAction::Link, .. }
        )));
    }

    #[test]
    fn test_drop_before_data_waits_for_it() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::Text]);
        assert!(container.drag_drop(&mut ctx, BACKGROUND));
        assert_eq!(ctx.requested, vec![DragTarget::Text]);
        assert!(ctx.finished.is_empty());
        container.drag_data_received(&mut ctx, b"hello");
        assert_eq!(ctx.finished, vec![true]);
        assert!(container.take_events().iter().any(|event| matches!(
            event,
            ContainerEvent::HandleText { text, action: DragAction::Copy, .. } if text == "hello"
        )));
    }

    #[test]
    fn test_netscape_url_drop() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::NetscapeUrl]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(&mut ctx, b"https://example.org/\nExample");
        assert_eq!(ctx.statuses.last(), Some(&Some(DragAction::Link)));
        container.drag_drop(&mut ctx, BACKGROUND);
        assert!(container.take_events().iter().any(|event| matches!(
            event,
            ContainerEvent::HandleNetscapeUrl { url, .. } if url == "https://example.org/"
        )));
    }

    #[test]
    fn test_direct_save() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::DirectSave]);
        ctx.filename = Some("report.pdf".to_string());
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        assert!(ctx.requested.is_empty());
        assert_eq!(ctx.statuses, vec![Some(DragAction::Copy)]);

        assert!(container.drag_drop(&mut ctx, BACKGROUND));
        assert_eq!(ctx.direct_save_uri.as_deref(), Some("file:///home/user/report.pdf"));
        assert_eq!(ctx.requested, vec![DragTarget::DirectSave]);
        container.drag_data_received(&mut ctx, b"S");
        assert_eq!(ctx.finished, vec![true]);
    }

    #[test]
    fn test_direct_save_falls_back_to_raw() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::DirectSave]);
        ctx.filename = Some("report.pdf".to_string());
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_drop(&mut ctx, BACKGROUND);
        container.drag_data_received(&mut ctx, b"F");
        assert_eq!(ctx.requested, vec![DragTarget::DirectSave, DragTarget::Raw]);
        assert!(ctx.finished.is_empty());

        container.drag_data_received(&mut ctx, b"%PDF");
        assert_eq!(ctx.finished, vec![true]);
        let events = container.take_events();
        assert!(events.iter().any(|event| matches!(
            event,
            ContainerEvent::HandleRaw { data, direct_save_uri: Some(uri), .. }
                if data == b"%PDF" && uri == "file:///home/user/report.pdf"
        )));
    }

    #[test]
    fn test_direct_save_without_filename_fails() {
        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::DirectSave]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        assert!(!container.drag_drop(&mut ctx, BACKGROUND));
        assert_eq!(ctx.finished, vec![false]);
    }

    #[test]
    fn test_root_window_drop_only_on_desktop() {
        let mut container = container(ContainerConfig::desktop());
        let mut ctx = MockDrop::offering(&[DragTarget::RootWindowDrop]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        assert_eq!(ctx.statuses, vec![Some(DragAction::Copy)]);
        assert!(container.drag_drop(&mut ctx, BACKGROUND));
        assert_eq!(ctx.finished, vec![false]);

        let (mut container, _) = populated(ContainerConfig::default(), &["a"]);
        let mut ctx = MockDrop::offering(&[DragTarget::RootWindowDrop]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        assert_eq!(ctx.statuses, vec![None]);
    }

    #[test]
    fn test_desktop_target_is_rewritten() {
        let mut container = container(ContainerConfig::desktop());
        container.delegate_mut().uri = "x-nautilus-desktop:///".to_string();
        let mut ctx = MockDrop::offering(&[DragTarget::UriList]);
        container.drag_motion(&mut ctx, BACKGROUND, Instant::now());
        container.drag_data_received(&mut ctx, b"file:///tmp/a\r\n");
        container.drag_drop(&mut ctx, BACKGROUND);
        assert!(container.take_events().iter().any(|event| matches!(
            event,
            ContainerEvent::HandleUriList { target_uri, .. }
                if target_uri == "file:///home/user/Desktop"
        )));
    }

    #[test]
    fn test_leave_clears_drag_state() {
        let (mut container, ids) = populated(ContainerConfig::default(), &["folder"]);
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        let at = center(&container, ids[0]);
        container.drag_motion(&mut ctx, at, Instant::now());
        container.drag_data_received(
            &mut ctx,
            &icon_list(&[SelectionListItem::with_rect(
                "file:///tmp/x",
                ItemRect::new(0, 0, 10, 10),
            )]),
        );
        assert_eq!(container.drop_target_icon(), Some(ids[0]));
        assert_eq!(container.drop_shadow().len(), 1);

        container.drag_leave();
        assert_eq!(container.drop_target_icon(), None);
        assert!(container.drop_shadow().is_empty());
        assert_eq!(container.next_deadline(), None);

        // A new drag negotiates again.
        let mut ctx = MockDrop::offering(&[DragTarget::IconList]);
        container.drag_motion(&mut ctx, at, Instant::now());
        assert_eq!(ctx.requested, vec![DragTarget::IconList]);
    }

    #[test]
    fn test_autoscroll_near_edge() {
        let names: Vec<String> = (0..60).map(|i| format!("icon{i:02}")).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let (mut container, _) = populated(ContainerConfig::default(), &names);
        let mut ctx = MockDrop::offering(&[DragTarget::UriList]);
        let now = Instant::now();
        container.drag_motion(&mut ctx, Point::new(400.0, 595.0), now);
        assert!(container.next_deadline().is_some());

        // Nothing before the initial delay.
        container.process_timers(now + Duration::from_millis(50));
        assert_eq!(container.viewport().scroll, Vec2::ZERO);
        container.process_timers(now + AUTOSCROLL_INITIAL_DELAY);
        assert!(container.viewport().scroll.y > 0.0);

        container.drag_motion(&mut ctx, Point::new(400.0, 300.0), now);
        assert_eq!(container.next_deadline(), None);
    }
}
