//! Selection formats exchanged with other windows during drag and drop.
//!
//! The icon list format carries one item per line:
//!
//! ```text
//! <uri>\r<x>:<y>:<w>:<h>\r\n
//! ```
//!
//! where the geometry is relative to the pointer hotspot and may be omitted
//! (`<uri>\r\n`). Decoding never reads past the end of the buffer and keeps
//! every item parsed before the first malformed line terminator.

use serde::{Deserialize, Serialize};

/// Icon rectangle relative to the drag hotspot, in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ItemRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// One dragged item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionListItem {
    pub uri: String,
    /// Geometry of the icon at drag time, if the source supplied one.
    pub rect: Option<ItemRect>,
}

impl SelectionListItem {
    /// Create an item without geometry.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            rect: None,
        }
    }

    /// Create an item carrying its icon geometry.
    pub fn with_rect(uri: impl Into<String>, rect: ItemRect) -> Self {
        Self {
            uri: uri.into(),
            rect: Some(rect),
        }
    }

    /// Whether the source sent a position for this item.
    pub fn got_position(&self) -> bool {
        self.rect.is_some()
    }
}

/// Serialize items in the icon list format.
pub fn encode(items: &[SelectionListItem]) -> Vec<u8> {
    let mut out = Vec::new();
    for item in items {
        out.extend_from_slice(item.uri.as_bytes());
        out.push(b'\r');
        if let Some(rect) = item.rect {
            let geometry = format!("{}:{}:{}:{}", rect.x, rect.y, rect.width, rect.height);
            out.extend_from_slice(geometry.as_bytes());
            out.push(b'\r');
        }
        out.push(b'\n');
    }
    out
}

/// Parse an icon list payload.
pub fn decode(data: &[u8]) -> Vec<SelectionListItem> {
    let mut items = Vec::new();
    let mut rest = data;

    while !rest.is_empty() {
        let Some(cr) = rest.iter().position(|&b| b == b'\r') else {
            break;
        };
        let uri = String::from_utf8_lossy(&rest[..cr]).into_owned();
        rest = &rest[cr + 1..];

        match rest.first() {
            None => {
                items.push(SelectionListItem::new(uri));
                break;
            }
            Some(b'\n') => {
                items.push(SelectionListItem::new(uri));
                rest = &rest[1..];
                continue;
            }
            Some(_) => {}
        }

        let line_end = rest.iter().position(|&b| b == b'\r');
        let field = &rest[..line_end.unwrap_or(rest.len())];
        let rect = parse_geometry(field);
        if rect.is_none() {
            log::warn!(
                "Invalid icon geometry {:?} for {uri}",
                String::from_utf8_lossy(field)
            );
        }
        items.push(SelectionListItem { uri, rect });

        match line_end {
            Some(end) if rest.get(end + 1) == Some(&b'\n') => rest = &rest[end + 2..],
            _ => {
                log::warn!("Icon list line is not terminated by CRLF, ignoring the rest");
                break;
            }
        }
    }

    items
}

/// Parse `%d:%d:%d:%d`, ignoring anything after the fourth number.
fn parse_geometry(field: &[u8]) -> Option<ItemRect> {
    let mut pos = 0;
    let mut values = [0i32; 4];
    for (i, value) in values.iter_mut().enumerate() {
        if i > 0 {
            if field.get(pos) != Some(&b':') {
                return None;
            }
            pos += 1;
        }
        let (parsed, consumed) = scan_int(&field[pos..])?;
        *value = parsed;
        pos += consumed;
    }
    Some(ItemRect::new(values[0], values[1], values[2], values[3]))
}

/// Scan one decimal integer with optional leading whitespace and sign.
fn scan_int(input: &[u8]) -> Option<(i32, usize)> {
    let mut pos = input
        .iter()
        .take_while(|b| b.is_ascii_whitespace())
        .count();
    let negative = match input.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };
    let digits = input[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let mut value: i64 = 0;
    for &b in &input[pos..pos + digits] {
        value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
        if value > i64::from(i32::MAX) + 1 {
            return None;
        }
    }
    if negative {
        value = -value;
    }
    let value = i32::try_from(value).ok()?;
    Some((value, pos + digits))
}

/// Serialize uris as `text/uri-list`.
pub fn encode_uri_list<S: AsRef<str>>(uris: &[S]) -> Vec<u8> {
    let mut out = Vec::new();
    for uri in uris {
        out.extend_from_slice(uri.as_ref().as_bytes());
        out.extend_from_slice(b"\r\n");
    }
    out
}

/// Parse a `text/uri-list` payload, skipping blank and comment lines.
pub fn parse_uri_list(data: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(data)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Render uris as plain text, one per line, local files as paths.
pub fn encode_text<S: AsRef<str>>(uris: &[S]) -> String {
    uris.iter()
        .map(|uri| display_path(uri.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(not(target_arch = "wasm32"))]
fn display_path(uri: &str) -> String {
    url::Url::parse(uri)
        .ok()
        .filter(|parsed| parsed.scheme() == "file")
        .and_then(|parsed| parsed.to_file_path().ok())
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| uri.to_string())
}

#[cfg(target_arch = "wasm32")]
fn display_path(uri: &str) -> String {
    uri.to_string()
}

/// Selection targets a container offers as a drag source or accepts as a
/// drop destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DragTarget {
    /// The icon list format above.
    IconList,
    UriList,
    NetscapeUrl,
    Text,
    /// Direct save: the destination names the file, the source writes it.
    DirectSave,
    Raw,
    /// Drop onto the root window; only meaningful on a desktop.
    RootWindowDrop,
}

impl DragTarget {
    /// Targets offered when dragging icons out of a container.
    pub const SOURCE_TARGETS: [DragTarget; 3] =
        [DragTarget::IconList, DragTarget::UriList, DragTarget::Text];

    /// Targets accepted on drop, in order of preference.
    pub const DROP_TARGETS: [DragTarget; 7] = [
        DragTarget::IconList,
        DragTarget::UriList,
        DragTarget::NetscapeUrl,
        DragTarget::Text,
        DragTarget::DirectSave,
        DragTarget::Raw,
        DragTarget::RootWindowDrop,
    ];

    /// The selection MIME type.
    pub const fn mime_type(self) -> &'static str {
        match self {
            DragTarget::IconList => "x-special/gnome-icon-list",
            DragTarget::UriList => "text/uri-list",
            DragTarget::NetscapeUrl => "_NETSCAPE_URL",
            DragTarget::Text => "text/plain",
            DragTarget::DirectSave => "XdndDirectSave0",
            DragTarget::Raw => "application/octet-stream",
            DragTarget::RootWindowDrop => "application/x-rootwindow-drop",
        }
    }

    /// Look up a target by MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "x-special/mate-icon-list" => Some(DragTarget::IconList),
            "text/plain;charset=utf-8" | "UTF8_STRING" | "STRING" => Some(DragTarget::Text),
            _ => Self::DROP_TARGETS
                .into_iter()
                .find(|target| target.mime_type() == mime),
        }
    }

    /// Whether data for this target is fetched during motion. Direct save and
    /// root window drops have side effects on the source and wait for the drop.
    pub fn prefetch(self) -> bool {
        !matches!(self, DragTarget::DirectSave | DragTarget::RootWindowDrop)
    }

    /// Pick the preferred drop target among those offered by the source.
    pub fn negotiate<S: AsRef<str>>(offered: &[S], is_desktop: bool) -> Option<Self> {
        let offered: Vec<DragTarget> = offered
            .iter()
            .filter_map(|mime| Self::from_mime_type(mime.as_ref()))
            .collect();
        Self::DROP_TARGETS.into_iter().find(|target| {
            offered.contains(target) && (is_desktop || *target != DragTarget::RootWindowDrop)
        })
    }
}
