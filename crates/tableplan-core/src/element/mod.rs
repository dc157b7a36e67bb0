//! Element definitions for the floor plan.

mod defaults;
mod style;

pub use defaults::{DUPLICATE_OFFSET, MIN_ELEMENT_SIZE};
pub use style::{Color, ElementStyle};

use crate::snap::normalize_angle;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Closed set of placeable element types (the palette).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    RoundTable,
    RectTable,
    Chair,
    Stage,
    Canopy,
    Buffet,
    DjBooth,
    DanceFloor,
    Bar,
    Label,
}

impl ElementType {
    /// All placeable types, in palette order.
    pub const ALL: [ElementType; 10] = [
        ElementType::RoundTable,
        ElementType::RectTable,
        ElementType::Chair,
        ElementType::Stage,
        ElementType::Canopy,
        ElementType::Buffet,
        ElementType::DjBooth,
        ElementType::DanceFloor,
        ElementType::Bar,
        ElementType::Label,
    ];
}

/// Kind-specific geometry and metadata of an element.
///
/// Each variant carries only the fields relevant to its kind; dispatch is
/// exhaustive pattern matching, never string comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    RoundTable { radius: f64, seats: u32 },
    RectTable { width: f64, height: f64, seats: u32 },
    Chair { width: f64, height: f64 },
    Stage { width: f64, height: f64 },
    Canopy { width: f64, height: f64 },
    Buffet { width: f64, height: f64 },
    DjBooth { width: f64, height: f64 },
    DanceFloor { width: f64, height: f64 },
    Bar { width: f64, height: f64 },
    Label { text: String, font_size: f64 },
}

impl ElementKind {
    /// The palette type of this kind.
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::RoundTable { .. } => ElementType::RoundTable,
            ElementKind::RectTable { .. } => ElementType::RectTable,
            ElementKind::Chair { .. } => ElementType::Chair,
            ElementKind::Stage { .. } => ElementType::Stage,
            ElementKind::Canopy { .. } => ElementType::Canopy,
            ElementKind::Buffet { .. } => ElementType::Buffet,
            ElementKind::DanceFloor { .. } => ElementType::DanceFloor,
            ElementKind::DjBooth { .. } => ElementType::DjBooth,
            ElementKind::Bar { .. } => ElementType::Bar,
            ElementKind::Label { .. } => ElementType::Label,
        }
    }

    /// Seat capacity, for kinds that carry one.
    pub fn seats(&self) -> Option<u32> {
        match self {
            ElementKind::RoundTable { seats, .. } | ElementKind::RectTable { seats, .. } => {
                Some(*seats)
            }
            _ => None,
        }
    }

    /// Size of the unrotated bounding box.
    pub fn size(&self) -> Size {
        match self {
            ElementKind::RoundTable { radius, .. } => Size::new(radius * 2.0, radius * 2.0),
            ElementKind::RectTable { width, height, .. }
            | ElementKind::Chair { width, height }
            | ElementKind::Stage { width, height }
            | ElementKind::Canopy { width, height }
            | ElementKind::Buffet { width, height }
            | ElementKind::DjBooth { width, height }
            | ElementKind::DanceFloor { width, height }
            | ElementKind::Bar { width, height } => Size::new(*width, *height),
            ElementKind::Label { text, font_size } => label_extent(text, *font_size),
        }
    }

    /// Resize to a target bounding box, enforcing the minimum size.
    ///
    /// Round tables take the smaller axis as their diameter; labels scale
    /// their font with the requested height.
    pub fn set_size(&mut self, target: Size) {
        let w = target.width.max(MIN_ELEMENT_SIZE);
        let h = target.height.max(MIN_ELEMENT_SIZE);
        match self {
            ElementKind::RoundTable { radius, .. } => *radius = w.min(h) / 2.0,
            ElementKind::RectTable { width, height, .. }
            | ElementKind::Chair { width, height }
            | ElementKind::Stage { width, height }
            | ElementKind::Canopy { width, height }
            | ElementKind::Buffet { width, height }
            | ElementKind::DjBooth { width, height }
            | ElementKind::DanceFloor { width, height }
            | ElementKind::Bar { width, height } => {
                *width = w;
                *height = h;
            }
            ElementKind::Label { font_size, .. } => {
                *font_size = (h / LABEL_LINE_HEIGHT).max(MIN_FONT_SIZE);
            }
        }
    }

    /// Whether the footprint is circular rather than rectangular.
    pub fn is_round(&self) -> bool {
        matches!(self, ElementKind::RoundTable { .. })
    }
}

/// Line height multiplier for label text.
const LABEL_LINE_HEIGHT: f64 = 1.2;
/// Approximate glyph advance as a fraction of the font size.
const LABEL_CHAR_ADVANCE: f64 = 0.6;
/// Smallest readable label font.
const MIN_FONT_SIZE: f64 = 6.0;

/// Estimated extent of a text label.
///
/// There is no font shaping in the core; the estimate only has to be stable
/// and roughly proportional for hit testing and thumbnails.
fn label_extent(text: &str, font_size: f64) -> Size {
    let lines: Vec<&str> = text.lines().collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let width = (longest as f64 * font_size * LABEL_CHAR_ADVANCE).max(MIN_ELEMENT_SIZE);
    let height = (lines.len().max(1) as f64 * font_size * LABEL_LINE_HEIGHT).max(MIN_ELEMENT_SIZE);
    Size::new(width, height)
}

/// One placed furniture/decor object on the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Top-left corner of the unrotated bounding box, in scene units.
    pub position: Point,
    /// Rotation around the element center, degrees in [0, 360).
    #[serde(default)]
    pub rotation: f64,
    pub kind: ElementKind,
    pub style: ElementStyle,
}

impl Element {
    /// Create an element of the given type with its default geometry/style.
    pub fn new(element_type: ElementType, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0.0,
            kind: element_type.default_kind(),
            style: element_type.default_style(),
        }
    }

    /// The palette type of this element.
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Size of the unrotated bounding box.
    pub fn size(&self) -> Size {
        self.kind.size()
    }

    /// Unrotated bounding box in scene coordinates.
    pub fn bounds(&self) -> Rect {
        let size = self.size();
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + size.width,
            self.position.y + size.height,
        )
    }

    /// Center of the element.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Set the rotation, normalized into [0, 360).
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_angle(degrees);
    }

    /// Move the element by a delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Check if a scene point hits this element, honoring rotation.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.to_local(point);
        if self.kind.is_round() {
            let center = self.center();
            let radius = self.size().width / 2.0;
            let d2 = (local.x - center.x).powi(2) + (local.y - center.y).powi(2);
            d2 <= (radius + tolerance).powi(2)
        } else {
            self.bounds().inflate(tolerance, tolerance).contains(local)
        }
    }

    /// Rotate a scene point into the element's unrotated frame.
    fn to_local(&self, point: Point) -> Point {
        if self.rotation == 0.0 {
            return point;
        }
        let center = self.center();
        let angle = -self.rotation.to_radians();
        let (sin, cos) = angle.sin_cos();
        let dx = point.x - center.x;
        let dy = point.y - center.y;
        Point::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }

    /// Replace the id with a fresh one (used when duplicating).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}
