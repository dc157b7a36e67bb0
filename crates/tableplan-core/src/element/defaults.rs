//! Per-type default geometry, metadata, and palette colors.

use super::style::{Color, ElementStyle};
use super::{ElementKind, ElementType};

/// Smallest width/height (or diameter) an element may have.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;

/// Offset applied to duplicated elements so the copy never exactly
/// overlaps the source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

impl ElementType {
    /// Default geometry and metadata for a freshly placed element.
    pub fn default_kind(self) -> ElementKind {
        match self {
            ElementType::RoundTable => ElementKind::RoundTable {
                radius: 60.0,
                seats: 8,
            },
            ElementType::RectTable => ElementKind::RectTable {
                width: 120.0,
                height: 60.0,
                seats: 6,
            },
            ElementType::Chair => ElementKind::Chair {
                width: 24.0,
                height: 24.0,
            },
            ElementType::Stage => ElementKind::Stage {
                width: 240.0,
                height: 120.0,
            },
            ElementType::Canopy => ElementKind::Canopy {
                width: 300.0,
                height: 300.0,
            },
            ElementType::Buffet => ElementKind::Buffet {
                width: 180.0,
                height: 50.0,
            },
            ElementType::DjBooth => ElementKind::DjBooth {
                width: 100.0,
                height: 80.0,
            },
            ElementType::DanceFloor => ElementKind::DanceFloor {
                width: 200.0,
                height: 200.0,
            },
            ElementType::Bar => ElementKind::Bar {
                width: 200.0,
                height: 60.0,
            },
            ElementType::Label => ElementKind::Label {
                text: "Text".to_string(),
                font_size: 18.0,
            },
        }
    }

    /// Default fill/stroke for a freshly placed element.
    pub fn default_style(self) -> ElementStyle {
        let (fill, stroke) = match self {
            ElementType::RoundTable | ElementType::RectTable => {
                (Color::rgb(0xde, 0xb8, 0x87), Color::rgb(0x8b, 0x5a, 0x2b))
            }
            ElementType::Chair => (Color::rgb(0xd3, 0xd3, 0xd3), Color::rgb(0x69, 0x69, 0x69)),
            ElementType::Stage => (Color::rgb(0x9b, 0x59, 0xb6), Color::rgb(0x6c, 0x34, 0x83)),
            ElementType::Canopy => (Color::rgb(0xff, 0xff, 0xff), Color::rgb(0x34, 0x98, 0xdb)),
            ElementType::Buffet => (Color::rgb(0xf3, 0x9c, 0x12), Color::rgb(0xb9, 0x77, 0x0e)),
            ElementType::DjBooth => (Color::rgb(0x2c, 0x3e, 0x50), Color::rgb(0x1a, 0x25, 0x30)),
            ElementType::DanceFloor => {
                (Color::rgb(0xf5, 0xe6, 0xc8), Color::rgb(0xc0, 0xa0, 0x62))
            }
            ElementType::Bar => (Color::rgb(0x7f, 0x45, 0x3a), Color::rgb(0x4e, 0x2a, 0x24)),
            ElementType::Label => (Color::new(0, 0, 0, 0), Color::black()),
        };
        ElementStyle {
            fill,
            stroke,
            label: String::new(),
        }
    }

    /// Human-readable name for palettes and captions.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::RoundTable => "Round table",
            ElementType::RectTable => "Rectangular table",
            ElementType::Chair => "Chair",
            ElementType::Stage => "Stage",
            ElementType::Canopy => "Canopy",
            ElementType::Buffet => "Buffet",
            ElementType::DjBooth => "DJ booth",
            ElementType::DanceFloor => "Dance floor",
            ElementType::Bar => "Bar",
            ElementType::Label => "Text label",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_all_types() {
        for ty in ElementType::ALL {
            let kind = ty.default_kind();
            assert_eq!(kind.element_type(), ty);
            assert!(!ty.name().is_empty());
        }
    }

    #[test]
    fn test_default_tables_have_seats() {
        assert_eq!(ElementType::RoundTable.default_kind().seats(), Some(8));
        assert_eq!(ElementType::RectTable.default_kind().seats(), Some(6));
        assert_eq!(ElementType::Stage.default_kind().seats(), None);
    }
}
