use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Representation {
    Color(&'static str),
    Image(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub representation: Representation,
}

const fn color(id: &'static str, name: &'static str, hex: &'static str) -> BackgroundPreset {
    BackgroundPreset {
        id,
        name,
        representation: Representation::Color(hex),
    }
}

const fn image(id: &'static str, name: &'static str, path: &'static str) -> BackgroundPreset {
    BackgroundPreset {
        id,
        name,
        representation: Representation::Image(path),
    }
}

pub const BACKGROUND_PRESETS: &[BackgroundPreset] = &[
    color("white", "White", "#FFFFFF"),
    color("black", "Black", "#000000"),
    color("gray", "Gray", "#808080"),
    image("beach", "Beach", "/backgrounds/beach.png"),
    image("city", "City", "/backgrounds/city.png"),
    image("studio", "Studio", "/backgrounds/studio.png"),
    image("nature", "Nature", "/backgrounds/nature.png"),
    image("abstract", "Abstract", "/backgrounds/abstract.png"),
    image("gradient_blue", "Gradient Blue", "/backgrounds/gradient_blue.png"),
    image("office", "Office", "/backgrounds/office.png"),
    image("park", "Park", "/backgrounds/park.png"),
    image("cafe", "Cafe", "/backgrounds/cafe.png"),
    image("library", "Library", "/backgrounds/library.png"),
    image("airport", "Airport", "/backgrounds/airport.png"),
    image("mountain", "Mountain", "/backgrounds/mountain.png"),
    image("sky", "Sky", "/backgrounds/sky.png"),
];

pub fn find_background(id: &str) -> Option<&'static BackgroundPreset> {
    BACKGROUND_PRESETS.iter().find(|preset| preset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = BACKGROUND_PRESETS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), BACKGROUND_PRESETS.len());
        assert_eq!(BACKGROUND_PRESETS.len(), 16);
    }

    #[test]
    fn test_find_background() {
        let beach = find_background("beach").unwrap();
        assert_eq!(beach.name, "Beach");
        assert_eq!(
            beach.representation,
            Representation::Image("/backgrounds/beach.png")
        );
        assert!(find_background("Model walking on a sunny beach").is_none());
    }

    #[test]
    fn test_representation_serializes_tagged() {
        let value = serde_json::to_value(find_background("white").unwrap()).unwrap();
        assert_eq!(
            value["representation"],
            serde_json::json!({"type": "color", "value": "#FFFFFF"})
        );
    }
}
