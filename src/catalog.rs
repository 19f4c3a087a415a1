//! Seed catalogs for the world model.
//!
//! A [`Catalog`] lists every location of the environment, the items that
//! start there, and where the robot starts. The built-in [`Catalog::home`]
//! describes a furnished apartment; other catalogs can be loaded from JSON
//! or TOML files.
//!
//! ```toml
//! start_location = "Hall"
//!
//! [locations]
//! Hall = ["umbrella", "keys"]
//! Kitchen = ["cup"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{EsmError, Result};

/// Locations, their starting items, and the robot's starting location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Location the robot is in when a session starts
    pub start_location: String,
    /// Location name to starting items, in display order
    pub locations: IndexMap<String, Vec<String>>,
}

impl Catalog {
    /// Creates a catalog from a start location and `(location, items)` pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use esmrs::Catalog;
    ///
    /// let catalog = Catalog::new("LivingRoom", [
    ///     ("Kitchen", vec!["Cup"]),
    ///     ("LivingRoom", vec![]),
    /// ]);
    /// assert!(catalog.validate().is_ok());
    /// assert_eq!(catalog.locations.len(), 2);
    /// ```
    pub fn new<L, I, S>(start_location: impl Into<String>, locations: L) -> Self
    where
        L: IntoIterator<Item = (S, I)>,
        I: IntoIterator,
        I::Item: Into<String>,
        S: Into<String>,
    {
        Self {
            start_location: start_location.into(),
            locations: locations
                .into_iter()
                .map(|(name, items)| (name.into(), items.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// The built-in apartment catalog. The robot starts in the living room.
    pub fn home() -> Self {
        Self::new(
            "living room",
            [
                (
                    "kitchen shelf",
                    vec![
                        "plate",
                        "salad bowl",
                        "soup bowl",
                        "wooden bowl",
                        "rice bowl",
                        "small plate",
                        "cup",
                        "wine glass",
                        "teacup",
                        "mug",
                        "kyusu teapot",
                        "teapot",
                        "food container",
                        "coffee maker",
                        "spice jar",
                    ],
                ),
                (
                    "kitchen drawer",
                    vec![
                        "chopsticks",
                        "spoon",
                        "knife",
                        "fork",
                        "ladle",
                        "spatula",
                        "cooking chopsticks",
                        "peeler",
                        "bottle opener",
                        "can opener",
                        "measuring spoon",
                        "scissors",
                        "flower frog",
                        "plastic wrap",
                        "aluminum foil",
                        "paper towel",
                    ],
                ),
                (
                    "kitchen sink",
                    vec![
                        "water",
                        "dish sponge",
                        "dish soap",
                        "scrubbing brush",
                        "drain net",
                        "sink brush",
                    ],
                ),
                (
                    "dining table",
                    vec![
                        "tissues",
                        "flowers in vase",
                        "laptop",
                        "tablecloth",
                        "cutlery case",
                        "remote control",
                        "mail",
                        "soy sauce",
                    ],
                ),
                (
                    "living room",
                    vec![
                        "sofa",
                        "cushion",
                        "coffee table",
                        "bookshelf",
                        "book",
                        "magazine",
                        "houseplant",
                        "air conditioner",
                        "air purifier",
                        "television",
                        "dvd",
                        "video game",
                        "game console",
                        "speaker",
                        "wi-fi router",
                        "floor lamp",
                        "rug",
                        "curtain",
                        "clock",
                        "bouquet",
                    ],
                ),
                (
                    "top shelf",
                    vec![
                        "vase",
                        "photo album",
                        "storage box",
                        "trophy",
                        "rarely used book",
                    ],
                ),
                (
                    "closet",
                    vec![
                        "suit", "shirt", "t-shirt", "sweater", "trousers", "jeans", "skirt", "dress",
                        "coat", "pajamas", "cap", "hat", "necktie", "belt", "bag", "socks",
                        "underwear",
                    ],
                ),
                (
                    "storeroom",
                    vec![
                        "newspaper",
                        "suitcase",
                        "golf bag",
                        "heater",
                        "electric fan",
                        "vacuum cleaner",
                        "toolbox",
                        "emergency kit",
                        "seasonal decorations",
                        "camping gear",
                        "unused appliances",
                    ],
                ),
                (
                    "entrance",
                    vec![
                        "shoes",
                        "umbrella",
                        "umbrella stand",
                        "shoe cabinet",
                        "slippers",
                        "keys",
                        "personal seal",
                        "parcel box",
                        "shoehorn",
                    ],
                ),
                (
                    "washroom",
                    vec![
                        "toothbrush",
                        "toothpaste",
                        "rinsing cup",
                        "towel",
                        "hand soap",
                        "face wash",
                        "mirror",
                        "washing machine",
                        "laundry detergent",
                        "fabric softener",
                        "hair dryer",
                        "bathroom scale",
                    ],
                ),
                (
                    "bathroom",
                    vec![
                        "shampoo",
                        "conditioner",
                        "body soap",
                        "bath stool",
                        "washbasin",
                        "bath mat",
                        "bath sponge",
                        "razor",
                        "bathtub cover",
                        "cleaning brush",
                    ],
                ),
                (
                    "toilet",
                    vec![
                        "toilet paper",
                        "toilet brush",
                        "air freshener",
                        "sanitary box",
                        "toilet seat cover",
                        "cleaning sheets",
                    ],
                ),
                (
                    "bedroom",
                    vec![
                        "bed",
                        "futon",
                        "pillow",
                        "alarm clock",
                        "side table",
                        "bedside lamp",
                        "humidifier",
                        "dresser",
                        "wardrobe",
                    ],
                ),
                (
                    "desk",
                    vec![
                        "desktop computer",
                        "monitor",
                        "keyboard",
                        "mouse",
                        "desk lamp",
                        "pen",
                        "pen holder",
                        "notebook",
                        "documents",
                        "charging cable",
                        "headphones",
                        "printer",
                        "reference book",
                    ],
                ),
                (
                    "refrigerator",
                    vec![
                        "milk",
                        "eggs",
                        "vegetables",
                        "fruit",
                        "drinks",
                        "bottled tea",
                        "butter",
                        "yogurt",
                        "ketchup",
                        "mayonnaise",
                        "frozen food",
                        "ice",
                    ],
                ),
                (
                    "balcony",
                    vec![
                        "drying rack",
                        "clothespins",
                        "flowerpot",
                        "sandals",
                        "outdoor unit",
                    ],
                ),
            ],
        )
    }

    /// Parses a catalog from JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parses a catalog from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads a catalog file, choosing the format from the `.json` or `.toml`
    /// extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        let catalog = match extension.as_deref() {
            Some("json") => Self::from_json_str(&text)?,
            Some("toml") => Self::from_toml_str(&text)?,
            _ => {
                return Err(EsmError::Catalog(format!(
                    "unsupported catalog format: {}",
                    path.display()
                )))
            }
        };
        log::debug!(
            "Loaded catalog from {} with {} locations",
            path.display(),
            catalog.locations.len()
        );
        Ok(catalog)
    }

    /// Checks that the catalog can seed a consistent world.
    ///
    /// Location names and item names are compared case-insensitively, since
    /// the planner's text is resolved that way.
    ///
    /// # Errors
    ///
    /// Returns [`EsmError::Catalog`] when the catalog has no locations, the
    /// start location is not one of them, or a location or item name occurs
    /// twice.
    pub fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(EsmError::Catalog("catalog has no locations".to_string()));
        }

        let mut location_names = HashSet::new();
        for location in self.locations.keys() {
            if !location_names.insert(location.to_lowercase()) {
                return Err(EsmError::Catalog(format!(
                    "location '{}' is listed more than once",
                    location
                )));
            }
        }
        if !location_names.contains(&self.start_location.to_lowercase()) {
            return Err(EsmError::Catalog(format!(
                "start location '{}' is not a catalog location",
                self.start_location
            )));
        }

        let mut seen: IndexMap<String, (&str, &str)> = IndexMap::new();
        for (location, items) in &self.locations {
            for item in items {
                if let Some((first, first_location)) = seen.get(&item.to_lowercase()) {
                    return Err(EsmError::Catalog(format!(
                        "item '{}' in '{}' duplicates '{}' in '{}'",
                        item, location, first, first_location
                    )));
                }
                seen.insert(item.to_lowercase(), (item.as_str(), location.as_str()));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::home()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_home_catalog_is_valid() {
        let catalog = Catalog::home();
        catalog.validate().unwrap();
        assert_eq!(catalog.locations.len(), 16);
        assert_eq!(catalog.start_location, "living room");
        assert_eq!(catalog.locations.get_index(0).unwrap().0, "kitchen shelf");
    }

    #[test]
    fn test_duplicate_item_rejected() {
        let catalog = Catalog::new("A", [("A", vec!["cup"]), ("B", vec!["Cup"])]);
        let err = catalog.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Catalog error: item 'Cup' in 'B' duplicates 'cup' in 'A'"
        );
    }

    #[test]
    fn test_duplicate_location_rejected() {
        let catalog = Catalog::new("A", [("A", vec!["cup"]), ("a", vec![])]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_unknown_start_rejected() {
        let catalog = Catalog::new("Garage", [("Kitchen", vec!["cup"])]);
        assert!(matches!(catalog.validate(), Err(EsmError::Catalog(_))));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let catalog = Catalog::new("A", Vec::<(&str, Vec<&str>)>::new());
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_json_catalog_keeps_order() {
        let catalog = Catalog::from_json_str(
            r#"{"start_location": "Hall", "locations": {"Zeta": ["z"], "Hall": [], "Alpha": ["a"]}}"#,
        )
        .unwrap();
        let names: Vec<_> = catalog.locations.keys().cloned().collect();
        assert_eq!(names, vec!["Zeta", "Hall", "Alpha"]);
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "start_location = \"Hall\"\n\n[locations]\nHall = [\"keys\"]\nKitchen = [\"cup\"]"
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.start_location, "Hall");
        assert_eq!(catalog.locations["Kitchen"], vec!["cup".to_string()]);
    }

    #[test]
    fn test_load_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(Catalog::load(file.path()), Err(EsmError::Catalog(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load(dir.path().join("missing.json"));
        assert!(matches!(result, Err(EsmError::Io(_))));
    }
}
