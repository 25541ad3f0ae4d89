//! Game catalog types and loading.
//!
//! A catalog is the fixed list of games a randomizer session chooses from,
//! together with a settings record that only presentation layers care about.
//! Catalogs are validated once when built and never change afterwards.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CatalogError, ValidationError};

/// Largest catalog weight accepted.
///
/// Selection multiplies the catalog weight by up to `u64::MAX`, and the
/// products of a whole catalog must still sum to a finite `f64`.
pub const MAX_WEIGHT: f64 = 1e12;

/// Identifier of a game within a catalog.
///
/// Identifiers are the catalog's own keys (usually the game's display name)
/// and are also the keys of the persisted occurrence stats.
///
/// # Examples
///
/// ```
/// use game_randomizer::ItemId;
///
/// let id = ItemId::from("Fibbage");
/// assert_eq!(id.as_str(), "Fibbage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an identifier from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A single game in the catalog.
///
/// Only `min_players` and `weight` matter to selection. Everything else is
/// display metadata and is carried through untouched, including fields this
/// crate does not know about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Smallest party size the game supports.
    #[serde(alias = "players", alias = "minPlayers")]
    pub min_players: u32,

    /// Author-assigned base preference. Must be positive and finite.
    pub weight: f64,

    /// Pack or group the game belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,

    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image reference, relative to the catalog's image directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Any other fields present in the source record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    /// Creates an item with no display metadata.
    #[must_use]
    pub fn new(min_players: u32, weight: f64) -> Self {
        Self {
            min_players,
            weight,
            pack: None,
            description: None,
            image: None,
            extra: Map::new(),
        }
    }

    /// Sets the pack name.
    #[must_use]
    pub fn with_pack(mut self, pack: impl Into<String>) -> Self {
        self.pack = Some(pack.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns true if a party of `player_count` can play this game.
    #[must_use]
    pub const fn supports(&self, player_count: u32) -> bool {
        self.min_players <= player_count
    }

    /// Checks the selection fields of this item.
    ///
    /// # Errors
    /// - `ZeroMinPlayers` if `min_players` is 0
    /// - `InvalidWeight` if `weight` is not in `(0, MAX_WEIGHT]`
    pub fn validate(&self, id: &ItemId) -> Result<(), ValidationError> {
        if id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyItemId);
        }
        if self.min_players == 0 {
            return Err(ValidationError::ZeroMinPlayers {
                id: id.to_string(),
            });
        }
        if !(self.weight > 0.0 && self.weight <= MAX_WEIGHT) {
            return Err(ValidationError::InvalidWeight {
                id: id.to_string(),
                weight: self.weight,
            });
        }
        Ok(())
    }
}

/// Presentation settings stored alongside the games.
///
/// The selection core never reads these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Window or menu title.
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Player count to preselect.
    #[serde(rename = "Default_Players", default, skip_serializing_if = "Option::is_none")]
    pub default_players: Option<u32>,

    /// Largest player count offered.
    #[serde(rename = "Max_Players", default, skip_serializing_if = "Option::is_none")]
    pub max_players: Option<u32>,

    /// Logo image file name.
    #[serde(rename = "Logo", default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Label shown next to an item's pack name.
    #[serde(rename = "Pack_Label", default, skip_serializing_if = "Option::is_none")]
    pub pack_label: Option<String>,

    /// Directory holding the item images.
    #[serde(rename = "Image_Directory", default, skip_serializing_if = "Option::is_none")]
    pub image_directory: Option<String>,

    /// Any other settings present in the source.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk layout of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "Games")]
    games: BTreeMap<ItemId, CatalogItem>,
    #[serde(rename = "Settings", default)]
    settings: Settings,
}

/// A validated, immutable set of games.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    items: BTreeMap<ItemId, CatalogItem>,
    settings: Settings,
}

impl Catalog {
    /// Builds a catalog from items and settings, validating every item.
    ///
    /// # Errors
    /// - `CatalogError::Empty` if there are no items
    /// - `CatalogError::InvalidItem` if any item fails validation
    pub fn new(
        items: impl IntoIterator<Item = (ItemId, CatalogItem)>,
        settings: Settings,
    ) -> Result<Self, CatalogError> {
        let items: BTreeMap<ItemId, CatalogItem> = items.into_iter().collect();
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (id, item) in &items {
            item.validate(id)?;
        }
        Ok(Self { items, settings })
    }

    /// Parses a catalog from its JSON text.
    ///
    /// The expected layout is `{"Games": {id: item, ...}, "Settings": {...}}`.
    /// `Settings` may be omitted.
    ///
    /// # Errors
    /// Returns `Malformed` for invalid JSON or missing required fields, and
    /// the errors of [`Catalog::new`] for invalid contents.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.games, file.settings)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`Catalog::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), games = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    /// Looks up an item by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.get(id)
    }

    /// Returns true if the catalog contains `id`.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Iterates over all identifiers in a stable order.
    pub fn ids(&self) -> impl Iterator<Item = &ItemId> {
        self.items.keys()
    }

    /// Iterates over all items in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &CatalogItem)> {
        self.items.iter()
    }

    /// All items keyed by identifier.
    #[must_use]
    pub const fn items(&self) -> &BTreeMap<ItemId, CatalogItem> {
        &self.items
    }

    /// Presentation settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false for a successfully built catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Games": {
            "Game1": {
                "pack": "Pack1",
                "players": 4,
                "description": "A fun game for 4 players.",
                "image": "Game1.png",
                "weight": 1
            },
            "Game2": {
                "pack": "Pack2",
                "players": 2,
                "description": "A game for 2 players.",
                "image": "Game2.png",
                "weight": 1.5,
                "audience": true
            }
        },
        "Settings": {
            "Max_Players": 4,
            "Default_Players": 2,
            "Logo": "logo.png",
            "Pack_Label": "Test Pack",
            "Title": "Unit Tests Randomizer",
            "Image_Directory": "unit_tests"
        }
    }"#;

    #[test]
    fn test_parse_games_settings_layout() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("Game1"));

        let game2 = catalog.get("Game2").unwrap();
        assert_eq!(game2.min_players, 2);
        assert!((game2.weight - 1.5).abs() < f64::EPSILON);
        assert_eq!(game2.pack.as_deref(), Some("Pack2"));
        assert_eq!(game2.extra.get("audience"), Some(&Value::Bool(true)));

        let settings = catalog.settings();
        assert_eq!(settings.title.as_deref(), Some("Unit Tests Randomizer"));
        assert_eq!(settings.default_players, Some(2));
        assert_eq!(settings.max_players, Some(4));
        assert_eq!(settings.image_directory.as_deref(), Some("unit_tests"));
    }

    #[test]
    fn test_min_players_field_name() {
        let json = r#"{"Games": {"Solo": {"min_players": 1, "weight": 2}}}"#;
        let catalog = Catalog::from_json_str(json).unwrap();
        assert_eq!(catalog.get("Solo").unwrap().min_players, 1);
        assert_eq!(catalog.settings(), &Settings::default());
    }

    #[test]
    fn test_missing_weight_is_malformed() {
        let json = r#"{"Games": {"Broken": {"players": 3}}}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_negative_players_is_malformed() {
        let json = r#"{"Games": {"Broken": {"players": -1, "weight": 1}}}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let json = r#"{"Games": {"Broken": {"players": 3, "weight": 0}}}"#;
        let err = Catalog::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidItem(ValidationError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_oversized_weight_rejected() {
        for weight in [1e308, f64::INFINITY, f64::NAN, MAX_WEIGHT * 2.0] {
            let err = Catalog::new(
                [
                    (ItemId::from("A"), CatalogItem::new(1, weight)),
                    (ItemId::from("B"), CatalogItem::new(1, 1.0)),
                ],
                Settings::default(),
            )
            .unwrap_err();
            assert!(
                matches!(err, CatalogError::InvalidItem(ValidationError::InvalidWeight { .. })),
                "weight {weight} accepted"
            );
        }
        assert!(CatalogItem::new(1, MAX_WEIGHT).validate(&ItemId::from("A")).is_ok());
    }

    #[test]
    fn test_zero_players_rejected() {
        let err = Catalog::new(
            [(ItemId::from("Nobody"), CatalogItem::new(0, 1.0))],
            Settings::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidItem(ValidationError::ZeroMinPlayers { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = Catalog::from_json_str(r#"{"Games": {}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_missing_file() {
        let err = Catalog::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_supports() {
        let item = CatalogItem::new(3, 1.0);
        assert!(!item.supports(2));
        assert!(item.supports(3));
        assert!(item.supports(8));
    }
}
