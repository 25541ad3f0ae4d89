//! The bundled sample catalogs must load and be pickable.

use std::path::PathBuf;
use std::sync::Arc;

use game_randomizer::{Catalog, InMemoryStatsStore, OccurrenceStore, Randomizer, StatsKey};

fn assets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
}

#[test]
fn test_bundled_catalogs_load() {
    let mut found = 0;
    for entry in std::fs::read_dir(assets_dir()).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "json") {
            let catalog = Catalog::from_path(&path).unwrap();
            assert!(!catalog.is_empty(), "{} is empty", path.display());
            assert!(StatsKey::for_catalog(&path).is_ok());
            found += 1;
        }
    }
    assert!(found > 0);
}

#[test]
fn test_jackbox_catalog_picks() {
    let path = assets_dir().join("jackbox_games.json");
    let catalog = Catalog::from_path(&path).unwrap();
    let players = catalog.settings().default_players.unwrap();

    let store = OccurrenceStore::new(
        Arc::new(InMemoryStatsStore::new()),
        StatsKey::for_catalog(&path).unwrap(),
    );
    let mut randomizer = Randomizer::seeded(catalog, store, 2024).unwrap();
    for _ in 0..10 {
        let pick = randomizer.pick(players, None).unwrap();
        assert!(pick.item.min_players <= players);
        assert!(pick.item.description.is_some());
    }
}
