use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Hint locations shown down the two name columns, in display order.
pub const LOCATIONS: &[&str] = &[
    "Kokiri Forest",
    "Lost Woods",
    "Sacred Forest Meadow",
    "Hyrule Field",
    "Lon Lon Ranch",
    "Market",
    "Temple of Time",
    "Hyrule Castle",
    "Kakariko Village",
    "Graveyard",
    "Death Mountain Trail",
    "Death Mountain Crater",
    "Goron City",
    "Zora's River",
    "Zora's Domain",
    "Zora's Fountain",
    "Lake Hylia",
    "Gerudo Valley",
    "Gerudo's Fortress",
    "Haunted Wasteland",
    "Desert Colossus",
    "Deku Tree",
    "Dodongo's Cavern",
    "Jabu Jabu's Belly",
    "Forest Temple",
    "Fire Temple",
    "Water Temple",
    "Shadow Temple",
    "Spirit Temple",
    "Ice Cavern",
    "Bottom of the Well",
    "Gerudo Training Ground",
    "Ganon's Castle",
    "Song Rewards",
    "Skulltula House",
];

/// Built-in item catalog: display name and image path below the image root.
pub const ITEMS: &[(&str, &str)] = &[
    ("Kokiri Sword", "Items/Kokiri-Sword.png"),
    ("Master Sword", "Items/Master-Sword.png"),
    ("Biggoron Sword", "Items/Biggoron-Sword.png"),
    ("Deku Shield", "Items/Deku-Shield.png"),
    ("Hylian Shield", "Items/Hylian-Shield.png"),
    ("Mirror Shield", "Items/Mirror-Shield.png"),
    ("Fairy Slingshot", "Items/Fairy-Slingshot.png"),
    ("Fairy Bow", "Items/Fairy-Bow.png"),
    ("Bomb Bag", "Items/Bomb-Bag.png"),
    ("Bombchu", "Items/Bombchu.png"),
    ("Boomerang", "Items/Boomerang.png"),
    ("Hookshot", "Items/Hookshot.png"),
    ("Megaton Hammer", "Items/Megaton-Hammer.png"),
    ("Lens of Truth", "Items/Lens-of-Truth.png"),
    ("Fire Arrow", "Items/Fire-Arrow.png"),
    ("Ice Arrow", "Items/Ice-Arrow.png"),
    ("Light Arrow", "Items/Light-Arrow.png"),
    ("Din's Fire", "Items/Dins-Fire.png"),
    ("Farore's Wind", "Items/Farores-Wind.png"),
    ("Nayru's Love", "Items/Nayrus-Love.png"),
    ("Empty Bottle", "Items/Bottle.png"),
    ("Red Potion", "Items/Red-Potion.png"),
    ("Ruto's Letter", "Items/Rutos-Letter.png"),
    ("Iron Boots", "Items/Iron-Boots.png"),
    ("Hover Boots", "Items/Hover-Boots.png"),
    ("Goron Tunic", "Items/Goron-Tunic.png"),
    ("Zora Tunic", "Items/Zora-Tunic.png"),
    ("Goron Bracelet", "Items/Goron-Bracelet.png"),
    ("Silver Scale", "Items/Silver-Scale.png"),
    ("Ocarina", "Items/Ocarina.png"),
    ("Magic Meter", "Items/Magic-Meter.png"),
    ("Stone of Agony", "Items/Stone-of-Agony.png"),
];

/// The default marker's image, used by builds that ship it as a raster file.
pub const MARKER_IMAGE: &str = "Miscellaneous/Gossip-Stone.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub image: PathBuf,
}

/// Ordered, read-only list of items the picker offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(
            ITEMS
                .iter()
                .map(|(name, image)| CatalogEntry {
                    name: name.to_string(),
                    image: PathBuf::from(image),
                })
                .collect(),
        )
    }

    /// Parses a JSON array of `{ "name": .., "image": .. }` objects. Order is
    /// kept as written.
    pub fn from_json(s: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(s).context("parsing item catalog")?;
        Ok(Self::new(entries))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading item catalog {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Image path for entry `index`, relative paths taken from `root`.
    pub fn resolve(&self, root: &Path, index: usize) -> Option<PathBuf> {
        self.get(index).map(|e| root.join(&e.image))
    }
}

pub fn builtin_locations() -> Vec<String> {
    LOCATIONS.iter().map(|s| s.to_string()).collect()
}

/// Reads a JSON array of location names.
pub fn locations_from_json_file(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading location list {}", path.display()))?;
    serde_json::from_str(&raw).context("parsing location list")
}

/// Edge length, in pixels, every icon is scaled to when loaded.
pub const ICON_PIXELS: u32 = 20;

/// A decoded icon, scaled to `ICON_PIXELS` square.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Reads and decodes an icon. Missing, empty and undecodable files are all
/// errors.
pub fn load_icon(path: &Path) -> Result<IconPixels> {
    let bytes = fs::read(path).with_context(|| format!("loading image {}", path.display()))?;
    if bytes.is_empty() {
        bail!("image {} is empty", path.display());
    }
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("decoding image {}", path.display()))?;
    let scaled = decoded
        .resize_exact(ICON_PIXELS, ICON_PIXELS, FilterType::Triangle)
        .to_rgba8();
    let (width, height) = scaled.dimensions();
    Ok(IconPixels {
        width,
        height,
        rgba: scaled.into_raw(),
    })
}
