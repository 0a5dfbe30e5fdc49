//! Player progress and the shop
//!
//! Persisted to LocalStorage as one JSON document. The simulation never
//! touches this; the session reads it at run start and reports results back
//! at run end.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, Character};
use crate::sim::{GameMode, MapKind};

/// One-time welcome gift (coins)
pub const WELCOME_BONUS: u32 = 5000;

/// Outcome of a shop purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Purchase {
    Bought,
    AlreadyOwned,
    /// Not enough coins
    Insufficient,
    /// No such item
    Unknown,
}

/// Persisted player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub total_coins: u32,
    /// Best distance (whole units)
    pub high_score: u32,
    pub owned_characters: Vec<String>,
    pub owned_maps: Vec<MapKind>,
    pub selected_character: String,
    pub mode: GameMode,
    pub map: MapKind,
    /// Tutorial already completed on this device
    pub tutorial_done: bool,
    pub bonus_granted: bool,
}

impl Default for Profile {
    fn default() -> Self {
        let free_character = catalog::CHARACTERS[0].id.to_string();
        Self {
            total_coins: 0,
            high_score: 0,
            owned_characters: vec![free_character.clone()],
            owned_maps: vec![MapKind::Forest],
            selected_character: free_character,
            mode: GameMode::Easy,
            map: MapKind::Forest,
            tutorial_done: false,
            bonus_granted: false,
        }
    }
}

impl Profile {
    pub fn owns_character(&self, id: &str) -> bool {
        self.owned_characters.iter().any(|c| c == id)
    }

    pub fn owns_map(&self, map: MapKind) -> bool {
        self.owned_maps.contains(&map)
    }

    /// The selected character, or the free one if the selection is stale
    pub fn character(&self) -> &'static Character {
        if self.owns_character(&self.selected_character) {
            catalog::character_or_default(&self.selected_character)
        } else {
            &catalog::CHARACTERS[0]
        }
    }

    /// Grant the welcome bonus once. Returns true if coins were added.
    pub fn grant_welcome_bonus(&mut self) -> bool {
        if self.bonus_granted {
            return false;
        }
        self.bonus_granted = true;
        self.total_coins = self.total_coins.saturating_add(WELCOME_BONUS);
        log::info!("Granted welcome bonus of {} coins", WELCOME_BONUS);
        true
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    /// Select an owned map. Returns false (selection unchanged) if locked.
    pub fn select_map(&mut self, map: MapKind) -> bool {
        if !self.owns_map(map) {
            return false;
        }
        self.map = map;
        true
    }

    /// Select an owned character. Returns false (selection unchanged) if locked.
    pub fn select_character(&mut self, id: &str) -> bool {
        if !self.owns_character(id) {
            return false;
        }
        self.selected_character = id.to_string();
        true
    }

    /// Buy and select a character
    pub fn buy_character(&mut self, id: &str) -> Purchase {
        let Some(character) = catalog::character(id) else {
            return Purchase::Unknown;
        };
        if self.owns_character(id) {
            return Purchase::AlreadyOwned;
        }
        if self.total_coins < character.price {
            return Purchase::Insufficient;
        }

        self.total_coins -= character.price;
        self.owned_characters.push(character.id.to_string());
        self.selected_character = character.id.to_string();
        log::info!("Bought character {} for {}", character.name, character.price);
        Purchase::Bought
    }

    /// Buy and select a map
    pub fn buy_map(&mut self, map: MapKind) -> Purchase {
        if self.owns_map(map) {
            return Purchase::AlreadyOwned;
        }
        let item = catalog::map(map);
        if self.total_coins < item.price {
            return Purchase::Insufficient;
        }

        self.total_coins -= item.price;
        self.owned_maps.push(map);
        self.map = map;
        log::info!("Bought map {} for {}", item.name, item.price);
        Purchase::Bought
    }

    /// Bank a finished run. Returns true on a new high score.
    pub fn record_run(&mut self, distance: u32, currency: u32) -> bool {
        self.total_coins = self.total_coins.saturating_add(currency);
        if distance > self.high_score {
            self.high_score = distance;
            true
        } else {
            false
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "clear_ahead_profile";

    /// Parse a stored profile, falling back to a fresh one
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Profile>(json) {
            Ok(mut profile) => {
                profile.repair();
                profile
            }
            Err(e) => {
                log::warn!("Ignoring unreadable profile: {}", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Make sure the free items are owned and selections point at owned items
    fn repair(&mut self) {
        let defaults = Self::default();
        for id in &defaults.owned_characters {
            if !self.owns_character(id) {
                self.owned_characters.push(id.clone());
            }
        }
        if !self.owns_map(MapKind::Forest) {
            self.owned_maps.push(MapKind::Forest);
        }
        if !self.owns_character(&self.selected_character) {
            self.selected_character = defaults.selected_character;
        }
        if !self.owns_map(self.map) {
            self.map = MapKind::Forest;
        }
    }

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let profile = Self::from_json(&json);
                log::info!(
                    "Loaded profile: {} coins, best {}m",
                    profile.total_coins,
                    profile.high_score
                );
                return profile;
            }
        }

        log::info!("No profile found, starting fresh");
        Self::default()
    }

    /// Save the profile to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage.set_item(Self::STORAGE_KEY, &self.to_json()).is_err() {
                log::warn!("Storage access denied, progress kept in memory");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
