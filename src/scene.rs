//! Scene Data and Tile Placement
//!
//! The map/tileset files themselves are parsed elsewhere - this crate
//! has no file-format knowledge. What arrives here is already-parsed
//! data: tileset geometry, a grid of tile indices, and physics
//! settings, all serde types so the loader can ship them as RON.
//! `populate` turns a grid into static tile entities before the first
//! tick.

use serde::{Serialize, Deserialize};
use crate::collider::{Collider, ColliderShape, CollisionResponse};
use crate::components::SpriteRect;
use crate::math::Vec2;
use crate::physics::PhysicsSettings;
use crate::world::World;

/// Opaque renderer-owned texture id. The simulation never loads or
/// touches pixels; it only carries the handle through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Tileset geometry: how the spritesheet is cut up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSet {
    pub tile_width: i32,
    pub tile_height: i32,
    /// Gap between cells in the spritesheet, pixels
    pub spacing: i32,
    pub tile_count: i32,
    /// Cells per spritesheet row
    pub columns: i32,
    pub texture: TextureHandle,
}

impl TileSet {
    /// Source rectangle for a 1-based tile index, walking the
    /// spritesheet row-major with spacing between cells.
    pub fn sprite_rect(&self, tile_index: i32) -> SpriteRect {
        let cell = tile_index - 1;
        let row = cell / self.columns;
        let col = cell % self.columns;

        SpriteRect {
            x: self.spacing + col * self.tile_width + col * self.spacing,
            y: self.spacing + row * self.tile_height + row * self.spacing,
            w: self.tile_width,
            h: self.tile_height,
        }
    }
}

/// A parsed tile layer: indices row-major, 0 meaning an empty cell
/// (the convention of the map format the loader reads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMap {
    pub columns: usize,
    pub tiles: Vec<u32>,
}

impl SceneMap {
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.tiles.len() / self.columns
        }
    }

    /// Scene size in pixels.
    pub fn level_width(&self, tileset: &TileSet) -> i32 {
        self.columns as i32 * tileset.tile_width
    }

    pub fn level_height(&self, tileset: &TileSet) -> i32 {
        self.rows() as i32 * tileset.tile_height
    }
}

/// Spawn one static tile entity per occupied grid cell, positioned at
/// the cell's top-left corner with a blocking box collider covering
/// the tile. Returns how many tiles were spawned.
///
/// Runs before the first tick; the entities it creates are ordinary
/// world entities from then on.
pub fn populate(world: &mut World, tileset: &TileSet, map: &SceneMap) -> usize {
    let half = Vec2::new(tileset.tile_width as f32 / 2.0, tileset.tile_height as f32 / 2.0);
    let mut spawned = 0;

    for (cell, &tile_index) in map.tiles.iter().enumerate() {
        if tile_index == 0 {
            continue; // empty cell
        }
        let col = (cell % map.columns) as f32;
        let row = (cell / map.columns) as f32;
        let position = Vec2::new(
            col * tileset.tile_width as f32,
            row * tileset.tile_height as f32,
        );

        // Entity sits at the tile corner; the collider is centered on
        // the tile via its local offset.
        let collider = Collider::new(
            ColliderShape::Aabb {
                offset: half,
                half_extents: half,
            },
            CollisionResponse::Block,
        );
        world.spawn_tile(position, tileset.sprite_rect(tile_index as i32), Some(collider));
        spawned += 1;
    }

    spawned
}

// =============================================================================
// RON loading
// =============================================================================
// Configuration problems surface here, at load time, as Results - the
// tick loop itself never parses anything and never fails.

pub fn tileset_from_ron(source: &str) -> Result<TileSet, ron::error::SpannedError> {
    ron::from_str(source)
}

pub fn map_from_ron(source: &str) -> Result<SceneMap, ron::error::SpannedError> {
    ron::from_str(source)
}

pub fn settings_from_ron(source: &str) -> Result<PhysicsSettings, ron::error::SpannedError> {
    ron::from_str(source)
}
