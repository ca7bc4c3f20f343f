//! In-memory host world
//!
//! A sparse, hash-map backed implementation of the host traits. Hosts can use
//! it to exercise their content catalogs; the engine's own tests run on it.
//! Unset positions read as empty air.

use std::collections::BTreeSet;

use ahash::AHashMap;
use glam::{IVec2, IVec3};
use verdure_content::{
    ClimateMode, ClimateSample, ContentCatalog, FamilyId, LightMode, MaterialClass,
    VariantFamily, VariantKey,
};

use super::host::{WorldMut, WorldView};

/// Full daylight
pub const MAX_LIGHT: u8 = 15;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    class: MaterialClass,
    content: Option<VariantKey>,
}

/// Sparse voxel world kept entirely in memory
///
/// One light value is stored per position and returned for every `LightMode`.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryWorld {
    cells: AHashMap<IVec3, Cell>,
    /// Heights of ground cells per (x, z) column
    ground: AHashMap<IVec2, BTreeSet<i32>>,
    /// Class each registered family's members occupy
    families: AHashMap<FamilyId, MaterialClass>,
    light: AHashMap<IVec3, u8>,
    default_light: u8,
    climate: Option<ClimateSample>,
    seasonal_climate: Option<ClimateSample>,
    /// Writes made through `WorldMut`
    writes: usize,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self {
            cells: AHashMap::new(),
            ground: AHashMap::new(),
            families: AHashMap::new(),
            light: AHashMap::new(),
            default_light: MAX_LIGHT,
            climate: None,
            seasonal_climate: None,
            writes: 0,
        }
    }

    /// World with every family of `catalog` registered
    pub fn with_catalog(catalog: &ContentCatalog) -> Self {
        let mut world = Self::new();
        world.register_catalog(catalog);
        world
    }

    /// Make members of `family` occupy the family's class when written
    pub fn register_family(&mut self, family: &VariantFamily) {
        self.families.insert(family.id(), family.class());
    }

    pub fn register_catalog(&mut self, catalog: &ContentCatalog) {
        for family in catalog.families() {
            self.register_family(family);
        }
    }

    /// Set a raw material class (clears any variant at `pos`)
    pub fn set_class(&mut self, pos: IVec3, class: MaterialClass) {
        if class.is_empty() {
            self.remove_cell(pos);
        } else {
            self.insert_cell(
                pos,
                Cell {
                    class,
                    content: None,
                },
            );
        }
    }

    /// Place a variant without counting it as an engine write
    pub fn place_variant(&mut self, pos: IVec3, variant: VariantKey) {
        let class = self.class_of(variant);
        self.insert_cell(
            pos,
            Cell {
                class,
                content: Some(variant),
            },
        );
    }

    /// Fill `from_y..=to_y` of column (x, z) with `class`
    pub fn fill_column(&mut self, x: i32, z: i32, from_y: i32, to_y: i32, class: MaterialClass) {
        for y in from_y..=to_y {
            self.set_class(IVec3::new(x, y, z), class);
        }
    }

    /// Fill a square of columns around `center` (inclusive radius)
    pub fn fill_area(&mut self, center: IVec3, radius: i32, from_y: i32, to_y: i32, class: MaterialClass) {
        for x in center.x - radius..=center.x + radius {
            for z in center.z - radius..=center.z + radius {
                self.fill_column(x, z, from_y, to_y, class);
            }
        }
    }

    pub fn set_default_light(&mut self, level: u8) {
        self.default_light = level.min(MAX_LIGHT);
    }

    pub fn set_light(&mut self, pos: IVec3, level: u8) {
        self.light.insert(pos, level.min(MAX_LIGHT));
    }

    pub fn set_climate(&mut self, climate: Option<ClimateSample>) {
        self.climate = climate;
    }

    pub fn set_seasonal_climate(&mut self, climate: Option<ClimateSample>) {
        self.seasonal_climate = climate;
    }

    /// Number of writes made through `WorldMut`
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Positions currently holding a member of `family`
    pub fn positions_of(&self, family: FamilyId) -> Vec<IVec3> {
        let mut positions: Vec<IVec3> = self
            .cells
            .iter()
            .filter(|(_, cell)| cell.content.is_some_and(|key| key.family == family))
            .map(|(pos, _)| *pos)
            .collect();
        positions.sort_by_key(|p| (p.x, p.y, p.z));
        positions
    }

    fn insert_cell(&mut self, pos: IVec3, cell: Cell) {
        let column = IVec2::new(pos.x, pos.z);
        if cell.class.is_ground() {
            self.ground.entry(column).or_default().insert(pos.y);
        } else {
            self.forget_ground(column, pos.y);
        }
        self.cells.insert(pos, cell);
    }

    fn remove_cell(&mut self, pos: IVec3) {
        self.forget_ground(IVec2::new(pos.x, pos.z), pos.y);
        self.cells.remove(&pos);
    }

    fn forget_ground(&mut self, column: IVec2, y: i32) {
        if let Some(heights) = self.ground.get_mut(&column) {
            heights.remove(&y);
            if heights.is_empty() {
                self.ground.remove(&column);
            }
        }
    }

    fn class_of(&self, variant: VariantKey) -> MaterialClass {
        self.families
            .get(&variant.family)
            .copied()
            .unwrap_or(MaterialClass::Occupied { replaceable: false })
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldView for MemoryWorld {
    fn material(&self, pos: IVec3) -> MaterialClass {
        self.cells
            .get(&pos)
            .map(|cell| cell.class)
            .unwrap_or(MaterialClass::Empty)
    }

    fn content_at(&self, pos: IVec3) -> Option<VariantKey> {
        self.cells.get(&pos).and_then(|cell| cell.content)
    }

    fn terrain_height(&self, x: i32, z: i32) -> Option<i32> {
        self.ground
            .get(&IVec2::new(x, z))
            .and_then(|heights| heights.last().copied())
    }

    fn sample_climate(&self, _pos: IVec3, mode: ClimateMode) -> Option<ClimateSample> {
        match mode {
            ClimateMode::Current => self.climate,
            ClimateMode::SeasonalAverage => self.seasonal_climate,
        }
    }

    fn light_level(&self, pos: IVec3, _mode: LightMode) -> u8 {
        self.light.get(&pos).copied().unwrap_or(self.default_light)
    }
}

impl WorldMut for MemoryWorld {
    fn set_content(&mut self, pos: IVec3, variant: VariantKey) {
        self.place_variant(pos, variant);
        self.writes += 1;
    }

    fn clear_content(&mut self, pos: IVec3) {
        self.remove_cell(pos);
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdure_content::{BuiltinFamily, LiquidKind};

    #[test]
    fn test_unset_positions_are_empty() {
        let world = MemoryWorld::new();
        assert_eq!(world.material(IVec3::new(1, 2, 3)), MaterialClass::Empty);
        assert_eq!(world.content_at(IVec3::new(1, 2, 3)), None);
        assert_eq!(world.terrain_height(1, 3), None);
        assert_eq!(world.light_level(IVec3::ZERO, LightMode::Current), MAX_LIGHT);
    }

    #[test]
    fn test_terrain_height_ignores_liquid_and_plants() {
        let mut world = MemoryWorld::new();
        world.fill_column(0, 0, 0, 4, MaterialClass::SolidOpaque);
        world.fill_column(0, 0, 5, 8, MaterialClass::liquid(LiquidKind::Water, 7));
        world.set_class(IVec3::new(0, 9, 0), MaterialClass::Occupied { replaceable: true });

        assert_eq!(world.terrain_height(0, 0), Some(4));
    }

    #[test]
    fn test_terrain_height_follows_edits() {
        let catalog = ContentCatalog::builtin().unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.fill_column(3, -2, 0, 2, MaterialClass::SolidOpaque);
        assert_eq!(world.terrain_height(3, -2), Some(2));
        assert_eq!(world.terrain_height(3, 2), None);

        // Fertile soil counts as ground, flowers do not
        world.set_content(IVec3::new(3, 3, -2), catalog.soil.base());
        assert_eq!(world.terrain_height(3, -2), Some(3));
        world.place_variant(IVec3::new(3, 4, -2), catalog.flowers.base());
        assert_eq!(world.terrain_height(3, -2), Some(3));

        world.clear_content(IVec3::new(3, 3, -2));
        assert_eq!(world.terrain_height(3, -2), Some(2));
        world.set_class(IVec3::new(3, 2, -2), MaterialClass::liquid(LiquidKind::Water, 7));
        assert_eq!(world.terrain_height(3, -2), Some(1));
        world.set_class(IVec3::new(3, 1, -2), MaterialClass::Empty);
        world.set_class(IVec3::new(3, 0, -2), MaterialClass::Empty);
        assert_eq!(world.terrain_height(3, -2), None);
    }

    #[test]
    fn test_default_light_and_overrides() {
        let mut world = MemoryWorld::new();
        world.set_default_light(4);
        world.set_light(IVec3::Y, 40);

        assert_eq!(world.light_level(IVec3::ZERO, LightMode::Current), 4);
        assert_eq!(world.light_level(IVec3::ZERO, LightMode::Daylight), 4);
        assert_eq!(world.light_level(IVec3::Y, LightMode::Current), MAX_LIGHT);
    }

    #[test]
    fn test_set_content_uses_family_class() {
        let catalog = ContentCatalog::builtin().unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        let pos = IVec3::new(2, 1, 2);

        world.set_content(pos, catalog.soil.base());
        assert_eq!(world.material(pos), MaterialClass::Fertile { fertility: 3 });
        assert_eq!(world.content_at(pos), Some(catalog.soil.base()));
        assert_eq!(world.writes(), 1);

        world.clear_content(pos);
        assert_eq!(world.material(pos), MaterialClass::Empty);
        assert_eq!(world.writes(), 2);
    }

    #[test]
    fn test_unregistered_family_reads_occupied() {
        let mut world = MemoryWorld::new();
        let pos = IVec3::new(0, 0, 0);
        world.place_variant(pos, VariantKey::new(FamilyId(99), 0));
        assert_eq!(world.material(pos), MaterialClass::Occupied { replaceable: false });
        assert_eq!(world.writes(), 0);
    }

    #[test]
    fn test_climate_modes() {
        let mut world = MemoryWorld::new();
        world.set_climate(Some(ClimateSample::new(20.0, 0.1)));
        assert!(world.sample_climate(IVec3::ZERO, ClimateMode::Current).is_some());
        assert!(
            world
                .sample_climate(IVec3::ZERO, ClimateMode::SeasonalAverage)
                .is_none()
        );
    }

    #[test]
    fn test_positions_of_family() {
        let catalog = ContentCatalog::builtin().unwrap();
        let mut world = MemoryWorld::with_catalog(&catalog);
        world.place_variant(IVec3::new(1, 0, 0), catalog.flowers.base());
        world.place_variant(IVec3::new(0, 0, 0), catalog.flowers.top());
        world.place_variant(IVec3::new(5, 0, 0), catalog.kelp.base());

        assert_eq!(
            world.positions_of(BuiltinFamily::FLOWERS),
            vec![IVec3::new(0, 0, 0), IVec3::new(1, 0, 0)]
        );
    }
}
