use crate::entity::EntityId;
use crate::world::World;

/// Read-only world queries for debugging and headless hosts.
pub struct WorldInspector;

impl WorldInspector {
    pub fn summary(world: &World) -> WorldSummary {
        WorldSummary {
            count: world.count(),
            stored: world.stored(),
            layers: world.layers().to_vec(),
            unique_types: world.unique_types(),
            pending_adds: world.pending_adds(),
            pending_removes: world.pending_removes(),
            tweens: world.tweens.len(),
        }
    }

    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.entity(id).map(|e| EntityInfo {
            id,
            class: e.class().to_owned(),
            tag: e.tag().map(str::to_owned),
            layer: e.layer(),
            position: [e.x, e.y],
            hitbox: [e.width, e.height, e.origin_x, e.origin_y],
            added: e.is_added(),
        })
    }

    /// Committed entities in drawing order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.render_ids().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub count: usize,
    pub stored: usize,
    pub layers: Vec<i32>,
    pub unique_types: usize,
    pub pending_adds: usize,
    pub pending_removes: usize,
    pub tweens: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: entities={} stored={} layers={:?} types={} pending=+{}/-{} tweens={}",
            self.count,
            self.stored,
            self.layers,
            self.unique_types,
            self.pending_adds,
            self.pending_removes,
            self.tweens
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub class: String,
    pub tag: Option<String>,
    pub layer: i32,
    pub position: [f32; 2],
    /// Width, height, origin x, origin y.
    pub hitbox: [i32; 4],
    pub added: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = if self.class.is_empty() { "-" } else { &self.class };
        write!(
            f,
            "Entity {} [{}] layer={} pos=({:.2}, {:.2}) hitbox={}x{}@({}, {})",
            class,
            self.tag.as_deref().unwrap_or("untagged"),
            self.layer,
            self.position[0],
            self.position[1],
            self.hitbox[0],
            self.hitbox[1],
            self.hitbox[2],
            self.hitbox[3],
        )
    }
}
