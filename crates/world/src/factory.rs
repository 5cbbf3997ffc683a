use std::collections::BTreeMap;
use std::rc::Rc;

use crate::entity::Entity;

type Constructor = Rc<dyn Fn() -> Entity>;

/// Maps class names to constructors so a world can build entities it has
/// never seen an instance of.
#[derive(Clone, Default)]
pub struct ClassRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `class`.
    pub fn register(&mut self, class: impl Into<String>, constructor: impl Fn() -> Entity + 'static) {
        self.constructors.insert(class.into(), Rc::new(constructor));
    }

    pub fn contains(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    /// Registered class names, sorted.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Build a new entity of `class`, tagged with that class name.
    pub fn construct(&self, class: &str) -> Option<Entity> {
        let constructor = self.constructors.get(class)?;
        let mut entity = constructor();
        entity.class = class.to_owned();
        Some(entity)
    }
}

impl std::fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}
