//! Typed registry of live entities, maintained on spawn and destroy.

use hecs::Entity;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use worldsim_data::AgentKind;

/// Lookup category of a live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityCategory {
    Agent(AgentKind),
    Food,
}

impl EntityCategory {
    #[must_use]
    pub fn is_agent(&self) -> bool {
        matches!(self, EntityCategory::Agent(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    by_category: BTreeMap<EntityCategory, BTreeSet<Entity>>,
    category_of: HashMap<Entity, EntityCategory>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity`. Re-registering moves it to the new category.
    pub fn insert(&mut self, category: EntityCategory, entity: Entity) {
        if let Some(previous) = self.category_of.insert(entity, category) {
            if let Some(set) = self.by_category.get_mut(&previous) {
                set.remove(&entity);
            }
        }
        self.by_category.entry(category).or_default().insert(entity);
    }

    /// Unregisters `entity`, returning the category it had.
    pub fn remove(&mut self, entity: Entity) -> Option<EntityCategory> {
        let category = self.category_of.remove(&entity)?;
        if let Some(set) = self.by_category.get_mut(&category) {
            set.remove(&entity);
        }
        Some(category)
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.category_of.contains_key(&entity)
    }

    #[must_use]
    pub fn category(&self, entity: Entity) -> Option<EntityCategory> {
        self.category_of.get(&entity).copied()
    }

    pub fn iter(&self, category: EntityCategory) -> impl Iterator<Item = Entity> + '_ {
        self.by_category
            .get(&category)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Every registered agent of any kind.
    pub fn agents(&self) -> impl Iterator<Item = Entity> + '_ {
        self.by_category
            .iter()
            .filter(|(category, _)| category.is_agent())
            .flat_map(|(_, set)| set.iter().copied())
    }

    #[must_use]
    pub fn len(&self, category: EntityCategory) -> usize {
        self.by_category.get(&category).map_or(0, BTreeSet::len)
    }

    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.by_category
            .iter()
            .filter(|(category, _)| category.is_agent())
            .map(|(_, set)| set.len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category_of.is_empty()
    }
}
