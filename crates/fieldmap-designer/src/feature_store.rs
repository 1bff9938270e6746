//! Ordered store of finalized features.
//!
//! Features live in an append log with an id index. Removal only happens
//! at the tail (`delete_last`) or wholesale (`clear_all`, `replace_all`),
//! so both are constant-time bookkeeping and the index never needs
//! renumbering.

use std::collections::HashMap;

use fieldmap_core::{DrawnFeature, FeatureError, FeatureId};

/// Exclusive owner of drawn feature identity.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<DrawnFeature>,
    index: HashMap<FeatureId, usize>,
}

impl FeatureStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a feature, returning its position.
    pub fn append(&mut self, feature: DrawnFeature) -> Result<usize, FeatureError> {
        if self.index.contains_key(&feature.id) {
            return Err(FeatureError::DuplicateId {
                id: feature.id.to_string(),
            });
        }
        let position = self.features.len();
        self.index.insert(feature.id.clone(), position);
        self.features.push(feature);
        Ok(position)
    }

    /// Removes the most recently appended feature.
    pub fn delete_last(&mut self) -> Option<DrawnFeature> {
        let feature = self.features.pop()?;
        self.index.remove(&feature.id);
        Some(feature)
    }

    /// Removes every feature, returning them in insertion order.
    pub fn clear_all(&mut self) -> Vec<DrawnFeature> {
        self.index.clear();
        std::mem::take(&mut self.features)
    }

    /// Replaces the contents in bulk, returning the previous features.
    ///
    /// The store is left untouched if the new features repeat an id.
    pub fn replace_all(
        &mut self,
        features: Vec<DrawnFeature>,
    ) -> Result<Vec<DrawnFeature>, FeatureError> {
        let mut index = HashMap::with_capacity(features.len());
        for (position, feature) in features.iter().enumerate() {
            if index.insert(feature.id.clone(), position).is_some() {
                return Err(FeatureError::DuplicateId {
                    id: feature.id.to_string(),
                });
            }
        }
        self.index = index;
        Ok(std::mem::replace(&mut self.features, features))
    }

    /// Snapshot of the contents in insertion order.
    pub fn list(&self) -> Vec<DrawnFeature> {
        self.features.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawnFeature> {
        self.features.iter()
    }

    pub fn get(&self, id: &FeatureId) -> Option<&DrawnFeature> {
        self.index.get(id).map(|&position| &self.features[position])
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.index.contains_key(id)
    }

    pub fn last(&self) -> Option<&DrawnFeature> {
        self.features.last()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
