//! Manifest entity graph and its JSON-LD document form

use crate::error::ManifestError;
use crate::tree::hasher::{Checksum, ChecksumAlgorithm};
use crate::tree::path::ROOT_ID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Context identifier written at the top of every manifest document.
pub const MANIFEST_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";

/// Entity kind, serialized as `@type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Dataset,
    File,
    Directory,
}

/// `{"@id": ...}` reference to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "@id")]
    pub id: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChecksum {
    pub checksum_algorithm: ChecksumAlgorithm,
    pub checksum_value: String,
}

impl From<&Checksum> for ContentChecksum {
    fn from(checksum: &Checksum) -> Self {
        Self {
            checksum_algorithm: checksum.algorithm,
            checksum_value: checksum.value.clone(),
        }
    }
}

/// One node of the manifest graph.
///
/// `has_part` is `Some` for the root and directories (possibly empty) and
/// `None` for files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntity {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub entity_type: EntityType,
    pub name: String,
    #[serde(
        rename = "dateCreated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "contentChecksum",
        default,
        skip_serializing_if = "Option::is_none",
        with = "checksum_list"
    )]
    pub checksum: Option<ContentChecksum>,
    #[serde(rename = "contentSize", default, skip_serializing_if = "Option::is_none")]
    pub content_size: Option<u64>,
    #[serde(rename = "hasPart", default, skip_serializing_if = "Option::is_none")]
    pub has_part: Option<Vec<EntityRef>>,
    #[serde(
        rename = "isDescribedBy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_described_by: Option<EntityRef>,
}

impl ManifestEntity {
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Ids of contained entities, in discovery order
    pub fn part_ids(&self) -> impl Iterator<Item = &str> {
        self.has_part
            .iter()
            .flatten()
            .map(|part| part.id.as_str())
    }

    pub fn described_by(&self) -> Option<&str> {
        self.is_described_by.as_ref().map(|r| r.id.as_str())
    }
}

/// `contentChecksum` is an array externally but at most one digest per entity here.
mod checksum_list {
    use super::ContentChecksum;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<ContentChecksum>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(checksum) => [checksum].serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<ContentChecksum>, D::Error> {
        let list = Option::<Vec<ContentChecksum>>::deserialize(deserializer)?;
        Ok(list.and_then(|l| l.into_iter().next()))
    }
}

/// Persisted document shape: `{"@context": ..., "@graph": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDocument {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@graph")]
    pub graph: Vec<ManifestEntity>,
}

/// Finished, fully linked manifest graph. Root first, then creation order.
#[derive(Debug, Clone)]
pub struct Manifest {
    context: String,
    entities: Vec<ManifestEntity>,
    index: HashMap<String, usize>,
}

impl Manifest {
    /// Assemble a manifest and check its structural invariants.
    pub fn from_entities(
        context: impl Into<String>,
        entities: Vec<ManifestEntity>,
    ) -> Result<Self, ManifestError> {
        let mut index = HashMap::with_capacity(entities.len());
        for (position, entity) in entities.iter().enumerate() {
            if index.insert(entity.id.clone(), position).is_some() {
                return Err(ManifestError::Structural(format!(
                    "duplicate entity id {}",
                    entity.id
                )));
            }
        }

        let manifest = Self {
            context: context.into(),
            entities,
            index,
        };
        manifest.check_consistency()?;
        Ok(manifest)
    }

    pub fn from_document(document: ManifestDocument) -> Result<Self, ManifestError> {
        Self::from_entities(document.context, document.graph)
    }

    pub fn to_document(&self) -> ManifestDocument {
        ManifestDocument {
            context: self.context.clone(),
            graph: self.entities.clone(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn root(&self) -> &ManifestEntity {
        // check_consistency guarantees the root sits at position 0
        &self.entities[0]
    }

    pub fn entities(&self) -> &[ManifestEntity] {
        &self.entities
    }

    pub fn get(&self, id: &str) -> Option<&ManifestEntity> {
        self.index.get(id).map(|&position| &self.entities[position])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn files(&self) -> impl Iterator<Item = &ManifestEntity> {
        self.entities
            .iter()
            .filter(|e| e.entity_type == EntityType::File)
    }

    /// Re-check the graph invariants: a single leading root, every other
    /// entity contained exactly once, and every reference resolvable.
    pub fn check_consistency(&self) -> Result<(), ManifestError> {
        let root = self
            .entities
            .first()
            .ok_or_else(|| ManifestError::Structural("manifest has no entities".to_string()))?;
        if !root.is_root() || root.entity_type != EntityType::Dataset {
            return Err(ManifestError::Structural(format!(
                "first entity must be the {} Dataset, found {} ({:?})",
                ROOT_ID, root.id, root.entity_type
            )));
        }

        let mut contained: HashSet<&str> = HashSet::new();
        for entity in &self.entities {
            if entity.entity_type == EntityType::Dataset && !entity.is_root() {
                return Err(ManifestError::Structural(format!(
                    "only the root may be a Dataset, found {}",
                    entity.id
                )));
            }
            if entity.entity_type == EntityType::File && entity.has_part.is_some() {
                return Err(ManifestError::Structural(format!(
                    "file {} cannot contain entities",
                    entity.id
                )));
            }
            for part in entity.part_ids() {
                if !self.index.contains_key(part) {
                    return Err(ManifestError::Structural(format!(
                        "{} contains unknown entity {}",
                        entity.id, part
                    )));
                }
                if part == ROOT_ID || !contained.insert(part) {
                    return Err(ManifestError::Structural(format!(
                        "entity {} is contained more than once",
                        part
                    )));
                }
            }
            if let Some(descriptor) = entity.described_by() {
                if !self.index.contains_key(descriptor) {
                    return Err(ManifestError::Structural(format!(
                        "{} is described by unknown entity {}",
                        entity.id, descriptor
                    )));
                }
            }
        }

        if let Some(orphan) = self
            .entities
            .iter()
            .skip(1)
            .find(|e| !contained.contains(e.id.as_str()))
        {
            return Err(ManifestError::Structural(format!(
                "entity {} is not reachable from the root",
                orphan.id
            )));
        }

        Ok(())
    }
}
