//! Manifest builder: turns a walked bundle directory into a linked entity graph
//!
//! The build runs in two phases. Phase one walks the tree once and produces an
//! unlinked record per entry, with its checksum and descriptor text. Phase two
//! resolves containment (`hasPart`) and description (`isDescribedBy`) edges
//! against the id index and hands back an immutable [`Manifest`].

use crate::descriptor::{
    self, DescriptorReader, DescriptorResolver, YamlDescriptorReader, DESCRIPTOR_SUFFIX,
};
use crate::error::ManifestError;
use crate::manifest::entity::{
    ContentChecksum, EntityRef, EntityType, Manifest, ManifestEntity, MANIFEST_CONTEXT,
};
use crate::tree::hasher::{Checksum, ChecksumProvider, Md5Checksum};
use crate::tree::path::{self, ROOT_ID};
use crate::tree::walker::{EntrySource, EntryType, FileSystemEntry, Walker, WalkerConfig};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, instrument, trace};

/// Phase-one output for a single entry
struct EntityRecord {
    entry: FileSystemEntry,
    checksum: Option<Checksum>,
    description: Option<String>,
    descriptor_id: Option<String>,
}

/// Builds manifests for one bundle root
pub struct ManifestBuilder {
    root: PathBuf,
    walker_config: WalkerConfig,
    descriptor_suffix: String,
    checksum: Box<dyn ChecksumProvider>,
    descriptors: Box<dyn DescriptorReader>,
    created_at: Option<DateTime<Utc>>,
}

impl ManifestBuilder {
    /// Create a builder with MD5 checksums, YAML descriptors and default exclusions
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            walker_config: WalkerConfig::default(),
            descriptor_suffix: DESCRIPTOR_SUFFIX.to_string(),
            checksum: Box::new(Md5Checksum),
            descriptors: Box::new(YamlDescriptorReader),
            created_at: None,
        }
    }

    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    pub fn with_descriptor_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.descriptor_suffix = suffix.into();
        self
    }

    pub fn with_checksum_provider(mut self, provider: impl ChecksumProvider + 'static) -> Self {
        self.checksum = Box::new(provider);
        self
    }

    pub fn with_descriptor_reader(mut self, reader: impl DescriptorReader + 'static) -> Self {
        self.descriptors = Box::new(reader);
        self
    }

    /// Pin the root `dateCreated` instead of using the build time.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root directory and build the complete manifest
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<Manifest, ManifestError> {
        let walker = Walker::with_config(self.root.clone(), self.walker_config.clone());
        self.build_from_source(&walker)
    }

    /// Build from any entry source; the source is consumed exactly once.
    pub fn build_from_source(&self, source: &dyn EntrySource) -> Result<Manifest, ManifestError> {
        let entries = source.collect_entries().map_err(|e| {
            error!("Filesystem walk failed: {}", e);
            e
        })?;
        self.build_from_entries(entries)
    }

    /// Build from an already materialized entry list
    pub fn build_from_entries(
        &self,
        entries: Vec<FileSystemEntry>,
    ) -> Result<Manifest, ManifestError> {
        let start = Instant::now();
        info!(entry_count = entries.len(), "Starting manifest build");

        let records = self.describe_entries(entries)?;
        let manifest = self.link(records)?;

        info!(
            entity_count = manifest.len(),
            duration_ms = start.elapsed().as_millis(),
            "Manifest build completed"
        );
        Ok(manifest)
    }

    /// Phase one: one unlinked record per entry.
    fn describe_entries(
        &self,
        entries: Vec<FileSystemEntry>,
    ) -> Result<Vec<EntityRecord>, ManifestError> {
        let mut snapshot: HashSet<String> = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.relative_path == ROOT_ID || !snapshot.insert(entry.relative_path.clone()) {
                return Err(ManifestError::Structural(format!(
                    "entry id {} claimed more than once",
                    entry.relative_path
                )));
            }
        }

        // Only walked files can serve as descriptors
        let walked_files: HashSet<String> = entries
            .iter()
            .filter(|entry| entry.is_file())
            .map(|entry| entry.relative_path.clone())
            .collect();
        let resolver = DescriptorResolver::new(
            &self.root,
            &self.descriptor_suffix,
            &walked_files,
            self.descriptors.as_ref(),
        );

        let mut records = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut record = EntityRecord {
                entry,
                checksum: None,
                description: None,
                descriptor_id: None,
            };

            if record.entry.is_file() {
                let id = record.entry.relative_path.as_str();
                if !descriptor::is_descriptor(id, &self.descriptor_suffix) {
                    if let Some(resolved) = resolver.resolve(id)? {
                        record.description = Some(resolved.descriptor.description().to_string());
                        record.descriptor_id = Some(resolved.id);
                    }
                }

                let checksum = self.checksum.checksum(&path::resolve(&self.root, id))?;
                trace!(id, checksum = %checksum.value, "Computed checksum");
                record.checksum = Some(checksum);
            }

            records.push(record);
        }

        debug!(record_count = records.len(), "Described entries");
        Ok(records)
    }

    /// Phase two: resolve containment and description edges.
    fn link(&self, records: Vec<EntityRecord>) -> Result<Manifest, ManifestError> {
        let mut parts: HashMap<String, Vec<EntityRef>> = HashMap::new();
        parts.insert(ROOT_ID.to_string(), Vec::new());
        for record in &records {
            if record.entry.entry_type == EntryType::Directory {
                parts.insert(record.entry.relative_path.clone(), Vec::new());
            }
        }

        for record in &records {
            let parent = path::container_id(&record.entry.parent_directory);
            let siblings = parts.get_mut(&parent).ok_or_else(|| {
                ManifestError::Structural(format!(
                    "{} has no walked parent directory {}",
                    record.entry.relative_path, parent
                ))
            })?;
            siblings.push(EntityRef::new(record.entry.relative_path.clone()));
        }

        let mut entities = Vec::with_capacity(records.len() + 1);
        entities.push(ManifestEntity {
            id: ROOT_ID.to_string(),
            entity_type: EntityType::Dataset,
            name: self.root_name(),
            date_created: Some(self.created_at.unwrap_or_else(Utc::now)),
            description: None,
            checksum: None,
            content_size: None,
            has_part: parts.remove(ROOT_ID),
            is_described_by: None,
        });

        for record in records {
            let EntityRecord {
                entry,
                checksum,
                description,
                descriptor_id,
            } = record;
            let (entity_type, has_part) = match entry.entry_type {
                EntryType::File => (EntityType::File, None),
                EntryType::Directory => (
                    EntityType::Directory,
                    Some(parts.remove(&entry.relative_path).unwrap_or_default()),
                ),
            };

            entities.push(ManifestEntity {
                name: path::basename(&entry.relative_path).to_string(),
                id: entry.relative_path,
                entity_type,
                date_created: None,
                description,
                checksum: checksum.as_ref().map(ContentChecksum::from),
                content_size: checksum.as_ref().map(|c| c.size),
                has_part,
                is_described_by: descriptor_id.map(EntityRef::new),
            });
        }

        Manifest::from_entities(MANIFEST_CONTEXT, entities)
    }

    fn root_name(&self) -> String {
        let resolved = path::canonicalize_path(&self.root).unwrap_or_else(|_| self.root.clone());
        resolved
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| resolved.display().to_string())
    }
}
