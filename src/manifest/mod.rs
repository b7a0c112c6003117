//! Dataset manifest: entity graph, builder, persistence and verification

pub mod builder;
pub mod entity;
pub mod verify;
pub mod writer;

pub use builder::ManifestBuilder;
pub use entity::{
    ContentChecksum, EntityRef, EntityType, Manifest, ManifestDocument, ManifestEntity,
    MANIFEST_CONTEXT,
};
pub use verify::{verify_manifest, EntityStatus, EntityVerification, VerificationReport};
pub use writer::{read_manifest, to_json, ManifestWriter, MANIFEST_FILE_NAME};
