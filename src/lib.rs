//! Stevedore - artifact staging and zip-deploy tool
//!
//! Stevedore packages a local build output directory and pushes it to a
//! remote application-hosting platform: declared resources are staged into
//! isolated temp directories, standalone war artifacts are deployed
//! individually, and the remainder is zipped (local secrets stripped) and
//! uploaded through a Kudu-style zip-deploy API with bounded retry.

pub mod archive;
pub mod config;
pub mod deploy;
pub mod error;
pub mod models;
pub mod stage;

// Re-exports for convenience
pub use archive::{hash_file, pack_directory, BundleInfo, LOCAL_SETTINGS_FILE};
pub use config::{Config, Credentials, CONFIG_FILE};
pub use deploy::{
    deploy_resources, publish, with_retry, DeployOptions, DeployTarget, DirectoryTarget,
    KuduClient, DEFAULT_MAX_RETRIES,
};
pub use error::{DeployError, StevedoreError, StevedoreResult};
pub use models::{
    ArtifactKind, DeploySummary, PublishReport, ResourceMapping, StagedResource, WarDeployment,
};
pub use stage::{stage_mapping, stage_resources, STAGING_PREFIX};
