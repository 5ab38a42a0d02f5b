//! Search-core provisioning for new core registry rows.
//!
//! When the host inserts a core registry row, a matching core must be
//! created on the search service before the row is allowed to exist.
//! Core names are `{prefix}{number}`; numbers start at the registry
//! row count and are never reused.

use std::sync::Arc;

use tracing::info;

use crate::error::{Result, SyncError};
use crate::traits::search::CoreAdmin;
use crate::traits::store::CoreRegistry;

/// Upper bound on probes for a free core number, so a service that
/// claims every name exists cannot loop us forever.
const MAX_CORE_PROBES: usize = 100;

/// Naming and configset parameters for provisioned cores.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
    /// Prefix of generated core names.
    pub core_prefix: String,
    /// Configset the search service instantiates new cores from.
    pub config_set: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            core_prefix: "docCore".to_string(),
            config_set: "documents".to_string(),
        }
    }
}

impl ProvisionConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the core name prefix.
    pub fn with_core_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.core_prefix = prefix.into();
        self
    }

    /// Set the configset name.
    pub fn with_config_set(mut self, config_set: impl Into<String>) -> Self {
        self.config_set = config_set.into();
        self
    }
}

/// Creates search cores for new core registry rows.
#[derive(Clone)]
pub struct CoreProvisioner {
    admin: Arc<dyn CoreAdmin>,
    registry: Arc<dyn CoreRegistry>,
    config: ProvisionConfig,
}

impl CoreProvisioner {
    pub fn new(admin: Arc<dyn CoreAdmin>, registry: Arc<dyn CoreRegistry>) -> Self {
        Self {
            admin,
            registry,
            config: ProvisionConfig::default(),
        }
    }

    /// Replace the provisioning config.
    pub fn with_config(mut self, config: ProvisionConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the next free core on the search service and return its
    /// name.
    ///
    /// Numbering starts at the registry row count (soft-deleted rows
    /// included) and probes upward past names that already exist on
    /// the service. Any transport or service failure is an error; the
    /// caller must then reject the registry row, because a core row
    /// without a backing search core corrupts resolution.
    pub async fn provision_core(&self) -> Result<String> {
        let count = self.registry.core_count().await?;

        for number in count..count + MAX_CORE_PROBES {
            let name = format!("{}{}", self.config.core_prefix, number);
            if self.admin.core_exists(&name).await? {
                continue;
            }
            self.admin.create_core(&name, &self.config.config_set).await?;
            info!(core = %name, config_set = %self.config.config_set, "provisioned search core");
            return Ok(name);
        }

        Err(SyncError::SearchServiceRejected {
            status: None,
            message: format!("no free core name after {MAX_CORE_PROBES} probes"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::memory::MemoryRecordStore;
    use crate::testing::MockSearchIndex;

    #[tokio::test]
    async fn first_core_is_number_zero() {
        let admin = Arc::new(MockSearchIndex::new());
        let provisioner = CoreProvisioner::new(admin.clone(), Arc::new(MemoryRecordStore::new()));

        let name = provisioner.provision_core().await.unwrap();

        assert_eq!(name, "docCore0");
        assert_eq!(admin.created_cores(), vec!["docCore0".to_string()]);
    }

    #[tokio::test]
    async fn numbering_continues_from_the_registry_count() {
        let store = MemoryRecordStore::new();
        store.insert_core(1, "docCore0");
        store.insert_core(2, "docCore1");

        let admin = Arc::new(MockSearchIndex::new());
        let provisioner = CoreProvisioner::new(admin, Arc::new(store));

        assert_eq!(provisioner.provision_core().await.unwrap(), "docCore2");
    }

    #[tokio::test]
    async fn existing_service_side_cores_are_skipped() {
        let admin = Arc::new(MockSearchIndex::new().with_existing_core("docCore0"));
        let provisioner = CoreProvisioner::new(admin.clone(), Arc::new(MemoryRecordStore::new()));

        let name = provisioner.provision_core().await.unwrap();

        assert_eq!(name, "docCore1");
        assert_eq!(admin.created_cores(), vec!["docCore1".to_string()]);
    }

    #[tokio::test]
    async fn configured_prefix_and_configset_are_used() {
        let admin = Arc::new(MockSearchIndex::new());
        let provisioner = CoreProvisioner::new(admin.clone(), Arc::new(MemoryRecordStore::new()))
            .with_config(
                ProvisionConfig::new()
                    .with_core_prefix("archive")
                    .with_config_set("archive_docs"),
            );

        assert_eq!(provisioner.provision_core().await.unwrap(), "archive0");
        assert_eq!(
            admin.created_core_configs(),
            vec![("archive0".to_string(), "archive_docs".to_string())]
        );
    }

    #[tokio::test]
    async fn creation_failures_propagate() {
        let admin = Arc::new(MockSearchIndex::new().with_create_core_failure());
        let provisioner = CoreProvisioner::new(admin, Arc::new(MemoryRecordStore::new()));

        assert!(provisioner.provision_core().await.is_err());
    }
}
