//! Local file-based assembly store.
//!
//! Publications land in a directory next to the settings file, which is
//! enough for a single machine and for tests.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{PublishError, Result, SiteStackError};
use crate::synth::Template;

use super::store::{AssemblyStore, RECORD_FILE, TEMPLATES_DIR};
use super::types::PublishRecord;

/// Default publish directory name.
pub const PUBLISH_DIR: &str = ".sitestack";

/// Local file-based assembly store.
#[derive(Debug)]
pub struct LocalAssemblyStore {
    /// Base directory for published files.
    base_dir: PathBuf,
    /// Path to the record file.
    record_path: PathBuf,
    /// Directory holding templates.
    templates_dir: PathBuf,
}

impl LocalAssemblyStore {
    /// Creates a store in `.sitestack/` under the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> Result<Self> {
        let base_dir = std::env::current_dir()
            .map_err(|e| SiteStackError::internal(format!("Cannot determine current directory: {e}")))?
            .join(PUBLISH_DIR);

        Ok(Self::with_base_dir(base_dir))
    }

    /// Creates a store with a custom base directory.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let record_path = base_dir.join(RECORD_FILE);
        let templates_dir = base_dir.join(TEMPLATES_DIR);

        Self {
            base_dir,
            record_path,
            templates_dir,
        }
    }

    /// Writes a file through a temporary sibling and renames it in place.
    async fn write_atomic(&self, path: PathBuf, content: &str) -> Result<()> {
        let temp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            PublishError::local(format!("Failed to create {}: {e}", temp_path.display()))
        })?;
        file.write_all(content.as_bytes()).await.map_err(|e| {
            PublishError::local(format!("Failed to write {}: {e}", temp_path.display()))
        })?;
        file.sync_all().await.map_err(|e| {
            PublishError::local(format!("Failed to sync {}: {e}", temp_path.display()))
        })?;

        fs::rename(&temp_path, &path).await.map_err(|e| {
            PublishError::local(format!("Failed to rename {}: {e}", path.display()))
        })?;
        Ok(())
    }
}

#[async_trait]
impl AssemblyStore for LocalAssemblyStore {
    async fn publish(&self, record: &PublishRecord, files: &[(String, String)]) -> Result<()> {
        if !self.templates_dir.exists() {
            debug!("Creating publish directory: {}", self.templates_dir.display());
            fs::create_dir_all(&self.templates_dir).await.map_err(|e| {
                PublishError::local(format!("Failed to create publish directory: {e}"))
            })?;
        }

        for (name, content) in files {
            self.write_atomic(self.templates_dir.join(name), content).await?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            PublishError::serialization(format!("Failed to serialize record: {e}"))
        })?;
        self.write_atomic(self.record_path.clone(), &content).await?;

        info!(
            "Published {} file(s) to {}",
            files.len(),
            self.base_dir.display()
        );
        Ok(())
    }

    async fn load_record(&self) -> Result<Option<PublishRecord>> {
        if !self.record_path.exists() {
            debug!("Record file does not exist: {}", self.record_path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.record_path).await.map_err(|e| {
            PublishError::Corrupted {
                message: format!("Failed to read record file: {e}"),
            }
        })?;

        let record: PublishRecord = serde_json::from_str(&content).map_err(|e| {
            PublishError::Corrupted {
                message: format!("Failed to parse record file: {e}"),
            }
        })?;

        Ok(Some(record))
    }

    async fn load_template(&self, stack_name: &str) -> Result<Option<Template>> {
        let Some(record) = self.load_record().await? else {
            return Ok(None);
        };
        let Some(stack) = record.stacks.get(stack_name) else {
            return Ok(None);
        };

        let path = self.templates_dir.join(&stack.template_file);
        let content = fs::read_to_string(&path).await.map_err(|e| PublishError::Corrupted {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;

        let template = serde_json::from_str(&content).map_err(|e| PublishError::Corrupted {
            message: format!("Failed to parse {}: {e}", path.display()),
        })?;

        Ok(Some(template))
    }

    async fn delete(&self) -> Result<()> {
        if self.record_path.exists() {
            info!("Deleting record file: {}", self.record_path.display());
            fs::remove_file(&self.record_path).await.map_err(|e| {
                PublishError::local(format!("Failed to delete record file: {e}"))
            })?;
        }

        if self.templates_dir.exists() {
            fs::remove_dir_all(&self.templates_dir).await.map_err(|e| {
                PublishError::local(format!("Failed to delete templates: {e}"))
            })?;
        }

        Ok(())
    }

    async fn exists(&self) -> Result<bool> {
        Ok(self.record_path.exists())
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteSettings;
    use crate::synth::CloudAssembly;
    use tempfile::TempDir;

    fn create_test_store() -> (LocalAssemblyStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = LocalAssemblyStore::with_base_dir(temp_dir.path());
        (store, temp_dir)
    }

    fn assembly() -> CloudAssembly {
        CloudAssembly::synthesize(&SiteSettings {
            domain: Some(String::from("example.com")),
            base_domain: Some(String::from("example.com")),
            owner: Some(String::from("acme")),
            repo: Some(String::from("site")),
            add_cloudfront: true,
            ..SiteSettings::default()
        })
        .expect("Failed to synthesize")
    }

    #[tokio::test]
    async fn test_publish_and_load() {
        let (store, _temp) = create_test_store();
        let assembly = assembly();
        let record = PublishRecord::from_assembly("AwsStaticSiteStack", &assembly);

        store
            .publish(&record, &assembly.files().expect("files"))
            .await
            .expect("Failed to publish");

        let loaded = store
            .load_record()
            .await
            .expect("Failed to load record")
            .expect("Record should exist");
        assert_eq!(loaded, record);

        let template = store
            .load_template("AwsStaticSiteStackWaf")
            .await
            .expect("Failed to load template")
            .expect("Template should exist");
        assert_eq!(Some(&template), assembly.stack("AwsStaticSiteStackWaf").map(|s| &s.template));
    }

    #[tokio::test]
    async fn test_load_nonexistent() {
        let (store, _temp) = create_test_store();

        assert!(store.load_record().await.expect("Load should not fail").is_none());
        assert!(store
            .load_template("AwsStaticSiteStackMain")
            .await
            .expect("Load should not fail")
            .is_none());
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let (store, temp) = create_test_store();
        let assembly = assembly();
        let record = PublishRecord::from_assembly("AwsStaticSiteStack", &assembly);

        assert!(!store.exists().await.expect("exists check failed"));
        store
            .publish(&record, &assembly.files().expect("files"))
            .await
            .expect("Failed to publish");
        assert!(store.exists().await.expect("exists check failed"));

        store.delete().await.expect("Failed to delete");
        assert!(!store.exists().await.expect("exists check failed"));
        assert!(!temp.path().join(TEMPLATES_DIR).exists());
    }

    #[tokio::test]
    async fn test_corrupted_record() {
        let (store, temp) = create_test_store();
        std::fs::write(temp.path().join(RECORD_FILE), "not json").expect("write");

        let result = store.load_record().await;
        assert!(matches!(
            result,
            Err(SiteStackError::Publish(PublishError::Corrupted { .. }))
        ));
    }
}
