//! Assembly store trait definition.
//!
//! This module defines the common interface for publishing backends.

use async_trait::async_trait;

use crate::error::Result;
use crate::synth::Template;

use super::types::PublishRecord;

/// Record file name inside a store.
pub const RECORD_FILE: &str = "record.json";

/// Directory (or key prefix) holding published files.
pub const TEMPLATES_DIR: &str = "templates";

/// Trait for assembly publishing backends.
#[async_trait]
pub trait AssemblyStore: Send + Sync {
    /// Publishes assembly files and the record describing them.
    ///
    /// Files are written before the record, so a readable record always
    /// points at complete templates.
    async fn publish(&self, record: &PublishRecord, files: &[(String, String)]) -> Result<()>;

    /// Loads the last publish record.
    ///
    /// Returns `None` if nothing was published yet.
    async fn load_record(&self) -> Result<Option<PublishRecord>>;

    /// Loads a published template by stack name.
    async fn load_template(&self, stack_name: &str) -> Result<Option<Template>>;

    /// Deletes the record and every published file.
    async fn delete(&self) -> Result<()>;

    /// Checks if a record exists.
    async fn exists(&self) -> Result<bool>;

    /// Gets the backend type name.
    fn backend_type(&self) -> &'static str;
}

#[async_trait]
impl AssemblyStore for Box<dyn AssemblyStore> {
    async fn publish(&self, record: &PublishRecord, files: &[(String, String)]) -> Result<()> {
        (**self).publish(record, files).await
    }

    async fn load_record(&self) -> Result<Option<PublishRecord>> {
        (**self).load_record().await
    }

    async fn load_template(&self, stack_name: &str) -> Result<Option<Template>> {
        (**self).load_template(stack_name).await
    }

    async fn delete(&self) -> Result<()> {
        (**self).delete().await
    }

    async fn exists(&self) -> Result<bool> {
        (**self).exists().await
    }

    fn backend_type(&self) -> &'static str {
        (**self).backend_type()
    }
}
