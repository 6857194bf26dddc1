//! Publish module for synthesized cloud assemblies.
//!
//! A publication stores every template plus a record with per-stack hashes,
//! locally or in S3, so later runs can tell which stacks changed.

mod store;
mod local;
mod s3;
mod types;

pub use store::{AssemblyStore, RECORD_FILE, TEMPLATES_DIR};
pub use local::{LocalAssemblyStore, PUBLISH_DIR};
pub use s3::S3AssemblyStore;
pub use types::{
    MAX_HISTORY, PublishHistoryEntry, PublishRecord, PublishedStack, RECORD_VERSION, StackChange,
};

use tracing::info;

use crate::error::Result;
use crate::synth::CloudAssembly;

/// Publishes an assembly, carrying over the history of the last record.
///
/// # Errors
///
/// Returns an error if the previous record cannot be read or the files
/// cannot be written.
pub async fn publish_assembly<S>(
    store: &S,
    stack: &str,
    assembly: &CloudAssembly,
) -> Result<PublishRecord>
where
    S: AssemblyStore + ?Sized,
{
    let mut record = PublishRecord::from_assembly(stack, assembly);

    if let Some(previous) = store.load_record().await? {
        let changed = previous.changed_stacks(assembly);
        info!(
            "{} stack(s) changed since publication {}",
            changed.len(),
            previous.id
        );
        record.inherit_history(previous);
    }

    store.publish(&record, &assembly.files()?).await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteSettings;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_republish_keeps_history() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let store = LocalAssemblyStore::with_base_dir(temp.path());
        let assembly = CloudAssembly::synthesize(&SiteSettings {
            domain: Some(String::from("example.com")),
            base_domain: Some(String::from("example.com")),
            owner: Some(String::from("acme")),
            repo: Some(String::from("site")),
            region: Some(String::from("us-east-1")),
            ..SiteSettings::default()
        })
        .expect("Failed to synthesize");

        let first = publish_assembly(&store, "AwsStaticSiteStack", &assembly)
            .await
            .expect("first publish");
        assert!(first.history.is_empty());

        let second = publish_assembly(&store, "AwsStaticSiteStack", &assembly)
            .await
            .expect("second publish");
        assert_eq!(second.history.len(), 1);
        assert_eq!(second.history[0].id, first.id);
        assert!(second.changed_stacks(&assembly).is_empty());
    }
}
