//! S3-based assembly store.
//!
//! Publishes templates under `<prefix>templates/` and the record at
//! `<prefix>record.json`, so a team shares one view of what was deployed.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use crate::error::{PublishError, Result};
use crate::synth::Template;

use super::store::{AssemblyStore, RECORD_FILE, TEMPLATES_DIR};
use super::types::PublishRecord;

/// S3-based assembly store.
#[derive(Debug)]
pub struct S3AssemblyStore {
    /// S3 client.
    client: Client,
    /// Bucket name.
    bucket: String,
    /// Key prefix, empty or ending in `/`.
    prefix: String,
}

impl S3AssemblyStore {
    /// Creates a store, loading AWS configuration from the environment.
    pub async fn new(bucket: &str, prefix: Option<&str>, region: Option<&str>) -> Self {
        let config = if let Some(region) = region {
            aws_config::from_env()
                .region(aws_config::Region::new(region.to_string()))
                .load()
                .await
        } else {
            aws_config::load_from_env().await
        };

        Self::with_client(Client::new(&config), bucket, prefix)
    }

    /// Creates a store with an existing client.
    #[must_use]
    pub fn with_client(client: Client, bucket: &str, prefix: Option<&str>) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            prefix: normalize_prefix(prefix),
        }
    }

    fn key(&self, file: &str) -> String {
        format!("{}{file}", self.prefix)
    }

    fn template_key(&self, file: &str) -> String {
        self.key(&format!("{TEMPLATES_DIR}/{file}"))
    }

    async fn get_object(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(response) => {
                let bytes = response.body.collect().await.map_err(|e| {
                    PublishError::s3(format!("Failed to read S3 object: {e}"))
                })?;

                let content = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    PublishError::Corrupted {
                        message: format!("Invalid UTF-8 in S3 object: {e}"),
                    }
                })?;

                Ok(Some(content))
            }
            Err(sdk_err) => {
                let service_err = sdk_err.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(PublishError::s3(format!("S3 get error: {service_err}")).into())
                }
            }
        }
    }

    async fn put_object(&self, key: &str, content: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(content.as_bytes().to_vec().into())
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| PublishError::s3(format!("S3 put error: {e}")))?;

        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| PublishError::s3(format!("S3 delete error: {e}")))?;

        Ok(())
    }

    async fn object_exists(&self, key: &str) -> Result<bool> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(sdk_err) => {
                let service_err = sdk_err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(PublishError::s3(format!("S3 head error: {service_err}")).into())
                }
            }
        }
    }
}

#[async_trait]
impl AssemblyStore for S3AssemblyStore {
    async fn publish(&self, record: &PublishRecord, files: &[(String, String)]) -> Result<()> {
        for (name, content) in files {
            let key = self.template_key(name);
            debug!("Uploading s3://{}/{key}", self.bucket);
            self.put_object(&key, content).await?;
        }

        let content = serde_json::to_string_pretty(record).map_err(|e| {
            PublishError::serialization(format!("Failed to serialize record: {e}"))
        })?;
        let key = self.key(RECORD_FILE);
        self.put_object(&key, &content).await?;

        info!(
            "Published {} file(s) to s3://{}/{}",
            files.len(),
            self.bucket,
            self.prefix
        );
        Ok(())
    }

    async fn load_record(&self) -> Result<Option<PublishRecord>> {
        let key = self.key(RECORD_FILE);
        debug!("Loading record from s3://{}/{key}", self.bucket);

        let Some(json) = self.get_object(&key).await? else {
            debug!("No record found in S3");
            return Ok(None);
        };

        let record: PublishRecord =
            serde_json::from_str(&json).map_err(|e| PublishError::Corrupted {
                message: format!("Failed to parse record: {e}"),
            })?;

        info!("Loaded record {} for {}", record.id, record.stack);
        Ok(Some(record))
    }

    async fn load_template(&self, stack_name: &str) -> Result<Option<Template>> {
        let Some(record) = self.load_record().await? else {
            return Ok(None);
        };
        let Some(stack) = record.stacks.get(stack_name) else {
            return Ok(None);
        };

        let key = self.template_key(&stack.template_file);
        let Some(json) = self.get_object(&key).await? else {
            return Err(PublishError::Corrupted {
                message: format!("Record lists {key} but the object is missing"),
            }
            .into());
        };

        let template = serde_json::from_str(&json).map_err(|e| PublishError::Corrupted {
            message: format!("Failed to parse {key}: {e}"),
        })?;
        Ok(Some(template))
    }

    async fn delete(&self) -> Result<()> {
        let Some(record) = self.load_record().await? else {
            return Ok(());
        };

        info!("Deleting publication {} from s3://{}", record.id, self.bucket);

        for stack in record.stacks.values() {
            self.delete_object(&self.template_key(&stack.template_file))
                .await?;
        }
        self.delete_object(&self.template_key(crate::synth::MANIFEST_FILE))
            .await?;
        self.delete_object(&self.key(RECORD_FILE)).await?;

        Ok(())
    }

    async fn exists(&self) -> Result<bool> {
        self.object_exists(&self.key(RECORD_FILE)).await
    }

    fn backend_type(&self) -> &'static str {
        "s3"
    }
}

/// Normalizes a key prefix to be empty or end in exactly one `/`.
fn normalize_prefix(prefix: Option<&str>) -> String {
    prefix
        .map(|p| {
            let p = p.trim_matches('/');
            if p.is_empty() {
                String::new()
            } else {
                format!("{p}/")
            }
        })
        .unwrap_or_default()
}
