//! S3 / MinIO object storage helpers.

use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};

/// Initialize an S3 client from our config (works with MinIO).
pub fn init_client(s3_config: &ps_common::config::S3Config) -> Client {
    let creds = Credentials::new(
        &s3_config.access_key,
        &s3_config.secret_key,
        None,
        None,
        "ps-server",
    );

    let config = aws_sdk_s3::Config::builder()
        .behavior_version_latest()
        .endpoint_url(&s3_config.endpoint)
        .region(Region::new(s3_config.region.clone()))
        .credentials_provider(creds)
        .force_path_style(true) // Required for MinIO
        .build();

    Client::from_conf(config)
}

/// Ensure a bucket exists, creating it if necessary.
pub async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => {
            tracing::info!(bucket, "S3 bucket already exists");
        }
        Err(_) => {
            client
                .create_bucket()
                .bucket(bucket)
                .send()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create bucket '{}': {}", bucket, e))?;
            tracing::info!(bucket, "S3 bucket created");
        }
    }
    Ok(())
}

/// Upload an object.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    content_type: Option<&str>,
    data: Vec<u8>,
) -> anyhow::Result<()> {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .set_content_type(content_type.map(str::to_string))
        .body(ByteStream::from(data))
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Put object error: {}", e))?;
    Ok(())
}

/// Path-style URL of an object behind `endpoint`.
pub fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
}
