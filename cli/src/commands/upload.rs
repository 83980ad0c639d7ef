//! Media uploads.

use std::path::PathBuf;

use anyhow::Result;
use newsdesk_shared::{normalize::decode_list, Media};

use super::{api_failure, print_json, Context};
use crate::utils;

/// Upload every file in one multipart request and print the stored media.
pub async fn run(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    let mut uploads = files
        .iter()
        .map(|path| utils::read_upload(path))
        .collect::<Result<Vec<_>>>()?;
    let total_bytes: usize = uploads.iter().map(|file| file.bytes.len()).sum();
    tracing::info!("uploading {} file(s), {total_bytes} bytes", uploads.len());

    let response = match uploads.len() {
        1 => {
            let file = uploads.remove(0);
            ctx.api.uploads().upload_image(file).await
        },
        _ => ctx.api.uploads().upload_multiple(uploads).await,
    }
    .map_err(api_failure)?;

    let (media, _) = decode_list::<Media>(response.body)?;
    print_json(&media)
}
