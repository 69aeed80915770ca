//! Reading the picked file at upload time

use snomed_mapper_common::UploadFile;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

/// Name and bytes of a browser `File`
pub async fn read_upload(file: &File) -> Result<UploadFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("{:?}", e))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(UploadFile::new(file.name(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn browser_file(name: &str, bytes: &[u8]) -> File {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        File::new_with_u8_array_sequence(&parts, name).unwrap()
    }

    #[wasm_bindgen_test]
    async fn test_read_upload_returns_name_and_bytes() {
        let file = browser_file("tariffs.xlsx", b"PK\x03\x04");
        let upload = read_upload(&file).await.unwrap();
        assert_eq!(upload.name, "tariffs.xlsx");
        assert_eq!(upload.bytes, b"PK\x03\x04");
    }
}
