//! Input adapters: turn an uploaded file into text or an image payload for
//! the extraction service.

pub mod image;
pub mod pdf;
pub mod spreadsheet;

pub use image::{image_mime_type, ImagePayload};
pub use pdf::pdf_to_text;
pub use spreadsheet::{sheets_to_text, CalamineDecoder, Sheet, SpreadsheetDecoder};

use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{QuoteError, Result};

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "ods"];
const UNSUPPORTED_EXTENSIONS: [&str; 7] = ["doc", "docx", "hwp", "ppt", "pptx", "zip", "exe"];

/// What the extraction service receives for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptedContent {
    Text(String),
    Image(ImagePayload),
    /// Several page images of one document
    Images(Vec<ImagePayload>),
}

impl AdaptedContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AdaptedContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdaptedContent::Text(_) => "text",
            AdaptedContent::Image(_) => "image",
            AdaptedContent::Images(_) => "images",
        }
    }

    /// `content` object of a relay request: `{text}`, `{inlineData}` or `{images}`.
    pub fn to_relay_content(&self) -> Value {
        match self {
            AdaptedContent::Text(text) => json!({ "text": text }),
            AdaptedContent::Image(image) => json!({ "inlineData": image }),
            AdaptedContent::Images(images) => json!({ "images": images }),
        }
    }
}

/// Dispatches files to the right decoder by extension.
#[derive(Debug, Clone)]
pub struct InputAdapter {
    spreadsheet: Arc<dyn SpreadsheetDecoder>,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::new(Arc::new(CalamineDecoder))
    }
}

impl InputAdapter {
    pub fn new(spreadsheet: Arc<dyn SpreadsheetDecoder>) -> Self {
        Self { spreadsheet }
    }

    /// Adapt in-memory file contents. `file_name` selects the decoder.
    pub fn adapt_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<AdaptedContent> {
        let extension = extension_of(file_name);
        debug!(
            target: "travel_quote::adapter",
            file = file_name,
            extension = %extension,
            bytes = bytes.len(),
            "adapting input file"
        );

        if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            let sheets = self.spreadsheet.decode(bytes).map_err(|err| {
                warn!(target: "travel_quote::adapter", file = file_name, error = %err, "spreadsheet decode failed");
                QuoteError::input(file_name, format!("엑셀 파일 변환 실패: {err}"))
            })?;
            return Ok(AdaptedContent::Text(sheets_to_text(file_name, &sheets)));
        }

        if extension == "pdf" {
            return pdf_to_text(file_name, bytes).map(AdaptedContent::Text);
        }

        if let Some(mime_type) = image_mime_type(&extension) {
            if bytes.is_empty() {
                return Err(QuoteError::input(
                    file_name,
                    "파일 내용을 읽을 수 없습니다.",
                ));
            }
            return Ok(AdaptedContent::Image(ImagePayload::encode(bytes, mime_type)));
        }

        if UNSUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(QuoteError::UnsupportedFormat(file_name.to_string()));
        }

        Ok(AdaptedContent::Text(
            String::from_utf8_lossy(bytes).into_owned(),
        ))
    }

    /// Read and adapt a file. Decoding runs on the blocking pool.
    pub async fn adapt_path(&self, path: &Path) -> Result<AdaptedContent> {
        let file_name = display_name(path);
        let bytes = read_file(path, &file_name).await?;

        let adapter = self.clone();
        tokio::task::spawn_blocking(move || adapter.adapt_bytes(&file_name, &bytes))
            .await
            .map_err(|err| QuoteError::input(display_name(path), err.to_string()))?
    }

    /// Adapt several page images of a single document.
    pub async fn adapt_image_pages(&self, paths: &[&Path]) -> Result<AdaptedContent> {
        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            let file_name = display_name(path);
            let mime_type = image_mime_type(&extension_of(&file_name))
                .ok_or_else(|| QuoteError::UnsupportedFormat(file_name.clone()))?;
            let bytes = read_file(path, &file_name).await?;
            pages.push(ImagePayload::encode(&bytes, mime_type));
        }
        if pages.is_empty() {
            return Err(QuoteError::input("<none>", "변환할 이미지가 없습니다."));
        }
        Ok(AdaptedContent::Images(pages))
    }
}

async fn read_file(path: &Path, file_name: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|err| {
        warn!(target: "travel_quote::adapter", file = file_name, error = %err, "read failed");
        let message = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                "파일을 읽을 수 없습니다. 파일이 다른 프로그램(Excel 등)에서 열려있는지 확인하고 닫은 후 다시 시도해주세요.".to_string()
            }
            _ => format!("파일 읽기 실패: {err}"),
        };
        QuoteError::input(file_name, message)
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
