use tracing::{debug, warn};

use crate::error::{QuoteError, Result};

/// Extract the text layer of a PDF and prefix it with a document header.
pub fn pdf_to_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    let body = pdf_extract::extract_text_from_mem(bytes).map_err(|err| {
        warn!(target: "travel_quote::adapter", file = file_name, error = %err, "pdf-extract failed");
        QuoteError::input(
            file_name,
            "PDF에서 텍스트를 추출하는 중 오류가 발생했습니다. (암호화된 파일인지 확인해주세요)",
        )
    })?;

    debug!(
        target: "travel_quote::adapter",
        file = file_name,
        chars = body.chars().count(),
        "extracted PDF text"
    );
    Ok(format!("--- PDF DOCUMENT: {file_name} ---\n{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_pdf_is_an_adapter_error() {
        let err = pdf_to_text("broken.pdf", b"%PDF-1.4 garbage").unwrap_err();
        assert_eq!(err.error_code(), "INPUT_ADAPTER_ERROR");
        assert!(err.user_message().contains("암호화"));
    }
}
