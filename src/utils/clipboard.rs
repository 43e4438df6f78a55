//! Clipboard  cross-platform clipboard helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
}

/// 将文本复制到系统剪贴板
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

/// 从系统剪贴板获取文本（用于测试）
#[cfg(test)]
pub fn get_clipboard_contents() -> Result<String, ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.get_contents()
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "需要图形环境的剪贴板服务"]
    fn test_clipboard_copy_and_get() {
        let test_text = r#"{"a": 1}"#;

        let copy_result = copy_to_clipboard(test_text);
        assert!(copy_result.is_ok(), "复制到剪贴板应该成功");

        let clipboard_content = get_clipboard_contents().expect("从剪贴板读取应该成功");
        assert_eq!(clipboard_content, test_text, "剪贴板内容应该与复制的文本一致");
    }

    #[test]
    #[ignore = "需要图形环境的剪贴板服务"]
    fn test_clipboard_source_text_verbatim() {
        // 复制源文本动作不做任何规范化，原样传递（包括空白与无效JSON）
        let raw_text = "  {\"a\":1,}  ";

        copy_to_clipboard(raw_text).expect("复制应该成功");
        let clipboard_content = get_clipboard_contents().expect("读取应该成功");
        assert_eq!(clipboard_content, raw_text, "剪贴板应该保留原始文本");
    }
}
