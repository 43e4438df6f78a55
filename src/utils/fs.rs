//! IO helper: text file read/write for the editor

use std::{fs, path::Path};

use crate::model::data_core::AppError;

/// 读取文件原始文本（统一走编辑管线，是否合法JSON由解析层判断）
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    Ok(fs::read_to_string(p)?)
}

/// 将格式化结果以UTF-8文本写入文件
pub fn write_text_file(p: &Path, content: &str) -> Result<(), AppError> {
    fs::write(p, content)?;
    Ok(())
}
