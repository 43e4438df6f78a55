//! VM桥接层：连接Slint UI与EditorState数据模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_PARSED: &str = "解析成功";
pub const STATUS_PARSE_FAILED: &str = "解析失败";
pub const STATUS_EMPTY_DOC: &str = "文档为空";
pub const STATUS_COPIED: &str = "已复制到剪贴板";
pub const STATUS_CLEARED: &str = "已清空";
pub const STATUS_SAVED_PREFIX: &str = "已保存到: ";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";

// 输出面板三态（与 ui/app_window.slint 的 view-state 约定一致）
pub const VIEW_EMPTY: &str = "empty";
pub const VIEW_ERROR: &str = "error";
pub const VIEW_TREE: &str = "tree";

/// 下载动作的默认文件名
pub const DOWNLOAD_FILE_NAME: &str = "formatted.json";
