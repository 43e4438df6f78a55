//! JSON 编辑预览工具库
//!
//! 提供实时解析管线、影子树构建与复制/下载动作支持
//! 遵循MVVM架构模式，UI层只做薄桥接

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::data_core::{
    parse_source, AppError, DocState, EditorState, ThemeMode, ViewState, SAMPLE_DOCUMENT,
};
pub use model::shadow_tree::{build_shadow_tree, JsonTreeNode, NodeKind};
