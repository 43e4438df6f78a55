//! EditorState：编辑器核心状态与实时解析管线

use serde_json::Value;
use thiserror::Error;

use crate::model::shadow_tree::{build_shadow_tree, carry_expansion, update_visibility, JsonTreeNode};

/// 启动时装入编辑器的示例文档
pub const SAMPLE_DOCUMENT: &str = r#"{
  "string": "example",
  "number": 42,
  "boolean": true,
  "null": null,
  "array": [1, 2, 3],
  "object": {
    "nested": "value",
    "another": 12
  }
}"#;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 文档状态：三态互斥，由单一枚举保证（不存在"既有结果又有错误"的组合）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DocState {
    /// 源文本为空或全空白
    #[default]
    Empty,
    /// 解析失败，携带唯一一条人类可读诊断
    Error(String),
    /// 解析成功，持有 DOM
    Parsed(Value),
}

/// 输出面板的渲染指令（每次变更后派生，不跨编辑缓存）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Empty,
    Error,
    Tree,
}

/// 主题模式：与文档状态相互独立的状态切片
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// 严格JSON解析：成功返回DOM，失败返回单条诊断消息。纯函数，无副作用。
///
/// 空字符串在本层按普通解析失败处理（EOF诊断），
/// 空白输入的"空态"语义由 [`EditorState::apply_edit`] 负责。
pub fn parse_source(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

/// 编辑器状态束：源文本、文档状态、影子树，三者作为一个整体原子更新
#[derive(Debug, Default)]
pub struct EditorState {
    source_text: String,
    doc: DocState,
    tree_flat: Vec<JsonTreeNode>,
}

impl EditorState {
    /// 以示例文档为初始内容创建状态
    pub fn with_sample_document() -> Self {
        let mut state = Self::default();
        state.apply_edit(SAMPLE_DOCUMENT);
        state
    }

    /// 应用一次编辑：重新解析整个文档并原子更新状态束。
    ///
    /// 空白输入（空串或纯空白）刻意压制解析错误，进入 Empty 态，
    /// 避免"还没开始输入"就报错。
    pub fn apply_edit(&mut self, new_text: &str) {
        if new_text.trim().is_empty() {
            self.source_text = new_text.to_string();
            self.doc = DocState::Empty;
            self.tree_flat.clear();
            return;
        }

        match parse_source(new_text) {
            Ok(dom) => {
                let mut tree = build_shadow_tree(&dom);
                // 折叠状态是界面辅助状态，跨编辑按路径保留
                carry_expansion(&self.tree_flat, &mut tree);
                update_visibility(&mut tree);
                self.source_text = new_text.to_string();
                self.doc = DocState::Parsed(dom);
                self.tree_flat = tree;
            }
            Err(message) => {
                self.source_text = new_text.to_string();
                self.doc = DocState::Error(message);
                self.tree_flat.clear();
            }
        }
    }

    /// 编辑器事件适配：未携带文本的事件整体忽略，不产生任何状态变化
    pub fn on_text_changed(&mut self, new_text: Option<&str>) {
        if let Some(text) = new_text {
            self.apply_edit(text);
        }
    }

    /// 无条件清空（等价于 apply_edit("")），幂等
    pub fn clear(&mut self) {
        self.source_text.clear();
        self.doc = DocState::Empty;
        self.tree_flat.clear();
    }

    /// 切换某个节点的折叠状态并重算可见性；未知路径为无操作。
    /// 不触碰源文本与文档状态。
    pub fn toggle_node_expanded(&mut self, path: &str) {
        if let Some(node) = self.tree_flat.iter_mut().find(|n| n.path == path) {
            node.expanded = !node.expanded;
            update_visibility(&mut self.tree_flat);
        }
    }

    /// 视图投影：从状态束派生输出面板三态之一
    pub fn view_state(&self) -> ViewState {
        match self.doc {
            DocState::Empty => ViewState::Empty,
            DocState::Error(_) => ViewState::Error,
            DocState::Parsed(_) => ViewState::Tree,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn doc(&self) -> &DocState {
        &self.doc
    }

    /// 解析成功时的DOM；Empty/Error 态下为 None
    pub fn parsed(&self) -> Option<&Value> {
        match &self.doc {
            DocState::Parsed(dom) => Some(dom),
            _ => None,
        }
    }

    /// 解析失败时的诊断消息；其余状态下为 None
    pub fn parse_error(&self) -> Option<&str> {
        match &self.doc {
            DocState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// 规范化序列化：2空格缩进、键保持插入顺序。
    /// 仅在 Parsed 态返回内容，供复制/下载动作做守卫。
    pub fn formatted(&self) -> Option<String> {
        self.parsed().and_then(|dom| serde_json::to_string_pretty(dom).ok())
    }

    /// 影子树行（树视图的行模型来源）
    pub fn tree(&self) -> &[JsonTreeNode] {
        &self.tree_flat
    }
}
