//! 程序入口：初始化日志、装载 Slint UI，并把编辑事件桥接到核心状态

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Instant,
};

use slint::{ComponentHandle, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

slint::include_modules!();

mod model;
mod utils;
mod vm;

use model::data_core::{EditorState, ThemeMode, ViewState};
use model::shadow_tree::JsonTreeNode;
use vm::bridge::*;

// TreeRowData转换实现
impl From<&JsonTreeNode> for TreeRowData {
    /// 将Rust影子树节点转换为Slint可用的行数据
    fn from(node: &JsonTreeNode) -> Self {
        Self {
            name: node.name.clone().into(),
            path: node.path.clone().into(),
            kind: format!("{:?}", node.kind).into(), // Object/Array/String等
            preview: node.preview.clone().into(),
            depth: node.depth as i32,
            children: node.children as i32,
            expanded: node.expanded,
        }
    }
}

/// VM桥接器：管理UI与核心状态的交互
struct ViewModelBridge {
    app_state: Rc<RefCell<EditorState>>,
    // 主题与文档状态相互独立，单独持有
    theme: Rc<Cell<ThemeMode>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, app_state: Rc<RefCell<EditorState>>) -> Self {
        let bridge = Self {
            app_state,
            theme: Rc::new(Cell::new(ThemeMode::default())),
        };

        // 绑定所有UI回调
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        let app_state = self.app_state.clone();

        // === 编辑事件回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_source_edited(move |text| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_source_edited(&app_window, &app_state, &text);
                }
            });
        }

        // === 打开文件回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_file_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_open_file(&app_window, &app_state);
                }
            });
        }

        // === 复制源文本回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_source_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy_source(&app_window, &app_state);
                }
            });
        }

        // === 清空回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_clear_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_clear(&app_window, &app_state);
                }
            });
        }

        // === 复制格式化结果回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_copy_result_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_copy_result(&app_window, &app_state);
                }
            });
        }

        // === 下载格式化结果回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_download_result_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_download_result(&app_window, &app_state);
                }
            });
        }

        // === 主题切换回调 ===
        {
            let theme = self.theme.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_theme_pressed(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_toggle_theme(&app_window, &theme);
                }
            });
        }

        // === 节点展开/折叠回调 ===
        {
            let app_state = app_state.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_toggle_node_expanded(move |node_path| {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_toggle_node_expanded(&app_window, &app_state, &node_path);
                }
            });
        }
    }

    /// 初始化UI状态：编辑器装入当前源文本，输出面板按状态投影
    fn initialize_ui(&self, app_window: &AppWindow) {
        app_window.set_source_text(self.app_state.borrow().source_text().into());
        app_window.set_dark_mode(self.theme.get() == ThemeMode::Dark);
        app_window.set_performance_info("".into());
        Self::refresh_output(app_window, &self.app_state);
        app_window.set_status_message(STATUS_READY.into());
    }

    /// 视图投影：把状态束映射为输出面板的三态之一（每次变更后整体重算）
    fn refresh_output(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let state = app_state.borrow();
        match state.view_state() {
            ViewState::Empty => {
                app_window.set_tree_model(ModelRc::new(VecModel::<TreeRowData>::default()));
                app_window.set_error_text("".into());
                app_window.set_view_state(VIEW_EMPTY.into());
                app_window.set_result_actions_enabled(false);
            }
            ViewState::Error => {
                app_window.set_tree_model(ModelRc::new(VecModel::<TreeRowData>::default()));
                // 错误消息原样渲染
                app_window.set_error_text(state.parse_error().unwrap_or_default().into());
                app_window.set_view_state(VIEW_ERROR.into());
                app_window.set_result_actions_enabled(false);
            }
            ViewState::Tree => {
                let rows: Vec<TreeRowData> = state
                    .tree()
                    .iter()
                    .filter(|node| node.visible)
                    .map(TreeRowData::from)
                    .collect();
                app_window.set_tree_model(ModelRc::new(VecModel::from(rows)));
                app_window.set_error_text("".into());
                app_window.set_view_state(VIEW_TREE.into());
                app_window.set_result_actions_enabled(true);
            }
        }
    }

    /// 处理编辑事件：同步重新解析并刷新输出面板
    fn handle_source_edited(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<EditorState>>,
        text: &str,
    ) {
        let start_time = Instant::now();
        app_state.borrow_mut().apply_edit(text);
        let parse_duration = start_time.elapsed();

        Self::refresh_output(app_window, app_state);

        let (status, node_count) = {
            let state = app_state.borrow();
            let status = match state.view_state() {
                ViewState::Tree => STATUS_PARSED,
                ViewState::Error => STATUS_PARSE_FAILED,
                ViewState::Empty => STATUS_EMPTY_DOC,
            };
            (status, state.tree().len())
        };
        app_window.set_status_message(status.into());

        let perf_info = format!(
            "解析: {:.2}ms | 节点: {}",
            parse_duration.as_secs_f64() * 1000.0,
            node_count
        );
        app_window.set_performance_info(perf_info.into());

        tracing::debug!(
            "编辑处理完成: {} 字符，{} 个节点，耗时: {:.2}ms",
            text.len(),
            node_count,
            parse_duration.as_secs_f64() * 1000.0
        );
    }

    /// 处理打开文件：原始文本直接进入常规编辑管线
    fn handle_open_file(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let file_path = rfd::FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .add_filter("所有文件", &["*"])
            .set_title("选择要打开的JSON文件")
            .pick_file();

        let Some(path) = file_path else {
            tracing::info!("用户取消了文件选择");
            return;
        };

        match utils::fs::read_text_file(&path) {
            Ok(content) => {
                app_window.set_source_text(content.as_str().into());
                Self::handle_source_edited(app_window, app_state, &content);
                tracing::info!("文件已装入编辑器: {}", path.display());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("文件读取失败: {}", e);
            }
        }
    }

    /// 复制源文本：始终可用，原样复制（包括空文本与无效JSON）
    fn handle_copy_source(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let text = app_state.borrow().source_text().to_string();

        match utils::clipboard::copy_to_clipboard(&text) {
            Ok(()) => {
                app_window.set_status_message(STATUS_COPIED.into());
                tracing::info!("源文本已复制，长度: {} 字符", text.len());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    /// 复制格式化结果：仅在解析成功时可用，否则无操作
    fn handle_copy_result(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let Some(formatted) = app_state.borrow().formatted() else {
            tracing::debug!("无已解析文档，忽略复制结果请求");
            return;
        };

        match utils::clipboard::copy_to_clipboard(&formatted) {
            Ok(()) => {
                app_window.set_status_message(STATUS_COPIED.into());
                tracing::info!("格式化结果已复制，长度: {} 字符", formatted.len());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("复制失败: {}", e);
            }
        }
    }

    /// 清空：两个面板同时回到空态
    fn handle_clear(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        app_state.borrow_mut().clear();
        app_window.set_source_text("".into());
        Self::refresh_output(app_window, app_state);
        app_window.set_performance_info("".into());
        app_window.set_status_message(STATUS_CLEARED.into());
        tracing::info!("文档已清空");
    }

    /// 下载格式化结果：仅在解析成功时可用，经由原生保存对话框写出
    fn handle_download_result(app_window: &AppWindow, app_state: &Rc<RefCell<EditorState>>) {
        let Some(formatted) = app_state.borrow().formatted() else {
            tracing::debug!("无已解析文档，忽略下载请求");
            return;
        };

        let file_path = rfd::FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .set_file_name(DOWNLOAD_FILE_NAME)
            .set_title("保存格式化结果")
            .save_file();

        let Some(path) = file_path else {
            tracing::info!("用户取消了保存");
            return;
        };

        match utils::fs::write_text_file(&path, &formatted) {
            Ok(()) => {
                let success_msg = format!("{}{}", STATUS_SAVED_PREFIX, path.display());
                app_window.set_status_message(success_msg.into());
                tracing::info!("格式化结果已保存: {}", path.display());
            }
            Err(e) => {
                let error_msg = format!("{}{}", STATUS_ERROR_PREFIX, e);
                app_window.set_status_message(error_msg.into());
                tracing::error!("文件保存失败: {}", e);
            }
        }
    }

    /// 主题切换：只翻转主题切片，文档状态不受影响
    fn handle_toggle_theme(app_window: &AppWindow, theme: &Rc<Cell<ThemeMode>>) {
        let next = theme.get().toggled();
        theme.set(next);
        app_window.set_dark_mode(next == ThemeMode::Dark);

        let mode_text = match next {
            ThemeMode::Dark => "深色",
            ThemeMode::Light => "浅色",
        };
        app_window.set_status_message(format!("已切换到{}主题", mode_text).into());
        tracing::info!("主题切换: {:?}", next);
    }

    /// 处理节点展开/折叠切换
    fn handle_toggle_node_expanded(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<EditorState>>,
        node_path: &str,
    ) {
        app_state.borrow_mut().toggle_node_expanded(node_path);
        Self::refresh_output(app_window, app_state);

        let (node_name, expanded) = {
            let state = app_state.borrow();
            state
                .tree()
                .iter()
                .find(|n| n.path == node_path)
                .map(|n| (n.name.clone(), n.expanded))
                .unwrap_or_default()
        };
        let action = if expanded { "展开" } else { "折叠" };
        app_window.set_status_message(format!("{}: {}", action, node_name).into());
        tracing::debug!("节点{}切换: {}", action, node_path);
    }
}

fn main() -> anyhow::Result<()> {
    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .try_init();

    let app = AppWindow::new().map_err(|e| anyhow::anyhow!("UI 初始化失败: {e}"))?;
    let state = Rc::new(RefCell::new(EditorState::with_sample_document()));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, state);
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run().map_err(|e| anyhow::anyhow!("事件循环异常退出: {e}"))?;
    Ok(())
}
