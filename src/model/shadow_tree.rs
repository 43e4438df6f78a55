//! 影子树（Shadow Tree）：把解析后的 DOM 摊平成可供树视图直接消费的行列表

use std::collections::HashMap;

use serde_json::Value;

/// JSON 节点类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

#[derive(Debug, Clone)]
pub struct JsonTreeNode {
    /// 节点在父级中的键名或索引的字符串形式
    pub name: String,
    /// JSONPath 风格路径（节点的稳定标识，用于折叠状态携带）
    pub path: String,
    /// 节点类型
    pub kind: NodeKind,
    /// 子元素数量（对象字段数 / 数组长度）
    pub children: u32,
    /// 轻量预览（字符串截断、数字/布尔/空的简短描述）
    pub preview: String,
    /// 节点深度（用于UI缩进显示）
    pub depth: u32,
    /// 是否展开（初始全部展开）
    pub expanded: bool,
    /// 是否可见（由祖先的展开状态决定）
    pub visible: bool,
}

/// 从根 Value 按 DFS 顺序构建全树影子索引
pub fn build_shadow_tree(root: &Value) -> Vec<JsonTreeNode> {
    let mut out = Vec::with_capacity(64);
    fn kind_of(v: &Value) -> NodeKind {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }
    fn preview_of(v: &Value) -> String {
        match v {
            Value::String(s) => {
                if s.chars().count() > 32 {
                    let truncated: String = s.chars().take(32).collect();
                    format!("\"{}...\"", truncated)
                } else {
                    format!("\"{}\"", s)
                }
            }
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
            Value::Object(m) => format!("{{..}} ({} keys)", m.len()),
            Value::Array(a) => format!("[..] ({} items)", a.len()),
        }
    }
    fn push_node(out: &mut Vec<JsonTreeNode>, name: String, path: String, v: &Value, depth: u32) {
        let children = match v {
            Value::Object(m) => m.len() as u32,
            Value::Array(a) => a.len() as u32,
            _ => 0,
        };
        out.push(JsonTreeNode {
            name,
            path,
            kind: kind_of(v),
            children,
            preview: preview_of(v),
            depth,
            expanded: true, // 初始全部展开
            visible: true,
        });
    }
    fn walk(out: &mut Vec<JsonTreeNode>, v: &Value, path: &str, name: &str, depth: u32) {
        push_node(out, name.to_string(), path.to_string(), v, depth);
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    // 字段名含特殊字符时使用 bracket-notation，保证路径无歧义
                    let field_path = if k.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        format!("{}.{}", path, k)
                    } else {
                        format!("{}['{}']", path, k.replace('\'', "\\'"))
                    };
                    walk(out, child, &field_path, k, depth + 1);
                }
            }
            Value::Array(arr) => {
                for (idx, child) in arr.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, idx);
                    walk(out, child, &item_path, &format!("[{}]", idx), depth + 1);
                }
            }
            _ => {}
        }
    }

    walk(&mut out, root, "$", "$", 0);
    out
}

/// 把旧树的折叠状态按路径携带到新树；路径不存在的新节点保持默认展开
pub fn carry_expansion(old: &[JsonTreeNode], tree: &mut [JsonTreeNode]) {
    if old.is_empty() {
        return;
    }
    let expanded_by_path: HashMap<&str, bool> =
        old.iter().map(|n| (n.path.as_str(), n.expanded)).collect();
    for node in tree.iter_mut() {
        if let Some(expanded) = expanded_by_path.get(node.path.as_str()) {
            node.expanded = *expanded;
        }
    }
}

/// 根据展开状态重算可见性：根节点总是可见，子节点仅当父节点展开且可见
pub fn update_visibility(tree: &mut [JsonTreeNode]) {
    for (i, node) in tree.iter_mut().enumerate() {
        node.visible = i == 0;
    }
    // DFS 顺序保证父节点先于子节点处理
    for i in 0..tree.len() {
        if tree[i].expanded && tree[i].visible {
            let parent_depth = tree[i].depth;
            for j in (i + 1)..tree.len() {
                if tree[j].depth == parent_depth + 1 {
                    tree[j].visible = true;
                } else if tree[j].depth <= parent_depth {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_object_shadow_tree() {
        let json = json!({
            "name": "测试",
            "age": 30
        });

        let tree = build_shadow_tree(&json);

        // 应该有3个节点：根、name、age
        assert_eq!(tree.len(), 3);

        // 检查根节点
        assert_eq!(tree[0].name, "$");
        assert_eq!(tree[0].path, "$");
        assert_eq!(tree[0].kind, NodeKind::Object);
        assert_eq!(tree[0].children, 2);

        // 插入顺序保持：name 在 age 之前
        assert_eq!(tree[1].path, "$.name");
        assert_eq!(tree[2].path, "$.age");
    }

    #[test]
    fn test_initial_state_fully_expanded_and_visible() {
        let json = json!({
            "user": {
                "profile": {
                    "name": "张三"
                }
            }
        });

        let tree = build_shadow_tree(&json);

        assert!(tree.iter().all(|n| n.expanded), "初始状态应该全部展开");
        assert!(tree.iter().all(|n| n.visible), "初始状态应该全部可见");
    }

    #[test]
    fn test_array_shadow_tree() {
        let json = json!({
            "items": [
                "第一项",
                {"id": 1},
                [1, 2, 3]
            ]
        });

        let tree = build_shadow_tree(&json);

        // 检查数组路径生成
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert!(paths.contains(&"$"));
        assert!(paths.contains(&"$.items"));
        assert!(paths.contains(&"$.items[0]"));
        assert!(paths.contains(&"$.items[1]"));
        assert!(paths.contains(&"$.items[1].id"));
        assert!(paths.contains(&"$.items[2]"));
        assert!(paths.contains(&"$.items[2][0]"));
        assert!(paths.contains(&"$.items[2][1]"));
        assert!(paths.contains(&"$.items[2][2]"));
    }

    #[test]
    fn test_special_characters_in_keys() {
        let json = json!({
            "normal_key": "value1",
            "key with spaces": "value2",
            "key-with-dashes": "value3",
            "key.with.dots": "value4",
            "key'with'quotes": "value5"
        });

        let tree = build_shadow_tree(&json);

        // 检查特殊字符的路径处理
        let paths: Vec<&str> = tree.iter().map(|n| n.path.as_str()).collect();
        assert!(paths.contains(&"$.normal_key"));
        assert!(paths.contains(&"$['key with spaces']"));
        assert!(paths.contains(&"$['key-with-dashes']"));
        assert!(paths.contains(&"$['key.with.dots']"));
        assert!(paths.contains(&"$['key\\'with\\'quotes']"));
    }

    #[test]
    fn test_node_preview_generation() {
        let json = json!({
            "short_string": "短文本",
            "long_string": "这是一个非常长的字符串，应该被截断以便在预览中显示，不应该显示完整内容",
            "number": 42,
            "boolean": true,
            "null_value": null,
            "object": {"nested": "value"},
            "array": [1, 2, 3, 4, 5]
        });

        let tree = build_shadow_tree(&json);

        for node in &tree {
            match node.name.as_str() {
                "short_string" => assert_eq!(node.preview, "\"短文本\""),
                "long_string" => assert!(node.preview.contains("...")),
                "number" => assert_eq!(node.preview, "42"),
                "boolean" => assert_eq!(node.preview, "true"),
                "null_value" => assert_eq!(node.preview, "null"),
                "object" => assert_eq!(node.preview, "{..} (1 keys)"),
                "array" => assert_eq!(node.preview, "[..] (5 items)"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_update_visibility_hides_collapsed_descendants() {
        let json = json!({
            "a": {"b": {"c": 1}},
            "d": 2
        });

        let mut tree = build_shadow_tree(&json);

        // 折叠 $.a 后它的全部后代应该不可见
        tree.iter_mut().find(|n| n.path == "$.a").unwrap().expanded = false;
        update_visibility(&mut tree);

        let visible: Vec<&str> = tree
            .iter()
            .filter(|n| n.visible)
            .map(|n| n.path.as_str())
            .collect();
        assert_eq!(visible, vec!["$", "$.a", "$.d"]);
    }

    #[test]
    fn test_carry_expansion_by_path() {
        let old_json = json!({"a": {"b": 1}, "c": [1, 2]});
        let mut old_tree = build_shadow_tree(&old_json);
        old_tree.iter_mut().find(|n| n.path == "$.a").unwrap().expanded = false;

        // 编辑后 $.a 仍然存在，$.e 是新节点
        let new_json = json!({"a": {"b": 1}, "e": {"f": 2}});
        let mut new_tree = build_shadow_tree(&new_json);
        carry_expansion(&old_tree, &mut new_tree);

        assert!(
            !new_tree.iter().find(|n| n.path == "$.a").unwrap().expanded,
            "折叠状态应该被携带"
        );
        assert!(
            new_tree.iter().find(|n| n.path == "$.e").unwrap().expanded,
            "新节点应该默认展开"
        );
    }
}
