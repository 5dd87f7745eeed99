use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 渲染引擎配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    /// 自定义模板文件路径;为 None 时使用内置模板
    pub template: Option<PathBuf>,
    /// Markdown 扩展配置;为 None 时使用默认扩展集
    pub markdown: Option<MarkdownConfig>,
}

/// Markdown 扩展开关
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// 表格
    pub tables: bool,
    /// 脚注
    pub footnotes: bool,
    /// 删除线
    pub strikethrough: bool,
    /// 任务列表
    pub tasklists: bool,
    /// 智能标点
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert!(config.template.is_none());
        assert!(config.markdown.is_none());

        let markdown = MarkdownConfig::default();
        assert!(markdown.tables);
        assert!(markdown.footnotes);
        assert!(markdown.strikethrough);
        assert!(markdown.tasklists);
        assert!(!markdown.smart_punctuation);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = RenderConfig {
            template: Some(PathBuf::from("custom.html")),
            markdown: Some(MarkdownConfig::default()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.template, config.template);
    }
}
