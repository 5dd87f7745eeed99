use anyhow::Result;
use pulldown_cmark::{html, Options, Parser};

use crate::convert::HtmlSource;
use crate::models::MarkdownConfig;

/// 内置的 CommonMark 转换器,基于 pulldown-cmark
pub struct CommonMarkConverter {
    options: Options,
}

impl CommonMarkConverter {
    /// 用默认扩展集创建转换器
    pub fn new() -> Self {
        Self::with_config(&MarkdownConfig::default())
    }

    /// 按配置开关各项 Markdown 扩展
    pub fn with_config(config: &MarkdownConfig) -> Self {
        let mut options = Options::empty();
        if config.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if config.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if config.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if config.tasklists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if config.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        Self { options }
    }
}

impl Default for CommonMarkConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlSource for CommonMarkConverter {
    fn to_html(&self, markdown: &str) -> Result<String> {
        // 解析 Markdown
        let parser = Parser::new_ext(markdown, self.options);

        // 将解析结果渲染为 HTML
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Ok(html_output)
    }
}
