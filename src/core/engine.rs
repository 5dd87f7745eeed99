use tracing::{debug, error, info};

use crate::convert::{CommonMarkConverter, HtmlSource};
use crate::core::anchor::inject_anchors;
use crate::core::error::RenderError;
use crate::core::sanitize::sanitize;
use crate::models::RenderConfig;
use crate::template::{bind_fragment, TemplateSource};
use crate::utils::dom;

/// Markdown 预览渲染引擎
///
/// 每次 render 调用都是一条独立的同步管线:转换 Markdown、
/// 读取模板、解析片段、注入同步锚点、净化、拼入模板。
/// 调用之间不共享任何树或计数器,同样的输入产出同样的页面。
pub struct PreviewEngine {
    /// Markdown 转换器
    converter: Box<dyn HtmlSource>,
    /// 模板来源
    template: TemplateSource,
}

impl PreviewEngine {
    /// 用内置转换器和内置模板创建引擎
    pub fn new() -> Self {
        Self::with_config(&RenderConfig::default())
    }

    /// 按配置创建引擎
    pub fn with_config(config: &RenderConfig) -> Self {
        info!("初始化 Markdown 预览引擎");

        let markdown = config.markdown.clone().unwrap_or_default();
        let template = match &config.template {
            Some(path) => TemplateSource::File(path.clone()),
            None => TemplateSource::Embedded,
        };

        Self {
            converter: Box::new(CommonMarkConverter::with_config(&markdown)),
            template,
        }
    }

    /// 用自定义转换器和模板来源创建引擎
    pub fn new_with_converter(converter: Box<dyn HtmlSource>, template: TemplateSource) -> Self {
        Self {
            converter,
            template,
        }
    }

    /// 渲染 Markdown,返回完整的预览页面 HTML
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        debug!("开始渲染预览 ({} 字节)", markdown.len());

        // 1. 由转换器产出原始 HTML 片段
        let raw_html = self.converter.to_html(markdown).map_err(|e| {
            error!("Markdown 转换失败: {:#}", e);
            RenderError::ConversionFailed {
                message: format!("{:#}", e),
            }
        })?;

        // 2. 读取模板;模板读不到直接报错,不再动片段
        let template_html = self.template.load()?;

        // 3. 解析片段,先注入滚动同步锚点再净化:
        //    锚点编号以转换器的原始输出结构为准
        let fragment = dom::parse_fragment(&raw_html);
        inject_anchors(&fragment);
        sanitize(&fragment);

        // 4. 序列化片段并拼入模板
        let fragment_html = dom::serialize_children(&fragment)?;
        let page = bind_fragment(&template_html, &fragment_html)?;

        debug!("预览渲染完成 ({} 字节)", page.len());
        Ok(page)
    }
}

impl Default for PreviewEngine {
    fn default() -> Self {
        Self::new()
    }
}
