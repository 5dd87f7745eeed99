use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::core::RenderError;

pub mod binder;

pub use binder::bind_fragment;

/// 模板中内容插入点元素的 id
pub const CONTENT_ELEMENT_ID: &str = "content";

/// 编译进库里的默认预览模板
const EMBEDDED_TEMPLATE: &str = include_str!("../../templates/preview.html");

/// 预览模板的来源
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// 内置的默认模板
    Embedded,
    /// 渲染时从磁盘读取的自定义模板文件
    File(PathBuf),
}

impl TemplateSource {
    /// 读取模板内容
    ///
    /// 文件模板读不到时返回 ResourceMissing。缺失的资源不会自愈,
    /// 所以不重试,也不回退到内置模板。
    pub fn load(&self) -> Result<String, RenderError> {
        match self {
            TemplateSource::Embedded => Ok(EMBEDDED_TEMPLATE.to_string()),
            TemplateSource::File(path) => {
                debug!("读取模板文件: {}", path.display());
                fs::read_to_string(path).map_err(|e| RenderError::ResourceMissing {
                    message: format!("{}: {}", path.display(), e),
                })
            }
        }
    }
}

impl Default for TemplateSource {
    fn default() -> Self {
        TemplateSource::Embedded
    }
}
