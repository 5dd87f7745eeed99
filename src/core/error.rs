use thiserror::Error;

/// 渲染管线错误类型
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("无法加载预览模板: {message}")]
    ResourceMissing {
        message: String,
    },

    #[error("模板缺少内容插入点: {message}")]
    TemplateMalformed {
        message: String,
    },

    #[error("Markdown 转换失败: {message}")]
    ConversionFailed {
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
