use anyhow::Result;

mod external;
mod markdown;

pub use external::ExternalConverter;
pub use markdown::CommonMarkConverter;

/// Markdown 到 HTML 的转换能力
///
/// 渲染管线只依赖这一个抽象:任何能把 Markdown 文本变成
/// HTML 片段字符串的实现都可以接入。
pub trait HtmlSource: Send + Sync {
    /// 把 Markdown 文本转换为 HTML 片段
    fn to_html(&self, markdown: &str) -> Result<String>;
}
