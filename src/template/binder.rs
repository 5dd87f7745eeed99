use tracing::{debug, error};

use crate::core::RenderError;
use crate::template::CONTENT_ELEMENT_ID;
use crate::utils::dom;

/// 把净化后的片段拼接进模板文档
///
/// 在模板里定位 id 为 content 的插入点元素,用片段内容替换
/// 它的全部子节点,返回完整的文档字符串。模板里找不到插入点
/// 说明模板资源已损坏,直接报错。
pub fn bind_fragment(template_html: &str, fragment_html: &str) -> Result<String, RenderError> {
    let doc = dom::parse_document(template_html);

    let content = match dom::find_element_by_id(&doc.document, CONTENT_ELEMENT_ID) {
        Some(node) => node,
        None => {
            error!("模板中找不到 id=\"{}\" 的插入点元素", CONTENT_ELEMENT_ID);
            return Err(RenderError::TemplateMalformed {
                message: format!("模板中找不到 id=\"{}\" 的元素", CONTENT_ELEMENT_ID),
            });
        }
    };

    // 用片段的节点替换插入点原有的子节点
    let fragment = dom::parse_fragment(fragment_html);
    dom::replace_children(&content, &fragment);

    debug!("片段已拼接进模板");
    Ok(dom::serialize_document(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_replaces_marker_children() {
        let page = bind_fragment(
            "<html><body><div id=\"content\"><p>old</p></div></body></html>",
            "<p>new</p>",
        )
        .unwrap();
        assert!(page.contains("<div id=\"content\"><p>new</p></div>"));
        assert!(!page.contains("old"));
    }

    #[test]
    fn test_missing_marker_is_malformed() {
        let err = bind_fragment("<html><body><p>no marker</p></body></html>", "<p>x</p>")
            .unwrap_err();
        assert!(matches!(err, RenderError::TemplateMalformed { .. }));
    }

    #[test]
    fn test_empty_fragment_empties_marker() {
        let page = bind_fragment(
            "<html><body><div id=\"content\"><p>old</p></div></body></html>",
            "",
        )
        .unwrap();
        assert!(page.contains("<div id=\"content\"></div>"));
    }

    #[test]
    fn test_rest_of_template_untouched() {
        let page = bind_fragment(
            "<html><head><title>预览</title></head><body>\
             <div id=\"content\"></div><footer>页脚</footer></body></html>",
            "<p>body</p>",
        )
        .unwrap();
        assert!(page.contains("<title>预览</title>"));
        assert!(page.contains("<footer>页脚</footer>"));
        assert!(page.contains("<p>body</p>"));
    }
}
