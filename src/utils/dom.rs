use std::rc::Rc;

use anyhow::{Context, Result};
use html5ever::driver::ParseOpts;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{local_name, namespace_url, ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// 将转换器输出的原始 HTML 字符串解析为片段树
///
/// 解析是尽力而为的:残缺的 HTML 会被修复而不是报错。
/// 返回的节点是一个已与文档分离的合成根元素,
/// 片段内容都挂在它的子节点上。
pub fn parse_fragment(html: &str) -> Handle {
    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(StrTendril::from(html));

    // 片段解析会在文档下生成一个合成的 html 根元素。
    // 文档节点析构时会迭代清空其下整棵子树,
    // 所以先把合成根摘下来,再让文档随 dom 一起析构
    let children = dom.document.children.take();
    let root = children
        .iter()
        .find(|node| matches!(node.data, NodeData::Element { .. }))
        .cloned();
    match root {
        Some(root) => {
            root.parent.set(None);
            root
        }
        None => dom.document.clone(),
    }
}

/// 将完整的模板文档解析为文档树(保留 doctype)
pub fn parse_document(html: &str) -> RcDom {
    html5ever::parse_document(RcDom::default(), ParseOpts::default())
        .one(StrTendril::from(html))
}

/// 序列化节点的全部子节点,即元素的 inner HTML
pub fn serialize_children(node: &Handle) -> Result<String> {
    let mut buf = Vec::new();
    serialize(
        &mut buf,
        &SerializableHandle::from(node.clone()),
        SerializeOpts::default(),
    )
    .context("序列化 HTML 失败")?;
    String::from_utf8(buf).context("序列化结果不是合法的 UTF-8")
}

/// 序列化整个文档
pub fn serialize_document(dom: &RcDom) -> Result<String> {
    serialize_children(&dom.document)
}

/// 以文档顺序(先序)遍历节点及其整棵子树
///
/// 用显式栈迭代,嵌套再深也不会耗尽调用栈。
pub fn walk<F>(node: &Handle, f: &mut F)
where
    F: FnMut(&Handle),
{
    let mut stack = vec![node.clone()];
    while let Some(node) = stack.pop() {
        f(&node);
        let children = node.children.borrow();
        for child in children.iter().rev() {
            stack.push(child.clone());
        }
    }
}

/// 返回元素节点的标签名;文本、注释等其他节点返回 None
///
/// html5ever 解析 HTML 元素时已把标签名转为小写。
pub fn element_name(node: &Handle) -> Option<&str> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(&name.local),
        _ => None,
    }
}

/// 通过非拥有的父指针取得父节点,根节点返回 None
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(|weak| weak.upgrade());
    node.parent.set(weak);
    parent
}

/// 读取属性值;属性名匹配不区分大小写
pub fn get_attr(node: &Handle, name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.eq_str_ignore_ascii_case(name))
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 设置属性值;属性已存在时覆盖旧值,单个节点内属性名不会重复
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(attr) = attrs
            .iter_mut()
            .find(|attr| attr.name.local.eq_str_ignore_ascii_case(name))
        {
            attr.value = StrTendril::from(value);
        } else {
            attrs.push(Attribute {
                name: QualName::new(None, ns!(), LocalName::from(name)),
                value: StrTendril::from(value),
            });
        }
    }
}

/// 移除一组属性;属性名匹配不区分大小写
pub fn remove_attrs(node: &Handle, names: &[&str]) {
    if let NodeData::Element { ref attrs, .. } = node.data {
        attrs.borrow_mut().retain(|attr| {
            !names
                .iter()
                .any(|name| attr.name.local.eq_str_ignore_ascii_case(name))
        });
    }
}

/// 移除单个属性
pub fn remove_attr(node: &Handle, name: &str) {
    remove_attrs(node, &[name]);
}

/// 把节点从父节点的子节点序列中摘除,连同整棵子树一起丢弃
pub fn detach(node: &Handle) {
    if let Some(parent) = node.parent.take() {
        if let Some(parent) = parent.upgrade() {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, node));
        }
    }
}

/// 按 id 属性查找第一个匹配的元素(文档顺序)
pub fn find_element_by_id(root: &Handle, id: &str) -> Option<Handle> {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if get_attr(&node, "id").as_deref() == Some(id) {
            return Some(node);
        }
        let children = node.children.borrow();
        for child in children.iter().rev() {
            stack.push(child.clone());
        }
    }
    None
}

/// 用片段根节点的子节点替换 parent 的全部子节点,两侧父指针同步修正
pub fn replace_children(parent: &Handle, fragment_root: &Handle) {
    let new_children: Vec<Handle> = fragment_root.children.take();
    for child in &new_children {
        child.parent.set(Some(Rc::downgrade(parent)));
    }
    let old_children = std::mem::replace(&mut *parent.children.borrow_mut(), new_children);
    for child in old_children {
        child.parent.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_tag(root: &Handle, tag: &str) -> Option<Handle> {
        let mut found = None;
        walk(root, &mut |node| {
            if found.is_none() && element_name(node) == Some(tag) {
                found = Some(node.clone());
            }
        });
        found
    }

    #[test]
    fn test_fragment_roundtrip() {
        let root = parse_fragment("<p>hello</p>");
        assert_eq!(serialize_children(&root).unwrap(), "<p>hello</p>");
    }

    #[test]
    fn test_malformed_fragment_recovers() {
        // 残缺的 HTML 不应让解析崩溃
        let root = parse_fragment("<p>unclosed <b>bold");
        let html = serialize_children(&root).unwrap();
        assert!(html.contains("bold"));
    }

    #[test]
    fn test_attr_helpers() {
        let root = parse_fragment("<p class=\"note\">x</p>");
        let p = find_tag(&root, "p").unwrap();

        // 属性名匹配不区分大小写
        assert_eq!(get_attr(&p, "CLASS").as_deref(), Some("note"));

        // 覆盖而不是重复追加
        set_attr(&p, "id", "mde-1");
        set_attr(&p, "id", "mde-2");
        assert_eq!(get_attr(&p, "id").as_deref(), Some("mde-2"));

        remove_attr(&p, "CLASS");
        assert_eq!(get_attr(&p, "class"), None);
        assert_eq!(serialize_children(&root).unwrap(), "<p id=\"mde-2\">x</p>");
    }

    #[test]
    fn test_detach_and_find() {
        let root = parse_fragment("<div id=\"a\"><span id=\"b\">x</span></div>");
        let span = find_element_by_id(&root, "b").unwrap();
        detach(&span);
        assert!(find_element_by_id(&root, "b").is_none());
        assert_eq!(serialize_children(&root).unwrap(), "<div id=\"a\"></div>");
    }

    #[test]
    fn test_parent_link() {
        let root = parse_fragment("<ul><li>a</li></ul>");
        let li = find_tag(&root, "li").unwrap();
        let parent = parent(&li).unwrap();
        assert_eq!(element_name(&parent), Some("ul"));
    }

    #[test]
    fn test_fragment_root_is_detached() {
        // 返回的合成根没有父节点,子树在解析调用结束后仍然完整
        let root = parse_fragment("<div><p>x</p></div>");
        assert!(parent(&root).is_none());
        assert_eq!(serialize_children(&root).unwrap(), "<div><p>x</p></div>");
    }

    #[test]
    fn test_deeply_nested_input_does_not_overflow() {
        // 50k 层嵌套,遍历和查找都不应耗尽调用栈
        let depth = 50_000;
        let mut html = String::new();
        for _ in 0..depth {
            html.push_str("<blockquote>");
        }
        html.push('x');
        for _ in 0..depth {
            html.push_str("</blockquote>");
        }

        let root = parse_fragment(&html);
        let mut count = 0usize;
        walk(&root, &mut |_| count += 1);
        assert!(count > depth);
        assert!(find_element_by_id(&root, "missing").is_none());
    }
}
