use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::utils::dom;

/// 滚动同步锚点的 id 前缀
pub const SYNC_ID_PREFIX: &str = "mde-";

/// 需要注入同步锚点的块级标签
const ANCHOR_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "hr", "pre", "blockquote",
];

/// 生成第 number 个锚点的 id
fn sync_id(number: usize) -> String {
    format!("{}{}", SYNC_ID_PREFIX, number)
}

/// 为片段树中的块级元素注入滚动同步锚点
///
/// 按文档顺序做一次遍历,匹配的元素依次获得 `mde-1`、`mde-2`……
/// 计数器从 1 开始,只在本次调用内有效,不跨调用保留。
/// 特例:直接挂在 li 下的 blockquote 不加锚点,
/// 它已经可以通过外层 li 的锚点定位。
pub fn inject_anchors(root: &Handle) {
    let mut next = 1usize;
    dom::walk(root, &mut |node| {
        if wants_sync_anchor(node) {
            dom::set_attr(node, "id", &sync_id(next));
            next += 1;
        }
    });
    debug!("已注入 {} 个同步锚点", next - 1);
}

/// 判断节点是否应获得同步锚点
fn wants_sync_anchor(node: &Handle) -> bool {
    let name = match dom::element_name(node) {
        Some(name) => name,
        None => return false,
    };
    if !ANCHOR_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag)) {
        return false;
    }
    // li 里的 blockquote 不重复加锚
    if name.eq_ignore_ascii_case("blockquote") {
        if let Some(parent) = dom::parent(node) {
            if dom::element_name(&parent) == Some("li") {
                return false;
            }
        }
    }
    true
}
