use markup5ever_rcdom::Handle;
use tracing::debug;

use crate::utils::dom;

/// 结构性移除的标签:命中的元素连同整棵子树一起剔除
const REMOVED_TAGS: &[&str] = &[
    "script", "link", "iframe", "frameset", "frame", "applet", "object", "embed",
];

/// 判定为脚本 URL 的前缀(不区分大小写)
const SCRIPT_URL_PREFIXES: &[&str] = &["javascript", "jscript", "vbscript"];

/// 需要剥除的事件处理属性(属性名不区分大小写)
const EVENT_HANDLER_ATTRS: &[&str] = &[
    "onclick",
    "onmouseover",
    "onfocus",
    "onblur",
    "onmouseout",
    "ondoubleclick",
    "onload",
    "onunload",
];

/// 净化规则的节点选择器
enum Selector {
    /// 标签名属于给定集合
    Tag(&'static [&'static str]),
    /// 指定标签上某属性值带有任一前缀(不区分大小写)
    AttrPrefix {
        tag: &'static str,
        attr: &'static str,
        prefixes: &'static [&'static str],
    },
    /// 带有给定集合中的任一属性
    AttrPresence(&'static [&'static str]),
    /// 某属性值包含给定子串(不区分大小写)
    AttrSubstring {
        attr: &'static str,
        needle: &'static str,
    },
}

/// 对选中节点执行的动作
enum Action {
    /// 连同子树一起摘除节点
    RemoveNode,
    /// 把属性值替换为固定文本
    ReplaceAttrValue {
        attr: &'static str,
        value: &'static str,
    },
    /// 移除集合中出现的全部属性
    RemoveAttrs(&'static [&'static str]),
}

/// 一条净化规则:选中一组节点,对它们执行一个动作
struct SanitizeRule {
    selector: Selector,
    action: Action,
}

/// 固定的净化规则表,编译期写死,运行期不可配置
///
/// 覆盖的注入途径:脚本类元素、javascript/jscript/vbscript 链接、
/// 同前缀的图片地址、八个 on* 事件处理属性、style 值里的 expression。
/// 这是一张固定黑名单,名单之外的途径(包括编码混淆)不在处理范围内。
static SANITIZE_RULES: &[SanitizeRule] = &[
    SanitizeRule {
        selector: Selector::Tag(REMOVED_TAGS),
        action: Action::RemoveNode,
    },
    SanitizeRule {
        selector: Selector::AttrPrefix {
            tag: "a",
            attr: "href",
            prefixes: SCRIPT_URL_PREFIXES,
        },
        action: Action::ReplaceAttrValue {
            attr: "href",
            value: "#",
        },
    },
    SanitizeRule {
        selector: Selector::AttrPrefix {
            tag: "img",
            attr: "src",
            prefixes: SCRIPT_URL_PREFIXES,
        },
        action: Action::ReplaceAttrValue {
            attr: "src",
            value: "#",
        },
    },
    SanitizeRule {
        selector: Selector::AttrPresence(EVENT_HANDLER_ATTRS),
        action: Action::RemoveAttrs(EVENT_HANDLER_ATTRS),
    },
    SanitizeRule {
        selector: Selector::AttrSubstring {
            attr: "style",
            needle: "expression",
        },
        action: Action::RemoveAttrs(&["style"]),
    },
];

/// 就地净化片段树,移除已知的脚本注入途径
///
/// 每条规则先收集全部匹配节点,再统一执行动作,不边遍历边改树。
/// 树里没有匹配节点时什么都不做;对已净化的树重复执行结果不变。
pub fn sanitize(root: &Handle) {
    for rule in SANITIZE_RULES {
        // 先选中,后修改
        let mut matched = Vec::new();
        dom::walk(root, &mut |node| {
            if rule.selector.matches(node) {
                matched.push(node.clone());
            }
        });
        if !matched.is_empty() {
            debug!("净化规则命中 {} 个节点", matched.len());
        }
        for node in &matched {
            rule.action.apply(node);
        }
    }
}

impl Selector {
    fn matches(&self, node: &Handle) -> bool {
        let name = match dom::element_name(node) {
            Some(name) => name,
            None => return false,
        };
        match self {
            Selector::Tag(tags) => tags.iter().any(|tag| name.eq_ignore_ascii_case(tag)),
            Selector::AttrPrefix {
                tag,
                attr,
                prefixes,
            } => {
                name.eq_ignore_ascii_case(tag)
                    && dom::get_attr(node, attr).map_or(false, |value| {
                        prefixes.iter().any(|prefix| has_prefix_ci(&value, prefix))
                    })
            }
            Selector::AttrPresence(names) => {
                names.iter().any(|attr| dom::get_attr(node, attr).is_some())
            }
            Selector::AttrSubstring { attr, needle } => dom::get_attr(node, attr)
                .map_or(false, |value| value.to_ascii_lowercase().contains(needle)),
        }
    }
}

impl Action {
    fn apply(&self, node: &Handle) {
        match self {
            Action::RemoveNode => dom::detach(node),
            Action::ReplaceAttrValue { attr, value } => dom::set_attr(node, attr, value),
            Action::RemoveAttrs(names) => dom::remove_attrs(node, names),
        }
    }
}

/// 值是否以 prefix 开头,不区分 ASCII 大小写;不做修剪或解码
fn has_prefix_ci(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}
