/// HTML 输入守卫：进入提取 / 匹配前限制体积，避免超大响应拖垮引擎
use std::borrow::Cow;

pub struct HtmlInputGuard;

impl HtmlInputGuard {
    /// 最大 HTML 长度（2MB）
    pub const MAX_HTML_LEN: usize = 2 * 1024 * 1024;

    /// 超长时按 UTF-8 字符边界截断，未超长零拷贝返回
    #[inline(always)]
    pub fn guard(html: Cow<'_, str>) -> Cow<'_, str> {
        if html.len() <= Self::MAX_HTML_LEN {
            return html;
        }

        let mut cut = Self::MAX_HTML_LEN;
        while !html.is_char_boundary(cut) {
            cut -= 1;
        }
        log::debug!("HTML truncated from {} to {} bytes", html.len(), cut);

        match html {
            Cow::Borrowed(s) => Cow::Borrowed(&s[..cut]),
            Cow::Owned(mut s) => {
                s.truncate(cut);
                Cow::Owned(s)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_untouched() {
        let out = HtmlInputGuard::guard(Cow::Borrowed("<html></html>"));
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, "<html></html>");
    }

    #[test]
    fn test_truncates_on_char_boundary() {
        // 多字节字符跨越上限边界
        let mut s = "a".repeat(HtmlInputGuard::MAX_HTML_LEN - 1);
        s.push('测');
        s.push_str("tail");
        let out = HtmlInputGuard::guard(Cow::Owned(s));
        assert_eq!(out.len(), HtmlInputGuard::MAX_HTML_LEN - 1);
        assert!(out.chars().all(|c| c == 'a'));
    }
}
