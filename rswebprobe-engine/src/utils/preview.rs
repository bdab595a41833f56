use std::fmt::{self, Write};

/// 日志预览：连续空白折叠为单个空格，超过 max_len 个字符时截断并追加省略号
/// 仅用于格式化输出，不分配新字符串
#[inline(always)]
pub fn preview_compact(s: &str, max_len: usize) -> impl fmt::Display + '_ {
    struct CompactView<'a> {
        source: &'a str,
        max_length: usize,
    }

    impl fmt::Display for CompactView<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let mut written = 0;
            let mut last_was_whitespace = false;

            for ch in self.source.trim().chars() {
                if ch.is_whitespace() && last_was_whitespace {
                    continue;
                }
                if written >= self.max_length {
                    return f.write_char('…');
                }
                if ch.is_whitespace() {
                    f.write_char(' ')?;
                    last_was_whitespace = true;
                } else {
                    f.write_char(ch)?;
                    last_was_whitespace = false;
                }
                written += 1;
            }
            Ok(())
        }
    }

    CompactView {
        source: s,
        max_length: max_len,
    }
}
