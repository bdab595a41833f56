//! Header格式转换工具
use http::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, SET_COOKIE};
use indexmap::IndexMap;
use log::warn;

use crate::error::ProbeResult;

/// 单次转换最多遍历的 header 条目
const MAX_HEADER_ITER: usize = 1000;

/// Header转换工具
pub struct HeaderConverter;

impl HeaderConverter {
    /// 由 (名称, 值) 列表构建 HeaderMap，同名多值保留
    pub fn from_pairs<I, K, V>(pairs: I) -> ProbeResult<HeaderMap>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_ref().trim().as_bytes())?;
            let value = HeaderValue::from_str(value.as_ref().trim())?;
            map.append(name, value);
        }
        Ok(map)
    }

    /// 由 名称 → 多值 映射构建 HeaderMap
    pub fn from_multi_map<I, K, V>(map: I) -> ProbeResult<HeaderMap>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::from_pairs(
            map.into_iter()
                .flat_map(|(name, values)| values.into_iter().map(move |v| (name.as_ref().to_string(), v))),
        )
    }

    /// 取某个 header 的全部值，以 ", " 拼接；不存在返回 None
    pub fn joined(headers: &HeaderMap, name: &str) -> Option<String> {
        let mut values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .peekable();
        values.peek()?;
        Some(values.collect::<Vec<_>>().join(", "))
    }

    /// 转换为 小写名称 → 拼接值，保持首次出现顺序
    pub fn to_joined_map(headers: &HeaderMap) -> IndexMap<String, String> {
        let mut map: IndexMap<String, String> = IndexMap::new();

        for (iter_count, (key, value)) in headers.iter().enumerate() {
            if iter_count >= MAX_HEADER_ITER {
                warn!("Header iteration exceeded {} entries, truncating", MAX_HEADER_ITER);
                break;
            }
            let value = String::from_utf8_lossy(value.as_bytes());
            map.entry(key.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert_with(|| value.into_owned());
        }
        map
    }

    /// 解析 Set-Cookie 与 Cookie 为 Cookie 名 → 值
    /// 名称保留原始大小写；值为 deleted 的条目丢弃；同名以后出现者为准
    pub fn parse_cookies(headers: &HeaderMap) -> IndexMap<String, String> {
        let mut cookies = IndexMap::new();

        for raw in headers.get_all(SET_COOKIE).iter().take(MAX_HEADER_ITER) {
            Self::parse_set_cookie(&String::from_utf8_lossy(raw.as_bytes()), &mut cookies);
        }
        for raw in headers.get_all(COOKIE).iter().take(MAX_HEADER_ITER) {
            Self::parse_request_cookie(&String::from_utf8_lossy(raw.as_bytes()), &mut cookies);
        }

        cookies
    }

    /// Set-Cookie 只取首段 name=value，属性段忽略
    fn parse_set_cookie(raw_cookie: &str, cookies: &mut IndexMap<String, String>) {
        let Some(core_kv) = raw_cookie
            .split(';')
            .map(str::trim)
            .find(|s| !s.is_empty())
        else {
            return;
        };
        Self::insert_pair(core_kv, cookies);
    }

    fn parse_request_cookie(raw_cookie: &str, cookies: &mut IndexMap<String, String>) {
        for core_kv in raw_cookie.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            Self::insert_pair(core_kv, cookies);
        }
    }

    fn insert_pair(core_kv: &str, cookies: &mut IndexMap<String, String>) {
        let Some((name, value)) = core_kv.split_once('=') else {
            return;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.eq_ignore_ascii_case("deleted") {
            return;
        }
        cookies.insert(name.to_string(), value.to_string());
    }
}
