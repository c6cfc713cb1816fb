//! # 时间工具函数
//!
//! 项目列表按创建时间排序时需要把后端返回的时间解析为可比较的数值。
//! 为避免引入 chrono，使用标准库手动解析：
//! - ISO 8601 时间字符串（`2024-06-04T10:00:00.000Z`、带时区偏移、或仅日期）
//! - 24 位十六进制文档 ID（前 8 位为创建时间的 Unix 秒数）

/// 将 ISO 8601 时间字符串解析为 Unix 毫秒时间戳（UTC）
///
/// 支持的格式：
/// - `YYYY-MM-DD`
/// - `YYYY-MM-DDTHH:MM[:SS[.fff]]`，可选后缀 `Z` 或 `±HH:MM`/`±HHMM`
///
/// 日期和时间之间也接受空格分隔。无时区后缀时按 UTC 处理。
///
/// # 返回值
/// 解析失败返回 None
pub fn parse_iso8601_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    let (date_part, time_part) = match value.find(['T', ' ']) {
        Some(idx) => (&value[..idx], Some(&value[idx + 1..])),
        None => (value, None),
    };

    let mut date_fields = date_part.splitn(3, '-');
    let year: i64 = date_fields.next()?.parse().ok()?;
    let month: u32 = date_fields.next()?.parse().ok()?;
    let day: u32 = date_fields.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let mut millis = days_from_civil(year, month, day)?.checked_mul(86_400_000)?;

    if let Some(time) = time_part {
        // 拆出时区后缀
        let (clock, offset_minutes) = split_offset(time)?;

        let mut clock_fields = clock.splitn(3, ':');
        let hours: i64 = clock_fields.next()?.parse().ok()?;
        let minutes: i64 = clock_fields.next()?.parse().ok()?;
        let (seconds, fraction_millis) = match clock_fields.next() {
            Some(sec) => parse_seconds(sec)?,
            None => (0, 0),
        };
        if hours > 23 || minutes > 59 || seconds > 60 {
            return None;
        }

        let clock_millis =
            ((hours * 60 + minutes - offset_minutes) * 60 + seconds) * 1000 + fraction_millis;
        millis = millis.checked_add(clock_millis)?;
    }

    Some(millis)
}

/// 从 24 位十六进制文档 ID 中提取创建时间（Unix 毫秒）
///
/// 文档 ID 的前 4 字节（8 个十六进制字符）为大端 Unix 秒数。
///
/// # 返回值
/// 不是 24 位十六进制字符串时返回 None
pub fn object_id_millis(id: &str) -> Option<i64> {
    if id.len() != 24 || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let secs = u32::from_str_radix(&id[..8], 16).ok()?;
    Some(i64::from(secs) * 1000)
}

/// 拆分时间部分与时区后缀，返回 (时钟字符串, 相对 UTC 的偏移分钟数)
fn split_offset(time: &str) -> Option<(&str, i64)> {
    if let Some(clock) = time.strip_suffix('Z').or_else(|| time.strip_suffix('z')) {
        return Some((clock, 0));
    }

    // 时钟部分至少为 "HH:MM"，从第 5 个字符之后查找正负号
    let sign_idx = time
        .char_indices()
        .skip(5)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i);

    match sign_idx {
        None => Some((time, 0)),
        Some(idx) => {
            let sign = if &time[idx..idx + 1] == "-" { -1 } else { 1 };
            let digits: String = time[idx + 1..].chars().filter(|c| *c != ':').collect();
            if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let hours: i64 = digits[..2].parse().ok()?;
            let minutes: i64 = digits[2..].parse().ok()?;
            Some((&time[..idx], sign * (hours * 60 + minutes)))
        }
    }
}

/// 解析 "SS" 或 "SS.fff..."，返回 (秒, 毫秒)
fn parse_seconds(value: &str) -> Option<(i64, i64)> {
    match value.split_once('.') {
        None => Some((value.parse().ok()?, 0)),
        Some((secs, fraction)) => {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // 只取前三位，不足三位右侧补零
            let mut millis_digits: String = fraction.chars().take(3).collect();
            while millis_digits.len() < 3 {
                millis_digits.push('0');
            }
            Some((secs.parse().ok()?, millis_digits.parse().ok()?))
        }
    }
}

/// 将公历日期转换为自 1970-01-01 以来的天数
///
/// 使用 Howard Hinnant 的算法：http://howardhinnant.github.io/date_algorithms.html
///
/// 年份超出 i64 毫秒可表示范围时返回 None
fn days_from_civil(year: i64, month: u32, day: u32) -> Option<i64> {
    let y = if month <= 2 { year.checked_sub(1)? } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400); // [0, 399]
    let m = i64::from(month);
    let mp = if m > 2 { m - 3 } else { m + 9 }; // [0, 11]
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era.checked_mul(146_097)?.checked_add(doe - 719_468)
}
