//! 时间工具模块
//! 持续时间字符串的解析与格式化（如 "32m"、"1h30m"、"1.5s"）

use std::time::Duration;

use crate::error::CodecError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

// 与其他服务共享的列以 int64 纳秒表示持续时间
const MAX_TOTAL_NANOS: u128 = i64::MAX as u128;

// 小数部分最多保留的位数，超出部分截断
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_scale(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(NANOS_PER_MIN),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

/// 解析持续时间字符串
///
/// 语法：一个或多个 `<数量><单位>` 片段，数量可带小数，
/// 单位为 `ns`、`us`(`µs`)、`ms`、`s`、`m`、`h`。单独的 `"0"` 表示零。
/// 负值不被接受，总量不得超过 `i64::MAX` 纳秒（约 2562047h）。
pub fn parse_duration(input: &str) -> Result<Duration, CodecError> {
    let err = |reason| CodecError::malformed_duration(input, reason);

    let mut rest = input;
    if rest.starts_with('-') {
        return Err(err("negative duration"));
    }
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(err("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_part, after_int) = rest.split_at(int_len);
        rest = after_int;

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
            let (digits, after_frac) = after_dot.split_at(frac_len);
            frac_part = digits;
            rest = after_frac;
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err("expected a number"));
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(err("missing unit"));
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let scale = unit_scale(unit).ok_or_else(|| err("unknown unit"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err("quantity overflow"))?
        };
        let mut value = whole
            .checked_mul(scale)
            .ok_or_else(|| err("quantity overflow"))?;

        let frac_digits = &frac_part[..frac_part.len().min(MAX_FRACTION_DIGITS)];
        if !frac_digits.is_empty() {
            let numerator: u128 = frac_digits.parse().map_err(|_| err("quantity overflow"))?;
            let denominator = 10u128.pow(frac_digits.len() as u32);
            value = value
                .checked_add(numerator * scale / denominator)
                .ok_or_else(|| err("quantity overflow"))?;
        }

        total = total
            .checked_add(value)
            .filter(|t| *t <= MAX_TOTAL_NANOS)
            .ok_or_else(|| err("quantity overflow"))?;
    }

    Ok(Duration::new(
        (total / NANOS_PER_SEC) as u64,
        (total % NANOS_PER_SEC) as u32,
    ))
}

/// 格式化为规范的持续时间字符串
///
/// 不足一秒时使用 `ns`/`µs`/`ms`，否则为 `[Nh][Nm]N[.fff]s`，例如
/// 32 分钟格式化为 `"32m0s"`。
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SEC {
        let (scale, suffix) = if nanos < NANOS_PER_MICRO {
            (1, "ns")
        } else if nanos < NANOS_PER_MILLI {
            (NANOS_PER_MICRO, "µs")
        } else {
            (NANOS_PER_MILLI, "ms")
        };
        return format!("{}{}", decimal(nanos, scale), suffix);
    }

    let hours = nanos / NANOS_PER_HOUR;
    let minutes = (nanos % NANOS_PER_HOUR) / NANOS_PER_MIN;
    let seconds = nanos % NANOS_PER_MIN;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h", hours));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&decimal(seconds, NANOS_PER_SEC));
    out.push('s');
    out
}

fn decimal(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let width = scale.ilog10() as usize;
    let digits = format!("{:0width$}", frac, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
