use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// # Summary
/// 历史行情的回溯区间，对应上游 `range` 参数的固定枚举集合。
///
/// # Invariants
/// - 只允许 `1d,5d,1mo,3mo,6mo,1y,2y,5y,max` 九种取值。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ChartRange {
    Day1,
    Day5,
    Month1,
    Month3,
    Month6,
    Year1,
    Year2,
    Year5,
    Max,
}

impl ChartRange {
    /// # Summary
    /// 解析请求中的可选 `range` 参数。
    ///
    /// # Logic
    /// 1. 参数缺失时使用 `1d`。
    /// 2. 参数无法识别时回退到 `1mo`。
    ///
    /// # Arguments
    /// * `raw`: 查询串中的原始取值。
    ///
    /// # Returns
    /// 返回确定的 ChartRange。
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            None => ChartRange::Day1,
            Some(value) => value.parse().unwrap_or(ChartRange::Month1),
        }
    }

    /// 上游接口使用的字面值
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::Day1 => "1d",
            ChartRange::Day5 => "5d",
            ChartRange::Month1 => "1mo",
            ChartRange::Month3 => "3mo",
            ChartRange::Month6 => "6mo",
            ChartRange::Year1 => "1y",
            ChartRange::Year2 => "2y",
            ChartRange::Year5 => "5y",
            ChartRange::Max => "max",
        }
    }
}

impl FromStr for ChartRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(ChartRange::Day1),
            "5d" => Ok(ChartRange::Day5),
            "1mo" => Ok(ChartRange::Month1),
            "3mo" => Ok(ChartRange::Month3),
            "6mo" => Ok(ChartRange::Month6),
            "1y" => Ok(ChartRange::Year1),
            "2y" => Ok(ChartRange::Year2),
            "5y" => Ok(ChartRange::Year5),
            "max" => Ok(ChartRange::Max),
            _ => Err(format!("Unknown ChartRange: {}", s)),
        }
    }
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// # Summary
/// 采样间隔，对应上游 `interval` 参数。
///
/// # Invariants
/// - 缺失或无法识别的取值一律回退到 `1d`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    Minute1,
    Minute2,
    Minute5,
    Minute15,
    Minute30,
    Minute60,
    Minute90,
    Hour1,
    Day1,
    Day5,
    Week1,
    Month1,
    Month3,
}

impl Interval {
    /// 解析可选的 `interval` 参数，缺失或非法时返回 `1d`
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok())
            .unwrap_or(Interval::Day1)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute2 => "2m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Minute60 => "60m",
            Interval::Minute90 => "90m",
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Day5 => "5d",
            Interval::Week1 => "1wk",
            Interval::Month1 => "1mo",
            Interval::Month3 => "3mo",
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::Minute1),
            "2m" => Ok(Interval::Minute2),
            "5m" => Ok(Interval::Minute5),
            "15m" => Ok(Interval::Minute15),
            "30m" => Ok(Interval::Minute30),
            "60m" => Ok(Interval::Minute60),
            "90m" => Ok(Interval::Minute90),
            "1h" => Ok(Interval::Hour1),
            "1d" => Ok(Interval::Day1),
            "5d" => Ok(Interval::Day5),
            "1wk" => Ok(Interval::Week1),
            "1mo" => Ok(Interval::Month1),
            "3mo" => Ok(Interval::Month3),
            _ => Err(format!("Unknown Interval: {}", s)),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
