use quotegate_core::market::entity::Candle;

use crate::envelope::{
    ChartBody, ChartEnvelope, ChartError, ChartIndicators, ChartMeta, ChartSeries, OhlcvSeries,
};

// 图表元数据中的币种固定为美元
pub const CHART_CURRENCY: &str = "USD";
pub const NO_DATA_DESCRIPTION: &str = "No data found";

/// # Summary
/// 上游无历史数据时返回的合法空信封。
pub fn empty_chart() -> ChartEnvelope {
    ChartEnvelope {
        chart: ChartBody {
            result: None,
            error: Some(ChartError {
                description: NO_DATA_DESCRIPTION.to_string(),
            }),
        },
    }
}

/// # Summary
/// 将 K 线列表展开为按下标对齐的并行序列。
///
/// # Logic
/// 1. 每根 K 线贡献一个时间戳与一组 OHLCV。
/// 2. 元数据中的最新价取最后一根 K 线的收盘价。
/// 3. 输入为空时返回空信封。
///
/// # Arguments
/// * `symbol`: 请求中的证券代码（原样回显）。
/// * `candles`: 按时间升序的 K 线。
///
/// # Returns
/// 返回图表信封。
pub fn chart_envelope(symbol: &str, candles: &[Candle]) -> ChartEnvelope {
    let Some(last) = candles.last() else {
        return empty_chart();
    };

    let mut series = OhlcvSeries::default();
    let mut timestamp = Vec::with_capacity(candles.len());
    for candle in candles {
        timestamp.push(candle.time.timestamp());
        series.open.push(candle.open);
        series.high.push(candle.high);
        series.low.push(candle.low);
        series.close.push(candle.close);
        series.volume.push(candle.volume);
    }

    ChartEnvelope {
        chart: ChartBody {
            result: Some(vec![ChartSeries {
                meta: ChartMeta {
                    symbol: symbol.to_string(),
                    currency: CHART_CURRENCY.to_string(),
                    regular_market_price: last.close,
                },
                timestamp,
                indicators: ChartIndicators {
                    quote: vec![series],
                },
            }]),
            error: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotegate_core::test_utils::sample_candles;

    #[test]
    fn test_series_are_index_aligned() {
        let candles = sample_candles(4);
        let envelope = chart_envelope("AAPL", &candles);
        let series = &envelope.chart.result.as_ref().unwrap()[0];
        let quote = &series.indicators.quote[0];

        assert_eq!(series.timestamp.len(), 4);
        for len in [quote.open.len(), quote.high.len(), quote.low.len(), quote.close.len(), quote.volume.len()] {
            assert_eq!(len, 4);
        }
        assert_eq!(series.timestamp[2], candles[2].time.timestamp());
        assert_eq!(quote.close[2], candles[2].close);
        assert_eq!(series.meta.regular_market_price, 103.0);
        assert_eq!(series.meta.currency, "USD");
        assert!(envelope.chart.error.is_none());
    }

    #[test]
    fn test_no_candles_is_empty_envelope() {
        let envelope = chart_envelope("AAPL", &[]);
        assert!(envelope.chart.result.is_none());
        assert_eq!(envelope.chart.error.unwrap().description, NO_DATA_DESCRIPTION);
    }

    #[test]
    fn test_empty_envelope_serializes_null_result() {
        let json = serde_json::to_value(empty_chart()).unwrap();
        assert!(json["chart"]["result"].is_null());
        assert_eq!(json["chart"]["error"]["description"], "No data found");
    }
}
