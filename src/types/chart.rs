use serde::{Deserialize, Serialize};

/// Chart timeframe selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartTimeframe {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl ChartTimeframe {
    pub const ALL: [ChartTimeframe; 4] = [
        ChartTimeframe::FifteenMinutes,
        ChartTimeframe::OneHour,
        ChartTimeframe::FourHours,
        ChartTimeframe::OneDay,
    ];

    /// Get the timeframe from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "15m" => Some(ChartTimeframe::FifteenMinutes),
            "1h" => Some(ChartTimeframe::OneHour),
            "4h" => Some(ChartTimeframe::FourHours),
            "1d" => Some(ChartTimeframe::OneDay),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartTimeframe::FifteenMinutes => "15m",
            ChartTimeframe::OneHour => "1h",
            ChartTimeframe::FourHours => "4h",
            ChartTimeframe::OneDay => "1d",
        }
    }

    /// Next timeframe in the selector, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl Default for ChartTimeframe {
    fn default() -> Self {
        ChartTimeframe::OneHour
    }
}

/// One point of the price line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Time label, `HH:MM`
    pub label: String,
    pub value: f64,
}

/// Chart state returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSnapshot {
    pub symbol: String,
    /// Series label shown in the legend
    pub label: String,
    pub timeframe: ChartTimeframe,
    pub points: Vec<PricePoint>,
}

impl ChartSnapshot {
    /// Min and max of the series, if any.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.value);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_round_trip_and_cycle() {
        for tf in ChartTimeframe::ALL {
            assert_eq!(ChartTimeframe::parse(tf.as_str()), Some(tf));
        }
        assert_eq!(ChartTimeframe::parse("1w"), None);
        assert_eq!(ChartTimeframe::OneDay.next(), ChartTimeframe::FifteenMinutes);
    }

    #[test]
    fn test_bounds() {
        let snapshot = ChartSnapshot {
            symbol: "BTCUSDT".to_string(),
            label: "BTC/USDT".to_string(),
            timeframe: ChartTimeframe::OneHour,
            points: vec![
                PricePoint { label: "10:00".to_string(), value: 3.0 },
                PricePoint { label: "11:00".to_string(), value: 1.0 },
                PricePoint { label: "12:00".to_string(), value: 2.0 },
            ],
        };
        assert_eq!(snapshot.bounds(), Some((1.0, 3.0)));
    }
}
