use serde::{Deserialize, Serialize};

mod error;

pub use error::{UpstreamError, UpstreamErrorBody};

/// One trading day of OHLCV data as served by the history provider.
/// The wire format uses PascalCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DailyRecord {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_record_pass_deserialize_pascal_case() {
        let json = r#"{"Open":100.0,"High":101.5,"Low":99.0,"Close":100.8,"Volume":123456}"#;
        let record: DailyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.close, 100.8);
        assert_eq!(record.volume, 123456);
    }

    #[test]
    fn daily_record_pass_serialize_pascal_case() {
        let record = DailyRecord {
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Close"], 1.5);
        assert!(json.get("close").is_none());
    }

    #[test]
    fn daily_record_fail_missing_field() {
        let json = r#"{"Open":100.0,"High":101.5,"Low":99.0,"Close":100.8}"#;
        assert!(serde_json::from_str::<DailyRecord>(json).is_err());
    }
}
