use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DealError;
use crate::records::now_iso;

/// One tracked grocery/household item with its daily price movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMoveItem {
    pub name: String,
    pub unit: String,
    /// Current price in KRW
    pub price: i64,
    /// Day-over-day change in percent
    pub change_pct: f64,
    /// Day-over-day change in KRW, derived from `price` and `change_pct`
    pub change_krw: i64,
}

/// Rising/falling movers, top 10 each way
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivingCostSnapshot {
    pub updated_at: String,
    pub rising_top10: Vec<PriceMoveItem>,
    pub falling_top10: Vec<PriceMoveItem>,
}

const KAMIS_ENDPOINT: &str = "https://www.kamis.or.kr/service/price/json.do";

/// Live rows below this count are considered a bad feed day and the static
/// fallback table is used instead.
const MIN_LIVE_ITEMS: usize = 10;

// (name, unit, price, change_pct) fallback table used when the KAMIS feed
// is unavailable or too thin.
const FALLBACK_ITEMS: &[(&str, &str, i64, f64)] = &[
    ("사과", "1개", 3980, 6.2),
    ("배추", "1포기", 5120, 4.8),
    ("달걀", "30구", 7290, 3.9),
    ("우유", "1L", 2980, 2.7),
    ("쌀", "10kg", 31900, 2.3),
    ("돼지고기", "100g", 2380, 1.8),
    ("양파", "1kg", 3490, 1.4),
    ("대파", "1단", 2690, 1.1),
    ("식용유", "900ml", 6980, 0.8),
    ("커피믹스", "100T", 12900, 0.5),
    ("감자", "1kg", 2980, -0.6),
    ("토마토", "1kg", 4880, -0.9),
    ("두부", "1모", 2380, -1.2),
    ("참치캔", "150g", 2580, -1.4),
    ("라면", "5입", 4280, -1.8),
    ("바나나", "1송이", 3480, -2.1),
    ("당근", "1kg", 2590, -2.4),
    ("시금치", "1단", 1980, -2.9),
    ("오이", "1개", 980, -3.2),
    ("고등어", "1마리", 3490, -3.7),
];

fn make_item(name: &str, unit: &str, price: i64, change_pct: f64) -> PriceMoveItem {
    PriceMoveItem {
        name: name.to_string(),
        unit: unit.to_string(),
        price,
        change_pct,
        change_krw: ((price as f64) * change_pct / 100.0).round() as i64,
    }
}

fn fallback_items() -> Vec<PriceMoveItem> {
    FALLBACK_ITEMS
        .iter()
        .map(|(name, unit, price, pct)| make_item(name, unit, *price, *pct))
        .collect()
}

/// Coerce a loosely typed feed value to a number, stripping currency
/// symbols and thousands separators from strings. Anything unparseable
/// becomes 0.
pub(crate) fn to_number(raw: &Value) -> f64 {
    match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn str_field<'a>(row: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| row.get(*k).and_then(Value::as_str))
}

fn num_field(row: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .filter_map(|k| row.get(*k))
        .map(to_number)
        .find(|n| *n != 0.0)
        .unwrap_or(0.0)
}

/// Map the KAMIS response to price-move items.
///
/// The feed's field names drift between deployments, so every lookup tries
/// the spellings observed in the wild. Rows without a name or price are
/// dropped. No schema validation beyond that.
pub fn parse_kamis_rows(data: &Value) -> Vec<PriceMoveItem> {
    let rows = data
        .pointer("/data/item")
        .or_else(|| data.get("price"))
        .or_else(|| data.get("items"))
        .or_else(|| data.get("data"))
        .and_then(Value::as_array);

    let Some(rows) = rows else {
        return Vec::new();
    };

    rows.iter()
        .filter_map(|row| {
            let name = str_field(row, &["productName", "productname", "item_name", "itemname"])?
                .trim()
                .to_string();
            let unit = str_field(row, &["unit", "unitname"]).unwrap_or("1개").trim();
            let price = num_field(row, &["price", "dpr1", "todayPrice", "today_price"]);
            let change_pct = num_field(row, &["rate", "changeRate", "chanYearday", "day_change_rate"]);
            if name.is_empty() || price == 0.0 {
                return None;
            }
            Some(make_item(&name, unit, price.round() as i64, change_pct))
        })
        .collect()
}

/// Build a snapshot from a full item list: movers split by sign, sorted by
/// magnitude, truncated to 10 each way.
pub fn snapshot_from_items(items: Vec<PriceMoveItem>) -> LivingCostSnapshot {
    let mut rising: Vec<PriceMoveItem> =
        items.iter().filter(|i| i.change_pct > 0.0).cloned().collect();
    rising.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    rising.truncate(10);

    let mut falling: Vec<PriceMoveItem> =
        items.iter().filter(|i| i.change_pct < 0.0).cloned().collect();
    falling.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));
    falling.truncate(10);

    LivingCostSnapshot {
        updated_at: now_iso(),
        rising_top10: rising,
        falling_top10: falling,
    }
}

async fn fetch_kamis_items(client: &Client) -> Result<Vec<PriceMoveItem>, DealError> {
    // No key configured means "no live feed", not an error
    let Ok(key) = std::env::var("KAMIS_API_KEY") else {
        return Ok(Vec::new());
    };
    let cert_id = std::env::var("KAMIS_CERT_ID").unwrap_or_else(|_| "moabom".to_string());

    let response = client
        .get(KAMIS_ENDPOINT)
        .query(&[
            ("action", "dailyPriceByCategoryList"),
            ("p_cert_key", key.as_str()),
            ("p_cert_id", cert_id.as_str()),
            ("p_returntype", "json"),
        ])
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(DealError::UpstreamStatus {
            feed: "kamis".to_string(),
            status: response.status().as_u16(),
        });
    }

    let data: Value = response.json().await?;
    Ok(parse_kamis_rows(&data))
}

/// Current living-cost movers, preferring the live KAMIS feed and falling
/// back to the static table when the feed is missing, failing, or thin.
pub async fn get_living_cost_snapshot(client: &Client) -> LivingCostSnapshot {
    let live = match fetch_kamis_items(client).await {
        Ok(items) => items,
        Err(e) => {
            ::log::warn!("living-cost feed unavailable: {e}");
            Vec::new()
        }
    };

    let source = if live.len() >= MIN_LIVE_ITEMS {
        live
    } else {
        fallback_items()
    };
    snapshot_from_items(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_number_coercion() {
        assert_eq!(to_number(&json!(3980)), 3980.0);
        assert_eq!(to_number(&json!("3,980원")), 3980.0);
        assert_eq!(to_number(&json!("-1.8%")), -1.8);
        assert_eq!(to_number(&json!("없음")), 0.0);
        assert_eq!(to_number(&json!(null)), 0.0);
    }

    #[test]
    fn test_change_krw_derived_from_price() {
        let item = make_item("사과", "1개", 3980, 6.2);
        assert_eq!(item.change_krw, 247);

        let item = make_item("고등어", "1마리", 3490, -3.7);
        assert_eq!(item.change_krw, -129);
    }

    #[test]
    fn test_parse_kamis_rows_field_spellings() {
        let data = json!({
            "data": {
                "item": [
                    { "productName": "사과", "unit": "1개", "price": "3,980", "rate": "6.2" },
                    { "item_name": "배추", "unitname": "1포기", "dpr1": "5,120", "changeRate": 4.8 },
                    { "productName": "", "price": 100, "rate": 1.0 },
                    { "productName": "무가격", "rate": 1.0 }
                ]
            }
        });
        let items = parse_kamis_rows(&data);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "사과");
        assert_eq!(items[0].price, 3980);
        assert_eq!(items[1].name, "배추");
        assert_eq!(items[1].change_pct, 4.8);
    }

    #[test]
    fn test_parse_kamis_rows_alternate_root() {
        let data = json!({ "price": [ { "productname": "쌀", "price": 31900, "rate": 2.3 } ] });
        assert_eq!(parse_kamis_rows(&data).len(), 1);

        let data = json!({ "status": "error" });
        assert!(parse_kamis_rows(&data).is_empty());
    }

    #[test]
    fn test_snapshot_splits_and_sorts_movers() {
        let snap = snapshot_from_items(fallback_items());
        assert_eq!(snap.rising_top10.len(), 10);
        assert_eq!(snap.falling_top10.len(), 10);
        assert_eq!(snap.rising_top10[0].name, "사과");
        assert_eq!(snap.falling_top10[0].name, "고등어");
        // Rising sorted descending, falling ascending
        assert!(snap.rising_top10[0].change_pct >= snap.rising_top10[9].change_pct);
        assert!(snap.falling_top10[0].change_pct <= snap.falling_top10[9].change_pct);
    }
}
