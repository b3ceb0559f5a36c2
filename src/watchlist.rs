use chrono::{Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DealError;
use crate::living_cost;
use crate::records::now_iso;

/// Direction of a card's headline figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// One dashboard card summarizing a watchlist feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistCard {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub summary: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub trend: Trend,
    pub badge: String,
}

const FRANKFURTER_BASE: &str = "https://api.frankfurter.app";
const TOPIS_SPEED_URL: &str = "https://topis.seoul.go.kr/main/selectSpdStat.do";

/// Map a signed movement to a trend, with a small dead zone around zero
pub fn as_trend(n: f64) -> Trend {
    if n > 0.001 {
        Trend::Up
    } else if n < -0.001 {
        Trend::Down
    } else {
        Trend::Flat
    }
}

/// Static loading-state cards, also used as per-feed fallbacks.
/// Order: living-cost, fx, traffic.
pub fn default_cards() -> Vec<WatchlistCard> {
    let now = now_iso();
    vec![
        WatchlistCard {
            id: "living-cost".to_string(),
            title: "생활물가 모아봄".to_string(),
            subtitle: "장바구니 · 유가 · 생활요금".to_string(),
            summary: "핵심 품목 변동 데이터를 불러오는 중".to_string(),
            updated_at: now.clone(),
            trend: Trend::Flat,
            badge: "로딩".to_string(),
        },
        WatchlistCard {
            id: "fx".to_string(),
            title: "오늘의 환율 모아봄".to_string(),
            subtitle: "USD/KRW · JPY/KRW · EUR/KRW".to_string(),
            summary: "실시간 환율 데이터를 불러오는 중".to_string(),
            updated_at: now.clone(),
            trend: Trend::Flat,
            badge: "로딩".to_string(),
        },
        WatchlistCard {
            id: "traffic".to_string(),
            title: "출퇴근 정체 모아봄".to_string(),
            subtitle: "내 경로 · 평균 대비 소요시간".to_string(),
            summary: "실시간 교통 데이터를 불러오는 중".to_string(),
            updated_at: now,
            trend: Trend::Flat,
            badge: "로딩".to_string(),
        },
    ]
}

/// All three live cards, fetched concurrently. Each feed fails in
/// isolation: a failed build is replaced by its static fallback and never
/// cancels or fails the others.
pub async fn live_cards(client: &Client) -> Vec<WatchlistCard> {
    let (living, fx, traffic) = tokio::join!(
        build_living_cost_card(client),
        build_fx_card(client),
        build_traffic_card(client),
    );

    let fallback = default_cards();
    vec![
        unwrap_or_fallback("living-cost", living, fallback[0].clone()),
        unwrap_or_fallback("fx", fx, fallback[1].clone()),
        unwrap_or_fallback("traffic", traffic, fallback[2].clone()),
    ]
}

fn unwrap_or_fallback(
    id: &str,
    result: Result<WatchlistCard, DealError>,
    fallback: WatchlistCard,
) -> WatchlistCard {
    match result {
        Ok(card) => card,
        Err(e) => {
            ::log::warn!("watchlist card {id} failed, using fallback: {e}");
            fallback
        }
    }
}

async fn fetch_json(client: &Client, url: &str) -> Result<Value, DealError> {
    let response = client
        .get(url)
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DealError::UpstreamStatus {
            feed: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.json().await?)
}

async fn build_fx_card(client: &Client) -> Result<WatchlistCard, DealError> {
    let latest = fetch_json(
        client,
        &format!("{FRANKFURTER_BASE}/latest?from=USD&to=KRW,JPY,EUR"),
    )
    .await?;
    let krw = latest
        .pointer("/rates/KRW")
        .map(|v| v.as_f64().unwrap_or(0.0))
        .unwrap_or(0.0);

    // Yesterday's rate only refines the diff; its failure is not fatal
    let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d");
    let diff = match fetch_json(
        client,
        &format!("{FRANKFURTER_BASE}/{yesterday}?from=USD&to=KRW"),
    )
    .await
    {
        Ok(prev) => {
            let prev_krw = prev
                .pointer("/rates/KRW")
                .and_then(Value::as_f64)
                .unwrap_or(krw);
            krw - prev_krw
        }
        Err(e) => {
            ::log::debug!("fx diff lookup failed: {e}");
            0.0
        }
    };

    Ok(fx_card(krw, diff))
}

/// Assemble the FX card from the current rate and day-over-day diff
pub fn fx_card(krw: f64, diff: f64) -> WatchlistCard {
    let sign = if diff >= 0.0 { "+" } else { "" };
    WatchlistCard {
        id: "fx".to_string(),
        title: "오늘의 환율 모아봄".to_string(),
        subtitle: "USD/KRW · JPY · EUR".to_string(),
        summary: format!("USD/KRW {krw:.2} ({sign}{diff:.2})"),
        updated_at: now_iso(),
        trend: as_trend(-diff),
        badge: "실시간".to_string(),
    }
}

async fn build_traffic_card(client: &Client) -> Result<WatchlistCard, DealError> {
    let data = fetch_json(client, TOPIS_SPEED_URL).await?;
    Ok(traffic_card(&data))
}

/// Assemble the traffic card from a TOPIS speed-stat response.
/// Class code: 1 = free flow, 2 = slow, 3 = congested.
pub fn traffic_card(data: &Value) -> WatchlistCard {
    let row = data.pointer("/rows/0").cloned().unwrap_or_default();
    let v1 = row.get("val1").map(living_cost::to_number).unwrap_or(0.0);
    let v2 = row.get("val2").map(living_cost::to_number).unwrap_or(0.0);
    let class_code = row.get("trfClsCd2").and_then(Value::as_str).unwrap_or("2");

    let status = match class_code {
        "1" => "원활",
        "2" => "서행",
        _ => "정체",
    };
    let trend = match class_code {
        "3" => Trend::Up,
        "1" => Trend::Down,
        _ => Trend::Flat,
    };

    WatchlistCard {
        id: "traffic".to_string(),
        title: "출퇴근 정체 모아봄".to_string(),
        subtitle: "서울 TOPIS 실시간 속도".to_string(),
        summary: format!("도심 {v1:.1}km/h · 간선 {v2:.1}km/h ({status})"),
        updated_at: now_iso(),
        trend,
        badge: status.to_string(),
    }
}

async fn build_living_cost_card(client: &Client) -> Result<WatchlistCard, DealError> {
    let snap = living_cost::get_living_cost_snapshot(client).await;
    let top_up = snap.rising_top10.first();
    let top_down = snap.falling_top10.first();

    let up_pct = top_up.map(|i| i.change_pct).unwrap_or(0.0);
    let down_pct = top_down.map(|i| i.change_pct).unwrap_or(0.0);

    Ok(WatchlistCard {
        id: "living-cost".to_string(),
        title: "생활물가 모아봄".to_string(),
        subtitle: "공공 농수산물 가격 동향".to_string(),
        summary: format!(
            "상승 {} +{}원 / 하락 {} {}원",
            top_up.map(|i| i.name.as_str()).unwrap_or("-"),
            top_up.map(|i| i.change_krw).unwrap_or(0),
            top_down.map(|i| i.name.as_str()).unwrap_or("-"),
            top_down.map(|i| i.change_krw).unwrap_or(0),
        ),
        updated_at: snap.updated_at,
        trend: if up_pct >= down_pct.abs() {
            Trend::Up
        } else {
            Trend::Down
        },
        badge: "실시간".to_string(),
    })
}
