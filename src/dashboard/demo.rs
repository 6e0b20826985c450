//! Deterministic demo data for a freshly onboarded organization's dashboard.
//!
//! Series are seeded from the organization id so the same organization always
//! sees the same charts.

use chrono::{Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::roi::{CampaignMetrics, Channel, RoiSummary};

pub const DEFAULT_DAYS: u32 = 30;
pub const MAX_DAYS: u32 = 90;

/// One day of activity on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub channel: Channel,
    pub sends: u64,
    pub opens: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: Decimal,
    pub cost: Decimal,
}

impl DailyPoint {
    pub fn metrics(&self) -> CampaignMetrics {
        CampaignMetrics {
            channel: self.channel,
            sends: self.sends,
            conversions: self.conversions,
            revenue: self.revenue,
            cost: self.cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub organization_id: Uuid,
    pub days: u32,
    pub series: Vec<DailyPoint>,
    pub summary: RoiSummary,
}

/// Per-channel shape of the generated traffic.
struct ChannelProfile {
    channel: Channel,
    daily_sends: u64,
    /// Percent ranges applied funnel step by step.
    open_pct: (u64, u64),
    click_pct: (u64, u64),
    convert_pct: (u64, u64),
    /// Cost per send, in hundredths of a cent.
    cost_per_send: i64,
}

pub fn clamp_days(days: u32) -> u32 {
    days.clamp(1, MAX_DAYS)
}

fn seed_for(org_id: Uuid) -> u64 {
    let (hi, lo) = org_id.as_u64_pair();
    hi ^ lo
}

/// Overview for the `days` ending today.
pub fn generate_overview(org_id: Uuid, days: u32) -> Overview {
    generate_overview_until(org_id, days, Utc::now().date_naive())
}

/// Overview for the `days` ending on `end` (inclusive).
pub fn generate_overview_until(org_id: Uuid, days: u32, end: NaiveDate) -> Overview {
    let days = clamp_days(days);
    let mut rng = StdRng::seed_from_u64(seed_for(org_id));

    let profiles = [
        ChannelProfile {
            channel: Channel::Email,
            daily_sends: rng.gen_range(800..5_000),
            open_pct: (18, 35),
            click_pct: (8, 20),
            convert_pct: (5, 15),
            cost_per_send: 10,
        },
        ChannelProfile {
            channel: Channel::Sms,
            daily_sends: rng.gen_range(150..1_500),
            open_pct: (85, 98),
            click_pct: (5, 12),
            convert_pct: (8, 20),
            cost_per_send: 100,
        },
    ];
    // Average order value in cents.
    let order_value: i64 = rng.gen_range(3_000..12_000);

    let start = end - Duration::days(i64::from(days) - 1);
    let mut series = Vec::with_capacity(days as usize * profiles.len());
    for offset in 0..days {
        let date = start + Duration::days(i64::from(offset));
        for profile in &profiles {
            series.push(day_point(&mut rng, profile, date, order_value));
        }
    }

    let metrics: Vec<CampaignMetrics> = series.iter().map(DailyPoint::metrics).collect();
    Overview {
        organization_id: org_id,
        days,
        summary: RoiSummary::from_campaigns(&metrics),
        series,
    }
}

fn day_point(
    rng: &mut StdRng,
    profile: &ChannelProfile,
    date: NaiveDate,
    order_value: i64,
) -> DailyPoint {
    let mut pct = |value: u64, (lo, hi): (u64, u64)| value * rng.gen_range(lo..=hi) / 100;

    let sends = pct(profile.daily_sends, (80, 120));
    let opens = pct(sends, profile.open_pct);
    let clicks = pct(opens, profile.click_pct);
    let conversions = pct(clicks, profile.convert_pct);

    DailyPoint {
        date,
        channel: profile.channel,
        sends,
        opens,
        clicks,
        conversions,
        revenue: Decimal::new(conversions as i64 * order_value, 2),
        cost: Decimal::new(sends as i64 * profile.cost_per_send, 4).round_dp(2),
    }
}
