//! Campaign return-on-investment math.
//!
//! Money is `Decimal` throughout; derived percentages are rounded to two
//! decimal places and are `None` whenever their denominator is zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Messaging channel a campaign was sent over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
}

/// Raw performance numbers for one campaign (or one day of one channel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub channel: Channel,
    pub sends: u64,
    pub conversions: u64,
    pub revenue: Decimal,
    pub cost: Decimal,
}

impl CampaignMetrics {
    /// `(revenue - cost) / cost * 100`.
    pub fn roi_percent(&self) -> Option<Decimal> {
        roi_percent(self.revenue, self.cost)
    }

    /// Conversions per hundred sends.
    pub fn conversion_rate(&self) -> Option<Decimal> {
        percent_of(self.conversions, self.sends)
    }
}

pub fn roi_percent(revenue: Decimal, cost: Decimal) -> Option<Decimal> {
    if cost.is_zero() {
        return None;
    }
    Some(((revenue - cost) / cost * dec!(100)).round_dp(2))
}

fn percent_of(part: u64, whole: u64) -> Option<Decimal> {
    if whole == 0 {
        return None;
    }
    Some((Decimal::from(part) / Decimal::from(whole) * dec!(100)).round_dp(2))
}

/// Summed metrics with their derived ratios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub sends: u64,
    pub conversions: u64,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub roi_percent: Option<Decimal>,
    pub conversion_rate: Option<Decimal>,
}

impl Totals {
    fn sum<'a>(campaigns: impl Iterator<Item = &'a CampaignMetrics>) -> Self {
        let (sends, conversions, revenue, cost) = campaigns.fold(
            (0u64, 0u64, Decimal::ZERO, Decimal::ZERO),
            |(s, c, r, k), m| (s + m.sends, c + m.conversions, r + m.revenue, k + m.cost),
        );
        Self {
            sends,
            conversions,
            revenue,
            cost,
            roi_percent: roi_percent(revenue, cost),
            conversion_rate: percent_of(conversions, sends),
        }
    }
}

/// Per-channel and overall totals for a set of campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiSummary {
    pub email: Totals,
    pub sms: Totals,
    pub overall: Totals,
}

impl RoiSummary {
    pub fn from_campaigns(campaigns: &[CampaignMetrics]) -> Self {
        let of = |channel: Channel| {
            Totals::sum(campaigns.iter().filter(move |m| m.channel == channel))
        };
        Self {
            email: of(Channel::Email),
            sms: of(Channel::Sms),
            overall: Totals::sum(campaigns.iter()),
        }
    }
}
