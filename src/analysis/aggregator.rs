//! Deal aggregation and dashboard statistics.
//!
//! This module turns raw deal records into the summary metrics shown on
//! the dashboard: pipeline value, closed-won value and win rate, plus
//! per-representative and per-status rollups.

use crate::error::MetricsError;
use crate::models::{
    AggregateMetrics, Deal, DealStatus, RawDeal, RawSalesRep, RepSummary, SalesRep,
    StatusTotal,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Compute pipeline metrics over a set of deals.
///
/// The win rate is `closed_won / total * 100` rounded to one decimal place.
/// When the total pipeline value is zero (no deals, or only zero-value
/// deals) the win rate is `0.0`.
///
/// Every value must be finite and non-negative; the first record that
/// is not is reported by position. Values are summed in ascending order,
/// so the result does not depend on the order of `deals`.
pub fn aggregate_metrics(deals: &[Deal]) -> Result<AggregateMetrics, MetricsError> {
    let mut all = Vec::with_capacity(deals.len());
    let mut won = Vec::new();

    for (index, deal) in deals.iter().enumerate() {
        check_value(index, &deal.client, deal.value)?;

        all.push(deal.value);
        if deal.is_won() {
            won.push(deal.value);
        }
    }

    let total = sorted_sum(all);
    if !total.is_finite() {
        return Err(MetricsError::Overflow { deals: deals.len() });
    }
    let closed_won = sorted_sum(won);

    let metrics = AggregateMetrics {
        total_pipeline_value: total,
        closed_won_value: closed_won,
        win_rate_percentage: win_rate(closed_won, total),
    };

    debug!(
        "Aggregated {} deals: total={} won={} rate={}",
        deals.len(),
        metrics.total_pipeline_value,
        metrics.closed_won_value,
        metrics.win_rate_percentage
    );

    Ok(metrics)
}

fn sorted_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

/// Won share of the pipeline as a percentage, zero for an empty pipeline.
fn win_rate(closed_won: f64, total: f64) -> f64 {
    if total > 0.0 {
        round_to_one_decimal(closed_won / total * 100.0)
    } else {
        0.0
    }
}

/// Round half away from zero to one decimal place.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn check_value(index: usize, client: &str, value: f64) -> Result<(), MetricsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MetricsError::InvalidValue {
            index,
            client: client.to_string(),
            value,
        })
    }
}

/// Convert wire records into deals, rejecting malformed values.
pub fn validate_deals(raw: Vec<RawDeal>) -> Result<Vec<Deal>, MetricsError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, deal)| {
            let value = deal
                .value
                .as_f64()
                .ok_or_else(|| MetricsError::NonNumericValue {
                    index,
                    client: deal.client.clone(),
                    raw: deal.value.to_string(),
                })?;
            check_value(index, &deal.client, value)?;

            Ok(Deal {
                client: deal.client,
                value,
                status: deal.status,
                sales_rep: deal.sales_rep,
            })
        })
        .collect()
}

/// Convert a wire representative into a validated one.
pub fn validate_rep(raw: RawSalesRep) -> Result<SalesRep, MetricsError> {
    Ok(SalesRep {
        id: raw.id,
        name: raw.name,
        role: raw.role,
        region: raw.region,
        skills: raw.skills,
        deals: validate_deals(raw.deals)?,
        clients: raw.clients,
    })
}

/// Validate every representative, stopping at the first malformed deal.
pub fn validate_reps(raw: Vec<RawSalesRep>) -> Result<Vec<SalesRep>, MetricsError> {
    raw.into_iter().map(validate_rep).collect()
}

/// Summarize a single representative's book of business.
pub fn rep_summary(rep: &SalesRep) -> Result<RepSummary, MetricsError> {
    Ok(RepSummary {
        id: rep.id,
        name: rep.name.clone(),
        role: rep.role.clone(),
        region: rep.region.clone(),
        skills: rep.skills.clone(),
        deal_count: rep.deals.len(),
        client_count: rep.clients.len(),
        metrics: aggregate_metrics(&rep.deals)?,
    })
}

/// Summaries for every representative, in input order.
pub fn rep_summaries(reps: &[SalesRep]) -> Result<Vec<RepSummary>, MetricsError> {
    reps.iter().map(rep_summary).collect()
}

/// Count and value per status, in dashboard order. Statuses with no
/// deals are still listed with zeroes.
pub fn status_breakdown(deals: &[Deal]) -> Vec<StatusTotal> {
    DealStatus::ALL
        .iter()
        .map(|&status| {
            let values: Vec<f64> = deals
                .iter()
                .filter(|d| d.status == status)
                .map(|d| d.value)
                .collect();
            StatusTotal {
                status,
                count: values.len(),
                value: sorted_sum(values),
            }
        })
        .collect()
}

/// Distinct regions covered by the team, sorted.
pub fn regions(reps: &[SalesRep]) -> Vec<String> {
    reps.iter()
        .map(|r| r.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Representatives ordered by closed-won value, best first.
pub fn top_performers(summaries: &[RepSummary], n: usize) -> Vec<&RepSummary> {
    let mut sorted: Vec<&RepSummary> = summaries.iter().collect();
    sorted.sort_by(|a, b| {
        b.metrics
            .closed_won_value
            .partial_cmp(&a.metrics.closed_won_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deal(value: f64, status: DealStatus) -> Deal {
        Deal::new("Client", value, status)
    }

    fn raw(value: serde_json::Value) -> RawDeal {
        RawDeal {
            client: "Initech".to_string(),
            value,
            status: DealStatus::InProgress,
            sales_rep: Some("Dana".to_string()),
        }
    }

    fn rep(id: u32, region: &str, deals: Vec<Deal>) -> SalesRep {
        SalesRep {
            id,
            name: format!("Rep {}", id),
            role: "Account Executive".to_string(),
            region: region.to_string(),
            skills: vec!["Negotiation".to_string()],
            deals,
            clients: Vec::new(),
        }
    }

    #[test]
    fn test_mixed_statuses() {
        let deals = vec![
            deal(1000.0, DealStatus::ClosedWon),
            deal(2000.0, DealStatus::InProgress),
            deal(500.0, DealStatus::ClosedLost),
        ];

        let metrics = aggregate_metrics(&deals).unwrap();
        assert_eq!(metrics.total_pipeline_value, 3500.0);
        assert_eq!(metrics.closed_won_value, 1000.0);
        assert_eq!(metrics.win_rate_percentage, 28.6);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let metrics = aggregate_metrics(&[]).unwrap();
        assert_eq!(metrics, AggregateMetrics::default());
        assert_eq!(metrics.win_rate_percentage, 0.0);
    }

    #[test]
    fn test_zero_value_pipeline_has_zero_win_rate() {
        let metrics = aggregate_metrics(&[deal(0.0, DealStatus::ClosedWon)]).unwrap();
        assert_eq!(metrics.total_pipeline_value, 0.0);
        assert_eq!(metrics.win_rate_percentage, 0.0);
        assert!(!metrics.win_rate_percentage.is_nan());
    }

    #[test]
    fn test_all_won_is_one_hundred_percent() {
        let deals = vec![
            deal(10.0, DealStatus::ClosedWon),
            deal(30.0, DealStatus::ClosedWon),
        ];
        let metrics = aggregate_metrics(&deals).unwrap();
        assert_eq!(metrics.win_rate_percentage, 100.0);
    }

    #[test]
    fn test_won_never_exceeds_total() {
        let deals = vec![
            deal(250.0, DealStatus::ClosedWon),
            deal(0.0, DealStatus::InProgress),
            deal(75.5, DealStatus::ClosedLost),
            deal(1.25, DealStatus::ClosedWon),
        ];
        let metrics = aggregate_metrics(&deals).unwrap();
        assert!(metrics.total_pipeline_value >= metrics.closed_won_value);
        assert!(metrics.closed_won_value >= 0.0);
        assert!((0.0..=100.0).contains(&metrics.win_rate_percentage));
    }

    #[test]
    fn test_idempotent_and_order_invariant() {
        let deals = vec![
            deal(1000.0, DealStatus::ClosedWon),
            deal(2000.0, DealStatus::InProgress),
            deal(500.0, DealStatus::ClosedLost),
            deal(4200.0, DealStatus::ClosedWon),
        ];
        let first = aggregate_metrics(&deals).unwrap();
        assert_eq!(first, aggregate_metrics(&deals).unwrap());

        let mut reversed = deals.clone();
        reversed.reverse();
        assert_eq!(first, aggregate_metrics(&reversed).unwrap());

        let mut rotated = deals;
        rotated.rotate_left(2);
        assert_eq!(first, aggregate_metrics(&rotated).unwrap());
    }

    #[test]
    fn test_fractional_values_are_order_invariant() {
        let deals = vec![
            deal(0.1, DealStatus::ClosedWon),
            deal(0.2, DealStatus::InProgress),
            deal(0.3, DealStatus::ClosedLost),
            deal(0.7, DealStatus::ClosedWon),
        ];
        let first = aggregate_metrics(&deals).unwrap();

        let mut reversed = deals.clone();
        reversed.reverse();
        assert_eq!(first, aggregate_metrics(&reversed).unwrap());

        let mut shuffled = deals;
        shuffled.swap(0, 2);
        shuffled.swap(1, 3);
        assert_eq!(first, aggregate_metrics(&shuffled).unwrap());
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let deals = vec![
            deal(1e308, DealStatus::ClosedWon),
            deal(1e308, DealStatus::ClosedWon),
        ];
        let err = aggregate_metrics(&deals).unwrap_err();
        assert_eq!(err, MetricsError::Overflow { deals: 2 });
    }

    #[test]
    fn test_rejects_negative_value() {
        let deals = vec![
            deal(100.0, DealStatus::ClosedWon),
            deal(-1.0, DealStatus::InProgress),
        ];
        let err = aggregate_metrics(&deals).unwrap_err();
        assert_eq!(err.index(), Some(1));
        assert!(matches!(err, MetricsError::InvalidValue { value, .. } if value == -1.0));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        assert!(aggregate_metrics(&[deal(f64::NAN, DealStatus::ClosedWon)]).is_err());
        assert!(aggregate_metrics(&[deal(f64::INFINITY, DealStatus::InProgress)]).is_err());
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to_one_decimal(28.571_428), 28.6);
        assert_eq!(round_to_one_decimal(33.333), 33.3);
        assert_eq!(round_to_one_decimal(66.666), 66.7);
        assert_eq!(round_to_one_decimal(12.25), 12.3);
    }

    #[test]
    fn test_validate_deals() {
        let deals = validate_deals(vec![raw(json!(1500)), raw(json!(99.5))]).unwrap();
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].value, 1500.0);
        assert_eq!(deals[1].value, 99.5);
        assert_eq!(deals[1].sales_rep.as_deref(), Some("Dana"));
    }

    #[test]
    fn test_validate_deals_rejects_non_numeric() {
        let err = validate_deals(vec![raw(json!(10)), raw(json!("ten"))]).unwrap_err();
        assert_eq!(
            err,
            MetricsError::NonNumericValue {
                index: 1,
                client: "Initech".to_string(),
                raw: "\"ten\"".to_string(),
            }
        );

        assert!(validate_deals(vec![raw(serde_json::Value::Null)]).is_err());
    }

    #[test]
    fn test_validate_deals_rejects_negative() {
        let err = validate_deals(vec![raw(json!(-20))]).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidValue { index: 0, .. }));
    }

    #[test]
    fn test_validate_rep_rejects_nested_non_numeric() {
        let raw_rep = RawSalesRep {
            id: 4,
            name: "Erin".to_string(),
            role: "Account Executive".to_string(),
            region: "LATAM".to_string(),
            skills: Vec::new(),
            deals: vec![raw(json!(500)), raw(json!({"amount": 5}))],
            clients: Vec::new(),
        };

        let err = validate_reps(vec![raw_rep]).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::NonNumericValue { index: 1, ref client, .. } if client == "Initech"
        ));
    }

    #[test]
    fn test_rep_summary() {
        let r = rep(
            7,
            "EMEA",
            vec![
                deal(300.0, DealStatus::ClosedWon),
                deal(100.0, DealStatus::InProgress),
            ],
        );
        let summary = rep_summary(&r).unwrap();
        assert_eq!(summary.id, 7);
        assert_eq!(summary.deal_count, 2);
        assert_eq!(summary.client_count, 0);
        assert_eq!(summary.metrics.total_pipeline_value, 400.0);
        assert_eq!(summary.metrics.closed_won_value, 300.0);
        assert_eq!(summary.metrics.win_rate_percentage, 75.0);
    }

    #[test]
    fn test_status_breakdown_lists_every_status() {
        let deals = vec![
            deal(100.0, DealStatus::ClosedWon),
            deal(50.0, DealStatus::ClosedWon),
            deal(20.0, DealStatus::ClosedLost),
        ];
        let breakdown = status_breakdown(&deals);

        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].status, DealStatus::ClosedWon);
        assert_eq!(breakdown[0].count, 2);
        assert_eq!(breakdown[0].value, 150.0);
        assert_eq!(breakdown[1].status, DealStatus::InProgress);
        assert_eq!(breakdown[1].count, 0);
        assert_eq!(breakdown[1].value, 0.0);
        assert_eq!(breakdown[2].count, 1);
    }

    #[test]
    fn test_regions_are_distinct_and_sorted() {
        let reps = vec![
            rep(1, "North America", vec![]),
            rep(2, "Europe", vec![]),
            rep(3, "North America", vec![]),
        ];
        assert_eq!(regions(&reps), vec!["Europe", "North America"]);
    }

    #[test]
    fn test_top_performers() {
        let reps = vec![
            rep(1, "APAC", vec![deal(100.0, DealStatus::ClosedWon)]),
            rep(2, "APAC", vec![deal(900.0, DealStatus::ClosedWon)]),
            rep(3, "APAC", vec![deal(5000.0, DealStatus::InProgress)]),
        ];
        let summaries = rep_summaries(&reps).unwrap();
        let top = top_performers(&summaries, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, 2);
        assert_eq!(top[1].id, 1);
    }
}
