//! Structured query plans.
//!
//! A synthesized query is a `QueryPlan` — projection, predicates, ordering,
//! limit — composed *before* rendering. Constraining a plan (e.g. by a
//! platform whitelist) is a list append; clause placement relative to
//! `ORDER BY`/`LIMIT` falls out of render-time composition, never string
//! surgery on SQL text.
//!
//! Only pre-validated, typed parameters ever appear in a plan: `f64`/`u32`
//! numerics, `chrono::NaiveDate`, and [`PlatformId`]. Free-form user text
//! cannot reach a rendered query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::platform::PlatformId;

// ─── Intent & parameters ─────────────────────────────────────────────────────

/// The classified intent behind a user question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
  Location,
  Temporal,
  Comparative,
  Statistical,
  Nearest,
  General,
}

/// Typed parameters extracted from a question and/or supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
  pub latitude:    Option<f64>,
  pub longitude:   Option<f64>,
  pub date:        Option<NaiveDate>,
  pub depth:       Option<f64>,
  pub platform_id: Option<PlatformId>,
}

// ─── Plan parts ──────────────────────────────────────────────────────────────

/// Columns selected by row-shaped plans, in the order the store decodes them.
pub const OBSERVATION_COLUMNS: &str = "platform_id, profile_id, latitude, \
   longitude, observed_at, depth_min, depth_max, temperature_avg, \
   salinity_avg, pressure_avg, inserted_at";

const STATS_COLUMNS: &str = "COUNT(*) AS profile_count, \
   AVG(temperature_avg) AS avg_temperature, \
   MIN(temperature_avg) AS min_temperature, \
   MAX(temperature_avg) AS max_temperature, \
   AVG(salinity_avg) AS avg_salinity, \
   MIN(salinity_avg) AS min_salinity, \
   MAX(salinity_avg) AS max_salinity, \
   AVG(depth_max - depth_min) AS avg_depth_range";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
  /// Full observation rows.
  Observations,
  /// Count plus avg/min/max aggregates over temperature and salinity.
  Stats,
}

impl Projection {
  fn columns(self) -> &'static str {
    match self {
      Projection::Observations => OBSERVATION_COLUMNS,
      Projection::Stats => STATS_COLUMNS,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
  /// Both temperature and salinity present.
  MeasurementsPresent,
  /// Both latitude and longitude present.
  CoordinatesPresent,
  /// Calendar-date equality on `observed_at`.
  ObservedOn(NaiveDate),
  /// Rows observed within the trailing N days.
  ObservedWithinDays(u32),
  /// Restrict to a validated platform whitelist. An empty whitelist matches
  /// nothing — never everything.
  PlatformIn(Vec<PlatformId>),
}

impl Predicate {
  fn to_sql(&self) -> String {
    match self {
      Predicate::MeasurementsPresent => {
        "(temperature_avg IS NOT NULL AND salinity_avg IS NOT NULL)".to_owned()
      }
      Predicate::CoordinatesPresent => {
        "(latitude IS NOT NULL AND longitude IS NOT NULL)".to_owned()
      }
      Predicate::ObservedOn(date) => {
        format!("DATE(observed_at) = '{}'", date.format("%Y-%m-%d"))
      }
      Predicate::ObservedWithinDays(days) => {
        format!("observed_at >= datetime('now', '-{days} days')")
      }
      Predicate::PlatformIn(ids) if ids.is_empty() => {
        // Platform ids are non-negative, so this matches no row.
        "platform_id IN (-1)".to_owned()
      }
      Predicate::PlatformIn(ids) => {
        let list: Vec<String> = ids.iter().map(PlatformId::to_string).collect();
        format!("platform_id IN ({})", list.join(","))
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderBy {
  /// Most recent observations first.
  TimeDesc,
  /// Closest observations first, by a planar squared-degree approximation.
  /// Exact geodesic ranking belongs to the resolver; this is only a SQL
  /// ordering hint over already-bounded row sets.
  NearestTo { latitude: f64, longitude: f64 },
}

impl OrderBy {
  fn to_sql(&self) -> String {
    match self {
      OrderBy::TimeDesc => "observed_at DESC".to_owned(),
      OrderBy::NearestTo { latitude, longitude } => format!(
        "((latitude - ({latitude})) * (latitude - ({latitude})) \
         + (longitude - ({longitude})) * (longitude - ({longitude}))) ASC"
      ),
    }
  }
}

// ─── Plan ────────────────────────────────────────────────────────────────────

/// The structured, pre-render representation of a synthesized query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
  pub projection: Projection,
  pub predicates: Vec<Predicate>,
  pub order_by:   Option<OrderBy>,
  pub limit:      Option<u32>,
}

impl QueryPlan {
  /// Render the plan to a single SQL statement over the shared
  /// `observations` relation.
  pub fn to_sql(&self) -> String {
    let mut sql = format!("SELECT {} FROM observations", self.projection.columns());

    if !self.predicates.is_empty() {
      let clauses: Vec<String> = self.predicates.iter().map(Predicate::to_sql).collect();
      sql.push_str(" WHERE ");
      sql.push_str(&clauses.join(" AND "));
    }
    if let Some(order) = &self.order_by {
      sql.push_str(" ORDER BY ");
      sql.push_str(&order.to_sql());
    }
    if let Some(limit) = self.limit {
      sql.push_str(&format!(" LIMIT {limit}"));
    }

    sql
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pid(s: &str) -> PlatformId { PlatformId::parse(s).unwrap() }

  #[test]
  fn renders_bare_plan() {
    let plan = QueryPlan {
      projection: Projection::Observations,
      predicates: vec![],
      order_by:   None,
      limit:      None,
    };
    assert_eq!(plan.to_sql(), format!("SELECT {OBSERVATION_COLUMNS} FROM observations"));
  }

  #[test]
  fn predicates_join_with_and_before_order_and_limit() {
    let plan = QueryPlan {
      projection: Projection::Observations,
      predicates: vec![
        Predicate::MeasurementsPresent,
        Predicate::PlatformIn(vec![pid("123"), pid("456")]),
      ],
      order_by:   Some(OrderBy::TimeDesc),
      limit:      Some(10),
    };
    let sql = plan.to_sql();
    assert!(sql.contains(
      "WHERE (temperature_avg IS NOT NULL AND salinity_avg IS NOT NULL) \
       AND platform_id IN (123,456)"
    ));
    assert!(sql.ends_with("ORDER BY observed_at DESC LIMIT 10"));
  }

  #[test]
  fn empty_platform_whitelist_matches_nothing() {
    let sql = Predicate::PlatformIn(vec![]).to_sql();
    assert_eq!(sql, "platform_id IN (-1)");
  }

  #[test]
  fn observed_on_renders_calendar_date() {
    let date = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
    assert_eq!(
      Predicate::ObservedOn(date).to_sql(),
      "DATE(observed_at) = '2023-03-01'"
    );
  }

  #[test]
  fn proximity_order_parenthesizes_negative_coordinates() {
    let sql = OrderBy::NearestTo { latitude: -10.5, longitude: 75.0 }.to_sql();
    assert!(sql.contains("(latitude - (-10.5))"));
    assert!(sql.contains("(longitude - (75))"));
  }

  #[test]
  fn stats_projection_selects_aggregates() {
    let plan = QueryPlan {
      projection: Projection::Stats,
      predicates: vec![],
      order_by:   None,
      limit:      None,
    };
    let sql = plan.to_sql();
    assert!(sql.contains("COUNT(*) AS profile_count"));
    assert!(sql.contains("AVG(salinity_avg) AS avg_salinity"));
    assert!(!sql.contains("WHERE"));
  }
}
