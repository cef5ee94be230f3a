//! Plan rendering — one fixed shape per intent.
//!
//! Shapes only vary on which *validated* parameters are available; the
//! question text itself never influences a plan beyond its classified
//! intent.

use pelagic_core::plan::{
  IntentType, OrderBy, Predicate, Projection, QueryParams, QueryPlan,
};

// Row caps per shape; every rendered plan stays bounded.
const PROXIMITY_LIMIT: u32 = 5;
const NEAREST_LIMIT: u32 = 2;
const RECENCY_LIMIT: u32 = 20;
const TEMPORAL_LIMIT: u32 = 50;
const RECENT_WINDOW_DAYS: u32 = 30;

/// Produce the plan for a classified intent and its extracted parameters.
pub fn render(intent: IntentType, params: &QueryParams) -> QueryPlan {
  match intent {
    IntentType::Location => match coords(params) {
      Some((lat, lon)) => proximity_plan(lat, lon, PROXIMITY_LIMIT),
      None => recency_plan(vec![Predicate::CoordinatesPresent], RECENCY_LIMIT),
    },
    IntentType::Nearest => match coords(params) {
      Some((lat, lon)) => proximity_plan(lat, lon, NEAREST_LIMIT),
      None => recency_plan(vec![Predicate::CoordinatesPresent], NEAREST_LIMIT),
    },
    IntentType::Temporal => {
      let predicate = match params.date {
        Some(date) => Predicate::ObservedOn(date),
        None => Predicate::ObservedWithinDays(RECENT_WINDOW_DAYS),
      };
      recency_plan(vec![predicate], TEMPORAL_LIMIT)
    }
    IntentType::Statistical => QueryPlan {
      projection: Projection::Stats,
      predicates: vec![],
      order_by:   None,
      limit:      None,
    },
    IntentType::Comparative | IntentType::General => {
      recency_plan(vec![Predicate::MeasurementsPresent], RECENCY_LIMIT)
    }
  }
}

fn coords(params: &QueryParams) -> Option<(f64, f64)> {
  Some((params.latitude?, params.longitude?))
}

fn proximity_plan(latitude: f64, longitude: f64, limit: u32) -> QueryPlan {
  QueryPlan {
    projection: Projection::Observations,
    predicates: vec![Predicate::CoordinatesPresent],
    order_by:   Some(OrderBy::NearestTo { latitude, longitude }),
    limit:      Some(limit),
  }
}

fn recency_plan(predicates: Vec<Predicate>, limit: u32) -> QueryPlan {
  QueryPlan {
    projection: Projection::Observations,
    predicates,
    order_by: Some(OrderBy::TimeDesc),
    limit: Some(limit),
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use super::*;

  #[test]
  fn location_with_coordinates_orders_by_proximity() {
    let params = QueryParams {
      latitude: Some(10.0),
      longitude: Some(75.0),
      ..Default::default()
    };
    let plan = render(IntentType::Location, &params);
    assert_eq!(plan.predicates, vec![Predicate::CoordinatesPresent]);
    assert_eq!(
      plan.order_by,
      Some(OrderBy::NearestTo { latitude: 10.0, longitude: 75.0 })
    );
    assert_eq!(plan.limit, Some(5));
  }

  #[test]
  fn location_without_coordinates_falls_back_to_recency() {
    let plan = render(IntentType::Location, &QueryParams::default());
    assert_eq!(plan.order_by, Some(OrderBy::TimeDesc));
    assert_eq!(plan.limit, Some(20));
  }

  #[test]
  fn temporal_with_date_filters_on_that_day() {
    let params = QueryParams {
      date: NaiveDate::from_ymd_opt(2023, 3, 1),
      ..Default::default()
    };
    let plan = render(IntentType::Temporal, &params);
    assert_eq!(
      plan.predicates,
      vec![Predicate::ObservedOn(NaiveDate::from_ymd_opt(2023, 3, 1).unwrap())]
    );
  }

  #[test]
  fn temporal_without_date_uses_trailing_window() {
    let plan = render(IntentType::Temporal, &QueryParams::default());
    assert_eq!(plan.predicates, vec![Predicate::ObservedWithinDays(30)]);
  }

  #[test]
  fn statistical_aggregates_without_predicates() {
    let plan = render(IntentType::Statistical, &QueryParams::default());
    assert_eq!(plan.projection, Projection::Stats);
    assert!(plan.predicates.is_empty());
    assert_eq!(plan.order_by, None);
    assert_eq!(plan.limit, None);
  }

  #[test]
  fn general_is_the_measurement_recency_shape() {
    let plan = render(IntentType::General, &QueryParams::default());
    assert_eq!(plan.predicates, vec![Predicate::MeasurementsPresent]);
    assert_eq!(plan.limit, Some(20));
  }
}
