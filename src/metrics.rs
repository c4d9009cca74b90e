//! Live workforce metrics: a projection over the week's roster, never
//! stored and never hand-edited. Headcount is the row count, technicians
//! the rows flagged as safety staff, total hours the sum of every row's
//! weekly hours.
//!
//! Recomputation happens on load and after every roster mutation. Screens
//! that display the numbers subscribe to [`LiveMetricsHub`] instead of
//! polling the tree.

use std::sync::Mutex;

use crate::roster::PersonalVigenteDoc;
use crate::types::LiveMetrics;

/// Derive the metrics for one week from its roster. A week without a
/// roster projects to all zeros.
pub fn recalc(roster: Option<&PersonalVigenteDoc>) -> LiveMetrics {
    let Some(doc) = roster else {
        return LiveMetrics::default();
    };

    let mut metrics = LiveMetrics::default();
    for row in &doc.personal {
        metrics.headcount += 1;
        if row.tecnico_seguridad {
            metrics.technicians += 1;
        }
        metrics.total_hours += row.hh_week();
    }
    metrics
}

/// Notification that one week's projection changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveMetricsEvent {
    pub empresa: String,
    pub proyecto: String,
    pub week_number: u32,
    pub metrics: LiveMetrics,
}

type Listener = Box<dyn Fn(&LiveMetricsEvent) + Send>;

/// Fan-out point for projection changes. Services publish after every
/// roster write; listeners render, they never mutate.
#[derive(Default)]
pub struct LiveMetricsHub {
    listeners: Mutex<Vec<Listener>>,
}

impl LiveMetricsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&LiveMetricsEvent) + Send + 'static,
    {
        if let Ok(mut guard) = self.listeners.lock() {
            guard.push(Box::new(listener));
        }
    }

    pub fn publish(&self, event: LiveMetricsEvent) {
        log::debug!(
            "Live metrics for {}/{} week {}: {} people, {} technicians, {} hours",
            event.empresa,
            event.proyecto,
            event.week_number,
            event.metrics.headcount,
            event.metrics.technicians,
            event.metrics.total_hours
        );
        if let Ok(guard) = self.listeners.lock() {
            for listener in guard.iter() {
                listener(&event);
            }
        }
    }
}
