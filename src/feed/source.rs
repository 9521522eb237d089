use crate::model::floor::Floor;
use crate::model::server::ServerMetrics;
use chrono::NaiveTime;

/// One poll of the tracking system.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub taken_at: NaiveTime,
    pub service_start: NaiveTime,
    pub servers: Vec<ServerMetrics>,
    pub floor: Floor,
}

/// Stand-in for the upstream perception system.
pub trait MetricsFeed {
    fn name(&self) -> &str;
    fn poll(&mut self, generation: usize) -> Reading;
}
