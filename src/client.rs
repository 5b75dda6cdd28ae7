//! A simulated client: a demand arriving at a point in time, held for a
//! duration, then released.

use crate::routing::Demand;

pub struct Client {
    pub id: u64,
    pub demand: Demand,
    pub arrival_time: f64,
    pub holding_time: f64,
}

impl Client {
    pub fn departure_time(&self) -> f64 {
        self.arrival_time + self.holding_time
    }
}
