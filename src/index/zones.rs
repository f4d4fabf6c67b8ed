//! Lookups by timezone group.
//!
//! Stations are grouped under a (timezone group, country) key. The grouping
//! is built on first use and then shared by every lookup.

use super::KdIndex;
use geobucket_types::station::Station;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

/// (bucket, position in bucket) of one station.
type StationRef = (usize, usize);

#[derive(Debug, Default)]
pub(crate) struct ZoneIndex {
    /// Ordered by group, then country; each list ordered by station name
    by_zone: BTreeMap<(String, String), Vec<StationRef>>,
}

impl KdIndex {
    fn zones(&self) -> &ZoneIndex {
        self.zones.get_or_init(|| {
            let mut zones = ZoneIndex::default();
            for (bucket_id, bucket) in self.buckets.iter().enumerate() {
                for (slot, station) in bucket.stations().iter().enumerate() {
                    zones
                        .by_zone
                        .entry((station.time_zone_group.clone(), station.country.clone()))
                        .or_default()
                        .push((bucket_id, slot));
                }
            }
            for refs in zones.by_zone.values_mut() {
                refs.sort_by(|&a, &b| self.station_at(a).name.cmp(&self.station_at(b).name));
            }
            log::debug!("Built timezone index: {} zones", zones.by_zone.len());
            zones
        })
    }

    #[inline]
    fn station_at(&self, (bucket, slot): StationRef) -> &Station {
        &self.buckets[bucket].stations()[slot]
    }

    /// Every station in timezone group `group`, sorted by name.
    pub fn stations_in_time_zone(&self, group: &str) -> Vec<&Station> {
        let mut result: Vec<&Station> = self
            .zones()
            .by_zone
            .range((group.to_string(), String::new())..)
            .take_while(|((zone, _), _)| zone == group)
            .flat_map(|(_, refs)| refs.iter().map(|&r| self.station_at(r)))
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    /// Every station whose timezone group is one of `groups`, ordered by
    /// group, then country, then name.
    pub fn stations_in_time_zone_window(&self, groups: &[&str]) -> Vec<&Station> {
        let wanted: FxHashSet<&str> = groups.iter().copied().collect();
        self.zones()
            .by_zone
            .iter()
            .filter(|((zone, _), _)| wanted.contains(zone.as_str()))
            .flat_map(|(_, refs)| refs.iter().map(|&r| self.station_at(r)))
            .collect()
    }
}
