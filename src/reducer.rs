// Reduce one tick's raw readings to a per-group aggregate. Pure.

use crate::models::{RawReading, TickAggregate};

/// Sums the readings whose group equals `target_group` and counts them.
pub fn reduce(readings: &[RawReading], target_group: &str) -> TickAggregate {
    readings
        .iter()
        .filter(|r| r.group == target_group)
        .fold(TickAggregate::default(), |mut agg, r| {
            agg.matched_entity_count += 1;
            agg.total_cpu = agg.total_cpu.saturating_add(r.cpu);
            agg.total_mem = agg.total_mem.saturating_add(r.mem);
            agg
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(entity: &str, group: &str, cpu: i64, mem: i64) -> RawReading {
        RawReading {
            entity_name: entity.to_string(),
            group: group.to_string(),
            cpu,
            mem,
        }
    }

    #[test]
    fn reduce_sums_only_matching_group() {
        let readings = vec![
            reading("web-1", "web", 150, 64),
            reading("db-0", "db", 900, 2048),
            reading("web-2", "web", 250, 96),
        ];
        let agg = reduce(&readings, "web");
        assert_eq!(agg.matched_entity_count, 2);
        assert_eq!(agg.total_cpu, 400);
        assert_eq!(agg.total_mem, 160);
        assert_eq!(agg.cpu_per_entity(), Some(200));
        assert_eq!(agg.mem_per_entity(), Some(80));
    }

    #[test]
    fn reduce_without_match_is_empty() {
        let readings = vec![reading("db-0", "db", 900, 2048)];
        let agg = reduce(&readings, "web");
        assert!(agg.is_empty());
        assert_eq!(agg.cpu_per_entity(), None);
    }

    #[test]
    fn reduce_requires_exact_group_name() {
        let readings = vec![reading("web-proxy-1", "web-proxy", 10, 10)];
        assert!(reduce(&readings, "web").is_empty());
    }

    #[test]
    fn reduce_saturates_instead_of_overflowing() {
        let readings = vec![
            reading("a", "g", i64::MAX, i64::MAX),
            reading("b", "g", i64::MAX, 1),
        ];
        let agg = reduce(&readings, "g");
        assert_eq!(agg.total_cpu, i64::MAX);
        assert_eq!(agg.total_mem, i64::MAX);
        assert_eq!(agg.matched_entity_count, 2);
    }

    #[test]
    fn per_entity_average_truncates() {
        let readings = vec![
            reading("a", "g", 100, 10),
            reading("b", "g", 101, 11),
            reading("c", "g", 101, 11),
        ];
        let agg = reduce(&readings, "g");
        assert_eq!(agg.cpu_per_entity(), Some(100));
        assert_eq!(agg.mem_per_entity(), Some(10));
    }
}
