use proptest::prelude::*;
use reqwest::Url;
use splitfetch::range::plan;
use splitfetch::{partition, ByteRange, Error, Resource};

fn resource(total_size: u64, range_supported: bool) -> Resource {
    Resource {
        url: Url::parse("https://example.com/file.bin").unwrap(),
        total_size,
        range_supported,
    }
}

#[test]
fn test_even_split() {
    let ranges = partition(1000, 4).unwrap();
    assert_eq!(
        ranges,
        vec![
            ByteRange::new(0, 0, 249),
            ByteRange::new(1, 250, 499),
            ByteRange::new(2, 500, 749),
            ByteRange::new(3, 750, 999),
        ]
    );
}

#[test]
fn test_remainder_goes_to_last_part() {
    let ranges = partition(1001, 4).unwrap();
    assert_eq!(ranges.len(), 4);
    assert_eq!(ranges[2], ByteRange::new(2, 500, 749));
    assert_eq!(ranges[3], ByteRange::new(3, 750, 1000));
    assert_eq!(ranges[3].len(), 251);
}

#[test]
fn test_single_worker_covers_everything() {
    assert_eq!(partition(17, 1).unwrap(), vec![ByteRange::new(0, 0, 16)]);
}

#[test]
fn test_zero_workers_rejected() {
    assert!(matches!(partition(1000, 0), Err(Error::InvalidWorkerCount(0))));
    assert!(matches!(
        plan(&resource(1000, true), 0),
        Err(Error::InvalidWorkerCount(0))
    ));
}

#[test]
fn test_zero_size_has_no_ranges() {
    assert!(partition(0, 8).unwrap().is_empty());
}

#[test]
fn test_more_workers_than_bytes() {
    let ranges = partition(3, 10).unwrap();
    assert_eq!(ranges.len(), 3);
    assert!(ranges.iter().all(|r| r.len() == 1));
}

#[test]
fn test_plan_without_range_support_uses_one_worker() {
    let ranges = plan(&resource(1000, false), 8).unwrap();
    assert_eq!(ranges, vec![ByteRange::new(0, 0, 999)]);
}

#[test]
fn test_header_value() {
    let ranges = partition(1000, 4).unwrap();
    assert_eq!(ranges[1].header_value(), "bytes=250-499");
}

proptest! {
    #[test]
    fn prop_ranges_tile_the_resource(total in 1u64..5_000_000, workers in 1usize..64) {
        let ranges = partition(total, workers).unwrap();

        prop_assert_eq!(ranges.len() as u64, (workers as u64).min(total));
        prop_assert_eq!(ranges[0].start, 0);
        prop_assert_eq!(ranges.last().unwrap().end, total - 1);
        for (i, range) in ranges.iter().enumerate() {
            prop_assert_eq!(range.index, i);
            prop_assert!(range.start <= range.end);
        }
        for pair in ranges.windows(2) {
            prop_assert_eq!(pair[0].end + 1, pair[1].start);
        }
        prop_assert_eq!(ranges.iter().map(ByteRange::len).sum::<u64>(), total);
    }

    #[test]
    fn prop_parts_differ_by_less_than_worker_count(total in 1u64..1_000_000, workers in 1usize..32) {
        let ranges = partition(total, workers).unwrap();
        let base = total / ranges.len() as u64;

        for range in &ranges[..ranges.len() - 1] {
            prop_assert_eq!(range.len(), base);
        }
        let last = ranges.last().unwrap().len();
        prop_assert!(last >= base && last - base < ranges.len() as u64);
    }

    #[test]
    fn prop_every_offset_belongs_to_one_range(total in 1u64..10_000, workers in 1usize..16, probe in any::<u64>()) {
        let offset = probe % total;
        let ranges = partition(total, workers).unwrap();
        prop_assert_eq!(ranges.iter().filter(|r| r.contains(offset)).count(), 1);
    }
}
