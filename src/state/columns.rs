/// Masonry column distribution
///
/// Records are packed greedily into the currently shortest column using a
/// height estimate per record. The result is recomputed from scratch for
/// every change of the visible prefix or the column count.
use super::data::ImageRecord;

/// Vertical gap added after each tile, in column widths
pub const DEFAULT_MARGIN: f32 = 0.05;

/// Range of the pseudo height used when true dimensions are unknown
const PSEUDO_MIN: f32 = 0.7;
const PSEUDO_SPAN: f32 = 0.8;

/// Number of columns for a viewport width, in logical pixels
pub fn column_count(width: f32) -> usize {
    if width < 640.0 {
        1
    } else if width < 1280.0 {
        2
    } else if width < 1536.0 {
        3
    } else {
        4
    }
}

/// Estimated tile height for a column width of 1.0
pub fn estimate_height(record: &ImageRecord) -> f32 {
    match record.aspect_ratio() {
        Some(aspect) => 1.0 / aspect,
        None => {
            let unit = (mix(record.id as u64) % 10_000) as f32 / 10_000.0;
            PSEUDO_MIN + unit * PSEUDO_SPAN
        }
    }
}

// splitmix64 finaliser
fn mix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Assign `records` to `columns` columns, shortest column first.
/// Ties go to the lowest column index. A column count of 0 is treated as 1.
pub fn distribute<'a>(records: &'a [ImageRecord], columns: usize, margin: f32) -> Vec<Vec<&'a ImageRecord>> {
    let columns = columns.max(1);
    let mut result: Vec<Vec<&ImageRecord>> = vec![Vec::new(); columns];
    let mut heights = vec![0.0f32; columns];

    for record in records {
        let shortest = shortest_column(&heights);
        result[shortest].push(record);
        heights[shortest] += estimate_height(record) + margin;
    }

    result
}

/// Estimated top of the record with `id`, in column widths, after distribution
pub fn estimated_top(records: &[ImageRecord], columns: usize, margin: f32, id: usize) -> Option<f32> {
    let columns = columns.max(1);
    let mut heights = vec![0.0f32; columns];

    for record in records {
        let shortest = shortest_column(&heights);
        if record.id == id {
            return Some(heights[shortest]);
        }
        heights[shortest] += estimate_height(record) + margin;
    }

    None
}

fn shortest_column(heights: &[f32]) -> usize {
    let mut shortest = 0;
    for (i, &height) in heights.iter().enumerate() {
        if height < heights[shortest] {
            shortest = i;
        }
    }
    shortest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::sample_records;

    #[test]
    fn test_partition_keeps_every_record_once() {
        let records = sample_records(37);
        for columns in 1..=5 {
            let result = distribute(&records, columns, DEFAULT_MARGIN);
            assert_eq!(result.len(), columns);

            let mut ids: Vec<usize> = result.iter().flatten().map(|r| r.id).collect();
            ids.sort_unstable();
            assert_eq!(ids, (0..37).collect::<Vec<_>>());

            // input order is preserved inside each column
            for column in &result {
                assert!(column.windows(2).all(|w| w[0].id < w[1].id));
            }
        }
    }

    #[test]
    fn test_distribution_is_deterministic() {
        let records = sample_records(24);
        let first: Vec<Vec<usize>> = distribute(&records, 3, DEFAULT_MARGIN)
            .iter()
            .map(|c| c.iter().map(|r| r.id).collect())
            .collect();
        for _ in 0..5 {
            let again: Vec<Vec<usize>> = distribute(&records, 3, DEFAULT_MARGIN)
                .iter()
                .map(|c| c.iter().map(|r| r.id).collect())
                .collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_pseudo_height_range() {
        for record in sample_records(500) {
            let h = estimate_height(&record);
            assert!((0.7..=1.5).contains(&h), "estimate {h} out of range");
        }
    }

    #[test]
    fn test_true_dimensions_win() {
        let mut record = sample_records(1).remove(0);
        record.width = Some(800);
        record.height = Some(1200);
        assert!((estimate_height(&record) - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ties_go_to_first_column() {
        let mut records = sample_records(4);
        for record in &mut records {
            record.width = Some(100);
            record.height = Some(100);
        }
        let result = distribute(&records, 2, 0.0);
        let ids: Vec<Vec<usize>> = result.iter().map(|c| c.iter().map(|r| r.id).collect()).collect();
        assert_eq!(ids, vec![vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn test_zero_columns_and_empty_input() {
        let records = sample_records(3);
        assert_eq!(distribute(&records, 0, DEFAULT_MARGIN).len(), 1);
        assert!(distribute(&[], 3, DEFAULT_MARGIN).iter().all(Vec::is_empty));
    }

    #[test]
    fn test_estimated_top() {
        let mut records = sample_records(3);
        for record in &mut records {
            record.width = Some(100);
            record.height = Some(100);
        }
        assert_eq!(estimated_top(&records, 1, 0.0, 0), Some(0.0));
        assert_eq!(estimated_top(&records, 1, 0.0, 2), Some(2.0));
        assert_eq!(estimated_top(&records, 2, 0.0, 2), Some(1.0));
        assert_eq!(estimated_top(&records, 2, 0.0, 9), None);
    }

    #[test]
    fn test_column_breakpoints() {
        assert_eq!(column_count(400.0), 1);
        assert_eq!(column_count(800.0), 2);
        assert_eq!(column_count(1300.0), 3);
        assert_eq!(column_count(1920.0), 4);
    }
}
