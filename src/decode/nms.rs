use std::cmp::Ordering;

/// What the suppression pass needs to know about a candidate.
pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
    fn class(&self) -> usize;
}

/// Greedy per-class non-maximum suppression.
///
/// Candidates are partitioned by class (suppression never compares across
/// classes), each partition is stable-sorted descending by confidence so
/// equal scores keep their decode order, and then the classic greedy sweep
/// runs: keep the best remaining box, discard every later box in the same
/// partition whose IoU with any kept box exceeds `iou_threshold`. The
/// comparison is strict `>`; a pair sitting exactly on the threshold is
/// kept on both sides.
///
/// An empty input, or an empty class partition, yields an empty output.
pub fn suppress<T: Nms + Clone>(candidates: &[T], iou_threshold: f32) -> Vec<T> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let num_class = candidates.iter().map(Nms::class).max().map_or(0, |c| c + 1);
    let mut partitions: Vec<Vec<T>> = vec![Vec::new(); num_class];
    for det in candidates {
        partitions[det.class()].push(det.clone());
    }

    let mut kept = Vec::new();
    for mut partition in partitions {
        partition.sort_by(|a, b| {
            b.confidence()
                .partial_cmp(&a.confidence())
                .unwrap_or(Ordering::Equal)
        });

        let mut current = 0;
        for index in 0..partition.len() {
            let mut drop = false;
            for prev in 0..current {
                if partition[prev].iou(&partition[index]) > iou_threshold {
                    drop = true;
                    break;
                }
            }
            if !drop {
                partition.swap(current, index);
                current += 1;
            }
        }
        partition.truncate(current);
        kept.extend(partition);
    }

    kept
}
