use std::ops::Range;

/// Map a scroll position onto the `[start, end)` slice of the projection
/// that must be materialized.
///
/// `overscan` rows are added on both sides to buffer fast scrolling. Rows
/// outside the range exist only as consumed height in the host's spacer.
/// Degenerate inputs are clamped (row height to at least 1.0, negative
/// offsets to 0.0) so the result always satisfies
/// `0 <= start <= end <= total_rows`.
pub fn visible_range(
    total_rows: usize,
    row_height: f64,
    scroll_offset: f64,
    viewport_height: f64,
    overscan: usize,
) -> Range<usize> {
    let row_height = if row_height.is_finite() {
        row_height.max(1.0)
    } else {
        1.0
    };
    let scroll_offset = if scroll_offset.is_finite() {
        scroll_offset.max(0.0)
    } else {
        0.0
    };
    let viewport_height = if viewport_height.is_finite() {
        viewport_height.max(0.0)
    } else {
        0.0
    };

    let first = (scroll_offset / row_height).floor() as usize;
    let last = ((scroll_offset + viewport_height) / row_height).ceil() as usize;
    let start = first.saturating_sub(overscan);
    let end = last.saturating_add(overscan).min(total_rows);
    start.min(end)..end
}
