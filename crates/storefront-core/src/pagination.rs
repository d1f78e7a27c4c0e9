//! Pagination Windowing
//!
//! Which page links to render around the current page.

/// One slot in the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Gap,
}

/// Page links for `current` out of `total_pages`, showing up to `width`
/// pages centred on the current one, always anchored by the first and last
/// page. A gap is emitted only where at least one page is skipped.
pub fn page_window(current: u32, total_pages: u32, width: u32) -> Vec<PageLink> {
    if total_pages == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let width = width.max(1).min(total_pages);

    let half = width / 2;
    let mut start = current.saturating_sub(half).max(1);
    let mut end = start + width - 1;
    if end > total_pages {
        end = total_pages;
        start = end + 1 - width;
    }

    let mut links = Vec::new();
    if start > 1 {
        links.push(PageLink::Page(1));
        if start > 2 {
            links.push(PageLink::Gap);
        }
    }
    links.extend((start..=end).map(PageLink::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            links.push(PageLink::Gap);
        }
        links.push(PageLink::Page(total_pages));
    }
    links
}

pub fn has_previous(current: u32) -> bool {
    current > 1
}

pub fn has_next(current: u32, total_pages: u32) -> bool {
    current < total_pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Gap, Page};

    #[test]
    fn test_small_total_shows_everything() {
        assert_eq!(page_window(1, 3, 5), vec![Page(1), Page(2), Page(3)]);
        assert!(page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_middle_window_has_both_gaps() {
        assert_eq!(
            page_window(10, 20, 5),
            vec![Page(1), Gap, Page(8), Page(9), Page(10), Page(11), Page(12), Gap, Page(20)]
        );
    }

    #[test]
    fn test_window_clamps_at_edges() {
        assert_eq!(
            page_window(1, 20, 5),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Gap, Page(20)]
        );
        assert_eq!(
            page_window(20, 20, 5),
            vec![Page(1), Gap, Page(16), Page(17), Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn test_no_gap_when_adjacent() {
        assert_eq!(
            page_window(3, 7, 3),
            vec![Page(1), Page(2), Page(3), Page(4), Gap, Page(7)]
        );
        assert_eq!(
            page_window(5, 7, 3),
            vec![Page(1), Gap, Page(4), Page(5), Page(6), Page(7)]
        );
    }

    #[test]
    fn test_out_of_range_current_is_clamped() {
        assert_eq!(page_window(99, 3, 5), vec![Page(1), Page(2), Page(3)]);
        assert!(has_previous(2));
        assert!(!has_previous(1));
        assert!(has_next(2, 3));
        assert!(!has_next(3, 3));
    }
}
