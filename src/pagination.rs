//! Page window rendered under every list table.
//!
//! The window is built from independent checks ("near start", "near end",
//! "middle"), so for four pages or fewer several fragments may render one after
//! another. [`WindowPolicy::Exclusive`] switches to mutually exclusive branches.

use serde::{Deserialize, Serialize};

use crate::query_state::{PAGE_KEY, ParamOp, QueryState, SIZE_KEY, href};

/// Total page count assumed when the caller does not know it yet.
pub const DEFAULT_TOTAL_PAGES: usize = 10;
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
pub const PAGE_SIZES: [usize; 7] = [5, 10, 20, 30, 50, 80, 100];

/// How the window branches are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Independent `if` blocks; fragments may overlap for small page counts.
    #[default]
    Overlapping,
    /// `if / else if / else`, with direct links clipped to the page range.
    Exclusive,
}

/// One element of the page window. The number is the page it requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Previous(usize),
    Page(usize),
    Ellipsis(usize),
    Next(usize),
}

impl PageSlot {
    pub fn target(self) -> usize {
        match self {
            PageSlot::Previous(page)
            | PageSlot::Page(page)
            | PageSlot::Ellipsis(page)
            | PageSlot::Next(page) => page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Previous,
    Page,
    Ellipsis,
    Next,
}

/// Template-facing page control. `href` is `None` when the request would be
/// dropped as out of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControl {
    pub kind: ControlKind,
    pub target: usize,
    pub active: bool,
    pub href: Option<String>,
}

/// Builds the query string for a page change, or `None` when `new_page` lies
/// outside `1..=total_pages`.
pub fn request_page(query: &QueryState, new_page: usize, total_pages: usize) -> Option<String> {
    if new_page < 1 || new_page > total_pages {
        return None;
    }
    Some(query.modify_params(ParamOp::Set(&new_page.to_string()), PAGE_KEY))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    total_pages: usize,
    policy: WindowPolicy,
}

impl Pager {
    pub fn new(total_pages: Option<usize>, query: &QueryState) -> Self {
        Self {
            page: query.page().unwrap_or(1),
            total_pages: total_pages.unwrap_or(DEFAULT_TOTAL_PAGES),
            policy: WindowPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Slots in render order.
    pub fn window(&self) -> Vec<PageSlot> {
        let page = self.page;
        let total = self.total_pages;
        let mut slots = Vec::new();

        if page > 1 {
            slots.push(PageSlot::Previous(page - 1));
        }

        // `total - page` may be negative when the URL points past the end.
        let near_start = page <= 2;
        let near_end = total.saturating_sub(page) < 2;
        let middle = !near_start && !near_end;

        match self.policy {
            WindowPolicy::Overlapping => {
                if near_start {
                    push_start(&mut slots, page, total, None);
                }
                if near_end {
                    push_end(&mut slots, page, total);
                }
                if middle {
                    push_middle(&mut slots, page);
                }
            }
            WindowPolicy::Exclusive => {
                if near_start {
                    push_start(&mut slots, page, total, Some(total));
                } else if near_end {
                    push_end(&mut slots, page, total);
                } else {
                    push_middle(&mut slots, page);
                }
            }
        }

        if total > page {
            slots.push(PageSlot::Next(page + 1));
        }

        slots
    }

    /// Window with the links each slot commits.
    pub fn controls(&self, query: &QueryState, path: &str) -> Vec<PageControl> {
        self.window()
            .into_iter()
            .map(|slot| {
                let kind = match slot {
                    PageSlot::Previous(_) => ControlKind::Previous,
                    PageSlot::Page(_) => ControlKind::Page,
                    PageSlot::Ellipsis(_) => ControlKind::Ellipsis,
                    PageSlot::Next(_) => ControlKind::Next,
                };
                let target = slot.target();
                PageControl {
                    kind,
                    target,
                    active: kind == ControlKind::Page && target == self.page,
                    href: request_page(query, target, self.total_pages)
                        .map(|next| href(path, &next)),
                }
            })
            .collect()
    }
}

fn push_start(slots: &mut Vec<PageSlot>, page: usize, total: usize, clip: Option<usize>) {
    let last = clip.map_or(3, |limit| limit.min(3));
    slots.extend((1..=last).map(PageSlot::Page));
    if total > 3 {
        slots.push(PageSlot::Ellipsis(page + 1));
    }
}

fn push_end(slots: &mut Vec<PageSlot>, page: usize, total: usize) {
    if total > 3 {
        slots.push(PageSlot::Ellipsis(page - 1));
    }
    slots.extend(
        [total.checked_sub(2), total.checked_sub(1), Some(total)]
            .into_iter()
            .flatten()
            .filter(|number| *number >= 1)
            .map(PageSlot::Page),
    );
}

fn push_middle(slots: &mut Vec<PageSlot>, page: usize) {
    slots.push(PageSlot::Ellipsis(page - 1));
    slots.extend([page - 1, page, page + 1].map(PageSlot::Page));
    slots.push(PageSlot::Ellipsis(page + 1));
}

/// Entry of the page-size selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSizeOption {
    pub size: usize,
    pub active: bool,
    pub href: String,
}

pub fn page_size_options(
    query: &QueryState,
    path: &str,
    allowed: &[usize],
    current: usize,
) -> Vec<PageSizeOption> {
    allowed
        .iter()
        .map(|&size| PageSizeOption {
            size,
            active: size == current,
            href: href(
                path,
                &query.modify_params(ParamOp::Set(&size.to_string()), SIZE_KEY),
            ),
        })
        .collect()
}

/// A page of items together with everything needed to render its pager.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub controls: Vec<PageControl>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub page_sizes: Vec<PageSizeOption>,
}

impl<T> Paginated<T> {
    pub fn new(
        items: Vec<T>,
        pager: &Pager,
        query: &QueryState,
        path: &str,
        page_size: usize,
    ) -> Self {
        Self {
            items,
            controls: pager.controls(query, path),
            page: pager.page(),
            total_pages: pager.total_pages(),
            page_size,
            page_sizes: page_size_options(query, path, &PAGE_SIZES, page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PageSlot::*;
    use super::*;

    fn pager(page: usize, total: usize) -> Pager {
        Pager::new(Some(total), &QueryState::parse(&format!("page={page}")))
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(
            pager(1, 10).window(),
            vec![Page(1), Page(2), Page(3), Ellipsis(2), Next(2)]
        );
    }

    #[test]
    fn middle_page_of_ten() {
        assert_eq!(
            pager(5, 10).window(),
            vec![
                Previous(4),
                Ellipsis(4),
                Page(4),
                Page(5),
                Page(6),
                Ellipsis(6),
                Next(6)
            ]
        );
    }

    #[test]
    fn ninth_page_of_ten_keeps_next() {
        assert_eq!(
            pager(9, 10).window(),
            vec![
                Previous(8),
                Ellipsis(8),
                Page(8),
                Page(9),
                Page(10),
                Next(10)
            ]
        );
    }

    #[test]
    fn last_page_has_no_next() {
        let window = pager(10, 10).window();
        assert!(!window.iter().any(|slot| matches!(slot, Next(_))));
        assert_eq!(window.last(), Some(&Page(10)));
    }

    #[test]
    fn three_pages_render_both_fragments() {
        assert_eq!(
            pager(2, 3).window(),
            vec![
                Previous(1),
                Page(1),
                Page(2),
                Page(3),
                Page(1),
                Page(2),
                Page(3),
                Next(3)
            ]
        );
    }

    #[test]
    fn exclusive_policy_renders_one_fragment() {
        let window = pager(2, 3).with_policy(WindowPolicy::Exclusive).window();
        assert_eq!(window, vec![Previous(1), Page(1), Page(2), Page(3), Next(3)]);

        let single = pager(1, 1).with_policy(WindowPolicy::Exclusive).window();
        assert_eq!(single, vec![Page(1)]);
    }

    #[test]
    fn missing_page_defaults_to_first() {
        let pager = Pager::new(None, &QueryState::parse("page=abc"));
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.total_pages(), DEFAULT_TOTAL_PAGES);
    }

    #[test]
    fn huge_page_from_the_url_stays_at_the_end() {
        let query = QueryState::parse(&format!("page={}&sort=name", usize::MAX));
        let pager = Pager::new(Some(10), &query);
        assert_eq!(pager.page(), usize::MAX);

        let controls = pager.controls(&query, "/students");

        assert!(!controls.iter().any(|c| c.kind == ControlKind::Next));
        for control in controls.iter().filter(|c| c.kind != ControlKind::Page) {
            assert_eq!(control.href, None, "{control:?}");
        }
        let pages: Vec<_> = controls
            .iter()
            .filter(|c| c.kind == ControlKind::Page)
            .map(|c| (c.target, c.href.is_some(), c.active))
            .collect();
        assert_eq!(pages, vec![(8, true, false), (9, true, false), (10, true, false)]);
    }

    #[test]
    fn request_page_drops_out_of_range_targets() {
        let query = QueryState::parse("page=1&sort=name");
        for total in 0..5 {
            for target in [0, total + 1, total + 7] {
                assert_eq!(request_page(&query, target, total), None);
            }
        }
        assert_eq!(
            request_page(&query, 3, 4).as_deref(),
            Some("page=3&sort=name")
        );
    }

    #[test]
    fn controls_disable_links_past_the_end() {
        let query = QueryState::parse("page=1");
        let controls = Pager::new(Some(2), &query).controls(&query, "/courses");

        let third = controls
            .iter()
            .find(|c| c.kind == ControlKind::Page && c.target == 3)
            .expect("page 3 link");
        assert_eq!(third.href, None);

        let first = &controls[0];
        assert!(first.active);
        assert_eq!(first.href.as_deref(), Some("/courses?page=1"));
    }

    #[test]
    fn page_size_options_keep_other_params() {
        let query = QueryState::parse("sort=-name&size=10");
        let options = page_size_options(&query, "/students", &[5, 10], 10);

        assert_eq!(options[0].href, "/students?sort=-name&size=5");
        assert!(!options[0].active);
        assert!(options[1].active);
    }
}
