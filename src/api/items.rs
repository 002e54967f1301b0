use serde::{Deserialize, Serialize};

use crate::filter::Paging;

/// Paged listing envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
    pub has_next: bool,
    pub has_previous: bool,
    pub total_items: i64,
    pub total_pages: i64,
    pub page_size: i64,
}

impl<T> ItemsResponse<T> {
    /// `paging` of 0/0 means the caller asked for no paging: one page holding
    /// every item.
    pub fn build(items: Vec<T>, paging: Paging, total_items: i64) -> Self {
        if paging.is_unset() {
            return Self {
                items,
                has_next: false,
                has_previous: false,
                total_items,
                total_pages: 1,
                page_size: total_items,
            };
        }

        let total_pages = if total_items <= 0 || paging.size <= 0 {
            1
        } else {
            (total_items + paging.size - 1) / paging.size
        };

        Self {
            items,
            has_next: paging.page < total_pages,
            has_previous: paging.page > 1,
            total_items,
            total_pages,
            page_size: paging.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let resp = ItemsResponse::<u8>::build(vec![], Paging::new(1, 10), 25);
        assert_eq!(resp.total_pages, 3);
        assert!(resp.has_next);
        assert!(!resp.has_previous);

        let resp = ItemsResponse::<u8>::build(vec![], Paging::new(1, 10), 30);
        assert_eq!(resp.total_pages, 3);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let resp = ItemsResponse::<u8>::build(vec![], Paging::new(2, 10), 25);
        assert!(resp.has_next);
        assert!(resp.has_previous);
        assert_eq!(resp.page_size, 10);
    }

    #[test]
    fn last_page_has_no_next() {
        let resp = ItemsResponse::<u8>::build(vec![1, 2, 3, 4, 5], Paging::new(3, 10), 25);
        assert!(!resp.has_next);
        assert!(resp.has_previous);
    }

    #[test]
    fn unset_paging_is_a_single_page() {
        let resp = ItemsResponse::build(vec![1, 2, 3], Paging::new(0, 0), 3);
        assert_eq!(resp.total_pages, 1);
        assert_eq!(resp.page_size, 3);
        assert!(!resp.has_next);
        assert!(!resp.has_previous);
        assert_eq!(resp.items, vec![1, 2, 3]);
    }

    #[test]
    fn empty_result_is_one_page() {
        let resp = ItemsResponse::<u8>::build(vec![], Paging::new(1, 10), 0);
        assert_eq!(resp.total_pages, 1);
        assert!(!resp.has_next);
        assert!(!resp.has_previous);
    }

    #[test]
    fn serializes_camel_case() {
        let resp = ItemsResponse::build(vec!["a"], Paging::new(1, 5), 1);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["hasPrevious"], false);
        assert_eq!(json["pageSize"], 5);
    }
}
