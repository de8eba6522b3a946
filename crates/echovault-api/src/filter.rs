//! Client-side pagination and filtering for list screens.
//!
//! The API returns whole collections; the list screens page and filter them
//! locally. These are pure helpers over slices, no I/O.

use crate::{AccessRequest, Contact, RequestStatus};

/// One page of a locally paginated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page index.
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice out one page of `items`.
///
/// `page` is 1-based; out-of-range values are clamped (0 becomes 1, past the
/// end becomes the last page). An empty input yields a single empty page.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

/// Filter contacts by a case-insensitive substring match on name, email, or
/// phone. An empty query matches everything.
pub fn filter_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return contacts.iter().collect();
    }

    contacts
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&query)
                || c.email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&query))
                || c.phone.as_deref().is_some_and(|p| p.contains(&query))
        })
        .collect()
}

/// Filter the moderation queue by request status.
pub fn filter_requests(
    requests: &[AccessRequest],
    status: Option<RequestStatus>,
) -> Vec<&AccessRequest> {
    requests
        .iter()
        .filter(|r| status.is_none_or(|s| r.status == s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn contact(name: &str, email: Option<&str>, phone: Option<&str>) -> Contact {
        Contact {
            id: format!("id-{}", name),
            name: name.to_string(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            relationship: None,
            created_at: Utc::now(),
        }
    }

    fn request(id: &str, status: RequestStatus) -> AccessRequest {
        AccessRequest {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            kind: "vault_access".to_string(),
            status,
            note: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_paginate_basic() {
        let items: Vec<u32> = (1..=10).collect();

        let page = paginate(&items, 1, 3);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.total_items, 10);

        let page = paginate(&items, 4, 3);
        assert_eq!(page.items, vec![10]);
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let items: Vec<u32> = (1..=5).collect();

        // Page 0 is treated as page 1
        assert_eq!(paginate(&items, 0, 2).page, 1);
        // Past the end clamps to the last page
        let last = paginate(&items, 99, 2);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![5]);
    }

    #[test]
    fn test_paginate_empty_input() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paginate_zero_per_page_treated_as_one() {
        let items: Vec<u32> = vec![1, 2, 3];
        let page = paginate(&items, 2, 0);
        assert_eq!(page.per_page, 1);
        assert_eq!(page.items, vec![2]);
    }

    #[test]
    fn test_filter_contacts_case_insensitive() {
        let contacts = vec![
            contact("Ada Lovelace", Some("ada@example.com"), None),
            contact("Grace Hopper", Some("grace@example.com"), Some("+1555")),
        ];

        let hits = filter_contacts(&contacts, "ADA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ada Lovelace");

        let hits = filter_contacts(&contacts, "example.com");
        assert_eq!(hits.len(), 2);

        let hits = filter_contacts(&contacts, "555");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Grace Hopper");
    }

    #[test]
    fn test_filter_contacts_empty_query_matches_all() {
        let contacts = vec![contact("A", None, None), contact("B", None, None)];
        assert_eq!(filter_contacts(&contacts, "  ").len(), 2);
    }

    #[test]
    fn test_filter_requests_by_status() {
        let requests = vec![
            request("r1", RequestStatus::Pending),
            request("r2", RequestStatus::Approved),
            request("r3", RequestStatus::Pending),
        ];

        let pending = filter_requests(&requests, Some(RequestStatus::Pending));
        assert_eq!(pending.len(), 2);

        let all = filter_requests(&requests, None);
        assert_eq!(all.len(), 3);
    }
}
