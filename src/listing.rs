//! Search, ordering and pagination applied to collection listings before
//! they are handed to a table view.

use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: usize = 10;

pub trait Searchable {
    fn id(&self) -> i64;

    /// Named text fields a query may match against. The id is always
    /// searchable and does not need to be listed.
    fn search_fields(&self) -> Vec<(&'static str, String)>;
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<usize>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Case-insensitive containment. `field:value` restricts the match to one
/// field when `field` is `id` or one of the item's searchable fields; any
/// other text containing `:` (a time such as `09:00`) is matched as a whole.
pub fn matches<T: Searchable>(item: &T, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let id = item.id().to_string();
    let fields = item.search_fields();

    if let Some((field, value)) = query.split_once(':') {
        let (field, value) = (field.trim(), value.trim());

        if field == "id" {
            return id.contains(value);
        }

        if let Some((_, text)) = fields.iter().find(|(name, _)| *name == field) {
            return text.to_lowercase().contains(value);
        }
    }

    id.contains(&query)
        || fields
            .iter()
            .any(|(_, text)| text.to_lowercase().contains(&query))
}

pub fn sort_newest_first<T: Searchable>(items: &mut [T]) {
    items.sort_by(|a, b| b.id().cmp(&a.id()));
}

/// 1-based pages; page 0 is read as page 1 and pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Page<T> {
    let page = page.max(1);
    let total = items.len();
    let total_pages = (total + PAGE_SIZE - 1) / PAGE_SIZE;

    let items = items
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Page {
        items,
        page,
        total_pages,
        total,
    }
}

pub fn apply<T: Searchable>(mut items: Vec<T>, query: &ListQuery) -> Page<T> {
    sort_newest_first(&mut items);

    if let Some(q) = query.q.as_deref() {
        items.retain(|item| matches(item, q));
    }

    paginate(items, query.page.unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        id: i64,
        name: String,
        email: String,
    }

    impl Searchable for Row {
        fn id(&self) -> i64 {
            self.id
        }

        fn search_fields(&self) -> Vec<(&'static str, String)> {
            vec![("name", self.name.clone()), ("email", self.email.clone())]
        }
    }

    fn rows(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|id| Row {
                id,
                name: format!("Guide {id}"),
                email: format!("guide{id}@example.com"),
            })
            .collect()
    }

    #[test]
    fn free_text_is_case_insensitive() {
        let row = &rows(1)[0];
        assert!(matches(row, "  GUIDE 1 "));
        assert!(matches(row, "example"));
        assert!(!matches(row, "ampera"));
        assert!(matches(row, ""));
    }

    #[test]
    fn field_query_restricts() {
        let row = &rows(3)[2];
        assert!(matches(row, "name: guide 3"));
        assert!(!matches(row, "name:example"));
        assert!(matches(row, "email:guide3@"));
        assert!(matches(row, "id:3"));
        assert!(!matches(row, "phone:3"));
    }

    #[test]
    fn colon_in_free_text_is_not_a_field() {
        let row = Row {
            id: 4,
            name: "Walk at 09:00".into(),
            email: "walks@example.com".into(),
        };

        assert!(matches(&row, "09:00"));
        assert!(matches(&row, "at 09:0"));
        assert!(!matches(&row, "10:00"));
        assert!(matches(&row, "name:09:00"));
    }

    #[test]
    fn newest_first() {
        let mut items = rows(3);
        sort_newest_first(&mut items);
        let ids: Vec<i64> = items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn pages_of_ten() {
        let page = paginate(rows(23), 3);
        assert_eq!(page.total, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].id, 21);

        assert!(paginate(rows(23), 4).items.is_empty());
        assert_eq!(paginate(rows(23), 0).page, 1);
        assert_eq!(paginate(Vec::<Row>::new(), 1).total_pages, 0);
    }

    #[test]
    fn apply_sorts_filters_then_pages() {
        let page = apply(
            rows(25),
            &ListQuery {
                q: Some("guide 1".into()),
                page: None,
            },
        );

        let ids: Vec<i64> = page.items.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![19, 18, 17, 16, 15, 14, 13, 12, 11, 10]);
        assert_eq!(page.total, 11);
        assert_eq!(page.total_pages, 2);
    }
}
