use campus_dashboard::pagination::{ControlKind, Pager, WindowPolicy, request_page};
use campus_dashboard::query_state::{ParamOp, QueryState};
use campus_dashboard::sorting::{HeaderCell, SortList, toggle_query};

/// Follows a generated link the way the browser would.
fn click(query: &QueryState, column: &str) -> QueryState {
    QueryState::parse(&toggle_query(query, column))
}

#[test]
fn header_clicks_build_a_multi_column_sort() {
    let start = QueryState::parse("page=1");

    let after_email = click(&start, "email");
    assert_eq!(after_email.get("sort"), Some("email"));

    let after_phone = click(&after_email, "phone");
    assert_eq!(after_phone.get("sort"), Some("email,phone"));

    let after_email_again = click(&after_phone, "email");
    assert_eq!(after_email_again.get("sort"), Some("-email,phone"));
    assert_eq!(after_email_again.get("page"), Some("1"));
}

#[test]
fn three_clicks_restore_the_original_sort() {
    for original in ["", "name", "-created,name", "level,-code,title"] {
        let start = if original.is_empty() {
            QueryState::default()
        } else {
            QueryState::from_pairs([("sort", original)])
        };

        let first = click(&start, "email");
        let second = click(&first, "email");
        let third = click(&second, "email");

        assert_eq!(SortList::from_query(&first).direction("email").aria(), "ascending");
        assert_eq!(SortList::from_query(&second).direction("email").aria(), "descending");
        assert_eq!(
            SortList::from_query(&third),
            SortList::from_query(&start),
            "cycle from {original:?}"
        );
    }
}

#[test]
fn toggling_one_column_leaves_the_others_in_place() {
    let start = QueryState::from_pairs([("sort", "-level,name,code")]);
    let others = |query: &QueryState| -> Vec<String> {
        SortList::from_query(query)
            .tokens()
            .iter()
            .filter(|token| token.trim_start_matches('-') != "name")
            .cloned()
            .collect()
    };

    let mut query = start.clone();
    for _ in 0..3 {
        query = click(&query, "name");
        assert_eq!(others(&query), vec!["-level", "code"]);
    }
}

#[test]
fn out_of_range_pages_leave_the_query_alone() {
    let query = QueryState::parse("page=2&sort=name&size=20");
    let before = query.clone();

    for total in 0..6 {
        for target in [0, total + 1, total + 10] {
            assert_eq!(request_page(&query, target, total), None);
        }
    }

    assert_eq!(query, before);
}

#[test]
fn page_links_only_touch_the_page_key() {
    let query = QueryState::parse("page=5&sort=-email&searchTerm=ann");
    let controls = Pager::new(Some(10), &query).controls(&query, "/students");

    let next = controls
        .iter()
        .find(|c| c.kind == ControlKind::Next)
        .and_then(|c| c.href.as_deref())
        .expect("next link");
    let next = QueryState::parse(next.trim_start_matches("/students?"));

    assert_eq!(next.get("page"), Some("6"));
    assert_eq!(next.get("sort"), Some("-email"));
    assert_eq!(next.get("searchTerm"), Some("ann"));
}

#[test]
fn small_page_counts_overlap_unless_exclusive() {
    let query = QueryState::parse("page=2");

    let overlapping = Pager::new(Some(3), &query).controls(&query, "/schools");
    let exclusive = Pager::new(Some(3), &query)
        .with_policy(WindowPolicy::Exclusive)
        .controls(&query, "/schools");

    let pages = |controls: &[campus_dashboard::pagination::PageControl]| {
        controls
            .iter()
            .filter(|c| c.kind == ControlKind::Page)
            .map(|c| c.target)
            .collect::<Vec<_>>()
    };
    assert_eq!(pages(&overlapping), vec![1, 2, 3, 1, 2, 3]);
    assert_eq!(pages(&exclusive), vec![1, 2, 3]);
}

#[test]
fn modify_params_never_mutates_its_snapshot() {
    let query = QueryState::parse("page=3&size=50&sort=name");
    let before = query.clone();

    let _ = query.modify_params(ParamOp::Set("9"), "page");
    let _ = query.modify_params(ParamOp::Delete, "sort");
    let _ = query.modify_params(ParamOp::Set("x"), "new");

    assert_eq!(query, before);
}

#[test]
fn header_cell_reflects_sort_state() {
    let query = QueryState::parse("sort=-email,phone");

    let email = HeaderCell::new("email", "Email", true, &query, "/users");
    let phone = HeaderCell::new("phone", "Phone", true, &query, "/users");

    assert_eq!(email.aria_sort, "descending");
    assert_eq!(phone.aria_sort, "ascending");
    let after = QueryState::parse(
        email
            .href
            .as_deref()
            .and_then(|href| href.strip_prefix("/users?"))
            .expect("toggle link"),
    );
    assert_eq!(after.get("sort"), Some("phone"));
}
