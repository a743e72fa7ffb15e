use jsonapi_query::request::{QueryError, QueryParser, RawQuery, SortDirective, SortField};
use url::Url;

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn typed(v: &[(&str, &str)]) -> SortDirective {
    SortDirective::Typed(
        v.iter()
            .map(|(r, f)| (r.to_string(), f.to_string()))
            .collect(),
    )
}

#[test]
fn test_untyped() {
    let parsed = QueryParser::parse_str("sort=a,b,c").unwrap();
    assert_eq!(parsed.sort(), &SortDirective::Untyped(strings(&["a", "b", "c"])));
}

#[test]
fn test_typed() {
    let parsed = QueryParser::parse_str("sort[authors]=a,-b").unwrap();
    assert_eq!(parsed.sort(), &typed(&[("authors", "a"), ("authors", "-b")]));
}

#[test]
fn test_typed_across_keys_is_flat() {
    let parsed =
        QueryParser::parse_str("sort[authors]=name&sort[books]=-year&sort[authors]=-age").unwrap();
    // Repeated keys gather under their first appearance.
    assert_eq!(
        parsed.sort(),
        &typed(&[
            ("authors", "name"),
            ("authors", "-age"),
            ("books", "-year"),
        ])
    );
    assert_eq!(
        parsed.sort().fields_for("authors"),
        vec![
            SortField {
                name: "name",
                reverse: false
            },
            SortField {
                name: "age",
                reverse: true
            },
        ]
    );
    assert!(parsed.sort().fields_for("reviews").is_empty());
}

#[test_log::test]
fn test_conflicting_forms() {
    for query in ["sort=a&sort[x]=b", "sort[x]=b&sort=a"] {
        let err = QueryParser::parse_str(query).unwrap_err();
        assert!(matches!(err, QueryError::ConflictingSortForm));
        assert_eq!(err.to_string(), "either default or typed sort should be used");
    }
}

#[test]
fn test_empty_typed_sort_does_not_conflict() {
    // An empty value still yields one empty token.
    let parsed = QueryParser::parse_str("sort[x]=").unwrap();
    assert_eq!(parsed.sort(), &typed(&[("x", "")]));

    let raw: RawQuery = vec![("other", "1")].into_iter().collect();
    let parsed = QueryParser::parse(&raw).unwrap();
    assert_eq!(parsed.sort(), &SortDirective::Untyped(Vec::new()));
}

#[test]
fn test_residual_order_is_preserved() {
    let parsed =
        QueryParser::parse_str("z=1&sort=a&b=2&sort[]=x&a=3&z=4&sort[a][b]=y&page=2").unwrap();
    assert_eq!(
        parsed.residual().keys().collect::<Vec<_>>(),
        vec!["z", "b", "sort[]", "a", "sort[a][b]", "page"]
    );
    assert_eq!(parsed.residual().get("z"), Some(&strings(&["1", "4"])[..]));

    // Parsing the residual again leaves it as it was.
    let again = QueryParser::parse(parsed.residual()).unwrap();
    assert_eq!(again.residual(), parsed.residual());
}

#[test]
fn test_percent_decoding() {
    let parsed = QueryParser::parse_str("sort=a%2C-b&sort%5Bauthors%5D=c").unwrap_err();
    assert!(matches!(parsed, QueryError::ConflictingSortForm));

    let parsed = QueryParser::parse_str("sort=first+name%2C-b").unwrap();
    assert_eq!(parsed.sort(), &SortDirective::Untyped(strings(&["first name", "-b"])));
}

#[test]
fn test_from_url() {
    let url = Url::parse("http://example.com/api/author/?sort=-name&name__contains=a").unwrap();
    let parsed = QueryParser::parse(&RawQuery::from_url(&url)).unwrap();
    assert_eq!(parsed.sort(), &SortDirective::Untyped(strings(&["-name"])));
    assert_eq!(
        parsed.filters().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["name__contains"]
    );
}

#[test]
fn test_reserved_views() {
    let parsed = QueryParser::parse_str(
        "include=books,reviews&fields=name&fields=age&ids=1,2&ids=5&page=3&genre=sf&sort=name",
    )
    .unwrap();
    assert_eq!(parsed.include(), vec!["books", "reviews"]);
    assert_eq!(parsed.fields(), vec!["name", "age"]);
    assert_eq!(parsed.ids(), vec!["1", "2", "5"]);
    assert_eq!(parsed.page().unwrap(), Some(3));
    assert_eq!(
        parsed.filters().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["genre"]
    );
    // The views do not take anything away from the residual.
    assert_eq!(parsed.residual().len(), 5);
}

#[test]
fn test_bad_page() {
    let parsed = QueryParser::parse_str("page=last").unwrap();
    let err = parsed.page().unwrap_err();
    assert_eq!(err.to_string(), "expected integer value for 'page'");
}

#[test]
fn test_to_json() {
    let parsed = QueryParser::parse_str("sort[authors]=-name&genre=sf&genre=fantasy").unwrap();
    assert_eq!(
        parsed.to_json(),
        serde_json::json!({
            "sort": [["authors", "-name"]],
            "residual": {"genre": ["sf", "fantasy"]},
        })
    );
}
