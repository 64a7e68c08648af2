use pretty_assertions::assert_eq;
use qail_filter::config;
use qail_filter::prelude::*;

const FILTERS: &str = r#"
[filters.status]
fields = "state"

[filters.min_age]
fields = "age"
type = "number"

[filters.price]
type = "float"

[filters.active]
fields = "is_active"
type = "bool"

[filters.since]
fields = "created_at"
type = "date"

[filters.q]
fields = ["first_name", "last_name", "email"]

[filters.team]
fields = "teams.slug"
prefix_field = false
"#;

#[test]
fn query_string_to_where_clause() {
    let allowed = config::from_toml_str(FILTERS).unwrap();

    let params = UrlFilterBuilder::new()
        .equals("status", "active")
        .greater_than_or_equal("min_age", 21)
        .less_than("price", 9.5)
        .equals("active", "yes")
        .greater_than("since", "2024-03-01T12:00:00+01:00")
        .like("q", "ann")
        .none_of("team", &["ops", "qa"])
        .equals("page", 2);

    let filters = parse_filters(params.params(), &allowed);
    let names: Vec<&str> = filters.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["status", "min_age", "price", "active", "since", "q", "team"]
    );

    let mut query = WhereBuilder::for_table("people");
    apply_filters(&mut query, &filters);

    assert_eq!(
        query.to_sql(),
        "WHERE people.state = 'active' \
         AND people.age >= 21 \
         AND people.price < 9.5 \
         AND people.is_active = true \
         AND people.created_at > '2024-03-01T11:00:00Z' \
         AND (people.first_name LIKE '%ann%' OR people.last_name LIKE '%ann%' OR people.email LIKE '%ann%') \
         AND teams.slug NOT IN ('ops', 'qa')"
    );
}

#[test]
fn malformed_values_degrade_to_strings() {
    let allowed = config::from_toml_str(FILTERS).unwrap();
    let filters = parse_filters(
        [("min_age", ">:twenty"), ("since", "yesterday"), ("price", "in:1.5,cheap")],
        &allowed,
    );

    let mut query = WhereBuilder::new();
    apply_filters(&mut query, &filters);

    assert_eq!(
        query.clauses(),
        &[
            Clause::Where(Condition::new("age", Operator::Gt, "twenty")),
            Clause::Where(Condition::new("created_at", Operator::Eq, "yesterday")),
            Clause::Where(Condition::new(
                "price",
                Operator::In,
                Value::List(vec![Value::Float(1.5), Value::from("cheap")])
            )),
        ]
    );
}

#[test]
fn apply_filters_chains() {
    let allowed = config::from_toml_str(FILTERS).unwrap();
    let mut query = WhereBuilder::new();

    let sql = apply_filters(
        apply_filters(&mut query, &parse_filters([("status", "a")], &allowed)),
        &parse_filters([("status", "!=:b")], &allowed),
    )
    .to_sql();

    assert_eq!(sql, "WHERE state = 'a' AND state != 'b'");
}

#[test]
fn nothing_allowed_means_no_clauses() {
    let filters = parse_filters([("status", "active")], &AllowedFilters::new());
    assert!(filters.is_empty());

    let mut query = WhereBuilder::new();
    assert!(apply_filters(&mut query, &filters).is_empty());
}
