//! Predicate construction.
//!
//! Translates a [`SearchIntent`] plus a county's field naming into an
//! ordered list of SQL-like `where` expressions, most specific first.
//! Pure string building — execution lives in [`crate::cascade`].

use parcel_estimate_models::{CountySchema, Predicate, SchemaField, SearchIntent};
use parcel_estimate_parse::parse_address;

/// Builds the filter cascade for one search intent.
///
/// - Address searches yield up to three stages: number+name+type,
///   number+name, then name alone. An unparseable address (no street
///   name) yields no predicates at all.
/// - Quick-ref and owner searches are single-stage.
///
/// Name matching is a case-insensitive substring match; number and
/// type are exact matches.
#[must_use]
pub fn build_predicates(intent: &SearchIntent, schema: &CountySchema) -> Vec<Predicate> {
    match intent {
        SearchIntent::Address { raw } => address_predicates(raw, schema),
        SearchIntent::QuickRef { id } => vec![Predicate {
            label: "quickref",
            where_clause: format!(
                "{} = '{}'",
                schema.attribute(SchemaField::QuickRefId),
                escape(id.trim())
            ),
        }],
        SearchIntent::Owner { last, first } => vec![owner_predicate(last, first.as_deref(), schema)],
    }
}

fn address_predicates(raw: &str, schema: &CountySchema) -> Vec<Predicate> {
    let Some(parsed) = parse_address(raw) else {
        return Vec::new();
    };

    let num_attr = schema.attribute(SchemaField::StreetNum);
    let name_attr = schema.attribute(SchemaField::StreetName);
    let type_attr = schema.attribute(SchemaField::StreetType);
    let name = escape(&parsed.name);

    let mut predicates = Vec::with_capacity(3);

    if let (Some(number), Some(street_type)) = (&parsed.number, &parsed.street_type) {
        predicates.push(Predicate {
            label: "number+name+type",
            where_clause: format!(
                "{num_attr} = '{}' AND UPPER({name_attr}) LIKE '%{name}%' AND UPPER({type_attr}) = '{}'",
                escape(number),
                escape(street_type),
            ),
        });
    }

    if let Some(number) = &parsed.number {
        predicates.push(Predicate {
            label: "number+name",
            where_clause: format!(
                "{num_attr} = '{}' AND UPPER({name_attr}) LIKE '%{name}%'",
                escape(number),
            ),
        });
    }

    // Always attempted as the final fallback.
    predicates.push(Predicate {
        label: "name",
        where_clause: format!("UPPER({name_attr}) LIKE '%{name}%'"),
    });

    predicates
}

fn owner_predicate(last: &str, first: Option<&str>, schema: &CountySchema) -> Predicate {
    let owner_attr = schema.attribute(SchemaField::Owner);
    let last = escape(&last.trim().to_uppercase());
    let pattern = match first.map(str::trim).filter(|f| !f.is_empty()) {
        Some(first) => format!("{last}, {}%", escape(&first.to_uppercase())),
        None => format!("{last}%"),
    };
    Predicate {
        label: "owner",
        where_clause: format!("UPPER({owner_attr}) LIKE '{pattern}'"),
    }
}

/// Doubles single quotes so user text stays inside the SQL literal.
fn escape(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> CountySchema {
        CountySchema::fort_bend()
    }

    #[test]
    fn full_address_builds_three_stages() {
        let intent = SearchIntent::Address {
            raw: "123 Main St".to_string(),
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(predicates.len(), 3);
        assert_eq!(
            predicates[0].where_clause,
            "situssno = '123' AND UPPER(situssnm) LIKE '%MAIN%' AND UPPER(situsstp) = 'ST'"
        );
        assert_eq!(
            predicates[1].where_clause,
            "situssno = '123' AND UPPER(situssnm) LIKE '%MAIN%'"
        );
        assert_eq!(predicates[2].where_clause, "UPPER(situssnm) LIKE '%MAIN%'");
    }

    #[test]
    fn number_without_type_skips_first_stage() {
        let intent = SearchIntent::Address {
            raw: "123 Main".to_string(),
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[0].label, "number+name");
        assert_eq!(predicates[1].label, "name");
    }

    #[test]
    fn bare_name_is_single_fallback_stage() {
        let intent = SearchIntent::Address {
            raw: "Main".to_string(),
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].where_clause, "UPPER(situssnm) LIKE '%MAIN%'");
    }

    #[test]
    fn unparseable_address_builds_nothing() {
        let intent = SearchIntent::Address {
            raw: "???".to_string(),
        };
        assert!(build_predicates(&intent, &schema()).is_empty());
    }

    #[test]
    fn quickref_is_exact_match() {
        let intent = SearchIntent::QuickRef {
            id: " R123456 ".to_string(),
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].where_clause, "quickrefid = 'R123456'");
    }

    #[test]
    fn owner_with_first_name_is_prefix_match() {
        let intent = SearchIntent::Owner {
            last: "smith".to_string(),
            first: Some("john".to_string()),
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(
            predicates[0].where_clause,
            "UPPER(ownername) LIKE 'SMITH, JOHN%'"
        );
    }

    #[test]
    fn owner_without_first_name_matches_last_only() {
        let intent = SearchIntent::Owner {
            last: "Smith".to_string(),
            first: None,
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(predicates[0].where_clause, "UPPER(ownername) LIKE 'SMITH%'");
    }

    #[test]
    fn blank_first_name_is_treated_as_absent() {
        let intent = SearchIntent::Owner {
            last: "Smith".to_string(),
            first: Some("   ".to_string()),
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(predicates[0].where_clause, "UPPER(ownername) LIKE 'SMITH%'");
    }

    #[test]
    fn single_quotes_are_doubled() {
        let intent = SearchIntent::Owner {
            last: "O'Brien".to_string(),
            first: None,
        };
        let predicates = build_predicates(&intent, &schema());
        assert_eq!(
            predicates[0].where_clause,
            "UPPER(ownername) LIKE 'O''BRIEN%'"
        );
    }

    #[test]
    fn harris_schema_uses_its_own_attribute_names() {
        let intent = SearchIntent::Address {
            raw: "Main".to_string(),
        };
        let predicates = build_predicates(&intent, &CountySchema::harris());
        assert_eq!(
            predicates[0].where_clause,
            "UPPER(site_str_name) LIKE '%MAIN%'"
        );
    }
}
