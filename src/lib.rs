pub mod collection;
pub mod contact;
pub mod query;
pub mod record;
pub mod todo;

pub use query::{query, Isolator, Match, Query};
pub use record::{Record, Value};

#[cfg(test)]
pub mod test {
    use crate::collection::Collection;
    use crate::impl_record;
    use crate::query::{query, Isolator, Query};
    use crate::record::{Record, Value};
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        name: String,
        age: u32,
    }

    impl_record!(Person { name: String, age: u32 });

    fn person(name: &str, age: u32) -> Person {
        Person {
            name: name.to_string(),
            age,
        }
    }

    fn ted_and_angie() -> Vec<Person> {
        vec![person("Ted", 12), person("Angie", 31)]
    }

    #[test]
    pub fn matching_both_fields_includes_once() {
        let people = ted_and_angie();
        let mut q = Query::new();
        q.field(Person::name, |name| name == "Angie")
            .field(Person::age, |age| *age > 30);

        assert_eq!(query(&people, &q), vec![&person("Angie", 31)]);
    }

    #[test]
    pub fn no_match_is_empty() {
        let people = ted_and_angie();
        let mut q = Query::new();
        q.field(Person::name, |name| name == "Nobody");

        assert!(query(&people, &q).is_empty());
    }

    #[test]
    pub fn empty_input_is_empty() {
        let mut q = Query::new();
        q.field(Person::age, |_| true);

        let nobody: Vec<Person> = Vec::new();
        assert!(query(&nobody, &q).is_empty());
    }

    #[test]
    pub fn unkeyed_fields_never_match() {
        let people = ted_and_angie();
        let mut q: Query<Person> = Query::new();
        q.isolate("email", Isolator::Exists);

        assert!(q.apply(&people).is_empty());
    }

    #[test]
    pub fn input_order_is_kept() {
        let people = vec![person("Ann", 40), person("Bob", 20), person("Cy", 50)];
        let mut q = Query::new();
        q.field(Person::age, |age| *age >= 40);

        assert_eq!(q.apply_owned(people), vec![person("Ann", 40), person("Cy", 50)]);
    }

    #[test]
    pub fn insert_then_query() {
        let mut collection = Collection::new();

        let mut a = collection.doc();
        a.insert("name", "flora");
        a.insert("age", 19);
        a.insert("likes", "cats");
        collection.write_document(a);

        let mut b = collection.doc();
        b.insert("name", "sarah");
        b.insert("age", 21);
        b.insert("likes", "dogs");
        collection.write_document(b);

        let mut c = collection.doc();
        c.insert("name", "jane");
        c.insert("age", 20);
        c.insert("likes", "cats");
        collection.write_document(c);

        let mut q = Query::new();
        q.isolate("likes", Isolator::Eq(Value::from("cats")));

        let names: Vec<&Value> = collection
            .query(&q)
            .into_iter()
            .filter_map(|doc| doc.get("name"))
            .collect();
        assert_eq!(names, vec![&Value::from("flora"), &Value::from("jane")]);
    }

    #[test]
    pub fn collection_ids_and_removal() {
        let mut collection = Collection::new();
        let first = collection.doc();
        assert_eq!(first.id(), 1);
        collection.write_document(first);

        let mut second = collection.doc();
        assert_eq!(second.id(), 2);
        second.insert("age", 30);
        collection.write_document(second);
        assert_eq!(collection.len(), 2);

        let mut replacement = collection.read_document(2).unwrap().clone();
        replacement.insert("age", 31);
        collection.write_document(replacement);
        assert_eq!(collection.len(), 2);
        assert_eq!(
            collection.read_document(2).unwrap().get("age"),
            Some(&Value::Integer(31))
        );

        assert!(collection.remove_document(1).is_some());
        assert!(collection.remove_document(1).is_none());
        assert!(collection.read_document(1).is_err());
        assert_eq!(collection.documents().map(|doc| doc.id()).collect::<Vec<_>>(), vec![2]);
        assert_eq!(collection.doc().id(), 3);
    }

    const NAMES: [&str; 4] = ["Ted", "Angie", "Carol", "Nobody"];

    fn people_strategy() -> impl Strategy<Value = Vec<Person>> {
        prop::collection::vec(
            (prop::sample::select(NAMES.to_vec()), 0u32..100).prop_map(|(name, age)| person(name, age)),
            0..24,
        )
    }

    fn person_query(name: Option<&'static str>, older_than: Option<u32>) -> Query<'static, Person> {
        let mut q = Query::new();
        if let Some(wanted) = name {
            q.field(Person::name, move |name| name == wanted);
        }
        if let Some(threshold) = older_than {
            q.field(Person::age, move |age| *age > threshold);
        }
        q
    }

    /// Straight OR over the fields that have a predicate.
    fn any_keyed_field(p: &Person, name: Option<&str>, older_than: Option<u32>) -> bool {
        p.field_names().into_iter().any(|field| match field {
            "name" => name.is_some_and(|wanted| p.name == wanted),
            "age" => older_than.is_some_and(|threshold| p.age > threshold),
            _ => false,
        })
    }

    proptest! {
        #[test]
        fn apply_agrees_with_field_or(
            people in people_strategy(),
            name in prop::option::of(prop::sample::select(NAMES.to_vec())),
            older_than in prop::option::of(0u32..100),
        ) {
            let q = person_query(name, older_than);
            let expected: Vec<&Person> = people
                .iter()
                .filter(|p| any_keyed_field(p, name, older_than))
                .collect();

            prop_assert_eq!(q.apply(&people), expected);
        }

        #[test]
        fn matches_come_back_once_in_input_order(
            people in people_strategy(),
            name in prop::option::of(prop::sample::select(NAMES.to_vec())),
            older_than in prop::option::of(0u32..100),
        ) {
            let q = person_query(name, older_than);
            let positions: Vec<usize> = q
                .apply(&people)
                .into_iter()
                .filter_map(|m| people.iter().position(|p| std::ptr::eq(p, m)))
                .collect();

            prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
            for (index, p) in people.iter().enumerate() {
                prop_assert_eq!(positions.contains(&index), q.matches(p));
            }
        }

        #[test]
        fn empty_input_stays_empty(
            name in prop::option::of(prop::sample::select(NAMES.to_vec())),
            older_than in prop::option::of(0u32..100),
        ) {
            let q = person_query(name, older_than);
            prop_assert!(q.apply(&[]).is_empty());
        }

        #[test]
        fn unkeyed_records_are_excluded(people in people_strategy()) {
            let mut q: Query<Person> = Query::new();
            q.isolate("email", Isolator::Exists);

            prop_assert!(q.apply(&people).is_empty());
            prop_assert_eq!(q.unknown_fields(&people).len(), usize::from(!people.is_empty()));
        }
    }
}
