use graft::{convert, Element, Engine, Error, FieldSpec, Fields, Record, TypeDef, Value};

fn person(engine: &Engine<Element>) -> graft::TypeRef<Element> {
    TypeDef::new(
        "person",
        engine
            .build_table(
                Fields::new()
                    .field("name", FieldSpec::scalar(convert::string()))
                    .field("age", FieldSpec::scalar(convert::integer()))
                    .field(
                        "temperament",
                        FieldSpec::scalar(convert::string()).source("child.text"),
                    ),
            )
            .unwrap(),
    )
}

fn henry() -> Record {
    let mut record = Record::new("person");
    record.set("name", Value::String("Henry".to_string()));
    record.set("age", Value::Integer(30));
    record.set("temperament", Value::String("bold".to_string()));
    record
}

#[test]
fn test_write_person() {
    let engine = Engine::new();
    let person = person(&engine);

    let node = engine.write(&person, &henry()).unwrap();
    assert_eq!(node.tag(), "person");
    assert_eq!(node.attribute("name"), Some("Henry"));
    assert_eq!(node.attribute("age"), Some("30"));
    assert_eq!(node.children().len(), 1);
    assert_eq!(node.children()[0].tag(), "temperament");
    assert_eq!(node.children()[0].text(), Some("bold"));
}

#[test]
fn test_write_serialized_form() {
    let engine = Engine::new();
    let person = person(&engine);

    let node = engine.write(&person, &henry()).unwrap();
    insta::assert_snapshot!(
        node.to_xml_string(),
        @r#"<person name="Henry" age="30"><temperament>bold</temperament></person>"#
    );
}

#[test]
fn test_write_emits_attributes_in_declaration_order() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "point",
        engine
            .build_table(
                Fields::new()
                    .field("y", FieldSpec::scalar(convert::integer()))
                    .field("x", FieldSpec::scalar(convert::integer())),
            )
            .unwrap(),
    );
    let mut record = Record::new("point");
    record.set("x", Value::Integer(1));
    record.set("y", Value::Integer(2));

    let node = engine.write(&mapped, &record).unwrap();
    assert_eq!(node.to_xml_string(), r#"<point y="2" x="1"/>"#);
}

#[test]
fn test_write_child_text_tag_override() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "person",
        engine
            .build_table(Fields::new().field(
                "temperament",
                FieldSpec::scalar(convert::string())
                    .source("child.text")
                    .tag("mood"),
            ))
            .unwrap(),
    );
    let mut record = Record::new("person");
    record.set("temperament", Value::String("bold".to_string()));

    let node = engine.write(&mapped, &record).unwrap();
    assert_eq!(node.to_xml_string(), "<person><mood>bold</mood></person>");
}

#[test]
fn test_write_text_source() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "note",
        engine
            .build_table(
                Fields::new().field("body", FieldSpec::scalar(convert::string()).source("text")),
            )
            .unwrap(),
    );
    let mut record = Record::new("note");
    record.set("body", Value::String("remember the milk".to_string()));

    let node = engine.write(&mapped, &record).unwrap();
    assert_eq!(node.to_xml_string(), "<note>remember the milk</note>");
}

#[test]
fn test_write_missing_field_fails() {
    let engine = Engine::new();
    let person = person(&engine);
    let mut record = henry();
    record.unset("age");

    let err = engine.write(&person, &record).unwrap_err();
    match err {
        Error::Write {
            mapped_type, field, ..
        } => {
            assert_eq!(mapped_type, "person");
            assert_eq!(field, "age");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_write_missing_optional_field_skips() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "person",
        engine
            .build_table(
                Fields::new()
                    .field("name", FieldSpec::scalar(convert::string()))
                    .field("age", FieldSpec::scalar(convert::integer()).optional()),
            )
            .unwrap(),
    );
    let mut record = Record::new("person");
    record.set("name", Value::String("Henry".to_string()));

    let node = engine.write(&mapped, &record).unwrap();
    assert_eq!(node.to_xml_string(), r#"<person name="Henry"/>"#);
}

#[test]
fn test_write_renderer_override() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "item",
        engine
            .build_table(Fields::new().field(
                "price",
                FieldSpec::scalar(convert::float()).renderer(|value| match value {
                    Value::Float(x) => Ok(format!("{:.2}", x)),
                    other => Err(format!("expected a float, found a {}", other.kind())),
                }),
            ))
            .unwrap(),
    );
    let mut record = Record::new("item");
    record.set("price", Value::Float(1.5));

    let node = engine.write(&mapped, &record).unwrap();
    assert_eq!(node.to_xml_string(), r#"<item price="1.50"/>"#);
}

#[test]
fn test_write_unrenderable_value_fails() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "person",
        engine
            .build_table(Fields::new().field("name", FieldSpec::scalar(convert::string())))
            .unwrap(),
    );
    let mut record = Record::new("person");
    record.set("name", Value::Sequence(Vec::new()));

    assert!(matches!(
        engine.write(&mapped, &record),
        Err(Error::Write { .. })
    ));
}
