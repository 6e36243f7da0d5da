use graft::{convert, Element, Engine, FieldSpec, Fields, Record, TypeDef, Value};
use proptest::prelude::*;

#[test]
fn test_scalar_fields_round_trip() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "probe",
        engine
            .build_table(
                Fields::new()
                    .field("name", FieldSpec::scalar(convert::string()))
                    .field("count", FieldSpec::scalar(convert::integer()))
                    .field("ratio", FieldSpec::scalar(convert::float()))
                    .field("active", FieldSpec::scalar(convert::boolean()))
                    .field(
                        "comment",
                        FieldSpec::scalar(convert::string()).source("child.text"),
                    ),
            )
            .unwrap(),
    );

    let mut record = Record::new("probe");
    record.set("name", Value::String("voyager".to_string()));
    record.set("count", Value::Integer(-42));
    record.set("ratio", Value::Float(0.125));
    record.set("active", Value::Boolean(true));
    record.set("comment", Value::String("all's well & good".to_string()));

    let node = engine.write(&mapped, &record).unwrap();
    let read_back = engine.read(&mapped, &node).unwrap();
    assert_eq!(read_back, record);
}

#[test]
fn test_round_trip_through_serialized_text() {
    let engine = Engine::<Element>::new();
    let mapped = TypeDef::new(
        "probe",
        engine
            .build_table(
                Fields::new()
                    .field("name", FieldSpec::scalar(convert::string()))
                    .field("count", FieldSpec::scalar(convert::integer())),
            )
            .unwrap(),
    );

    let mut record = Record::new("probe");
    record.set("name", Value::String("voyager <1>".to_string()));
    record.set("count", Value::Integer(2));

    let xml = engine.write(&mapped, &record).unwrap().to_xml_string();
    let node = Element::parse(&xml).unwrap();
    let read_back = engine.read(&mapped, &node).unwrap();
    assert_eq!(read_back, record);
}

#[test]
fn test_parse_serialize_round_trip() {
    let xml = r#"<person name="Henry" age="30"><temperament>bold</temperament></person>"#;
    let node = Element::parse(xml).unwrap();
    assert_eq!(node.to_xml_string(), xml);
}

proptest! {
    #[test]
    fn text_content_survives_serialization(text in "[ -~]*") {
        let mut el = Element::new("doc");
        el.set_text(&text);
        let xml = el.to_xml_string();
        let parsed = Element::parse(&xml).unwrap();
        prop_assert_eq!(parsed.text().unwrap_or(""), text.as_str());
    }

    #[test]
    fn attribute_value_survives_serialization(value in "[ -~]*") {
        let mut el = Element::new("doc");
        el.set_attribute("a", value.as_str());
        let xml = el.to_xml_string();
        let parsed = Element::parse(&xml).unwrap();
        prop_assert_eq!(parsed.attribute("a").unwrap(), value.as_str());
    }
}
