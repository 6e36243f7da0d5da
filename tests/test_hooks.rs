use std::cell::RefCell;
use std::rc::Rc;

use graft::{
    convert, Element, Engine, Error, Event, FieldSpec, Fields, Hook, TypeDef, Value,
};

fn person(engine: &Engine<Element>) -> graft::TypeRef<Element> {
    TypeDef::new(
        "person",
        engine
            .build_table(Fields::new().field("name", FieldSpec::scalar(convert::string())))
            .unwrap(),
    )
}

#[test]
fn test_read_hook_sees_and_mutates_instance() {
    let mut engine = Engine::new();
    let person = person(&engine);

    let hook: Hook<Element> = Rc::new(|event, mapped_type, subject| {
        assert_eq!(event, Event::Read);
        assert_eq!(mapped_type.tag(), "person");
        let record = subject.record().unwrap();
        record.set("greeted", Value::Boolean(true));
        Ok(())
    });
    engine.add_hook(&person, Event::Read, hook);

    let node = Element::parse("<person name='Henry'/>").unwrap();
    let record = engine.read(&person, &node).unwrap();
    assert_eq!(record.boolean("greeted"), Some(true));
}

#[test]
fn test_write_hook_sees_and_mutates_node() {
    let mut engine = Engine::new();
    let person = person(&engine);

    let hook: Hook<Element> = Rc::new(|event, _mapped_type, subject| {
        assert_eq!(event, Event::Write);
        let node = subject.node().unwrap();
        node.set_attribute("version", "2");
        Ok(())
    });
    engine.add_hook(&person, Event::Write, hook);

    let mut record = person.new_instance();
    record.set("name", Value::String("Henry".to_string()));
    let node = engine.write(&person, &record).unwrap();
    assert_eq!(node.attribute("version"), Some("2"));
}

#[test]
fn test_hooks_fire_in_registration_order() {
    let mut engine = Engine::new();
    let person = person(&engine);
    let order = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = order.clone();
        let hook: Hook<Element> = Rc::new(move |_, _, _| {
            order.borrow_mut().push(label);
            Ok(())
        });
        engine.add_hook(&person, Event::Read, hook);
    }

    let node = Element::parse("<person name='Henry'/>").unwrap();
    engine.read(&person, &node).unwrap();
    assert_eq!(*order.borrow(), ["first", "second", "third"]);
}

#[test]
fn test_hooks_are_not_inherited_across_types() {
    let mut engine = Engine::new();
    let base = person(&engine);
    // Same shape, different type: hooks must not leak over.
    let derived = TypeDef::new(
        "person",
        engine
            .build_table(Fields::new().field("name", FieldSpec::scalar(convert::string())))
            .unwrap(),
    );

    let fired = Rc::new(RefCell::new(0));
    let hook: Hook<Element> = {
        let fired = fired.clone();
        Rc::new(move |_, _, _| {
            *fired.borrow_mut() += 1;
            Ok(())
        })
    };
    engine.add_hook(&base, Event::Read, hook);

    let node = Element::parse("<person name='Henry'/>").unwrap();
    engine.read(&derived, &node).unwrap();
    assert_eq!(*fired.borrow(), 0);

    engine.read(&base, &node).unwrap();
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn test_adding_same_hook_twice_is_a_no_op() {
    let mut engine = Engine::new();
    let person = person(&engine);

    let fired = Rc::new(RefCell::new(0));
    let hook: Hook<Element> = {
        let fired = fired.clone();
        Rc::new(move |_, _, _| {
            *fired.borrow_mut() += 1;
            Ok(())
        })
    };
    engine.add_hook(&person, Event::Read, hook.clone());
    engine.add_hook(&person, Event::Read, hook);
    assert_eq!(engine.hooks().count(&person, Event::Read), 1);

    let node = Element::parse("<person name='Henry'/>").unwrap();
    engine.read(&person, &node).unwrap();
    assert_eq!(*fired.borrow(), 1);
}

#[test]
fn test_remove_hook_is_idempotent() {
    let mut engine = Engine::new();
    let person = person(&engine);

    let hook: Hook<Element> = Rc::new(|_, _, _| Ok(()));
    engine.add_hook(&person, Event::Read, hook.clone());
    engine.remove_hook(&person, Event::Read, &hook);
    assert_eq!(engine.hooks().count(&person, Event::Read), 0);

    // Removing again, or removing one that was never added, is fine.
    engine.remove_hook(&person, Event::Read, &hook);
    let never_added: Hook<Element> = Rc::new(|_, _, _| Ok(()));
    engine.remove_hook(&person, Event::Write, &never_added);
}

#[test]
fn test_shared_hook_under_two_types() {
    let mut engine = Engine::new();
    let first = person(&engine);
    let second = TypeDef::new(
        "robot",
        engine
            .build_table(Fields::new().field("name", FieldSpec::scalar(convert::string())))
            .unwrap(),
    );

    let fired = Rc::new(RefCell::new(Vec::new()));
    let hook: Hook<Element> = {
        let fired = fired.clone();
        Rc::new(move |_, mapped_type, _| {
            fired.borrow_mut().push(mapped_type.tag().to_string());
            Ok(())
        })
    };
    engine.add_hook(&first, Event::Read, hook.clone());
    engine.add_hook(&second, Event::Read, hook);

    engine
        .read(&first, &Element::parse("<person name='a'/>").unwrap())
        .unwrap();
    engine
        .read(&second, &Element::parse("<robot name='b'/>").unwrap())
        .unwrap();
    assert_eq!(*fired.borrow(), ["person", "robot"]);
}

#[test]
fn test_failing_hook_aborts_the_read() {
    let mut engine = Engine::new();
    let person = person(&engine);

    let hook: Hook<Element> = Rc::new(|_, _, _| Err(Error::Hook("boom".to_string())));
    engine.add_hook(&person, Event::Read, hook);

    let node = Element::parse("<person name='Henry'/>").unwrap();
    assert!(matches!(
        engine.read(&person, &node),
        Err(Error::Hook(message)) if message == "boom"
    ));
}

#[test]
fn test_nested_types_fire_their_own_hooks() {
    let mut engine = Engine::new();
    let weapon = TypeDef::new(
        "weapon",
        engine
            .build_table(Fields::new().field("type", FieldSpec::scalar(convert::string())))
            .unwrap(),
    );
    let person = TypeDef::new(
        "person",
        engine
            .build_table(Fields::new().field("weapons", FieldSpec::mapped(&weapon).source("children")))
            .unwrap(),
    );

    let fired = Rc::new(RefCell::new(0));
    let hook: Hook<Element> = {
        let fired = fired.clone();
        Rc::new(move |_, _, _| {
            *fired.borrow_mut() += 1;
            Ok(())
        })
    };
    engine.add_hook(&weapon, Event::Read, hook);

    let node = Element::parse("<person><weapon type='sword'/><weapon type='bow'/></person>")
        .unwrap();
    engine.read(&person, &node).unwrap();
    assert_eq!(*fired.borrow(), 2);
}
