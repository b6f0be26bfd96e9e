//! Durability tests: everything saved through the redb backend must come
//! back identical after closing and reopening the database.

use plankb::dao::{DaoFactory, StorageConfig};
use plankb::model::{Action, CeOperator, ConditionEffect, Fact, Fluent, Object, TimeTag, Type};
use plankb::pddl::ToPddl;
use tempfile::TempDir;

fn recharge_domain() -> (Action, Fact) {
    let robot_type = Type::new("robot");
    let battery_level = Fluent::function("battery_level", vec![robot_type.clone()]);
    let at_base = Fluent::predicate("at_base", vec![robot_type.clone()]);

    let r = Object::new(&robot_type, "r");
    let action = Action::new("recharge")
        .with_parameters(vec![r.clone()])
        .with_conditions(vec![
            ConditionEffect::new(&at_base, vec![r.clone()]).at(TimeTag::OverAll),
        ])
        .with_effects(vec![
            ConditionEffect::new(&battery_level, vec![r.clone()])
                .with_op(CeOperator::Increase)
                .with_value(50.0)
                .at(TimeTag::AtEnd),
        ]);

    let rb1 = Object::new(&robot_type, "rb1");
    let level = Fact::new(&battery_level, vec![rb1]).with_value(37.5);
    (action, level)
}

#[test]
fn facts_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let (_, level) = recharge_domain();

    {
        let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
        assert!(factory.fact_dao().save(&level).unwrap());
    }

    let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
    let loaded = factory.fact_dao().get(&level).unwrap().unwrap();
    assert_eq!(loaded.to_pddl(), "(= (battery_level rb1) 37.50)");

    // The propagated dependencies survived too.
    assert!(factory.type_dao().get("robot").unwrap().is_some());
    assert!(factory.object_dao().get("rb1").unwrap().is_some());
    assert!(factory.fluent_dao().get("battery_level").unwrap().is_some());
}

#[test]
fn actions_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let (action, _) = recharge_domain();

    let rendered = {
        let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
        let dao = factory.action_dao();
        assert!(dao.save(&action).unwrap());
        dao.get("recharge").unwrap().unwrap().to_pddl()
    };

    let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
    let loaded = factory.action_dao().get("recharge").unwrap().unwrap();
    assert_eq!(loaded.to_pddl(), rendered);
    assert!(loaded.to_pddl().contains("(over all (at_base ?r))"));
    assert!(loaded
        .to_pddl()
        .contains("(at end (increase (battery_level ?r) 50.00))"));
}

#[test]
fn deletes_survive_reopening_the_database() {
    let dir = TempDir::new().unwrap();
    let (action, level) = recharge_domain();

    {
        let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
        factory.action_dao().save(&action).unwrap();
        factory.fact_dao().save(&level).unwrap();
        assert!(factory.fact_dao().delete(&level).unwrap());
    }

    let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
    assert!(factory.fact_dao().get(&level).unwrap().is_none());
    assert!(factory.action_dao().get("recharge").unwrap().is_some());
}

#[test]
fn delete_all_empties_only_one_collection() {
    let dir = TempDir::new().unwrap();
    let factory = DaoFactory::new(StorageConfig::durable(dir.path())).unwrap();
    let (action, level) = recharge_domain();

    factory.action_dao().save(&action).unwrap();
    factory.fact_dao().save(&level).unwrap();
    factory.fact_dao().delete_all().unwrap();

    assert!(factory.fact_dao().get_all().unwrap().is_empty());
    assert_eq!(factory.action_dao().get_all().unwrap().len(), 1);
    assert!(factory.fluent_dao().get("battery_level").unwrap().is_some());
}
