//! Loading the bundled data directory and broken copies of it.

use std::fs;
use std::path::{Path, PathBuf};

use battle_content::ContentFactory;
use battle_core::skill::ActionScope;
use battle_core::state::{AilmentKind, BattleFlags, EquipSlot};
use battle_core::stats::{Attribute, Element};
use battle_core::{BattleContext, Person, PersonSpec};
use tempfile::TempDir;

fn bundled() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Copy the bundled data into a scratch directory, replacing `file` with
/// `contents`.
fn patched(file: &str, contents: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    for entry in fs::read_dir(bundled()).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), dir.path().join(entry.file_name())).unwrap();
    }
    fs::write(dir.path().join(file), contents).unwrap();
    dir
}

#[test]
fn bundled_data_links_up() {
    let factory = ContentFactory::new(bundled());
    let registry = factory.load_registry().unwrap();
    assert_eq!(registry.counts(), [10, 9, 4, 3, 4]);

    let spit = registry.skill(4).unwrap();
    assert_eq!(spit.scope(), ActionScope::OneEnemy);
    assert_eq!(spit.actions().len(), 2);
    assert_eq!(spit.primary(), Element::Forest);

    let potion = registry.item(1).unwrap();
    assert_eq!(potion.use_skill().map(|s| s.id()), Some(3));
    assert!(potion.is_battle_usable());
    assert!(registry.item(4).unwrap().use_skill().is_none());

    let staff = registry.equipment(2).unwrap();
    assert!(staff.is_two_handed());
    assert!(staff.skills().contains(7));

    let toad = registry.category(4).unwrap();
    assert!(toad.is_immune(AilmentKind::Poison));
    assert!(!toad.permissions().contains(BattleFlags::ITM_ENABLED));
    assert_eq!(registry.category(2).unwrap().qtdr_regen(), 5);

    let config = factory.load_config().unwrap();
    assert_eq!(config.run_chance, 60);
    assert_eq!(config.ai.random_skill_chance, 0.25);
}

#[test]
fn persons_build_from_loaded_categories() {
    let factory = ContentFactory::new(bundled());
    let registry = factory.load_registry().unwrap();
    let config = factory.load_config().unwrap();
    let mut ctx = BattleContext::new(&config);

    let spec = PersonSpec::new(
        1,
        "Maren",
        registry.category(1).unwrap(),
        registry.category(3).unwrap(),
    );
    let mut maren = Person::new(&mut ctx, spec);
    assert_eq!(maren.level(), 1);
    assert!(maren.vita() > 0);

    let mut known: Vec<u32> = maren.known_skills().iter().map(|s| s.id()).collect();
    known.sort_unstable();
    assert_eq!(known, vec![1, 9]);

    let phag = maren.temp_max().get(Attribute::Phag);
    maren
        .set_equip(EquipSlot::RArm, registry.equipment(1).unwrap())
        .unwrap();
    assert_eq!(maren.temp_max().get(Attribute::Phag), phag + 6);
    // Coil Staff's skill needs level 3.
    assert!(!maren.known_skills().iter().any(|s| s.id() == 7));
}

#[test]
fn rejected_action_lines_only_cost_their_skill_slot() {
    let dir = patched(
        "actions.csv",
        "1,DAMAGE,,,,,AMOUNT.25,PC.10,VITA,\n\
         2,DAMAGE,,,,,AMOUNT.40,PC.15,VITA,\n\
         3,ALTER,,,ALL,ALL,AMOUNT.60,PC.10,VITA,\n\
         4,ALTER,,,ALL,ALL,PC.-10,AMOUNT.0,PHFD,\n\
         5,INFLICT,POISON,4.2,,,AMOUNT.0,AMOUNT.0,,70\n\
         6,RELIEVE,POISON,,,,AMOUNT.0,AMOUNT.0,,\n\
         7,REVIVE,,,ALL,ALL,PC.50,PC.10,,\n\
         8,INFLICT,PARALYSIS,1.2,,,AMOUNT.0,AMOUNT.0,,40\n\
         9,ALTER,,,ALL,ALL,AMOUNT.20,AMOUNT.0,QTDR,\n\
         10,DAMAGE,,,,,AMOUNT.35,PC.10,VITA,\n",
    );
    let registry = ContentFactory::new(dir.path()).load_registry().unwrap();
    assert!(registry.action(5).is_err());

    let spit = registry.skill(4).unwrap();
    assert_eq!(spit.actions().len(), 1);
    assert_eq!(spit.actions()[0].id(), 1);
}

#[test]
fn duplicate_ids_fail_the_load() {
    let dir = patched(
        "items.ron",
        r#"(items: [
            (id: 1, name: "Potion", flags: "CONSUMED | BATTLE_READY", use_skill: Some(3)),
            (id: 1, name: "Potion again", flags: "CONSUMED | BATTLE_READY", use_skill: Some(3)),
        ])"#,
    );
    let error = ContentFactory::new(dir.path()).load_registry().unwrap_err();
    assert!(format!("{error:#}").contains("items.ron"));
}

#[test]
fn unknown_skill_references_fail_the_load() {
    let dir = patched(
        "equipment.ron",
        r#"(equipment: [
            (id: 1, name: "Cursed Ring", slot: LARM, skills: [(99, 1)]),
        ])"#,
    );
    let error = ContentFactory::new(dir.path()).load_registry().unwrap_err();
    assert!(format!("{error:#}").contains("equipment 1"));
}

#[test]
fn malformed_ron_names_the_file() {
    let dir = patched("categories.ron", "(categories: [ (id: 1, name: ");
    let error = ContentFactory::new(dir.path()).load_registry().unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("categories.ron"));
    assert!(message.contains("Failed to parse category catalog RON"));
}
