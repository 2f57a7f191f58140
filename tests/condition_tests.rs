use std::path::Path;
use std::sync::Arc;

use muster::data::Repository;
use muster::roster::{NodeId, Roster};
use muster::Identifier;

fn repository() -> Repository {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/index.xml");
    Repository::from_file(&path).expect("fixture package should load and verify")
}

fn roster_with(repository: &Repository, link_ids: &[&str]) -> (Roster, Vec<NodeId>) {
    let catalog = Arc::clone(&repository.catalogs[0]);
    let linker = repository
        .linker_for(&catalog)
        .expect("linker should build for fixture catalog");
    let force_entry = repository
        .game_system
        .find_force_entry("Strike Team")
        .expect("fixture system should declare the Strike Team force")
        .clone();

    let mut roster = Roster::new(Arc::clone(&repository.game_system), linker, "Test List");
    let force = roster.add_force(&force_entry);
    let mut selections = Vec::new();
    for id in link_ids {
        let handle = repository
            .find_entry(&catalog, &Identifier::new(*id))
            .expect("root entry lookup should succeed")
            .expect("fixture catalog should offer the entry");
        selections.push(
            roster
                .add_selection(force, &handle)
                .expect("selection should instantiate"),
        );
    }
    roster.compute_state().expect("compute should succeed");
    (roster, selections)
}

fn find_named(roster: &Roster, name: &str) -> NodeId {
    let found = roster.find_instances(|instance| instance.name() == name);
    assert_eq!(found.len(), 1, "expected exactly one `{name}` instance");
    found[0]
}

const SPECIALISMS: [&str; 7] = [
    "Comms",
    "Medic",
    "Scout",
    "Veteran",
    "Leader",
    "Demolitions",
    "Sniper",
];

#[test]
fn specialism_group_is_hidden_for_a_plain_warrior() {
    let repository = repository();
    let (roster, _) = roster_with(&repository, &["e111-0000-0000-0001"]);

    let group = find_named(&roster, "Specialism");
    assert!(roster.instance(group).is_hidden());
}

#[test]
fn specialist_sees_the_documented_specialisms() {
    let repository = repository();
    let (roster, _) = roster_with(&repository, &["e111-0000-0000-0002"]);

    let group = find_named(&roster, "Specialism");
    assert!(!roster.instance(group).is_hidden());

    let visible = ["Comms", "Medic", "Scout", "Veteran"];
    for name in SPECIALISMS {
        let node = find_named(&roster, name);
        assert_eq!(
            roster.instance(node).is_hidden(),
            !visible.contains(&name),
            "`{name}` visibility should follow the specialist's primary category"
        );
    }
}

#[test]
fn leader_sees_only_the_leader_specialism() {
    let repository = repository();
    let (roster, _) = roster_with(&repository, &["e111-0000-0000-0003"]);

    let group = find_named(&roster, "Specialism");
    assert!(!roster.instance(group).is_hidden());

    for name in SPECIALISMS {
        let node = find_named(&roster, name);
        assert_eq!(roster.instance(node).is_hidden(), name != "Leader");
    }
}

#[test]
fn selecting_veteran_unlocks_demolitions() {
    let repository = repository();
    let (mut roster, _) = roster_with(&repository, &["e111-0000-0000-0002"]);

    let group = find_named(&roster, "Specialism");
    let veteran = find_named(&roster, "Veteran");
    let comms = find_named(&roster, "Comms");
    let demolitions = find_named(&roster, "Demolitions");
    assert!(roster.instance(demolitions).is_hidden());

    roster
        .set_selected_instance(group, veteran)
        .expect("compute should succeed");
    assert_eq!(roster.instance(veteran).selected(), 1);
    assert!(!roster.instance(demolitions).is_hidden());

    // Swapping the specialism away clears the override again.
    roster
        .set_selected_instance(group, comms)
        .expect("compute should succeed");
    assert_eq!(roster.instance(veteran).selected(), 0);
    assert!(roster.instance(demolitions).is_hidden());
}

#[test]
fn parent_and_force_count_conditions_unhide_the_grenade_launcher() {
    let repository = repository();
    let (roster, _) = roster_with(&repository, &["e111-0000-0000-0001"]);

    // Statically hidden; the modifier needs the weapon-group parent plus
    // at least one force in the roster.
    let launcher = find_named(&roster, "Grenade Launcher");
    assert!(!roster.instance(launcher).is_hidden());
}
