use std::path::Path;
use std::sync::Arc;

use muster::data::{Catalog, GameSystem, Linker, Registry, Repository};
use muster::roster::{NodeId, Roster};
use muster::xml::Element;
use muster::Identifier;

const PTS: &str = "c057-0000-0000-0001";
const WARRIOR_LINK: &str = "e111-0000-0000-0001";
const LEADER_LINK: &str = "e111-0000-0000-0003";
const HEAVY_LINKS: [&str; 3] = [
    "e111-0000-0000-0004",
    "e111-0000-0000-0005",
    "e111-0000-0000-0006",
];

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

#[test]
fn repository_loads_and_links_the_fixture_package() {
    let repository = repository();
    assert_eq!(repository.game_system.name, "Skirmish System");
    assert_eq!(repository.catalogs.len(), 1);
    assert_eq!(repository.catalogs[0].name, "Test Faction");
}

#[test]
fn selections_keep_link_identity_over_the_shared_definition() {
    let repository = repository();
    let (roster, selections) = roster_with(&repository, &[WARRIOR_LINK]);

    let warrior = roster.instance(selections[0]);
    assert_eq!(warrior.id().value(), WARRIOR_LINK);
    assert_eq!(warrior.definition_id().value(), "5e1e-0000-0000-0001");
    assert!(warrior.matches(&Identifier::new(WARRIOR_LINK)));
    assert!(warrior.matches(&Identifier::new("5e1e-0000-0000-0001")));
}

#[test]
fn group_default_seeds_the_initial_weapon() {
    let repository = repository();
    let (roster, _) = roster_with(&repository, &[WARRIOR_LINK]);

    let group = find_named(&roster, "Weapon");
    let blaster = find_named(&roster, "Blaster");
    assert_eq!(roster.instance(blaster).selected(), 1);
    assert_eq!(roster.instance(group).selected(), 1);
    assert_eq!(roster.instance(group).min(), Some(1));
    assert_eq!(roster.instance(group).max(), Some(1));
    assert!(!roster.validation_report().has_errors());
}

#[test]
fn weapon_swap_is_exclusive_within_the_group() {
    let repository = repository();
    let (mut roster, _) = roster_with(&repository, &[WARRIOR_LINK]);

    let group = find_named(&roster, "Weapon");
    let blaster = find_named(&roster, "Blaster");
    let plasma = roster
        .find_instances(|instance| {
            instance.is_entry() && instance.definition_id().value() == "b0b0-0000-0000-0002"
        })
        .pop()
        .expect("plasma gun should be instantiated");

    roster
        .set_selected_instance(group, plasma)
        .expect("compute should succeed");
    assert_eq!(roster.instance(blaster).selected(), 0);
    assert_eq!(roster.instance(plasma).selected(), 1);
    assert_eq!(roster.instance(plasma).name(), "1x Plasma Gun");
    assert!(!roster.validation_report().has_errors());
    assert_eq!(roster.cost_total(&Identifier::new(PTS)), 19.0);
}

#[test]
fn weapon_group_bounds_flag_over_and_under_selection() {
    let repository = repository();
    let (mut roster, _) = roster_with(&repository, &[WARRIOR_LINK]);

    let group = find_named(&roster, "Weapon");
    let blaster = find_named(&roster, "Blaster");
    let plasma = roster
        .find_instances(|instance| {
            instance.is_entry() && instance.definition_id().value() == "b0b0-0000-0000-0002"
        })
        .pop()
        .expect("plasma gun should be instantiated");

    roster.set_selected_count(plasma, 1);
    roster.compute_state().expect("compute should succeed");
    let errors = roster.instance(group).errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("at most 1"), "got: {}", errors[0]);

    roster.set_selected_count(plasma, 0);
    roster.set_selected_count(blaster, 0);
    roster.compute_state().expect("compute should succeed");
    let errors = roster.instance(group).errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("at least 1"), "got: {}", errors[0]);
}

#[test]
fn name_modifier_interpolates_the_selected_count() {
    let repository = repository();
    let (mut roster, _) = roster_with(&repository, &[WARRIOR_LINK]);

    let plasma = roster
        .find_instances(|instance| {
            instance.is_entry() && instance.definition_id().value() == "b0b0-0000-0000-0002"
        })
        .pop()
        .expect("plasma gun should be instantiated");
    roster.set_selected_count(plasma, 4);
    roster.compute_state().expect("compute should succeed");
    assert_eq!(roster.instance(plasma).name(), "4x Plasma Gun");
}

#[test]
fn force_scoped_max_aggregates_over_every_link_to_the_definition() {
    let repository = repository();
    let (mut roster, selections) = roster_with(&repository, &HEAVY_LINKS);

    roster.set_selected_count(selections[0], 1);
    roster.set_selected_count(selections[1], 2);
    roster.set_selected_count(selections[2], 0);
    roster.compute_state().expect("compute should succeed");

    // The bound lives on the first link only; the total still counts all
    // three instances of the shared definition.
    let constrained = roster.instance(selections[0]);
    assert_eq!(constrained.max(), Some(2));
    assert_eq!(constrained.errors().len(), 1);
    assert!(constrained.errors()[0].contains("3 selected, at most 2"));
    assert!(roster.instance(selections[1]).errors().is_empty());
    assert!(roster.instance(selections[2]).errors().is_empty());
}

#[test]
fn roster_scoped_cost_limit_reports_at_roster_level() {
    let repository = repository();
    let (roster, selections) = roster_with(&repository, &HEAVY_LINKS);

    // Three heavies at 12 pts against the 30 pts roster cap.
    assert_eq!(roster.cost_total(&Identifier::new(PTS)), 36.0);
    let summary = roster.summary();
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("at most 30"), "got: {}", summary.errors[0]);
    for selection in &selections[1..] {
        assert!(roster.instance(*selection).errors().is_empty());
    }
}

#[test]
fn leader_presence_raises_the_heavy_cap_through_a_constraint_modifier() {
    let repository = repository();
    let picks = [LEADER_LINK, HEAVY_LINKS[0], HEAVY_LINKS[1], HEAVY_LINKS[2]];
    let (mut roster, selections) = roster_with(&repository, &picks);

    // The override lands after the first pass; a second pass converges.
    roster.compute_state().expect("compute should succeed");
    let constrained = roster.instance(selections[1]);
    assert_eq!(constrained.max(), Some(3));
    assert!(constrained.errors().is_empty());

    roster.set_selected_count(selections[0], 0);
    roster.compute_state().expect("compute should succeed");
    roster.compute_state().expect("compute should succeed");
    let constrained = roster.instance(selections[1]);
    assert_eq!(constrained.max(), Some(2));
    assert_eq!(constrained.errors().len(), 1);
}

#[test]
fn compute_is_idempotent_once_converged() {
    let repository = repository();
    let picks = [LEADER_LINK, HEAVY_LINKS[0], HEAVY_LINKS[1], HEAVY_LINKS[2]];
    let (mut roster, _) = roster_with(&repository, &picks);

    roster.compute_state().expect("compute should succeed");
    let before = serde_json::to_value(roster.summary()).expect("summary should serialize");
    roster.compute_state().expect("compute should succeed");
    let after = serde_json::to_value(roster.summary()).expect("summary should serialize");
    assert_eq!(before, after);
}

/// Minimal in-memory package for cases the file fixture does not cover.
fn inline_roster(catalog_markup: &str) -> (Roster, Vec<NodeId>) {
    let system = Arc::new(
        GameSystem::from_xml(
            &Element::from_str(
                r#"<gameSystem id="1234-1234-1234-1234" name="Inline System" revision="1" battleScribeVersion="2.03">
                     <costTypes>
                       <costType id="c057-0000-0000-0001" name="pts" defaultCostLimit="-1"/>
                     </costTypes>
                     <forceEntries>
                       <forceEntry id="f0f0-0000-0000-0001" name="Patrol"/>
                     </forceEntries>
                   </gameSystem>"#,
            )
            .expect("system markup should parse"),
        )
        .expect("system should build"),
    );
    let catalog = Catalog::from_xml(
        &Element::from_str(catalog_markup).expect("catalog markup should parse"),
    )
    .expect("catalog should build");

    let mut linker = Linker::new();
    linker.push_scope(Arc::new(Registry::from_catalog(&catalog)));
    linker.push_scope(Arc::new(Registry::from_game_system(&system)));
    let roots = linker.root_entries(&catalog).expect("roots should resolve");

    let force_entry = system
        .find_force_entry("Patrol")
        .expect("inline system should declare the Patrol force")
        .clone();
    let mut roster = Roster::new(Arc::clone(&system), linker, "Inline List");
    let force = roster.add_force(&force_entry);
    let mut selections = Vec::new();
    for handle in &roots {
        selections.push(
            roster
                .add_selection(force, handle)
                .expect("selection should instantiate"),
        );
    }
    roster.compute_state().expect("compute should succeed");
    (roster, selections)
}

#[test]
fn fractional_cost_overrun_trips_the_roster_limit() {
    let (mut roster, selections) = inline_roster(
        r#"<catalogue id="abcd-abcd-abcd-abcd" name="Inline Faction" revision="1"
                      battleScribeVersion="2.03"
                      gameSystemId="1234-1234-1234-1234" gameSystemRevision="1">
             <entryLinks>
               <entryLink id="a001-0000-0000-0001" name="Raider" targetId="b001-0000-0000-0001" type="selectionEntry">
                 <constraints>
                   <constraint id="d001-0000-0000-0001" field="c057-0000-0000-0001" scope="roster" value="30" type="max"/>
                 </constraints>
               </entryLink>
             </entryLinks>
             <sharedSelectionEntries>
               <selectionEntry id="b001-0000-0000-0001" name="Raider" type="model">
                 <costs>
                   <cost name="pts" typeId="c057-0000-0000-0001" value="10.25"/>
                 </costs>
               </selectionEntry>
             </sharedSelectionEntries>
           </catalogue>"#,
    );

    roster.set_selected_count(selections[0], 3);
    roster.compute_state().expect("compute should succeed");

    assert_eq!(roster.cost_total(&Identifier::new(PTS)), 30.75);
    let summary = roster.summary();
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("30.75"), "got: {}", summary.errors[0]);
}

#[test]
fn nested_subgroup_selections_count_toward_the_outer_group() {
    let (roster, _) = inline_roster(
        r#"<catalogue id="abcd-abcd-abcd-abce" name="Inline Faction" revision="1"
                      battleScribeVersion="2.03"
                      gameSystemId="1234-1234-1234-1234" gameSystemRevision="1">
             <entryLinks>
               <entryLink id="a002-0000-0000-0001" name="Sergeant" targetId="b002-0000-0000-0001" type="selectionEntry"/>
             </entryLinks>
             <sharedSelectionEntries>
               <selectionEntry id="b002-0000-0000-0001" name="Sergeant" type="model">
                 <selectionEntryGroups>
                   <selectionEntryGroup id="9900-0000-0000-0001" name="Wargear">
                     <constraints>
                       <constraint id="d002-0000-0000-0001" field="selections" scope="parent" value="1" type="min"/>
                     </constraints>
                     <selectionEntryGroups>
                       <selectionEntryGroup id="9901-0000-0000-0001" name="Melee" defaultSelectionEntryId="b003-0000-0000-0001">
                         <selectionEntries>
                           <selectionEntry id="b003-0000-0000-0001" name="Sword" type="upgrade"/>
                         </selectionEntries>
                       </selectionEntryGroup>
                     </selectionEntryGroups>
                   </selectionEntryGroup>
                 </selectionEntryGroups>
               </selectionEntry>
             </sharedSelectionEntries>
           </catalogue>"#,
    );

    let outer = find_named(&roster, "Wargear");
    assert_eq!(roster.instance(outer).selected(), 1);
    assert!(roster.instance(outer).errors().is_empty());
    assert!(!roster.validation_report().has_errors());
}

#[test]
fn summary_totals_follow_cost_overrides_and_counts() {
    let repository = repository();
    let (roster, _) = roster_with(&repository, &[WARRIOR_LINK]);

    let summary = roster.summary();
    assert_eq!(summary.game_system, "Skirmish System");
    assert_eq!(summary.cost_totals.len(), 1);
    assert_eq!(summary.cost_totals[0].name, "pts");
    assert_eq!(summary.cost_totals[0].value, 8.0);
    assert_eq!(summary.forces.len(), 1);
    assert_eq!(summary.forces[0].name, "Strike Team");
    assert_eq!(summary.forces[0].selections.len(), 1);
}
