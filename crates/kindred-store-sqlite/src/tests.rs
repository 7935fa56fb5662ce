//! Integration tests for `SqliteStore` against an in-memory database, driving
//! the core resolver and calendar builders end to end.

use chrono::NaiveDate;
use kindred_core::{
  Error as CoreError,
  calendar::{EventKind, build_window_calendar, build_year_calendar},
  date::RecurrenceWindow,
  geo::{NewCountry, NewRegion},
  person::{Gender, NewPerson},
  reminder::ReminderDigest,
  resolve::{resolve_grandparents, resolve_person_detail},
  spouse::{NewSpouse, SpousePair, SpouseStatus},
  store::FamilyStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

fn person(first: &str, last: &str, gender: Gender) -> NewPerson {
  NewPerson { last_name: last.into(), ..NewPerson::new(first, gender) }
}

async fn add(s: &SqliteStore, input: NewPerson) -> i64 { s.insert_person(input).await.unwrap() }

async fn marry(s: &SqliteStore, a: i64, b: i64, status: SpouseStatus, married: Option<NaiveDate>) {
  s.insert_spouse(NewSpouse { person_a: a, person_b: b, status, married_date: married })
    .await
    .unwrap();
}

/// Break a row behind the store's back.
async fn raw_sql(s: &SqliteStore, sql: &'static str) {
  s.conn
    .call(move |conn| {
      conn.execute_batch(sql)?;
      Ok(())
    })
    .await
    .unwrap();
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_person() {
  let s = store().await;
  let id = add(&s, NewPerson {
    middle_name: "Q".into(),
    nick_name: Some("  JJ ".into()),
    birth_date: Some(date(1990, 3, 15)),
    ..person("  Jane ", "Doe", Gender::Female)
  })
  .await;

  let fetched = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(fetched.first_name, "Jane");
  assert_eq!(fetched.nick_name.as_deref(), Some("JJ"));
  assert_eq!(fetched.birth_date, Some(date(1990, 3, 15)));
  assert!(fetched.is_alive);

  let lite = s.get_person_lite(id).await.unwrap().unwrap();
  assert_eq!(lite.name, "Jane \"JJ\" Q Doe");
  assert_eq!(lite.gender, Gender::Female);
}

#[tokio::test]
async fn get_person_missing_returns_none() {
  let s = store().await;
  assert!(s.get_person(42).await.unwrap().is_none());
  assert!(s.get_person_lite(42).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_person_requires_first_name() {
  let s = store().await;
  let err = s.insert_person(person("   ", "Doe", Gender::Male)).await.unwrap_err();
  assert!(matches!(CoreError::from(err), CoreError::InvalidInput(_)));
}

#[tokio::test]
async fn update_person_replaces_fields() {
  let s = store().await;
  let id = add(&s, person("Jon", "Doe", Gender::Male)).await;

  s.update_person(id, NewPerson { is_alive: false, ..person("John", "Doe", Gender::Male) })
    .await
    .unwrap();
  let fetched = s.get_person(id).await.unwrap().unwrap();
  assert_eq!(fetched.first_name, "John");
  assert!(!fetched.is_alive);

  let err = s.update_person(999, person("X", "", Gender::Male)).await.unwrap_err();
  assert!(CoreError::from(err).is_not_found());
}

#[tokio::test]
async fn search_people_matches_name_prefixes() {
  let s = store().await;
  add(&s, person("Alice", "Smith", Gender::Female)).await;
  add(&s, NewPerson { nick_name: Some("Smitty".into()), ..person("Bob", "Jones", Gender::Male) })
    .await;
  add(&s, person("Carol", "Blacksmith", Gender::Female)).await;
  add(&s, person("Dan_", "Underscore", Gender::Male)).await;

  let found = s.search_people("Smi", 0, 10).await.unwrap();
  let names: Vec<&str> = found.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(names, ["Bob \"Smitty\" Jones", "Alice Smith"]);

  let paged = s.search_people("Smi", 1, 10).await.unwrap();
  assert_eq!(paged.len(), 1);

  // `_` is literal, not a wildcard.
  assert!(s.search_people("D_n", 0, 10).await.unwrap().is_empty());
  assert_eq!(s.search_people("Dan_", 0, 10).await.unwrap().len(), 1);
}

// ─── Relationship resolution ─────────────────────────────────────────────────

#[tokio::test]
async fn resolves_parents_children_and_full_siblings() {
  let s = store().await;
  let dad = add(&s, person("Frank", "Doe", Gender::Male)).await;
  let mom = add(&s, person("Mary", "Doe", Gender::Female)).await;
  let other_mom = add(&s, person("Olive", "Roe", Gender::Female)).await;

  // Inserted out of birth order so id order and birth order disagree.
  let child = |first: &str, born: NaiveDate| NewPerson {
    birth_date: Some(born),
    father_id: Some(dad),
    mother_id: Some(mom),
    ..person(first, "Doe", Gender::Female)
  };
  let anchor = add(&s, child("Ann", date(2001, 4, 1))).await;
  let youngest = add(&s, child("Cat", date(2003, 8, 1))).await;
  let middle = add(&s, child("Bea", date(2002, 6, 1))).await;
  let half = add(&s, NewPerson {
    birth_date: Some(date(1999, 7, 7)),
    father_id: Some(dad),
    mother_id: Some(other_mom),
    ..person("Hal", "Roe", Gender::Male)
  })
  .await;

  let detail = resolve_person_detail(&s, anchor).await.unwrap();
  assert_eq!(detail.name, "Ann Doe");
  assert_eq!(detail.father.as_ref().unwrap().id, dad);
  assert_eq!(detail.mother.as_ref().unwrap().id, mom);
  let siblings: Vec<i64> = detail.siblings.iter().map(|p| p.id).collect();
  assert_eq!(siblings, [middle, youngest]);

  let mom_detail = resolve_person_detail(&s, mom).await.unwrap();
  let children: Vec<i64> = mom_detail.children.iter().map(|p| p.id).collect();
  assert_eq!(children, [anchor, middle, youngest]);

  let dad_detail = resolve_person_detail(&s, dad).await.unwrap();
  let children: Vec<&str> = dad_detail.children.iter().map(|p| p.name.as_str()).collect();
  assert_eq!(children, ["Hal Roe", "Ann Doe", "Bea Doe", "Cat Doe"]);
  assert_eq!(dad_detail.children[0].id, half);
  assert!(dad_detail.siblings.is_empty());
}

#[tokio::test]
async fn children_with_unknown_birth_date_sort_first() {
  let s = store().await;
  let mom = add(&s, person("Mary", "Doe", Gender::Female)).await;
  add(&s, NewPerson {
    birth_date: Some(date(1980, 1, 1)),
    mother_id: Some(mom),
    ..person("Older", "Doe", Gender::Male)
  })
  .await;
  add(&s, NewPerson { mother_id: Some(mom), ..person("Unknown", "Doe", Gender::Male) }).await;

  let children = s.list_children_of(mom).await.unwrap();
  assert_eq!(children[0].name, "Unknown Doe");
  assert_eq!(children[1].name, "Older Doe");
}

#[tokio::test]
async fn siblings_need_both_parents() {
  let s = store().await;
  let mom = add(&s, person("Mary", "Doe", Gender::Female)).await;
  let a = add(&s, NewPerson { mother_id: Some(mom), ..person("A", "Doe", Gender::Male) }).await;
  add(&s, NewPerson { mother_id: Some(mom), ..person("B", "Doe", Gender::Male) }).await;

  let detail = resolve_person_detail(&s, a).await.unwrap();
  assert!(detail.siblings.is_empty());
  assert!(detail.father.is_none());
}

#[tokio::test]
async fn spouses_resolve_other_side_ordered_by_status() {
  let s = store().await;
  let anchor = add(&s, person("Sam", "Doe", Gender::Male)).await;
  let ex = add(&s, person("Eve", "Old", Gender::Female)).await;
  let wife = add(&s, person("Wendy", "Doe", Gender::Female)).await;
  let date_ = add(&s, person("Dana", "New", Gender::Female)).await;

  marry(&s, ex, anchor, SpouseStatus::ExMarried, Some(date(2000, 6, 1))).await;
  marry(&s, anchor, date_, SpouseStatus::Dating, None).await;
  marry(&s, wife, anchor, SpouseStatus::Married, Some(date(2010, 9, 12))).await;

  let detail = resolve_person_detail(&s, anchor).await.unwrap();
  let spouses: Vec<(i64, SpouseStatus)> =
    detail.spouses.iter().map(|l| (l.spouse.id, l.status)).collect();
  assert_eq!(spouses, [
    (wife, SpouseStatus::Married),
    (date_, SpouseStatus::Dating),
    (ex, SpouseStatus::ExMarried),
  ]);
  assert_eq!(detail.spouses[0].married_date, Some(date(2010, 9, 12)));

  // The relation is symmetric.
  let wife_detail = resolve_person_detail(&s, wife).await.unwrap();
  assert_eq!(wife_detail.spouses.len(), 1);
  assert_eq!(wife_detail.spouses[0].spouse.id, anchor);
}

#[tokio::test]
async fn duplicate_spouse_pair_is_rejected() {
  let s = store().await;
  let a = add(&s, person("A", "", Gender::Male)).await;
  let b = add(&s, person("B", "", Gender::Female)).await;
  marry(&s, a, b, SpouseStatus::Dating, None).await;

  let dup = s
    .insert_spouse(NewSpouse {
      person_a:     b,
      person_b:     a,
      status:       SpouseStatus::Married,
      married_date: None,
    })
    .await;
  assert!(dup.is_err());

  s.delete_spouse(SpousePair::new(b, a).unwrap()).await.unwrap();
  assert!(s.list_spouses_of(a).await.unwrap().is_empty());
  let err = s.delete_spouse(SpousePair::new(a, b).unwrap()).await.unwrap_err();
  assert!(CoreError::from(err).is_not_found());
}

#[tokio::test]
async fn missing_person_is_not_found() {
  let s = store().await;
  let err = resolve_person_detail(&s, 7).await.unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn dangling_parent_is_a_referential_break() {
  let s = store().await;
  let id = add(&s, NewPerson { mother_id: Some(404), ..person("Orphan", "", Gender::Male) }).await;

  let err = resolve_person_detail(&s, id).await.unwrap_err();
  assert!(matches!(
    err,
    CoreError::ReferentialBreak { person_id, relation: "mother", missing_id: 404 }
      if person_id == id
  ));
}

#[tokio::test]
async fn dangling_spouse_is_a_referential_break() {
  let s = store().await;
  let id = add(&s, person("Solo", "", Gender::Male)).await;
  marry(&s, id, 500, SpouseStatus::Married, None).await;

  let err = resolve_person_detail(&s, id).await.unwrap_err();
  assert!(matches!(err, CoreError::ReferentialBreak { missing_id: 500, .. }));
}

#[tokio::test]
async fn grandparents_degrade_to_unknown() {
  let s = store().await;
  let grandpa = add(&s, person("George", "Doe", Gender::Male)).await;
  let dad = add(&s, NewPerson {
    father_id: Some(grandpa),
    mother_id: Some(999),
    ..person("Frank", "Doe", Gender::Male)
  })
  .await;
  let anchor = add(&s, NewPerson { father_id: Some(dad), ..person("Jane", "Doe", Gender::Female) })
    .await;

  let detail = resolve_person_detail(&s, anchor).await.unwrap();
  let grandparents = resolve_grandparents(&s, &detail).await;
  assert_eq!(grandparents.paternal.grandfather.unwrap().id, grandpa);
  assert!(grandparents.paternal.grandmother.is_none());
  assert!(grandparents.maternal.grandfather.is_none());
  assert!(grandparents.maternal.grandmother.is_none());
}

#[tokio::test]
async fn parent_cycle_resolves_in_bounded_steps() {
  let s = store().await;
  let a = add(&s, person("A", "", Gender::Male)).await;
  let b = add(&s, NewPerson { father_id: Some(a), ..person("B", "", Gender::Male) }).await;
  raw_sql(&s, "UPDATE people SET father_id = 2 WHERE id = 1").await;

  let detail = resolve_person_detail(&s, a).await.unwrap();
  assert_eq!(detail.father.unwrap().id, b);
  assert_eq!(detail.children[0].id, b);
}

#[tokio::test]
async fn delete_person_clears_relations() {
  let s = store().await;
  let mom = add(&s, person("Mary", "Doe", Gender::Female)).await;
  let dad = add(&s, person("Frank", "Doe", Gender::Male)).await;
  let kid = add(&s, NewPerson {
    mother_id: Some(mom),
    father_id: Some(dad),
    ..person("Kid", "Doe", Gender::Male)
  })
  .await;
  marry(&s, mom, dad, SpouseStatus::Married, Some(date(1985, 4, 4))).await;
  let tag = s.insert_tag("cousins").await.unwrap();
  s.tag_person(tag.id, mom).await.unwrap();

  s.delete_person(mom).await.unwrap();

  assert!(s.get_person(mom).await.unwrap().is_none());
  assert!(s.list_spouses_of(dad).await.unwrap().is_empty());
  let kid_row = s.get_person(kid).await.unwrap().unwrap();
  assert_eq!(kid_row.mother_id, None);
  assert_eq!(kid_row.father_id, Some(dad));
  assert!(resolve_person_detail(&s, kid).await.is_ok());

  let err = s.delete_person(mom).await.unwrap_err();
  assert!(CoreError::from(err).is_not_found());
}

// ─── Calendars ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn year_calendar_from_store() {
  let s = store().await;
  add(&s, NewPerson { birth_date: Some(date(1980, 1, 20)), ..person("Ann", "", Gender::Female) })
    .await;
  add(&s, NewPerson { birth_date: Some(date(1975, 1, 5)), ..person("Bea", "", Gender::Female) })
    .await;
  add(&s, NewPerson {
    birth_date: Some(date(1950, 2, 2)),
    is_alive: false,
    ..person("Gone", "", Gender::Male)
  })
  .await;
  let cal = add(&s, person("Cal", "", Gender::Male)).await;
  let dee = add(&s, person("Dee", "", Gender::Female)).await;
  marry(&s, cal, dee, SpouseStatus::Married, Some(date(2001, 1, 5))).await;

  let calendar = build_year_calendar(&s).await.unwrap();
  assert_eq!(calendar.months.len(), 12);
  let january: Vec<&str> = calendar.months[0].events.iter().map(|e| e.caption.as_str()).collect();
  assert_eq!(january, ["Bea", "Cal & Dee", "Ann"]);
  assert!(calendar.months[1].events.is_empty());
}

#[tokio::test]
async fn only_married_couples_have_anniversaries() {
  let s = store().await;
  let a = add(&s, person("A", "", Gender::Male)).await;
  let b = add(&s, person("B", "", Gender::Female)).await;
  let c = add(&s, person("C", "", Gender::Female)).await;
  let d = add(&s, person("D", "", Gender::Male)).await;
  marry(&s, a, b, SpouseStatus::ExMarried, Some(date(1999, 3, 3))).await;
  marry(&s, c, d, SpouseStatus::Married, None).await;

  assert!(s.list_married_anniversaries().await.unwrap().is_empty());
}

#[tokio::test]
async fn window_calendar_wraps_new_year() {
  let s = store().await;
  add(&s, NewPerson { birth_date: Some(date(1990, 1, 4)), ..person("January", "", Gender::Male) })
    .await;
  add(&s, NewPerson {
    birth_date: Some(date(1985, 12, 30)),
    ..person("December", "", Gender::Female)
  })
    .await;
  add(&s, NewPerson { birth_date: Some(date(1985, 6, 1)), ..person("June", "", Gender::Female) })
    .await;
  s.insert_holiday(date(2025, 1, 1), "New Year's Day").await.unwrap();
  s.insert_holiday(date(2026, 1, 1), "New Year's Day").await.unwrap();
  s.insert_holiday(date(2024, 7, 4), "Independence Day").await.unwrap();

  let window = RecurrenceWindow::starting_at(date(2024, 12, 23), 28).unwrap();
  let events = build_window_calendar(&s, window, true).await.unwrap();
  let order: Vec<(&str, EventKind)> =
    events.iter().map(|e| (e.caption.as_str(), e.kind)).collect();
  assert_eq!(order, [
    ("December", EventKind::Birthday),
    ("New Year's Day", EventKind::Holiday),
    ("January", EventKind::Birthday),
  ]);

  let without = build_window_calendar(&s, window, false).await.unwrap();
  assert_eq!(without.len(), 2);
}

#[tokio::test]
async fn malformed_stored_date_fails_the_build() {
  let s = store().await;
  add(&s, NewPerson { birth_date: Some(date(1990, 1, 4)), ..person("Fine", "", Gender::Male) })
    .await;
  let bad = add(&s, person("Broken", "", Gender::Male)).await;
  raw_sql(&s, "UPDATE people SET birth_date = '1990-13-45' WHERE first_name = 'Broken'").await;

  let err = build_year_calendar(&s).await.unwrap_err();
  assert!(matches!(err, CoreError::MalformedDate { ref value, .. } if value == "1990-13-45"));

  let err = resolve_person_detail(&s, bad).await.unwrap_err();
  assert!(matches!(err, CoreError::MalformedDate { .. }));
}

#[tokio::test]
async fn reminder_digest_from_store() {
  let s = store().await;
  add(&s, NewPerson {
    birth_date: Some(date(1990, 3, 20)),
    ..person("Jane", "Doe", Gender::Female)
  })
    .await;

  let window = RecurrenceWindow::starting_at(date(2024, 3, 18), 28).unwrap();
  let digest = ReminderDigest::build(&s, window, true).await.unwrap();
  assert_eq!(digest.events.len(), 1);
  assert!(digest.render_text("Sam").contains("Jane Doe (turns 34)"));
}

// ─── Geography ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn geography_round_trip() {
  let s = store().await;
  s.insert_country(NewCountry {
    code:             "US".into(),
    name:             "United States".into(),
    continent_code:   Some("NA".into()),
    capital_city_id:  None,
    gdp:              0,
    population:       0,
    has_region_icons: false,
  })
  .await
  .unwrap();
  let region = s
    .insert_region(NewRegion {
      code:         "OR".into(),
      name:         "Oregon".into(),
      country_code: "US".into(),
    })
    .await
    .unwrap();
  assert_eq!(region.country_name, "United States");

  let city = s.insert_city("Portland", region.id).await.unwrap();
  assert_eq!(city.display(), "Portland, OR, US");
  assert_eq!(s.search_cities("port").await.unwrap().len(), 1);

  let kid = add(&s, NewPerson { birth_city_id: Some(city.id), ..person("Pat", "", Gender::Male) })
    .await;
  let detail = resolve_person_detail(&s, kid).await.unwrap();
  assert_eq!(detail.birth_city.unwrap().name, "Portland");

  assert!(s.get_country("US").await.unwrap().unwrap().capital.is_none());
  assert_eq!(s.list_regions(Some("US".into())).await.unwrap().len(), 1);
  assert!(s.list_regions(Some("CA".into())).await.unwrap().is_empty());
}

#[tokio::test]
async fn dangling_city_is_a_referential_break() {
  let s = store().await;
  let id = add(&s, NewPerson { home_city_id: Some(77), ..person("Nomad", "", Gender::Male) }).await;

  let err = resolve_person_detail(&s, id).await.unwrap_err();
  assert!(matches!(err, CoreError::ReferentialBreak { relation: "home city", missing_id: 77, .. }));
}

// ─── Tags ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn tags_attach_and_detach() {
  let s = store().await;
  let jane = add(&s, person("Jane", "Doe", Gender::Female)).await;
  let cousins = s.insert_tag("cousins").await.unwrap();
  let coworkers = s.insert_tag("coworkers").await.unwrap();

  s.tag_person(cousins.id, jane).await.unwrap();
  s.tag_person(cousins.id, jane).await.unwrap();
  s.tag_person(coworkers.id, jane).await.unwrap();

  let labels: Vec<String> =
    s.tags_for_person(jane).await.unwrap().into_iter().map(|t| t.label).collect();
  assert_eq!(labels, ["cousins", "coworkers"]);
  assert_eq!(s.search_tags("cou").await.unwrap().len(), 2);
  assert_eq!(s.get_tag_by_label("cousins").await.unwrap(), Some(cousins.clone()));

  s.untag_person(cousins.id, jane).await.unwrap();
  s.delete_tag(coworkers.id).await.unwrap();
  assert!(s.tags_for_person(jane).await.unwrap().is_empty());
  assert!(s.get_tag(coworkers.id).await.unwrap().is_none());
}
