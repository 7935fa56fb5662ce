//! Relationship resolution around a single person.
//!
//! Every relation is a fixed-depth lookup from the anchor: parents by id,
//! children and siblings by filtered scan, spouses through the spouse
//! relation. Nothing here walks the ancestor graph, so corrupt data with a
//! parent cycle can never cause unbounded work.

use tracing::{debug, warn};

use crate::{
  Error, Result,
  geo::City,
  person::{GrandparentPair, Grandparents, PersonDetail, PersonLite},
  spouse::SpouseLink,
  store::{FamilyStore, store_error},
};

/// Load a person and resolve their parents, cities, children, siblings, and
/// spouses.
///
/// Fails with `NotFound` if the person does not exist, and with
/// `ReferentialBreak` if a stored parent, spouse, or city id does not resolve.
#[tracing::instrument(skip(store))]
pub async fn resolve_person_detail<S: FamilyStore>(
  store: &S,
  person_id: i64,
) -> Result<PersonDetail> {
  let person = store
    .get_person(person_id)
    .await
    .map_err(store_error)?
    .ok_or_else(|| Error::not_found("person", person_id))?;

  let mother = resolve_relative(store, person_id, "mother", person.mother_id).await?;
  let father = resolve_relative(store, person_id, "father", person.father_id).await?;
  let birth_city = resolve_city(store, person_id, "birth city", person.birth_city_id).await?;
  let home_city = resolve_city(store, person_id, "home city", person.home_city_id).await?;

  let children = store.list_children_of(person_id).await.map_err(store_error)?;

  let siblings = match (person.father_id, person.mother_id) {
    (Some(father_id), Some(mother_id)) => store
      .list_siblings_of(father_id, mother_id, person_id)
      .await
      .map_err(store_error)?,
    _ => Vec::new(),
  };

  let spouses = resolve_spouses(store, person_id).await?;

  debug!(
    children = children.len(),
    siblings = siblings.len(),
    spouses = spouses.len(),
    "resolved person detail"
  );

  Ok(PersonDetail {
    name: person.full_name(),
    person,
    mother,
    father,
    birth_city,
    home_city,
    children,
    siblings,
    spouses,
  })
}

/// One further hop past the father and mother of an already-resolved person.
///
/// Best effort: a missing parent leaves both of that side's grandparents
/// unknown, and any lookup failure is logged and treated as unknown.
#[tracing::instrument(skip_all, fields(person_id = detail.person.id))]
pub async fn resolve_grandparents<S: FamilyStore>(
  store: &S,
  detail: &PersonDetail,
) -> Grandparents {
  Grandparents {
    paternal: grandparent_pair(store, detail.father.as_ref()).await,
    maternal: grandparent_pair(store, detail.mother.as_ref()).await,
  }
}

async fn grandparent_pair<S: FamilyStore>(
  store: &S,
  parent: Option<&PersonLite>,
) -> GrandparentPair {
  let Some(parent) = parent else {
    return GrandparentPair::default();
  };

  GrandparentPair {
    grandfather: best_effort(store, parent.id, "father", parent.father_id).await,
    grandmother: best_effort(store, parent.id, "mother", parent.mother_id).await,
  }
}

async fn best_effort<S: FamilyStore>(
  store: &S,
  person_id: i64,
  relation: &'static str,
  id: Option<i64>,
) -> Option<PersonLite> {
  match resolve_relative(store, person_id, relation, id).await {
    Ok(found) => found,
    Err(e) => {
      warn!(person_id, relation, error = %e, "grandparent lookup failed; treating as unknown");
      None
    }
  }
}

/// Resolve an optional person reference held by `person_id`.
async fn resolve_relative<S: FamilyStore>(
  store: &S,
  person_id: i64,
  relation: &'static str,
  id: Option<i64>,
) -> Result<Option<PersonLite>> {
  let Some(id) = id else {
    return Ok(None);
  };

  store
    .get_person_lite(id)
    .await
    .map_err(store_error)?
    .map(Some)
    .ok_or(Error::ReferentialBreak { person_id, relation, missing_id: id })
}

async fn resolve_city<S: FamilyStore>(
  store: &S,
  person_id: i64,
  relation: &'static str,
  id: Option<i64>,
) -> Result<Option<City>> {
  let Some(id) = id else {
    return Ok(None);
  };

  store
    .get_city(id)
    .await
    .map_err(store_error)?
    .map(Some)
    .ok_or(Error::ReferentialBreak { person_id, relation, missing_id: id })
}

/// The other side of every spouse row touching `person_id`, Married first.
async fn resolve_spouses<S: FamilyStore>(store: &S, person_id: i64) -> Result<Vec<SpouseLink>> {
  let rows = store.list_spouses_of(person_id).await.map_err(store_error)?;

  let mut links = Vec::with_capacity(rows.len());
  for row in rows {
    let Some(other_id) = row.pair.other(person_id) else {
      warn!(person_id, pair = ?row.pair, "spouse row does not involve person; skipping");
      continue;
    };
    let spouse = store
      .get_person_lite(other_id)
      .await
      .map_err(store_error)?
      .ok_or(Error::ReferentialBreak { person_id, relation: "spouse", missing_id: other_id })?;
    links.push(SpouseLink { spouse, status: row.status, married_date: row.married_date });
  }

  links.sort_by_key(|link| link.status);
  Ok(links)
}
