//! [`SqliteStore`], the SQLite implementation of [`FamilyStore`].

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{OptionalExtension as _, params, params_from_iter, types::Value};
use tracing::debug;

use kindred_core::{
  calendar::{AnniversaryRow, BirthdayRow},
  date::format_date,
  geo::{City, Continent, Country, NewCountry, NewRegion, Region},
  holiday::Holiday,
  person::{NewPerson, Person, PersonLite},
  spouse::{NewSpouse, SpousePair, SpouseRow},
  store::FamilyStore,
  tag::Tag,
};

use crate::{
  Result,
  encode::{
    CITY_COLUMNS, COUNTRY_SELECT, PERSON_COLUMNS, PERSON_LITE_COLUMNS, RawAnniversary,
    RawBirthday, RawHoliday, RawPerson, RawPersonLite, RawSpouse, city_from_row,
    country_from_row, encode_date, encode_gender, like_prefix, person_lite_columns,
  },
  schema::SCHEMA,
};

const REGION_SELECT: &str = "
  SELECT r.id, r.code, r.name, r.country_code, co.name
  FROM regions r
  INNER JOIN countries co ON co.code = r.country_code";

fn region_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Region> {
  Ok(Region {
    id:           row.get(0)?,
    code:         row.get(1)?,
    name:         row.get(2)?,
    country_code: row.get(3)?,
    country_name: row.get(4)?,
  })
}

fn tag_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tag> {
  Ok(Tag { id: row.get(0)?, label: row.get(1)? })
}

/// Fail with `NotFound` when a write touched no rows.
fn expect_affected(affected: usize, entity: &'static str, key: impl ToString) -> Result<()> {
  if affected == 0 {
    return Err(kindred_core::Error::not_found(entity, key).into());
  }
  Ok(())
}

fn person_params(input: &NewPerson) -> Vec<Value> {
  vec![
    input.first_name.clone().into(),
    input.middle_name.clone().into(),
    input.last_name.clone().into(),
    input.nick_name.clone().map_or(Value::Null, Value::from),
    encode_gender(input.gender).to_owned().into(),
    input.is_alive.into(),
    encode_date(input.birth_date).map_or(Value::Null, Value::from),
    input.is_birth_year_guess.into(),
    input.birth_city_id.map_or(Value::Null, Value::from),
    input.home_city_id.map_or(Value::Null, Value::from),
    input.mother_id.map_or(Value::Null, Value::from),
    input.father_id.map_or(Value::Null, Value::from),
  ]
}

fn country_params(input: &NewCountry) -> Vec<Value> {
  vec![
    input.code.clone().into(),
    input.name.clone().into(),
    input.continent_code.clone().map_or(Value::Null, Value::from),
    input.capital_city_id.map_or(Value::Null, Value::from),
    input.gdp.into(),
    input.population.into(),
    input.has_region_icons.into(),
  ]
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Kindred record store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests and throwaway sessions.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single write statement and return the number of rows it touched.
  async fn execute(&self, sql: &'static str, values: Vec<Value>) -> Result<usize> {
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, params_from_iter(values))?))
      .await?;
    Ok(affected)
  }

  /// Run an `INSERT` and return the new rowid.
  async fn insert(&self, sql: &'static str, values: Vec<Value>) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(sql, params_from_iter(values))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  /// Select people projected as [`PERSON_LITE_COLUMNS`].
  async fn select_people(&self, sql: String, values: Vec<Value>) -> Result<Vec<PersonLite>> {
    let raws: Vec<RawPersonLite> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(values), |row| RawPersonLite::from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPersonLite::into_lite).collect()
  }

  async fn select_cities(&self, sql: String, values: Vec<Value>) -> Result<Vec<City>> {
    let cities = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter(values), |row| city_from_row(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(cities)
  }

  async fn select_tags(&self, sql: &'static str, values: Vec<Value>) -> Result<Vec<Tag>> {
    let tags = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(params_from_iter(values), tag_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(tags)
  }

  async fn select_tag(&self, sql: &'static str, value: Value) -> Result<Option<Tag>> {
    let tag = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [value], tag_from_row).optional()?))
      .await?;
    Ok(tag)
  }
}

// ─── FamilyStore impl ────────────────────────────────────────────────────────

impl FamilyStore for SqliteStore {
  type Error = crate::Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn get_person(&self, id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = ?1"),
            params![id],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn get_person_lite(&self, id: i64) -> Result<Option<PersonLite>> {
    let raw: Option<RawPersonLite> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_LITE_COLUMNS} FROM people WHERE id = ?1"),
            params![id],
            |row| RawPersonLite::from_row(row, 0),
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPersonLite::into_lite).transpose()
  }

  async fn list_people(&self) -> Result<Vec<PersonLite>> {
    self
      .select_people(
        format!(
          "SELECT {PERSON_LITE_COLUMNS} FROM people
           ORDER BY last_name, first_name, middle_name, id"
        ),
        Vec::new(),
      )
      .await
  }

  async fn search_people<'a>(
    &'a self,
    prefix: &'a str,
    offset: usize,
    limit: usize,
  ) -> Result<Vec<PersonLite>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    self
      .select_people(
        format!(
          "SELECT {PERSON_LITE_COLUMNS} FROM people
           WHERE first_name LIKE ?1 ESCAPE '\\'
              OR last_name LIKE ?1 ESCAPE '\\'
              OR nick_name LIKE ?1 ESCAPE '\\'
           ORDER BY last_name, first_name, middle_name, id
           LIMIT ?2 OFFSET ?3"
        ),
        vec![like_prefix(prefix).into(), limit.into(), offset.into()],
      )
      .await
  }

  async fn list_children_of(&self, parent_id: i64) -> Result<Vec<PersonLite>> {
    self
      .select_people(
        format!(
          "SELECT {PERSON_LITE_COLUMNS} FROM people
           WHERE mother_id = ?1 OR father_id = ?1
           ORDER BY birth_date, id"
        ),
        vec![parent_id.into()],
      )
      .await
  }

  async fn list_siblings_of(
    &self,
    father_id: i64,
    mother_id: i64,
    exclude_id: i64,
  ) -> Result<Vec<PersonLite>> {
    self
      .select_people(
        format!(
          "SELECT {PERSON_LITE_COLUMNS} FROM people
           WHERE father_id = ?1 AND mother_id = ?2 AND id != ?3
           ORDER BY birth_date, id"
        ),
        vec![father_id.into(), mother_id.into(), exclude_id.into()],
      )
      .await
  }

  async fn insert_person(&self, input: NewPerson) -> Result<i64> {
    let input = input.normalized()?;
    let id = self
      .insert(
        "INSERT INTO people (
           first_name, middle_name, last_name, nick_name, gender, is_alive, birth_date,
           is_birth_year_guess, birth_city_id, home_city_id, mother_id, father_id
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        person_params(&input),
      )
      .await?;
    debug!(id, "inserted person");
    Ok(id)
  }

  async fn update_person(&self, id: i64, input: NewPerson) -> Result<()> {
    let input = input.normalized()?;
    let mut values = person_params(&input);
    values.push(id.into());
    let affected = self
      .execute(
        "UPDATE people SET
           first_name = ?1, middle_name = ?2, last_name = ?3, nick_name = ?4, gender = ?5,
           is_alive = ?6, birth_date = ?7, is_birth_year_guess = ?8, birth_city_id = ?9,
           home_city_id = ?10, mother_id = ?11, father_id = ?12
         WHERE id = ?13",
        values,
      )
      .await?;
    expect_affected(affected, "person", id)
  }

  async fn delete_person(&self, id: i64) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let affected = tx.execute("DELETE FROM people WHERE id = ?1", params![id])?;
        if affected > 0 {
          tx.execute(
            "DELETE FROM spouses WHERE person1_id = ?1 OR person2_id = ?1",
            params![id],
          )?;
          tx.execute("DELETE FROM people_tags WHERE person_id = ?1", params![id])?;
          tx.execute("UPDATE people SET mother_id = NULL WHERE mother_id = ?1", params![id])?;
          tx.execute("UPDATE people SET father_id = NULL WHERE father_id = ?1", params![id])?;
        }
        tx.commit()?;
        Ok(affected)
      })
      .await?;
    expect_affected(affected, "person", id)?;
    debug!(id, "deleted person");
    Ok(())
  }

  // ── Spouses ───────────────────────────────────────────────────────────────

  async fn list_spouses_of(&self, person_id: i64) -> Result<Vec<SpouseRow>> {
    let raws: Vec<RawSpouse> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT person1_id, person2_id, status, married_date FROM spouses
           WHERE person1_id = ?1 OR person2_id = ?1
           ORDER BY status, person1_id, person2_id",
        )?;
        let rows = stmt
          .query_map(params![person_id], |row| {
            Ok(RawSpouse {
              person1_id:   row.get(0)?,
              person2_id:   row.get(1)?,
              status:       row.get(2)?,
              married_date: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSpouse::into_row).collect()
  }

  async fn insert_spouse(&self, input: NewSpouse) -> Result<SpouseRow> {
    let pair = input.pair()?;
    self
      .execute(
        "INSERT INTO spouses (person1_id, person2_id, status, married_date)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          pair.low().into(),
          pair.high().into(),
          input.status.code().into(),
          encode_date(input.married_date).map_or(Value::Null, Value::from),
        ],
      )
      .await?;
    debug!(?pair, status = ?input.status, "inserted spouse relation");
    Ok(SpouseRow { pair, status: input.status, married_date: input.married_date })
  }

  async fn delete_spouse(&self, pair: SpousePair) -> Result<()> {
    let affected = self
      .execute(
        "DELETE FROM spouses WHERE person1_id = ?1 AND person2_id = ?2",
        vec![pair.low().into(), pair.high().into()],
      )
      .await?;
    expect_affected(affected, "spouse", format!("{}-{}", pair.low(), pair.high()))
  }

  // ── Calendar feeds ────────────────────────────────────────────────────────

  async fn list_living_birthdays(&self) -> Result<Vec<BirthdayRow>> {
    let raws: Vec<RawBirthday> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_LITE_COLUMNS}, birth_date FROM people
           WHERE is_alive = 1 AND birth_date IS NOT NULL
           ORDER BY substr(birth_date, 6, 5), id"
        ))?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawBirthday {
              person:     RawPersonLite::from_row(row, 0)?,
              birth_date: row.get(8)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(count = raws.len(), "loaded birthdays");
    raws.into_iter().map(RawBirthday::into_row).collect()
  }

  async fn list_married_anniversaries(&self) -> Result<Vec<AnniversaryRow>> {
    let sql = format!(
      "SELECT {}, {}, s.married_date
       FROM spouses s
       INNER JOIN people p1 ON p1.id = s.person1_id
       INNER JOIN people p2 ON p2.id = s.person2_id
       WHERE s.status = 1 AND s.married_date IS NOT NULL
       ORDER BY substr(s.married_date, 6, 5), s.person1_id",
      person_lite_columns("p1"),
      person_lite_columns("p2"),
    );

    let raws: Vec<RawAnniversary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAnniversary {
              first:        RawPersonLite::from_row(row, 0)?,
              second:       RawPersonLite::from_row(row, 8)?,
              married_date: row.get(16)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    debug!(count = raws.len(), "loaded anniversaries");
    raws.into_iter().map(RawAnniversary::into_row).collect()
  }

  async fn list_holidays_from(&self, year: i32) -> Result<Vec<Holiday>> {
    let from = format!("{year:04}-01-01");
    let raws: Vec<RawHoliday> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT id, date, name FROM holidays WHERE date >= ?1 ORDER BY date, id")?;
        let rows = stmt
          .query_map(params![from], |row| {
            Ok(RawHoliday { id: row.get(0)?, date: row.get(1)?, name: row.get(2)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHoliday::into_holiday).collect()
  }

  async fn insert_holiday<'a>(&'a self, date: NaiveDate, name: &'a str) -> Result<Holiday> {
    let id = self
      .insert(
        "INSERT INTO holidays (date, name) VALUES (?1, ?2)",
        vec![format_date(date).into(), name.to_owned().into()],
      )
      .await?;
    Ok(Holiday { id, date, name: name.to_owned() })
  }

  // ── Geography ─────────────────────────────────────────────────────────────

  async fn get_city(&self, id: i64) -> Result<Option<City>> {
    let city = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CITY_COLUMNS} FROM city_view WHERE city_id = ?1"),
            params![id],
            |row| city_from_row(row, 0),
          )
          .optional()?)
      })
      .await?;
    Ok(city)
  }

  async fn search_cities<'a>(&'a self, prefix: &'a str) -> Result<Vec<City>> {
    self
      .select_cities(
        format!(
          "SELECT {CITY_COLUMNS} FROM city_view
           WHERE city_name LIKE ?1 ESCAPE '\\'
           ORDER BY city_name, country_code, region_code"
        ),
        vec![like_prefix(prefix).into()],
      )
      .await
  }

  async fn insert_city<'a>(&'a self, name: &'a str, region_id: i64) -> Result<City> {
    let id = self
      .insert(
        "INSERT INTO cities (name, region_id) VALUES (?1, ?2)",
        vec![name.to_owned().into(), region_id.into()],
      )
      .await?;
    self
      .get_city(id)
      .await?
      .ok_or_else(|| kindred_core::Error::not_found("city", id).into())
  }

  async fn delete_city(&self, id: i64) -> Result<()> {
    let affected = self.execute("DELETE FROM cities WHERE id = ?1", vec![id.into()]).await?;
    expect_affected(affected, "city", id)
  }

  async fn get_region(&self, id: i64) -> Result<Option<Region>> {
    let region = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(&format!("{REGION_SELECT} WHERE r.id = ?1"), params![id], region_from_row)
          .optional()?)
      })
      .await?;
    Ok(region)
  }

  async fn list_regions(&self, country_code: Option<String>) -> Result<Vec<Region>> {
    let regions = self
      .conn
      .call(move |conn| {
        let rows = if let Some(code) = country_code {
          let mut stmt = conn.prepare(&format!(
            "{REGION_SELECT} WHERE r.country_code = ?1 ORDER BY r.name, r.id"
          ))?;
          stmt
            .query_map(params![code], region_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("{REGION_SELECT} ORDER BY co.name, r.name, r.id"))?;
          stmt
            .query_map([], region_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;
    Ok(regions)
  }

  async fn insert_region(&self, input: NewRegion) -> Result<Region> {
    let id = self
      .insert(
        "INSERT INTO regions (code, name, country_code) VALUES (?1, ?2, ?3)",
        vec![input.code.into(), input.name.into(), input.country_code.into()],
      )
      .await?;
    self
      .get_region(id)
      .await?
      .ok_or_else(|| kindred_core::Error::not_found("region", id).into())
  }

  async fn get_country<'a>(&'a self, code: &'a str) -> Result<Option<Country>> {
    let code = code.to_owned();
    let country = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{COUNTRY_SELECT} WHERE co.code = ?1"),
            params![code],
            country_from_row,
          )
          .optional()?)
      })
      .await?;
    Ok(country)
  }

  async fn list_countries(&self) -> Result<Vec<Country>> {
    let countries = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("{COUNTRY_SELECT} ORDER BY co.name, co.code"))?;
        let rows = stmt
          .query_map([], country_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(countries)
  }

  async fn insert_country(&self, input: NewCountry) -> Result<()> {
    self
      .execute(
        "INSERT INTO countries (
           code, name, continent_code, capital_city_id, gdp, population, has_region_icons
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        country_params(&input),
      )
      .await?;
    Ok(())
  }

  async fn update_country<'a>(&'a self, original_code: &'a str, input: NewCountry) -> Result<()> {
    let mut values = country_params(&input);
    values.push(original_code.to_owned().into());
    let affected = self
      .execute(
        "UPDATE countries SET
           code = ?1, name = ?2, continent_code = ?3, capital_city_id = ?4, gdp = ?5,
           population = ?6, has_region_icons = ?7
         WHERE code = ?8",
        values,
      )
      .await?;
    expect_affected(affected, "country", original_code)
  }

  async fn delete_country<'a>(&'a self, code: &'a str) -> Result<()> {
    let affected = self
      .execute("DELETE FROM countries WHERE code = ?1", vec![code.to_owned().into()])
      .await?;
    expect_affected(affected, "country", code)
  }

  async fn list_continents(&self) -> Result<Vec<Continent>> {
    let continents = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT code, name, color FROM continents ORDER BY name")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(Continent { code: row.get(0)?, name: row.get(1)?, color: row.get(2)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(continents)
  }

  // ── Tags ──────────────────────────────────────────────────────────────────

  async fn insert_tag<'a>(&'a self, label: &'a str) -> Result<Tag> {
    let label = label.trim();
    if label.is_empty() {
      return Err(kindred_core::Error::InvalidInput("tag label is empty".into()).into());
    }
    let id = self
      .insert("INSERT INTO tags (label) VALUES (?1)", vec![label.to_owned().into()])
      .await?;
    Ok(Tag { id, label: label.to_owned() })
  }

  async fn get_tag(&self, id: i64) -> Result<Option<Tag>> {
    self.select_tag("SELECT id, label FROM tags WHERE id = ?1", id.into()).await
  }

  async fn get_tag_by_label<'a>(&'a self, label: &'a str) -> Result<Option<Tag>> {
    self
      .select_tag("SELECT id, label FROM tags WHERE label = ?1", label.to_owned().into())
      .await
  }

  async fn search_tags<'a>(&'a self, prefix: &'a str) -> Result<Vec<Tag>> {
    self
      .select_tags(
        "SELECT id, label FROM tags WHERE label LIKE ?1 ESCAPE '\\' ORDER BY label",
        vec![like_prefix(prefix).into()],
      )
      .await
  }

  async fn tags_for_person(&self, person_id: i64) -> Result<Vec<Tag>> {
    self
      .select_tags(
        "SELECT t.id, t.label FROM tags t
         INNER JOIN people_tags pt ON pt.tag_id = t.id
         WHERE pt.person_id = ?1
         ORDER BY t.label",
        vec![person_id.into()],
      )
      .await
  }

  async fn tag_person(&self, tag_id: i64, person_id: i64) -> Result<()> {
    self
      .execute(
        "INSERT OR IGNORE INTO people_tags (person_id, tag_id) VALUES (?1, ?2)",
        vec![person_id.into(), tag_id.into()],
      )
      .await?;
    Ok(())
  }

  async fn untag_person(&self, tag_id: i64, person_id: i64) -> Result<()> {
    let affected = self
      .execute(
        "DELETE FROM people_tags WHERE person_id = ?1 AND tag_id = ?2",
        vec![person_id.into(), tag_id.into()],
      )
      .await?;
    expect_affected(affected, "tag membership", format!("{tag_id}/{person_id}"))
  }

  async fn delete_tag(&self, id: i64) -> Result<()> {
    let affected = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM people_tags WHERE tag_id = ?1", params![id])?;
        let affected = tx.execute("DELETE FROM tags WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(affected)
      })
      .await?;
    expect_affected(affected, "tag", id)
  }
}
