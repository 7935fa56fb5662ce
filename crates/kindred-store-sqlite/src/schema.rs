//! SQL schema for the Kindred SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS continents (
    code  TEXT PRIMARY KEY,
    name  TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS countries (
    code             TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    continent_code   TEXT,
    capital_city_id  INTEGER,
    gdp              INTEGER NOT NULL DEFAULT 0,
    population       INTEGER NOT NULL DEFAULT 0,
    has_region_icons INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS regions (
    id           INTEGER PRIMARY KEY,
    code         TEXT NOT NULL,
    name         TEXT NOT NULL,
    country_code TEXT NOT NULL REFERENCES countries(code) ON UPDATE CASCADE
);

CREATE TABLE IF NOT EXISTS cities (
    id        INTEGER PRIMARY KEY,
    name      TEXT NOT NULL,
    region_id INTEGER NOT NULL REFERENCES regions(id),
    lat       REAL,
    lng       REAL
);

CREATE VIEW IF NOT EXISTS city_view AS
    SELECT ci.id   AS city_id,
           ci.name AS city_name,
           ci.lat  AS lat,
           ci.lng  AS lng,
           r.id    AS region_id,
           r.code  AS region_code,
           r.country_code AS country_code
    FROM cities ci
    INNER JOIN regions r ON r.id = ci.region_id;

-- Parent and city references are not foreign keys; a dangling id is reported
-- by the resolver as a referential break.
CREATE TABLE IF NOT EXISTS people (
    id                  INTEGER PRIMARY KEY,
    first_name          TEXT NOT NULL,
    middle_name         TEXT NOT NULL DEFAULT '',
    last_name           TEXT NOT NULL DEFAULT '',
    nick_name           TEXT,
    gender              TEXT NOT NULL,           -- 'M' | 'F'
    is_alive            INTEGER NOT NULL DEFAULT 1,
    birth_date          TEXT,                    -- YYYY-MM-DD
    is_birth_year_guess INTEGER NOT NULL DEFAULT 0,
    birth_city_id       INTEGER,
    home_city_id        INTEGER,
    mother_id           INTEGER,
    father_id           INTEGER
);

-- One row per unordered pair, smaller id first.
CREATE TABLE IF NOT EXISTS spouses (
    person1_id   INTEGER NOT NULL,
    person2_id   INTEGER NOT NULL,
    status       INTEGER NOT NULL,               -- 1 married, 2 dating, 3 ex-married
    married_date TEXT,                           -- YYYY-MM-DD
    PRIMARY KEY (person1_id, person2_id),
    CHECK (person1_id < person2_id)
);

CREATE TABLE IF NOT EXISTS holidays (
    id   INTEGER PRIMARY KEY,
    date TEXT NOT NULL,                          -- YYYY-MM-DD
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tags (
    id    INTEGER PRIMARY KEY,
    label TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS people_tags (
    person_id INTEGER NOT NULL,
    tag_id    INTEGER NOT NULL REFERENCES tags(id),
    PRIMARY KEY (person_id, tag_id)
);

CREATE INDEX IF NOT EXISTS people_mother_idx   ON people(mother_id);
CREATE INDEX IF NOT EXISTS people_father_idx   ON people(father_id);
CREATE INDEX IF NOT EXISTS spouses_person2_idx ON spouses(person2_id);
CREATE INDEX IF NOT EXISTS holidays_date_idx   ON holidays(date);

PRAGMA user_version = 1;
";
