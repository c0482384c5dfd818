// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{NewIngredient, NewTag};
use crate::database::schema;
use crate::Result;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Deserialize)]
struct IngredientFixture {
    name: String,
    measurement_unit: String,
}

#[derive(Deserialize)]
struct TagFixture {
    name: String,
    color: String,
    slug: String,
}

/// Loads an ingredient fixture file (`[{name, measurement_unit}]`). Rows
/// already present under the same (name, unit) key are skipped. Returns the
/// number of rows actually inserted.
pub fn import_ingredients(
    conn: &mut database::Connection,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let fixtures: Vec<IngredientFixture> =
        serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let mut imported = 0;
    for fixture in &fixtures {
        use diesel::dsl::exists;
        use schema::ingredients::dsl::*;

        let already: bool = diesel::select(exists(
            ingredients
                .filter(name.eq(&fixture.name))
                .filter(measurement_unit.eq(&fixture.measurement_unit)),
        ))
        .get_result(conn)?;
        if already {
            continue;
        }

        diesel::insert_into(ingredients)
            .values(NewIngredient {
                name: &fixture.name,
                measurement_unit: &fixture.measurement_unit,
            })
            .execute(conn)?;
        imported += 1;
    }

    log::info!("imported {imported} of {} ingredients", fixtures.len());
    Ok(imported)
}

/// Loads a tag fixture file (`[{name, color, slug}]`). Slugs already present
/// are skipped.
pub fn import_tags(conn: &mut database::Connection, path: impl AsRef<Path>) -> Result<usize> {
    let fixtures: Vec<TagFixture> = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let mut imported = 0;
    for fixture in &fixtures {
        use diesel::dsl::exists;
        use schema::tags::dsl::*;

        let already: bool =
            diesel::select(exists(tags.filter(slug.eq(&fixture.slug)))).get_result(conn)?;
        if already {
            continue;
        }

        diesel::insert_into(tags)
            .values(NewTag {
                name: &fixture.name,
                slug: &fixture.slug,
                color: &fixture.color,
            })
            .execute(conn)?;
        imported += 1;
    }

    log::info!("imported {imported} of {} tags", fixtures.len());
    Ok(imported)
}

#[test]
fn ingredient_import_skips_existing_rows() {
    use std::{env, fs};

    let fixture_path = env::temp_dir().join("foodgram-ingredient-fixture.json");
    fs::write(
        &fixture_path,
        r#"[
            {"name": "flour", "measurement_unit": "g"},
            {"name": "milk", "measurement_unit": "ml"}
        ]"#,
    )
    .unwrap();

    let mut conn = crate::api::testing::connection();
    assert_eq!(import_ingredients(&mut conn, &fixture_path).unwrap(), 2);
    assert_eq!(import_ingredients(&mut conn, &fixture_path).unwrap(), 0);

    let count: i64 = {
        use schema::ingredients::dsl::*;
        ingredients.count().get_result(&mut conn).unwrap()
    };
    assert_eq!(count, 2);

    fs::remove_file(&fixture_path).unwrap();
}

#[test]
fn tag_import_skips_existing_slugs() {
    use std::{env, fs};

    let fixture_path = env::temp_dir().join("foodgram-tag-fixture.json");
    fs::write(
        &fixture_path,
        r##"[{"name": "Breakfast", "color": "#E26C2D", "slug": "breakfast"}]"##,
    )
    .unwrap();

    let mut conn = crate::api::testing::connection();
    assert_eq!(import_tags(&mut conn, &fixture_path).unwrap(), 1);
    assert_eq!(import_tags(&mut conn, &fixture_path).unwrap(), 0);

    let count: i64 = {
        use schema::tags::dsl::*;
        tags.count().get_result(&mut conn).unwrap()
    };
    assert_eq!(count, 1);

    fs::remove_file(&fixture_path).unwrap();
}
