// Copyright 2023 Remi Bernotavicius

use crate::api::recipe::TagView;
use crate::database;
use crate::database::models::{Ingredient, IngredientId, Tag, TagId};
use crate::database::schema;
use crate::{Error, Result};
use diesel::ExpressionMethods as _;
use diesel::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IngredientView {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientView {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

pub fn list_ingredients(conn: &mut database::Connection) -> Result<Vec<IngredientView>> {
    use schema::ingredients::dsl::*;

    Ok(ingredients
        .select(Ingredient::as_select())
        .order((name.asc(), measurement_unit.asc()))
        .load(conn)?
        .into_iter()
        .map(IngredientView::from)
        .collect())
}

/// Name prefix match, for the ingredient picker.
pub fn search_ingredients(
    conn: &mut database::Connection,
    query: &str,
) -> Result<Vec<IngredientView>> {
    use diesel::expression_methods::TextExpressionMethods as _;
    use schema::ingredients::dsl::*;

    Ok(ingredients
        .select(Ingredient::as_select())
        .filter(name.like(format!("{query}%")))
        .order((name.asc(), measurement_unit.asc()))
        .load(conn)?
        .into_iter()
        .map(IngredientView::from)
        .collect())
}

pub fn get_ingredient(
    conn: &mut database::Connection,
    get_id: IngredientId,
) -> Result<IngredientView> {
    use schema::ingredients::dsl::*;

    Ok(ingredients
        .filter(id.eq(get_id))
        .select(Ingredient::as_select())
        .get_result::<Ingredient>(conn)
        .optional()?
        .ok_or(Error::NotFound("ingredient"))?
        .into())
}

pub fn list_tags(conn: &mut database::Connection) -> Result<Vec<TagView>> {
    use schema::tags::dsl::*;

    Ok(tags
        .select(Tag::as_select())
        .order(name.asc())
        .load(conn)?
        .into_iter()
        .map(TagView::from)
        .collect())
}

pub fn get_tag(conn: &mut database::Connection, get_id: TagId) -> Result<TagView> {
    use schema::tags::dsl::*;

    Ok(tags
        .filter(id.eq(get_id))
        .select(Tag::as_select())
        .get_result::<Tag>(conn)
        .optional()?
        .ok_or(Error::NotFound("tag"))?
        .into())
}

#[test]
fn ingredient_search_is_a_prefix_match() {
    use crate::api::testing;

    let mut conn = testing::connection();
    testing::add_ingredient(&mut conn, "salt", "g");
    testing::add_ingredient(&mut conn, "salted butter", "g");
    testing::add_ingredient(&mut conn, "sea salt", "g");

    let found = search_ingredients(&mut conn, "salt").unwrap();
    let names: Vec<&str> = found.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["salt", "salted butter"]);

    assert_eq!(list_ingredients(&mut conn).unwrap().len(), 3);
}

#[test]
fn missing_catalog_rows_are_not_found() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let missing_ingredient: IngredientId = serde_json::from_value(serde_json::json!(1)).unwrap();
    let missing_tag: TagId = serde_json::from_value(serde_json::json!(1)).unwrap();

    assert!(get_ingredient(&mut conn, missing_ingredient)
        .unwrap_err()
        .is_not_found());
    assert!(get_tag(&mut conn, missing_tag).unwrap_err().is_not_found());

    let tag = testing::add_tag(&mut conn, "dinner", "dinner");
    assert_eq!(get_tag(&mut conn, tag).unwrap().slug, "dinner");
}
