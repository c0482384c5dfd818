// Copyright 2023 Remi Bernotavicius

use crate::api::image;
use crate::database;
use crate::database::models::{NewCartEntry, NewFavorite, RecipeHandle, RecipeId, UserId};
use crate::database::schema;
use crate::error::conflict_on_unique;
use crate::{Error, Result};
use diesel::ExpressionMethods as _;
use diesel::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Serialize;

/// Minimal recipe rendering returned when a recipe is bookmarked.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeCard {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<RecipeHandle> for RecipeCard {
    fn from(handle: RecipeHandle) -> Self {
        Self {
            id: handle.id,
            name: handle.name,
            image: image::encode_data_uri(&handle.image_format, &handle.image),
            cooking_time: handle.cooking_time,
        }
    }
}

fn recipe_card(conn: &mut database::Connection, card_id: RecipeId) -> Result<RecipeCard> {
    use schema::recipes::dsl::*;

    let handle = recipes
        .filter(id.eq(card_id))
        .select(RecipeHandle::as_select())
        .get_result::<RecipeHandle>(conn)
        .optional()?
        .ok_or(Error::NotFound("recipe"))?;
    Ok(handle.into())
}

pub fn add_favorite(
    conn: &mut database::Connection,
    for_user: UserId,
    add_id: RecipeId,
) -> Result<RecipeCard> {
    let card = recipe_card(conn, add_id)?;
    diesel::insert_into(schema::favorites::table)
        .values(NewFavorite {
            user_id: for_user,
            recipe_id: add_id,
        })
        .execute(conn)
        .map_err(|e| conflict_on_unique(e, "recipe is already in favorites"))?;
    Ok(card)
}

/// Returns whether a row was actually removed; the caller decides whether a
/// missing row is worth reporting.
pub fn remove_favorite(
    conn: &mut database::Connection,
    for_user: UserId,
    remove_id: RecipeId,
) -> Result<bool> {
    use schema::favorites::dsl::*;

    let removed = diesel::delete(
        favorites
            .filter(user_id.eq(for_user))
            .filter(recipe_id.eq(remove_id)),
    )
    .execute(conn)?;
    Ok(removed > 0)
}

pub fn is_favorited(
    conn: &mut database::Connection,
    for_user: UserId,
    check_id: RecipeId,
) -> Result<bool> {
    use diesel::dsl::exists;
    use schema::favorites::dsl::*;

    Ok(diesel::select(exists(
        favorites
            .filter(user_id.eq(for_user))
            .filter(recipe_id.eq(check_id)),
    ))
    .get_result(conn)?)
}

pub fn add_to_cart(
    conn: &mut database::Connection,
    for_user: UserId,
    add_id: RecipeId,
) -> Result<RecipeCard> {
    let card = recipe_card(conn, add_id)?;
    diesel::insert_into(schema::shopping_cart::table)
        .values(NewCartEntry {
            user_id: for_user,
            recipe_id: add_id,
        })
        .execute(conn)
        .map_err(|e| conflict_on_unique(e, "recipe is already in the shopping cart"))?;
    Ok(card)
}

pub fn remove_from_cart(
    conn: &mut database::Connection,
    for_user: UserId,
    remove_id: RecipeId,
) -> Result<bool> {
    use schema::shopping_cart::dsl::*;

    let removed = diesel::delete(
        shopping_cart
            .filter(user_id.eq(for_user))
            .filter(recipe_id.eq(remove_id)),
    )
    .execute(conn)?;
    Ok(removed > 0)
}

pub fn is_in_cart(
    conn: &mut database::Connection,
    for_user: UserId,
    check_id: RecipeId,
) -> Result<bool> {
    use diesel::dsl::exists;
    use schema::shopping_cart::dsl::*;

    Ok(diesel::select(exists(
        shopping_cart
            .filter(user_id.eq(for_user))
            .filter(recipe_id.eq(check_id)),
    ))
    .get_result(conn)?)
}

#[cfg(test)]
fn sample_recipe(conn: &mut database::Connection, author: UserId) -> RecipeId {
    use crate::api::recipe::{create_recipe, IngredientLine, RecipeForm};
    use crate::api::testing;
    use crate::api::Limits;

    let flour = testing::add_ingredient(conn, "flour", "g");
    let tag = testing::add_tag(conn, "dinner", "dinner");
    let form = RecipeForm {
        name: "Dumplings".into(),
        text: "Fold and boil.".into(),
        cooking_time: 45,
        image: testing::png_data_uri(),
        ingredients: vec![IngredientLine { id: flour, amount: 500 }],
        tags: vec![tag],
    };
    create_recipe(conn, &Limits::default(), author, &form).unwrap().id
}

#[cfg(test)]
fn favorite_rows(conn: &mut database::Connection, of_user: UserId, of_recipe: RecipeId) -> i64 {
    use schema::favorites::dsl::*;
    favorites
        .filter(user_id.eq(of_user))
        .filter(recipe_id.eq(of_recipe))
        .count()
        .get_result(conn)
        .unwrap()
}

#[test]
fn favoriting_twice_is_a_conflict() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let recipe = sample_recipe(&mut conn, author);
    let fan = testing::add_user(&mut conn, "bob");

    let card = add_favorite(&mut conn, fan, recipe).unwrap();
    assert_eq!(card.id, recipe);
    assert_eq!(card.name, "Dumplings");
    assert_eq!(card.cooking_time, 45);

    let err = add_favorite(&mut conn, fan, recipe).unwrap_err();
    assert!(err.is_conflict(), "{err:?}");
    assert_eq!(favorite_rows(&mut conn, fan, recipe), 1);
}

#[test]
fn favoriting_a_missing_recipe_is_not_found() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let fan = testing::add_user(&mut conn, "bob");

    let missing: RecipeId = serde_json::from_value(serde_json::json!(7)).unwrap();
    assert!(add_favorite(&mut conn, fan, missing)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn remove_favorite_reports_whether_a_row_existed() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let recipe = sample_recipe(&mut conn, author);
    let fan = testing::add_user(&mut conn, "bob");

    add_favorite(&mut conn, fan, recipe).unwrap();
    assert!(remove_favorite(&mut conn, fan, recipe).unwrap());
    assert!(!remove_favorite(&mut conn, fan, recipe).unwrap());
    assert_eq!(favorite_rows(&mut conn, fan, recipe), 0);
}

#[test]
fn cart_duplicates_are_a_conflict() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let recipe = sample_recipe(&mut conn, author);

    add_to_cart(&mut conn, author, recipe).unwrap();
    assert!(add_to_cart(&mut conn, author, recipe)
        .unwrap_err()
        .is_conflict());

    assert!(remove_from_cart(&mut conn, author, recipe).unwrap());
    assert!(!remove_from_cart(&mut conn, author, recipe).unwrap());
}

#[test]
fn viewer_flags_follow_bookmarks() {
    use crate::api::recipe::recipe_view;
    use crate::api::{testing, Viewer};

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let recipe = sample_recipe(&mut conn, author);
    let fan = testing::add_user(&mut conn, "bob");

    add_favorite(&mut conn, fan, recipe).unwrap();
    add_to_cart(&mut conn, fan, recipe).unwrap();

    // Anonymous callers never see another user's bookmarks.
    let anonymous = recipe_view(&mut conn, recipe, Viewer::Anonymous).unwrap();
    assert!(!anonymous.is_favorited);
    assert!(!anonymous.is_in_shopping_cart);

    let for_fan = recipe_view(&mut conn, recipe, Viewer::User(fan)).unwrap();
    assert!(for_fan.is_favorited);
    assert!(for_fan.is_in_shopping_cart);

    let for_author = recipe_view(&mut conn, recipe, Viewer::User(author)).unwrap();
    assert!(!for_author.is_favorited);
    assert!(!for_author.is_in_shopping_cart);
}
