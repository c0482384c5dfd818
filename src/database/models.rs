// Copyright 2023 Remi Bernotavicius

use derive_more::Display;
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};

#[derive(DieselNewType, Display, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct UserId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::users)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(DieselNewType, Display, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct IngredientId(i32);

#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

#[derive(DieselNewType, Display, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct TagId(i32);

/// Column order follows the migration history: `color` was added to an
/// existing table, so it sorts last.
#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::tags)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::tags)]
pub struct NewTag<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub color: &'a str,
}

#[derive(DieselNewType, Display, Serialize, Deserialize, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone)]
#[diesel(belongs_to(User, foreign_key = author_id))]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct Recipe {
    pub id: RecipeId,
    pub author_id: UserId,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Vec<u8>,
    pub image_format: String,
    pub pub_date: chrono::NaiveDateTime,
}

/// The subset of recipe columns needed for the compact card rendering.
#[derive(Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct RecipeHandle {
    pub id: RecipeId,
    pub name: String,
    pub cooking_time: i32,
    pub image: Vec<u8>,
    pub image_format: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: UserId,
    pub name: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub image: &'a [u8],
    pub image_format: &'a str,
}

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Copy, Clone)]
pub struct RecipeIngredientId(i32);

#[derive(Associations, Queryable, Selectable, Identifiable, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct RecipeIngredient {
    pub id: RecipeIngredientId,
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipe_ingredients)]
pub struct NewRecipeIngredient {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub amount: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::recipe_tags)]
pub struct NewRecipeTag {
    pub recipe_id: RecipeId,
    pub tag_id: TagId,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::favorites)]
pub struct NewFavorite {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
}

#[derive(Insertable)]
#[diesel(table_name = crate::database::schema::shopping_cart)]
pub struct NewCartEntry {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
}
