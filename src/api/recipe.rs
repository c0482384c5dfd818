// Copyright 2023 Remi Bernotavicius

use crate::api::{bookmarks, image, Limits, Viewer};
use crate::database;
use crate::database::models::{
    Ingredient, IngredientId, NewRecipe, NewRecipeIngredient, NewRecipeTag, Recipe,
    RecipeIngredient, RecipeId, Tag, TagId, User, UserId,
};
use crate::database::schema;
use crate::{Error, Result};
use diesel::BelongingToDsl as _;
use diesel::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One ingredient line of an inbound recipe payload.
#[derive(Deserialize, Debug, Clone)]
pub struct IngredientLine {
    pub id: IngredientId,
    pub amount: i32,
}

/// Inbound payload for recipe creation. Every field is required.
#[derive(Deserialize, Debug, Clone)]
pub struct RecipeForm {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: String,
    pub ingredients: Vec<IngredientLine>,
    pub tags: Vec<TagId>,
}

/// Inbound payload for recipe updates. Omitted fields keep their stored
/// value; a supplied ingredients or tags list replaces the whole set.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i32>,
    pub image: Option<String>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub tags: Option<Vec<TagId>>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

/// An ingredient line joined with the referenced ingredient's name and unit.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredientView {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// The full read-side rendering of a recipe. The two boolean flags are
/// scoped to the viewer the rendering was produced for.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub id: RecipeId,
    pub tags: Vec<TagView>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredientView>,
    pub is_favorited: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub is_in_shopping_cart: bool,
}

fn validate_cooking_time(limits: &Limits, cooking_time: i32) -> Result<()> {
    if cooking_time <= limits.min {
        return Err(Error::validation(
            "cooking_time",
            format!("must be greater than {}", limits.min),
        ));
    }
    if cooking_time > limits.max {
        return Err(Error::validation(
            "cooking_time",
            format!("must not exceed {}", limits.max),
        ));
    }
    Ok(())
}

fn validate_ingredients(limits: &Limits, lines: &[IngredientLine]) -> Result<()> {
    if lines.is_empty() {
        return Err(Error::validation(
            "ingredients",
            "at least one ingredient is required",
        ));
    }

    let mut seen = HashSet::new();
    for line in lines {
        if !seen.insert(line.id) {
            return Err(Error::validation(
                "ingredients",
                format!("ingredient {} is listed more than once", line.id),
            ));
        }
        if line.amount <= limits.min {
            return Err(Error::validation(
                "ingredients",
                format!(
                    "amount for ingredient {} must be greater than {}",
                    line.id, limits.min
                ),
            ));
        }
        if line.amount > limits.max {
            return Err(Error::validation(
                "ingredients",
                format!(
                    "amount for ingredient {} must not exceed {}",
                    line.id, limits.max
                ),
            ));
        }
    }
    Ok(())
}

fn validate_tags(tag_ids: &[TagId]) -> Result<()> {
    if tag_ids.is_empty() {
        return Err(Error::validation("tags", "at least one tag is required"));
    }
    Ok(())
}

fn insert_ingredient_lines(
    conn: &mut database::Connection,
    new_recipe_id: RecipeId,
    lines: &[IngredientLine],
) -> Result<()> {
    let referenced: Vec<IngredientId> = lines.iter().map(|line| line.id).collect();
    let found: i64 = {
        use schema::ingredients::dsl::*;
        ingredients
            .filter(id.eq_any(&referenced))
            .count()
            .get_result(conn)?
    };
    if found != referenced.len() as i64 {
        return Err(Error::NotFound("ingredient"));
    }

    let rows: Vec<NewRecipeIngredient> = lines
        .iter()
        .map(|line| NewRecipeIngredient {
            recipe_id: new_recipe_id,
            ingredient_id: line.id,
            amount: line.amount,
        })
        .collect();
    diesel::insert_into(schema::recipe_ingredients::table)
        .values(rows)
        .execute(conn)?;
    Ok(())
}

/// Replaces the recipe's tag association set. Repeated ids collapse to one
/// link, matching the set semantics of the association.
fn set_tags(
    conn: &mut database::Connection,
    edit_recipe_id: RecipeId,
    tag_ids: &[TagId],
) -> Result<()> {
    let mut unique = Vec::new();
    for candidate in tag_ids {
        if !unique.contains(candidate) {
            unique.push(*candidate);
        }
    }

    let found: i64 = {
        use schema::tags::dsl::*;
        tags.filter(id.eq_any(&unique)).count().get_result(conn)?
    };
    if found != unique.len() as i64 {
        return Err(Error::NotFound("tag"));
    }

    use schema::recipe_tags::dsl::*;
    diesel::delete(recipe_tags.filter(recipe_id.eq(edit_recipe_id))).execute(conn)?;
    let rows: Vec<NewRecipeTag> = unique
        .into_iter()
        .map(|t| NewRecipeTag {
            recipe_id: edit_recipe_id,
            tag_id: t,
        })
        .collect();
    diesel::insert_into(recipe_tags).values(rows).execute(conn)?;
    Ok(())
}

/// Creates a recipe with its ingredient lines and tag links in one
/// transaction, then responds with the read-side rendering.
pub fn create_recipe(
    conn: &mut database::Connection,
    limits: &Limits,
    author: UserId,
    form: &RecipeForm,
) -> Result<RecipeView> {
    validate_cooking_time(limits, form.cooking_time)?;
    validate_ingredients(limits, &form.ingredients)?;
    validate_tags(&form.tags)?;
    let new_image = image::decode_data_uri("image", &form.image)?;

    let new_id = conn.transaction::<_, Error, _>(|conn| {
        let recipe: Recipe = {
            use schema::recipes::dsl::*;
            diesel::insert_into(recipes)
                .values(NewRecipe {
                    author_id: author,
                    name: &form.name,
                    text: &form.text,
                    cooking_time: form.cooking_time,
                    image: &new_image.bytes,
                    image_format: &new_image.format,
                })
                .returning(Recipe::as_returning())
                .get_result(conn)?
        };
        insert_ingredient_lines(conn, recipe.id, &form.ingredients)?;
        set_tags(conn, recipe.id, &form.tags)?;
        Ok(recipe.id)
    })?;

    recipe_view(conn, new_id, Viewer::User(author))
}

/// Applies a partial update. Scalar fields update in place; a supplied
/// ingredients list is a full replace of the line set, and likewise for
/// tags. The whole update is one transaction.
pub fn update_recipe(
    conn: &mut database::Connection,
    limits: &Limits,
    edit_id: RecipeId,
    viewer: Viewer,
    patch: &RecipePatch,
) -> Result<RecipeView> {
    if let Some(cooking_time) = patch.cooking_time {
        validate_cooking_time(limits, cooking_time)?;
    }
    if let Some(lines) = &patch.ingredients {
        validate_ingredients(limits, lines)?;
    }
    if let Some(tag_ids) = &patch.tags {
        validate_tags(tag_ids)?;
    }
    let new_image = match &patch.image {
        Some(value) => Some(image::decode_data_uri("image", value)?),
        None => None,
    };

    conn.transaction::<_, Error, _>(|conn| {
        {
            use schema::recipes::dsl::*;

            recipes
                .filter(id.eq(edit_id))
                .select(id)
                .get_result::<RecipeId>(conn)
                .optional()?
                .ok_or(Error::NotFound("recipe"))?;

            if let Some(new_name) = &patch.name {
                diesel::update(recipes.filter(id.eq(edit_id)))
                    .set(name.eq(new_name))
                    .execute(conn)?;
            }
            if let Some(new_text) = &patch.text {
                diesel::update(recipes.filter(id.eq(edit_id)))
                    .set(text.eq(new_text))
                    .execute(conn)?;
            }
            if let Some(new_cooking_time) = patch.cooking_time {
                diesel::update(recipes.filter(id.eq(edit_id)))
                    .set(cooking_time.eq(new_cooking_time))
                    .execute(conn)?;
            }
            if let Some(decoded) = &new_image {
                diesel::update(recipes.filter(id.eq(edit_id)))
                    .set((
                        image.eq(decoded.bytes.as_slice()),
                        image_format.eq(&decoded.format),
                    ))
                    .execute(conn)?;
            }
        }

        if let Some(lines) = &patch.ingredients {
            use schema::recipe_ingredients::dsl::*;
            diesel::delete(recipe_ingredients.filter(recipe_id.eq(edit_id))).execute(conn)?;
            insert_ingredient_lines(conn, edit_id, lines)?;
        }
        if let Some(tag_ids) = &patch.tags {
            set_tags(conn, edit_id, tag_ids)?;
        }
        Ok(())
    })?;

    recipe_view(conn, edit_id, viewer)
}

pub fn delete_recipe(conn: &mut database::Connection, delete_id: RecipeId) -> Result<()> {
    use schema::recipes::dsl::*;

    let deleted = diesel::delete(recipes.filter(id.eq(delete_id))).execute(conn)?;
    if deleted == 0 {
        return Err(Error::NotFound("recipe"));
    }
    Ok(())
}

/// Renders one recipe for the given viewer.
pub fn recipe_view(
    conn: &mut database::Connection,
    view_id: RecipeId,
    viewer: Viewer,
) -> Result<RecipeView> {
    let (recipe, author) = {
        use schema::recipes::dsl::*;
        recipes
            .inner_join(schema::users::table)
            .filter(id.eq(view_id))
            .select((Recipe::as_select(), User::as_select()))
            .get_result::<(Recipe, User)>(conn)
            .optional()?
            .ok_or(Error::NotFound("recipe"))?
    };
    render_view(conn, recipe, author, viewer)
}

/// All recipes, newest first, each rendered for the given viewer.
pub fn list_recipes(conn: &mut database::Connection, viewer: Viewer) -> Result<Vec<RecipeView>> {
    let rows: Vec<(Recipe, User)> = {
        use schema::recipes::dsl::*;
        recipes
            .inner_join(schema::users::table)
            .select((Recipe::as_select(), User::as_select()))
            .order((pub_date.desc(), name.asc()))
            .load(conn)?
    };
    rows.into_iter()
        .map(|(recipe, author)| render_view(conn, recipe, author, viewer))
        .collect()
}

fn render_view(
    conn: &mut database::Connection,
    recipe: Recipe,
    author: User,
    viewer: Viewer,
) -> Result<RecipeView> {
    let lines: Vec<(RecipeIngredient, Ingredient)> = RecipeIngredient::belonging_to(&recipe)
        .inner_join(schema::ingredients::table)
        .select((RecipeIngredient::as_select(), Ingredient::as_select()))
        .order(schema::recipe_ingredients::id)
        .load(conn)?;

    let recipe_tags: Vec<Tag> = {
        use schema::recipe_tags::dsl::*;
        recipe_tags
            .inner_join(schema::tags::table)
            .filter(recipe_id.eq(recipe.id))
            .select(Tag::as_select())
            .order(id)
            .load(conn)?
    };

    let (is_favorited, is_in_shopping_cart) = match viewer.user_id() {
        Some(user_id) => (
            bookmarks::is_favorited(conn, user_id, recipe.id)?,
            bookmarks::is_in_cart(conn, user_id, recipe.id)?,
        ),
        None => (false, false),
    };

    Ok(RecipeView {
        id: recipe.id,
        tags: recipe_tags.into_iter().map(TagView::from).collect(),
        author: author.into(),
        ingredients: lines
            .into_iter()
            .map(|(line, ingredient)| RecipeIngredientView {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount: line.amount,
            })
            .collect(),
        is_favorited,
        name: recipe.name,
        image: image::encode_data_uri(&recipe.image_format, &recipe.image),
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        is_in_shopping_cart,
    })
}

#[cfg(test)]
fn sample_form(ingredients: Vec<IngredientLine>, tags: Vec<TagId>) -> RecipeForm {
    RecipeForm {
        name: "Pancakes".into(),
        text: "Mix everything and fry.".into(),
        cooking_time: 20,
        image: crate::api::testing::png_data_uri(),
        ingredients,
        tags,
    }
}

#[cfg(test)]
fn line_count(conn: &mut database::Connection, of_recipe: RecipeId) -> i64 {
    use schema::recipe_ingredients::dsl::*;
    recipe_ingredients
        .filter(recipe_id.eq(of_recipe))
        .count()
        .get_result(conn)
        .unwrap()
}

#[test]
fn create_rejects_out_of_range_cooking_time() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    for bad in [0, -3, 32001] {
        let mut form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![tag]);
        form.cooking_time = bad;
        let err = create_recipe(&mut conn, &limits, author, &form).unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "cooking_time"),
            other => panic!("unexpected error for {bad}: {other:?}"),
        }
    }
}

#[test]
fn create_rejects_out_of_range_amount() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    for bad in [0, -1, 32001] {
        let form = sample_form(vec![IngredientLine { id: flour, amount: bad }], vec![tag]);
        let err = create_recipe(&mut conn, &limits, author, &form).unwrap_err();
        match err {
            Error::Validation { field, message } => {
                assert_eq!(field, "ingredients");
                assert!(message.contains(&flour.to_string()), "{message}");
            }
            other => panic!("unexpected error for {bad}: {other:?}"),
        }
    }
}

#[test]
fn create_requires_ingredients_and_tags() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let form = sample_form(vec![], vec![tag]);
    assert!(create_recipe(&mut conn, &limits, author, &form)
        .unwrap_err()
        .is_validation());

    let form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![]);
    assert!(create_recipe(&mut conn, &limits, author, &form)
        .unwrap_err()
        .is_validation());
}

#[test]
fn create_rejects_duplicate_ingredient_lines() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");

    let form = sample_form(
        vec![
            IngredientLine { id: flour, amount: 2 },
            IngredientLine { id: flour, amount: 3 },
        ],
        vec![tag],
    );
    let err = create_recipe(&mut conn, &Limits::default(), author, &form).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn create_rejects_unknown_references() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let missing_ingredient: IngredientLine =
        serde_json::from_value(serde_json::json!({"id": 999, "amount": 5})).unwrap();
    let form = sample_form(vec![missing_ingredient], vec![tag]);
    assert!(create_recipe(&mut conn, &limits, author, &form)
        .unwrap_err()
        .is_not_found());

    let missing_tag: TagId = serde_json::from_value(serde_json::json!(999)).unwrap();
    let form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![missing_tag]);
    assert!(create_recipe(&mut conn, &limits, author, &form)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn create_then_read_round_trips() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let milk = testing::add_ingredient(&mut conn, "milk", "ml");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");

    let form = sample_form(
        vec![
            IngredientLine { id: flour, amount: 2 },
            IngredientLine { id: milk, amount: 3 },
        ],
        vec![tag],
    );
    let created = create_recipe(&mut conn, &Limits::default(), author, &form).unwrap();

    assert_eq!(created.name, "Pancakes");
    assert_eq!(created.cooking_time, 20);
    assert_eq!(created.image, form.image);
    assert_eq!(created.author.username, "alice");
    assert!(!created.is_favorited);
    assert!(!created.is_in_shopping_cart);
    assert_eq!(
        created.ingredients,
        vec![
            RecipeIngredientView {
                id: flour,
                name: "flour".into(),
                measurement_unit: "g".into(),
                amount: 2,
            },
            RecipeIngredientView {
                id: milk,
                name: "milk".into(),
                measurement_unit: "ml".into(),
                amount: 3,
            },
        ]
    );
    assert_eq!(created.tags.len(), 1);
    assert_eq!(created.tags[0].slug, "breakfast");

    // The write response is the same shape and content as a fresh read.
    let read = recipe_view(&mut conn, created.id, Viewer::User(author)).unwrap();
    assert_eq!(read, created);
}

#[test]
fn update_replaces_ingredient_lines_wholesale() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let butter = testing::add_ingredient(&mut conn, "butter", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![tag]);
    let created = create_recipe(&mut conn, &limits, author, &form).unwrap();

    let patch = RecipePatch {
        ingredients: Some(vec![IngredientLine { id: butter, amount: 5 }]),
        ..Default::default()
    };
    let updated =
        update_recipe(&mut conn, &limits, created.id, Viewer::User(author), &patch).unwrap();

    assert_eq!(
        updated.ingredients,
        vec![RecipeIngredientView {
            id: butter,
            name: "butter".into(),
            measurement_unit: "g".into(),
            amount: 5,
        }]
    );
    assert_eq!(line_count(&mut conn, created.id), 1);
}

#[test]
fn update_edits_scalar_fields_in_place() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![tag]);
    let created = create_recipe(&mut conn, &limits, author, &form).unwrap();

    let patch = RecipePatch {
        name: Some("Crepes".into()),
        cooking_time: Some(15),
        ..Default::default()
    };
    let updated =
        update_recipe(&mut conn, &limits, created.id, Viewer::User(author), &patch).unwrap();

    assert_eq!(updated.name, "Crepes");
    assert_eq!(updated.cooking_time, 15);
    // Untouched fields and the line set survive.
    assert_eq!(updated.text, created.text);
    assert_eq!(updated.ingredients, created.ingredients);
    assert_eq!(updated.tags, created.tags);
}

#[test]
fn update_validates_patched_fields() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![tag]);
    let created = create_recipe(&mut conn, &limits, author, &form).unwrap();

    let patch = RecipePatch {
        cooking_time: Some(32001),
        ..Default::default()
    };
    let err =
        update_recipe(&mut conn, &limits, created.id, Viewer::User(author), &patch).unwrap_err();
    assert!(err.is_validation());

    let patch = RecipePatch {
        image: Some("not a data uri".into()),
        ..Default::default()
    };
    let err =
        update_recipe(&mut conn, &limits, created.id, Viewer::User(author), &patch).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn update_of_missing_recipe_is_not_found() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let _ = testing::add_user(&mut conn, "alice");

    let missing: RecipeId = serde_json::from_value(serde_json::json!(42)).unwrap();
    let err = update_recipe(
        &mut conn,
        &Limits::default(),
        missing,
        Viewer::Anonymous,
        &RecipePatch::default(),
    )
    .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_removes_recipe_and_lines() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![tag]);
    let created = create_recipe(&mut conn, &limits, author, &form).unwrap();

    delete_recipe(&mut conn, created.id).unwrap();
    assert!(recipe_view(&mut conn, created.id, Viewer::Anonymous)
        .unwrap_err()
        .is_not_found());
    assert_eq!(line_count(&mut conn, created.id), 0);

    assert!(delete_recipe(&mut conn, created.id).unwrap_err().is_not_found());
}

#[test]
fn list_is_newest_first() {
    use crate::api::testing;

    let mut conn = testing::connection();
    let author = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "breakfast", "breakfast");
    let limits = Limits::default();

    let mut form = sample_form(vec![IngredientLine { id: flour, amount: 2 }], vec![tag]);
    form.name = "Waffles".into();
    create_recipe(&mut conn, &limits, author, &form).unwrap();
    form.name = "Crepes".into();
    create_recipe(&mut conn, &limits, author, &form).unwrap();

    let listed = list_recipes(&mut conn, Viewer::Anonymous).unwrap();
    let names: Vec<&str> = listed.iter().map(|r| r.name.as_str()).collect();
    // Same-second publication falls back to name order.
    assert_eq!(names, vec!["Crepes", "Waffles"]);
}
